mod common;

use std::sync::Arc;

use pe_core::diagnostics::DiagnosticManager;
use pe_core::ir::{ConstValue, Expr, ExprCall, Ty};
use pe_core::span::Span;
use pe_core::ExitState;
use pe_eval::{EmptyOutputPolicy, EvalConfig, FallbackKind, RecursionGuard, RECURSION_GUARD_VAR};
use pretty_assertions::assert_eq;

use common::*;

#[test]
fn add_pure_with_literals_becomes_typed_literal() {
    let scratch = tempfile::tempdir().unwrap();
    let toolchain = FakeToolchain::new(Reply::stdout("30"));
    let evaluator = evaluator(config_in(scratch.path()), toolchain.clone());
    let span = Span { file: 1, lo: 10, hi: 24 };
    let call = add_pure_call(10, 20).with_span(span);

    let Some(Expr::Literal(lit)) = evaluator.try_evaluate(&call, RecursionGuard::Inactive) else {
        panic!("expected a literal");
    };
    assert_eq!(lit.value, ConstValue::int(30));
    assert_eq!(lit.ty, Some(Ty::int()));
    assert_eq!(lit.span, span);
    assert!(lit.typechecked);

    let calls = toolchain.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].source.contains("target \"example.com/m/calc\""));
    assert!(calls[0].source.contains("result := target.addPure(10, 20)"));
    assert!(calls[0].source_path.ends_with("main.go"));
}

#[test]
fn runtime_argument_is_left_alone_without_running_anything() {
    let toolchain = FakeToolchain::new(Reply::stdout("30"));
    let evaluator = evaluator(EvalConfig::default(), toolchain.clone());
    let call = ExprCall::new(
        add_pure(),
        vec![Expr::var("x"), Expr::value(ConstValue::int(20))],
    );
    let before = call.clone();

    assert_eq!(evaluator.try_evaluate(&call, RecursionGuard::Inactive), None);
    assert_eq!(call, before);
    assert!(toolchain.calls().is_empty());

    let fallback = evaluator
        .try_evaluate_detailed(&call, RecursionGuard::Inactive)
        .unwrap_err();
    assert_eq!(fallback.kind, FallbackKind::Ineligible);
    assert_eq!(fallback.stage, "eligibility");
}

#[test]
fn active_guard_short_circuits_before_any_stage() {
    let toolchain = FakeToolchain::new(Reply::stdout("30"));
    let evaluator = evaluator(EvalConfig::default(), toolchain.clone());

    let fallback = evaluator
        .try_evaluate_detailed(&add_pure_call(1, 2), RecursionGuard::Active)
        .unwrap_err();
    assert_eq!(fallback.kind, FallbackKind::Reentrant);
    assert!(toolchain.calls().is_empty());
}

#[test]
fn disabled_evaluator_never_runs() {
    let toolchain = FakeToolchain::new(Reply::stdout("30"));
    let config = EvalConfig {
        enabled: false,
        ..EvalConfig::default()
    };
    let evaluator = evaluator(config, toolchain.clone());

    let fallback = evaluator
        .try_evaluate_detailed(&add_pure_call(1, 2), RecursionGuard::Inactive)
        .unwrap_err();
    assert_eq!(fallback.kind, FallbackKind::Disabled);
    assert!(toolchain.calls().is_empty());
}

#[test]
fn failures_fall_back_the_same_way_every_time() {
    let scratch = tempfile::tempdir().unwrap();
    let toolchain = FakeToolchain::new(Reply::status(
        ExitState::Exited(1),
        "./main.go:7:19: undefined: target.addPure",
    ));
    let evaluator = evaluator(config_in(scratch.path()), toolchain.clone());
    let call = add_pure_call(10, 20);

    let first = evaluator.try_evaluate_detailed(&call, RecursionGuard::Inactive);
    let second = evaluator.try_evaluate_detailed(&call, RecursionGuard::Inactive);
    assert_eq!(first, second);
    assert_eq!(first.unwrap_err().kind, FallbackKind::ExecutionFailure);
    // No memoization: both attempts reached the toolchain.
    assert_eq!(toolchain.calls().len(), 2);
    assert_eq!(leftover_entries(scratch.path()), 0);
}

#[test]
fn execution_failures_yield_none() {
    let replies = [
        Reply::SpawnError,
        Reply::status(ExitState::Exited(2), "build failed"),
        Reply::status(ExitState::Signalled(Some(9)), ""),
        Reply::status(ExitState::TimedOut, ""),
    ];
    for reply in replies {
        let scratch = tempfile::tempdir().unwrap();
        let evaluator = evaluator(config_in(scratch.path()), FakeToolchain::new(reply.clone()));
        let result = evaluator.try_evaluate_detailed(&add_pure_call(1, 2), RecursionGuard::Inactive);
        assert_eq!(
            result.unwrap_err().kind,
            FallbackKind::ExecutionFailure,
            "{:?}",
            reply
        );
        assert_eq!(leftover_entries(scratch.path()), 0);
    }
}

#[test]
fn malformed_output_is_a_materialization_fallback() {
    let scratch = tempfile::tempdir().unwrap();
    let evaluator = evaluator(
        config_in(scratch.path()),
        FakeToolchain::new(Reply::stdout("thirty")),
    );
    let fallback = evaluator
        .try_evaluate_detailed(&add_pure_call(10, 20), RecursionGuard::Inactive)
        .unwrap_err();
    assert_eq!(fallback.kind, FallbackKind::MaterializationFailure);
}

#[test]
fn string_result_is_taken_verbatim() {
    let scratch = tempfile::tempdir().unwrap();
    let toolchain = FakeToolchain::new(Reply::stdout("hello world"));
    let evaluator = evaluator(config_in(scratch.path()), toolchain.clone());
    let call = ExprCall::new(to_lower(), vec![Expr::value(ConstValue::string("HELLO WORLD"))]);

    let constant = evaluator
        .try_evaluate_detailed(&call, RecursionGuard::Inactive)
        .unwrap();
    assert_eq!(constant.value, ConstValue::string("hello world"));
    assert!(toolchain.calls()[0]
        .source
        .contains("result := target.ToLower(\"HELLO WORLD\")"));
}

#[test]
fn empty_string_output_follows_policy() {
    let call = ExprCall::new(to_lower(), vec![Expr::value(ConstValue::string(""))]);

    let scratch = tempfile::tempdir().unwrap();
    let strict = evaluator(config_in(scratch.path()), FakeToolchain::new(Reply::stdout("")));
    assert_eq!(strict.try_evaluate(&call, RecursionGuard::Inactive), None);

    let lenient = evaluator(
        EvalConfig {
            empty_output: EmptyOutputPolicy::AcceptEmptyString,
            ..config_in(scratch.path())
        },
        FakeToolchain::new(Reply::stdout("")),
    );
    let constant = lenient
        .try_evaluate_detailed(&call, RecursionGuard::Inactive)
        .unwrap();
    assert_eq!(constant.value, ConstValue::string(""));
}

#[test]
fn child_environment_is_guarded_and_pinned() {
    let scratch = tempfile::tempdir().unwrap();
    let toolchain = FakeToolchain::with_root(Reply::stdout("3"), "/opt/go");
    let config = EvalConfig {
        inherit_environment: false,
        ..config_in(scratch.path())
    };
    let evaluator = evaluator(config, toolchain.clone());
    evaluator.try_evaluate(&add_pure_call(1, 2), RecursionGuard::Inactive);

    let env = &toolchain.calls()[0].env;
    assert!(!env.inherit_ambient);
    assert_eq!(env.get(RECURSION_GUARD_VAR), Some("1"));
    assert_eq!(env.get("GOROOT"), Some("/opt/go"));
}

#[test]
fn toolchain_runs_in_the_module_root_with_only_the_source_in_scratch() {
    let scratch = tempfile::tempdir().unwrap();
    let module = tempfile::tempdir().unwrap();
    let toolchain = FakeToolchain::new(Reply::stdout("3"));
    let config = EvalConfig {
        module_root: Some(module.path().to_path_buf()),
        ..config_in(scratch.path())
    };
    let evaluator = evaluator(config, toolchain.clone());

    evaluator.try_evaluate(&add_pure_call(1, 2), RecursionGuard::Inactive);
    evaluator.try_evaluate(&add_pure_call(1, 2), RecursionGuard::Inactive);

    let calls = toolchain.calls();
    assert_eq!(calls[0].working_dir, module.path().to_path_buf());
    assert!(calls[0].source_path.starts_with(scratch.path()));
    assert_ne!(calls[0].source_path, calls[1].source_path);
    assert_eq!(leftover_entries(scratch.path()), 0);
    assert_eq!(leftover_entries(module.path()), 0);
}

#[test]
fn module_root_defaults_to_the_current_directory() {
    let scratch = tempfile::tempdir().unwrap();
    let toolchain = FakeToolchain::new(Reply::stdout("3"));
    let evaluator = evaluator(config_in(scratch.path()), toolchain.clone());

    evaluator.try_evaluate(&add_pure_call(1, 2), RecursionGuard::Inactive);
    assert_eq!(
        toolchain.calls()[0].working_dir,
        std::env::current_dir().unwrap()
    );
}

#[test]
fn fallbacks_are_reported_to_the_diagnostic_manager() {
    let manager = Arc::new(DiagnosticManager::new());
    let evaluator = evaluator(EvalConfig::default(), FakeToolchain::new(Reply::stdout("3")))
        .with_diagnostics(manager.clone());
    let call = ExprCall::new(add_pure(), vec![Expr::value(ConstValue::int(1))]);

    assert_eq!(evaluator.try_evaluate(&call, RecursionGuard::Inactive), None);
    let diagnostics = manager.get_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code.as_deref(), Some("PE002"));
    assert!(!manager.has_errors());
}

#[test]
fn stage_trace_shows_arguments_as_go_literals() {
    let scratch = tempfile::tempdir().unwrap();
    let manager = Arc::new(DiagnosticManager::new());
    let config = EvalConfig {
        verbosity: 2,
        ..config_in(scratch.path())
    };
    let evaluator = evaluator(config, FakeToolchain::new(Reply::stdout("bell\u{7}")))
        .with_diagnostics(manager.clone());
    let call = ExprCall::new(to_lower(), vec![Expr::value(ConstValue::string("BELL\u{7}"))]);

    assert!(evaluator.try_evaluate(&call, RecursionGuard::Inactive).is_some());
    let notes: Vec<String> = manager
        .get_diagnostics()
        .into_iter()
        .map(|d| d.message)
        .collect();
    assert!(
        notes.contains(&"strings.ToLower is eligible with arguments (\"BELL\\a\")".to_string()),
        "{notes:?}"
    );
}
