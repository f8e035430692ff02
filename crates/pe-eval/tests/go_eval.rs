// End-to-end evaluation through a real `go` toolchain. Skipped when none is on PATH.

mod common;

use pe_core::ir::{ConstValue, Expr, ExprCall, FunctionRef, FunctionSig, Param, Ty};
use pe_eval::{EvalConfig, PureCallEvaluator, RecursionGuard};
use pretty_assertions::assert_eq;
use std::sync::Arc;

use common::to_lower;

fn go_available() -> bool {
    which::which("go").is_ok()
}

fn config(scratch: &std::path::Path) -> EvalConfig {
    EvalConfig {
        timeout_ms: 300_000,
        ..common::config_in(scratch)
    }
}

#[test]
fn lowercases_a_string_constant() {
    if !go_available() {
        eprintln!("go not found on PATH; skipping");
        return;
    }
    let scratch = tempfile::tempdir().unwrap();
    let evaluator = PureCallEvaluator::go(config(scratch.path()));
    let call = ExprCall::new(to_lower(), vec![Expr::value(ConstValue::string("HELLO WORLD"))]);

    let constant = evaluator
        .try_evaluate_detailed(&call, RecursionGuard::Inactive)
        .unwrap();
    assert_eq!(constant.value, ConstValue::string("hello world"));
    assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
}

#[test]
fn integer_results_are_parsed() {
    if !go_available() {
        eprintln!("go not found on PATH; skipping");
        return;
    }
    let scratch = tempfile::tempdir().unwrap();
    let evaluator = PureCallEvaluator::go(config(scratch.path()));
    let count = Arc::new(
        FunctionSig::new(
            FunctionRef::new("strings", "Count"),
            vec![Param::new("s", Ty::string()), Param::new("substr", Ty::string())],
            Ty::int(),
        )
        .pure(),
    );
    let call = ExprCall::new(
        count,
        vec![
            Expr::value(ConstValue::string("cheese")),
            Expr::value(ConstValue::string("e")),
        ],
    );

    let Some(Expr::Literal(lit)) = evaluator.try_evaluate(&call, RecursionGuard::Inactive) else {
        panic!("expected a literal");
    };
    assert_eq!(lit.value, ConstValue::int(3));
}

#[test]
fn unknown_function_falls_back() {
    if !go_available() {
        eprintln!("go not found on PATH; skipping");
        return;
    }
    let scratch = tempfile::tempdir().unwrap();
    let evaluator = PureCallEvaluator::go(config(scratch.path()));
    let missing = Arc::new(
        FunctionSig::new(
            FunctionRef::new("strings", "NoSuchFunction"),
            vec![],
            Ty::string(),
        )
        .pure(),
    );
    let call = ExprCall::new(missing, vec![]);
    assert_eq!(evaluator.try_evaluate(&call, RecursionGuard::Inactive), None);
}

const CALC: &str = "package calc\n\n// AddPure has no side effects.\nfunc AddPure(a, b int) int {\n\treturn a + b\n}\n";

#[test]
fn evaluates_a_function_from_the_host_module() {
    if !go_available() {
        eprintln!("go not found on PATH; skipping");
        return;
    }
    let module = tempfile::tempdir().unwrap();
    common::write_module(module.path(), "example.com/m", &[("calc/calc.go", CALC)]);
    let scratch = tempfile::tempdir().unwrap();
    let evaluator = PureCallEvaluator::go(EvalConfig {
        module_root: Some(module.path().to_path_buf()),
        ..config(scratch.path())
    });
    let add_pure = Arc::new(
        FunctionSig::new(
            FunctionRef::new("example.com/m/calc", "AddPure"),
            vec![Param::new("a", Ty::int()), Param::new("b", Ty::int())],
            Ty::int(),
        )
        .pure(),
    );
    let call = ExprCall::new(
        add_pure,
        vec![Expr::value(ConstValue::int(10)), Expr::value(ConstValue::int(20))],
    );

    let constant = evaluator
        .try_evaluate_detailed(&call, RecursionGuard::Inactive)
        .unwrap();
    assert_eq!(constant.value, ConstValue::int(30));
    assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
}
