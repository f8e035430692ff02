//! Evaluate a described call through the full evaluator

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use console::style;
use pe_core::diagnostics::DiagnosticManager;
use pe_eval::{EvalConfig, EvaluatedConstant, Fallback, PureCallEvaluator, RecursionGuard};
use serde::Serialize;
use tracing::info;

use crate::call::CallArgs;
use crate::config::CliConfig;
use crate::diagnostics::emit_collected;
use crate::Result;

/// Arguments for the eval command
#[derive(Args, Debug, Clone, Default)]
pub struct EvalArgs {
    #[command(flatten)]
    pub call: CallArgs,

    /// Wall-clock budget in milliseconds (0 disables)
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Accept empty output of a string function as ""
    #[arg(long)]
    pub accept_empty: bool,

    /// Go installation to use instead of the one found on PATH
    #[arg(long)]
    pub goroot: Option<PathBuf>,

    /// Module whose go.mod resolves the callee; defaults to the current directory
    #[arg(long)]
    pub module_root: Option<PathBuf>,

    /// Exit with an error when the call is left as a runtime call
    #[arg(long)]
    pub strict: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

impl EvalArgs {
    /// The configured evaluator settings with this invocation's overrides applied.
    pub fn effective_config(&self, config: &CliConfig) -> EvalConfig {
        let mut eval = config.evaluator.clone();
        if let Some(timeout_ms) = self.timeout_ms {
            eval.timeout_ms = timeout_ms;
        }
        if self.accept_empty {
            eval.empty_output = pe_eval::EmptyOutputPolicy::AcceptEmptyString;
        }
        if let Some(root) = &self.goroot {
            eval.toolchain_root = Some(root.clone());
        }
        if let Some(root) = &self.module_root {
            eval.module_root = Some(root.clone());
        }
        eval
    }
}

/// Outcome of one `eval` invocation, as printed with `--json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalReport {
    pub function: String,
    pub evaluated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallbackReport {
    pub stage: String,
    pub code: String,
    pub message: String,
}

impl EvalReport {
    pub fn new(
        function: String,
        outcome: &std::result::Result<EvaluatedConstant, Fallback>,
    ) -> Self {
        match outcome {
            Ok(constant) => Self {
                function,
                evaluated: true,
                value: Some(constant.value.to_string()),
                ty: Some(constant.ty.to_string()),
                fallback: None,
            },
            Err(fallback) => Self {
                function,
                evaluated: false,
                value: None,
                ty: None,
                fallback: Some(FallbackReport {
                    stage: fallback.stage.to_string(),
                    code: fallback.kind.code().to_string(),
                    message: fallback.message.clone(),
                }),
            },
        }
    }
}

/// Execute the eval command
pub fn eval_command(args: EvalArgs, config: &CliConfig, guard: RecursionGuard) -> Result<()> {
    let eval_config = args.effective_config(config);
    eval_config.validate()?;
    let call = args.call.resolve()?;
    info!("Evaluating {}", call.callee.func);

    let manager = Arc::new(DiagnosticManager::new());
    let verbosity = eval_config.verbosity;
    let evaluator = PureCallEvaluator::go(eval_config).with_diagnostics(manager.clone());
    let outcome = evaluator.try_evaluate_detailed(&call, guard);
    emit_collected(&manager, &config.output, verbosity > 0);

    let report = EvalReport::new(call.callee.func.to_string(), &outcome);
    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| crate::CliError::InvalidInput(e.to_string()))?;
        println!("{}", json);
    } else {
        print_report(&report);
    }

    match outcome {
        Err(fallback) if args.strict => Err(fallback.into()),
        _ => Ok(()),
    }
}

fn print_report(report: &EvalReport) {
    match (&report.value, &report.fallback) {
        (Some(value), _) => {
            println!(
                "{} {} {}",
                style("Result:").green().bold(),
                style(value).cyan(),
                style(report.ty.as_deref().unwrap_or_default()).dim()
            );
        }
        (None, Some(fallback)) => {
            println!(
                "{} {} left as a runtime call",
                style("Fallback:").yellow().bold(),
                report.function
            );
            println!(
                "  {} {}",
                style(format!("[{} {}]", fallback.stage, fallback.code)).dim(),
                fallback.message
            );
        }
        (None, None) => {}
    }
}
