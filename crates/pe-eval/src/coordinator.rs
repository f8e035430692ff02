//! Orchestrating one evaluation attempt: check, synthesize, run, materialize.

use std::sync::Arc;

use itertools::Itertools;
use pe_core::diagnostics::{Diagnostic, DiagnosticManager};
use pe_core::ir::{ConstValue, Expr, ExprCall};
use pe_core::{BuildAndRun, ProgramSynthesizer, SynthesizedProgram};
use pe_golang::{GoCallerSynthesizer, GoToolchain};
use tracing::{debug, info};

use crate::config::{EmptyOutputPolicy, EvalConfig};
use crate::eligibility::{check_eligibility, ConstantArgument};
use crate::executor::{ExecutionOutcome, IsolatedExecutor};
use crate::fallback::{Fallback, FallbackKind};
use crate::guard::RecursionGuard;
use crate::materialize::{materialize, EvaluatedConstant};
use crate::pipeline::{EvalPipeline, EvalPipelineBuilder, EvalStage, StageTrace};

pub const STAGE_ELIGIBILITY: &str = "eligibility";
pub const STAGE_SYNTHESIS: &str = "synthesis";
pub const STAGE_EXECUTION: &str = "execution";
pub const STAGE_MATERIALIZATION: &str = "materialization";
const STAGE_COORDINATOR: &str = "pure-eval";

struct EligibleCall {
    call: ExprCall,
    args: Vec<ConstantArgument>,
}

struct SynthesizedCall {
    call: ExprCall,
    program: SynthesizedProgram,
}

struct ExecutedCall {
    call: ExprCall,
    outcome: ExecutionOutcome,
}

struct EligibilityStage {
    synthesizer: Arc<dyn ProgramSynthesizer>,
}

impl EligibilityStage {
    fn render(&self, arg: &ConstantArgument) -> String {
        self.synthesizer
            .render_literal(&arg.value)
            .unwrap_or_else(|_| arg.value.to_string())
    }
}

impl EvalStage for EligibilityStage {
    type SrcCtx = ExprCall;
    type DstCtx = EligibleCall;

    fn name(&self) -> &'static str {
        STAGE_ELIGIBILITY
    }

    fn run(&self, call: ExprCall, trace: &mut StageTrace) -> Result<EligibleCall, Fallback> {
        match check_eligibility(&call) {
            Ok(args) => {
                trace.note(format!(
                    "{} is eligible with arguments ({})",
                    call.callee.func,
                    args.iter().map(|a| self.render(a)).join(", ")
                ));
                Ok(EligibleCall { call, args })
            }
            Err(reason) => Err(Fallback::new(
                STAGE_ELIGIBILITY,
                FallbackKind::Ineligible,
                reason.to_string(),
            )),
        }
    }
}

struct SynthesisStage {
    synthesizer: Arc<dyn ProgramSynthesizer>,
}

impl EvalStage for SynthesisStage {
    type SrcCtx = EligibleCall;
    type DstCtx = SynthesizedCall;

    fn name(&self) -> &'static str {
        STAGE_SYNTHESIS
    }

    fn run(
        &self,
        eligible: EligibleCall,
        trace: &mut StageTrace,
    ) -> Result<SynthesizedCall, Fallback> {
        let values: Vec<ConstValue> = eligible.args.into_iter().map(|a| a.value).collect();
        let program = self
            .synthesizer
            .synthesize(&eligible.call.callee.func, &values)
            .map_err(|err| {
                Fallback::new(
                    STAGE_SYNTHESIS,
                    FallbackKind::SynthesisUnsupported,
                    err.to_string(),
                )
            })?;
        trace.note(format!(
            "generated {} helper program:\n{}",
            self.synthesizer.language(),
            program.source()
        ));
        Ok(SynthesizedCall {
            call: eligible.call,
            program,
        })
    }
}

struct ExecutionStage {
    executor: IsolatedExecutor,
}

impl EvalStage for ExecutionStage {
    type SrcCtx = SynthesizedCall;
    type DstCtx = ExecutedCall;

    fn name(&self) -> &'static str {
        STAGE_EXECUTION
    }

    fn run(
        &self,
        synthesized: SynthesizedCall,
        trace: &mut StageTrace,
    ) -> Result<ExecutedCall, Fallback> {
        match self.executor.run(&synthesized.program) {
            ExecutionOutcome::Failed(failure) => {
                trace.note(format!("helper program error: {}", failure));
                Err(Fallback::new(
                    STAGE_EXECUTION,
                    FallbackKind::ExecutionFailure,
                    failure.reason.to_string(),
                ))
            }
            outcome => Ok(ExecutedCall {
                call: synthesized.call,
                outcome,
            }),
        }
    }
}

struct MaterializationStage {
    policy: EmptyOutputPolicy,
}

impl EvalStage for MaterializationStage {
    type SrcCtx = ExecutedCall;
    type DstCtx = EvaluatedConstant;

    fn name(&self) -> &'static str {
        STAGE_MATERIALIZATION
    }

    fn run(
        &self,
        executed: ExecutedCall,
        _trace: &mut StageTrace,
    ) -> Result<EvaluatedConstant, Fallback> {
        materialize(
            &executed.outcome,
            &executed.call.callee.ret,
            executed.call.span,
            self.policy,
        )
        .map_err(|err| {
            Fallback::new(
                STAGE_MATERIALIZATION,
                FallbackKind::MaterializationFailure,
                err.to_string(),
            )
        })
    }
}

/// Evaluates calls to pure functions ahead of time, falling back to leaving
/// the call alone whenever any stage cannot complete.
///
/// Holds no state between attempts: evaluating the same call twice does the
/// same work twice and reaches the same verdict.
pub struct PureCallEvaluator {
    config: EvalConfig,
    pipeline: EvalPipeline<ExprCall, EvaluatedConstant>,
    diagnostics: Option<Arc<DiagnosticManager>>,
}

impl PureCallEvaluator {
    pub fn new(
        config: EvalConfig,
        synthesizer: Arc<dyn ProgramSynthesizer>,
        toolchain: Arc<dyn BuildAndRun>,
    ) -> Self {
        let executor = IsolatedExecutor::new(toolchain, config.executor_settings());
        let pipeline = EvalPipelineBuilder::new()
            .add_stage(EligibilityStage {
                synthesizer: synthesizer.clone(),
            })
            .add_stage(SynthesisStage { synthesizer })
            .add_stage(ExecutionStage { executor })
            .add_stage(MaterializationStage {
                policy: config.empty_output,
            })
            .build();
        Self {
            config,
            pipeline,
            diagnostics: None,
        }
    }

    /// Evaluator for Go callees, using the `go` toolchain found from the configuration.
    pub fn go(config: EvalConfig) -> Self {
        let toolchain = GoToolchain::locate(config.toolchain_root.as_deref());
        Self::new(config, Arc::new(GoCallerSynthesizer::new()), Arc::new(toolchain))
    }

    pub fn with_diagnostics(mut self, manager: Arc<DiagnosticManager>) -> Self {
        self.diagnostics = Some(manager);
        self
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Replacement literal for `call`, or `None` to keep the runtime call.
    pub fn try_evaluate(&self, call: &ExprCall, guard: RecursionGuard) -> Option<Expr> {
        self.try_evaluate_detailed(call, guard)
            .ok()
            .map(EvaluatedConstant::into_expr)
    }

    /// Like [`Self::try_evaluate`], but reports why the call was left alone.
    pub fn try_evaluate_detailed(
        &self,
        call: &ExprCall,
        guard: RecursionGuard,
    ) -> Result<EvaluatedConstant, Fallback> {
        // Inside a helper program: never start another evaluation.
        if guard.is_active() {
            return Err(Fallback::new(
                STAGE_COORDINATOR,
                FallbackKind::Reentrant,
                "recursion guard is active",
            ));
        }
        if !self.config.enabled {
            return Err(Fallback::new(
                STAGE_COORDINATOR,
                FallbackKind::Disabled,
                "compile-time evaluation is disabled",
            ));
        }

        let verbosity = self.config.verbosity;
        let func = &call.callee.func;
        if verbosity > 1 {
            debug!("attempting compile-time evaluation of {}", func);
        }

        let mut trace = StageTrace::default();
        let result = self.pipeline.run(call.clone(), &mut trace, verbosity);

        match &result {
            Ok(constant) => {
                if verbosity > 0 {
                    info!(
                        "compile-time evaluated {} to constant {}",
                        func, constant.value
                    );
                }
                self.record(
                    Diagnostic::info(format!("evaluated {} to {}", func, constant.value))
                        .with_span(call.span)
                        .with_source_context(STAGE_COORDINATOR),
                    trace,
                );
            }
            Err(fallback) => {
                if verbosity > 1 {
                    debug!("leaving {} as a runtime call: {}", func, fallback);
                }
                let message = format!("left {} as a runtime call: {}", func, fallback.message);
                self.record(
                    Diagnostic::info(message)
                        .with_span(call.span)
                        .with_source_context(fallback.stage)
                        .with_code(fallback.kind.code()),
                    trace,
                );
            }
        }
        result
    }

    fn record(&self, summary: Diagnostic, trace: StageTrace) {
        let Some(manager) = &self.diagnostics else {
            return;
        };
        if self.config.verbosity > 1 {
            for item in trace.into_items() {
                manager.add_diagnostic(item);
            }
        }
        manager.add_diagnostic(summary);
    }
}
