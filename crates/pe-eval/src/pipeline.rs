//! Typed stage chaining for the evaluator.

use std::marker::PhantomData;

use pe_core::diagnostics::Diagnostic;
use tracing::debug;

use crate::fallback::Fallback;

/// Trace notes collected while stages run; observational only.
#[derive(Debug, Default, Clone)]
pub struct StageTrace {
    items: Vec<Diagnostic>,
    emitted: usize,
}

impl StageTrace {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn note(&mut self, message: impl Into<String>) {
        self.push(Diagnostic::info(message));
    }

    /// Log the notes added since the last call, when the host asked for stage traces.
    pub fn emit_stage(&mut self, stage: &'static str, verbosity: u8) {
        if verbosity > 1 {
            for item in &self.items[self.emitted..] {
                debug!(stage, "{}", item);
            }
        }
        self.emitted = self.items.len();
    }

    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Diagnostic> {
        self.items
    }
}

pub trait EvalStage: Send + Sync {
    type SrcCtx;
    type DstCtx;

    fn name(&self) -> &'static str;
    fn run(&self, context: Self::SrcCtx, trace: &mut StageTrace) -> Result<Self::DstCtx, Fallback>;
}

type StageFn<Src, Dst> =
    Box<dyn Fn(Src, &mut StageTrace, u8) -> Result<Dst, Fallback> + Send + Sync>;

/// A chain of stages; the first stage to fall back ends the run.
pub struct EvalPipeline<Src, Dst> {
    run: StageFn<Src, Dst>,
}

impl<Src, Dst> EvalPipeline<Src, Dst> {
    pub fn run(&self, context: Src, trace: &mut StageTrace, verbosity: u8) -> Result<Dst, Fallback> {
        (self.run)(context, trace, verbosity)
    }
}

pub struct EvalPipelineBuilder<Src, Dst> {
    pipeline: EvalPipeline<Src, Dst>,
    _marker: PhantomData<(Src, Dst)>,
}

impl<Src> EvalPipelineBuilder<Src, Src> {
    pub fn new() -> Self {
        let run = |context: Src, _trace: &mut StageTrace, _verbosity: u8| Ok(context);
        Self {
            pipeline: EvalPipeline { run: Box::new(run) },
            _marker: PhantomData,
        }
    }
}

impl<Src> Default for EvalPipelineBuilder<Src, Src> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Src, Mid> EvalPipelineBuilder<Src, Mid> {
    pub fn add_stage<Next, S>(self, stage: S) -> EvalPipelineBuilder<Src, Next>
    where
        S: EvalStage<SrcCtx = Mid, DstCtx = Next> + 'static,
        Src: 'static,
        Mid: 'static,
        Next: 'static,
    {
        let name = stage.name();
        let previous = self.pipeline.run;
        let run = move |context: Src, trace: &mut StageTrace, verbosity: u8| {
            let mid = previous(context, trace, verbosity)?;
            if verbosity > 1 {
                debug!(stage = name, "running stage");
            }
            let result = stage.run(mid, trace);
            trace.emit_stage(name, verbosity);
            result
        };

        EvalPipelineBuilder {
            pipeline: EvalPipeline { run: Box::new(run) },
            _marker: PhantomData,
        }
    }

    pub fn build(self) -> EvalPipeline<Src, Mid> {
        self.pipeline
    }
}
