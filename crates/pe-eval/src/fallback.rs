use std::fmt::{Display, Formatter};

/// Why an evaluation attempt left the call as an ordinary runtime call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackKind {
    /// Evaluation is switched off in the configuration.
    Disabled,
    /// The recursion guard is active in this process.
    Reentrant,
    Ineligible,
    SynthesisUnsupported,
    ExecutionFailure,
    MaterializationFailure,
}

impl FallbackKind {
    pub fn code(self) -> &'static str {
        match self {
            FallbackKind::Disabled => "PE000",
            FallbackKind::Reentrant => "PE001",
            FallbackKind::Ineligible => "PE002",
            FallbackKind::SynthesisUnsupported => "PE003",
            FallbackKind::ExecutionFailure => "PE004",
            FallbackKind::MaterializationFailure => "PE005",
        }
    }
}

impl Display for FallbackKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            FallbackKind::Disabled => "evaluation disabled",
            FallbackKind::Reentrant => "nested evaluation blocked",
            FallbackKind::Ineligible => "ineligible call",
            FallbackKind::SynthesisUnsupported => "synthesis unsupported",
            FallbackKind::ExecutionFailure => "execution failed",
            FallbackKind::MaterializationFailure => "materialization failed",
        };
        f.write_str(text)
    }
}

/// A locally recovered failure. Never surfaced as a compile error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("[{stage}] {kind}: {message}")]
pub struct Fallback {
    pub stage: &'static str,
    pub kind: FallbackKind,
    pub message: String,
}

impl Fallback {
    pub fn new(stage: &'static str, kind: FallbackKind, message: impl Into<String>) -> Self {
        Self {
            stage,
            kind,
            message: message.into(),
        }
    }
}
