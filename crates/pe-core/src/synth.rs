use crate::error::Result;
use crate::ir::{ConstValue, FunctionRef};

/// Source text of a complete standalone compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedProgram {
    source: String,
}

impl SynthesizedProgram {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn into_source(self) -> String {
        self.source
    }
}

/// Builds a caller program for one target function.
///
/// Implementations only construct a caller: they import the function's owning
/// module, invoke the function with the given literals, and print the raw
/// result to stdout. Anything they cannot render is reported as
/// [`crate::Error::Unsupported`].
pub trait ProgramSynthesizer: Send + Sync {
    fn language(&self) -> &str;

    fn synthesize(&self, func: &FunctionRef, args: &[ConstValue]) -> Result<SynthesizedProgram>;

    /// The constant as a literal of the target language.
    fn render_literal(&self, value: &ConstValue) -> Result<String>;
}
