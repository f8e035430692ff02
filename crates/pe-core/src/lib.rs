#[macro_use]
pub mod macros;

pub mod diagnostics;
pub mod error;
pub mod ir;
pub mod span;
pub mod synth;
pub mod toolchain;

pub use synth::{ProgramSynthesizer, SynthesizedProgram};
pub use toolchain::{BuildAndRun, ChildEnvironment, ExitState, Invocation, ProcessOutput};

// Alias for error types
pub type Error = crate::error::Error;
pub type Result<T> = crate::error::Result<T>;
