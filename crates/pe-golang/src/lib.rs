//! Go binding for the pure-call evaluator: caller synthesis and the `go run` toolchain.

pub mod literal;
pub mod synthesizer;
pub mod toolchain;

pub use literal::{parse_literal, quote_string, render_value};
pub use synthesizer::GoCallerSynthesizer;
pub use toolchain::GoToolchain;
