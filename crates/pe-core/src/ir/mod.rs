//! The slice of the host compiler's IR the evaluator reads and produces.
//!
//! Call sites arrive from the host's walk phase already resolved: the callee
//! signature is attached, parameter types are known, and the purity flag has
//! been established by the host's annotation handling. Nothing in here is
//! mutated by the evaluator; a successful evaluation produces a new literal
//! node and leaves the call node alone.

mod expr;
mod func;
mod ty;
mod value;

pub use expr::*;
pub use func::*;
pub use ty::*;
pub use value::*;
