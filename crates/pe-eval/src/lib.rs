//! Speculative out-of-process evaluation of calls to pure functions.
//!
//! A call whose callee is annotated pure and whose arguments are all literals
//! is evaluated ahead of time: a tiny caller program is synthesized, built and
//! run in a scratch directory by the host toolchain, and its stdout becomes a
//! typed literal that replaces the call. Any failure leaves the call alone;
//! an ordinary runtime call is always a correct fallback.

pub mod config;
pub mod coordinator;
pub mod eligibility;
pub mod error;
pub mod executor;
pub mod fallback;
pub mod guard;
pub mod materialize;
pub mod pipeline;

pub use config::{EmptyOutputPolicy, EvalConfig};
pub use coordinator::PureCallEvaluator;
pub use eligibility::{check_eligibility, is_eligible, ConstantArgument, Ineligibility};
pub use error::EvalError;
pub use executor::{
    CapturedOutput, ExecutionFailure, ExecutionOutcome, ExecutorSettings, FailureReason,
    IsolatedExecutor, ScratchWorkspace,
};
pub use fallback::{Fallback, FallbackKind};
pub use guard::{RecursionGuard, RECURSION_GUARD_VAR};
pub use materialize::{materialize, EvaluatedConstant, MaterializeError};
