use std::ffi::OsStr;

use pe_core::ChildEnvironment;

/// Variable set in a synthesized program's environment. A process that sees it
/// is running on behalf of an evaluation and must not start another one.
pub const RECURSION_GUARD_VAR: &str = "PURE_EVAL_HELPER";

/// Whether this process is itself running inside an evaluation.
///
/// Read once at the process boundary and passed down explicitly; the evaluator
/// never consults or mutates the process environment on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecursionGuard {
    #[default]
    Inactive,
    Active,
}

impl RecursionGuard {
    pub fn from_env() -> Self {
        Self::from_value(std::env::var_os(RECURSION_GUARD_VAR).as_deref())
    }

    /// Any non-empty value activates the guard.
    pub fn from_value(value: Option<&OsStr>) -> Self {
        match value {
            Some(v) if !v.is_empty() => RecursionGuard::Active,
            _ => RecursionGuard::Inactive,
        }
    }

    pub fn is_active(self) -> bool {
        self == RecursionGuard::Active
    }

    /// Arm the guard in a child's environment.
    pub fn arm(env: &mut ChildEnvironment) {
        env.set(RECURSION_GUARD_VAR, "1");
    }
}
