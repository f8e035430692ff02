use std::path::PathBuf;

use thiserror::Error;

/// Problems with the evaluator's own setup. Evaluation attempts never fail
/// with these; they are reported before an evaluator is built.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toolchain root {0} is not a directory")]
    ToolchainRoot(PathBuf),

    #[error("scratch root {0} is not a directory")]
    ScratchRoot(PathBuf),

    #[error("module root {0} is not a directory")]
    ModuleRoot(PathBuf),
}

pub type Result<T> = std::result::Result<T, EvalError>;
