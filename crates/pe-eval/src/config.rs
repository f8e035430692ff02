use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};
use crate::executor::ExecutorSettings;

/// What to make of a successful run that printed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyOutputPolicy {
    /// Empty stdout is a failed evaluation, whatever the return type.
    #[default]
    Reject,
    /// A zero exit status is proof enough: empty stdout is `""` for string results.
    AcceptEmptyString,
}

/// Evaluator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Master switch
    pub enabled: bool,
    /// Host diagnostic verbosity: 1 reports evaluated calls, 2 traces every stage
    pub verbosity: u8,
    /// Wall-clock budget per evaluation in milliseconds; 0 disables the limit
    pub timeout_ms: u64,
    pub empty_output: EmptyOutputPolicy,
    /// Toolchain root to prefer over the one pinned at build time
    pub toolchain_root: Option<PathBuf>,
    /// Pass the host's environment through to the child process. When off,
    /// only the variables the toolchain declares it needs are passed
    /// (`PATH`, `HOME`, `GOCACHE`... for Go)
    pub inherit_environment: bool,
    /// Parent directory for scratch workspaces (system temp dir when unset)
    pub scratch_root: Option<PathBuf>,
    /// Directory the toolchain runs in, so imports resolve through its
    /// `go.mod` (current directory when unset)
    pub module_root: Option<PathBuf>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            verbosity: 0,
            timeout_ms: 60_000,
            empty_output: EmptyOutputPolicy::Reject,
            toolchain_root: None,
            inherit_environment: true,
            scratch_root: None,
            module_root: None,
        }
    }
}

impl EvalConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }

    pub fn executor_settings(&self) -> ExecutorSettings {
        ExecutorSettings {
            timeout: self.timeout(),
            inherit_environment: self.inherit_environment,
            scratch_root: self.scratch_root.clone(),
            module_root: self.module_root.clone(),
        }
    }

    /// Check the configured directories exist.
    pub fn validate(&self) -> Result<()> {
        if let Some(root) = &self.toolchain_root {
            if !root.is_dir() {
                return Err(EvalError::ToolchainRoot(root.clone()));
            }
        }
        if let Some(root) = &self.scratch_root {
            if !root.is_dir() {
                return Err(EvalError::ScratchRoot(root.clone()));
            }
        }
        if let Some(root) = &self.module_root {
            if !root.is_dir() {
                return Err(EvalError::ModuleRoot(root.clone()));
            }
        }
        Ok(())
    }
}
