//! Running a synthesized program in a scratch directory as a child process.

use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use pe_core::{BuildAndRun, ChildEnvironment, ExitState, Invocation, SynthesizedProgram};
use tempfile::TempDir;
use tracing::{debug, warn};

use crate::guard::RecursionGuard;

/// A uniquely named temporary directory holding exactly one source file.
///
/// The directory and everything in it is removed when the workspace is closed
/// or dropped, whichever comes first.
#[derive(Debug)]
pub struct ScratchWorkspace {
    dir: TempDir,
}

impl ScratchWorkspace {
    pub const PREFIX: &'static str = "pure-eval-";

    pub fn create(parent: Option<&Path>) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(Self::PREFIX);
        let dir = match parent {
            Some(parent) => builder.tempdir_in(parent)?,
            None => builder.tempdir()?,
        };
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_source(&self, file_name: &str, source: &str) -> io::Result<PathBuf> {
        let path = self.dir.path().join(file_name);
        std::fs::write(&path, source)?;
        Ok(path)
    }

    /// Remove the directory now, reporting (not propagating) removal problems.
    pub fn close(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(err) = self.dir.close() {
            warn!(
                "failed to remove scratch workspace {}: {}",
                path.display(),
                err
            );
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorSettings {
    pub timeout: Option<Duration>,
    pub inherit_environment: bool,
    pub scratch_root: Option<PathBuf>,
    /// Directory the toolchain runs in; imports resolve through the module
    /// found from here. The host's current directory when unset.
    pub module_root: Option<PathBuf>,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(60)),
            inherit_environment: true,
            scratch_root: None,
            module_root: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: Vec<u8>,
    pub stderr: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Creating the scratch directory or writing the source failed.
    Workspace(String),
    Spawn(String),
    NonZeroExit(i32),
    Signalled(Option<i32>),
    TimedOut,
}

impl Display for FailureReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Workspace(err) => write!(f, "scratch workspace error: {}", err),
            FailureReason::Spawn(err) => write!(f, "failed to spawn toolchain: {}", err),
            FailureReason::NonZeroExit(code) => write!(f, "exit status {}", code),
            FailureReason::Signalled(Some(signal)) => write!(f, "killed by signal {}", signal),
            FailureReason::Signalled(None) => write!(f, "terminated without exit status"),
            FailureReason::TimedOut => write!(f, "timed out"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionFailure {
    pub reason: FailureReason,
    pub stderr: String,
}

impl Display for ExecutionFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)?;
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            write!(f, "\nstderr: {}", stderr)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Captured(CapturedOutput),
    Failed(ExecutionFailure),
}

impl ExecutionOutcome {
    fn failed(reason: FailureReason, stderr: impl Into<String>) -> Self {
        ExecutionOutcome::Failed(ExecutionFailure {
            reason,
            stderr: stderr.into(),
        })
    }
}

/// Builds and runs one synthesized program per call to [`IsolatedExecutor::run`].
#[derive(Clone)]
pub struct IsolatedExecutor {
    toolchain: Arc<dyn BuildAndRun>,
    settings: ExecutorSettings,
}

impl IsolatedExecutor {
    pub fn new(toolchain: Arc<dyn BuildAndRun>, settings: ExecutorSettings) -> Self {
        Self {
            toolchain,
            settings,
        }
    }

    pub fn settings(&self) -> &ExecutorSettings {
        &self.settings
    }

    /// The child's environment: the ambient one or just the toolchain's
    /// required variables, the toolchain root when it is pinned, and the armed
    /// recursion guard.
    pub fn child_environment(&self) -> ChildEnvironment {
        let mut env = if self.settings.inherit_environment {
            ChildEnvironment::inherit()
        } else {
            let mut env = ChildEnvironment::clean();
            for key in self.toolchain.passthrough_vars() {
                if let Ok(value) = std::env::var(key) {
                    env.set(*key, value);
                }
            }
            env
        };
        if let Some((key, value)) = self.toolchain.root_override() {
            env.set(key, value);
        }
        RecursionGuard::arm(&mut env);
        env
    }

    /// The configured module root, else the host's current directory.
    pub fn working_dir(&self) -> io::Result<PathBuf> {
        match &self.settings.module_root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir(),
        }
    }

    pub fn run(&self, program: &SynthesizedProgram) -> ExecutionOutcome {
        let scratch_root = self.settings.scratch_root.as_deref();
        let workspace = match ScratchWorkspace::create(scratch_root) {
            Ok(workspace) => workspace,
            Err(err) => {
                return ExecutionOutcome::failed(FailureReason::Workspace(err.to_string()), "")
            }
        };
        let outcome = self.run_in(&workspace, program);
        workspace.close();
        outcome
    }

    fn run_in(
        &self,
        workspace: &ScratchWorkspace,
        program: &SynthesizedProgram,
    ) -> ExecutionOutcome {
        let source_path =
            match workspace.write_source(self.toolchain.source_file_name(), program.source()) {
                Ok(path) => path,
                Err(err) => {
                    return ExecutionOutcome::failed(FailureReason::Workspace(err.to_string()), "")
                }
            };

        let working_dir = match self.working_dir() {
            Ok(dir) => dir,
            Err(err) => {
                return ExecutionOutcome::failed(FailureReason::Workspace(err.to_string()), "")
            }
        };

        let invocation = Invocation {
            source_path,
            working_dir,
            env: self.child_environment(),
            timeout: self.settings.timeout,
        };
        debug!(
            "running {} run {}",
            self.toolchain.name(),
            invocation.source_path.display()
        );

        let output = match self.toolchain.run(&invocation) {
            Ok(output) => output,
            Err(err) => return ExecutionOutcome::failed(FailureReason::Spawn(err.to_string()), ""),
        };
        let stderr = output.stderr_lossy();
        match output.status {
            ExitState::Exited(0) => ExecutionOutcome::Captured(CapturedOutput {
                stdout: output.stdout,
                stderr,
            }),
            ExitState::Exited(code) => {
                ExecutionOutcome::failed(FailureReason::NonZeroExit(code), stderr)
            }
            ExitState::Signalled(signal) => {
                ExecutionOutcome::failed(FailureReason::Signalled(signal), stderr)
            }
            ExitState::TimedOut => ExecutionOutcome::failed(FailureReason::TimedOut, stderr),
        }
    }
}
