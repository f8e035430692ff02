//! Locating and driving the `go` command.

use std::path::{Path, PathBuf};
use std::process::Command;

use pe_core::toolchain::run_with_timeout;
use pe_core::{BuildAndRun, Invocation, ProcessOutput};
use tracing::debug;

/// Go root this crate was built against, when the build pinned one.
pub const PINNED_GOROOT: Option<&str> = option_env!("PURE_EVAL_GOROOT");

pub const GOROOT_VAR: &str = "GOROOT";

/// What `go run` needs from the host to find itself, its build cache and the
/// module cache when the rest of the environment is withheld.
pub const PASSTHROUGH_VARS: &[&str] = &[
    "PATH",
    "HOME",
    "TMPDIR",
    "XDG_CACHE_HOME",
    "GOCACHE",
    "GOPATH",
    "GOMODCACHE",
    "GOPROXY",
    "GOFLAGS",
];

/// The `go` command, run as `go run <file>`.
#[derive(Clone, Debug)]
pub struct GoToolchain {
    binary: PathBuf,
    root: Option<PathBuf>,
}

impl GoToolchain {
    /// Prefer `<root>/bin/go` under the pinned root (the explicit one, else
    /// [`PINNED_GOROOT`]); fall back to whatever `go` is on `PATH`.
    pub fn locate(pinned_root: Option<&Path>) -> Self {
        let root = pinned_root
            .map(Path::to_path_buf)
            .or_else(|| PINNED_GOROOT.map(PathBuf::from));

        if let Some(root) = root {
            let candidate = root.join("bin").join(go_binary_name());
            if candidate.is_file() {
                debug!("using pinned go toolchain at {}", candidate.display());
                return Self {
                    binary: candidate,
                    root: Some(root),
                };
            }
            debug!(
                "pinned go root {} has no go binary, falling back to PATH",
                root.display()
            );
        }

        // Spawning the bare name still searches PATH, and a miss surfaces as a spawn error.
        let binary = which::which("go").unwrap_or_else(|_| PathBuf::from(go_binary_name()));
        Self { binary, root: None }
    }

    pub fn with_binary(binary: impl Into<PathBuf>, root: Option<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            root,
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }
}

impl BuildAndRun for GoToolchain {
    fn name(&self) -> &str {
        "go"
    }

    fn source_file_name(&self) -> &str {
        "main.go"
    }

    fn root_override(&self) -> Option<(String, String)> {
        self.root
            .as_ref()
            .map(|root| (GOROOT_VAR.to_string(), root.display().to_string()))
    }

    fn passthrough_vars(&self) -> &[&'static str] {
        PASSTHROUGH_VARS
    }

    fn run(&self, invocation: &Invocation) -> std::io::Result<ProcessOutput> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("run")
            .arg(&invocation.source_path)
            .current_dir(&invocation.working_dir);
        invocation.env.apply(&mut cmd);
        run_with_timeout(cmd, invocation.timeout)
    }
}

fn go_binary_name() -> String {
    format!("go{}", std::env::consts::EXE_SUFFIX)
}
