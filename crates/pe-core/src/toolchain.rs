//! The build-and-run collaborator and the process plumbing shared by its
//! implementations.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Environment for one child process, built explicitly per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEnvironment {
    pub inherit_ambient: bool,
    pub vars: BTreeMap<String, String>,
}

impl Default for ChildEnvironment {
    fn default() -> Self {
        Self::inherit()
    }
}

impl ChildEnvironment {
    pub fn inherit() -> Self {
        Self {
            inherit_ambient: true,
            vars: BTreeMap::new(),
        }
    }

    pub fn clean() -> Self {
        Self {
            inherit_ambient: false,
            vars: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn apply(&self, cmd: &mut Command) {
        if !self.inherit_ambient {
            cmd.env_clear();
        }
        cmd.envs(&self.vars);
    }
}

/// One request to build and run a source file.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub source_path: PathBuf,
    pub working_dir: PathBuf,
    pub env: ChildEnvironment,
    /// Wall-clock budget; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    Exited(i32),
    /// Terminated by a signal (unix) or without an exit code.
    Signalled(Option<i32>),
    TimedOut,
}

impl ExitState {
    pub fn success(&self) -> bool {
        matches!(self, ExitState::Exited(0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub status: ExitState,
}

impl ProcessOutput {
    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// A toolchain that can build and run a single source file as a child process.
pub trait BuildAndRun: Send + Sync {
    fn name(&self) -> &str;

    /// File name the synthesized source must be written under.
    fn source_file_name(&self) -> &str;

    /// Environment variable pinning the toolchain root, when the toolchain was
    /// resolved from a known root.
    fn root_override(&self) -> Option<(String, String)>;

    /// Host variables the toolchain cannot work without. They are copied into
    /// a clean child environment.
    fn passthrough_vars(&self) -> &[&'static str] {
        &[]
    }

    fn run(&self, invocation: &Invocation) -> std::io::Result<ProcessOutput>;
}

/// Spawn `cmd` with piped output and wait for it, killing it once `timeout` expires.
///
/// On unix the child leads its own process group and expiry kills the whole
/// group, so programs started by the child (the built binary under `go run`)
/// die with it.
pub fn run_with_timeout(
    mut cmd: Command,
    timeout: Option<Duration>,
) -> std::io::Result<ProcessOutput> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt as _;
        cmd.process_group(0);
    }
    let mut child = cmd.spawn()?;

    // Drain both pipes concurrently so a chatty child cannot block on a full pipe.
    let stdout_thread = child.stdout.take().map(spawn_reader);
    let stderr_thread = child.stderr.take().map(spawn_reader);

    let (status, timed_out) = wait_with_deadline(&mut child, timeout)?;

    // The group is gone once killed, so every write end of the pipes is closed.
    let stdout = join_reader(stdout_thread)?;
    let stderr = join_reader(stderr_thread)?;
    Ok(ProcessOutput {
        stdout,
        stderr,
        status: if timed_out {
            ExitState::TimedOut
        } else {
            exit_state(status)
        },
    })
}

fn spawn_reader<R: Read + Send + 'static>(
    mut reader: R,
) -> thread::JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn join_reader(
    handle: Option<thread::JoinHandle<std::io::Result<Vec<u8>>>>,
) -> std::io::Result<Vec<u8>> {
    match handle {
        Some(handle) => handle.join().unwrap_or_else(|_| Ok(Vec::new())),
        None => Ok(Vec::new()),
    }
}

fn wait_with_deadline(
    child: &mut Child,
    timeout: Option<Duration>,
) -> std::io::Result<(ExitStatus, bool)> {
    let Some(timeout) = timeout else {
        return Ok((child.wait()?, false));
    };
    let deadline = Instant::now().checked_add(timeout);

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok((status, false));
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            kill_tree(child);
            let status = child.wait()?;
            return Ok((status, true));
        }
        thread::sleep(Duration::from_millis(5));
    }
}

#[cfg(unix)]
fn kill_tree(child: &mut Child) {
    // The child's pid is its process group id.
    if let Ok(pgid) = libc::pid_t::try_from(child.id()) {
        unsafe {
            libc::kill(-pgid, libc::SIGKILL);
        }
    }
    let _ = child.kill();
}

#[cfg(not(unix))]
fn kill_tree(child: &mut Child) {
    let _ = child.kill();
}

fn exit_state(status: ExitStatus) -> ExitState {
    if let Some(code) = status.code() {
        return ExitState::Exited(code);
    }
    #[cfg(unix)]
    let signal = {
        use std::os::unix::process::ExitStatusExt as _;
        status.signal()
    };
    #[cfg(not(unix))]
    let signal: Option<i32> = None;
    ExitState::Signalled(signal)
}
