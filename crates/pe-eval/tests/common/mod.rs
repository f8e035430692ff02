#![allow(dead_code)]

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use pe_core::ir::{ConstValue, Expr, ExprCall, FunctionRef, FunctionSig, Param, Ty};
use pe_core::{BuildAndRun, ChildEnvironment, ExitState, Invocation, ProcessOutput};
use pe_eval::{EvalConfig, PureCallEvaluator};
use pe_golang::GoCallerSynthesizer;

/// What the fake toolchain saw for one invocation.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub source_path: PathBuf,
    pub source: String,
    pub working_dir: PathBuf,
    pub env: ChildEnvironment,
}

#[derive(Debug, Clone)]
pub enum Reply {
    Output(ProcessOutput),
    SpawnError,
}

impl Reply {
    pub fn stdout(text: &str) -> Self {
        Reply::Output(ProcessOutput {
            stdout: text.as_bytes().to_vec(),
            stderr: Vec::new(),
            status: ExitState::Exited(0),
        })
    }

    pub fn status(status: ExitState, stderr: &str) -> Self {
        Reply::Output(ProcessOutput {
            stdout: Vec::new(),
            stderr: stderr.as_bytes().to_vec(),
            status,
        })
    }
}

/// A toolchain that never spawns anything: it records the request and replies
/// with a canned result.
pub struct FakeToolchain {
    reply: Reply,
    root: Option<(String, String)>,
    passthrough: &'static [&'static str],
    calls: Mutex<Vec<Recorded>>,
}

impl FakeToolchain {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            root: None,
            passthrough: &[],
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn with_passthrough(reply: Reply, passthrough: &'static [&'static str]) -> Arc<Self> {
        Arc::new(Self {
            reply,
            root: None,
            passthrough,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn with_root(reply: Reply, root: &str) -> Arc<Self> {
        Arc::new(Self {
            reply,
            root: Some(("GOROOT".to_string(), root.to_string())),
            passthrough: &[],
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }
}

impl BuildAndRun for FakeToolchain {
    fn name(&self) -> &str {
        "fake-go"
    }

    fn source_file_name(&self) -> &str {
        "main.go"
    }

    fn root_override(&self) -> Option<(String, String)> {
        self.root.clone()
    }

    fn passthrough_vars(&self) -> &[&'static str] {
        self.passthrough
    }

    fn run(&self, invocation: &Invocation) -> io::Result<ProcessOutput> {
        let source = std::fs::read_to_string(&invocation.source_path)?;
        self.calls.lock().unwrap().push(Recorded {
            source_path: invocation.source_path.clone(),
            source,
            working_dir: invocation.working_dir.clone(),
            env: invocation.env.clone(),
        });
        match &self.reply {
            Reply::Output(output) => Ok(output.clone()),
            Reply::SpawnError => Err(io::Error::new(io::ErrorKind::NotFound, "go: not found")),
        }
    }
}

pub fn add_pure() -> Arc<FunctionSig> {
    Arc::new(
        FunctionSig::new(
            FunctionRef::new("example.com/m/calc", "addPure"),
            vec![Param::new("a", Ty::int()), Param::new("b", Ty::int())],
            Ty::int(),
        )
        .pure(),
    )
}

pub fn to_lower() -> Arc<FunctionSig> {
    Arc::new(
        FunctionSig::new(
            FunctionRef::new("strings", "ToLower"),
            vec![Param::new("s", Ty::string())],
            Ty::string(),
        )
        .pure(),
    )
}

pub fn add_pure_call(a: i64, b: i64) -> ExprCall {
    ExprCall::new(
        add_pure(),
        vec![Expr::value(ConstValue::int(a)), Expr::value(ConstValue::int(b))],
    )
}

pub fn evaluator(config: EvalConfig, toolchain: Arc<FakeToolchain>) -> PureCallEvaluator {
    PureCallEvaluator::new(config, Arc::new(GoCallerSynthesizer::new()), toolchain)
}

/// Configuration whose scratch directories land under `scratch`.
pub fn config_in(scratch: &std::path::Path) -> EvalConfig {
    EvalConfig {
        scratch_root: Some(scratch.to_path_buf()),
        ..EvalConfig::default()
    }
}

/// Write a Go module with the given `go.mod` module path and package sources.
pub fn write_module(dir: &std::path::Path, module: &str, files: &[(&str, &str)]) {
    std::fs::write(dir.join("go.mod"), format!("module {}\n\ngo 1.18\n", module)).unwrap();
    for (path, source) in files {
        let path = dir.join(path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, source).unwrap();
    }
}

pub fn leftover_entries(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}
