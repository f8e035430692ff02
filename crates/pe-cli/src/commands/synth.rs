//! Print the caller program synthesized for a call

use std::path::PathBuf;

use clap::Args;
use pe_core::ir::ConstValue;
use pe_core::ProgramSynthesizer;
use pe_golang::GoCallerSynthesizer;
use tracing::info;

use crate::call::CallArgs;
use crate::config::CliConfig;
use crate::{CliError, Result};

/// Arguments for the synth command
#[derive(Args, Debug, Clone, Default)]
pub struct SynthArgs {
    #[command(flatten)]
    pub call: CallArgs,

    /// Write the program here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the synth command
pub fn synth_command(args: SynthArgs, _config: &CliConfig) -> Result<()> {
    let source = synthesize(&args.call)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &source)?;
            info!("Wrote program to {}", path.display());
        }
        None => print!("{}", source),
    }
    Ok(())
}

/// Synthesize the program text. Purity is not required here, but every
/// argument must be a literal.
pub fn synthesize(call_args: &CallArgs) -> Result<String> {
    let call = call_args.resolve()?;
    let values = call
        .args
        .iter()
        .enumerate()
        .map(|(index, arg)| {
            arg.as_literal().map(|lit| lit.value.clone()).ok_or_else(|| {
                CliError::InvalidInput(format!(
                    "argument {} is a runtime variable; only literals can be synthesized",
                    index + 1
                ))
            })
        })
        .collect::<Result<Vec<ConstValue>>>()?;

    let program = GoCallerSynthesizer::new()
        .synthesize(&call.callee.func, &values)
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;
    Ok(program.into_source())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn to_lower(arg: &str) -> CallArgs {
        CallArgs {
            module: Some("strings".to_string()),
            function: Some("ToLower".to_string()),
            params: vec!["s:string".to_string()],
            returns: Some("string".to_string()),
            args: vec![arg.to_string()],
            ..CallArgs::default()
        }
    }

    #[test]
    fn test_synthesize_to_lower() {
        let source = synthesize(&to_lower("\"HELLO WORLD\"")).unwrap();
        assert_eq!(
            source,
            "package main\n\nimport (\n\t\"fmt\"\n\n\ttarget \"strings\"\n)\n\nfunc main() {\n\tresult := target.ToLower(\"HELLO WORLD\")\n\tfmt.Print(result)\n}\n"
        );
    }

    #[test]
    fn test_runtime_variable_rejected() {
        let err = synthesize(&to_lower("s")).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(msg) if msg.contains("argument 1")));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.go");
        let args = SynthArgs {
            call: to_lower("\"A\""),
            output: Some(path.clone()),
        };
        synth_command(args, &CliConfig::default()).unwrap();
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("target.ToLower(\"A\")"));
    }
}
