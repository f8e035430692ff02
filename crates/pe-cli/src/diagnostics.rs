//! Diagnostic and error reporting utilities

use crate::{CliError, Result};
use miette::{Diagnostic, NamedSource, SourceSpan};
use pe_core::diagnostics::{DiagnosticDisplayOptions, DiagnosticManager};
use thiserror::Error;

use crate::config::OutputConfig;

/// Set up enhanced error reporting with miette
pub fn setup_error_reporting() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .map_err(|e| CliError::Config(format!("Failed to setup error reporting: {}", e)))?;

    Ok(())
}

/// Errors that have source text worth pointing at.
#[derive(Error, Debug, Diagnostic)]
pub enum PureEvalError {
    #[error("Invalid call argument: {message}")]
    #[diagnostic(
        code(pure_eval::invalid_argument),
        help("Arguments are Go literals (\"text\", 42, 1.5, true) or identifiers for runtime variables")
    )]
    InvalidArgument {
        #[source_code]
        src: NamedSource<String>,
        #[label("not a Go literal or identifier")]
        err_span: SourceSpan,
        message: String,
    },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(
        code(pure_eval::config_error),
        help("Check pure-eval.toml for correct syntax and values")
    )]
    ConfigError { message: String },
}

pub fn invalid_argument(text: &str, message: &str) -> PureEvalError {
    PureEvalError::InvalidArgument {
        src: NamedSource::new("--arg", text.to_string()),
        err_span: SourceSpan::new(0.into(), text.len()),
        message: message.to_string(),
    }
}

/// Render errors that have a richer miette form. Returns `false` when the
/// caller should report the error itself.
pub fn render_cli_error(error: &CliError) -> bool {
    let diagnostic = match error {
        CliError::InvalidArgument { text, message } => invalid_argument(text, message),
        CliError::Config(message) => PureEvalError::ConfigError {
            message: message.clone(),
        },
        _ => return false,
    };
    eprintln!("{:?}", miette::Report::new(diagnostic));
    true
}

/// Print what the evaluator recorded, in the configured template.
pub fn emit_collected(manager: &DiagnosticManager, output: &OutputConfig, verbose: bool) {
    let options = if output.plain_diagnostics {
        DiagnosticDisplayOptions::plain(verbose)
    } else {
        DiagnosticDisplayOptions::pretty(verbose)
    };
    DiagnosticManager::emit(&manager.get_diagnostics(), Some("pure-eval"), &options);
}
