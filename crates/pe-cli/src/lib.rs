//! Command-line front end for the pure-call evaluator.
//!
//! Describes one call to a pure Go function, either with flags or a JSON
//! call document, and checks, synthesizes or evaluates it.

pub mod call;
pub mod commands;
pub mod config;
pub mod diagnostics;

pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum CliError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("Configuration error: {0}")]
        Config(String),

        #[error("Invalid input: {0}")]
        InvalidInput(String),

        #[error("Invalid argument `{text}`: {message}")]
        InvalidArgument { text: String, message: String },

        #[error("Evaluator setup error: {0}")]
        Setup(#[from] pe_eval::EvalError),

        #[error("Evaluation fell back to a runtime call: {0}")]
        Fallback(#[from] pe_eval::Fallback),
    }

    pub type Result<T> = std::result::Result<T, CliError>;
}

pub use error::{CliError, Result};
