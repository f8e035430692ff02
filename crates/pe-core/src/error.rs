use std::result;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A capability boundary: the input is valid but cannot be handled.
    #[error("Unsupported: {0}")]
    Unsupported(String),
    #[error("Generic error: {0}")]
    Generic(String),
}

pub type Result<T> = result::Result<T, Error>;

impl Error {
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported(_))
    }
}
