//! Unified error type for the conversion pipeline.
//!
//! Structural oddities (duplicate slack buses, missing reactive series) are
//! not errors; they flow through [`crate::diagnostics::Diagnostics`] as
//! warnings. `CaseError` is reserved for conditions that must stop the run:
//! unreadable input, malformed identifiers, series that the selected output
//! mode requires but the model does not carry.

use thiserror::Error;

/// Fatal error raised by the loader or the conversion pipeline.
#[derive(Error, Debug)]
pub enum CaseError {
    /// I/O errors (file access, directory creation)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration errors (invalid constants, mode/input mismatch)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network structure errors (dangling references, malformed identifiers)
    #[error("Network error: {0}")]
    Network(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience alias for Results using CaseError.
pub type CaseResult<T> = Result<T, CaseError>;

impl From<anyhow::Error> for CaseError {
    fn from(err: anyhow::Error) -> Self {
        CaseError::Other(err.to_string())
    }
}

impl From<String> for CaseError {
    fn from(s: String) -> Self {
        CaseError::Other(s)
    }
}

impl From<&str> for CaseError {
    fn from(s: &str) -> Self {
        CaseError::Other(s.to_string())
    }
}
