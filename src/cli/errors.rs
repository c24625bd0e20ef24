//! CLI-specific error types
//!
//! Every lower-level error is flattened into a code and a message; the
//! process prints `CODE: message` and exits non-zero.

use std::fmt;
use std::io;

use crate::api::ApiError;
use crate::blob::BlobError;
use crate::config::ConfigError;
use crate::display::DisplayError;
use crate::store::StoreError;

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: &'static str,
    message: String,
}

impl CliError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// I/O error (stdin/stdout or an input file)
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new("DOCSTORE_CLI_IO_ERROR", msg)
    }

    /// Invalid command-line input
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new("DOCSTORE_CLI_INVALID_INPUT", msg)
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

macro_rules! from_coded_error {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for CliError {
                fn from(e: $source) -> Self {
                    Self::new(e.code(), e.to_string())
                }
            }
        )+
    };
}

from_coded_error!(StoreError, ConfigError, BlobError, DisplayError, ApiError);

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_keeps_code() {
        let err: CliError = StoreError::TableNotFound("ghost".into()).into();
        assert_eq!(err.code(), "DOCSTORE_TABLE_NOT_FOUND");
        assert_eq!(
            err.to_string(),
            "DOCSTORE_TABLE_NOT_FOUND: Table 'ghost' does not exist."
        );
    }

    #[test]
    fn test_display_error_passes_store_code() {
        let err: CliError = DisplayError::from(StoreError::TableNotFound("t".into())).into();
        assert_eq!(err.code(), "DOCSTORE_TABLE_NOT_FOUND");
    }
}
