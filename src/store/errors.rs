//! Store error types
//!
//! Error codes:
//! - DOCSTORE_TABLE_NOT_FOUND
//! - DOCSTORE_ROW_NOT_FOUND
//! - DOCSTORE_CORRUPT_SNAPSHOT
//! - DOCSTORE_IO_ERROR
//! - DOCSTORE_INVALID_NAME

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Table '{0}' does not exist.")]
    TableNotFound(String),

    #[error("Row with id '{row_id}' not found in table '{table}'.")]
    RowNotFound { table: String, row_id: String },

    #[error("Corrupt snapshot at {path}: {reason}")]
    CorruptSnapshot { path: PathBuf, reason: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid store name '{0}'")]
    InvalidName(String),
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn corrupt(path: &Path, reason: impl Into<String>) -> Self {
        StoreError::CorruptSnapshot {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub(crate) fn row_not_found(table: &str, row_id: &serde_json::Value) -> Self {
        StoreError::RowNotFound {
            table: table.to_string(),
            row_id: match row_id {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::TableNotFound(_) => "DOCSTORE_TABLE_NOT_FOUND",
            StoreError::RowNotFound { .. } => "DOCSTORE_ROW_NOT_FOUND",
            StoreError::CorruptSnapshot { .. } => "DOCSTORE_CORRUPT_SNAPSHOT",
            StoreError::Io { .. } => "DOCSTORE_IO_ERROR",
            StoreError::InvalidName(_) => "DOCSTORE_INVALID_NAME",
        }
    }

    /// Whether the error came from the storage boundary rather than the caller
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            StoreError::Io { .. } | StoreError::CorruptSnapshot { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_codes() {
        assert_eq!(
            StoreError::TableNotFound("ghost".into()).code(),
            "DOCSTORE_TABLE_NOT_FOUND"
        );
        assert_eq!(
            StoreError::row_not_found("users", &json!(7)).code(),
            "DOCSTORE_ROW_NOT_FOUND"
        );
        assert_eq!(
            StoreError::corrupt(Path::new("x.json"), "bad").code(),
            "DOCSTORE_CORRUPT_SNAPSHOT"
        );
    }

    #[test]
    fn test_row_id_display() {
        let err = StoreError::row_not_found("users", &json!("abc"));
        assert_eq!(
            err.to_string(),
            "Row with id 'abc' not found in table 'users'."
        );

        let err = StoreError::row_not_found("users", &json!(42));
        assert!(err.to_string().contains("'42'"));
    }

    #[test]
    fn test_storage_failure_classification() {
        let io_err = StoreError::io(
            Path::new("db.json"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(io_err.is_storage_failure());
        assert!(!StoreError::TableNotFound("t".into()).is_storage_failure());
    }
}
