//! Blob storage errors

use thiserror::Error;

/// Result type for blob operations
pub type BlobResult<T> = Result<T, BlobError>;

/// Blob storage errors
#[derive(Debug, Clone, Error)]
pub enum BlobError {
    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),

    #[error("Invalid blob id: {0}")]
    InvalidId(String),

    #[error("Checksum mismatch for blob {0}")]
    ChecksumMismatch(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl BlobError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            BlobError::NotFound(_) => "DOCSTORE_BLOB_NOT_FOUND",
            BlobError::InvalidFilename(_) => "DOCSTORE_BLOB_INVALID_FILENAME",
            BlobError::InvalidId(_) => "DOCSTORE_BLOB_INVALID_ID",
            BlobError::ChecksumMismatch(_) => "DOCSTORE_BLOB_CHECKSUM_MISMATCH",
            BlobError::IoError(_) => "DOCSTORE_BLOB_IO_ERROR",
        }
    }
}
