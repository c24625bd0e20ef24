//! API errors
//!
//! Store errors pass through with their original codes.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for API handling
pub type ApiResult<T> = Result<T, ApiError>;

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        ApiError::InvalidRequest(message.into())
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "DOCSTORE_INVALID_REQUEST",
            ApiError::Store(e) => e.code(),
        }
    }
}
