//! Display errors

use std::path::PathBuf;

use thiserror::Error;

use crate::store::StoreError;

/// Result type for display helpers
pub type DisplayResult<T> = Result<T, DisplayError>;

/// Display errors
#[derive(Debug, Error)]
pub enum DisplayError {
    /// The store lookup itself failed (missing table or row)
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("No image path found for row with id '{row_id}' in table '{table}'.")]
    MissingImagePath { table: String, row_id: String },

    #[error("Error opening image at path '{}': {reason}", path.display())]
    ImageUnavailable { path: PathBuf, reason: String },
}

impl DisplayError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            DisplayError::Store(e) => e.code(),
            DisplayError::MissingImagePath { .. } => "DOCSTORE_MISSING_IMAGE_PATH",
            DisplayError::ImageUnavailable { .. } => "DOCSTORE_IMAGE_UNAVAILABLE",
        }
    }
}
