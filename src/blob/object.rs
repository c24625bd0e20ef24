//! Blob receipts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Metadata describing a stored blob.
///
/// The store keeps no index of blobs: the receipt is the only record, and
/// callers embed it (or just its id) in a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobObject {
    pub id: Uuid,
    /// Name the caller supplied; not used for the storage location
    pub filename: String,
    pub size: u64,
    /// Hex SHA-256 of the content
    pub checksum: String,
    pub stored_at: DateTime<Utc>,
}

impl BlobObject {
    /// Receipt for freshly generated id
    pub fn new(filename: impl Into<String>, data: &[u8]) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: filename.into(),
            size: data.len() as u64,
            checksum: Self::calculate_checksum(data),
            stored_at: Utc::now(),
        }
    }

    /// Backend key for this blob
    pub fn key(&self) -> String {
        self.id.to_string()
    }

    /// Calculate checksum for data
    pub fn calculate_checksum(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }

    /// True if `data` is exactly the content this receipt describes
    pub fn verify(&self, data: &[u8]) -> bool {
        data.len() as u64 == self.size && Self::calculate_checksum(data) == self.checksum
    }

    /// JSON form, ready to be stored as a row field
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
