//! Blob backend trait

use super::errors::BlobResult;

/// Byte storage addressed by relative key
pub trait BlobBackend: std::fmt::Debug {
    /// Write `data` under `key`, creating intermediate structure as needed
    fn write(&self, key: &str, data: &[u8]) -> BlobResult<()>;

    /// Read the bytes stored under `key`
    fn read(&self, key: &str) -> BlobResult<Vec<u8>>;

    /// Remove `key`
    fn delete(&self, key: &str) -> BlobResult<()>;

    /// Check whether `key` exists
    fn exists(&self, key: &str) -> BlobResult<bool>;
}
