//! Blob store: pass-through byte storage keyed by generated ids

use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use super::backend::BlobBackend;
use super::errors::{BlobError, BlobResult};
use super::local::LocalBackend;
use super::object::BlobObject;

/// Writes opaque bytes under freshly generated UUIDs.
///
/// Independent of any table store.
#[derive(Debug)]
pub struct BlobStore<B: BlobBackend = LocalBackend> {
    backend: B,
}

impl BlobStore<LocalBackend> {
    /// Blob store rooted at `dir` on the local filesystem
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self::new(LocalBackend::new(dir))
    }

    pub fn root(&self) -> &Path {
        self.backend.root()
    }

    /// On-disk location of a stored blob
    pub fn path_of(&self, id: &Uuid) -> PathBuf {
        self.backend.path_of(&id.to_string())
    }
}

impl<B: BlobBackend> BlobStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Store `data` under a new id and return its receipt
    pub fn save(&self, filename: &str, data: &[u8]) -> BlobResult<BlobObject> {
        if filename.trim().is_empty() {
            return Err(BlobError::InvalidFilename(filename.to_string()));
        }

        let object = BlobObject::new(filename, data);
        self.backend.write(&object.key(), data)?;

        debug!(id = %object.id, filename, size = object.size, "blob saved");
        Ok(object)
    }

    /// Read a blob and check it against its receipt
    pub fn read(&self, object: &BlobObject) -> BlobResult<Vec<u8>> {
        let data = self.backend.read(&object.key())?;
        if !object.verify(&data) {
            return Err(BlobError::ChecksumMismatch(object.key()));
        }
        Ok(data)
    }

    /// Read a blob by id without verification
    pub fn read_by_id(&self, id: &str) -> BlobResult<Vec<u8>> {
        self.backend.read(&Self::parse_id(id)?.to_string())
    }

    pub fn exists(&self, id: &str) -> BlobResult<bool> {
        self.backend.exists(&Self::parse_id(id)?.to_string())
    }

    pub fn delete(&self, id: &str) -> BlobResult<()> {
        let id = Self::parse_id(id)?;
        self.backend.delete(&id.to_string())?;
        debug!(%id, "blob deleted");
        Ok(())
    }

    // Ids always go through Uuid so a caller-supplied string can never
    // escape the blob root.
    fn parse_id(id: &str) -> BlobResult<Uuid> {
        Uuid::parse_str(id).map_err(|_| BlobError::InvalidId(id.to_string()))
    }
}
