//! Local filesystem blob backend

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::backend::BlobBackend;
use super::errors::{BlobError, BlobResult};

/// Stores each blob as a plain file under `root`
#[derive(Debug, Clone)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// On-disk location of `key`
    pub fn path_of(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn map_err(key: &str, e: io::Error) -> BlobError {
        if e.kind() == io::ErrorKind::NotFound {
            BlobError::NotFound(key.to_string())
        } else {
            BlobError::IoError(format!("{}: {}", key, e))
        }
    }
}

impl BlobBackend for LocalBackend {
    fn write(&self, key: &str, data: &[u8]) -> BlobResult<()> {
        let path = self.path_of(key);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| BlobError::IoError(e.to_string()))?;
        }

        fs::write(&path, data).map_err(|e| BlobError::IoError(e.to_string()))
    }

    fn read(&self, key: &str) -> BlobResult<Vec<u8>> {
        fs::read(self.path_of(key)).map_err(|e| Self::map_err(key, e))
    }

    fn delete(&self, key: &str) -> BlobResult<()> {
        fs::remove_file(self.path_of(key)).map_err(|e| Self::map_err(key, e))
    }

    fn exists(&self, key: &str) -> BlobResult<bool> {
        Ok(self.path_of(key).is_file())
    }
}
