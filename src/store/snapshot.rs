//! Whole-store snapshot file
//!
//! The snapshot is a single JSON object mapping table name to an array of
//! row objects. Every write replaces the entire file.
//!
//! Atomicity is achieved via:
//! 1. Write to `<snapshot>.tmp`
//! 2. fsync the temp file
//! 3. Rename temp to final (atomic on POSIX)
//! 4. fsync the parent directory (best effort)
//!
//! A reader therefore sees either the previous snapshot or the new one,
//! never a torn write.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::errors::{StoreError, StoreResult};
use super::row::{oversized_integer, Row};

/// In-memory form of a snapshot: table name -> rows
pub type Tables = BTreeMap<String, Vec<Row>>;

/// Snapshot file location and encoding
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
    temp_path: PathBuf,
    pretty: bool,
}

impl SnapshotFile {
    /// Create a handle for the snapshot at `path`. Nothing is opened.
    pub fn new(path: impl Into<PathBuf>, pretty: bool) -> Self {
        let path = path.into();
        let mut temp_name = path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        temp_name.push(".tmp");
        let temp_path = path.with_file_name(temp_name);

        Self {
            path,
            temp_path,
            pretty,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode the snapshot.
    ///
    /// Returns `Ok(None)` when no snapshot file exists yet.
    pub fn read(&self) -> StoreResult<Option<Tables>> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let tables = self.decode(&content)?;
        debug!(
            path = %self.path.display(),
            bytes = content.len(),
            tables = tables.len(),
            "snapshot read"
        );
        Ok(Some(tables))
    }

    /// Decode snapshot bytes, enforcing the table -> [object] shape.
    ///
    /// Integers beyond 64 bits are rejected rather than rounded to f64.
    pub fn decode(&self, content: &[u8]) -> StoreResult<Tables> {
        let tables = serde_json::from_slice(content)
            .map_err(|e| StoreError::corrupt(&self.path, e.to_string()))?;

        if let Some(literal) = oversized_integer(content) {
            return Err(StoreError::corrupt(
                &self.path,
                format!("integer {} does not fit in 64 bits", literal),
            ));
        }

        Ok(tables)
    }

    /// Encode and atomically replace the snapshot
    pub fn write(&self, tables: &Tables) -> StoreResult<()> {
        let content = if self.pretty {
            serde_json::to_vec_pretty(tables)
        } else {
            serde_json::to_vec(tables)
        }
        .map_err(|e| StoreError::io(&self.path, io::Error::new(io::ErrorKind::InvalidData, e)))?;

        if let Some(parent) = self.parent_dir() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let result = self.write_temp(&content).and_then(|()| {
            fs::rename(&self.temp_path, &self.path).map_err(|e| StoreError::io(&self.path, e))
        });
        if result.is_err() {
            // Already failing; the stale temp file is the only thing left to tidy
            let _ = fs::remove_file(&self.temp_path);
            return result;
        }

        if let Some(parent) = self.parent_dir() {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }

        debug!(
            path = %self.path.display(),
            bytes = content.len(),
            tables = tables.len(),
            "snapshot written"
        );
        Ok(())
    }

    fn write_temp(&self, content: &[u8]) -> StoreResult<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.temp_path)
            .map_err(|e| StoreError::io(&self.temp_path, e))?;

        file.write_all(content)
            .map_err(|e| StoreError::io(&self.temp_path, e))?;
        file.sync_all()
            .map_err(|e| StoreError::io(&self.temp_path, e))
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_tables() -> Tables {
        let mut tables = Tables::new();
        let row = json!({"id": 1, "name": "Ann", "tags": ["a", "b"], "meta": {"x": null}});
        tables.insert(
            "users".to_string(),
            vec![row.as_object().cloned().unwrap()],
        );
        tables.insert("empty".to_string(), Vec::new());
        tables
    }

    #[test]
    fn test_missing_snapshot_reads_none() {
        let temp = TempDir::new().unwrap();
        let snapshot = SnapshotFile::new(temp.path().join("db.json"), false);
        assert!(snapshot.read().unwrap().is_none());
        assert!(!snapshot.path().exists());
    }

    #[test]
    fn test_write_then_read() {
        let temp = TempDir::new().unwrap();
        let snapshot = SnapshotFile::new(temp.path().join("db.json"), false);

        snapshot.write(&sample_tables()).unwrap();
        assert_eq!(snapshot.read().unwrap(), Some(sample_tables()));
    }

    #[test]
    fn test_pretty_output_is_multiline() {
        let temp = TempDir::new().unwrap();
        let snapshot = SnapshotFile::new(temp.path().join("db.json"), true);

        snapshot.write(&sample_tables()).unwrap();
        let text = fs::read_to_string(snapshot.path()).unwrap();
        assert!(text.lines().count() > 1);
        assert_eq!(snapshot.read().unwrap(), Some(sample_tables()));
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let temp = TempDir::new().unwrap();
        let snapshot = SnapshotFile::new(temp.path().join("db.json"), false);

        snapshot.write(&sample_tables()).unwrap();
        assert!(!temp.path().join("db.json.tmp").exists());
    }

    #[test]
    fn test_creates_missing_parent_directory() {
        let temp = TempDir::new().unwrap();
        let snapshot = SnapshotFile::new(temp.path().join("nested/dir/db.json"), false);

        snapshot.write(&Tables::new()).unwrap();
        assert!(snapshot.path().is_file());
    }

    #[test]
    fn test_garbage_is_corrupt() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("db.json");
        fs::write(&path, b"{\"users\": [").unwrap();

        let result = SnapshotFile::new(&path, false).read();
        assert!(matches!(result, Err(StoreError::CorruptSnapshot { .. })));
    }

    #[test]
    fn test_awkward_floats_round_trip() {
        let temp = TempDir::new().unwrap();
        let snapshot = SnapshotFile::new(temp.path().join("db.json"), false);
        let values = [
            1.0715660391465826e-75,
            -1.81996730402717e-179,
            0.1 + 0.2,
            f64::MIN_POSITIVE,
            f64::MAX,
            5e-324,
        ];

        let mut tables = Tables::new();
        tables.insert(
            "floats".to_string(),
            values
                .iter()
                .map(|v| json!({ "v": v }).as_object().cloned().unwrap())
                .collect(),
        );
        snapshot.write(&tables).unwrap();

        let read = snapshot.read().unwrap().unwrap();
        for (row, expected) in read["floats"].iter().zip(values) {
            assert_eq!(row["v"].as_f64().unwrap().to_bits(), expected.to_bits());
        }
    }

    #[test]
    fn test_oversized_integer_is_corrupt() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("db.json");
        fs::write(&path, r#"{"t": [{"id": 123456789012345678901234567890}]}"#).unwrap();

        match SnapshotFile::new(&path, false).read() {
            Err(StoreError::CorruptSnapshot { reason, .. }) => {
                assert!(reason.contains("123456789012345678901234567890"))
            }
            other => panic!("expected CorruptSnapshot, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("db.json");
        let snapshot = SnapshotFile::new(&path, false);

        for content in [
            r#"[]"#,
            r#"{"users": {"id": 1}}"#,
            r#"{"users": [1, 2]}"#,
            r#"{"users": [{"id": 1}, "x"]}"#,
        ] {
            fs::write(&path, content).unwrap();
            assert!(
                matches!(snapshot.read(), Err(StoreError::CorruptSnapshot { .. })),
                "expected corrupt for {}",
                content
            );
        }
    }
}
