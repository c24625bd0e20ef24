//! Store configuration
//!
//! A store is addressed by name; the configuration decides where its
//! snapshot and blobs live on disk. Every field has a default so an absent
//! or empty config file gives the plain single-file layout:
//! `./<name>.json` for the snapshot and `./files/` for blobs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        "DOCSTORE_CONFIG_ERROR"
    }
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding snapshot files (default: current directory)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Snapshot file extension, without the dot (default: "json")
    #[serde(default = "default_snapshot_extension")]
    pub snapshot_extension: String,

    /// Blob directory, resolved against `data_dir` when relative
    #[serde(default = "default_blob_dir")]
    pub blob_dir: PathBuf,

    /// Pretty-print snapshots (default: compact)
    #[serde(default)]
    pub pretty: bool,

    /// Width in characters of the longest bar in table size charts
    #[serde(default = "default_chart_width")]
    pub chart_width: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_snapshot_extension() -> String {
    "json".to_string()
}
fn default_blob_dir() -> PathBuf {
    PathBuf::from("files")
}
fn default_chart_width() -> usize {
    40
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            snapshot_extension: default_snapshot_extension(),
            blob_dir: default_blob_dir(),
            pretty: false,
            chart_width: default_chart_width(),
        }
    }
}

impl StoreConfig {
    /// Config rooted at `data_dir`, everything else defaulted
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: StoreConfig = serde_json::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Reject values that cannot produce a usable layout
    pub fn validate(&self) -> ConfigResult<()> {
        let ext = &self.snapshot_extension;
        if ext.is_empty() {
            return Err(ConfigError::Invalid(
                "snapshot_extension must not be empty".to_string(),
            ));
        }
        if ext.starts_with('.') || ext.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "snapshot_extension '{}' must be a bare extension like 'json'",
                ext
            )));
        }

        if self.chart_width == 0 {
            return Err(ConfigError::Invalid("chart_width must be > 0".to_string()));
        }

        Ok(())
    }

    /// Snapshot path for the store called `name`
    pub fn snapshot_path(&self, name: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", name, self.snapshot_extension))
    }

    /// Resolved blob directory
    pub fn blob_path(&self) -> PathBuf {
        self.data_dir.join(&self.blob_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_single_file_layout() {
        let config = StoreConfig::default();
        assert_eq!(config.snapshot_path("users"), Path::new("./users.json"));
        assert_eq!(config.blob_path(), Path::new("./files"));
        assert!(!config.pretty);
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: StoreConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("docstore.json");
        fs::write(
            &path,
            r#"{"data_dir": "/var/lib/docstore", "snapshot_extension": "db", "pretty": true}"#,
        )
        .unwrap();

        let config = StoreConfig::load(&path).unwrap();
        assert_eq!(
            config.snapshot_path("inventory"),
            Path::new("/var/lib/docstore/inventory.db")
        );
        assert!(config.pretty);
        assert_eq!(config.chart_width, 40);
    }

    #[test]
    fn test_absolute_blob_dir_wins() {
        let config = StoreConfig {
            blob_dir: PathBuf::from("/srv/blobs"),
            ..StoreConfig::with_data_dir("/data")
        };
        assert_eq!(config.blob_path(), Path::new("/srv/blobs"));
    }

    #[test]
    fn test_rejects_dotted_extension() {
        let config = StoreConfig {
            snapshot_extension: ".json".to_string(),
            ..StoreConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_zero_chart_width() {
        let config = StoreConfig {
            chart_width: 0,
            ..StoreConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let temp = TempDir::new().unwrap();
        let result = StoreConfig::load(&temp.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(StoreConfig::load(&path), Err(ConfigError::Parse(_))));
    }
}
