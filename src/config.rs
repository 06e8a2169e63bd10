//! Runtime configuration
//!
//! A single JSON file replaces the original deployment's scattered `.ini`
//! sections. Every field has a default so an empty object `{}` is a valid
//! configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{CyclopsError, Result};
use crate::core::ingest::DEFAULT_MAX_ATTEMPTS;

/// Runtime configuration for the cyclops CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CyclopsConfig {
    /// SQLite database file holding ingested snapshots
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Constellation reference data (JSON)
    #[serde(default = "default_definition_path")]
    pub definition_path: PathBuf,
    /// Local catalog extract driving the query adapter (JSON)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
    /// Maximum query attempts per ingestion request
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Per-lookup timeout for external catalog calls, in milliseconds
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("cyclops.db")
}

fn default_definition_path() -> PathBuf {
    PathBuf::from("constellations.json")
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("catalog.json")
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}

fn default_query_timeout_ms() -> u64 {
    30_000
}

impl Default for CyclopsConfig {
    fn default() -> Self {
        CyclopsConfig {
            database_path: default_database_path(),
            definition_path: default_definition_path(),
            catalog_path: default_catalog_path(),
            max_attempts: default_max_attempts(),
            query_timeout_ms: default_query_timeout_ms(),
        }
    }
}

impl CyclopsConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CyclopsError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Query timeout as a [`Duration`].
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CyclopsConfig::default();
        assert_eq!(config.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.query_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_empty_object_is_valid() {
        let config: CyclopsConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.database_path, PathBuf::from("cyclops.db"));
    }

    #[test]
    fn test_partial_override() {
        let config: CyclopsConfig =
            serde_json::from_str(r#"{"max_attempts": 2, "database_path": "/tmp/s.db"}"#).unwrap();
        assert_eq!(config.max_attempts, 2);
        assert_eq!(config.database_path, PathBuf::from("/tmp/s.db"));
        assert_eq!(config.query_timeout_ms, 30_000);
    }

    #[test]
    fn test_missing_file() {
        let err = CyclopsConfig::load("/nonexistent/cyclops.json").unwrap_err();
        assert!(matches!(err, CyclopsError::FileNotFound { .. }));
    }
}
