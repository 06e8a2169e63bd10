//! Error types for cyclops
//!
//! This module provides structured error handling using thiserror.
//!
//! Validation failures are deliberately *not* represented here: a failed
//! record-set validation is recovered inside the ingestion controller by
//! re-querying the catalog, so it never propagates as an error. Everything
//! in this taxonomy reaches the caller unmodified.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cyclops operations
pub type Result<T> = std::result::Result<T, CyclopsError>;

/// Errors that can occur during ingestion, projection or chart building
#[derive(Error, Debug)]
pub enum CyclopsError {
    /// Requested constellation is absent from the reference data
    #[error("Unknown constellation: {name}")]
    UnknownConstellation { name: String },

    /// Star identifier is absent from the constellation's reference data
    #[error("Unknown star '{star}' in constellation '{constellation}'")]
    UnknownStar { star: String, constellation: String },

    /// The configured attempt limit was reached without a valid record set
    #[error("Ingestion exhausted for '{constellation}' after {attempts} attempts: {last_issue}")]
    IngestionExhausted {
        constellation: String,
        attempts: usize,
        last_issue: String,
    },

    /// Non-positive parallax yields an undefined distance
    #[error("Invalid parallax {value} mas for star '{star}'")]
    InvalidParallax { star: String, value: f64 },

    /// A stored coordinate string no longer matches the sexagesimal format
    #[error("Malformed coordinate '{value}' for star '{star}'")]
    MalformedCoordinate { star: String, value: String },

    /// Reference data is structurally invalid (e.g. a neighbor that is not a key)
    #[error("Invalid constellation definition: {message}")]
    Definition { message: String },

    /// External catalog source failure (connectivity, protocol, missing star)
    #[error("Catalog lookup failed: {message}")]
    Catalog { message: String },

    /// An external call exceeded its configured bound
    #[error("External call timed out after {elapsed_ms} ms (limit {limit_ms} ms)")]
    Timeout { elapsed_ms: u64, limit_ms: u64 },

    /// Nothing has been ingested yet for the requested constellation
    #[error("No stored records for constellation: {constellation}")]
    NothingStored { constellation: String },

    /// Definition or catalog fixture file not found
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Datastore failure (connect, insert, query); never retried by the core
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CyclopsError>,
    },
}

impl CyclopsError {
    /// Wrap an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CyclopsError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create a definition error
    pub fn definition(message: impl Into<String>) -> Self {
        CyclopsError::Definition {
            message: message.into(),
        }
    }

    /// Create a catalog error
    pub fn catalog(message: impl Into<String>) -> Self {
        CyclopsError::Catalog {
            message: message.into(),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(ctx))
    }
}
