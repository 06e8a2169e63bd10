//! Ingestion controller
//!
//! Orchestrates one ingestion request as a small state machine:
//!
//! ```text
//! Query → Validate → Persist            (success)
//!    ↑        │
//!    └────────┘  re-query on validation failure, bounded
//! ```
//!
//! Every attempt builds a fresh raw record set; an invalid one is discarded
//! whole, never repaired. The retry bound exists to avoid unbounded load on
//! the external catalog when a response is systematically malformed (e.g. a
//! permanent schema change upstream); running out of attempts surfaces
//! `IngestionExhausted`. Storage insert failures are terminal for the
//! invocation and are never retried, unlike validation failures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{CatalogSource, QueryAdapter};
use super::error::{CyclopsError, Result};
use super::models::RecordSet;
use super::store::StarStore;
use super::validator;

/// Default maximum query attempts per ingestion request
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Outcome summary of a successful ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionReport {
    /// Constellation that was ingested
    pub constellation: String,
    /// Attempts used, including the successful one
    pub attempts: usize,
    /// Stars persisted
    pub stars: usize,
    /// Retrieval instant of the persisted snapshot
    pub retrieved_at: DateTime<Utc>,
}

/// Drives query → validate → retry → persist for one constellation at a time.
#[derive(Debug, Clone, Copy)]
pub struct IngestionController {
    max_attempts: usize,
}

impl Default for IngestionController {
    fn default() -> Self {
        Self::new()
    }
}

impl IngestionController {
    /// Controller with the default attempt bound.
    pub fn new() -> Self {
        IngestionController {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Override the attempt bound. A bound of zero is clamped to one
    /// attempt; the first query always runs.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Configured attempt bound.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Run one ingestion request to completion.
    ///
    /// Query errors (unknown constellation, timeout, source failure)
    /// propagate immediately without retry; only validation failures
    /// trigger a re-query. On success, the validated set is handed to the
    /// store in one bulk insert and ownership transfers to the datastore.
    pub fn ingest<S, T>(
        &self,
        adapter: &QueryAdapter<'_, S>,
        store: &T,
        constellation: &str,
    ) -> Result<IngestionReport>
    where
        S: CatalogSource,
        T: StarStore,
    {
        let mut last_issue = None;

        for attempt in 1..=self.max_attempts {
            let raw = adapter.query(constellation)?;

            match validator::check(&raw, adapter.definition()) {
                Ok(()) => {
                    let set = RecordSet::from_raw(&raw)?;
                    let report = IngestionReport {
                        constellation: constellation.to_string(),
                        attempts: attempt,
                        stars: set.len(),
                        retrieved_at: set.retrieved_at,
                    };
                    store.insert_records(&set)?;
                    return Ok(report);
                }
                Err(issue) => {
                    // discard the attempt whole; a partial constellation
                    // would corrupt propagation and rendering downstream
                    last_issue = Some(issue);
                }
            }
        }

        // exhaustion implies at least one failed validation
        Err(CyclopsError::IngestionExhausted {
            constellation: constellation.to_string(),
            attempts: self.max_attempts,
            last_issue: last_issue
                .map(|issue| issue.to_string())
                .unwrap_or_else(|| "no valid record set".to_string()),
        })
    }
}
