//! Catalog query adapter
//!
//! [`CatalogSource`] is the boundary to the external star catalog: one
//! opaque lookup per star, returning raw astrometric strings. The query
//! protocol itself (SIMBAD scripts, remote spiders, HTTP) lives behind the
//! trait and is out of core scope.
//!
//! [`QueryAdapter`] turns one constellation request into one
//! [`RawRecordSet`]: it drives the source from the reference data, fills in
//! the fixed 9-field schema, takes neighbor lists from the definition (never
//! from the source), and stamps the set with its own capture instant. Each
//! `query` call is a single independent attempt; retry logic belongs to the
//! ingestion controller.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{SecondsFormat, Timelike, Utc};
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use super::definition::ConstellationDefinition;
use super::error::{CyclopsError, Result};
use super::models::{
    RawRecord, RawRecordSet, FIELD_CONSTELLATION, FIELD_DEC, FIELD_NEIGHBORS, FIELD_PLX,
    FIELD_PMDEC, FIELD_PMRA, FIELD_RA, FIELD_TIME, FIELD_TYPED_ID, NEIGHBOR_DELIMITER,
};

// =============================================================================
// Catalog source boundary
// =============================================================================

/// Raw astrometric fields for a single star, exactly as the external
/// catalog reports them. Untyped on purpose; the validator decides what
/// is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarFields {
    /// Right ascension string (`DD MM SS.ssss`, hour-angle)
    pub ra: String,
    /// Declination string (`±DD MM SS.sss`, degrees)
    pub dec: String,
    /// Proper motion in RA (mas/yr) as reported
    pub pm_ra: String,
    /// Proper motion in Dec (mas/yr) as reported
    pub pm_dec: String,
    /// Parallax (mas) as reported
    pub parallax: String,
}

/// Opaque external catalog lookup. One call per star, no retry semantics.
#[cfg_attr(test, automock)]
pub trait CatalogSource {
    /// Fetch the raw astrometric fields for one star identifier.
    fn star_info(&self, identifier: &str) -> Result<StarFields>;
}

/// A catalog source backed by a local JSON extract, mapping star
/// identifier → [`StarFields`]. Useful both as a cached snapshot of a
/// remote catalog and as a deterministic fixture.
#[derive(Debug, Clone, Default)]
pub struct JsonCatalogSource {
    stars: BTreeMap<String, StarFields>,
}

impl JsonCatalogSource {
    /// Parse an extract from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let stars: BTreeMap<String, StarFields> = serde_json::from_str(json)?;
        Ok(JsonCatalogSource { stars })
    }

    /// Load an extract from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CyclopsError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Number of stars in the extract.
    pub fn len(&self) -> usize {
        self.stars.len()
    }

    /// True when the extract is empty.
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}

impl CatalogSource for JsonCatalogSource {
    fn star_info(&self, identifier: &str) -> Result<StarFields> {
        self.stars
            .get(identifier)
            .cloned()
            .ok_or_else(|| CyclopsError::catalog(format!("star '{identifier}' not in extract")))
    }
}

// =============================================================================
// Query adapter
// =============================================================================

/// Builds one raw record set per ingestion attempt.
pub struct QueryAdapter<'d, S> {
    source: S,
    definition: &'d ConstellationDefinition,
    /// Per-lookup wall-clock bound; None disables the check
    timeout: Option<Duration>,
}

impl<'d, S: CatalogSource> QueryAdapter<'d, S> {
    /// Create an adapter over a source and reference data, with no
    /// lookup timeout.
    pub fn new(source: S, definition: &'d ConstellationDefinition) -> Self {
        QueryAdapter {
            source,
            definition,
            timeout: None,
        }
    }

    /// Bound each external lookup by a wall-clock timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The reference data this adapter queries against.
    pub fn definition(&self) -> &ConstellationDefinition {
        self.definition
    }

    /// Perform one query attempt for a constellation.
    ///
    /// Fails with `UnknownConstellation` before touching the source if the
    /// name is absent from the reference data. The returned set's `TIME`
    /// field is this call's capture instant.
    pub fn query(&self, constellation: &str) -> Result<RawRecordSet> {
        let stars = self.definition.stars(constellation)?;
        // capture instant truncated to the wire precision, so the typed
        // set round-trips exactly through the TIME field
        let now = Utc::now();
        let retrieved_at = now.with_nanosecond(0).unwrap_or(now);
        let time_wire = retrieved_at.to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut rows = Vec::with_capacity(stars.len());
        for (identifier, neighbors) in stars {
            let fields = self.timed_lookup(identifier)?;
            let mut row = RawRecord::default();
            row.set(FIELD_TYPED_ID, identifier.clone());
            row.set(FIELD_RA, fields.ra);
            row.set(FIELD_DEC, fields.dec);
            row.set(FIELD_PMRA, fields.pm_ra);
            row.set(FIELD_PMDEC, fields.pm_dec);
            row.set(FIELD_PLX, fields.parallax);
            row.set(FIELD_CONSTELLATION, constellation);
            row.set(FIELD_TIME, time_wire.clone());
            row.set(
                FIELD_NEIGHBORS,
                neighbors.join(&NEIGHBOR_DELIMITER.to_string()),
            );
            rows.push(row);
        }

        Ok(RawRecordSet {
            constellation: constellation.to_string(),
            retrieved_at,
            rows,
        })
    }

    /// One source lookup with the configured wall-clock bound.
    fn timed_lookup(&self, identifier: &str) -> Result<StarFields> {
        let started = Instant::now();
        let fields = self.source.star_info(identifier)?;
        if let Some(limit) = self.timeout {
            let elapsed = started.elapsed();
            if elapsed > limit {
                return Err(CyclopsError::Timeout {
                    elapsed_ms: elapsed.as_millis() as u64,
                    limit_ms: limit.as_millis() as u64,
                });
            }
        }
        Ok(fields)
    }
}
