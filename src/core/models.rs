//! Core data structures for the ingestion and projection pipelines
//!
//! Two record shapes flow through the system:
//!
//! - [`RawRecordSet`]: what the catalog query adapter produces. Field values
//!   are untyped strings keyed by the fixed 9-field schema, because the
//!   validator has to be able to reject malformed numbers, coordinates and
//!   timestamps *before* anything is typed.
//! - [`RecordSet`]: the typed form, converted only after validation passed,
//!   and the unit handed to storage.
//!
//! [`ProjectedPosition`] and [`ProjectionReport`] are derived, ephemeral
//! outputs of the propagation pipeline; the core never persists them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{CyclopsError, Result};

// =============================================================================
// Fixed record schema
// =============================================================================

/// Star identifier column
pub const FIELD_TYPED_ID: &str = "TYPED_ID";
/// Right ascension column (sexagesimal hour-angle, `DD MM SS.ssss`)
pub const FIELD_RA: &str = "RA";
/// Declination column (sexagesimal degrees, `±DD MM SS.sss`)
pub const FIELD_DEC: &str = "DEC";
/// Proper motion in RA (mas/yr, RA·cos(Dec) convention)
pub const FIELD_PMRA: &str = "PMRA";
/// Proper motion in Dec (mas/yr)
pub const FIELD_PMDEC: &str = "PMDEC";
/// Parallax (mas)
pub const FIELD_PLX: &str = "PLX_VALUE";
/// Constellation name column
pub const FIELD_CONSTELLATION: &str = "CONSTELLATION";
/// Retrieval instant column (RFC 3339, UTC)
pub const FIELD_TIME: &str = "TIME";
/// Semicolon-joined neighbor identifiers
pub const FIELD_NEIGHBORS: &str = "NEIGHBORS";

/// The fixed, non-configurable schema every queried record must carry.
///
/// Order-insensitive for the schema contract, but all nine must be present.
pub const SCHEMA_FIELDS: [&str; 9] = [
    FIELD_TYPED_ID,
    FIELD_RA,
    FIELD_DEC,
    FIELD_PMRA,
    FIELD_PMDEC,
    FIELD_PLX,
    FIELD_CONSTELLATION,
    FIELD_TIME,
    FIELD_NEIGHBORS,
];

/// Delimiter used for the neighbor list on the wire
pub const NEIGHBOR_DELIMITER: char = ';';

// =============================================================================
// Raw (pre-validation) records
// =============================================================================

/// One untyped star record as returned by the query adapter.
///
/// Every value is a string; typing happens after validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// Field name → raw string value
    pub fields: BTreeMap<String, String>,
}

impl RawRecord {
    /// Fetch a field value, empty string if absent.
    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    /// Set a field value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }
}

/// One unvalidated query attempt: all stars of one constellation at one
/// capture instant. Discarded and rebuilt on validation failure, never
/// mutated in place.
#[derive(Debug, Clone)]
pub struct RawRecordSet {
    /// Constellation the attempt was made for
    pub constellation: String,
    /// The adapter's own capture instant (not caller supplied)
    pub retrieved_at: DateTime<Utc>,
    /// One row per star, in reference-data order
    pub rows: Vec<RawRecord>,
}

// =============================================================================
// Typed (post-validation) records
// =============================================================================

/// One validated catalog record for a single star.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Star identifier, a key in the constellation definition
    pub identifier: String,
    /// Right ascension, sexagesimal hour-angle string `DD MM SS.ssss`
    pub ra: String,
    /// Declination, sexagesimal degree string `±DD MM SS.sss`
    pub dec: String,
    /// Proper motion in RA (mas/yr, includes the cos(Dec) factor)
    pub pm_ra: f64,
    /// Proper motion in Dec (mas/yr)
    pub pm_dec: f64,
    /// Parallax (mas)
    pub parallax: f64,
    /// Constellation this record belongs to
    pub constellation: String,
    /// Retrieval instant (UTC)
    pub time: DateTime<Utc>,
    /// Ordered neighbor identifiers, as recorded in the definition
    pub neighbors: Vec<String>,
}

impl CatalogRecord {
    /// Neighbor list in its wire form (semicolon-joined).
    pub fn neighbors_wire(&self) -> String {
        self.neighbors.join(&NEIGHBOR_DELIMITER.to_string())
    }
}

/// Split a wire-form neighbor string back into identifiers.
///
/// An empty string yields an empty list, not a single empty identifier.
pub fn split_neighbors(wire: &str) -> Vec<String> {
    if wire.is_empty() {
        return Vec::new();
    }
    wire.split(NEIGHBOR_DELIMITER).map(str::to_string).collect()
}

/// One validated snapshot of all stars in one constellation at one
/// retrieval instant. Persisted as a unit; the storage layer receives
/// ownership once the ingestion controller hands it over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSet {
    /// Constellation shared by every record
    pub constellation: String,
    /// Retrieval instant shared by every record
    pub retrieved_at: DateTime<Utc>,
    /// One record per star, in reference-data order
    pub records: Vec<CatalogRecord>,
}

impl RecordSet {
    /// Convert a raw record set into its typed form.
    ///
    /// Callers are expected to have run the validator first; conversion
    /// still re-parses defensively and reports a catalog error rather
    /// than panicking if handed unvalidated rows.
    pub fn from_raw(raw: &RawRecordSet) -> Result<Self> {
        let mut records = Vec::with_capacity(raw.rows.len());
        for row in &raw.rows {
            let identifier = row.get(FIELD_TYPED_ID).to_string();
            let parse_f64 = |field: &str| -> Result<f64> {
                row.get(field).trim().parse::<f64>().map_err(|_| {
                    CyclopsError::catalog(format!(
                        "non-numeric {field} '{}' for star '{identifier}'",
                        row.get(field)
                    ))
                })
            };
            let time = row
                .get(FIELD_TIME)
                .parse::<DateTime<Utc>>()
                .map_err(|_| {
                    CyclopsError::catalog(format!(
                        "unparseable TIME '{}' for star '{identifier}'",
                        row.get(FIELD_TIME)
                    ))
                })?;
            records.push(CatalogRecord {
                ra: row.get(FIELD_RA).to_string(),
                dec: row.get(FIELD_DEC).to_string(),
                pm_ra: parse_f64(FIELD_PMRA)?,
                pm_dec: parse_f64(FIELD_PMDEC)?,
                parallax: parse_f64(FIELD_PLX)?,
                constellation: row.get(FIELD_CONSTELLATION).to_string(),
                time,
                neighbors: split_neighbors(row.get(FIELD_NEIGHBORS)),
                identifier,
            });
        }
        Ok(RecordSet {
            constellation: raw.constellation.clone(),
            retrieved_at: raw.retrieved_at,
            records,
        })
    }

    /// Number of stars in the snapshot.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the snapshot carries no stars.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by star identifier.
    pub fn record(&self, identifier: &str) -> Option<&CatalogRecord> {
        self.records.iter().find(|r| r.identifier == identifier)
    }
}

// =============================================================================
// Projection outputs
// =============================================================================

/// A propagated sky position for one star. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPosition {
    /// Star identifier, matching the input record
    pub identifier: String,
    /// Right ascension in degrees, [0, 360)
    pub ra_deg: f64,
    /// Declination in degrees, [-90, 90]
    pub dec_deg: f64,
}

/// View mode selector for the projection pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    /// Positions as seen from Earth; no light-travel correction
    #[default]
    Apparent,
    /// True positions, compensating for light-travel delay
    Real,
}

impl ViewMode {
    /// Whether the light-travel correction applies in this mode.
    pub fn light_delay(&self) -> bool {
        matches!(self, ViewMode::Real)
    }
}

/// Serializable summary of one projection request, for downstream consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionReport {
    /// Constellation the projection was computed for
    pub constellation: String,
    /// Offset from the retrieval epoch, in years
    pub offset_years: f64,
    /// View mode the projection was computed under
    pub view: ViewMode,
    /// Retrieval instant of the underlying snapshot
    pub retrieved_at: DateTime<Utc>,
    /// One projected position per star
    pub positions: Vec<ProjectedPosition>,
}
