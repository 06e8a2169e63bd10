//! Record validator
//!
//! Checks a queried raw record set against the fixed schema, the sexagesimal
//! coordinate patterns, and the referential rules derived from the
//! constellation definition. Pure: no side effects, no mutation.
//!
//! A single failing record fails the whole set. Partial constellations with
//! missing or malformed stars would silently corrupt propagation and
//! rendering downstream, so the controller forces a clean re-query instead
//! of accepting partial data.
//!
//! Checks run per record, in this order, failing fast on the first
//! violation:
//!
//! 1. field-name set equals the 9-field schema exactly
//! 2. `PMRA`, `PMDEC`, `PLX_VALUE` parse as f64
//! 3. `RA` matches `\d{2} \d{2} \d{2}\.\d{4}`
//! 4. `DEC` matches `[+-]\d{2} \d{2} \d{2}\.\d{3}`
//! 5. `TIME` parses as an RFC 3339 instant
//! 6. `CONSTELLATION` is a key in the definition
//! 7. `TYPED_ID` is a key under that constellation
//! 8. parsed `NEIGHBORS` equals the definition's list, order-sensitive

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use super::definition::ConstellationDefinition;
use super::models::{
    split_neighbors, RawRecord, RawRecordSet, FIELD_CONSTELLATION, FIELD_DEC, FIELD_NEIGHBORS,
    FIELD_PLX, FIELD_PMDEC, FIELD_PMRA, FIELD_RA, FIELD_TIME, FIELD_TYPED_ID, SCHEMA_FIELDS,
};

lazy_static! {
    /// Exact digit counts, no leniency
    static ref RA_PATTERN: Regex = Regex::new(r"^\d{2} \d{2} \d{2}\.\d{4}$").unwrap();
    static ref DEC_PATTERN: Regex = Regex::new(r"^[+-]\d{2} \d{2} \d{2}\.\d{3}$").unwrap();
}

/// The first rule a record set violated, for diagnostics.
///
/// The ingestion controller only branches on pass/fail; the issue itself
/// is reported to the operator when retries run out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// Field-name set differs from the fixed 9-field schema
    SchemaMismatch { star: String },
    /// A numeric field did not parse as f64
    NonNumericField { star: String, field: &'static str },
    /// RA string failed the sexagesimal pattern
    BadRightAscension { star: String, value: String },
    /// Dec string failed the sexagesimal pattern
    BadDeclination { star: String, value: String },
    /// TIME field is not a genuine date-time value
    BadTimestamp { star: String, value: String },
    /// CONSTELLATION is not a reference-data key
    UnknownConstellation { name: String },
    /// TYPED_ID is not a key under the record's constellation
    UnknownStar { star: String },
    /// NEIGHBORS differs from the definition (order-sensitive)
    NeighborMismatch { star: String },
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationIssue::SchemaMismatch { star } => {
                write!(f, "record '{star}': field set differs from schema")
            }
            ValidationIssue::NonNumericField { star, field } => {
                write!(f, "record '{star}': {field} is not numeric")
            }
            ValidationIssue::BadRightAscension { star, value } => {
                write!(f, "record '{star}': RA '{value}' malformed")
            }
            ValidationIssue::BadDeclination { star, value } => {
                write!(f, "record '{star}': DEC '{value}' malformed")
            }
            ValidationIssue::BadTimestamp { star, value } => {
                write!(f, "record '{star}': TIME '{value}' is not a date-time")
            }
            ValidationIssue::UnknownConstellation { name } => {
                write!(f, "constellation '{name}' not in reference data")
            }
            ValidationIssue::UnknownStar { star } => {
                write!(f, "star '{star}' not in constellation reference data")
            }
            ValidationIssue::NeighborMismatch { star } => {
                write!(f, "record '{star}': neighbor list differs from reference data")
            }
        }
    }
}

/// Validate a record set; true when every record conforms.
pub fn validate(set: &RawRecordSet, definition: &ConstellationDefinition) -> bool {
    check(set, definition).is_ok()
}

/// Validate a record set, reporting the first violation.
pub fn check(
    set: &RawRecordSet,
    definition: &ConstellationDefinition,
) -> std::result::Result<(), ValidationIssue> {
    for row in &set.rows {
        check_record(row, definition)?;
    }
    Ok(())
}

fn check_record(
    row: &RawRecord,
    definition: &ConstellationDefinition,
) -> std::result::Result<(), ValidationIssue> {
    let star = row.get(FIELD_TYPED_ID).to_string();

    // 1. exact field-name set (order-insensitive, all nine present)
    let expected: BTreeSet<&str> = SCHEMA_FIELDS.into_iter().collect();
    let actual: BTreeSet<&str> = row.fields.keys().map(String::as_str).collect();
    if actual != expected {
        return Err(ValidationIssue::SchemaMismatch { star });
    }

    // 2. numeric fields parse as f64
    for field in [FIELD_PMRA, FIELD_PMDEC, FIELD_PLX] {
        if row.get(field).trim().parse::<f64>().is_err() {
            return Err(ValidationIssue::NonNumericField { star, field });
        }
    }

    // 3-4. sexagesimal patterns, exact digit counts
    let ra = row.get(FIELD_RA);
    if !RA_PATTERN.is_match(ra) {
        return Err(ValidationIssue::BadRightAscension {
            star,
            value: ra.to_string(),
        });
    }
    let dec = row.get(FIELD_DEC);
    if !DEC_PATTERN.is_match(dec) {
        return Err(ValidationIssue::BadDeclination {
            star,
            value: dec.to_string(),
        });
    }

    // 5. genuine date-time value
    let time = row.get(FIELD_TIME);
    if time.parse::<DateTime<Utc>>().is_err() {
        return Err(ValidationIssue::BadTimestamp {
            star,
            value: time.to_string(),
        });
    }

    // 6. constellation is a reference-data key
    let constellation = row.get(FIELD_CONSTELLATION);
    let Ok(stars) = definition.stars(constellation) else {
        return Err(ValidationIssue::UnknownConstellation {
            name: constellation.to_string(),
        });
    };

    // 7. star is a key under that constellation
    let Some(expected_neighbors) = stars.get(&star) else {
        return Err(ValidationIssue::UnknownStar { star });
    };

    // 8. neighbor list equals the definition's, element for element
    let neighbors = split_neighbors(row.get(FIELD_NEIGHBORS));
    if &neighbors != expected_neighbors {
        return Err(ValidationIssue::NeighborMismatch { star });
    }

    Ok(())
}
