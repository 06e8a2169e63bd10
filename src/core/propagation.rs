//! Position propagator
//!
//! Reconstructs where each star of a stored snapshot sits at an arbitrary
//! offset from its retrieval epoch. Positions are modelled as 3-D unit
//! vectors with a parallax-derived distance, and proper motion displaces
//! the vector along the local east/north tangent basis before
//! renormalizing. Naive addition to RA/Dec degrees diverges near the poles
//! and at millennia-scale offsets; the vector form does not.
//!
//! The "Real" view applies a second displacement equal to the star's
//! light-travel time: the light reaching the target epoch left the star
//! `distance / c` years earlier, so the star has kept moving for that long.
//!
//! A zero offset without light delay is a no-op: the projected positions
//! equal the catalog positions to within floating rounding.

use super::error::{CyclopsError, Result};
use super::models::{CatalogRecord, ProjectedPosition, RecordSet};

// =============================================================================
// Constants
// =============================================================================

/// Degrees of right ascension per sexagesimal hour
pub const DEG_PER_HOUR: f64 = 15.0;

/// Light-years per parsec
pub const LY_PER_PC: f64 = 3.26156;

/// Radians per milliarcsecond
const RAD_PER_MAS: f64 = std::f64::consts::PI / (180.0 * 3_600_000.0);

/// Tolerance for the zero-offset idempotence property, in degrees
pub const IDEMPOTENCE_TOLERANCE_DEG: f64 = 1e-9;

// =============================================================================
// Sexagesimal parsing
// =============================================================================

/// Split a sexagesimal triplet `"A B C.CCC"` into (A, B, C).
fn split_sexagesimal(value: &str) -> Option<(f64, f64, f64)> {
    let mut parts = value.split(' ');
    let a = parts.next()?.parse::<f64>().ok()?;
    let b = parts.next()?.parse::<f64>().ok()?;
    let c = parts.next()?.parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((a, b, c))
}

/// Parse a catalog RA string (`DD MM SS.ssss`, hour-angle) into degrees.
pub fn parse_ra_deg(star: &str, value: &str) -> Result<f64> {
    let (h, m, s) = split_sexagesimal(value).ok_or_else(|| CyclopsError::MalformedCoordinate {
        star: star.to_string(),
        value: value.to_string(),
    })?;
    Ok((h + m / 60.0 + s / 3600.0) * DEG_PER_HOUR)
}

/// Parse a catalog Dec string (`±DD MM SS.sss`) into degrees.
pub fn parse_dec_deg(star: &str, value: &str) -> Result<f64> {
    let negative = value.starts_with('-');
    let unsigned = value.trim_start_matches(['+', '-']);
    let (d, m, s) =
        split_sexagesimal(unsigned).ok_or_else(|| CyclopsError::MalformedCoordinate {
            star: star.to_string(),
            value: value.to_string(),
        })?;
    let magnitude = d + m / 60.0 + s / 3600.0;
    Ok(if negative { -magnitude } else { magnitude })
}

// =============================================================================
// Sky-position model
// =============================================================================

/// One star's sky position as a unit vector plus distance and angular rates.
#[derive(Debug, Clone)]
pub struct SkyPosition {
    /// Star identifier
    pub identifier: String,
    /// ICRS direction as a unit vector (x toward RA 0/Dec 0, z toward the pole)
    unit: [f64; 3],
    /// Distance in parsecs, from `1000 / parallax_mas`
    distance_pc: f64,
    /// Proper motion along RA·cos(Dec), radians per year
    pm_ra_rad: f64,
    /// Proper motion along Dec, radians per year
    pm_dec_rad: f64,
}

impl SkyPosition {
    /// Build the model for one catalog record.
    ///
    /// Fails with `InvalidParallax` on a non-positive parallax, since the
    /// derived distance would be undefined or negative.
    pub fn from_record(record: &CatalogRecord) -> Result<Self> {
        if record.parallax <= 0.0 {
            return Err(CyclopsError::InvalidParallax {
                star: record.identifier.clone(),
                value: record.parallax,
            });
        }
        let ra_rad = parse_ra_deg(&record.identifier, &record.ra)?.to_radians();
        let dec_rad = parse_dec_deg(&record.identifier, &record.dec)?.to_radians();
        Ok(SkyPosition {
            identifier: record.identifier.clone(),
            unit: [
                dec_rad.cos() * ra_rad.cos(),
                dec_rad.cos() * ra_rad.sin(),
                dec_rad.sin(),
            ],
            distance_pc: 1000.0 / record.parallax,
            pm_ra_rad: record.pm_ra * RAD_PER_MAS,
            pm_dec_rad: record.pm_dec * RAD_PER_MAS,
        })
    }

    /// Distance expressed as light-travel time in years.
    pub fn light_travel_years(&self) -> f64 {
        self.distance_pc * LY_PER_PC
    }

    /// Displace the position by `years` of proper motion.
    ///
    /// The tangent basis (east, north) is recomputed at the current
    /// direction, the displacement applied in it, and the vector
    /// renormalized, so the path stays consistent with great circles.
    pub fn displaced(&self, years: f64) -> SkyPosition {
        let [x, y, z] = self.unit;
        let (ra, dec) = (y.atan2(x), z.clamp(-1.0, 1.0).asin());
        let east = [-ra.sin(), ra.cos(), 0.0];
        let north = [
            -dec.sin() * ra.cos(),
            -dec.sin() * ra.sin(),
            dec.cos(),
        ];
        let de = self.pm_ra_rad * years;
        let dn = self.pm_dec_rad * years;
        let moved = [
            x + east[0] * de + north[0] * dn,
            y + east[1] * de + north[1] * dn,
            z + east[2] * de + north[2] * dn,
        ];
        let norm = (moved[0] * moved[0] + moved[1] * moved[1] + moved[2] * moved[2]).sqrt();
        SkyPosition {
            identifier: self.identifier.clone(),
            unit: [moved[0] / norm, moved[1] / norm, moved[2] / norm],
            ..*self
        }
    }

    /// Current direction as (RA, Dec) in degrees, RA normalized to [0, 360).
    pub fn ra_dec_deg(&self) -> (f64, f64) {
        let [x, y, z] = self.unit;
        let mut ra = y.atan2(x).to_degrees();
        if ra < 0.0 {
            ra += 360.0;
        }
        (ra, z.clamp(-1.0, 1.0).asin().to_degrees())
    }
}

// =============================================================================
// Propagation
// =============================================================================

/// Propagate a whole snapshot by `offset_years`, optionally compensating
/// for light-travel delay.
///
/// Emits one [`ProjectedPosition`] per input record, identifier-matched and
/// in input order. Any invalid record fails the whole request; a silently
/// dropped star would break graph edges referencing it.
pub fn propagate(
    set: &RecordSet,
    offset_years: f64,
    light_delay: bool,
) -> Result<Vec<ProjectedPosition>> {
    let mut positions = Vec::with_capacity(set.records.len());
    for record in &set.records {
        let start = SkyPosition::from_record(record)?;
        let mut pos = start.displaced(offset_years);
        if light_delay {
            pos = pos.displaced(pos.light_travel_years());
        }
        let (ra_deg, dec_deg) = pos.ra_dec_deg();
        positions.push(ProjectedPosition {
            identifier: pos.identifier,
            ra_deg,
            dec_deg,
        });
    }
    Ok(positions)
}
