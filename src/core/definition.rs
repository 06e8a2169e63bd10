//! Constellation reference data
//!
//! A [`ConstellationDefinition`] maps constellation name → star identifier →
//! ordered neighbor list. It is loaded once from a JSON file, checked for
//! referential closure, and treated as read-only for the process lifetime.
//! It is passed explicitly into the adapter, validator and controller so
//! tests can substitute fixtures; there is no process-wide singleton.
//!
//! # File format
//!
//! ```json
//! {
//!   "Aquarius": {
//!     "alf Aqr": ["bet Aqr"],
//!     "bet Aqr": ["alf Aqr", "eps Aqr"],
//!     "eps Aqr": ["bet Aqr"]
//!   }
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{CyclopsError, Result};

/// Star identifier → ordered neighbor identifiers, for one constellation.
pub type StarMap = BTreeMap<String, Vec<String>>;

/// Immutable reference data driving both queries and validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstellationDefinition {
    constellations: BTreeMap<String, StarMap>,
}

impl ConstellationDefinition {
    /// Build a definition from an in-memory map, enforcing closure.
    pub fn new(constellations: BTreeMap<String, StarMap>) -> Result<Self> {
        let def = ConstellationDefinition { constellations };
        def.verify_closure()?;
        Ok(def)
    }

    /// Parse a definition from a JSON string, enforcing closure.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let constellations: BTreeMap<String, StarMap> = serde_json::from_str(json)?;
        Self::new(constellations)
    }

    /// Load a definition from a JSON file, enforcing closure.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CyclopsError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Every neighbor referenced under a constellation must itself be a key
    /// under that same constellation, a star is never its own neighbor, and
    /// no neighbor is listed twice. Repeated entries would break the
    /// edge-uniqueness guarantee of the graph builder.
    pub fn verify_closure(&self) -> Result<()> {
        for (constellation, stars) in &self.constellations {
            for (star, neighbors) in stars {
                let mut listed = BTreeSet::new();
                for neighbor in neighbors {
                    if neighbor == star {
                        return Err(CyclopsError::definition(format!(
                            "star '{star}' lists itself as a neighbor in '{constellation}'"
                        )));
                    }
                    if !stars.contains_key(neighbor) {
                        return Err(CyclopsError::definition(format!(
                            "neighbor '{neighbor}' of star '{star}' is not a key in '{constellation}'"
                        )));
                    }
                    if !listed.insert(neighbor.as_str()) {
                        return Err(CyclopsError::definition(format!(
                            "star '{star}' lists neighbor '{neighbor}' more than once in '{constellation}'"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Whether the named constellation exists.
    pub fn contains(&self, constellation: &str) -> bool {
        self.constellations.contains_key(constellation)
    }

    /// Iterate over constellation names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constellations.keys().map(String::as_str)
    }

    /// The star map of a constellation, or `UnknownConstellation`.
    pub fn stars(&self, constellation: &str) -> Result<&StarMap> {
        self.constellations
            .get(constellation)
            .ok_or_else(|| CyclopsError::UnknownConstellation {
                name: constellation.to_string(),
            })
    }

    /// The canonical neighbor list for a star, or `UnknownStar`.
    pub fn neighbors(&self, constellation: &str, star: &str) -> Result<&[String]> {
        let stars = self.stars(constellation)?;
        stars
            .get(star)
            .map(Vec::as_slice)
            .ok_or_else(|| CyclopsError::UnknownStar {
                star: star.to_string(),
                constellation: constellation.to_string(),
            })
    }

    /// Number of unique undirected edges implied by a constellation's
    /// neighbor lists (each A–B pair counted once).
    pub fn edge_count(&self, constellation: &str) -> Result<usize> {
        let stars = self.stars(constellation)?;
        let mut count = 0usize;
        let mut seen: Vec<&str> = Vec::with_capacity(stars.len());
        for (star, neighbors) in stars {
            seen.push(star);
            count += neighbors
                .iter()
                .filter(|n| !seen.contains(&n.as_str()))
                .count();
        }
        Ok(count)
    }
}
