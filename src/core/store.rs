//! Storage boundary
//!
//! [`StarStore`] is the datastore seam: one bulk insert per validated
//! snapshot, one most-recent read per constellation. The core treats both
//! as atomic external calls; storage failures are surfaced, never retried.
//!
//! [`SqliteStore`] is the bundled implementation. A connection is a scoped
//! resource acquired per call and released on every exit path, which keeps
//! concurrent ingestions for disjoint constellations independent without
//! any in-process shared state.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::error::{CyclopsError, Result};
use super::models::{split_neighbors, CatalogRecord, RecordSet};

/// Column order of the stars table, matching the bulk-insert tuple shape
/// `(name, ra, dec, pm_ra, pm_dec, parallax, constellation, time, neighbors)`.
const STARS_COLUMNS: &str = "name, ra, dec, pm_ra, pm_dec, parallax, constellation, time, neighbors";

/// External datastore seam for validated record sets.
pub trait StarStore {
    /// Persist a whole snapshot in one bulk insert.
    fn insert_records(&self, set: &RecordSet) -> Result<()>;

    /// Fetch the single most recent snapshot for a constellation
    /// (maximum shared `time`), or `NothingStored`.
    fn most_recent(&self, constellation: &str) -> Result<RecordSet>;
}

/// SQLite-backed store. The schema is created lazily on first use.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Create a store over a database file path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        SqliteStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Open a scoped connection with the schema in place.
    fn open(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS stars (
                name          TEXT NOT NULL,
                ra            TEXT NOT NULL,
                dec           TEXT NOT NULL,
                pm_ra         REAL NOT NULL,
                pm_dec        REAL NOT NULL,
                parallax      REAL NOT NULL,
                constellation TEXT NOT NULL,
                time          TEXT NOT NULL,
                neighbors     TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_stars_constellation_time
                ON stars (constellation, time);",
        )?;
        Ok(conn)
    }
}

impl StarStore for SqliteStore {
    fn insert_records(&self, set: &RecordSet) -> Result<()> {
        let mut conn = self.open()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO stars ({STARS_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
            ))?;
            for rec in &set.records {
                stmt.execute(params![
                    rec.identifier,
                    rec.ra,
                    rec.dec,
                    rec.pm_ra,
                    rec.pm_dec,
                    rec.parallax,
                    rec.constellation,
                    rec.time.to_rfc3339(),
                    rec.neighbors_wire(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn most_recent(&self, constellation: &str) -> Result<RecordSet> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {STARS_COLUMNS} FROM stars
             WHERE constellation = ?1
               AND time = (SELECT MAX(time) FROM stars WHERE constellation = ?1)
             ORDER BY name"
        ))?;

        let rows = stmt.query_map(params![constellation], |row| {
            let neighbors_wire: String = row.get(8)?;
            Ok(CatalogRecord {
                identifier: row.get(0)?,
                ra: row.get(1)?,
                dec: row.get(2)?,
                pm_ra: row.get(3)?,
                pm_dec: row.get(4)?,
                parallax: row.get(5)?,
                constellation: row.get(6)?,
                time: row.get::<_, DateTime<Utc>>(7)?,
                neighbors: split_neighbors(&neighbors_wire),
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }

        if records.is_empty() {
            return Err(CyclopsError::NothingStored {
                constellation: constellation.to_string(),
            });
        }

        let retrieved_at = records[0].time;
        Ok(RecordSet {
            constellation: constellation.to_string(),
            retrieved_at,
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn sample_record(identifier: &str, time: DateTime<Utc>) -> CatalogRecord {
        CatalogRecord {
            identifier: identifier.to_string(),
            ra: "22 05 47.0360".to_string(),
            dec: "-00 19 11.457".to_string(),
            pm_ra: 18.77,
            pm_dec: -9.34,
            parallax: 6.23,
            constellation: "Aquarius".to_string(),
            time,
            neighbors: vec!["bet Aqr".to_string()],
        }
    }

    fn sample_set(time: DateTime<Utc>) -> RecordSet {
        RecordSet {
            constellation: "Aquarius".to_string(),
            retrieved_at: time,
            records: vec![sample_record("alf Aqr", time), sample_record("bet Aqr", time)],
        }
    }

    #[test]
    fn test_insert_and_read_back() {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::new(dir.path().join("stars.db"));
        let time = Utc.with_ymd_and_hms(2022, 6, 1, 12, 0, 0).unwrap();

        store.insert_records(&sample_set(time)).unwrap();
        let read = store.most_recent("Aquarius").unwrap();

        assert_eq!(read.len(), 2);
        assert_eq!(read.retrieved_at, time);
        let alf = read.record("alf Aqr").unwrap();
        assert_eq!(alf.pm_ra, 18.77);
        assert_eq!(alf.neighbors, vec!["bet Aqr"]);
    }

    #[test]
    fn test_most_recent_picks_latest_snapshot() {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::new(dir.path().join("stars.db"));
        let older = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2022, 6, 1, 0, 0, 0).unwrap();

        store.insert_records(&sample_set(older)).unwrap();
        store.insert_records(&sample_set(newer)).unwrap();

        let read = store.most_recent("Aquarius").unwrap();
        assert_eq!(read.retrieved_at, newer);
        assert_eq!(read.len(), 2);
    }

    #[test]
    fn test_empty_store_reports_nothing_stored() {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::new(dir.path().join("stars.db"));
        let err = store.most_recent("Aquarius").unwrap_err();
        assert!(matches!(err, CyclopsError::NothingStored { .. }));
    }

    #[test]
    fn test_constellations_are_disjoint() {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::new(dir.path().join("stars.db"));
        let time = Utc.with_ymd_and_hms(2022, 6, 1, 12, 0, 0).unwrap();
        store.insert_records(&sample_set(time)).unwrap();

        let err = store.most_recent("Orion").unwrap_err();
        assert!(matches!(err, CyclopsError::NothingStored { .. }));
    }
}
