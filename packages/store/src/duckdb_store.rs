//! File-backed `DuckDB` incident store.
//!
//! One ingest run produces one `DuckDB` file containing a single
//! `incidents` table. Replacement is write-then-swap: the new table is
//! built in a temporary sibling file and renamed over the previous store,
//! so a scorer holding the old file never observes a half-written one.

use std::path::Path;

use duckdb::Connection;
use safe_route_incident_models::{BoundingBox, Incident};

use crate::{IncidentStore, StoreError};

/// Number of rows per multi-row INSERT chunk (`DuckDB` handles large
/// batches well).
const CHUNK_SIZE: usize = 5_000;

/// Read-only handle to a `DuckDB` incident store file.
pub struct DuckDbStore {
    conn: Connection,
}

impl DuckDbStore {
    /// Opens an existing store file read-only.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file does not exist or cannot be
    /// opened.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let config = duckdb::Config::default().access_mode(duckdb::AccessMode::ReadOnly)?;
        let conn = Connection::open_with_flags(path, config)?;
        Ok(Self { conn })
    }

    /// Replaces the store at `path` with the given incidents.
    ///
    /// The new table is written to a `.tmp` sibling file which is then
    /// renamed over `path`, so readers see either the old store or the new
    /// one, never a partial write. Returns the number of rows written.
    ///
    /// Callers are responsible for refusing to replace a valid store with
    /// an empty record set; this function writes whatever it is given.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write or the rename fails.
    pub fn replace_all(path: &Path, incidents: &[Incident]) -> Result<u64, StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("duckdb.tmp");

        // Clear any leftovers from an interrupted previous run. DuckDB
        // also leaves a .wal alongside a file that wasn't closed cleanly.
        let wal_path = tmp_path.with_extension("tmp.wal");
        if tmp_path.exists() {
            std::fs::remove_file(&tmp_path)?;
        }
        if wal_path.exists() {
            std::fs::remove_file(&wal_path)?;
        }

        let conn = Connection::open(&tmp_path)?;
        create_schema(&conn)?;
        let written = insert_incidents(&conn, incidents)?;
        conn.close().map_err(|(_conn, e)| StoreError::DuckDb(e))?;

        std::fs::rename(&tmp_path, path)?;
        log::info!("Replaced incident store at {} ({written} rows)", path.display());

        Ok(written)
    }
}

impl IncidentStore for DuckDbStore {
    fn fetch_bbox(&self, bbox: &BoundingBox) -> Result<Vec<Incident>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT incident_type, latitude, longitude, datetime
             FROM incidents
             WHERE latitude BETWEEN ? AND ?
               AND longitude BETWEEN ? AND ?",
        )?;

        let rows = stmt.query_map(
            duckdb::params![bbox.south, bbox.north, bbox.west, bbox.east],
            |row| {
                Ok(Incident {
                    incident_type: row.get(0)?,
                    latitude: row.get(1)?,
                    longitude: row.get(2)?,
                    datetime: row.get(3)?,
                })
            },
        )?;

        let mut incidents = Vec::new();
        for row in rows {
            incidents.push(row?);
        }
        Ok(incidents)
    }

    fn count(&self) -> Result<u64, StoreError> {
        let mut stmt = self.conn.prepare("SELECT COUNT(*) FROM incidents")?;
        let count: i64 = stmt.query_row([], |row| row.get(0))?;
        #[allow(clippy::cast_sign_loss)]
        Ok(count as u64)
    }
}

fn create_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE incidents (
            incident_type TEXT NOT NULL,
            latitude DOUBLE NOT NULL,
            longitude DOUBLE NOT NULL,
            datetime TEXT NOT NULL
        );",
    )?;
    Ok(())
}

/// Inserts incidents with multi-row INSERT statements.
fn insert_incidents(conn: &Connection, incidents: &[Incident]) -> Result<u64, StoreError> {
    if incidents.is_empty() {
        return Ok(0);
    }

    let mut total_inserted = 0u64;

    for chunk in incidents.chunks(CHUNK_SIZE) {
        let mut sql =
            String::from("INSERT INTO incidents (incident_type, latitude, longitude, datetime) VALUES ");

        for (i, _) in chunk.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str("(?, ?, ?, ?)");
        }

        let mut stmt = conn.prepare(&sql)?;
        let mut param_idx = 1usize;

        for incident in chunk {
            stmt.raw_bind_parameter(param_idx, &incident.incident_type)?;
            stmt.raw_bind_parameter(param_idx + 1, incident.latitude)?;
            stmt.raw_bind_parameter(param_idx + 2, incident.longitude)?;
            stmt.raw_bind_parameter(param_idx + 3, &incident.datetime)?;
            param_idx += 4;
        }

        let rows = stmt.raw_execute()?;
        total_inserted += u64::try_from(rows).unwrap_or(0);
    }

    Ok(total_inserted)
}
