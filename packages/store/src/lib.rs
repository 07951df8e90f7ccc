#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident repository abstraction.
//!
//! Scoring never touches a database directly: it fetches candidate
//! incidents through the [`IncidentStore`] trait, bounded by the corridor's
//! bounding box, so the storage backend (file-backed `DuckDB`, in-memory
//! R-tree) is swappable without touching the scoring algorithm.

pub mod duckdb_store;
pub mod memory;

use safe_route_incident_models::{BoundingBox, Incident};

pub use duckdb_store::DuckDbStore;
pub use memory::MemoryStore;

/// Errors that can occur during incident store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// `DuckDB` query or connection error.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// I/O error (store file create/rename).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only access to the incident record set.
///
/// The record set is immutable during scoring; it is only ever replaced
/// wholesale by an ingest run (write-then-swap, atomic from the reader's
/// point of view).
pub trait IncidentStore {
    /// Fetches every incident whose coordinates fall inside `bbox`
    /// (edges inclusive).
    ///
    /// This is a coarse envelope prefilter; callers apply the exact
    /// corridor containment test to the returned candidates.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the underlying backend fails.
    fn fetch_bbox(&self, bbox: &BoundingBox) -> Result<Vec<Incident>, StoreError>;

    /// Returns the total number of stored incidents.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the underlying backend fails.
    fn count(&self) -> Result<u64, StoreError>;
}
