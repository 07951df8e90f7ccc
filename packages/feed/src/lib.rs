#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident store builder.
//!
//! Transforms a raw tabular incident feed (a CSV snapshot with
//! source-specific column names) into the canonical incident record set
//! and replaces the persisted store wholesale. Feed definitions are TOML
//! configs embedded at compile time.

pub mod feed_def;
pub mod normalize;
pub mod reader;
pub mod registry;

use std::path::Path;

use safe_route_store::DuckDbStore;

pub use feed_def::{FeedDefinition, FeedFilter, FieldMapping};

/// Errors that can occur while building an incident store.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// CSV read or parse error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error (feed file access).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Store write error.
    #[error("Store error: {0}")]
    Store(#[from] safe_route_store::StoreError),

    /// Feed TOML parse error.
    #[error("Feed definition parse error: {0}")]
    Definition(#[from] toml::de::Error),

    /// The filtered result set was empty. The prior store (if any) is
    /// left untouched: an empty snapshot must never silently replace a
    /// valid record set.
    #[error("feed {feed:?} produced no usable rows; existing store left in place")]
    EmptyFeed {
        /// The feed definition ID.
        feed: String,
    },
}

/// Builds (replaces) the incident store at `db_path` from a feed CSV.
///
/// Reads the snapshot, normalizes rows to the canonical schema, and
/// atomically swaps the new store over the previous one. Returns the
/// number of rows written.
///
/// # Errors
///
/// Returns [`FeedError::EmptyFeed`] if normalization and filtering leave
/// no rows (the existing store is not touched), or other [`FeedError`]
/// variants for CSV, I/O, and store failures.
pub fn build_store(
    def: &FeedDefinition,
    csv_path: &Path,
    db_path: &Path,
) -> Result<u64, FeedError> {
    log::info!("Building incident store from feed: {} ({})", def.name, def.id);

    let rows = reader::read_rows(csv_path)?;
    let raw_count = rows.len();

    let incidents = normalize::normalize_rows(def, &rows);
    log::info!(
        "{}: normalized {}/{raw_count} rows from {}",
        def.id,
        incidents.len(),
        csv_path.display()
    );

    if incidents.is_empty() {
        return Err(FeedError::EmptyFeed {
            feed: def.id.clone(),
        });
    }

    let written = DuckDbStore::replace_all(db_path, &incidents)?;
    Ok(written)
}
