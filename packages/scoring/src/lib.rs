#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Route risk scoring engine.
//!
//! Converts a route and the incident record set into a bounded safety
//! score plus a labeled breakdown: corridor construction, spatial
//! filtering, severity and recency weighting, route-length normalization,
//! and logarithmic score compression.

pub mod config;
pub mod decay;
pub mod score;

pub use config::{ConfigError, RiskConfig};
pub use score::RouteScorer;

/// Errors that can occur during a scoring call.
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    /// The caller supplied an invalid route (empty sequence, non-finite or
    /// out-of-range coordinates). This is a contract violation, not a
    /// computational fallback.
    #[error("Invalid route: {reason}")]
    InvalidRoute {
        /// Description of what the caller got wrong.
        reason: String,
    },

    /// The incident store failed while fetching candidates.
    #[error("Store error: {0}")]
    Store(#[from] safe_route_store::StoreError),
}
