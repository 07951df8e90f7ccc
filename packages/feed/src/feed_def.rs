//! Config-driven feed definition.
//!
//! [`FeedDefinition`] captures everything source-specific about a tabular
//! incident feed: which columns hold the canonical fields, and which
//! optional filters the source is known to need. A single generic
//! normalization path handles all feeds.

use serde::Deserialize;

use crate::FeedError;

/// A complete, config-driven incident feed definition.
///
/// Loaded from TOML files embedded at compile time.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedDefinition {
    /// Unique identifier (e.g., `"chicago_crimes"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Source-specific column names for the canonical fields.
    pub fields: FieldMapping,
    /// Optional row filters applied during normalization.
    #[serde(default)]
    pub filter: Option<FeedFilter>,
}

/// Maps source-specific column names to the canonical incident schema.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldMapping {
    /// Column holding the incident category.
    pub incident_type: String,
    /// Column holding the latitude.
    pub latitude: String,
    /// Column holding the longitude.
    pub longitude: String,
    /// Column holding the occurrence timestamp.
    pub datetime: String,
}

/// Optional filters a source is known to need.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedFilter {
    /// Restrict to these categories (trimmed, ASCII-case-insensitive).
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    /// Keep only rows at or after this instant (ISO-8601). Rows whose
    /// timestamp does not parse are kept: data-quality anomalies are
    /// absorbed, not used to shrink the record set.
    #[serde(default)]
    pub since: Option<String>,
}

/// Parses a feed definition from TOML.
///
/// # Errors
///
/// Returns [`FeedError::Definition`] if the TOML is malformed.
pub fn parse_feed_toml(input: &str) -> Result<FeedDefinition, FeedError> {
    Ok(toml::from_str(input)?)
}
