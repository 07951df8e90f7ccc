//! Risk configuration tables.
//!
//! Severity weights, display-label translations, and patrol-type tags are
//! explicit immutable configuration owned by the scorer (not ambient
//! global state), so tests can substitute alternate tables. A default
//! table is embedded at compile time.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

/// Default risk tables, baked into the binary at compile time.
const DEFAULT_RISK_TOML: &str = include_str!("../config/risk.toml");

/// Errors that can occur while loading risk configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A severity coefficient outside `[0, 1]`.
    #[error("invalid severity weight {value} for {category:?}: expected [0, 1]")]
    InvalidWeight {
        /// The offending category name.
        category: String,
        /// The out-of-range coefficient.
        value: f64,
    },
}

/// Raw deserialization shape of a risk TOML document.
#[derive(Debug, Deserialize)]
struct RawRiskConfig {
    default_severity: f64,
    #[serde(default)]
    patrol_types: Vec<String>,
    severity: BTreeMap<String, f64>,
    #[serde(default)]
    labels: BTreeMap<String, String>,
}

/// Immutable severity/label/patrol tables used by one scorer instance.
///
/// Lookup keys are normalized once at load time (trimmed, ASCII
/// uppercased) so per-incident lookups are plain map reads.
#[derive(Debug, Clone)]
pub struct RiskConfig {
    default_severity: f64,
    severity: BTreeMap<String, f64>,
    labels: BTreeMap<String, String>,
    patrol: BTreeSet<String>,
}

impl RiskConfig {
    /// Parses risk tables from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is malformed or any severity
    /// coefficient falls outside `[0, 1]`.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: RawRiskConfig = toml::from_str(input)?;

        if !(0.0..=1.0).contains(&raw.default_severity) {
            return Err(ConfigError::InvalidWeight {
                category: "default_severity".to_string(),
                value: raw.default_severity,
            });
        }

        let mut severity = BTreeMap::new();
        for (category, weight) in raw.severity {
            if !(0.0..=1.0).contains(&weight) {
                return Err(ConfigError::InvalidWeight {
                    category,
                    value: weight,
                });
            }
            severity.insert(normalize_key(&category), weight);
        }

        let labels = raw
            .labels
            .into_iter()
            .map(|(category, label)| (normalize_key(&category), label))
            .collect();

        let patrol = raw
            .patrol_types
            .iter()
            .map(|t| normalize_key(t))
            .collect();

        Ok(Self {
            default_severity: raw.default_severity,
            severity,
            labels,
            patrol,
        })
    }

    /// Returns the severity coefficient for a raw incident type.
    ///
    /// The lookup trims whitespace and ignores ASCII case; unrecognized
    /// types get the configured default (a low-severity bucket), never an
    /// error.
    #[must_use]
    pub fn severity_for(&self, incident_type: &str) -> f64 {
        self.severity
            .get(&normalize_key(incident_type))
            .copied()
            .unwrap_or(self.default_severity)
    }

    /// Translates a raw incident type into its display label.
    ///
    /// Unrecognized types pass through unchanged.
    #[must_use]
    pub fn label_for(&self, incident_type: &str) -> String {
        self.labels
            .get(&normalize_key(incident_type))
            .cloned()
            .unwrap_or_else(|| incident_type.to_string())
    }

    /// Returns whether the incident type is tagged as proactive patrol
    /// activity.
    #[must_use]
    pub fn is_patrol(&self, incident_type: &str) -> bool {
        self.patrol.contains(&normalize_key(incident_type))
    }

    /// The severity applied to types absent from the table.
    #[must_use]
    pub const fn default_severity(&self) -> f64 {
        self.default_severity
    }
}

impl Default for RiskConfig {
    /// Loads the embedded default tables.
    fn default() -> Self {
        Self::from_toml_str(DEFAULT_RISK_TOML).expect("embedded risk config is valid")
    }
}

fn normalize_key(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}
