#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Canonical incident and route types shared across the safe-route system.
//!
//! Every feed adapter normalizes its source-specific rows into [`Incident`]
//! records conforming to this schema, and every scoring call consumes a
//! [`RoutePoint`] sequence and produces a [`ScoreResult`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One historical safety-relevant event, normalized to the canonical schema.
///
/// Invariant: a stored incident always has coordinates inside the WGS84
/// valid ranges; rows missing or mangling either coordinate are dropped at
/// ingest. The `datetime` string is kept verbatim from the source; parsing
/// happens at scoring time so one bad timestamp can never fail an ingest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Raw incident category from the source vocabulary (e.g. "Assault
    /// Call", "Robbery"). Unrecognized values fall to the default severity
    /// bucket at scoring time; they are never rejected.
    pub incident_type: String,
    /// Latitude (WGS84 degrees).
    pub latitude: f64,
    /// Longitude (WGS84 degrees).
    pub longitude: f64,
    /// When the incident occurred, as an ISO-8601-ish string. Unparseable
    /// values are treated as maximally stale (age 365 days) when scored.
    pub datetime: String,
}

/// A single caller-supplied route vertex.
///
/// An ordered, non-empty sequence of these defines a route. A route of
/// length 1 is valid and is treated as a point rather than a line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePoint {
    /// Latitude (WGS84 degrees), must be finite and in `[-90, 90]`.
    pub latitude: f64,
    /// Longitude (WGS84 degrees), must be finite and in `[-180, 180]`.
    pub longitude: f64,
}

impl RoutePoint {
    /// Creates a new route point.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns whether both coordinates are finite and inside the WGS84
    /// valid ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A west/south/east/north envelope in WGS84 degrees.
///
/// Used to bound incident-store fetches by the corridor's extent before the
/// exact containment test runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    /// Minimum longitude.
    pub west: f64,
    /// Minimum latitude.
    pub south: f64,
    /// Maximum longitude.
    pub east: f64,
    /// Maximum latitude.
    pub north: f64,
}

impl BoundingBox {
    /// Creates a bounding box from its edges.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Returns whether the point lies inside the box (edges inclusive).
    #[must_use]
    pub fn contains(&self, longitude: f64, latitude: f64) -> bool {
        (self.west..=self.east).contains(&longitude)
            && (self.south..=self.north).contains(&latitude)
    }
}

/// Severity band a weighted incident contribution accumulates into.
///
/// Bands are derived from the configured severity coefficient: `High` for
/// weights at or above 0.6, `Moderate` at or above 0.3, `Low` otherwise.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SeverityBand {
    /// Violent or otherwise high-impact incidents (severity >= 0.6).
    High,
    /// Mid-impact incidents (severity >= 0.3).
    Moderate,
    /// Low-impact and administrative incidents.
    Low,
}

impl SeverityBand {
    /// Severity coefficient at or above which an incident is `High`.
    pub const HIGH_THRESHOLD: f64 = 0.6;
    /// Severity coefficient at or above which an incident is `Moderate`.
    pub const MODERATE_THRESHOLD: f64 = 0.3;

    /// Classifies a severity coefficient into its band.
    #[must_use]
    pub fn for_weight(weight: f64) -> Self {
        if weight >= Self::HIGH_THRESHOLD {
            Self::High
        } else if weight >= Self::MODERATE_THRESHOLD {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::High, Self::Moderate, Self::Low]
    }
}

/// Output of one scoring call.
///
/// Computed fresh per call and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Normalized safety score in `[0.1, 1.0]`, rounded to 3 decimal
    /// places. Higher is safer; 1.0 is a clean corridor.
    pub safety_score: f64,
    /// Raw occurrence counts within the corridor, keyed by display label.
    pub breakdown: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_point_validity() {
        assert!(RoutePoint::new(41.88, -87.63).is_valid());
        assert!(RoutePoint::new(-90.0, 180.0).is_valid());
        assert!(!RoutePoint::new(90.1, 0.0).is_valid());
        assert!(!RoutePoint::new(0.0, -180.5).is_valid());
        assert!(!RoutePoint::new(f64::NAN, 0.0).is_valid());
        assert!(!RoutePoint::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn bounding_box_contains_is_edge_inclusive() {
        let bbox = BoundingBox::new(-87.7, 41.8, -87.6, 41.9);
        assert!(bbox.contains(-87.65, 41.85));
        assert!(bbox.contains(-87.7, 41.8));
        assert!(bbox.contains(-87.6, 41.9));
        assert!(!bbox.contains(-87.71, 41.85));
        assert!(!bbox.contains(-87.65, 41.91));
    }

    #[test]
    fn band_thresholds() {
        assert_eq!(SeverityBand::for_weight(1.0), SeverityBand::High);
        assert_eq!(SeverityBand::for_weight(0.6), SeverityBand::High);
        assert_eq!(SeverityBand::for_weight(0.59), SeverityBand::Moderate);
        assert_eq!(SeverityBand::for_weight(0.3), SeverityBand::Moderate);
        assert_eq!(SeverityBand::for_weight(0.29), SeverityBand::Low);
        assert_eq!(SeverityBand::for_weight(0.0), SeverityBand::Low);
    }

    #[test]
    fn band_display_round_trips() {
        for band in SeverityBand::all() {
            let s = band.to_string();
            let parsed: SeverityBand = s.parse().unwrap();
            assert_eq!(parsed, *band);
        }
    }
}
