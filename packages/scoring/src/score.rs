//! The route risk scorer.
//!
//! `score()` is a pure function of (route, incident store, now): corridor
//! construction, containment filtering, severity/recency weighting into
//! three bands, per-kilometer normalization, logarithmic compression, and
//! final score assembly.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use safe_route_incident_models::{RoutePoint, ScoreResult, SeverityBand};
use safe_route_spatial::{Corridor, route_length_km};
use safe_route_store::IncidentStore;

use crate::ScoreError;
use crate::config::RiskConfig;
use crate::decay::{age_days, time_factor};

/// Weight of the high-severity band in the combined risk score.
const BAND_WEIGHT_HIGH: f64 = 0.6;
/// Weight of the moderate-severity band.
const BAND_WEIGHT_MODERATE: f64 = 0.3;
/// Weight of the low-severity band.
const BAND_WEIGHT_LOW: f64 = 0.1;

/// Raw per-kilometer risk that compresses to a normalized risk of 1.0.
///
/// The compression denominator is `ln(1 + RISK_SATURATION_PER_KM)`, so a
/// corridor at this density maps to the score floor. Keeping the curve
/// logarithmic keeps the score monotone but sub-linear in incident count,
/// so extreme density degrades the score without collapsing it to zero.
const RISK_SATURATION_PER_KM: f64 = 10.0;

/// Lowest score any route can receive.
const SCORE_FLOOR: f64 = 0.1;
/// Range between the floor and the 1.0 ceiling.
const SCORE_SPAN: f64 = 0.9;

/// Score bonus granted per patrol-tagged incident in the corridor.
const PATROL_BONUS_STEP: f64 = 0.01;
/// Cap on the total patrol bonus.
const PATROL_BONUS_CAP: f64 = 0.05;

/// Default corridor radius in meters.
pub const DEFAULT_CORRIDOR_RADIUS_M: f64 = 50.0;

/// Scores routes against an incident store using a fixed set of risk
/// tables.
pub struct RouteScorer {
    config: RiskConfig,
}

impl RouteScorer {
    /// Creates a scorer with the given risk tables.
    #[must_use]
    pub const fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    /// Creates a scorer with the embedded default risk tables.
    #[must_use]
    pub fn with_default_config() -> Self {
        Self::new(RiskConfig::default())
    }

    /// Scores a route at the current wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError`] on an invalid route or a store failure.
    pub fn score(
        &self,
        store: &dyn IncidentStore,
        route: &[RoutePoint],
        radius_meters: f64,
    ) -> Result<ScoreResult, ScoreError> {
        self.score_at(store, route, radius_meters, Utc::now())
    }

    /// Scores a route at an explicit instant.
    ///
    /// Scoring the same route against an unchanged store at the same
    /// instant yields an identical result.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidRoute`] if the route is empty or any
    /// point has non-finite or out-of-range coordinates, and
    /// [`ScoreError::Store`] if the candidate fetch fails.
    pub fn score_at(
        &self,
        store: &dyn IncidentStore,
        route: &[RoutePoint],
        radius_meters: f64,
        now: DateTime<Utc>,
    ) -> Result<ScoreResult, ScoreError> {
        validate_route(route)?;

        let corridor =
            Corridor::build(route, radius_meters).ok_or_else(|| ScoreError::InvalidRoute {
                reason: "route must contain at least one point".to_string(),
            })?;

        let candidates = store.fetch_bbox(corridor.bounding_box())?;

        let mut high = 0.0f64;
        let mut moderate = 0.0f64;
        let mut low = 0.0f64;
        let mut breakdown: BTreeMap<String, u64> = BTreeMap::new();
        let mut patrol_count: u64 = 0;
        let mut matched: u64 = 0;

        for incident in &candidates {
            if !corridor.contains(incident.longitude, incident.latitude) {
                continue;
            }
            matched += 1;

            let severity = self.config.severity_for(&incident.incident_type);
            let factor = time_factor(age_days(&incident.datetime, now));

            match SeverityBand::for_weight(severity) {
                SeverityBand::High => high += factor,
                SeverityBand::Moderate => moderate += factor,
                SeverityBand::Low => low += factor,
            }

            *breakdown
                .entry(self.config.label_for(&incident.incident_type))
                .or_insert(0) += 1;

            if self.config.is_patrol(&incident.incident_type) {
                patrol_count += 1;
            }
        }

        let length_km = route_length_km(route);
        let raw_risk = BAND_WEIGHT_HIGH * (high / length_km)
            + BAND_WEIGHT_MODERATE * (moderate / length_km)
            + BAND_WEIGHT_LOW * (low / length_km);

        let normalized_risk = (1.0 + raw_risk).ln() / (1.0 + RISK_SATURATION_PER_KM).ln();
        let base = SCORE_FLOOR.max(SCORE_FLOOR + SCORE_SPAN * (1.0 - normalized_risk));

        #[allow(clippy::cast_precision_loss)]
        let patrol_bonus = PATROL_BONUS_CAP.min(PATROL_BONUS_STEP * patrol_count as f64);

        let safety_score = round3(1.0f64.min(base + patrol_bonus));

        log::debug!(
            "Scored route: {matched}/{} candidates in corridor, {length_km:.3} km, \
             raw risk {raw_risk:.4}, score {safety_score}",
            candidates.len(),
        );

        Ok(ScoreResult {
            safety_score,
            breakdown,
        })
    }
}

/// Rejects routes that violate the caller contract.
fn validate_route(route: &[RoutePoint]) -> Result<(), ScoreError> {
    if route.is_empty() {
        return Err(ScoreError::InvalidRoute {
            reason: "route must contain at least one point".to_string(),
        });
    }

    for (i, point) in route.iter().enumerate() {
        if !point.is_valid() {
            return Err(ScoreError::InvalidRoute {
                reason: format!(
                    "point {i} has invalid coordinates ({}, {})",
                    point.latitude, point.longitude
                ),
            });
        }
    }

    Ok(())
}

/// Rounds to 3 decimal places for the outward-facing score.
fn round3(value: f64) -> f64 {
    (value * 1_000.0).round() / 1_000.0
}
