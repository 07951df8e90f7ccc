//! Incident recency weighting.
//!
//! Incident timestamps arrive as ISO-8601-ish strings from heterogeneous
//! feeds. Parsing tries the formats seen in the wild; a timestamp that
//! parses under none of them is treated as maximally stale rather than
//! failing the scoring call.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Age in days assigned to incidents whose timestamp cannot be parsed.
pub const STALE_AGE_DAYS: i64 = 365;

/// Parses an incident datetime string into a UTC instant.
///
/// Accepted formats, tried in order:
/// - RFC 3339 (`2026-08-01T12:00:00Z`, with offset)
/// - naive ISO with `T` separator, optional fractional seconds
/// - naive ISO with space separator, optional fractional seconds
/// - bare date (`2026-08-01`, taken as midnight UTC)
#[must_use]
pub fn parse_incident_datetime(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}

/// Computes the incident's age in days at `now`.
///
/// Unparseable timestamps yield [`STALE_AGE_DAYS`].
#[must_use]
pub fn age_days(datetime: &str, now: DateTime<Utc>) -> i64 {
    parse_incident_datetime(datetime)
        .map_or(STALE_AGE_DAYS, |dt| (now - dt).num_days())
}

/// Step-function discount applied to older incidents.
///
/// Monotone non-increasing in age at the defined breakpoints
/// (7/30/90/180/365 days). Ages at or below zero (clock skew, future
/// timestamps) land in the freshest bucket.
#[must_use]
pub const fn time_factor(age_days: i64) -> f64 {
    match age_days {
        i64::MIN..=7 => 1.0,
        8..=30 => 0.8,
        31..=90 => 0.6,
        91..=180 => 0.4,
        181..=365 => 0.2,
        _ => 0.1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap()
    }

    #[test]
    fn parses_rfc3339_with_zulu() {
        let dt = parse_incident_datetime("2026-08-01T12:00:00Z").unwrap();
        assert_eq!(dt.to_string(), "2026-08-01 12:00:00 UTC");
    }

    #[test]
    fn parses_naive_iso_with_fractional() {
        let dt = parse_incident_datetime("2026-08-01T12:00:00.000").unwrap();
        assert_eq!(dt.to_string(), "2026-08-01 12:00:00 UTC");
    }

    #[test]
    fn parses_space_separated() {
        let dt = parse_incident_datetime("2026-08-01 12:00:00").unwrap();
        assert_eq!(dt.to_string(), "2026-08-01 12:00:00 UTC");
    }

    #[test]
    fn parses_bare_date_as_midnight() {
        let dt = parse_incident_datetime("2026-08-01").unwrap();
        assert_eq!(dt.to_string(), "2026-08-01 00:00:00 UTC");
    }

    #[test]
    fn unparseable_is_maximally_stale() {
        assert!(parse_incident_datetime("not-a-date").is_none());
        assert_eq!(age_days("not-a-date", fixed_now()), STALE_AGE_DAYS);
        assert!((time_factor(age_days("garbage", fixed_now())) - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn age_is_computed_against_now() {
        assert_eq!(age_days("2026-08-02T12:00:00", fixed_now()), 5);
        assert_eq!(age_days("2026-06-28T12:00:00", fixed_now()), 40);
    }

    #[test]
    fn step_function_breakpoints() {
        assert!((time_factor(0) - 1.0).abs() < f64::EPSILON);
        assert!((time_factor(7) - 1.0).abs() < f64::EPSILON);
        assert!((time_factor(8) - 0.8).abs() < f64::EPSILON);
        assert!((time_factor(30) - 0.8).abs() < f64::EPSILON);
        assert!((time_factor(31) - 0.6).abs() < f64::EPSILON);
        assert!((time_factor(90) - 0.6).abs() < f64::EPSILON);
        assert!((time_factor(91) - 0.4).abs() < f64::EPSILON);
        assert!((time_factor(180) - 0.4).abs() < f64::EPSILON);
        assert!((time_factor(181) - 0.2).abs() < f64::EPSILON);
        assert!((time_factor(365) - 0.2).abs() < f64::EPSILON);
        assert!((time_factor(366) - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn time_factor_is_monotone_non_increasing() {
        let ages = [-5, 0, 7, 8, 30, 31, 90, 91, 180, 181, 365, 366, 1000];
        for pair in ages.windows(2) {
            assert!(
                time_factor(pair[0]) >= time_factor(pair[1]),
                "time_factor not monotone between {} and {} days",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn future_timestamps_land_in_the_freshest_bucket() {
        assert!((time_factor(-3) - 1.0).abs() < f64::EPSILON);
    }
}
