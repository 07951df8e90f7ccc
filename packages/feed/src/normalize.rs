//! Feed row normalization.
//!
//! Renames source-specific columns to the canonical incident schema,
//! drops rows with missing required fields or unusable coordinates, and
//! applies the feed's optional category and time-window filters.

use chrono::{DateTime, NaiveDateTime, Utc};
use safe_route_incident_models::Incident;

use crate::feed_def::FeedDefinition;
use crate::reader::FeedRow;

/// Normalizes raw feed rows into canonical incidents.
///
/// Rows are dropped (never errored) when:
/// - the incident type, latitude, longitude, or datetime cell is missing
///   or empty,
/// - a coordinate fails to parse, is zero (null-island placeholder), or
///   is outside the WGS84 valid range,
/// - an active category filter does not list the row's type,
/// - an active `since` filter predates the row's parseable timestamp.
///
/// A row whose timestamp is present but unparseable passes the `since`
/// filter; the datetime is kept verbatim and the scorer treats it as
/// maximally stale.
#[must_use]
pub fn normalize_rows(def: &FeedDefinition, rows: &[FeedRow]) -> Vec<Incident> {
    let since = def
        .filter
        .as_ref()
        .and_then(|f| f.since.as_deref())
        .and_then(|s| {
            let parsed = parse_feed_datetime(s);
            if parsed.is_none() {
                log::warn!("{}: unparseable `since` filter {s:?}, ignoring", def.id);
            }
            parsed
        });

    let categories: Option<Vec<String>> = def
        .filter
        .as_ref()
        .and_then(|f| f.categories.as_ref())
        .map(|cats| cats.iter().map(|c| normalize_category(c)).collect());

    let mut dropped: u64 = 0;
    let mut filtered: u64 = 0;
    let mut incidents = Vec::with_capacity(rows.len());

    for row in rows {
        let Some(incident) = normalize_row(def, row) else {
            dropped += 1;
            continue;
        };

        if let Some(cats) = &categories
            && !cats.contains(&normalize_category(&incident.incident_type))
        {
            filtered += 1;
            continue;
        }

        if let Some(since) = since
            && let Some(occurred) = parse_feed_datetime(&incident.datetime)
            && occurred < since
        {
            filtered += 1;
            continue;
        }

        incidents.push(incident);
    }

    if dropped > 0 || filtered > 0 {
        log::info!(
            "{}: dropped {dropped} malformed rows, filtered {filtered} out-of-scope rows",
            def.id
        );
    }

    incidents
}

/// Normalizes one row, or `None` if a required field is missing or a
/// coordinate is unusable.
fn normalize_row(def: &FeedDefinition, row: &FeedRow) -> Option<Incident> {
    let incident_type = non_empty(row.get(&def.fields.incident_type)?)?;
    let datetime = non_empty(row.get(&def.fields.datetime)?)?;

    let latitude: f64 = non_empty(row.get(&def.fields.latitude)?)?.parse().ok()?;
    let longitude: f64 = non_empty(row.get(&def.fields.longitude)?)?.parse().ok()?;

    if latitude == 0.0 || longitude == 0.0 {
        return None;
    }
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return None;
    }

    Some(Incident {
        incident_type: incident_type.to_string(),
        latitude,
        longitude,
        datetime: datetime.to_string(),
    })
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

fn normalize_category(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Parses the datetime formats seen in feed snapshots.
fn parse_feed_datetime(s: &str) -> Option<DateTime<Utc>> {
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

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed_def::parse_feed_toml;
    use std::collections::BTreeMap;

    fn test_def(filter: &str) -> FeedDefinition {
        let toml = format!(
            r#"
id = "test_feed"
name = "Test feed"

[fields]
incident_type = "primary_type"
latitude = "latitude"
longitude = "longitude"
datetime = "date"
{filter}
"#
        );
        parse_feed_toml(&toml).unwrap()
    }

    fn row(incident_type: &str, lat: &str, lng: &str, date: &str) -> FeedRow {
        let mut map = BTreeMap::new();
        map.insert("primary_type".to_string(), incident_type.to_string());
        map.insert("latitude".to_string(), lat.to_string());
        map.insert("longitude".to_string(), lng.to_string());
        map.insert("date".to_string(), date.to_string());
        map
    }

    #[test]
    fn renames_columns_to_the_canonical_schema() {
        let def = test_def("");
        let rows = vec![row("THEFT", "41.88", "-87.63", "2026-08-01T12:00:00")];

        let incidents = normalize_rows(&def, &rows);
        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].incident_type, "THEFT");
        assert!((incidents[0].latitude - 41.88).abs() < f64::EPSILON);
        assert!((incidents[0].longitude - -87.63).abs() < f64::EPSILON);
        assert_eq!(incidents[0].datetime, "2026-08-01T12:00:00");
    }

    #[test]
    fn drops_rows_missing_required_fields() {
        let def = test_def("");
        let rows = vec![
            row("", "41.88", "-87.63", "2026-08-01T12:00:00"),
            row("THEFT", "", "-87.63", "2026-08-01T12:00:00"),
            row("THEFT", "41.88", "-87.63", ""),
            row("THEFT", "not-a-number", "-87.63", "2026-08-01T12:00:00"),
        ];

        assert!(normalize_rows(&def, &rows).is_empty());
    }

    #[test]
    fn drops_zero_and_out_of_range_coordinates() {
        let def = test_def("");
        let rows = vec![
            row("THEFT", "0.0", "-87.63", "2026-08-01T12:00:00"),
            row("THEFT", "41.88", "0", "2026-08-01T12:00:00"),
            row("THEFT", "91.0", "-87.63", "2026-08-01T12:00:00"),
            row("THEFT", "41.88", "-187.63", "2026-08-01T12:00:00"),
        ];

        assert!(normalize_rows(&def, &rows).is_empty());
    }

    #[test]
    fn keeps_rows_with_unparseable_datetimes() {
        let def = test_def("");
        let rows = vec![row("THEFT", "41.88", "-87.63", "sometime last week")];

        let incidents = normalize_rows(&def, &rows);
        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].datetime, "sometime last week");
    }

    #[test]
    fn category_filter_is_case_insensitive() {
        let def = test_def("\n[filter]\ncategories = [\"Theft\"]\n");
        let rows = vec![
            row("THEFT", "41.88", "-87.63", "2026-08-01T12:00:00"),
            row("ROBBERY", "41.88", "-87.63", "2026-08-01T12:00:00"),
        ];

        let incidents = normalize_rows(&def, &rows);
        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].incident_type, "THEFT");
    }

    #[test]
    fn since_filter_keeps_new_and_unparseable_rows() {
        let def = test_def("\n[filter]\nsince = \"2026-01-01T00:00:00\"\n");
        let rows = vec![
            row("THEFT", "41.88", "-87.63", "2026-08-01T12:00:00"),
            row("THEFT", "41.88", "-87.63", "2025-06-01T12:00:00"),
            row("THEFT", "41.88", "-87.63", "unknown"),
        ];

        let incidents = normalize_rows(&def, &rows);
        assert_eq!(incidents.len(), 2);
        assert_eq!(incidents[0].datetime, "2026-08-01T12:00:00");
        assert_eq!(incidents[1].datetime, "unknown");
    }
}
