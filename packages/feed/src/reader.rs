//! CSV feed reader.
//!
//! Parses a downloaded feed snapshot into rows keyed by the column headers
//! in the first line, so normalization can address columns by the names a
//! feed definition maps.

use std::collections::BTreeMap;
use std::path::Path;

use crate::FeedError;

/// One raw feed row: column header -> cell value.
pub type FeedRow = BTreeMap<String, String>;

/// Reads every row of a CSV feed file.
///
/// # Errors
///
/// Returns [`FeedError`] if the file cannot be opened or a record fails
/// to parse as CSV.
pub fn read_rows(path: &Path) -> Result<Vec<FeedRow>, FeedError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: FeedRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();
        rows.push(row);
    }

    log::debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_temp_csv(name: &str, contents: &str) -> std::path::PathBuf {
        let path =
            std::env::temp_dir().join(format!("safe_route_feed_{name}_{}.csv", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_rows_keyed_by_header() {
        let path = write_temp_csv(
            "basic",
            "primary_type,latitude,longitude,date\n\
             THEFT,41.88,-87.63,2026-08-01T12:00:00\n",
        );

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("primary_type").unwrap(), "THEFT");
        assert_eq!(rows[0].get("latitude").unwrap(), "41.88");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn header_only_file_yields_no_rows() {
        let path = write_temp_csv("empty", "primary_type,latitude,longitude,date\n");
        assert!(read_rows(&path).unwrap().is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join("safe_route_feed_does_not_exist.csv");
        assert!(read_rows(&path).is_err());
    }
}
