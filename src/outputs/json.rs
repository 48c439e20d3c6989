//! JSON output of the run report.
//!
//! Reports are grouped by the UTC date of the run's reference instant, one
//! file per run named after its start time, so repeated runs on one day
//! never overwrite each other.

use crate::models::ScanReport;
use crate::utils::ensure_writable_dir;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Path of the report file for `report` under `json_output_dir`.
pub fn report_path(report: &ScanReport, json_output_dir: &str) -> String {
    format!(
        "{}/{}/{}.json",
        json_output_dir.trim_end_matches('/'),
        report.started_at.format("%Y-%m-%d"),
        report.started_at.format("%H%M%S")
    )
}

/// Write a [`ScanReport`] as pretty-printed JSON.
///
/// # Returns
///
/// The path that was written, or an error if the directory is not writable
/// or the file cannot be created.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_report(
    report: &ScanReport,
    json_output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;

    let day_dir = format!(
        "{}/{}",
        json_output_dir.trim_end_matches('/'),
        report.started_at.format("%Y-%m-%d")
    );
    ensure_writable_dir(&day_dir).await?;

    let path = report_path(report, json_output_dir);
    info!(path = %path, "Writing JSON");
    fs::write(&path, json).await?;
    info!(
        path = %path,
        matches = report.matches.len(),
        errors = report.errors.len(),
        "Wrote JSON report"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn empty_report() -> ScanReport {
        ScanReport {
            started_at: Utc.with_ymd_and_hms(2025, 5, 6, 7, 15, 0).unwrap(),
            matches: vec![],
            errors: vec![],
        }
    }

    #[test]
    fn test_report_path() {
        assert_eq!(
            report_path(&empty_report(), "/tmp/reports/"),
            "/tmp/reports/2025-05-06/071500.json"
        );
    }

    #[tokio::test]
    async fn test_write_report_into_dated_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_str().unwrap();

        let path = write_report(&empty_report(), dir).await.unwrap();
        assert_eq!(path, format!("{dir}/2025-05-06/071500.json"));
        let written = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["started_at"], "2025-05-06T07:15:00Z");
        assert_eq!(value["matches"].as_array().unwrap().len(), 0);
    }
}
