//! CSV output formatting
//!
//! One row per resource with its firewall association and compliance status.

use std::path::{Path, PathBuf};

use chrono::Utc;
use csv::Writer;
use serde::Serialize;

use super::formatters::{format_timestamp, yes_no};
use crate::client::models::{Resource, ScanResult};
use crate::error::Result;

/// Column headers of the scan report, in order.
pub const CSV_HEADERS: [&str; 14] = [
    "Account ID",
    "Region",
    "Resource Type",
    "Resource Name",
    "Resource ARN",
    "Has WAF",
    "WAF Name",
    "WAF ARN",
    "Is Public",
    "Compliance Status",
    "Scanned At",
    "Fronted By Resource",
    "Fronted By WAF",
    "Notes",
];

fn resource_record(resource: &Resource) -> [String; 14] {
    let fronted_by = resource.fronted_by.as_ref();
    [
        resource.account_id.clone(),
        resource.region.clone(),
        resource.resource_type.display_name().to_string(),
        resource.name.clone().unwrap_or_default(),
        resource.arn.clone(),
        yes_no(resource.has_policy()).to_string(),
        resource.policy_name().unwrap_or_default().to_string(),
        resource.policy_arn().unwrap_or_default().to_string(),
        yes_no(resource.is_public).to_string(),
        resource.compliance_status().as_str().to_string(),
        format_timestamp(resource.scanned_at.as_ref()),
        fronted_by.map(|f| f.resource_id.clone()).unwrap_or_default(),
        fronted_by
            .map(|f| f.policy.name().to_string())
            .unwrap_or_default(),
        fronted_by.map(|f| f.note.clone()).unwrap_or_default(),
    ]
}

/// Render resources as CSV report rows with a header row.
pub fn format_resources_csv<'a>(resources: impl IntoIterator<Item = &'a Resource>) -> Result<String> {
    let mut wtr = Writer::from_writer(vec![]);

    wtr.write_record(CSV_HEADERS)?;
    for resource in resources {
        wtr.write_record(resource_record(resource))?;
    }

    let data = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}

/// Render a scan report as CSV with a header row.
pub fn format_scan_csv(result: &ScanResult) -> Result<String> {
    format_resources_csv(&result.resources)
}

/// Render serializable rows as CSV, headers taken from field names.
pub fn format_rows<T: Serialize>(rows: &[T]) -> Result<String> {
    let mut wtr = Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?;
    }

    let data = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}

/// Default report filename: `waf-scan-{account}-{YYYYmmdd-HHMMSS}.csv`
pub fn default_filename(result: &ScanResult) -> String {
    format!(
        "waf-scan-{}-{}.csv",
        result.account_id,
        Utc::now().format("%Y%m%d-%H%M%S")
    )
}

/// Default filename for a report spanning several accounts.
pub fn accounts_filename() -> String {
    format!("waf-scan-accounts-{}.csv", Utc::now().format("%Y%m%d-%H%M%S"))
}

/// Append `.csv` unless the path already ends with it.
pub fn ensure_csv_extension(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == "csv") {
        return path.to_path_buf();
    }
    let mut raw = path.as_os_str().to_os_string();
    raw.push(".csv");
    PathBuf::from(raw)
}

/// Write a scan report to `path`, creating parent directories.
///
/// Returns the path actually written, which always ends in `.csv`.
pub fn write_csv_file(result: &ScanResult, path: &Path) -> Result<PathBuf> {
    write_csv_report(path, &format_scan_csv(result)?, result.resources.len())
}

/// Write already rendered CSV holding `rows` resources.
pub fn write_csv_report(path: &Path, contents: &str, rows: usize) -> Result<PathBuf> {
    let path = ensure_csv_extension(path);

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(&path, contents)?;
    log::info!("Wrote {} resources to {}", rows, path.display());

    Ok(path)
}
