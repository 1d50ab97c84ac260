//! Scan report rendering
//!
//! Pretty output is a short header, the resource table and a compliance
//! footer. Table output drops the header and footer but adds an error table.

use colored::Colorize;
use serde::Serialize;

use super::resource::{ErrorDisplay, ResourceDisplay};
use crate::cli::OutputFormat;
use crate::client::models::{Resource, ResourceType, ScanError, ScanResult, ScanSummary};
use crate::error::Result;
use crate::output::Formattable;
use crate::output::csv::format_scan_csv;
use crate::output::formatters::{format_elapsed, format_rate, plural};
use crate::output::json::format_scan_json;
use crate::output::table::{format_table, format_titled_table};
use crate::scanner::compliance::ComplianceStatus;

/// A completed scan, ready to print.
pub struct ScanReport<'a> {
    result: &'a ScanResult,
}

impl<'a> ScanReport<'a> {
    pub fn new(result: &'a ScanResult) -> Self {
        Self { result }
    }

    fn rows(&self) -> Vec<ResourceDisplay> {
        self.result
            .resources
            .iter()
            .map(ResourceDisplay::from)
            .collect()
    }

    fn error_rows(&self) -> Vec<ErrorDisplay> {
        self.result.errors.iter().map(ErrorDisplay::from).collect()
    }

    fn header(&self) -> String {
        let result = self.result;
        format!(
            "{}\nAccount: {} | Scan ID: {}\nRegions: {} | Duration: {}",
            "WAF Coverage Report".bold(),
            result.account_id,
            result.scan_id,
            result.regions_scanned.join(", "),
            format_elapsed(&result.started_at, result.completed_at.as_ref()),
        )
    }

    fn footer(&self) -> String {
        let summary = self.result.summary();
        let mut lines = vec![format!(
            "Resources: {} | With WAF: {} ({}) | Compliant: {} ({})",
            summary.total_resources,
            summary.resources_with_waf,
            format_rate(summary.waf_coverage_rate),
            summary.compliant_resources,
            format_rate(summary.compliance_rate),
        )];

        lines.extend(self.breakdown());

        let non_compliant = self.result.non_compliant();
        if non_compliant.is_empty() {
            lines.push(format!("{} All resources are compliant", "✓".green()));
        } else {
            lines.push(format!(
                "{} {}",
                "✗".red(),
                plural(non_compliant.len(), "non-compliant resource")
            ));
            for resource in non_compliant {
                lines.push(format!(
                    "  → {} {} ({})",
                    resource.resource_type.display_name(),
                    resource.name.as_deref().unwrap_or(&resource.arn),
                    resource.region
                ));
            }
        }

        if self.result.has_errors() {
            lines.push(format!(
                "{} {}",
                "⚠".yellow(),
                plural(self.result.errors.len(), "scan error")
            ));
            for error in &self.result.errors {
                let scope = error.resource_type.map(|rt| rt.id()).unwrap_or("WAF");
                lines.push(format!("  → {} {}: {}", error.region, scope, error.message));
            }
        }

        lines.join("\n")
    }

    /// Per-region and per-type counts, skipped when there is only one bucket.
    fn breakdown(&self) -> Vec<String> {
        let result = self.result;
        let mut lines = Vec::new();

        if result.regions_scanned.len() > 1 {
            lines.push("By region:".to_string());
            for region in &result.regions_scanned {
                lines.push(bucket_line(region, &result.by_region(region)));
            }
        }

        let types: Vec<ResourceType> = ResourceType::ALL
            .into_iter()
            .filter(|rt| !result.by_type(*rt).is_empty())
            .collect();
        if types.len() > 1 {
            lines.push("By type:".to_string());
            for rt in types {
                lines.push(bucket_line(rt.display_name(), &result.by_type(rt)));
            }
        }

        lines
    }

    fn pretty(&self) -> String {
        format!(
            "{}\n\n{}\n\n{}",
            self.header(),
            format_table(&self.rows()),
            self.footer()
        )
    }

    fn table(&self) -> String {
        let mut output = format_table(&self.rows());
        if self.result.has_errors() {
            output.push_str("\n\n");
            output.push_str(&format_titled_table("Errors", &self.error_rows()));
        }
        output
    }
}

fn bucket_line(label: &str, resources: &[&Resource]) -> String {
    let failing = resources.iter().filter(|r| !r.is_compliant()).count();
    format!(
        "  {}: {}, {} non-compliant",
        label,
        plural(resources.len(), "resource"),
        failing
    )
}

/// JSON view of a resource with its evaluated status
#[derive(Serialize)]
struct ResourceJson<'a> {
    #[serde(flatten)]
    resource: &'a Resource,
    compliance_status: ComplianceStatus,
}

#[derive(Serialize)]
pub(super) struct ReportJson<'a> {
    account_id: &'a str,
    regions_scanned: &'a [String],
    started_at: String,
    completed_at: Option<String>,
    summary: ScanSummary,
    resources: Vec<ResourceJson<'a>>,
    errors: &'a [ScanError],
}

impl<'a> From<&'a ScanResult> for ReportJson<'a> {
    fn from(result: &'a ScanResult) -> Self {
        Self {
            account_id: &result.account_id,
            regions_scanned: &result.regions_scanned,
            started_at: result.started_at.to_rfc3339(),
            completed_at: result.completed_at.map(|t| t.to_rfc3339()),
            summary: result.summary(),
            resources: result
                .resources
                .iter()
                .map(|resource| ResourceJson {
                    resource,
                    compliance_status: resource.compliance_status(),
                })
                .collect(),
            errors: &result.errors,
        }
    }
}

impl Formattable for ScanReport<'_> {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Pretty => Ok(self.pretty()),
            OutputFormat::Table => Ok(self.table()),
            OutputFormat::Json => Ok(format_scan_json(
                &ReportJson::from(self.result),
                &self.result.scan_id,
            )?),
            OutputFormat::Csv => format_scan_csv(self.result),
        }
    }
}
