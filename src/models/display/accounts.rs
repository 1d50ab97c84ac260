//! Multi-account report rendering

use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use super::report::ReportJson;
use crate::cli::OutputFormat;
use crate::client::models::ScanResult;
use crate::error::Result;
use crate::output::Formattable;
use crate::output::csv::format_resources_csv;
use crate::output::formatters::{format_rate, plural};
use crate::output::json::format_json;
use crate::output::table::{format_table, format_titled_table};
use crate::scanner::accounts::{AccountFailure, AccountsSummary, MultiAccountResult};

/// Per-account row for table output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct AccountDisplay {
    #[tabled(rename = "ACCOUNT")]
    pub account_id: String,

    #[tabled(rename = "RESOURCES")]
    pub resources: usize,

    #[tabled(rename = "WITH WAF")]
    pub with_waf: usize,

    #[tabled(rename = "NON-COMPLIANT")]
    pub non_compliant: usize,

    #[tabled(rename = "COMPLIANCE")]
    pub compliance: String,

    #[tabled(rename = "ERRORS")]
    pub errors: usize,
}

impl From<&ScanResult> for AccountDisplay {
    fn from(result: &ScanResult) -> Self {
        Self {
            account_id: result.account_id.clone(),
            resources: result.total_resources(),
            with_waf: result.resources_with_waf(),
            non_compliant: result.non_compliant_resources(),
            compliance: format_rate(result.compliance_rate()),
            errors: result.errors.len(),
        }
    }
}

/// Failed account row for table output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct AccountFailureDisplay {
    #[tabled(rename = "ACCOUNT")]
    pub account_id: String,

    #[tabled(rename = "ERROR")]
    pub error: String,
}

impl From<&AccountFailure> for AccountFailureDisplay {
    fn from(failure: &AccountFailure) -> Self {
        Self {
            account_id: failure.account_id.clone(),
            error: failure.error.clone(),
        }
    }
}

/// A completed multi-account scan, ready to print.
pub struct MultiAccountReport<'a> {
    result: &'a MultiAccountResult,
}

impl<'a> MultiAccountReport<'a> {
    pub fn new(result: &'a MultiAccountResult) -> Self {
        Self { result }
    }

    fn rows(&self) -> Vec<AccountDisplay> {
        self.result.scans.iter().map(AccountDisplay::from).collect()
    }

    fn failure_rows(&self) -> Vec<AccountFailureDisplay> {
        self.result
            .failures
            .iter()
            .map(AccountFailureDisplay::from)
            .collect()
    }

    fn header(&self) -> String {
        let summary = self.result.summary();
        format!(
            "{}\nAccounts: {} scanned, {} failed",
            "WAF Coverage Report".bold(),
            summary.accounts_scanned,
            summary.accounts_failed,
        )
    }

    fn footer(&self) -> String {
        let summary = self.result.summary();
        let mut lines = vec![
            format!(
                "Resources: {} | With WAF: {} ({}) | Compliant: {} ({})",
                summary.total_resources,
                summary.resources_with_waf,
                format_rate(summary.waf_coverage_rate),
                summary.compliant_resources,
                format_rate(summary.compliance_rate),
            ),
            format!(
                "Overall compliance rate: {} across {}",
                format_rate(summary.compliance_rate),
                plural(summary.accounts_scanned, "account")
            ),
        ];

        let non_compliant: Vec<_> = self
            .result
            .scans
            .iter()
            .flat_map(|scan| scan.non_compliant())
            .collect();
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
                    "  → {} {} {} ({})",
                    resource.account_id,
                    resource.resource_type.display_name(),
                    resource.name.as_deref().unwrap_or(&resource.arn),
                    resource.region
                ));
            }
        }

        if summary.errors > 0 {
            lines.push(format!("{} {}", "⚠".yellow(), plural(summary.errors, "scan error")));
        }

        if self.result.is_partial() {
            lines.push(format!(
                "{} {} could not be scanned",
                "✗".red(),
                plural(summary.accounts_failed, "account")
            ));
            for failure in &self.result.failures {
                lines.push(format!("  → {}: {}", failure.account_id, failure.error));
            }
        }

        lines.join("\n")
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
        if self.result.is_partial() {
            output.push_str("\n\n");
            output.push_str(&format_titled_table(
                "Failed Accounts",
                &self.failure_rows(),
            ));
        }
        output
    }
}

#[derive(Serialize)]
struct AccountsJson<'a> {
    /// `complete`, or `partial` when an account failed
    status: &'static str,
    summary: AccountsSummary,
    accounts: Vec<ReportJson<'a>>,
    failed_accounts: &'a [AccountFailure],
}

impl<'a> From<&'a MultiAccountResult> for AccountsJson<'a> {
    fn from(result: &'a MultiAccountResult) -> Self {
        Self {
            status: if result.is_partial() { "partial" } else { "complete" },
            summary: result.summary(),
            accounts: result.scans.iter().map(ReportJson::from).collect(),
            failed_accounts: &result.failures,
        }
    }
}

impl Formattable for MultiAccountReport<'_> {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Pretty => Ok(self.pretty()),
            OutputFormat::Table => Ok(self.table()),
            OutputFormat::Json => Ok(format_json(&AccountsJson::from(self.result))?),
            OutputFormat::Csv => format_resources_csv(self.result.resources()),
        }
    }
}
