//! Scans across several accounts
//!
//! Each target account is reached through its own client (normally an
//! assumed role) and scanned by its own [`Scanner`]. An account that cannot
//! be reached or identified is recorded as failed and the remaining accounts
//! are still scanned.

use std::future::Future;
use std::sync::Arc;

use log::{error, info, warn};
use serde::Serialize;

use super::{ScanOptions, Scanner, dedup_preserving_order};
use crate::client::CloudApi;
use crate::client::models::{Resource, ScanResult};
use crate::error::ApiError;

/// Role assumed in every target account: `arn:aws:iam::{account}:role/{name}`
pub fn role_arn_for(account_id: &str, role_name: &str) -> String {
    format!("arn:aws:iam::{}:role/{}", account_id, role_name)
}

/// An account that produced no scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountFailure {
    pub account_id: String,
    pub error: String,
}

/// Totals over every account that was scanned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountsSummary {
    pub accounts_requested: usize,
    pub accounts_scanned: usize,
    pub accounts_failed: usize,
    pub total_resources: usize,
    pub resources_with_waf: usize,
    pub resources_without_waf: usize,
    pub compliant_resources: usize,
    pub non_compliant_resources: usize,
    pub waf_coverage_rate: f64,
    pub compliance_rate: f64,
    pub errors: usize,
}

/// Outcome of a multi-account scan, in request order.
#[derive(Debug, Default)]
pub struct MultiAccountResult {
    pub scans: Vec<ScanResult>,
    pub failures: Vec<AccountFailure>,
}

impl MultiAccountResult {
    fn sum(&self, count: impl Fn(&ScanResult) -> usize) -> usize {
        self.scans.iter().map(count).sum()
    }

    pub fn accounts_requested(&self) -> usize {
        self.scans.len() + self.failures.len()
    }

    pub fn total_resources(&self) -> usize {
        self.sum(ScanResult::total_resources)
    }

    pub fn resources_with_waf(&self) -> usize {
        self.sum(ScanResult::resources_with_waf)
    }

    pub fn compliant_resources(&self) -> usize {
        self.sum(ScanResult::compliant_resources)
    }

    pub fn non_compliant_resources(&self) -> usize {
        self.sum(ScanResult::non_compliant_resources)
    }

    /// Scan errors recorded inside the scanned accounts.
    pub fn scan_errors(&self) -> usize {
        self.sum(|scan| scan.errors.len())
    }

    /// Compliant share of every scanned resource; 100% when nothing was found.
    pub fn compliance_rate(&self) -> f64 {
        let total = self.total_resources();
        if total == 0 {
            return 100.0;
        }
        self.compliant_resources() as f64 / total as f64 * 100.0
    }

    pub fn waf_coverage_rate(&self) -> f64 {
        let total = self.total_resources();
        if total == 0 {
            return 0.0;
        }
        self.resources_with_waf() as f64 / total as f64 * 100.0
    }

    /// Some requested account could not be scanned.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.scans.iter().flat_map(|scan| scan.resources.iter())
    }

    pub fn summary(&self) -> AccountsSummary {
        let total_resources = self.total_resources();
        let resources_with_waf = self.resources_with_waf();
        AccountsSummary {
            accounts_requested: self.accounts_requested(),
            accounts_scanned: self.scans.len(),
            accounts_failed: self.failures.len(),
            total_resources,
            resources_with_waf,
            resources_without_waf: total_resources - resources_with_waf,
            compliant_resources: self.compliant_resources(),
            non_compliant_resources: self.non_compliant_resources(),
            waf_coverage_rate: self.waf_coverage_rate(),
            compliance_rate: self.compliance_rate(),
            errors: self.scan_errors(),
        }
    }
}

/// Scan each account in turn with a client from `connect`.
///
/// Duplicate account ids are scanned once. Never fails: an account whose
/// client cannot be built, or whose scan aborts, becomes an [`AccountFailure`].
pub async fn scan_accounts<F, Fut>(
    account_ids: &[String],
    options: &ScanOptions,
    connect: F,
) -> MultiAccountResult
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Arc<dyn CloudApi>, ApiError>>,
{
    let mut outcome = MultiAccountResult::default();

    for account_id in dedup_preserving_order(account_ids) {
        info!("Scanning account {}", account_id);

        let scanned = match connect(account_id.clone()).await {
            Ok(client) => Scanner::new(client, options.clone()).scan().await,
            Err(e) => Err(e),
        };

        match scanned {
            Ok(result) => {
                if result.account_id != account_id {
                    warn!(
                        "Requested account {} but credentials resolved to {}",
                        account_id, result.account_id
                    );
                }
                outcome.scans.push(result);
            }
            Err(e) => {
                error!("Error scanning account {}: {}", account_id, e);
                outcome.failures.push(AccountFailure {
                    account_id,
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        "Scanned {} of {} accounts: {} resources, {:.1}% compliant",
        outcome.scans.len(),
        outcome.accounts_requested(),
        outcome.total_resources(),
        outcome.compliance_rate()
    );
    outcome
}
