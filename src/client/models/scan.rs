//! Scan aggregate and statistics

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{Resource, ResourceType};

/// A recoverable failure recorded during a scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanError {
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<ResourceType>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Result of a firewall coverage scan for one account.
///
/// Statistics are derived from `resources` on every call and never cached.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub account_id: String,
    pub regions_scanned: Vec<String>,
    pub scan_id: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub resources: Vec<Resource>,
    pub errors: Vec<ScanError>,
}

/// Aggregate statistics for a scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanSummary {
    pub total_resources: usize,
    pub resources_with_waf: usize,
    pub resources_without_waf: usize,
    pub compliant_resources: usize,
    pub non_compliant_resources: usize,
    pub waf_coverage_rate: f64,
    pub compliance_rate: f64,
    pub errors: usize,
}

impl ScanResult {
    pub fn new(account_id: impl Into<String>, regions_scanned: Vec<String>) -> Self {
        Self {
            account_id: account_id.into(),
            regions_scanned,
            scan_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            completed_at: None,
            resources: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Add a resource, stamping its scan time.
    pub fn add_resource(&mut self, mut resource: Resource) {
        resource.scanned_at = Some(Utc::now());
        self.resources.push(resource);
    }

    pub fn add_error(
        &mut self,
        region: impl Into<String>,
        resource_type: Option<ResourceType>,
        message: impl Into<String>,
    ) {
        self.errors.push(ScanError {
            region: region.into(),
            resource_type,
            message: message.into(),
            timestamp: Utc::now(),
        });
    }

    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    pub fn total_resources(&self) -> usize {
        self.resources.len()
    }

    pub fn resources_with_waf(&self) -> usize {
        self.resources.iter().filter(|r| r.has_policy()).count()
    }

    pub fn resources_without_waf(&self) -> usize {
        self.without_waf().len()
    }

    pub fn compliant_resources(&self) -> usize {
        self.resources.iter().filter(|r| r.is_compliant()).count()
    }

    pub fn non_compliant_resources(&self) -> usize {
        self.total_resources() - self.compliant_resources()
    }

    /// Percentage of compliant resources; an empty scan is vacuously 100%.
    pub fn compliance_rate(&self) -> f64 {
        let total = self.total_resources();
        if total == 0 {
            return 100.0;
        }
        self.compliant_resources() as f64 / total as f64 * 100.0
    }

    /// Percentage of resources with a directly attached policy.
    pub fn waf_coverage_rate(&self) -> f64 {
        let total = self.total_resources();
        if total == 0 {
            return 0.0;
        }
        self.resources_with_waf() as f64 / total as f64 * 100.0
    }

    pub fn non_compliant(&self) -> Vec<&Resource> {
        self.resources.iter().filter(|r| !r.is_compliant()).collect()
    }

    pub fn without_waf(&self) -> Vec<&Resource> {
        self.resources.iter().filter(|r| !r.has_policy()).collect()
    }

    pub fn by_type(&self, resource_type: ResourceType) -> Vec<&Resource> {
        self.resources
            .iter()
            .filter(|r| r.resource_type == resource_type)
            .collect()
    }

    pub fn by_region(&self, region: &str) -> Vec<&Resource> {
        self.resources.iter().filter(|r| r.region == region).collect()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn summary(&self) -> ScanSummary {
        ScanSummary {
            total_resources: self.total_resources(),
            resources_with_waf: self.resources_with_waf(),
            resources_without_waf: self.resources_without_waf(),
            compliant_resources: self.compliant_resources(),
            non_compliant_resources: self.non_compliant_resources(),
            waf_coverage_rate: self.waf_coverage_rate(),
            compliance_rate: self.compliance_rate(),
            errors: self.errors.len(),
        }
    }
}
