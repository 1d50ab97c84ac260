//! Inventory snapshot client
//!
//! Serves collaborator calls from an exported account inventory (YAML or
//! JSON). Used for offline audits of a captured account, demos and the
//! binary-level tests.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use super::api::{DistributionApi, FirewallApi, IdentityApi, InventoryApi};
use super::models::{
    CallerIdentity, DistributionRecord, PolicyAssociations, PolicyScope, ProtectionPolicy,
    Resource, ResourceType,
};
use crate::error::{ApiError, ConfigError};

/// On-disk inventory snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct InventorySnapshot {
    pub account_id: String,
    #[serde(default)]
    pub caller_arn: Option<String>,
    #[serde(default)]
    pub resources: Vec<SnapshotResource>,
    #[serde(default)]
    pub policies: Vec<SnapshotPolicy>,
    #[serde(default)]
    pub distributions: Vec<DistributionRecord>,
    #[serde(default)]
    pub failures: Vec<SnapshotFailure>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotResource {
    pub arn: String,
    pub resource_type: ResourceType,
    pub region: String,
    /// Defaults to the snapshot account
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    /// DNS name, load balancers only
    #[serde(default)]
    pub dns_name: Option<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotPolicy {
    pub arn: String,
    pub name: String,
    pub id: String,
    pub scope: PolicyScope,
    pub region: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub protected_resources: Vec<String>,
}

/// Which collaborator call a recorded failure applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureOperation {
    /// Resource enumeration for `resource_type` in `region`
    #[default]
    Enumerate,
    /// Policy listing for `region`, any scope
    Policies,
    /// Distribution listing, region ignored
    Distributions,
}

/// A collaborator call that failed when the snapshot was captured.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotFailure {
    #[serde(default)]
    pub operation: FailureOperation,
    pub region: String,
    #[serde(default)]
    pub resource_type: Option<ResourceType>,
    pub message: String,
}

impl SnapshotFailure {
    fn matches(&self, operation: FailureOperation, region: &str, rt: Option<ResourceType>) -> bool {
        if self.operation != operation {
            return false;
        }
        match operation {
            FailureOperation::Enumerate => self.region == region && self.resource_type == rt,
            FailureOperation::Policies => self.region == region,
            FailureOperation::Distributions => true,
        }
    }

    fn to_api_error(&self, service: &str) -> ApiError {
        if self.message.contains("AccessDenied") {
            ApiError::AccessDenied(self.message.clone())
        } else if self.message.contains("Throttl") {
            ApiError::Throttled {
                service: service.to_string(),
            }
        } else {
            ApiError::Unavailable(self.message.clone())
        }
    }
}

/// [`CloudApi`](super::CloudApi) implementation backed by an inventory snapshot.
pub struct InventoryFileClient {
    snapshot: InventorySnapshot,
    policies: Vec<PolicyAssociations>,
}

impl InventoryFileClient {
    /// Load a snapshot from disk. `.json` files are parsed as JSON, anything
    /// else as YAML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let inventory_error = |reason: String| ConfigError::Inventory {
            path: path.display().to_string(),
            reason,
        };

        let contents = std::fs::read_to_string(path).map_err(|e| inventory_error(e.to_string()))?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let snapshot: InventorySnapshot = if is_json {
            serde_json::from_str(&contents).map_err(|e| inventory_error(e.to_string()))?
        } else {
            serde_yaml::from_str(&contents).map_err(|e| inventory_error(e.to_string()))?
        };

        debug!(
            "Loaded inventory snapshot {} ({} resources, {} policies, {} distributions)",
            path.display(),
            snapshot.resources.len(),
            snapshot.policies.len(),
            snapshot.distributions.len()
        );
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn from_snapshot(snapshot: InventorySnapshot) -> Self {
        let policies = snapshot
            .policies
            .iter()
            .map(|p| PolicyAssociations {
                policy: ProtectionPolicy::new(&p.arn, &p.name, &p.id, p.scope, &p.region)
                    .with_description(p.description.clone()),
                resource_ids: p.protected_resources.clone(),
            })
            .collect();

        Self { snapshot, policies }
    }

    fn failure(
        &self,
        operation: FailureOperation,
        region: &str,
        resource_type: Option<ResourceType>,
    ) -> Option<&SnapshotFailure> {
        self.snapshot
            .failures
            .iter()
            .find(|f| f.matches(operation, region, resource_type))
    }
}

#[async_trait]
impl IdentityApi for InventoryFileClient {
    async fn caller_identity(&self) -> Result<CallerIdentity, ApiError> {
        let account = self.snapshot.account_id.clone();
        let arn = self
            .snapshot
            .caller_arn
            .clone()
            .unwrap_or_else(|| format!("arn:aws:iam::{}:root", account));

        Ok(CallerIdentity {
            user_id: account.clone(),
            account,
            arn,
        })
    }
}

#[async_trait]
impl InventoryApi for InventoryFileClient {
    async fn enumerate_resources(
        &self,
        resource_type: ResourceType,
        region: &str,
    ) -> Result<Vec<Resource>, ApiError> {
        if let Some(failure) = self.failure(FailureOperation::Enumerate, region, Some(resource_type))
        {
            return Err(failure.to_api_error(resource_type.service()));
        }

        let resources: Vec<Resource> = self
            .snapshot
            .resources
            .iter()
            .filter(|r| r.resource_type == resource_type && r.region == region)
            .map(|r| {
                let account = r
                    .account_id
                    .clone()
                    .unwrap_or_else(|| self.snapshot.account_id.clone());
                Resource::new(&r.arn, r.resource_type, &r.region, account)
                    .with_name(r.name.clone())
                    .public(r.is_public)
                    .with_tags(r.tags.clone())
            })
            .collect();

        debug!(
            "Snapshot has {} {} in {}",
            resources.len(),
            resource_type,
            region
        );
        Ok(resources)
    }

    async fn resolve_load_balancer_hostname(
        &self,
        resource_id: &str,
        _region: &str,
    ) -> Result<Option<String>, ApiError> {
        self.snapshot
            .resources
            .iter()
            .find(|r| r.resource_type == ResourceType::LoadBalancer && r.arn == resource_id)
            .map(|r| r.dns_name.clone())
            .ok_or_else(|| ApiError::Service {
                service: ResourceType::LoadBalancer.service().to_string(),
                code: "LoadBalancerNotFound".to_string(),
                message: format!("'{}' not found", resource_id),
            })
    }
}

#[async_trait]
impl FirewallApi for InventoryFileClient {
    async fn list_policies_with_protected_resources(
        &self,
        scope: PolicyScope,
        region: &str,
    ) -> Result<Vec<PolicyAssociations>, ApiError> {
        if let Some(failure) = self.failure(FailureOperation::Policies, region, None) {
            return Err(failure.to_api_error("wafv2"));
        }

        Ok(self
            .policies
            .iter()
            .filter(|p| p.policy.scope() == scope && p.policy.region() == region)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DistributionApi for InventoryFileClient {
    async fn list_distribution_origins(&self) -> Result<Vec<DistributionRecord>, ApiError> {
        if let Some(failure) = self.failure(FailureOperation::Distributions, "", None) {
            return Err(failure.to_api_error(ResourceType::CdnDistribution.service()));
        }
        Ok(self.snapshot.distributions.clone())
    }
}
