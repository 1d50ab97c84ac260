//! Mock cloud client for testing
//!
//! Provides a mock implementation of the collaborator traits for unit testing
//! without touching a real account.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::api::{DistributionApi, FirewallApi, IdentityApi, InventoryApi};
use super::fixtures::ACCOUNT_ID;
use super::models::{
    CallerIdentity, DistributionRecord, PolicyAssociations, PolicyScope, Resource, ResourceType,
};
use crate::error::ApiError;

/// Mock cloud client for testing.
///
/// Configure expected responses via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockCloudClient::new()
///     .with_resources(vec![ResourceBuilder::load_balancer("web").build()])
///     .await;
///
/// let lbs = mock.enumerate_resources(ResourceType::LoadBalancer, "us-east-1").await?;
/// assert_eq!(lbs.len(), 1);
/// ```
pub struct MockCloudClient {
    /// Identity to return from caller_identity
    identity: Arc<Mutex<CallerIdentity>>,
    /// Resources, filtered by type and region on enumeration
    resources: Arc<Mutex<Vec<Resource>>>,
    /// Policies with their protected resources, filtered by scope and region
    policies: Arc<Mutex<Vec<PolicyAssociations>>>,
    /// Distributions to return from list_distribution_origins
    distributions: Arc<Mutex<Vec<DistributionRecord>>>,
    /// Load balancer identifier -> DNS name
    hostnames: Arc<Mutex<HashMap<String, String>>>,
    /// Persistent enumeration failures keyed by (type, region)
    enumeration_failures: Arc<Mutex<HashMap<(ResourceType, String), ApiError>>>,
    /// Persistent policy listing failures keyed by (scope, region)
    policy_failures: Arc<Mutex<HashMap<(PolicyScope, String), ApiError>>>,
    /// Persistent distribution listing failure
    distribution_failure: Arc<Mutex<Option<ApiError>>>,
    /// Persistent hostname lookup failures keyed by load balancer identifier
    hostname_failures: Arc<Mutex<HashMap<String, ApiError>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
    /// Captured enumeration requests for test assertions
    captured_requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl Default for MockCloudClient {
    fn default() -> Self {
        Self {
            identity: Arc::new(Mutex::new(CallerIdentity {
                account: ACCOUNT_ID.to_string(),
                arn: format!("arn:aws:iam::{ACCOUNT_ID}:user/auditor"),
                user_id: "AIDAEXAMPLE".to_string(),
            })),
            resources: Arc::new(Mutex::new(Vec::new())),
            policies: Arc::new(Mutex::new(Vec::new())),
            distributions: Arc::new(Mutex::new(Vec::new())),
            hostnames: Arc::new(Mutex::new(HashMap::new())),
            enumeration_failures: Arc::new(Mutex::new(HashMap::new())),
            policy_failures: Arc::new(Mutex::new(HashMap::new())),
            distribution_failure: Arc::new(Mutex::new(None)),
            hostname_failures: Arc::new(Mutex::new(HashMap::new())),
            error: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(CallCounts::default())),
            captured_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub caller_identity: usize,
    pub enumerate_resources: usize,
    pub resolve_load_balancer_hostname: usize,
    pub list_policies: usize,
    pub list_distribution_origins: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.caller_identity
            + self.enumerate_resources
            + self.resolve_load_balancer_hostname
            + self.list_policies
            + self.list_distribution_origins
    }
}

/// A captured enumeration request for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedRequest {
    pub resource_type: ResourceType,
    pub region: String,
}

impl MockCloudClient {
    /// Create a new mock client with default (empty) responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the identity returned from caller_identity.
    pub async fn with_identity(self, identity: CallerIdentity) -> Self {
        *self.identity.lock().await = identity;
        self
    }

    /// Configure resources to return from enumerate_resources.
    ///
    /// Policies on the given resources are stripped on enumeration, the way a
    /// live inventory reports them.
    pub async fn with_resources(self, resources: Vec<Resource>) -> Self {
        *self.resources.lock().await = resources;
        self
    }

    /// Configure policies to return from list_policies_with_protected_resources.
    pub async fn with_policies(self, policies: Vec<PolicyAssociations>) -> Self {
        *self.policies.lock().await = policies;
        self
    }

    /// Configure distributions to return from list_distribution_origins.
    pub async fn with_distributions(self, distributions: Vec<DistributionRecord>) -> Self {
        *self.distributions.lock().await = distributions;
        self
    }

    /// Configure the DNS name reported for a load balancer.
    pub async fn with_hostname(self, resource_id: &str, hostname: &str) -> Self {
        self.hostnames
            .lock()
            .await
            .insert(resource_id.to_string(), hostname.to_string());
        self
    }

    /// Make every enumeration of a type in a region fail.
    pub async fn with_enumeration_failure(
        self,
        resource_type: ResourceType,
        region: &str,
        error: ApiError,
    ) -> Self {
        self.enumeration_failures
            .lock()
            .await
            .insert((resource_type, region.to_string()), error);
        self
    }

    /// Make every policy listing for a scope and region fail.
    pub async fn with_policy_failure(
        self,
        scope: PolicyScope,
        region: &str,
        error: ApiError,
    ) -> Self {
        self.policy_failures
            .lock()
            .await
            .insert((scope, region.to_string()), error);
        self
    }

    /// Make the distribution listing fail.
    pub async fn with_distribution_failure(self, error: ApiError) -> Self {
        *self.distribution_failure.lock().await = Some(error);
        self
    }

    /// Make the DNS lookup of a load balancer fail.
    pub async fn with_hostname_failure(self, resource_id: &str, error: ApiError) -> Self {
        self.hostname_failures
            .lock()
            .await
            .insert(resource_id.to_string(), error);
        self
    }

    /// Configure an error to return on the next API call.
    /// The error is consumed after one use.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Get all captured enumeration requests, in call order.
    pub async fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.captured_requests.lock().await.clone()
    }

    /// Check if there's a pending error and consume it.
    async fn check_error(&self) -> Result<(), ApiError> {
        let mut error = self.error.lock().await;
        match error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

// ============================================================================
// IdentityApi Implementation
// ============================================================================

#[async_trait]
impl IdentityApi for MockCloudClient {
    async fn caller_identity(&self) -> Result<CallerIdentity, ApiError> {
        self.call_count.lock().await.caller_identity += 1;
        self.check_error().await?;

        Ok(self.identity.lock().await.clone())
    }
}

// ============================================================================
// InventoryApi Implementation
// ============================================================================

#[async_trait]
impl InventoryApi for MockCloudClient {
    async fn enumerate_resources(
        &self,
        resource_type: ResourceType,
        region: &str,
    ) -> Result<Vec<Resource>, ApiError> {
        self.call_count.lock().await.enumerate_resources += 1;
        self.captured_requests.lock().await.push(CapturedRequest {
            resource_type,
            region: region.to_string(),
        });
        self.check_error().await?;

        if let Some(err) = self
            .enumeration_failures
            .lock()
            .await
            .get(&(resource_type, region.to_string()))
        {
            return Err(err.clone());
        }

        let resources = self.resources.lock().await;
        Ok(resources
            .iter()
            .filter(|r| r.resource_type == resource_type && r.region == region)
            .map(|r| {
                let mut r = r.clone();
                r.policy = None;
                r.fronted_by = None;
                r
            })
            .collect())
    }

    async fn resolve_load_balancer_hostname(
        &self,
        resource_id: &str,
        _region: &str,
    ) -> Result<Option<String>, ApiError> {
        self.call_count.lock().await.resolve_load_balancer_hostname += 1;
        self.check_error().await?;

        if let Some(err) = self.hostname_failures.lock().await.get(resource_id) {
            return Err(err.clone());
        }

        Ok(self.hostnames.lock().await.get(resource_id).cloned())
    }
}

// ============================================================================
// FirewallApi Implementation
// ============================================================================

#[async_trait]
impl FirewallApi for MockCloudClient {
    async fn list_policies_with_protected_resources(
        &self,
        scope: PolicyScope,
        region: &str,
    ) -> Result<Vec<PolicyAssociations>, ApiError> {
        self.call_count.lock().await.list_policies += 1;
        self.check_error().await?;

        if let Some(err) = self
            .policy_failures
            .lock()
            .await
            .get(&(scope, region.to_string()))
        {
            return Err(err.clone());
        }

        let policies = self.policies.lock().await;
        Ok(policies
            .iter()
            .filter(|p| p.policy.scope() == scope && p.policy.region() == region)
            .cloned()
            .collect())
    }
}

// ============================================================================
// DistributionApi Implementation
// ============================================================================

#[async_trait]
impl DistributionApi for MockCloudClient {
    async fn list_distribution_origins(&self) -> Result<Vec<DistributionRecord>, ApiError> {
        self.call_count.lock().await.list_distribution_origins += 1;
        self.check_error().await?;

        if let Some(err) = self.distribution_failure.lock().await.as_ref() {
            return Err(err.clone());
        }

        Ok(self.distributions.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::{PolicyBuilder, ResourceBuilder};

    #[tokio::test]
    async fn test_mock_client_default_identity() {
        let mock = MockCloudClient::new();
        let identity = mock.caller_identity().await.unwrap();
        assert_eq!(identity.account, ACCOUNT_ID);
    }

    #[tokio::test]
    async fn test_mock_client_filters_by_type_and_region() {
        let mock = MockCloudClient::new()
            .with_resources(vec![
                ResourceBuilder::load_balancer("a").build(),
                ResourceBuilder::load_balancer("b").region("eu-west-1").build(),
                ResourceBuilder::http_api("c").build(),
            ])
            .await;

        let lbs = mock
            .enumerate_resources(ResourceType::LoadBalancer, "us-east-1")
            .await
            .unwrap();
        assert_eq!(lbs.len(), 1);
        assert_eq!(lbs[0].name.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_mock_client_strips_policies_on_enumeration() {
        let mock = MockCloudClient::new()
            .with_resources(vec![
                ResourceBuilder::load_balancer("a")
                    .policy(PolicyBuilder::regional("acl").build())
                    .build(),
            ])
            .await;

        let lbs = mock
            .enumerate_resources(ResourceType::LoadBalancer, "us-east-1")
            .await
            .unwrap();
        assert!(!lbs[0].has_policy());
    }

    #[tokio::test]
    async fn test_mock_client_filters_policies_by_scope() {
        let global = PolicyBuilder::global("edge").build();
        let regional = PolicyBuilder::regional("api").region("eu-west-1").build();
        let mock = MockCloudClient::new()
            .with_policies(vec![
                PolicyAssociations {
                    policy: global,
                    resource_ids: vec![],
                },
                PolicyAssociations {
                    policy: regional,
                    resource_ids: vec![],
                },
            ])
            .await;

        let found = mock
            .list_policies_with_protected_resources(PolicyScope::Global, "us-east-1")
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].policy.name(), "edge");

        let found = mock
            .list_policies_with_protected_resources(PolicyScope::Regional, "us-east-1")
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_mock_client_with_error() {
        let mock = MockCloudClient::new()
            .with_error(ApiError::Network("down".to_string()))
            .await;

        assert!(mock.list_distribution_origins().await.is_err());

        // Error is consumed, next call succeeds
        assert!(mock.list_distribution_origins().await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_client_persistent_failures() {
        let mock = MockCloudClient::new()
            .with_enumeration_failure(
                ResourceType::AppRunnerService,
                "eu-west-1",
                ApiError::AccessDenied("apprunner:ListServices".to_string()),
            )
            .await;

        for _ in 0..2 {
            assert!(
                mock.enumerate_resources(ResourceType::AppRunnerService, "eu-west-1")
                    .await
                    .is_err()
            );
        }
        assert!(
            mock.enumerate_resources(ResourceType::AppRunnerService, "us-east-1")
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_mock_client_call_counts_and_captures() {
        let mock = MockCloudClient::new();

        mock.enumerate_resources(ResourceType::UserPool, "us-east-1")
            .await
            .unwrap();
        mock.resolve_load_balancer_hostname("arn", "us-east-1")
            .await
            .unwrap();

        let counts = mock.call_counts().await;
        assert_eq!(counts.enumerate_resources, 1);
        assert_eq!(counts.resolve_load_balancer_hostname, 1);
        assert_eq!(counts.total(), 2);

        let captured = mock.captured_requests().await;
        assert_eq!(
            captured,
            vec![CapturedRequest {
                resource_type: ResourceType::UserPool,
                region: "us-east-1".to_string(),
            }]
        );
    }
}
