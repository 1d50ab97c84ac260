//! Throttle-aware wrapper for cloud clients
//!
//! Calls pass straight through until a service reports throttling. From then
//! on every call to that service waits on its rate limiter. Failed calls are
//! not retried; the scanner records them like any other failure.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use log::warn;

use super::api::{DistributionApi, FirewallApi, IdentityApi, InventoryApi};
use super::models::{
    CallerIdentity, DistributionRecord, PolicyAssociations, PolicyScope, Resource, ResourceType,
};
use super::rate_limit::{RateLimiterSet, ServiceCategory};
use super::CloudApi;
use crate::error::ApiError;

/// Rate-limited wrapper for any [`CloudApi`] implementation.
pub struct ThrottledClient<C: CloudApi> {
    inner: Arc<C>,
    limiters: RateLimiterSet,
}

impl<C: CloudApi> ThrottledClient<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner: Arc::new(inner),
            limiters: RateLimiterSet::new(),
        }
    }

    async fn guarded<T, Fut>(&self, category: ServiceCategory, call: Fut) -> Result<T, ApiError>
    where
        Fut: Future<Output = Result<T, ApiError>> + Send,
    {
        self.limiters.wait_for(category).await;
        let result = call.await;

        if let Err(err) = &result
            && err.is_throttled()
        {
            warn!("{:?} throttled, limiting further calls", category);
            self.limiters.activate(category).await;
        }

        result
    }
}

#[async_trait]
impl<C: CloudApi> IdentityApi for ThrottledClient<C> {
    async fn caller_identity(&self) -> Result<CallerIdentity, ApiError> {
        self.guarded(ServiceCategory::Identity, self.inner.caller_identity())
            .await
    }
}

#[async_trait]
impl<C: CloudApi> InventoryApi for ThrottledClient<C> {
    async fn enumerate_resources(
        &self,
        resource_type: ResourceType,
        region: &str,
    ) -> Result<Vec<Resource>, ApiError> {
        self.guarded(
            ServiceCategory::for_resource_type(resource_type),
            self.inner.enumerate_resources(resource_type, region),
        )
        .await
    }

    async fn resolve_load_balancer_hostname(
        &self,
        resource_id: &str,
        region: &str,
    ) -> Result<Option<String>, ApiError> {
        self.guarded(
            ServiceCategory::LoadBalancing,
            self.inner.resolve_load_balancer_hostname(resource_id, region),
        )
        .await
    }
}

#[async_trait]
impl<C: CloudApi> FirewallApi for ThrottledClient<C> {
    async fn list_policies_with_protected_resources(
        &self,
        scope: PolicyScope,
        region: &str,
    ) -> Result<Vec<PolicyAssociations>, ApiError> {
        self.guarded(
            ServiceCategory::Firewall,
            self.inner
                .list_policies_with_protected_resources(scope, region),
        )
        .await
    }
}

#[async_trait]
impl<C: CloudApi> DistributionApi for ThrottledClient<C> {
    async fn list_distribution_origins(&self) -> Result<Vec<DistributionRecord>, ApiError> {
        self.guarded(ServiceCategory::Cdn, self.inner.list_distribution_origins())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockCloudClient;

    fn throttled() -> ApiError {
        ApiError::Throttled {
            service: "wafv2".to_string(),
        }
    }

    #[tokio::test]
    async fn test_passes_results_through() {
        let client = ThrottledClient::new(MockCloudClient::new());
        let identity = client.caller_identity().await.unwrap();
        assert_eq!(identity.account, "123456789012");
        assert!(!client.limiters.is_active(ServiceCategory::Identity).await);
    }

    #[tokio::test]
    async fn test_throttling_activates_only_that_category() {
        let mock = MockCloudClient::new().with_error(throttled()).await;
        let client = ThrottledClient::new(mock);

        let result = client
            .list_policies_with_protected_resources(PolicyScope::Global, "us-east-1")
            .await;
        assert!(matches!(result, Err(ApiError::Throttled { .. })));

        assert!(client.limiters.is_active(ServiceCategory::Firewall).await);
        assert!(!client.limiters.is_active(ServiceCategory::Cdn).await);
    }

    #[tokio::test]
    async fn test_throttled_call_is_not_retried() {
        let mock = MockCloudClient::new().with_error(throttled()).await;
        let client = ThrottledClient::new(mock);

        let _ = client.list_distribution_origins().await;
        assert_eq!(client.inner.call_counts().await.list_distribution_origins, 1);

        // Subsequent calls wait on the limiter and then succeed
        assert!(client.list_distribution_origins().await.is_ok());
        assert!(client.limiters.is_active(ServiceCategory::Cdn).await);
    }

    #[tokio::test]
    async fn test_other_errors_do_not_activate_limiter() {
        let mock = MockCloudClient::new()
            .with_error(ApiError::AccessDenied("elasticloadbalancing".to_string()))
            .await;
        let client = ThrottledClient::new(mock);

        let result = client
            .enumerate_resources(ResourceType::LoadBalancer, "us-east-1")
            .await;
        assert!(result.is_err());
        assert!(!client.limiters.is_active(ServiceCategory::LoadBalancing).await);
    }
}
