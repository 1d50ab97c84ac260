//! Inventory API trait for resource enumeration

use async_trait::async_trait;

use crate::client::models::{Resource, ResourceType};
use crate::error::ApiError;

/// Resource enumeration operations
#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// List every resource of one type in one region.
    ///
    /// Returned resources carry no policy information.
    async fn enumerate_resources(
        &self,
        resource_type: ResourceType,
        region: &str,
    ) -> Result<Vec<Resource>, ApiError>;

    /// Look up the DNS name assigned to a load balancer.
    ///
    /// `Ok(None)` means the balancer exists but reported no DNS name.
    async fn resolve_load_balancer_hostname(
        &self,
        resource_id: &str,
        region: &str,
    ) -> Result<Option<String>, ApiError>;
}
