//! Firewall API trait for policy associations

use async_trait::async_trait;

use crate::client::models::{PolicyAssociations, PolicyScope};
use crate::error::ApiError;

/// Protection policy operations
#[async_trait]
pub trait FirewallApi: Send + Sync {
    /// List every policy in a scope/region together with the identifiers of
    /// the resources it protects, across all supported service categories.
    async fn list_policies_with_protected_resources(
        &self,
        scope: PolicyScope,
        region: &str,
    ) -> Result<Vec<PolicyAssociations>, ApiError>;
}
