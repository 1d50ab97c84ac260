//! Identity API trait

use async_trait::async_trait;

use crate::client::models::CallerIdentity;
use crate::error::ApiError;

/// Caller identity operations
#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// Identify the account and principal behind the configured credentials.
    async fn caller_identity(&self) -> Result<CallerIdentity, ApiError>;
}
