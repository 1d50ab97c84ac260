//! Distribution API trait for CDN origins

use async_trait::async_trait;

use crate::client::models::DistributionRecord;
use crate::error::ApiError;

/// CDN distribution operations
#[async_trait]
pub trait DistributionApi: Send + Sync {
    /// List every distribution with its raw policy identifier and origin hostnames.
    async fn list_distribution_origins(&self) -> Result<Vec<DistributionRecord>, ApiError>;
}
