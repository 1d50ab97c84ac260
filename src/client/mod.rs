//! Cloud account clients
//!
//! The scanner talks to the account through the collaborator traits in
//! [`api`]. Implementations:
//! - [`InventoryFileClient`] - an exported inventory snapshot on disk
//! - `AwsClient` (feature `aws`) - live AWS SDK calls
//! - [`ThrottledClient`] - reactive rate limiting around either of the above

pub mod api;
#[cfg(feature = "aws")]
pub mod aws;
#[cfg(test)]
pub mod fixtures;
pub mod inventory_file;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod parallel;
pub mod rate_limit;
pub mod throttle;

pub use api::{DistributionApi, FirewallApi, IdentityApi, InventoryApi};
#[cfg(feature = "aws")]
pub use aws::AwsClient;
pub use inventory_file::InventoryFileClient;
#[cfg(test)]
pub use mock::MockCloudClient;
pub use throttle::ThrottledClient;

/// Combined collaborator trait for everything a scan needs.
///
/// Blanket-implemented for any type providing all four sub-traits, so
/// `Arc<dyn CloudApi>` works for every client.
pub trait CloudApi: InventoryApi + FirewallApi + DistributionApi + IdentityApi {}

impl<T> CloudApi for T where T: InventoryApi + FirewallApi + DistributionApi + IdentityApi {}
