//! Collaborator trait definitions split by responsibility
//!
//! The scanner consumes the cloud account through four focused sub-traits:
//! - [`InventoryApi`] - resource enumeration and load balancer DNS lookups
//! - [`FirewallApi`] - protection policies and the resources they protect
//! - [`DistributionApi`] - CDN distributions and their origins
//! - [`IdentityApi`] - the identity behind the credentials
//!
//! The [`CloudApi`](super::CloudApi) super-trait combines all four.

mod distribution;
mod firewall;
mod identity;
mod inventory;

pub use distribution::DistributionApi;
pub use firewall::FirewallApi;
pub use identity::IdentityApi;
pub use inventory::InventoryApi;
