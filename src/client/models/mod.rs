//! Cloud inventory data models
//!
//! Resources, protection policies and the scan aggregate, plus the raw
//! records returned by the collaborators.

mod distribution;
mod identity;
mod policy;
mod resource;
mod resource_type;
mod scan;

pub use distribution::DistributionRecord;
pub use identity::CallerIdentity;
pub use policy::{GLOBAL_REGION, PolicyAssociations, PolicyScope, ProtectionPolicy};
pub use resource::{FrontedBy, Resource};
pub use resource_type::ResourceType;
pub use scan::{ScanError, ScanResult, ScanSummary};
