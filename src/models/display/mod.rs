//! Display model implementations for table and JSON output
//!
//! Display models transform scan results and catalog data into CLI-friendly
//! rows with appropriate column names and serialization.

mod accounts;
mod catalog;
mod common;
mod report;
mod resource;

// Re-export all display types used by CLI commands
pub use catalog::{KNOWN_REGIONS, RegionDisplay, ResourceTypeDisplay};
pub use accounts::MultiAccountReport;
pub use report::ScanReport;
