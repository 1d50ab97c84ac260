//! Display models for CLI output
//!
//! This module provides shared display model abstractions for converting
//! scan results into CLI-friendly display formats.

pub mod display;

pub use display::{
    KNOWN_REGIONS, MultiAccountReport, RegionDisplay, ResourceTypeDisplay, ScanReport,
};
