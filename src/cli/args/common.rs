//! Common CLI types shared across commands

use clap::ValueEnum;

use crate::error::{ConfigError, Result};

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty format - report header, resource table and compliance summary
    #[default]
    Pretty,
    /// Table format - one row per resource, errors in a second table
    Table,
    /// JSON format - structured for scripts/APIs
    Json,
    /// CSV format - one row per resource, spreadsheet friendly
    Csv,
}

impl OutputFormat {
    /// Parse a format name from the config file
    pub fn from_config(value: &str) -> Result<Self> {
        <Self as ValueEnum>::from_str(value, true).map_err(|_| {
            ConfigError::Invalid(format!(
                "preferences.format '{}' is not one of pretty, table, json, csv",
                value
            ))
            .into()
        })
    }
}
