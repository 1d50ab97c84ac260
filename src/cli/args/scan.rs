//! Scan command arguments

use std::path::PathBuf;

use clap::Args;

use crate::client::models::ResourceType;
use crate::config::Config;
use crate::scanner::ScanOptions;

/// Arguments for `edgeguard scan`
#[derive(Debug, Clone, Args, Default)]
pub struct ScanArgs {
    /// Region to scan (repeatable or comma-separated; defaults to config, then us-east-1)
    #[arg(short = 'r', long = "region", value_delimiter = ',')]
    pub regions: Vec<String>,

    /// Resource type to scan (repeatable or comma-separated; see `edgeguard types`)
    #[arg(short = 't', long = "type", value_delimiter = ',')]
    pub resource_types: Vec<ResourceType>,

    /// Write the CSV report to this file (or directory)
    #[arg(short = 'o', long = "output", conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Write the CSV report to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Enumerate resources without resolving firewall associations
    #[arg(long)]
    pub skip_policy_lookup: bool,

    /// Maximum concurrent cloud API calls
    #[arg(long, value_parser = parse_concurrency)]
    pub concurrency: Option<usize>,

    /// Exit with status 1 when any resource is non-compliant or a scan error occurred
    #[arg(long)]
    pub fail_on_non_compliant: bool,

    /// Scan this account through --role-name (repeatable or comma-separated)
    #[arg(
        long = "account",
        value_delimiter = ',',
        value_parser = parse_account_id,
        requires = "role_name",
        env = "EDGEGUARD_TARGET_ACCOUNTS",
        hide_env = true
    )]
    pub accounts: Vec<String>,

    /// Role to assume in every --account
    #[arg(
        long,
        requires = "accounts",
        env = "EDGEGUARD_ASSUME_ROLE_NAME",
        hide_env = true
    )]
    pub role_name: Option<String>,
}

fn parse_account_id(value: &str) -> Result<String, String> {
    let value = value.trim();
    if value.len() == 12 && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(value.to_string())
    } else {
        Err(format!("'{}' is not a 12-digit account id", value))
    }
}

fn parse_concurrency(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("concurrency must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

impl ScanArgs {
    /// Resolve scan options: flags first, then the config file, then defaults.
    pub fn to_options(&self, config: &Config) -> ScanOptions {
        let regions = if self.regions.is_empty() {
            config.effective_regions()
        } else {
            self.regions.clone()
        };

        let resource_types = if self.resource_types.is_empty() {
            config.effective_resource_types()
        } else {
            self.resource_types.clone()
        };

        ScanOptions {
            regions,
            resource_types,
            include_policy_lookup: !self.skip_policy_lookup,
            max_concurrent: self
                .concurrency
                .unwrap_or(config.preferences.max_concurrent),
        }
    }
}
