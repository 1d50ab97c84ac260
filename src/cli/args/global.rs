//! Global CLI options shared across all commands
//!
//! This module provides a centralized struct for global CLI options, so
//! handlers take one argument instead of every global flag.

use std::path::{Path, PathBuf};

use crate::cli::{Cli, OutputFormat};

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// For most options, the precedence is: CLI flag > environment variable > config file > default.
/// This struct captures the CLI/env layer; config file defaults are resolved later in
/// `CommandContext`.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Output format (pretty, table, json, csv); `None` defers to the config file
    pub format: Option<OutputFormat>,

    /// Custom config file path (defaults to ~/.edgeguard/config.yaml)
    pub config: Option<PathBuf>,

    /// Inventory snapshot to scan instead of a live account
    pub inventory: Option<PathBuf>,

    /// Role to assume for live scans
    pub role_arn: Option<String>,

    /// External ID for the assumed role
    pub external_id: Option<String>,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    ///
    /// This is the primary constructor, called once in main.rs after parsing.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            inventory: cli.inventory.clone(),
            role_arn: cli.role_arn.clone(),
            external_id: cli.external_id.clone(),
        }
    }

    /// Get config path as `Option<&Path>`.
    pub fn config_ref(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    /// Get inventory path as `Option<&Path>`.
    pub fn inventory_ref(&self) -> Option<&Path> {
        self.inventory.as_deref()
    }

    /// Get role override as `Option<&str>`.
    pub fn role_arn_ref(&self) -> Option<&str> {
        self.role_arn.as_deref()
    }

    /// Get external ID override as `Option<&str>`.
    pub fn external_id_ref(&self) -> Option<&str> {
        self.external_id.as_deref()
    }
}
