//! Command execution context
//!
//! Provides a unified context for command execution: config loading, client
//! selection and output format resolution.

use std::sync::Arc;

use log::debug;

use crate::cli::{GlobalOptions, OutputFormat};
use crate::client::{CloudApi, InventoryFileClient, ThrottledClient};
use crate::config::Config;
use crate::error::{ApiError, Result};

/// Context for command execution containing config, client, and runtime options.
pub struct CommandContext {
    /// Loaded configuration (defaults when no file exists)
    pub config: Config,
    /// Cloud client behind reactive throttling (Arc-wrapped for parallel requests)
    pub client: Arc<dyn CloudApi>,
    /// Output format preference
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a new command context with full initialization.
    ///
    /// The client is an inventory snapshot when `--inventory` or the config
    /// names one, otherwise a live AWS client when built with the `aws`
    /// feature.
    ///
    /// # Errors
    /// Returns error if config cannot be loaded or no client source is available.
    pub async fn new(opts: &GlobalOptions) -> Result<Self> {
        let config_path = Config::resolve_path(opts.config_ref())?;
        let config = Config::load_or_default(&config_path)?;
        let format = resolve_format(opts, &config)?;
        let client = build_client(opts, &config).await?;

        Ok(Self {
            config,
            client,
            format,
        })
    }
}

/// `--format`/`EDGEGUARD_FORMAT`, then `preferences.format`, then pretty.
pub fn resolve_format(opts: &GlobalOptions, config: &Config) -> Result<OutputFormat> {
    if let Some(format) = opts.format {
        return Ok(format);
    }
    match config.preferences.format.as_deref() {
        Some(value) => OutputFormat::from_config(value),
        None => Ok(OutputFormat::default()),
    }
}

async fn build_client(opts: &GlobalOptions, config: &Config) -> Result<Arc<dyn CloudApi>> {
    let inventory = opts.inventory_ref().or(config.inventory.as_deref());

    if let Some(path) = inventory {
        debug!("Using inventory snapshot {}", path.display());
        let client = InventoryFileClient::load(path)?;
        return Ok(Arc::new(ThrottledClient::new(client)));
    }

    live_client(opts, config).await
}

#[cfg(feature = "aws")]
async fn live_client(opts: &GlobalOptions, config: &Config) -> Result<Arc<dyn CloudApi>> {
    use crate::client::AwsClient;

    let role_arn = opts.role_arn_ref().or(config.role_arn.as_deref());
    let external_id = opts.external_id_ref().or(config.external_id.as_deref());

    debug!("Using live AWS client");
    let client = AwsClient::new(role_arn, external_id).await?;
    Ok(Arc::new(ThrottledClient::new(client)))
}

#[cfg(not(feature = "aws"))]
async fn live_client(opts: &GlobalOptions, config: &Config) -> Result<Arc<dyn CloudApi>> {
    if opts.role_arn_ref().or(config.role_arn.as_deref()).is_some() {
        debug!("Ignoring role ARN: live scans need the `aws` feature");
    }
    Err(crate::error::ConfigError::NoSource.into())
}

/// Client for one target account of a multi-account scan.
#[cfg(feature = "aws")]
pub async fn account_client(
    role_arn: String,
    external_id: Option<String>,
) -> std::result::Result<Arc<dyn CloudApi>, ApiError> {
    use crate::client::AwsClient;

    let client = AwsClient::new(Some(&role_arn), external_id.as_deref()).await?;
    Ok(Arc::new(ThrottledClient::new(client)))
}

#[cfg(not(feature = "aws"))]
pub async fn account_client(
    role_arn: String,
    _external_id: Option<String>,
) -> std::result::Result<Arc<dyn CloudApi>, ApiError> {
    Err(ApiError::Unavailable(format!(
        "cannot assume {}: live scans need the `aws` feature",
        role_arn
    )))
}
