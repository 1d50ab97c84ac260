//! Catalog commands: `types` and `regions`

use crate::cli::GlobalOptions;
use crate::cli::context::resolve_format;
use crate::client::models::ResourceType;
use crate::config::Config;
use crate::error::Result;
use crate::models::{RegionDisplay, ResourceTypeDisplay};
use crate::output::Formattable;

/// List every supported resource type
pub fn types(opts: &GlobalOptions) -> Result<()> {
    let config = load_config(opts)?;
    let rows: Vec<ResourceTypeDisplay> = ResourceType::ALL
        .into_iter()
        .map(ResourceTypeDisplay::from)
        .collect();

    rows.print(resolve_format(opts, &config)?)
}

/// List known regions, marking the ones `scan` uses by default
pub fn regions(opts: &GlobalOptions) -> Result<()> {
    let config = load_config(opts)?;
    let rows = RegionDisplay::list(&config.effective_regions());

    rows.print(resolve_format(opts, &config)?)
}

fn load_config(opts: &GlobalOptions) -> Result<Config> {
    let path = Config::resolve_path(opts.config_ref())?;
    Config::load_or_default(&path)
}
