//! Status command implementation

use colored::Colorize;

use crate::cli::GlobalOptions;
use crate::config::Config;
use crate::error::{ConfigError, Error, Result};

/// Run the status command to display configuration status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "edgeguard Configuration Status".bold());

    let config_path = Config::resolve_path(opts.config_ref())?;
    let config = match Config::load_from(&config_path) {
        Ok(config) => {
            println!("Config file: {}", config_path.display().to_string().cyan());
            config
        }
        Err(Error::Config(ConfigError::NotFound)) => {
            println!(
                "{} No config file at {} (using defaults)",
                "○".dimmed(),
                config_path.display()
            );
            println!("  → Run '{}' to create one", "edgeguard init".cyan());
            Config::default()
        }
        Err(err) => {
            println!("{} Config file is invalid: {}", "✗".red(), err);
            return Ok(());
        }
    };

    println!();

    // Inventory source
    match opts.inventory_ref().or(config.inventory.as_deref()) {
        Some(path) if path.exists() => {
            println!("{} Inventory snapshot: {}", "✓".green(), path.display());
        }
        Some(path) => {
            println!("{} Inventory snapshot missing: {}", "✗".red(), path.display());
        }
        None if cfg!(feature = "aws") => {
            println!("{} Live AWS scans (default credential chain)", "✓".green());
        }
        None => {
            println!("{} No inventory snapshot configured", "✗".red());
            println!("  → Pass --inventory <FILE> or build with --features aws");
        }
    }

    if let Some(role) = opts.role_arn_ref().or(config.role_arn.as_deref()) {
        println!("{} Assume role: {}", "○".dimmed(), role.cyan());
    }

    println!(
        "{} Regions: {}",
        "○".dimmed(),
        config.effective_regions().join(", ")
    );

    let types = config.effective_resource_types();
    if config.resource_types.is_empty() {
        println!("{} Resource types: all ({})", "○".dimmed(), types.len());
    } else {
        let ids: Vec<&str> = types.iter().map(|rt| rt.id()).collect();
        println!("{} Resource types: {}", "○".dimmed(), ids.join(", "));
    }

    println!(
        "{} Max concurrency: {}",
        "○".dimmed(),
        config.preferences.max_concurrent
    );

    if let Some(dir) = &config.preferences.output_dir {
        println!("{} Report directory: {}", "○".dimmed(), dir.display());
    }

    println!();
    Ok(())
}
