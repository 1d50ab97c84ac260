//! Init command implementation

use colored::Colorize;
use dialoguer::{Confirm, Input, MultiSelect, Select, theme::ColorfulTheme};

use crate::cli::GlobalOptions;
use crate::client::models::ResourceType;
use crate::config::Config;
use crate::error::Result;
use crate::models::KNOWN_REGIONS;

const FORMATS: [&str; 4] = ["pretty", "table", "json", "csv"];

/// Run the init command
///
/// Starts from the existing config file when there is one, so re-running
/// init edits rather than replaces.
pub fn run(opts: &GlobalOptions) -> Result<()> {
    let theme = ColorfulTheme::default();
    let config_path = Config::resolve_path(opts.config_ref())?;
    let mut config = Config::load_or_default(&config_path)?;

    println!("{}", "Welcome to edgeguard!".bold().green());
    println!("Let's set up your scan defaults.\n");

    // Regions
    let current = config.effective_regions();
    let defaults: Vec<bool> = KNOWN_REGIONS
        .iter()
        .map(|r| current.iter().any(|c| c == r))
        .collect();
    let picked = MultiSelect::with_theme(&theme)
        .with_prompt("Regions to scan (space to toggle)")
        .items(&KNOWN_REGIONS)
        .defaults(&defaults)
        .interact()?;
    config.regions = picked
        .into_iter()
        .map(|i| KNOWN_REGIONS[i].to_string())
        .collect();

    // Resource types
    let all_types = Confirm::with_theme(&theme)
        .with_prompt("Scan all resource types?")
        .default(config.resource_types.is_empty())
        .interact()?;
    config.resource_types = if all_types {
        Vec::new()
    } else {
        let names: Vec<&str> = ResourceType::ALL.iter().map(|rt| rt.display_name()).collect();
        let current = config.effective_resource_types();
        let defaults: Vec<bool> = ResourceType::ALL
            .iter()
            .map(|rt| current.contains(rt))
            .collect();
        MultiSelect::with_theme(&theme)
            .with_prompt("Resource types to scan")
            .items(&names)
            .defaults(&defaults)
            .interact()?
            .into_iter()
            .map(|i| ResourceType::ALL[i])
            .collect()
    };

    // Inventory snapshot (optional)
    let inventory: String = Input::with_theme(&theme)
        .with_prompt("Inventory snapshot path (leave empty for live scans)")
        .allow_empty(true)
        .with_initial_text(
            config
                .inventory
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        )
        .interact_text()?;
    config.inventory = non_empty(inventory).map(Into::into);

    // Role to assume (optional)
    let role: String = Input::with_theme(&theme)
        .with_prompt("Role ARN to assume (leave empty to use current credentials)")
        .allow_empty(true)
        .with_initial_text(config.role_arn.clone().unwrap_or_default())
        .interact_text()?;
    config.role_arn = non_empty(role);

    // Default output format
    let current_format = config
        .preferences
        .format
        .as_deref()
        .and_then(|f| FORMATS.iter().position(|candidate| *candidate == f))
        .unwrap_or(0);
    let format = Select::with_theme(&theme)
        .with_prompt("Default output format")
        .items(&FORMATS)
        .default(current_format)
        .interact()?;
    config.preferences.format = Some(FORMATS[format].to_string());

    config.validate()?;
    config.save_to(&config_path)?;

    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        config_path.display()
    );

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Show configuration status", "edgeguard status".cyan());
    println!("  {} - Scan for WAF coverage", "edgeguard scan".cyan());

    Ok(())
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
