//! CLI command definitions and handlers

use std::path::PathBuf;

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod catalog;
pub mod completion;
pub mod context;
pub mod init;
pub mod scan;
pub mod status;
pub mod whoami;

pub use args::{GlobalOptions, OutputFormat, ScanArgs};
pub use context::CommandContext;

/// edgeguard - audit cloud edge resources for web application firewall coverage
#[derive(Parser, Debug)]
#[command(name = "edgeguard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json, csv)
    #[arg(
        long,
        global = true,
        env = "EDGEGUARD_FORMAT",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: Option<OutputFormat>,

    /// Override config file location
    #[arg(long, global = true, env = "EDGEGUARD_CONFIG", hide_env = true)]
    pub config: Option<PathBuf>,

    /// Scan an inventory snapshot (YAML or JSON) instead of a live account
    #[arg(long, global = true, env = "EDGEGUARD_INVENTORY", hide_env = true)]
    pub inventory: Option<PathBuf>,

    /// Role to assume for live scans
    #[arg(long, global = true, env = "EDGEGUARD_ROLE_ARN", hide_env = true)]
    pub role_arn: Option<String>,

    /// External ID for the assumed role
    #[arg(long, global = true, env = "EDGEGUARD_EXTERNAL_ID", hide_env = true)]
    pub external_id: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "EDGEGUARD_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Only log errors
    #[arg(long, short = 'q', global = true, conflicts_with = "debug")]
    pub quiet: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan resources and report firewall coverage
    #[command(after_help = "EXAMPLES:\n  \
        edgeguard scan                                  # Configured regions, all types\n  \
        edgeguard scan -r us-east-1 -r eu-west-1        # Specific regions\n  \
        edgeguard scan -t APPLICATION_LOAD_BALANCER     # One resource type\n  \
        edgeguard scan -o reports/                      # CSV report into a directory\n  \
        edgeguard scan --stdout > scan.csv              # CSV report on stdout\n  \
        edgeguard scan --fail-on-non-compliant          # Non-zero exit for CI gates")]
    Scan(ScanArgs),

    /// Show the identity scans run as
    Whoami,

    /// List supported resource types
    Types,

    /// List regions and the configured defaults
    Regions,

    /// Show configuration status
    Status,

    /// Initialize edgeguard configuration
    Init,

    /// Display version information
    Version,

    /// Generate shell completions
    #[command(after_help = "\
Install completions:
  bash:   edgeguard completion bash > /etc/bash_completion.d/edgeguard
  zsh:    edgeguard completion zsh > \"${fpath[1]}/_edgeguard\"
  fish:   edgeguard completion fish > ~/.config/fish/completions/edgeguard.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
