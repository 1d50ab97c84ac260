//! edgeguard - audit cloud edge resources for web application firewall coverage

use clap::Parser;
use log::LevelFilter;

mod cli;
mod client;
mod config;
mod error;
mod models;
mod output;
mod scanner;

use cli::{Cli, Commands, GlobalOptions};
use error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise warn, raised by `--debug` or lowered by `--quiet`.
fn init_logging(cli: &Cli) {
    let level = if cli.debug {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Scan(args) => cli::scan::run(&opts, &args).await,
        Commands::Whoami => cli::whoami::run(&opts).await,
        Commands::Types => cli::catalog::types(&opts),
        Commands::Regions => cli::catalog::regions(&opts),
        Commands::Status => cli::status::run(&opts),
        Commands::Init => cli::init::run(&opts),
        Commands::Version => {
            println!("edgeguard version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Completion { shell } => {
            cli::completion::run(shell);
            Ok(())
        }
    }
}
