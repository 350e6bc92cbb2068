//! Lineup CLI
//!
//! Loads a player file, applies configuration (file, then `LINEUP_*`
//! environment, then flags), and prints the chosen lineup.

mod cli;
mod config;
mod logging;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, CliHandler};
use config::CliConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    cli.command.apply_overrides(&mut config.selection)?;
    config.validate()?;

    logging::initialize_logging(&config.logging)?;
    info!("🔧 Lineup CLI v{} (engine v{})", env!("CARGO_PKG_VERSION"), lineup_engine::VERSION);

    let handler = CliHandler::new(&config)?;
    handler.handle_command(cli.command).await
}
