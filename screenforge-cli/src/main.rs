//! `screenforge` command-line driver.

mod cli;
mod commands;

use anyhow::{Result, anyhow};
use clap::Parser;
use cli::{Cli, Commands};
use screenforge_telemetry::{TelemetryConfig, init_with_config};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if cli.json_logs {
        telemetry = telemetry.with_json();
    }
    init_with_config(telemetry).map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    let config = commands::load_config(&cli.config)?;
    tracing::debug!(config = %cli.config.display(), "configuration loaded");

    match cli.command {
        Commands::Assemble(args) => commands::assemble(config, args).await,
        Commands::Validate { screen, schema_only } => {
            commands::validate(config, &screen, schema_only).await
        }
        Commands::Layout(args) => commands::layout(config, args).await,
        Commands::Render(args) => commands::render(config, args).await,
        Commands::Patterns => commands::patterns(config).await,
        Commands::Schema => commands::schema(),
    }
}
