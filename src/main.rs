//! Errand CLI entry point.

use anyhow::Result;
use clap::Parser;
use errand::cli::{commands, Cli, Commands};
use errand::config::{Credentials, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; variables may come from the shell.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => Settings::expand_path(path),
        None => Settings::default_config_path(),
    };
    let settings = Settings::load_from(Some(&config_path))?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("errand={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Failed to load .env: {}", e),
    }

    let credentials = Credentials::resolve(&settings);

    match cli.command {
        Commands::Ask { request, model } => {
            commands::run_ask(request, model, settings, credentials).await?;
        }

        Commands::Call { tool, input } => {
            commands::run_call(&tool, &input, settings, credentials).await?;
        }

        Commands::Tools => {
            commands::run_tools(&settings, &credentials)?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, &credentials, &config_path)?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, settings, config_path.clone())?;
        }
    }

    Ok(())
}
