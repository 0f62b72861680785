//! deepvista - Chat with an LLM about YouTube videos
//!
//! Entry point for the deepvista server and CLI.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use deepvista::cli::{Cli, Commands};
use deepvista::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Completions { shell } => {
            deepvista::cli::commands::print_completions(shell);
        }
        Commands::Serve { host, port } => {
            let settings = load_settings()?;
            deepvista::cli::commands::serve(settings, host, port).await?;
        }
        Commands::Config(config_cmd) => {
            let settings = load_settings()?;
            deepvista::cli::commands::config_command(&settings, config_cmd)?;
        }
    }

    Ok(())
}

/// Load `.env` (optional) and then the config file with environment overrides.
fn load_settings() -> Result<Settings> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }
    Settings::load()
}
