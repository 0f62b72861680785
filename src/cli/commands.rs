//! CLI command implementations

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::{Cli, ConfigCommand};
use crate::config::Settings;

/// Start the HTTP server, applying command-line overrides first
pub async fn serve(mut settings: Settings, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        settings.server.host = host;
    }
    if let Some(port) = port {
        settings.server.port = port;
    }

    crate::server::run(&settings).await
}

pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let mut shown = settings.clone();
            if !shown.llm.api_key.is_empty() {
                shown.llm.api_key = "********".to_string();
            }
            let toml = toml::to_string_pretty(&shown)?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

/// Write the completion script for `shell` to stdout
pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}
