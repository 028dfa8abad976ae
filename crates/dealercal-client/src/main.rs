//! dealercal CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use dealercal_client::cli::{Cli, Command, ConfigAction};
use dealercal_client::commands;
use dealercal_client::config::ClientConfig;
use dealercal_client::error::{ClientError, ClientResult};
use dealercal_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, path) = match load_config(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(TracingConfig::from_flags(config.debug, cli.log_json)) {
        eprintln!("warning: {}", e);
    }
    debug!(config = %path.display(), "Loaded configuration");

    match run(cli.command, &config, &path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Loads the config file and applies command-line overrides.
fn load_config(cli: &Cli) -> ClientResult<(ClientConfig, std::path::PathBuf)> {
    let (mut config, path) = match cli.config {
        Some(ref path) => (
            ClientConfig::load_from(path).map_err(ClientError::Config)?,
            path.clone(),
        ),
        None => (
            ClientConfig::load().map_err(ClientError::Config)?,
            ClientConfig::default_path(),
        ),
    };
    config.apply_cli(cli);
    Ok((config, path))
}

async fn run(
    command: Option<Command>,
    config: &ClientConfig,
    path: &std::path::Path,
) -> ClientResult<()> {
    match command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(config, path),
            ConfigAction::Validate => commands::config::validate(config),
            ConfigAction::Path => commands::config::path(path),
        },
        Some(Command::Select { kind, id, desktop }) => {
            let api = commands::build_api(&config.api)?;
            let key = dealercal_core::EventKey::new(kind, id);
            commands::select::run(api.as_ref(), config, key, desktop).await
        }
        Some(Command::Events) | None => {
            let api = commands::build_api(&config.api)?;
            commands::events::run(api.as_ref(), config).await
        }
    }
}
