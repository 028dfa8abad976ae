//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dealercal_core::{EventKind, Source};

/// dealercal - Appointments, services and reminders on one calendar
#[derive(Debug, Parser)]
#[command(name = "dealercal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "DEALERCAL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    // --- Output flags ---
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Maximum title length (truncated with ellipsis)
    #[arg(long)]
    pub max_title_length: Option<usize>,

    /// Text to show when there are no events
    #[arg(long)]
    pub no_events_text: Option<String>,

    /// Report entities that could not be placed on the calendar
    #[arg(long)]
    pub surface_malformed: bool,

    // --- Source flags ---
    /// Leave appointments off the calendar
    #[arg(long)]
    pub hide_appointments: bool,

    /// Leave services off the calendar
    #[arg(long)]
    pub hide_services: bool,

    /// Leave reminders off the calendar
    #[arg(long)]
    pub hide_reminders: bool,

    // --- Connection flags ---
    /// Dealership API root URL
    #[arg(long, env = "DEALERCAL_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Bearer token (accepts `env::VAR` and `pass::path` references)
    #[arg(long, env = "DEALERCAL_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Read collections from a JSON fixture instead of the API
    #[arg(long, env = "DEALERCAL_FIXTURE", global = true)]
    pub fixture: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Sources hidden by `--hide-*` flags.
    pub fn hidden_sources(&self) -> Vec<Source> {
        [
            (Source::Appointments, self.hide_appointments),
            (Source::Services, self.hide_services),
            (Source::Reminders, self.hide_reminders),
        ]
        .into_iter()
        .filter_map(|(source, hidden)| hidden.then_some(source))
        .collect()
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the event batch (default)
    Events,

    /// Select an event and deliver its notice
    Select {
        /// Event type: appointment, service or reminder
        kind: EventKind,

        /// Entity id
        id: i64,

        /// Show a desktop notification instead of printing
        #[arg(long)]
        desktop: bool,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump the effective configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
