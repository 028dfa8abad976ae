//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/dealercal/config.toml` by default. Command-line flags are
//! applied on top with [`ClientConfig::apply_cli`].
//!
//! The API token supports secret references:
//! - `pass::path/in/store` resolved via `pass show`
//! - `env::VAR_NAME` resolved from the environment

use std::path::{Path, PathBuf};

use dealercal_core::{FormatOptions, MalformedPolicy, OutputFormat, Source, SourceFilters};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

// ---------------------------------------------------------------------------
// ClientConfig (config.toml)
// ---------------------------------------------------------------------------

/// Configuration for the dealercal client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug mode.
    pub debug: bool,

    /// Dealership API settings.
    pub api: ApiSettings,

    /// Per-source visibility.
    pub filters: FilterSettings,

    /// Display settings.
    pub display: DisplaySettings,
}

/// Where the collections come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// API root, e.g. `https://dealer.example.com`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Bearer token (supports `pass::` and `env::` prefixes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Request timeout in seconds.
    pub timeout: u64,

    /// JSON fixture read instead of calling the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixture: Option<PathBuf>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            timeout: 15,
            fixture: None,
        }
    }
}

/// `[filters]`: `false` hides a source, anything else shows it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointments: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminders: Option<bool>,
}

impl FilterSettings {
    fn slot(&mut self, source: Source) -> &mut Option<bool> {
        match source {
            Source::Appointments => &mut self.appointments,
            Source::Services => &mut self.services,
            Source::Reminders => &mut self.reminders,
        }
    }

    /// Records an explicit visibility for `source`.
    pub fn set(&mut self, source: Source, visible: bool) {
        *self.slot(source) = Some(visible);
    }

    /// Converts to pipeline filters. Unset entries stay absent (visible).
    pub fn to_filters(&self) -> SourceFilters {
        [
            (Source::Appointments, self.appointments),
            (Source::Services, self.services),
            (Source::Reminders, self.reminders),
        ]
        .into_iter()
        .fold(SourceFilters::new(), |filters, (source, flag)| match flag {
            Some(visible) => filters.with(source, visible),
            None => filters,
        })
    }
}

/// Display settings for output formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// `text` or `json`.
    pub format: OutputFormat,

    /// Maximum title length (truncated with ellipsis).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_title_length: Option<usize>,

    /// Text to show when there are no events.
    pub no_events_text: String,

    /// `log` or `surface`.
    pub malformed: MalformedPolicy,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            max_title_length: None,
            no_events_text: FormatOptions::default().no_events_text,
            malformed: MalformedPolicy::Log,
        }
    }
}

impl DisplaySettings {
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            max_title_length: self.max_title_length,
            no_events_text: self.no_events_text.clone(),
        }
    }
}

impl ApiSettings {
    /// Resolves the token, expanding `pass::` / `env::` references.
    pub fn resolve_token(&self) -> Result<Option<String>, String> {
        match self.token.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => crate::secret::resolve(raw)
                .map(Some)
                .map_err(|e| format!("failed to resolve api.token: {}", e)),
        }
    }

    /// Builds the REST provider configuration.
    #[cfg(feature = "rest")]
    pub fn to_rest_config(&self) -> Result<dealercal_providers::rest::RestConfig, String> {
        use dealercal_providers::rest::RestConfig;
        use std::time::Duration;

        let base_url = self.base_url.as_deref().ok_or_else(|| {
            format!(
                "no API configured. Add to {}:\n  \
                 [api]\n  \
                 base_url = \"https://dealer.example.com\"\n\n  \
                 Or pass --base-url, or --fixture <file> to work offline",
                ClientConfig::default_path().display()
            )
        })?;

        let mut config = RestConfig::new(base_url)
            .map_err(|e| format!("invalid api.base_url `{}`: {}", base_url, e))?
            .with_timeout(Duration::from_secs(self.timeout.max(1)));

        if let Some(token) = self.resolve_token()? {
            config = config.with_token(token);
        }

        Ok(config)
    }
}

impl ClientConfig {
    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse {}: {}", path.display(), e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dealercal")
    }

    /// Overlays command-line flags. Flags win over file values.
    pub fn apply_cli(&mut self, cli: &Cli) {
        self.debug |= cli.debug;

        if let Some(ref url) = cli.base_url {
            self.api.base_url = Some(url.clone());
        }
        if let Some(ref token) = cli.token {
            self.api.token = Some(token.clone());
        }
        if let Some(timeout) = cli.timeout {
            self.api.timeout = timeout;
        }
        if let Some(ref fixture) = cli.fixture {
            self.api.fixture = Some(fixture.clone());
        }

        for source in cli.hidden_sources() {
            self.filters.set(source, false);
        }

        if cli.json {
            self.display.format = OutputFormat::Json;
        }
        if let Some(max) = cli.max_title_length {
            self.display.max_title_length = Some(max);
        }
        if let Some(ref text) = cli.no_events_text {
            self.display.no_events_text = text.clone();
        }
        if cli.surface_malformed {
            self.display.malformed = MalformedPolicy::Surface;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    mod parse {
        use super::*;

        #[test]
        fn empty_file_is_default() {
            let config: ClientConfig = toml::from_str("").unwrap();
            assert_eq!(config, ClientConfig::default());
            assert_eq!(config.api.timeout, 15);
            assert_eq!(config.display.no_events_text, "No events");
        }

        #[test]
        fn full_file() {
            let config: ClientConfig = toml::from_str(
                r#"
debug = true

[api]
base_url = "https://dealer.example.com"
token = "env::DEALERCAL_TOKEN"
timeout = 10

[filters]
appointments = true
reminders = false

[display]
format = "json"
no_events_text = "Nothing booked"
malformed = "surface"
"#,
            )
            .unwrap();

            assert!(config.debug);
            assert_eq!(config.api.base_url.as_deref(), Some("https://dealer.example.com"));
            assert_eq!(config.api.timeout, 10);
            assert_eq!(config.display.format, OutputFormat::Json);
            assert_eq!(config.display.malformed, MalformedPolicy::Surface);

            let filters = config.filters.to_filters();
            assert!(filters.is_visible(Source::Appointments));
            assert!(filters.is_visible(Source::Services));
            assert!(!filters.is_visible(Source::Reminders));
        }

        #[test]
        fn unknown_format_is_rejected() {
            let result: Result<ClientConfig, _> = toml::from_str("[display]\nformat = \"xml\"\n");
            assert!(result.is_err());
        }

        #[test]
        fn dump_round_trips() {
            let mut config = ClientConfig::default();
            config.api.base_url = Some("http://localhost:8080".into());
            config.filters.set(Source::Services, false);

            let text = toml::to_string_pretty(&config).unwrap();
            let back: ClientConfig = toml::from_str(&text).unwrap();
            assert_eq!(back, config);
        }
    }

    mod load {
        use super::*;
        use std::io::Write;

        #[test]
        fn load_from_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "[filters]\nservices = false").unwrap();

            let config = ClientConfig::load_from(file.path()).unwrap();
            assert!(!config.filters.to_filters().is_visible(Source::Services));
        }

        #[test]
        fn missing_file_errors() {
            let dir = tempfile::tempdir().unwrap();
            let err = ClientConfig::load_from(&dir.path().join("nope.toml")).unwrap_err();
            assert!(err.contains("failed to read"));
        }

        #[test]
        fn invalid_toml_errors() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "[api\nbase_url = ").unwrap();

            let err = ClientConfig::load_from(file.path()).unwrap_err();
            assert!(err.contains("failed to parse"));
        }

        #[test]
        fn default_path_ends_with_app_dir() {
            assert!(ClientConfig::default_path().ends_with("dealercal/config.toml"));
        }
    }

    mod overrides {
        use super::*;

        #[test]
        fn flags_win_over_file() {
            let mut config = ClientConfig::default();
            config.filters.set(Source::Services, true);
            config.api.base_url = Some("https://file.example.com".into());

            let cli = Cli::try_parse_from([
                "dealercal",
                "--hide-services",
                "--json",
                "--base-url",
                "https://flag.example.com",
                "--surface-malformed",
                "--max-title-length",
                "12",
            ])
            .unwrap();
            config.apply_cli(&cli);

            assert!(!config.filters.to_filters().is_visible(Source::Services));
            assert_eq!(config.display.format, OutputFormat::Json);
            assert_eq!(config.api.base_url.as_deref(), Some("https://flag.example.com"));
            assert_eq!(config.display.malformed, MalformedPolicy::Surface);
            assert_eq!(config.display.format_options().max_title_length, Some(12));
        }

        #[test]
        fn absent_flags_keep_file_values() {
            let mut config = ClientConfig::default();
            config.filters.set(Source::Reminders, false);
            config.display.format = OutputFormat::Json;

            let cli = Cli::try_parse_from(["dealercal"]).unwrap();
            config.apply_cli(&cli);

            assert!(!config.filters.to_filters().is_visible(Source::Reminders));
            assert_eq!(config.display.format, OutputFormat::Json);
        }
    }

    #[cfg(feature = "rest")]
    mod rest_config {
        use super::*;
        use std::time::Duration;

        #[test]
        fn builds_with_env_token() {
            unsafe {
                std::env::set_var("_DEALERCAL_CFG_TOKEN", "abc");
            }
            let settings = ApiSettings {
                base_url: Some("https://dealer.example.com".into()),
                token: Some("env::_DEALERCAL_CFG_TOKEN".into()),
                timeout: 7,
                fixture: None,
            };

            let config = settings.to_rest_config().unwrap();
            assert_eq!(config.token.as_deref(), Some("abc"));
            assert_eq!(config.timeout, Duration::from_secs(7));
            unsafe {
                std::env::remove_var("_DEALERCAL_CFG_TOKEN");
            }
        }

        #[test]
        fn missing_base_url_explains_fix() {
            let err = ApiSettings::default().to_rest_config().unwrap_err();
            assert!(err.contains("base_url"));
            assert!(err.contains("--fixture"));
        }

        #[test]
        fn invalid_base_url() {
            let settings = ApiSettings {
                base_url: Some("not a url".into()),
                ..ApiSettings::default()
            };
            assert!(settings.to_rest_config().unwrap_err().contains("invalid api.base_url"));
        }
    }
}
