//! Configuration commands.

use std::path::Path;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Renders the effective configuration as TOML.
///
/// A literal token is masked; `env::` and `pass::` references are shown.
pub fn render(config: &ClientConfig) -> ClientResult<String> {
    let mut config = config.clone();
    if let Some(ref token) = config.api.token {
        if !crate::secret::is_reference(token) {
            config.api.token = Some("********".to_string());
        }
    }

    toml::to_string_pretty(&config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))
}

/// Dump the effective configuration to stdout.
pub fn dump(config: &ClientConfig, path: &Path) -> ClientResult<()> {
    println!("# config.toml ({})", path.display());
    println!("{}", render(config)?);
    Ok(())
}

/// Checks that the configured source can be built.
pub fn validate(config: &ClientConfig) -> ClientResult<()> {
    match config.api.fixture {
        Some(ref fixture) => {
            super::build_api(&config.api)?;
            println!("Fixture {} is readable.", fixture.display());
        }
        None => {
            config.api.resolve_token().map_err(ClientError::Config)?;
            super::build_api(&config.api)?;
            println!("API settings are valid.");
        }
    }

    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path) -> ClientResult<()> {
    println!("config: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_token_is_masked() {
        let mut config = ClientConfig::default();
        config.api.base_url = Some("https://dealer.example.com".into());
        config.api.token = Some("plain-secret".into());

        let out = render(&config).unwrap();
        assert!(!out.contains("plain-secret"));
        assert!(out.contains("********"));
        assert!(out.contains("base_url = \"https://dealer.example.com\""));
    }

    #[test]
    fn reference_token_is_shown() {
        let mut config = ClientConfig::default();
        config.api.token = Some("env::DEALERCAL_TOKEN".into());

        assert!(render(&config).unwrap().contains("env::DEALERCAL_TOKEN"));
    }

    #[test]
    fn renders_sections() {
        let out = render(&ClientConfig::default()).unwrap();
        assert!(out.contains("[api]"));
        assert!(out.contains("[display]"));
        assert!(out.contains("format = \"text\""));
        assert!(out.contains("malformed = \"log\""));
    }

    #[test]
    fn validate_rejects_missing_api() {
        assert!(validate(&ClientConfig::default()).is_err());
    }
}
