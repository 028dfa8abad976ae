//! Command implementations.

pub mod config;
pub mod events;
pub mod select;

use dealercal_providers::{DealershipApi, StaticApi};
use tracing::debug;

use crate::config::ApiSettings;
use crate::error::{ClientError, ClientResult};

/// Builds the API the commands read from.
///
/// A configured fixture takes precedence over the REST backend.
pub fn build_api(settings: &ApiSettings) -> ClientResult<Box<dyn DealershipApi>> {
    if let Some(ref path) = settings.fixture {
        debug!(path = %path.display(), "Using fixture");
        let document = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read fixture {}: {}", path.display(), e))
        })?;
        return Ok(Box::new(StaticApi::from_json(&document)?));
    }

    build_rest_api(settings)
}

#[cfg(feature = "rest")]
fn build_rest_api(settings: &ApiSettings) -> ClientResult<Box<dyn DealershipApi>> {
    let config = settings.to_rest_config().map_err(ClientError::Config)?;
    debug!(url = %config.base_url, "Using REST API");
    Ok(Box::new(dealercal_providers::rest::RestApi::new(config)?))
}

#[cfg(not(feature = "rest"))]
fn build_rest_api(_settings: &ApiSettings) -> ClientResult<Box<dyn DealershipApi>> {
    Err(ClientError::Config(
        "built without REST support; use --fixture".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn fixture_wins_over_base_url() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"appointments": []}}"#).unwrap();
        let settings = ApiSettings {
            base_url: Some("https://dealer.example.com".into()),
            fixture: Some(file.path().to_path_buf()),
            ..ApiSettings::default()
        };

        let api = build_api(&settings).unwrap();
        assert_eq!(api.name(), "fixture");
    }

    #[test]
    fn missing_fixture_is_config_error() {
        let settings = ApiSettings {
            fixture: Some("/nonexistent/dealercal-fixture.json".into()),
            ..ApiSettings::default()
        };
        assert!(matches!(build_api(&settings), Err(ClientError::Config(_))));
    }

    #[cfg(feature = "rest")]
    #[test]
    fn base_url_selects_rest() {
        let settings = ApiSettings {
            base_url: Some("https://dealer.example.com".into()),
            ..ApiSettings::default()
        };
        assert_eq!(build_api(&settings).unwrap().name(), "rest");
    }

    #[test]
    fn nothing_configured_is_config_error() {
        assert!(matches!(
            build_api(&ApiSettings::default()),
            Err(ClientError::Config(_))
        ));
    }
}
