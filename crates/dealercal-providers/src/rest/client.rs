//! HTTP client for the dealership REST API.

use dealercal_core::Source;
use reqwest::{Client, Response, StatusCode, header};
use tracing::{trace, warn};

use super::config::RestConfig;
use crate::error::{ProviderError, ProviderResult};

/// Thin wrapper over `reqwest` that knows the collection endpoints.
#[derive(Debug, Clone)]
pub(crate) struct RestClient {
    client: Client,
    config: RestConfig,
}

impl RestClient {
    pub fn new(config: RestConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ProviderError::configuration(format!("Failed to create HTTP client: {}", e))
                    .with_cause(e)
            })?;

        Ok(Self { client, config })
    }

    /// Fetches the raw body of one collection.
    pub async fn get_collection(&self, source: Source) -> ProviderResult<String> {
        let url = self.config.collection_url(source.name()).map_err(|e| {
            ProviderError::configuration(format!("Invalid collection URL: {}", e)).for_source(source)
        })?;

        let mut request = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, "application/json");
        if let Some(token) = self.config.token.as_deref().filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        }

        trace!(url = %url, "Sending request");

        let response = request.send().await.map_err(|e| {
            let err = if e.is_timeout() {
                ProviderError::timeout(format!("Request timed out after {:?}", self.config.timeout))
            } else {
                ProviderError::network(format!("Request failed: {}", e))
            };
            err.for_source(source).with_cause(e)
        })?;

        self.handle_response(response)
            .await
            .map_err(|e| e.for_source(source))
    }

    /// Extracts the body of a successful response.
    async fn handle_response(&self, response: Response) -> ProviderResult<String> {
        let status = response.status();
        trace!(status = %status, "Received response");

        match status {
            StatusCode::OK => response.text().await.map_err(|e| {
                ProviderError::network(format!("Failed to read response: {}", e)).with_cause(e)
            }),
            StatusCode::UNAUTHORIZED => Err(ProviderError::authentication(
                "Authentication failed: token rejected",
            )),
            s => {
                let body = response.text().await.unwrap_or_default();
                if !s.is_server_error() {
                    warn!(status = %s, body = %body, "Unexpected response status");
                }
                Err(ProviderError::http_status(s.as_u16(), &body))
            }
        }
    }

    pub fn config(&self) -> &RestConfig {
        &self.config
    }
}
