//! REST backend configuration.

use std::time::Duration;
use url::Url;

/// Connection settings for the dealership REST API.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Server root; collections live under `{base_url}/api/`.
    pub base_url: Url,

    /// Bearer token sent with every request.
    pub token: Option<String>,

    /// Per-request timeout.
    pub timeout: Duration,

    pub user_agent: String,
}

impl RestConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

    /// Creates a configuration for the given server root.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, url::ParseError> {
        let mut parsed = Url::parse(base_url.as_ref())?;
        if !parsed.path().ends_with('/') {
            let path = format!("{}/", parsed.path());
            parsed.set_path(&path);
        }

        Ok(Self {
            base_url: parsed,
            token: None,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("dealercal/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the URL of a collection endpoint, e.g. `{base}/api/services`.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` does not form a valid relative path.
    pub fn collection_url(&self, name: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(&format!("api/{}", name))
    }

    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}
