//! Error types for fetching dealership data.
//!
//! A [`ProviderError`] never aborts a calendar batch: the collector turns it
//! into a failed source snapshot and the source contributes no events.

use std::fmt;

use dealercal_core::Source;
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// The bearer token was rejected (401).
    AuthenticationFailed,
    /// The token lacks access to the collection (403).
    AuthorizationFailed,
    /// Connection failure, DNS, TLS.
    NetworkError,
    /// The request exceeded the configured timeout.
    Timeout,
    /// Too many requests (429).
    RateLimited,
    /// 5xx responses.
    ServerError,
    /// Body is not a JSON collection.
    InvalidResponse,
    /// Endpoint does not exist (404).
    NotFound,
    /// Any other 4xx response.
    BadRequest,
    /// Missing or invalid base URL, token or fixture.
    ConfigurationError,
}

impl ProviderErrorCode {
    /// Returns true if a later fetch may succeed without a config change.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError | Self::Timeout | Self::RateLimited | Self::ServerError
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::AuthorizationFailed => "authorization_failed",
            Self::NetworkError => "network_error",
            Self::Timeout => "timeout",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::NotFound => "not_found",
            Self::BadRequest => "bad_request",
            Self::ConfigurationError => "configuration_error",
        }
    }

    /// Maps a non-success HTTP status code.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 => Self::AuthenticationFailed,
            403 => Self::AuthorizationFailed,
            404 => Self::NotFound,
            408 => Self::Timeout,
            429 => Self::RateLimited,
            500..=599 => Self::ServerError,
            400..=499 => Self::BadRequest,
            _ => Self::InvalidResponse,
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error raised while fetching one source collection.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    /// Which collection was being fetched, if known.
    source_name: Option<Source>,
    #[source]
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source_name: None,
            cause: None,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthenticationFailed, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Timeout, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ConfigurationError, message)
    }

    /// Builds the error for a non-success HTTP response.
    pub fn http_status(status: u16, body: &str) -> Self {
        let body = body.trim();
        let message = if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            format!("HTTP {}: {}", status, body)
        };
        Self::new(ProviderErrorCode::from_http_status(status), message)
    }

    /// Records which collection failed.
    pub fn for_source(mut self, source: Source) -> Self {
        self.source_name = Some(source);
        self
    }

    /// Attaches the underlying error.
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_name(&self) -> Option<Source> {
        self.source_name
    }

    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = self.source_name {
            write!(f, "[{}] ", source)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_codes() {
        assert!(ProviderErrorCode::NetworkError.is_retryable());
        assert!(ProviderErrorCode::Timeout.is_retryable());
        assert!(ProviderErrorCode::ServerError.is_retryable());
        assert!(!ProviderErrorCode::AuthenticationFailed.is_retryable());
        assert!(!ProviderErrorCode::InvalidResponse.is_retryable());
    }

    #[test]
    fn maps_http_status() {
        assert_eq!(
            ProviderErrorCode::from_http_status(401),
            ProviderErrorCode::AuthenticationFailed
        );
        assert_eq!(ProviderErrorCode::from_http_status(404), ProviderErrorCode::NotFound);
        assert_eq!(ProviderErrorCode::from_http_status(422), ProviderErrorCode::BadRequest);
        assert_eq!(ProviderErrorCode::from_http_status(503), ProviderErrorCode::ServerError);
    }

    #[test]
    fn display_names_source() {
        let err = ProviderError::http_status(500, "boom\n").for_source(Source::Services);
        assert_eq!(err.to_string(), "[services] server_error: HTTP 500: boom");
        assert_eq!(err.source_name(), Some(Source::Services));
    }

    #[test]
    fn empty_body_is_omitted() {
        let err = ProviderError::http_status(401, "");
        assert_eq!(err.to_string(), "authentication_failed: HTTP 401");
    }

    #[test]
    fn keeps_cause() {
        use std::error::Error;
        let io_err = std::io::Error::other("disk full");
        let err = ProviderError::configuration("cannot read fixture").with_cause(io_err);
        assert!(err.source().is_some());
    }
}
