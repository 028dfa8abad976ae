//! REST backend.
//!
//! # Example
//!
//! ```ignore
//! use dealercal_providers::rest::{RestApi, RestConfig};
//!
//! let config = RestConfig::new("https://dms.example.com/")?.with_token(token);
//! let api = RestApi::new(config)?;
//! let services = api.fetch_services().await?;
//! ```

mod client;
mod config;
mod provider;

pub use config::RestConfig;
pub use provider::RestApi;
