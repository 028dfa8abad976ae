//! REST implementation of [`DealershipApi`].

use dealercal_core::{Appointment, Reminder, Service, Source};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::client::RestClient;
use super::config::RestConfig;
use crate::api::{BoxFuture, DealershipApi};
use crate::decode::decode_collection;
use crate::error::ProviderResult;

/// Fetches the three collections from `{base_url}/api/{source}`.
#[derive(Debug, Clone)]
pub struct RestApi {
    client: RestClient,
}

impl RestApi {
    /// Creates a new REST API with the given configuration.
    pub fn new(config: RestConfig) -> ProviderResult<Self> {
        if !config.has_token() {
            debug!(url = %config.base_url, "No bearer token configured");
        }
        Ok(Self {
            client: RestClient::new(config)?,
        })
    }

    pub fn config(&self) -> &RestConfig {
        self.client.config()
    }

    async fn fetch<T: DeserializeOwned>(&self, source: Source) -> ProviderResult<Vec<T>> {
        let body = self.client.get_collection(source).await?;
        let records = decode_collection(&body, source)?;
        info!(source = %source, count = records.len(), "Fetched collection");
        Ok(records)
    }
}

impl DealershipApi for RestApi {
    fn name(&self) -> &str {
        "rest"
    }

    fn fetch_appointments(&self) -> BoxFuture<'_, ProviderResult<Vec<Appointment>>> {
        Box::pin(self.fetch(Source::Appointments))
    }

    fn fetch_services(&self) -> BoxFuture<'_, ProviderResult<Vec<Service>>> {
        Box::pin(self.fetch(Source::Services))
    }

    fn fetch_reminders(&self) -> BoxFuture<'_, ProviderResult<Vec<Reminder>>> {
        Box::pin(self.fetch(Source::Reminders))
    }
}
