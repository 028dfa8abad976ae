//! The dealership API abstraction.
//!
//! [`DealershipApi`] is the seam between the calendar pipeline and whatever
//! serves the three entity collections: the REST backend in production, a
//! [`StaticApi`] fixture offline and in tests.

use std::future::Future;
use std::pin::Pin;

use dealercal_core::{Appointment, Reminder, Service, Source};
use serde::Deserialize;

use crate::error::{ProviderError, ProviderResult};

/// A boxed future for object-safe async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Read-only access to the entity collections.
///
/// Each method fetches one whole collection. Implementations own transport
/// concerns (authentication, timeouts); callers treat any error as "no
/// events from that source".
pub trait DealershipApi: Send + Sync {
    /// Short name used in logs (e.g. "rest", "fixture").
    fn name(&self) -> &str;

    /// `GET /api/appointments`
    fn fetch_appointments(&self) -> BoxFuture<'_, ProviderResult<Vec<Appointment>>>;

    /// `GET /api/services`
    fn fetch_services(&self) -> BoxFuture<'_, ProviderResult<Vec<Service>>>;

    /// `GET /api/reminders`
    fn fetch_reminders(&self) -> BoxFuture<'_, ProviderResult<Vec<Reminder>>>;
}

/// An entity type that a [`DealershipApi`] can fetch.
pub trait Fetchable: dealercal_core::SourceRecord + Send + 'static {
    fn fetch(api: &dyn DealershipApi) -> BoxFuture<'_, ProviderResult<Vec<Self>>>;
}

impl Fetchable for Appointment {
    fn fetch(api: &dyn DealershipApi) -> BoxFuture<'_, ProviderResult<Vec<Self>>> {
        api.fetch_appointments()
    }
}

impl Fetchable for Service {
    fn fetch(api: &dyn DealershipApi) -> BoxFuture<'_, ProviderResult<Vec<Self>>> {
        api.fetch_services()
    }
}

impl Fetchable for Reminder {
    fn fetch(api: &dyn DealershipApi) -> BoxFuture<'_, ProviderResult<Vec<Self>>> {
        api.fetch_reminders()
    }
}

/// In-memory collections, served as-is.
///
/// Loadable from a JSON document shaped like
/// `{"appointments": [...], "services": [...], "reminders": [...]}`; missing
/// keys are empty collections.
#[derive(Debug, Clone, Default)]
pub struct StaticApi {
    appointments: Vec<Appointment>,
    services: Vec<Service>,
    reminders: Vec<Reminder>,
}

#[derive(Deserialize)]
struct FixtureDocument {
    #[serde(default)]
    appointments: Vec<serde_json::Value>,
    #[serde(default)]
    services: Vec<serde_json::Value>,
    #[serde(default)]
    reminders: Vec<serde_json::Value>,
}

impl StaticApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a fixture document. Records that fail to decode are skipped.
    pub fn from_json(document: &str) -> ProviderResult<Self> {
        let doc: FixtureDocument = serde_json::from_str(document).map_err(|e| {
            ProviderError::configuration(format!("invalid fixture document: {}", e)).with_cause(e)
        })?;

        Ok(Self {
            appointments: crate::decode::decode_values(doc.appointments, Source::Appointments),
            services: crate::decode::decode_values(doc.services, Source::Services),
            reminders: crate::decode::decode_values(doc.reminders, Source::Reminders),
        })
    }

    pub fn with_appointments(mut self, appointments: Vec<Appointment>) -> Self {
        self.appointments = appointments;
        self
    }

    pub fn with_services(mut self, services: Vec<Service>) -> Self {
        self.services = services;
        self
    }

    pub fn with_reminders(mut self, reminders: Vec<Reminder>) -> Self {
        self.reminders = reminders;
        self
    }
}

impl DealershipApi for StaticApi {
    fn name(&self) -> &str {
        "fixture"
    }

    fn fetch_appointments(&self) -> BoxFuture<'_, ProviderResult<Vec<Appointment>>> {
        let items = self.appointments.clone();
        Box::pin(async move { Ok(items) })
    }

    fn fetch_services(&self) -> BoxFuture<'_, ProviderResult<Vec<Service>>> {
        let items = self.services.clone();
        Box::pin(async move { Ok(items) })
    }

    fn fetch_reminders(&self) -> BoxFuture<'_, ProviderResult<Vec<Reminder>>> {
        let items = self.reminders.clone();
        Box::pin(async move { Ok(items) })
    }
}

/// An API whose every fetch fails.
///
/// Stands in for a backend that could not be configured, so the calendar
/// still renders (empty) instead of the command failing.
#[derive(Debug)]
pub struct ErrorApi {
    error: ProviderError,
}

impl ErrorApi {
    pub fn new(error: ProviderError) -> Self {
        Self { error }
    }

    fn fail<T: Send + 'static>(&self, source: Source) -> BoxFuture<'_, ProviderResult<T>> {
        let error = ProviderError::new(self.error.code(), self.error.message()).for_source(source);
        Box::pin(async move { Err(error) })
    }
}

impl DealershipApi for ErrorApi {
    fn name(&self) -> &str {
        "error"
    }

    fn fetch_appointments(&self) -> BoxFuture<'_, ProviderResult<Vec<Appointment>>> {
        self.fail(Source::Appointments)
    }

    fn fetch_services(&self) -> BoxFuture<'_, ProviderResult<Vec<Service>>> {
        self.fail(Source::Services)
    }

    fn fetch_reminders(&self) -> BoxFuture<'_, ProviderResult<Vec<Reminder>>> {
        self.fail(Source::Reminders)
    }
}
