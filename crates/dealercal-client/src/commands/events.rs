//! `dealercal events`: print the unified calendar.

use dealercal_core::{EventBatch, OutputFormatter};
use dealercal_providers::{DealershipApi, collect_batch};
use tracing::warn;

use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Fetches all visible sources and returns the batch.
pub async fn load_batch(api: &dyn DealershipApi, config: &ClientConfig) -> EventBatch {
    let (batch, report) =
        collect_batch(api, config.filters.to_filters(), config.display.malformed).await;
    for (source, err) in report.failures() {
        warn!(%source, error = %err, "Source unavailable, showing calendar without it");
    }
    batch
}

/// Renders the batch in the configured format.
pub async fn render(api: &dyn DealershipApi, config: &ClientConfig) -> ClientResult<String> {
    let batch = load_batch(api, config).await;
    let formatter = OutputFormatter::new(config.display.format_options());
    Ok(formatter.format(&batch, config.display.format))
}

/// Prints the calendar to stdout.
pub async fn run(api: &dyn DealershipApi, config: &ClientConfig) -> ClientResult<()> {
    println!("{}", render(api, config).await?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealercal_core::{MalformedPolicy, OutputFormat, Source};
    use dealercal_providers::StaticApi;

    const FIXTURE: &str = r#"{
        "appointments": [
            {"id": 1, "customerId": 7, "userId": 2, "type": "test_drive", "date": "2025-06-01T10:00:00"},
            {"id": 8, "customerId": 7, "userId": 2, "type": "revision"}
        ],
        "services": [
            {"id": 2, "description": "Oil change", "customerId": 7, "vehicleId": 9,
             "serviceDate": "2025-06-01T09:00:00", "status": "in_progress"}
        ],
        "reminders": [
            {"id": 3, "vehicleId": 9, "customerId": 7, "title": "Insurance renewal",
             "dueDate": "2025-06-10T00:00:00", "isCompleted": true}
        ]
    }"#;

    #[tokio::test]
    async fn renders_text() {
        let api = StaticApi::from_json(FIXTURE).unwrap();

        let out = render(&api, &ClientConfig::default()).await.unwrap();

        assert_eq!(
            out,
            "2025-06-01 09:00-11:00  [in-progress] Service: Oil change\n\
             2025-06-01 10:00-11:00  [appointment-default] Booking: test_drive\n\
             2025-06-10 00:00-01:00  [completed] Reminder: Insurance renewal"
        );
    }

    #[tokio::test]
    async fn hidden_sources_and_json() {
        let api = StaticApi::from_json(FIXTURE).unwrap();
        let mut config = ClientConfig::default();
        config.filters.set(Source::Services, false);
        config.filters.set(Source::Reminders, false);
        config.display.format = OutputFormat::Json;
        config.display.malformed = MalformedPolicy::Surface;

        let out = render(&api, &config).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["count"], 1);
        assert_eq!(value["events"][0]["key"], "appointment#1");
        assert_eq!(value["skipped"], 1);
        assert_eq!(value["issues"][0]["entityId"], 8);
    }

    #[tokio::test]
    async fn empty_calendar_text() {
        let api = StaticApi::new();
        let mut config = ClientConfig::default();
        config.display.no_events_text = "Nothing booked".into();

        assert_eq!(render(&api, &config).await.unwrap(), "Nothing booked");
    }
}
