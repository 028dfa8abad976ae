//! End-to-end runs over the bundled demo fixture.

use std::path::PathBuf;

use dealercal_client::commands::{build_api, events, select};
use dealercal_client::config::{ApiSettings, ClientConfig};
use dealercal_core::{EventKey, EventKind, MalformedPolicy, OutputFormat, SelectionNotice};

fn demo_config() -> ClientConfig {
    let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos/fixture.json");
    ClientConfig {
        api: ApiSettings {
            fixture: Some(fixture),
            ..ApiSettings::default()
        },
        ..ClientConfig::default()
    }
}

#[tokio::test]
async fn demo_calendar_renders_every_placeable_entity() {
    let config = demo_config();
    let api = build_api(&config.api).unwrap();

    let out = events::render(api.as_ref(), &config).await.unwrap();
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "2025-06-01 09:00-11:00  [in-progress] Service: Oil change");
    assert_eq!(
        lines[5],
        "2025-11-01 00:00-01:00  [reminder-default] Reminder: Winter tyres"
    );
}

#[tokio::test]
async fn demo_json_surfaces_undated_appointment() {
    let mut config = demo_config();
    config.display.format = OutputFormat::Json;
    config.display.malformed = MalformedPolicy::Surface;
    let api = build_api(&config.api).unwrap();

    let out = events::render(api.as_ref(), &config).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(value["count"], 6);
    assert_eq!(value["skipped"], 1);
    assert_eq!(value["issues"][0]["entityType"], "appointment");
    assert_eq!(value["issues"][0]["entityId"], 8);
}

#[tokio::test]
async fn demo_select_service_sharing_an_appointment_id() {
    let config = demo_config();
    let api = build_api(&config.api).unwrap();
    let mut seen = Vec::new();
    let mut notifier = |notice: SelectionNotice| seen.push(notice);

    select::select(
        api.as_ref(),
        &config,
        EventKey::new(EventKind::Service, 1),
        &mut notifier,
    )
    .await
    .unwrap();

    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].title, "Service: Oil change");
    assert_eq!(seen[0].kind, EventKind::Service);
}
