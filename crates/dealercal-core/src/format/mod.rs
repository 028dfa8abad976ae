//! Output formatting for event batches.
//!
//! This module provides formatters for displaying an [`EventBatch`]:
//! - **Text**: one line per event for terminals
//! - **JSON**: machine-readable output for other tools
//!
//! # Example
//!
//! ```rust
//! use dealercal_core::format::{FormatOptions, OutputFormat, OutputFormatter};
//! use dealercal_core::EventBatch;
//!
//! let formatter = OutputFormatter::new(FormatOptions::default());
//! let text = formatter.format(&EventBatch::default(), OutputFormat::Text);
//! assert_eq!(text, "No events");
//! ```

use std::borrow::Cow;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::entity::EventKind;
use crate::normalize::NormalizationError;
use crate::style::StyleCategory;
use crate::view::{EventBatch, StyledEvent};


/// The output format for batch display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable terminal output.
    #[default]
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Configuration options for output formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Maximum length for event titles (truncated with ellipsis).
    pub max_title_length: Option<usize>,
    /// Text printed when the batch has no events.
    pub no_events_text: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            max_title_length: None,
            no_events_text: "No events".to_string(),
        }
    }
}

/// JSON document for a whole batch.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    pub events: Vec<JsonEvent>,
    /// Number of events returned.
    pub count: usize,
    /// Number of entities skipped during normalization.
    pub skipped: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<NormalizationError>,
}

/// A single event in JSON format.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonEvent {
    /// `<type>#<id>`, unique across sources.
    pub key: String,
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Event title (may be truncated).
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<i64>,
    pub category: StyleCategory,
}

/// Formats event batches.
#[derive(Debug, Clone, Default)]
pub struct OutputFormatter {
    options: FormatOptions,
}

impl OutputFormatter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Formats the batch in the requested format.
    pub fn format(&self, batch: &EventBatch, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => self.format_text(batch),
            OutputFormat::Json => serde_json::to_string_pretty(&self.format_json(batch))
                .unwrap_or_else(|_| "{}".to_string()),
        }
    }

    /// One line per event: `<when>  [<category>] <title>`.
    pub fn format_text(&self, batch: &EventBatch) -> String {
        if batch.is_empty() {
            return self.options.no_events_text.clone();
        }

        batch
            .iter()
            .map(|styled| self.format_line(styled))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Builds the JSON document for the batch.
    pub fn format_json(&self, batch: &EventBatch) -> JsonOutput {
        let events: Vec<JsonEvent> = batch.iter().map(|s| self.json_event(s)).collect();
        JsonOutput {
            count: events.len(),
            events,
            skipped: batch.skipped,
            issues: batch.issues.clone(),
        }
    }

    fn format_line(&self, styled: &StyledEvent) -> String {
        format!(
            "{}  [{}] {}",
            time_range(styled.event.start, styled.event.end),
            styled.category,
            self.title(&styled.event.title)
        )
    }

    fn json_event(&self, styled: &StyledEvent) -> JsonEvent {
        let event = &styled.event;
        JsonEvent {
            key: event.key().to_string(),
            id: event.id,
            kind: event.kind(),
            title: self.title(&event.title).into_owned(),
            start: event.start,
            end: event.end,
            status: event.resource.status(),
            customer_id: event.resource.customer_id(),
            vehicle_id: event.resource.vehicle_id(),
            category: styled.category,
        }
    }

    fn title<'a>(&self, title: &'a str) -> Cow<'a, str> {
        match self.options.max_title_length {
            Some(max) => ellipsis(title, max),
            None => Cow::Borrowed(title),
        }
    }
}

/// Formats `start-end`, repeating the date only when the end is on another day.
pub fn time_range(start: NaiveDateTime, end: NaiveDateTime) -> String {
    if start.date() == end.date() {
        format!("{}-{}", start.format("%Y-%m-%d %H:%M"), end.format("%H:%M"))
    } else {
        format!(
            "{}-{}",
            start.format("%Y-%m-%d %H:%M"),
            end.format("%Y-%m-%d %H:%M")
        )
    }
}

/// Truncates a string to a maximum length, adding an ellipsis if needed.
pub fn ellipsis(s: &str, max_len: usize) -> Cow<'_, str> {
    if max_len == 0 {
        return Cow::Borrowed("");
    }

    if s.chars().count() <= max_len {
        return Cow::Borrowed(s);
    }

    let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
    Cow::Owned(format!("{}...", truncated))
}
