//! Core types: entities, calendar events, normalization, filters, styles, formatting
//!
//! The calendar pipeline turns three entity collections into one styled
//! event batch:
//!
//! ```text
//! appointments ─┐
//! services ─────┼─▶ SourceFilters ─▶ Normalize ─▶ resolve_style ─▶ EventBatch
//! reminders ────┘
//! ```

pub mod entity;
pub mod event;
pub mod filter;
pub mod format;
pub mod normalize;
pub mod selection;
pub mod style;
pub mod time;
pub mod tracing;
pub mod view;

pub use entity::{
    Appointment, AppointmentStatus, AppointmentType, EventKind, Reminder, Service, ServiceStatus,
    Source, SourceEntity,
};
pub use event::{CalendarEvent, EventKey, EventResource};
pub use filter::SourceFilters;
pub use format::{FormatOptions, JsonEvent, JsonOutput, OutputFormat, OutputFormatter, ellipsis};
pub use normalize::{Normalize, NormalizationError, NormalizationReason, normalize, normalize_all};
pub use selection::{SelectionNotice, SelectionNotifier, dispatch_selection};
pub use style::{StyleCategory, resolve_style};
pub use time::{add_hours, parse_instant};
pub use crate::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use view::{
    CalendarInputs, CalendarView, EventBatch, FetchTicket, MalformedPolicy, SourceRecord,
    SourceSnapshot, StyledEvent, build_batch,
};
