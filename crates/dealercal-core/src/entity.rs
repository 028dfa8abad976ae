//! Dealership entities as served by the REST API.
//!
//! This module provides the records that feed the calendar:
//! - [`Appointment`]: a booking (test drive, maintenance, ...)
//! - [`Service`]: a workshop service job
//! - [`Reminder`]: a vehicle-related reminder
//! - [`SourceEntity`]: a tagged union over the three, used as the
//!   back-reference carried by every [`CalendarEvent`](crate::CalendarEvent)
//!
//! Date fields are kept as the raw strings from the wire. Parsing happens
//! during normalization so that one bad date skips one record instead of
//! failing the whole collection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The kind of calendar event, one per source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Appointment,
    Service,
    Reminder,
}

impl EventKind {
    /// All kinds, in display order.
    pub const ALL: [EventKind; 3] = [Self::Appointment, Self::Service, Self::Reminder];

    /// Returns the wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Appointment => "appointment",
            Self::Service => "service",
            Self::Reminder => "reminder",
        }
    }

    /// Returns the source collection that produces events of this kind.
    pub fn source(&self) -> Source {
        match self {
            Self::Appointment => Source::Appointments,
            Self::Service => Source::Services,
            Self::Reminder => Source::Reminders,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "appointment" | "appointments" | "booking" => Ok(Self::Appointment),
            "service" | "services" => Ok(Self::Service),
            "reminder" | "reminders" => Ok(Self::Reminder),
            other => Err(format!(
                "unknown event type `{}` (expected appointment, service or reminder)",
                other
            )),
        }
    }
}

/// A source collection feeding the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Appointments,
    Services,
    Reminders,
}

impl Source {
    /// All sources, in fetch order.
    pub const ALL: [Source; 3] = [Self::Appointments, Self::Services, Self::Reminders];

    /// Returns the source name used in filters and endpoint paths.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Appointments => "appointments",
            Self::Services => "services",
            Self::Reminders => "reminders",
        }
    }

    /// Returns the event kind produced by this source.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Appointments => EventKind::Appointment,
            Self::Services => EventKind::Service,
            Self::Reminders => EventKind::Reminder,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Appointments => 0,
            Self::Services => 1,
            Self::Reminders => 2,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The kind of an appointment.
///
/// Values outside the known set decode as [`AppointmentType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentType {
    TestDrive,
    Maintenance,
    Revision,
    ScheduledMaintenance,
    #[serde(other)]
    Other,
}

impl AppointmentType {
    /// Returns the wire spelling (e.g. `test_drive`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TestDrive => "test_drive",
            Self::Maintenance => "maintenance",
            Self::Revision => "revision",
            Self::ScheduledMaintenance => "scheduled_maintenance",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of an appointment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }
}

/// Status of a service job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }
}

/// Reads a date field as raw text whatever its JSON type.
///
/// Non-string values (epoch numbers, objects) are kept in their JSON
/// spelling so the normalizer reports them as unparseable instead of the
/// whole record failing to decode. `null` is absent.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// A customer appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub customer_id: i64,
    #[serde(default)]
    pub vehicle_id: Option<i64>,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub appointment_type: AppointmentType,
    /// Raw appointment instant.
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<String>,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Appointment {
    /// Creates an appointment with the required fields.
    pub fn new(id: i64, appointment_type: AppointmentType, date: impl Into<String>) -> Self {
        Self {
            id,
            customer_id: 0,
            vehicle_id: None,
            user_id: 0,
            appointment_type,
            date: Some(date.into()),
            status: AppointmentStatus::Scheduled,
            notes: None,
        }
    }

    /// Builder method to set the customer.
    pub fn with_customer(mut self, customer_id: i64) -> Self {
        self.customer_id = customer_id;
        self
    }

    /// Builder method to set the vehicle.
    pub fn with_vehicle(mut self, vehicle_id: i64) -> Self {
        self.vehicle_id = Some(vehicle_id);
        self
    }

    /// Builder method to set the status.
    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = status;
        self
    }
}

/// A workshop service job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: i64,
    pub description: String,
    pub customer_id: i64,
    pub vehicle_id: i64,
    /// Raw start instant of the job.
    #[serde(default, deserialize_with = "lenient_date")]
    pub service_date: Option<String>,
    /// Raw completion instant, if the job has one.
    #[serde(default, deserialize_with = "lenient_date")]
    pub completion_date: Option<String>,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub status: ServiceStatus,
    #[serde(default)]
    pub parts_cost: f64,
    #[serde(default)]
    pub labor_cost: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Service {
    /// Creates a service job with the required fields.
    pub fn new(id: i64, description: impl Into<String>, service_date: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            customer_id: 0,
            vehicle_id: 0,
            service_date: Some(service_date.into()),
            completion_date: None,
            cost: 0.0,
            status: ServiceStatus::Scheduled,
            parts_cost: 0.0,
            labor_cost: 0.0,
            notes: None,
        }
    }

    /// Builder method to set the completion instant.
    pub fn with_completion_date(mut self, completion_date: impl Into<String>) -> Self {
        self.completion_date = Some(completion_date.into());
        self
    }

    /// Builder method to set the status.
    pub fn with_status(mut self, status: ServiceStatus) -> Self {
        self.status = status;
        self
    }

    /// Builder method to set customer and vehicle.
    pub fn with_owner(mut self, customer_id: i64, vehicle_id: i64) -> Self {
        self.customer_id = customer_id;
        self.vehicle_id = vehicle_id;
        self
    }
}

/// A reminder attached to a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: i64,
    pub vehicle_id: i64,
    pub customer_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Raw due instant.
    #[serde(default, deserialize_with = "lenient_date")]
    pub due_date: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(rename = "type", default)]
    pub reminder_type: String,
    #[serde(default)]
    pub notify_dates: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Reminder {
    /// Creates a reminder with the required fields.
    pub fn new(id: i64, title: impl Into<String>, due_date: impl Into<String>) -> Self {
        Self {
            id,
            vehicle_id: 0,
            customer_id: 0,
            title: title.into(),
            description: String::new(),
            due_date: Some(due_date.into()),
            is_completed: false,
            reminder_type: String::new(),
            notify_dates: Vec::new(),
            created_at: None,
        }
    }

    /// Builder method to mark the reminder as done.
    pub fn with_completed(mut self, is_completed: bool) -> Self {
        self.is_completed = is_completed;
        self
    }
}

/// One entity of any source, tagged by its kind.
///
/// Serialized untagged: the surrounding resource already names the kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SourceEntity {
    Appointment(Appointment),
    Service(Service),
    Reminder(Reminder),
}

impl SourceEntity {
    /// Returns the event kind of this entity.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Appointment(_) => EventKind::Appointment,
            Self::Service(_) => EventKind::Service,
            Self::Reminder(_) => EventKind::Reminder,
        }
    }

    /// Returns the entity id (unique only within its kind).
    pub fn id(&self) -> i64 {
        match self {
            Self::Appointment(a) => a.id,
            Self::Service(s) => s.id,
            Self::Reminder(r) => r.id,
        }
    }
}

impl From<Appointment> for SourceEntity {
    fn from(value: Appointment) -> Self {
        Self::Appointment(value)
    }
}

impl From<Service> for SourceEntity {
    fn from(value: Service) -> Self {
        Self::Service(value)
    }
}

impl From<Reminder> for SourceEntity {
    fn from(value: Reminder) -> Self {
        Self::Reminder(value)
    }
}
