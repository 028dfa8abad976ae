//! The normalized calendar event.
//!
//! This module provides:
//! - [`CalendarEvent`]: a display-ready event derived from one entity
//! - [`EventResource`]: the event's kind, status, owners and back-reference
//! - [`EventKey`]: the `(kind, id)` pair that identifies an event
//!
//! Entity ids are only unique within one source: appointment 3 and service 3
//! are different events. Anything that indexes events must use [`EventKey`].

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::entity::{EventKind, SourceEntity};

/// Identifies an event across sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EventKey {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub id: i64,
}

impl EventKey {
    pub fn new(kind: EventKind, id: i64) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

/// Metadata attached to a [`CalendarEvent`].
///
/// All fields are derived from the wrapped entity, so the kind can never
/// disagree with the back-reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResource {
    #[serde(rename = "type")]
    kind: EventKind,
    status: Option<&'static str>,
    customer_id: Option<i64>,
    vehicle_id: Option<i64>,
    original_data: SourceEntity,
}

impl EventResource {
    pub(crate) fn new(original_data: SourceEntity) -> Self {
        let (status, customer_id, vehicle_id) = match &original_data {
            SourceEntity::Appointment(a) => {
                (Some(a.status.as_str()), Some(a.customer_id), a.vehicle_id)
            }
            SourceEntity::Service(s) => {
                (Some(s.status.as_str()), Some(s.customer_id), Some(s.vehicle_id))
            }
            SourceEntity::Reminder(r) => (None, Some(r.customer_id), Some(r.vehicle_id)),
        };

        Self {
            kind: original_data.kind(),
            status,
            customer_id,
            vehicle_id,
            original_data,
        }
    }

    /// The kind of event.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The entity status in wire spelling. Reminders carry no status.
    pub fn status(&self) -> Option<&'static str> {
        self.status
    }

    pub fn customer_id(&self) -> Option<i64> {
        self.customer_id
    }

    pub fn vehicle_id(&self) -> Option<i64> {
        self.vehicle_id
    }

    /// The entity this event was built from.
    pub fn original_data(&self) -> &SourceEntity {
        &self.original_data
    }
}

/// A calendar event built from an appointment, service or reminder.
///
/// Events are rebuilt on every recomputation; two events are the same event
/// if and only if they are structurally equal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    /// Entity id, unique only within [`EventResource::kind`].
    pub id: i64,
    pub title: String,
    /// Local wall-clock start.
    pub start: NaiveDateTime,
    /// Local wall-clock end, never before `start`.
    pub end: NaiveDateTime,
    pub resource: EventResource,
}

impl CalendarEvent {
    pub(crate) fn new(
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        original_data: SourceEntity,
    ) -> Self {
        debug_assert!(end >= start, "CalendarEvent end must be >= start");
        Self {
            id: original_data.id(),
            title: title.into(),
            start,
            end,
            resource: EventResource::new(original_data),
        }
    }

    /// The kind of event.
    pub fn kind(&self) -> EventKind {
        self.resource.kind()
    }

    /// The cross-source identity of this event.
    pub fn key(&self) -> EventKey {
        EventKey::new(self.kind(), self.id)
    }

    /// Duration of the event in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Appointment, AppointmentType, Reminder, Service, ServiceStatus};
    use chrono::NaiveDate;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn resource_mirrors_appointment() {
        let appointment = Appointment::new(1, AppointmentType::TestDrive, "2025-06-01T10:00")
            .with_customer(7)
            .with_vehicle(9);
        let event = CalendarEvent::new("Booking: test_drive", at(10), at(11), appointment.into());

        assert_eq!(event.kind(), EventKind::Appointment);
        assert_eq!(event.resource.status(), Some("scheduled"));
        assert_eq!(event.resource.customer_id(), Some(7));
        assert_eq!(event.resource.vehicle_id(), Some(9));
        assert_eq!(event.duration_minutes(), 60);
    }

    #[test]
    fn reminder_has_no_status() {
        let reminder = Reminder::new(3, "Tyres", "2025-06-01T10:00");
        let event = CalendarEvent::new("Reminder: Tyres", at(10), at(11), reminder.into());

        assert_eq!(event.resource.status(), None);
        assert_eq!(event.resource.customer_id(), Some(0));
    }

    #[test]
    fn keys_distinguish_colliding_ids() {
        let service = Service::new(3, "Brakes", "2025-06-01T09:00")
            .with_status(ServiceStatus::Completed);
        let reminder = Reminder::new(3, "Tyres", "2025-06-01T10:00");

        let a = CalendarEvent::new("Service: Brakes", at(9), at(11), service.into());
        let b = CalendarEvent::new("Reminder: Tyres", at(10), at(11), reminder.into());

        assert_eq!(a.id, b.id);
        assert_ne!(a.key(), b.key());
        assert_eq!(a.key().to_string(), "service#3");
    }

    #[test]
    fn serializes_resource_in_camel_case() {
        let service = Service::new(2, "Oil change", "2025-06-01T09:00").with_owner(7, 9);
        let event = CalendarEvent::new("Service: Oil change", at(9), at(11), service.into());
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["resource"]["type"], "service");
        assert_eq!(json["resource"]["customerId"], 7);
        assert_eq!(json["resource"]["originalData"]["description"], "Oil change");
        assert_eq!(json["start"], "2025-06-01T09:00:00");
    }
}
