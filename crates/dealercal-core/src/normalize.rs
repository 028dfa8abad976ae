//! Entity to [`CalendarEvent`] conversion.
//!
//! Each source has its own derivation rule:
//!
//! | source      | start         | end                                   | title                   |
//! |-------------|---------------|---------------------------------------|-------------------------|
//! | appointment | `date`        | `date + 1h`                           | `Booking: <type>`       |
//! | service     | `serviceDate` | `completionDate`, else `serviceDate + 2h` | `Service: <description>` |
//! | reminder    | `dueDate`     | `dueDate + 1h`                        | `Reminder: <title>`     |
//!
//! A record whose required date is missing or unparseable fails with a
//! [`NormalizationError`]; batch callers skip it and keep going.

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use crate::entity::{Appointment, EventKind, Reminder, Service, SourceEntity};
use crate::event::CalendarEvent;
use crate::time::{add_hours, parse_instant};

/// Length of an appointment slot.
pub const APPOINTMENT_HOURS: i64 = 1;
/// Assumed length of a service job without a completion date.
pub const SERVICE_HOURS: i64 = 2;
/// Length of a reminder slot.
pub const REMINDER_HOURS: i64 = 1;

/// Why an entity could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizationReason {
    #[error("missing {field}")]
    MissingDate { field: &'static str },
    #[error("unparseable {field} {value:?}")]
    UnparseableDate { field: &'static str, value: String },
    #[error("{field} out of range")]
    OutOfRange { field: &'static str },
    #[error("end before start")]
    EndBeforeStart,
}

/// An entity that was skipped during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("cannot normalize {entity_type} {entity_id}: {reason}")]
pub struct NormalizationError {
    pub entity_type: EventKind,
    pub entity_id: i64,
    pub reason: NormalizationReason,
}

impl NormalizationError {
    pub fn new(entity_type: EventKind, entity_id: i64, reason: NormalizationReason) -> Self {
        Self {
            entity_type,
            entity_id,
            reason,
        }
    }
}

/// Result of normalizing one entity.
pub type NormalizeResult = Result<CalendarEvent, NormalizationError>;

/// Conversion of one entity into a [`CalendarEvent`].
pub trait Normalize {
    /// Builds the event, or reports why the entity must be skipped.
    fn normalize(&self) -> NormalizeResult;
}

impl Normalize for Appointment {
    fn normalize(&self) -> NormalizeResult {
        let fail = |reason| NormalizationError::new(EventKind::Appointment, self.id, reason);

        let start = required_date("date", self.date.as_deref()).map_err(fail)?;
        let end = shifted("date", start, APPOINTMENT_HOURS).map_err(fail)?;

        Ok(CalendarEvent::new(
            format!("Booking: {}", self.appointment_type),
            start,
            end,
            SourceEntity::Appointment(self.clone()),
        ))
    }
}

impl Normalize for Service {
    fn normalize(&self) -> NormalizeResult {
        let fail = |reason| NormalizationError::new(EventKind::Service, self.id, reason);

        let start = required_date("serviceDate", self.service_date.as_deref()).map_err(fail)?;
        let completion = self
            .completion_date
            .as_deref()
            .filter(|raw| !raw.trim().is_empty());
        let end = match completion {
            Some(raw) => required_date("completionDate", Some(raw)).map_err(fail)?,
            None => shifted("serviceDate", start, SERVICE_HOURS).map_err(fail)?,
        };
        if end < start {
            return Err(fail(NormalizationReason::EndBeforeStart));
        }

        Ok(CalendarEvent::new(
            format!("Service: {}", self.description),
            start,
            end,
            SourceEntity::Service(self.clone()),
        ))
    }
}

impl Normalize for Reminder {
    fn normalize(&self) -> NormalizeResult {
        let fail = |reason| NormalizationError::new(EventKind::Reminder, self.id, reason);

        let start = required_date("dueDate", self.due_date.as_deref()).map_err(fail)?;
        let end = shifted("dueDate", start, REMINDER_HOURS).map_err(fail)?;

        Ok(CalendarEvent::new(
            format!("Reminder: {}", self.title),
            start,
            end,
            SourceEntity::Reminder(self.clone()),
        ))
    }
}

impl Normalize for SourceEntity {
    fn normalize(&self) -> NormalizeResult {
        match self {
            Self::Appointment(a) => a.normalize(),
            Self::Service(s) => s.normalize(),
            Self::Reminder(r) => r.normalize(),
        }
    }
}

/// Converts one tagged entity into a [`CalendarEvent`].
pub fn normalize(entity: &SourceEntity) -> NormalizeResult {
    entity.normalize()
}

/// Normalizes a collection, separating events from skipped entities.
///
/// Order of the input is preserved in both outputs.
pub fn normalize_all<T: Normalize>(entities: &[T]) -> (Vec<CalendarEvent>, Vec<NormalizationError>) {
    let mut events = Vec::with_capacity(entities.len());
    let mut errors = Vec::new();

    for entity in entities {
        match entity.normalize() {
            Ok(event) => events.push(event),
            Err(err) => errors.push(err),
        }
    }

    (events, errors)
}

fn required_date(
    field: &'static str,
    raw: Option<&str>,
) -> Result<NaiveDateTime, NormalizationReason> {
    let raw = match raw {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Err(NormalizationReason::MissingDate { field }),
    };
    parse_instant(raw).ok_or_else(|| NormalizationReason::UnparseableDate {
        field,
        value: raw.to_string(),
    })
}

fn shifted(
    field: &'static str,
    start: NaiveDateTime,
    hours: i64,
) -> Result<NaiveDateTime, NormalizationReason> {
    add_hours(start, hours).ok_or(NormalizationReason::OutOfRange { field })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{AppointmentStatus, AppointmentType, ServiceStatus};
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    mod appointments {
        use super::*;

        #[test]
        fn test_drive_scenario() {
            let appointment = Appointment::new(1, AppointmentType::TestDrive, "2025-06-01T10:00:00")
                .with_status(AppointmentStatus::Scheduled);

            let event = normalize(&appointment.clone().into()).unwrap();

            assert_eq!(event.id, 1);
            assert_eq!(event.title, "Booking: test_drive");
            assert_eq!(event.start, at(2025, 6, 1, 10, 0));
            assert_eq!(event.end, at(2025, 6, 1, 11, 0));
            assert_eq!(event.kind(), EventKind::Appointment);
            assert_eq!(
                event.resource.original_data(),
                &SourceEntity::Appointment(appointment)
            );
        }

        #[test]
        fn always_lasts_one_hour() {
            for date in ["2025-01-01T00:00", "2025-06-01T23:30", "2024-02-29 12:15:00"] {
                let event = Appointment::new(9, AppointmentType::Revision, date)
                    .normalize()
                    .unwrap();
                assert_eq!(event.end - event.start, chrono::Duration::hours(1), "{date}");
            }
        }

        #[test]
        fn missing_date_is_an_error() {
            let mut appointment = Appointment::new(4, AppointmentType::Maintenance, "");
            appointment.date = None;

            let err = appointment.normalize().unwrap_err();

            assert_eq!(err.entity_type, EventKind::Appointment);
            assert_eq!(err.entity_id, 4);
            assert_eq!(err.reason, NormalizationReason::MissingDate { field: "date" });
        }

        #[test]
        fn blank_date_counts_as_missing() {
            let err = Appointment::new(4, AppointmentType::Other, "  ")
                .normalize()
                .unwrap_err();
            assert_eq!(err.reason, NormalizationReason::MissingDate { field: "date" });
        }

        #[test]
        fn unparseable_date_is_an_error() {
            let err = Appointment::new(5, AppointmentType::Other, "next tuesday")
                .normalize()
                .unwrap_err();
            assert_eq!(
                err.reason,
                NormalizationReason::UnparseableDate {
                    field: "date",
                    value: "next tuesday".to_string(),
                }
            );
            assert_eq!(
                err.to_string(),
                "cannot normalize appointment 5: unparseable date \"next tuesday\""
            );
        }
    }

    mod services {
        use super::*;

        #[test]
        fn oil_change_scenario() {
            let service = Service::new(2, "Oil change", "2025-06-01T09:00")
                .with_status(ServiceStatus::InProgress);

            let event = service.normalize().unwrap();

            assert_eq!(event.title, "Service: Oil change");
            assert_eq!(event.start, at(2025, 6, 1, 9, 0));
            assert_eq!(event.end, at(2025, 6, 1, 11, 0));
            assert_eq!(event.resource.status(), Some("in_progress"));
        }

        #[test]
        fn completion_date_sets_end() {
            let event = Service::new(6, "Brakes", "2025-06-01T09:00")
                .with_completion_date("2025-06-03T17:45")
                .normalize()
                .unwrap();
            assert_eq!(event.end, at(2025, 6, 3, 17, 45));
        }

        #[test]
        fn blank_completion_date_uses_default_duration() {
            for blank in ["", "   "] {
                let event = Service::new(2, "Oil change", "2025-06-01T09:00")
                    .with_completion_date(blank)
                    .normalize()
                    .unwrap();
                assert_eq!(event.end, at(2025, 6, 1, 11, 0), "{blank:?}");
            }
        }

        #[test]
        fn completion_equal_to_start_is_allowed() {
            let event = Service::new(6, "Inspection", "2025-06-01T09:00")
                .with_completion_date("2025-06-01T09:00")
                .normalize()
                .unwrap();
            assert_eq!(event.start, event.end);
        }

        #[test]
        fn completion_before_start_is_rejected() {
            let err = Service::new(7, "Brakes", "2025-06-02T09:00")
                .with_completion_date("2025-06-01T09:00")
                .normalize()
                .unwrap_err();
            assert_eq!(err.reason, NormalizationReason::EndBeforeStart);
        }

        #[test]
        fn unparseable_completion_is_rejected() {
            let err = Service::new(8, "Brakes", "2025-06-02T09:00")
                .with_completion_date("soon")
                .normalize()
                .unwrap_err();
            assert!(matches!(
                err.reason,
                NormalizationReason::UnparseableDate { field: "completionDate", .. }
            ));
        }
    }

    mod reminders {
        use super::*;

        #[test]
        fn lasts_one_hour() {
            let event = Reminder::new(3, "Insurance renewal", "2025-06-10T00:00")
                .with_completed(true)
                .normalize()
                .unwrap();

            assert_eq!(event.title, "Reminder: Insurance renewal");
            assert_eq!(event.start, at(2025, 6, 10, 0, 0));
            assert_eq!(event.end, at(2025, 6, 10, 1, 0));
        }

        #[test]
        fn missing_due_date_names_field() {
            let mut reminder = Reminder::new(3, "Tyres", "");
            reminder.due_date = None;
            let err = reminder.normalize().unwrap_err();
            assert_eq!(err.reason, NormalizationReason::MissingDate { field: "dueDate" });
        }
    }

    mod batches {
        use super::*;

        #[test]
        fn is_idempotent() {
            let entity: SourceEntity = Service::new(2, "Oil change", "2025-06-01T09:00").into();
            assert_eq!(normalize(&entity), normalize(&entity));
        }

        #[test]
        fn skips_bad_records_and_keeps_order() {
            let mut broken = Appointment::new(2, AppointmentType::Other, "");
            broken.date = None;
            let appointments = vec![
                Appointment::new(1, AppointmentType::TestDrive, "2025-06-01T10:00"),
                broken,
                Appointment::new(3, AppointmentType::Revision, "2025-06-01T08:00"),
            ];

            let (events, errors) = normalize_all(&appointments);

            assert_eq!(events.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 3]);
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].entity_id, 2);
        }

        #[test]
        fn every_event_ends_after_start() {
            let entities: Vec<SourceEntity> = vec![
                Appointment::new(1, AppointmentType::TestDrive, "2025-06-01T10:00").into(),
                Service::new(1, "Wash", "2025-06-01T10:00").into(),
                Service::new(2, "Paint", "2025-06-01T10:00")
                    .with_completion_date("2025-06-05T10:00")
                    .into(),
                Reminder::new(1, "Tyres", "2025-06-01").into(),
            ];

            let (events, errors) = normalize_all(&entities);

            assert!(errors.is_empty());
            assert!(events.iter().all(|e| e.end >= e.start));
        }
    }
}
