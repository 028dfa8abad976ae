//! Style categories for rendering.
//!
//! The category encodes business meaning (a completed reminder renders like a
//! completed service), so it is resolved here rather than in the view layer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::{ServiceStatus, SourceEntity};
use crate::event::CalendarEvent;

/// Visual category of a calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleCategory {
    AppointmentDefault,
    Completed,
    InProgress,
    ServiceDefault,
    ReminderDefault,
}

impl StyleCategory {
    pub const ALL: [StyleCategory; 5] = [
        Self::AppointmentDefault,
        Self::Completed,
        Self::InProgress,
        Self::ServiceDefault,
        Self::ReminderDefault,
    ];

    /// Returns the category name used by renderers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AppointmentDefault => "appointment-default",
            Self::Completed => "completed",
            Self::InProgress => "in-progress",
            Self::ServiceDefault => "service-default",
            Self::ReminderDefault => "reminder-default",
        }
    }
}

impl fmt::Display for StyleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps an event to its style category.
///
/// Rules, first match wins:
/// 1. appointment: `appointment-default`
/// 2. completed service: `completed`
/// 3. in-progress service: `in-progress`
/// 4. any other service: `service-default`
/// 5. completed reminder: `completed`
/// 6. any other reminder: `reminder-default`
pub fn resolve_style(event: &CalendarEvent) -> StyleCategory {
    match event.resource.original_data() {
        SourceEntity::Appointment(_) => StyleCategory::AppointmentDefault,
        SourceEntity::Service(service) => match service.status {
            ServiceStatus::Completed => StyleCategory::Completed,
            ServiceStatus::InProgress => StyleCategory::InProgress,
            _ => StyleCategory::ServiceDefault,
        },
        SourceEntity::Reminder(reminder) if reminder.is_completed => StyleCategory::Completed,
        SourceEntity::Reminder(_) => StyleCategory::ReminderDefault,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Appointment, AppointmentStatus, AppointmentType, Reminder, Service};
    use crate::normalize::Normalize;

    fn service_with(status: ServiceStatus) -> CalendarEvent {
        Service::new(2, "Oil change", "2025-06-01T09:00")
            .with_status(status)
            .normalize()
            .unwrap()
    }

    #[test]
    fn appointments_ignore_status() {
        for status in [
            AppointmentStatus::Scheduled,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
        ] {
            let event = Appointment::new(1, AppointmentType::TestDrive, "2025-06-01T10:00:00")
                .with_status(status)
                .normalize()
                .unwrap();
            assert_eq!(resolve_style(&event), StyleCategory::AppointmentDefault);
        }
    }

    #[test]
    fn service_status_drives_category() {
        assert_eq!(
            resolve_style(&service_with(ServiceStatus::Completed)),
            StyleCategory::Completed
        );
        assert_eq!(
            resolve_style(&service_with(ServiceStatus::InProgress)),
            StyleCategory::InProgress
        );
        assert_eq!(
            resolve_style(&service_with(ServiceStatus::Scheduled)),
            StyleCategory::ServiceDefault
        );
        assert_eq!(
            resolve_style(&service_with(ServiceStatus::Cancelled)),
            StyleCategory::ServiceDefault
        );
        assert_eq!(
            resolve_style(&service_with(ServiceStatus::Unknown)),
            StyleCategory::ServiceDefault
        );
    }

    #[test]
    fn completed_reminder_is_completed() {
        let event = Reminder::new(3, "Insurance renewal", "2025-06-10T00:00")
            .with_completed(true)
            .normalize()
            .unwrap();
        assert_eq!(resolve_style(&event), StyleCategory::Completed);
    }

    #[test]
    fn open_reminder_is_default() {
        let event = Reminder::new(3, "Insurance renewal", "2025-06-10T00:00")
            .normalize()
            .unwrap();
        assert_eq!(resolve_style(&event), StyleCategory::ReminderDefault);
    }

    #[test]
    fn category_names() {
        let names: Vec<_> = StyleCategory::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "appointment-default",
                "completed",
                "in-progress",
                "service-default",
                "reminder-default"
            ]
        );
        assert_eq!(
            serde_json::to_string(&StyleCategory::InProgress).unwrap(),
            "\"in-progress\""
        );
    }
}
