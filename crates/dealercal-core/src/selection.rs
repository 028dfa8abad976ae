//! Selection of a rendered event.
//!
//! [`dispatch_selection`] turns the selected [`CalendarEvent`] into a
//! [`SelectionNotice`] and hands it to a [`SelectionNotifier`].

use std::fmt;

use serde::Serialize;

use crate::entity::EventKind;
use crate::event::{CalendarEvent, EventKey};

/// Payload shown to the user when an event is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionNotice {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub id: i64,
}

impl SelectionNotice {
    /// Builds the notice for an event.
    pub fn from_event(event: &CalendarEvent) -> Self {
        Self {
            title: event.title.clone(),
            kind: event.kind(),
            id: event.id,
        }
    }

    /// The key of the selected event.
    pub fn key(&self) -> EventKey {
        EventKey::new(self.kind, self.id)
    }
}

impl fmt::Display for SelectionNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} #{})", self.title, self.kind, self.id)
    }
}

/// Receives selection notices.
///
/// Any `FnMut(SelectionNotice)` closure is a notifier.
pub trait SelectionNotifier {
    fn notify(&mut self, notice: SelectionNotice);
}

impl<F> SelectionNotifier for F
where
    F: FnMut(SelectionNotice),
{
    fn notify(&mut self, notice: SelectionNotice) {
        (self)(notice)
    }
}

/// Sends the notice for `event` to `notifier`, exactly once.
pub fn dispatch_selection<N>(event: &CalendarEvent, notifier: &mut N)
where
    N: SelectionNotifier + ?Sized,
{
    let notice = SelectionNotice::from_event(event);
    tracing::debug!(key = %notice.key(), "dispatching selection");
    notifier.notify(notice);
}
