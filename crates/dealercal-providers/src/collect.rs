//! The source collector.
//!
//! Fetches every visible collection concurrently and feeds the results into
//! a [`CalendarView`]. A failed fetch never aborts the refresh: the source
//! becomes a failed snapshot and contributes no events.

use std::collections::BTreeMap;

use dealercal_core::{
    Appointment, CalendarView, EventBatch, FetchTicket, MalformedPolicy, Reminder, Service,
    Source, SourceFilters,
};
use tracing::{debug, info};

use crate::api::{DealershipApi, Fetchable};
use crate::error::ProviderResult;

/// What happened to one source during a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    /// Filtered out; not requested.
    Hidden,
    /// Applied with this many records.
    Loaded(usize),
    /// Applied as a failed snapshot.
    Failed(String),
    /// A newer fetch was started before this one finished.
    Superseded,
}

/// Per-source outcomes of [`refresh_view`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    outcomes: BTreeMap<Source, SourceOutcome>,
}

impl RefreshReport {
    pub fn outcome(&self, source: Source) -> Option<&SourceOutcome> {
        self.outcomes.get(&source)
    }

    /// Sources whose fetch failed, with the error text.
    pub fn failures(&self) -> impl Iterator<Item = (Source, &str)> {
        self.outcomes.iter().filter_map(|(source, outcome)| match outcome {
            SourceOutcome::Failed(err) => Some((*source, err.as_str())),
            _ => None,
        })
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Total records received across loaded sources.
    pub fn records(&self) -> usize {
        self.outcomes
            .values()
            .map(|outcome| match outcome {
                SourceOutcome::Loaded(n) => *n,
                _ => 0,
            })
            .sum()
    }

    fn record(&mut self, source: Source, outcome: SourceOutcome) {
        self.outcomes.insert(source, outcome);
    }
}

/// Refreshes every visible source of `view` from `api`.
///
/// Hidden sources keep their current snapshot and are not requested.
pub async fn refresh_view(api: &dyn DealershipApi, view: &mut CalendarView) -> RefreshReport {
    let filters = view.filters().clone();
    let visible: Vec<Source> = filters.visible_sources().collect();
    debug!(api = api.name(), ?visible, "Refreshing sources");

    let appointments = begin::<Appointment>(view, &filters);
    let services = begin::<Service>(view, &filters);
    let reminders = begin::<Reminder>(view, &filters);

    let (appointments, services, reminders) = tokio::join!(
        fetch(api, appointments),
        fetch(api, services),
        fetch(api, reminders),
    );

    let mut report = RefreshReport::default();
    apply(view, &mut report, appointments);
    apply(view, &mut report, services);
    apply(view, &mut report, reminders);

    info!(
        records = report.records(),
        failed = report.failures().count(),
        "Refresh complete"
    );
    report
}

/// Fetches once and returns the resulting batch.
pub async fn collect_batch(
    api: &dyn DealershipApi,
    filters: SourceFilters,
    policy: MalformedPolicy,
) -> (EventBatch, RefreshReport) {
    let mut view = CalendarView::new(filters, policy);
    let report = refresh_view(api, &mut view).await;
    (view.into_batch(), report)
}

fn begin<T: Fetchable>(view: &mut CalendarView, filters: &SourceFilters) -> Option<FetchTicket<T>> {
    filters.is_visible(T::SOURCE).then(|| view.begin_fetch::<T>())
}

enum Pending<T> {
    Hidden,
    Done(FetchTicket<T>, ProviderResult<Vec<T>>),
}

async fn fetch<T: Fetchable>(api: &dyn DealershipApi, ticket: Option<FetchTicket<T>>) -> Pending<T> {
    match ticket {
        Some(ticket) => Pending::Done(ticket, T::fetch(api).await),
        None => Pending::Hidden,
    }
}

fn apply<T: Fetchable>(view: &mut CalendarView, report: &mut RefreshReport, pending: Pending<T>) {
    let source = T::SOURCE;
    let (ticket, result) = match pending {
        Pending::Hidden => {
            report.record(source, SourceOutcome::Hidden);
            return;
        }
        Pending::Done(ticket, result) => (ticket, result),
    };

    let outcome = match &result {
        Ok(records) => SourceOutcome::Loaded(records.len()),
        Err(err) => SourceOutcome::Failed(err.to_string()),
    };

    if view.complete_fetch(ticket, result) {
        report.record(source, outcome);
    } else {
        report.record(source, SourceOutcome::Superseded);
    }
}
