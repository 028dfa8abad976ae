//! Recomputation of the calendar batch.
//!
//! [`build_batch`] is the pure pipeline: filter gate, normalizer, style
//! resolver. [`CalendarView`] owns the latest snapshot of every source and
//! rebuilds the batch lazily whenever a snapshot or the filters change.
//!
//! Fetches are tracked with [`FetchTicket`]s. Starting a new fetch for a
//! source supersedes any fetch still in flight for it: only the result of the
//! newest ticket is applied.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::entity::{Appointment, Reminder, Service, Source};
use crate::event::{CalendarEvent, EventKey};
use crate::filter::SourceFilters;
use crate::normalize::{Normalize, NormalizationError, normalize_all};
use crate::style::{StyleCategory, resolve_style};

/// The latest known state of one source collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SourceSnapshot<T> {
    /// Not fetched yet. Counts as empty.
    #[default]
    Pending,
    /// Fetched successfully.
    Loaded(Vec<T>),
    /// The fetch failed. Counts as empty.
    Failed(String),
}

impl<T> SourceSnapshot<T> {
    /// Builds a snapshot from a fetch result.
    pub fn from_result<E: fmt::Display>(result: Result<Vec<T>, E>) -> Self {
        match result {
            Ok(items) => Self::Loaded(items),
            Err(err) => Self::Failed(err.to_string()),
        }
    }

    /// The entities that take part in recomputation.
    pub fn items(&self) -> &[T] {
        match self {
            Self::Loaded(items) => items,
            Self::Pending | Self::Failed(_) => &[],
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns the failure message, if the fetch failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Everything a batch is computed from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarInputs {
    pub appointments: SourceSnapshot<Appointment>,
    pub services: SourceSnapshot<Service>,
    pub reminders: SourceSnapshot<Reminder>,
    pub filters: SourceFilters,
}

impl CalendarInputs {
    /// Creates inputs with every source pending.
    pub fn new(filters: SourceFilters) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    /// Returns the snapshot slot for `T`.
    pub fn snapshot<T: SourceRecord>(&self) -> &SourceSnapshot<T> {
        T::snapshot(self)
    }
}

/// An entity type that is fed by one source collection.
pub trait SourceRecord: Normalize + Sized {
    /// The source collection this entity comes from.
    const SOURCE: Source;

    fn snapshot(inputs: &CalendarInputs) -> &SourceSnapshot<Self>;

    fn snapshot_mut(inputs: &mut CalendarInputs) -> &mut SourceSnapshot<Self>;
}

impl SourceRecord for Appointment {
    const SOURCE: Source = Source::Appointments;

    fn snapshot(inputs: &CalendarInputs) -> &SourceSnapshot<Self> {
        &inputs.appointments
    }

    fn snapshot_mut(inputs: &mut CalendarInputs) -> &mut SourceSnapshot<Self> {
        &mut inputs.appointments
    }
}

impl SourceRecord for Service {
    const SOURCE: Source = Source::Services;

    fn snapshot(inputs: &CalendarInputs) -> &SourceSnapshot<Self> {
        &inputs.services
    }

    fn snapshot_mut(inputs: &mut CalendarInputs) -> &mut SourceSnapshot<Self> {
        &mut inputs.services
    }
}

impl SourceRecord for Reminder {
    const SOURCE: Source = Source::Reminders;

    fn snapshot(inputs: &CalendarInputs) -> &SourceSnapshot<Self> {
        &inputs.reminders
    }

    fn snapshot_mut(inputs: &mut CalendarInputs) -> &mut SourceSnapshot<Self> {
        &mut inputs.reminders
    }
}

/// What to do with entities that fail normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Log and count skipped entities.
    #[default]
    Log,
    /// Also return them in [`EventBatch::issues`] for display.
    Surface,
}

/// An event together with its style category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledEvent {
    pub event: CalendarEvent,
    pub category: StyleCategory,
}

impl StyledEvent {
    pub fn new(event: CalendarEvent) -> Self {
        let category = resolve_style(&event);
        Self { event, category }
    }

    pub fn key(&self) -> EventKey {
        self.event.key()
    }
}

/// One recomputation's output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventBatch {
    /// Events ordered by start, then kind, then id.
    pub events: Vec<StyledEvent>,
    /// Number of entities skipped by the normalizer.
    pub skipped: usize,
    /// Skipped entities, populated under [`MalformedPolicy::Surface`].
    pub issues: Vec<NormalizationError>,
}

impl EventBatch {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyledEvent> {
        self.events.iter()
    }

    /// Looks up an event by its `(kind, id)` key.
    pub fn find(&self, key: EventKey) -> Option<&StyledEvent> {
        self.events.iter().find(|e| e.key() == key)
    }

    fn absorb<T: SourceRecord>(&mut self, inputs: &CalendarInputs, policy: MalformedPolicy) {
        let source = T::SOURCE;
        if !inputs.filters.is_visible(source) {
            debug!(%source, "source hidden, skipping normalization");
            return;
        }

        let (events, errors) = normalize_all(T::snapshot(inputs).items());
        debug!(%source, events = events.len(), skipped = errors.len(), "normalized source");

        self.events.extend(events.into_iter().map(StyledEvent::new));
        self.skipped += errors.len();
        for err in errors {
            warn!(error = %err, "skipping malformed entity");
            if policy == MalformedPolicy::Surface {
                self.issues.push(err);
            }
        }
    }
}

/// Computes the styled event batch for `inputs`.
///
/// Pending and failed sources contribute nothing. Never fails: malformed
/// entities are skipped and counted.
pub fn build_batch(inputs: &CalendarInputs, policy: MalformedPolicy) -> EventBatch {
    let mut batch = EventBatch::default();
    batch.absorb::<Appointment>(inputs, policy);
    batch.absorb::<Service>(inputs, policy);
    batch.absorb::<Reminder>(inputs, policy);

    batch
        .events
        .sort_by(|a, b| (a.event.start, a.key()).cmp(&(b.event.start, b.key())));
    batch
}

/// Proof that a fetch for `T`'s source was started.
///
/// Pass it back to [`CalendarView::complete_fetch`] with the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket<T> {
    generation: u64,
    _source: PhantomData<fn() -> T>,
}

impl<T: SourceRecord> FetchTicket<T> {
    pub fn source(&self) -> Source {
        T::SOURCE
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Source snapshots plus a lazily recomputed batch.
#[derive(Debug, Default)]
pub struct CalendarView {
    inputs: CalendarInputs,
    policy: MalformedPolicy,
    issued: [u64; 3],
    revision: u64,
    cached: Option<EventBatch>,
}

impl CalendarView {
    /// Creates a view with every source pending.
    pub fn new(filters: SourceFilters, policy: MalformedPolicy) -> Self {
        Self {
            inputs: CalendarInputs::new(filters),
            policy,
            ..Self::default()
        }
    }

    pub fn inputs(&self) -> &CalendarInputs {
        &self.inputs
    }

    pub fn filters(&self) -> &SourceFilters {
        &self.inputs.filters
    }

    pub fn policy(&self) -> MalformedPolicy {
        self.policy
    }

    /// Number of changes applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replaces the filters. No-op if they are unchanged.
    pub fn set_filters(&mut self, filters: SourceFilters) {
        if self.inputs.filters != filters {
            self.inputs.filters = filters;
            self.invalidate();
        }
    }

    /// Toggles one source.
    pub fn set_visible(&mut self, source: Source, visible: bool) {
        let filters = self.inputs.filters.clone().with(source, visible);
        self.set_filters(filters);
    }

    /// Starts a fetch for `T`'s source, superseding any fetch in flight.
    pub fn begin_fetch<T: SourceRecord>(&mut self) -> FetchTicket<T> {
        let slot = &mut self.issued[T::SOURCE.index()];
        *slot += 1;
        FetchTicket {
            generation: *slot,
            _source: PhantomData,
        }
    }

    /// Applies a fetch result if `ticket` is the newest for its source.
    ///
    /// Returns `false` when the result was superseded and dropped.
    pub fn complete_fetch<T, E>(&mut self, ticket: FetchTicket<T>, result: Result<Vec<T>, E>) -> bool
    where
        T: SourceRecord,
        E: fmt::Display,
    {
        let source = T::SOURCE;
        if ticket.generation != self.issued[source.index()] {
            debug!(%source, generation = ticket.generation, "dropping superseded fetch result");
            return false;
        }

        let snapshot = SourceSnapshot::from_result(result);
        if let Some(err) = snapshot.error() {
            warn!(%source, error = %err, "fetch failed, source treated as empty");
        }
        *T::snapshot_mut(&mut self.inputs) = snapshot;
        self.invalidate();
        true
    }

    /// Replaces a snapshot directly, bypassing tickets.
    pub fn set_snapshot<T: SourceRecord>(&mut self, snapshot: SourceSnapshot<T>) {
        *T::snapshot_mut(&mut self.inputs) = snapshot;
        self.invalidate();
    }

    /// Returns the current batch, recomputing it if anything changed.
    pub fn batch(&mut self) -> &EventBatch {
        let inputs = &self.inputs;
        let policy = self.policy;
        self.cached.get_or_insert_with(|| build_batch(inputs, policy))
    }

    /// Consumes the view and returns the current batch.
    pub fn into_batch(mut self) -> EventBatch {
        match self.cached.take() {
            Some(batch) => batch,
            None => build_batch(&self.inputs, self.policy),
        }
    }

    fn invalidate(&mut self) {
        self.revision += 1;
        self.cached = None;
    }
}
