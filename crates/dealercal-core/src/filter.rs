//! Per-source visibility.
//!
//! [`SourceFilters`] decides which source collections take part in a batch.
//! Hidden sources are dropped before normalization, so none of their
//! entities reach the normalizer or the style resolver.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::Source;

/// Visibility flags keyed by source name.
///
/// Sources without an entry are visible. In `config.toml`:
///
/// ```toml
/// [filters]
/// services = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceFilters {
    flags: BTreeMap<Source, bool>,
}

impl SourceFilters {
    /// Creates filters with every source visible.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `source` takes part in the batch.
    pub fn is_visible(&self, source: Source) -> bool {
        self.flags.get(&source).copied().unwrap_or(true)
    }

    /// Sets the visibility of `source`.
    pub fn set(&mut self, source: Source, visible: bool) {
        self.flags.insert(source, visible);
    }

    /// Builder method to set the visibility of `source`.
    #[must_use]
    pub fn with(mut self, source: Source, visible: bool) -> Self {
        self.set(source, visible);
        self
    }

    /// Builder method to hide `source`.
    #[must_use]
    pub fn hide(self, source: Source) -> Self {
        self.with(source, false)
    }

    /// Returns the visible sources in fetch order.
    pub fn visible_sources(&self) -> impl Iterator<Item = Source> + '_ {
        Source::ALL.into_iter().filter(|s| self.is_visible(*s))
    }

    /// Overlays explicit flags from `other` on top of these filters.
    #[must_use]
    pub fn merged_with(mut self, other: &SourceFilters) -> Self {
        for (source, visible) in &other.flags {
            self.flags.insert(*source, *visible);
        }
        self
    }
}
