//! Record filter implementations.
//!
//! Each configured facet of a board's `filter` becomes one [`RecordFilter`];
//! [`AnyOfFilter`] combines them with OR logic starting from "excluded".

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fmk_core::{AttributeStore, RecordHandle};
use futures::future::join_all;

use crate::board_config::{FilterSpec, LastUpdated, PropertyFilter};

/// Trait for deciding whether a record belongs on the board.
#[async_trait]
pub trait RecordFilter: Send + Sync {
    /// Returns true if the record should be included.
    async fn matches(&self, record: &RecordHandle, store: &dyn AttributeStore) -> bool;
}

/// Include records modified at or after a cutoff.
pub struct UpdatedSinceFilter {
    cutoff: Option<DateTime<Utc>>,
}

impl UpdatedSinceFilter {
    pub fn new(cutoff: DateTime<Utc>) -> Self {
        Self {
            cutoff: Some(cutoff),
        }
    }

    /// Cutoff relative to `now`. A shift that overflows the calendar matches nothing.
    pub fn relative(last_updated: &LastUpdated, now: DateTime<Utc>) -> Self {
        let cutoff = last_updated.cutoff(now);
        if cutoff.is_none() {
            tracing::warn!(
                "lastUpdated shift of {} {} is out of range, no record will match it",
                last_updated.amount,
                last_updated.unit
            );
        }
        Self { cutoff }
    }
}

#[async_trait]
impl RecordFilter for UpdatedSinceFilter {
    async fn matches(&self, record: &RecordHandle, _store: &dyn AttributeStore) -> bool {
        self.cutoff.is_some_and(|cutoff| record.modified >= cutoff)
    }
}

/// Include every record that carries none of the listed property values.
pub struct PropertyExclusionFilter {
    exclusions: Vec<PropertyFilter>,
}

impl PropertyExclusionFilter {
    pub fn new(exclusions: Vec<PropertyFilter>) -> Self {
        Self { exclusions }
    }

    async fn has_excluded_value(&self, record: &RecordHandle, store: &dyn AttributeStore) -> bool {
        let checks = self.exclusions.iter().map(|exclusion| async move {
            match store.read(record, &exclusion.property).await {
                Ok(value) => value == exclusion.value,
                Err(e) => {
                    tracing::warn!(
                        "Could not read '{}' of {}: {}",
                        exclusion.property,
                        record.path,
                        e
                    );
                    false
                }
            }
        });
        join_all(checks).await.into_iter().any(|hit| hit)
    }
}

#[async_trait]
impl RecordFilter for PropertyExclusionFilter {
    async fn matches(&self, record: &RecordHandle, store: &dyn AttributeStore) -> bool {
        !self.has_excluded_value(record, store).await
    }
}

/// Combine filters with OR logic.
///
/// A record matches if any filter includes it. With no filters nothing
/// matches, so a `filter` object with no facets hides every record.
pub struct AnyOfFilter {
    filters: Vec<Box<dyn RecordFilter>>,
}

impl AnyOfFilter {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: Box<dyn RecordFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// One filter per configured facet.
    pub fn from_spec(spec: &FilterSpec, now: DateTime<Utc>) -> Self {
        let mut any_of = Self::new();
        if let Some(last_updated) = &spec.last_updated {
            any_of = any_of.with_filter(Box::new(UpdatedSinceFilter::relative(last_updated, now)));
        }
        if let Some(exclusions) = &spec.property_filters {
            any_of = any_of.with_filter(Box::new(PropertyExclusionFilter::new(exclusions.clone())));
        }
        any_of
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Default for AnyOfFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordFilter for AnyOfFilter {
    async fn matches(&self, record: &RecordHandle, store: &dyn AttributeStore) -> bool {
        for filter in &self.filters {
            if filter.matches(record, store).await {
                return true;
            }
        }
        false
    }
}
