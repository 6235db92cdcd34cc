use chrono::{DateTime, Utc};
use fmk_core::{AttributeStore, RecordHandle, RecordSource};
use futures::future::join_all;

use super::record_filter::{AnyOfFilter, RecordFilter};
use crate::board_config::FilterSpec;

/// Records of `origin` that belong on the board, in source order.
pub async fn select_relevant(
    source: &dyn RecordSource,
    store: &dyn AttributeStore,
    origin: &str,
    filter: Option<&FilterSpec>,
) -> Vec<RecordHandle> {
    select_relevant_at(source, store, origin, filter, Utc::now()).await
}

/// [`select_relevant`] with an explicit "now" for relative date filters.
///
/// An origin that is not a collection yields no records. Per-record checks
/// run concurrently; the result keeps the listing order whatever order they
/// finish in.
pub async fn select_relevant_at(
    source: &dyn RecordSource,
    store: &dyn AttributeStore,
    origin: &str,
    filter: Option<&FilterSpec>,
    now: DateTime<Utc>,
) -> Vec<RecordHandle> {
    let records = match source.list(origin).await {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("There is no valid folder for cards at '{}': {}", origin, e);
            return Vec::new();
        }
    };

    let Some(spec) = filter else {
        return records;
    };

    let filter = AnyOfFilter::from_spec(spec, now);
    let verdicts = join_all(records.iter().map(|record| filter.matches(record, store))).await;

    let relevant: Vec<RecordHandle> = records
        .into_iter()
        .zip(verdicts)
        .filter_map(|(record, keep)| keep.then_some(record))
        .collect();
    tracing::debug!("{} relevant records in '{}'", relevant.len(), origin);
    relevant
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board_config::{LastUpdated, PropertyFilter, TimeUnit};
    use chrono::{Duration, TimeZone};
    use fmk_persistence::MemoryVault;
    use std::time::Duration as StdDuration;
    use tracing_test::traced_test;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn names(records: &[RecordHandle]) -> Vec<&str> {
        records.iter().map(|r| r.basename.as_str()).collect()
    }

    #[tokio::test]
    async fn test_no_filter_keeps_everything() {
        let vault = MemoryVault::new();
        vault.add_record("tasks", "a", now(), &[]);
        vault.add_record("tasks", "b", now() - Duration::days(400), &[]);

        let records = select_relevant_at(&vault, &vault, "tasks", None, now()).await;
        assert_eq!(names(&records), vec!["a", "b"]);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_invalid_origin_is_empty_with_diagnostic() {
        let vault = MemoryVault::new();
        let records = select_relevant_at(&vault, &vault, "missing", None, now()).await;
        assert!(records.is_empty());
        assert!(logs_contain("There is no valid folder for cards at 'missing'"));
    }

    #[tokio::test]
    async fn test_last_updated_filter() {
        let vault = MemoryVault::new();
        vault.add_record("tasks", "fresh", now() - Duration::days(1), &[]);
        vault.add_record("tasks", "stale", now() - Duration::days(8), &[]);
        vault.add_record("tasks", "today", now(), &[]);

        let spec = FilterSpec {
            last_updated: Some(LastUpdated {
                amount: -7.0,
                unit: TimeUnit::Days,
            }),
            property_filters: None,
        };
        let records = select_relevant_at(&vault, &vault, "tasks", Some(&spec), now()).await;
        assert_eq!(names(&records), vec!["fresh", "today"]);
    }

    #[tokio::test]
    async fn test_both_facets_are_a_union() {
        let vault = MemoryVault::new();
        vault.add_record(
            "tasks",
            "recent-but-excluded",
            now() - Duration::days(1),
            &[("status", "archived")],
        );
        vault.add_record(
            "tasks",
            "old-and-excluded",
            now() - Duration::days(90),
            &[("status", "archived")],
        );

        let property_only = FilterSpec {
            last_updated: None,
            property_filters: Some(vec![PropertyFilter {
                property: "status".to_string(),
                value: "archived".to_string(),
            }]),
        };
        let records =
            select_relevant_at(&vault, &vault, "tasks", Some(&property_only), now()).await;
        assert!(records.is_empty());

        let both = FilterSpec {
            last_updated: Some(LastUpdated {
                amount: -7.0,
                unit: TimeUnit::Days,
            }),
            ..property_only
        };
        let records = select_relevant_at(&vault, &vault, "tasks", Some(&both), now()).await;
        assert_eq!(names(&records), vec!["recent-but-excluded"]);
    }

    #[tokio::test]
    async fn test_order_survives_out_of_order_completion() {
        let vault = MemoryVault::new();
        let slow = vault.add_record("tasks", "slow", now(), &[("status", "todo")]);
        vault.add_record("tasks", "fast", now(), &[("status", "todo")]);
        vault.add_record("tasks", "hidden", now(), &[("status", "archived")]);
        vault.add_record("tasks", "last", now(), &[("status", "done")]);
        vault.delay_reads_for(&slow.path, StdDuration::from_millis(50));

        let spec = FilterSpec {
            last_updated: None,
            property_filters: Some(vec![PropertyFilter {
                property: "status".to_string(),
                value: "archived".to_string(),
            }]),
        };
        let records = select_relevant_at(&vault, &vault, "tasks", Some(&spec), now()).await;
        assert_eq!(names(&records), vec!["slow", "fast", "last"]);
    }
}
