// ABOUTME: Row-count reconciliation over a table partition
// ABOUTME: Counts tables one at a time and records failures as ERROR instead of aborting

use super::partition::TablePartition;
use super::types::{ComparisonRow, CountValue};
use crate::error::Result;
use indicatif::ProgressBar;
use std::collections::BTreeSet;
use std::future::Future;

/// Something that can count the rows of a table on one side of the comparison
pub trait RowCounter {
    /// Name used in log messages for `table`
    fn qualified_name(&self, table: &str) -> String {
        table.to_string()
    }

    fn count_rows(&self, table: &str) -> impl Future<Output = Result<i64>>;
}

/// Compares row counts for every table in a [`TablePartition`]
///
/// Output order is source-only tables, then target-only tables, then common
/// tables, each group sorted by name. Counts are fetched sequentially in that
/// same order. A failed count becomes [`CountValue::Error`] and the run goes on.
pub struct Reconciler<'a, S, T> {
    source: &'a S,
    target: &'a T,
    progress: ProgressBar,
}

impl<'a, S: RowCounter, T: RowCounter> Reconciler<'a, S, T> {
    pub fn new(source: &'a S, target: &'a T) -> Self {
        Self {
            source,
            target,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report per-table progress on the given bar
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub async fn reconcile(&self, partition: &TablePartition) -> Vec<ComparisonRow> {
        let mut rows = Vec::with_capacity(partition.len());
        self.progress.set_length(partition.len() as u64);

        for table in &partition.only_source {
            let count = fetch_count(self.source, table).await;
            rows.push(ComparisonRow::missing_in_target(table.as_str(), count));
            self.advance(table);
        }

        for table in &partition.only_target {
            let count = fetch_count(self.target, table).await;
            rows.push(ComparisonRow::missing_in_source(table.as_str(), count));
            self.advance(table);
        }

        for table in &partition.common {
            tracing::debug!("Comparing table: {}", table);
            let source_count = fetch_count(self.source, table).await;
            let target_count = fetch_count(self.target, table).await;
            let row = ComparisonRow::compared(table.as_str(), source_count, target_count);
            tracing::info!(
                "{}: Source={}, Target={} → {}",
                table,
                row.source_count,
                row.target_count,
                row.status
            );
            rows.push(row);
            self.advance(table);
        }

        self.progress.finish_with_message("Comparison complete");
        rows
    }

    fn advance(&self, table: &str) {
        self.progress.inc(1);
        self.progress.set_message(format!("Counted {}", table));
    }
}

async fn fetch_count<C: RowCounter>(counter: &C, table: &str) -> CountValue {
    match counter.count_rows(table).await {
        Ok(count) => CountValue::Rows(count),
        Err(e) => {
            tracing::warn!(
                "⚠ Could not count rows in {}: {}",
                counter.qualified_name(table),
                e
            );
            CountValue::Error
        }
    }
}

/// Partition both table lists and reconcile them in one step
pub async fn reconcile<S, T>(
    source_tables: &[String],
    target_tables: &[String],
    exclusions: &BTreeSet<String>,
    source: &S,
    target: &T,
) -> Vec<ComparisonRow>
where
    S: RowCounter,
    T: RowCounter,
{
    let partition = TablePartition::new(
        source_tables.iter().cloned(),
        target_tables.iter().cloned(),
        exclusions,
    );
    Reconciler::new(source, target).reconcile(&partition).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::types::TableStatus;
    use crate::error::CompareError;
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};

    /// In-memory counter that records the order of count requests
    #[derive(Default)]
    struct FakeCounter {
        counts: HashMap<String, i64>,
        failing: HashSet<String>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeCounter {
        fn with_counts(counts: &[(&str, i64)]) -> Self {
            Self {
                counts: counts
                    .iter()
                    .map(|(name, n)| (name.to_string(), *n))
                    .collect(),
                ..Self::default()
            }
        }

        fn failing_on(mut self, table: &str) -> Self {
            self.failing.insert(table.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl RowCounter for FakeCounter {
        async fn count_rows(&self, table: &str) -> Result<i64> {
            self.calls.borrow_mut().push(table.to_string());
            if self.failing.contains(table) {
                return Err(CompareError::Config(format!(
                    "relation \"{}\" does not exist",
                    table
                )));
            }
            Ok(self.counts.get(table).copied().unwrap_or(0))
        }
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn table_names(rows: &[ComparisonRow]) -> Vec<&str> {
        rows.iter().map(|r| r.table.as_str()).collect()
    }

    #[tokio::test]
    async fn test_missing_table_and_matches_in_order() {
        let source = FakeCounter::with_counts(&[("users", 10), ("orders", 5), ("logs", 7)]);
        let target = FakeCounter::with_counts(&[("users", 10), ("orders", 5)]);

        let rows = reconcile(
            &names(&["users", "orders", "logs"]),
            &names(&["users", "orders"]),
            &BTreeSet::new(),
            &source,
            &target,
        )
        .await;

        assert_eq!(
            rows,
            vec![
                ComparisonRow {
                    table: "logs".to_string(),
                    source_count: CountValue::Rows(7),
                    target_count: CountValue::Missing,
                    status: TableStatus::MissingInTarget,
                },
                ComparisonRow {
                    table: "orders".to_string(),
                    source_count: CountValue::Rows(5),
                    target_count: CountValue::Rows(5),
                    status: TableStatus::Match,
                },
                ComparisonRow {
                    table: "users".to_string(),
                    source_count: CountValue::Rows(10),
                    target_count: CountValue::Rows(10),
                    status: TableStatus::Match,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_row_count_mismatch() {
        let source = FakeCounter::with_counts(&[("t1", 100)]);
        let target = FakeCounter::with_counts(&[("t1", 99)]);

        let rows = reconcile(&names(&["t1"]), &names(&["t1"]), &BTreeSet::new(), &source, &target)
            .await;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, TableStatus::RowCountMismatch);
        assert_eq!(rows[0].source_count, CountValue::Rows(100));
        assert_eq!(rows[0].target_count, CountValue::Rows(99));
    }

    #[tokio::test]
    async fn test_count_failure_is_recorded_and_run_continues() {
        let source = FakeCounter::with_counts(&[("a", 1), ("t1", 4), ("z", 2)]);
        let target = FakeCounter::with_counts(&[("a", 1), ("t1", 4), ("z", 2)]).failing_on("t1");

        let rows = reconcile(
            &names(&["a", "t1", "z"]),
            &names(&["a", "t1", "z"]),
            &BTreeSet::new(),
            &source,
            &target,
        )
        .await;

        assert_eq!(table_names(&rows), vec!["a", "t1", "z"]);
        assert_eq!(rows[1].source_count, CountValue::Rows(4));
        assert_eq!(rows[1].target_count, CountValue::Error);
        assert_eq!(rows[1].status, TableStatus::RowCountMismatch);
        assert_eq!(rows[0].status, TableStatus::Match);
        assert_eq!(rows[2].status, TableStatus::Match);
    }

    #[tokio::test]
    async fn test_errors_on_both_sides_never_match() {
        let source = FakeCounter::default().failing_on("t1");
        let target = FakeCounter::default().failing_on("t1");

        let rows = reconcile(&names(&["t1"]), &names(&["t1"]), &BTreeSet::new(), &source, &target)
            .await;

        assert_eq!(rows[0].source_count, CountValue::Error);
        assert_eq!(rows[0].target_count, CountValue::Error);
        assert_eq!(rows[0].status, TableStatus::RowCountMismatch);
    }

    #[tokio::test]
    async fn test_failure_on_missing_table_count() {
        let source = FakeCounter::default().failing_on("only_here");
        let target = FakeCounter::default();

        let rows = reconcile(
            &names(&["only_here"]),
            &[],
            &BTreeSet::new(),
            &source,
            &target,
        )
        .await;

        assert_eq!(rows[0].source_count, CountValue::Error);
        assert_eq!(rows[0].target_count, CountValue::Missing);
        assert_eq!(rows[0].status, TableStatus::MissingInTarget);
    }

    #[tokio::test]
    async fn test_excluded_table_never_appears() {
        let source = FakeCounter::default();
        let target = FakeCounter::default();
        let exclusions: BTreeSet<String> = ["audit_log".to_string()].into_iter().collect();

        let rows = reconcile(
            &names(&["audit_log", "users"]),
            &names(&["audit_log", "users"]),
            &exclusions,
            &source,
            &target,
        )
        .await;

        assert_eq!(table_names(&rows), vec!["users"]);
        assert!(!source.calls().contains(&"audit_log".to_string()));
        assert!(!target.calls().contains(&"audit_log".to_string()));
    }

    #[tokio::test]
    async fn test_groups_are_ordered_and_counted_sequentially() {
        let source = FakeCounter::default();
        let target = FakeCounter::default();

        let rows = reconcile(
            &names(&["m", "b_src", "a", "z_src", "c"]),
            &names(&["c", "y_tgt", "a", "m", "x_tgt"]),
            &BTreeSet::new(),
            &source,
            &target,
        )
        .await;

        assert_eq!(
            table_names(&rows),
            vec!["b_src", "z_src", "x_tgt", "y_tgt", "a", "c", "m"]
        );
        assert_eq!(source.calls(), names(&["b_src", "z_src", "a", "c", "m"]));
        assert_eq!(target.calls(), names(&["x_tgt", "y_tgt", "a", "c", "m"]));
    }

    #[tokio::test]
    async fn test_row_invariants_over_generated_inputs() {
        let pool = ["alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta"];

        for seed in 0u32..64 {
            // Bits 0-7 place tables in source, bits 8-15 in target
            let mask = seed.wrapping_mul(2_654_435_761);
            let source_tables: Vec<String> = pool
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1u32 << i) != 0)
                .map(|(_, t)| t.to_string())
                .collect();
            let target_tables: Vec<String> = pool
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1u32 << (i + 8)) != 0)
                .map(|(_, t)| t.to_string())
                .collect();
            let exclusions: BTreeSet<String> = pool
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1u32 << (i + 16)) != 0 && seed % 3 == 0)
                .map(|(_, t)| t.to_string())
                .collect();

            let source = FakeCounter::with_counts(&[("alpha", 1), ("beta", 2), ("gamma", 3)])
                .failing_on("delta");
            let target = FakeCounter::with_counts(&[("alpha", 1), ("beta", 5), ("gamma", 3)]);

            let rows =
                reconcile(&source_tables, &target_tables, &exclusions, &source, &target).await;

            let expected: BTreeSet<String> = source_tables
                .iter()
                .chain(target_tables.iter())
                .filter(|t| !exclusions.contains(*t))
                .cloned()
                .collect();
            let seen: Vec<String> = rows.iter().map(|r| r.table.clone()).collect();
            let seen_set: BTreeSet<String> = seen.iter().cloned().collect();
            assert_eq!(seen.len(), seen_set.len(), "duplicate rows for seed {}", seed);
            assert_eq!(seen_set, expected, "row set differs for seed {}", seed);

            for row in &rows {
                assert!(!exclusions.contains(&row.table));
                match row.status {
                    TableStatus::Match => {
                        assert!(matches!(row.source_count, CountValue::Rows(_)));
                        assert_eq!(row.source_count, row.target_count);
                    }
                    TableStatus::RowCountMismatch => {
                        assert!(row.source_count != row.target_count || row.has_error());
                    }
                    TableStatus::MissingInTarget => {
                        assert_eq!(row.target_count, CountValue::Missing);
                        assert!(!target_tables.contains(&row.table));
                    }
                    TableStatus::MissingInSource => {
                        assert_eq!(row.source_count, CountValue::Missing);
                        assert!(!source_tables.contains(&row.table));
                    }
                }
            }

            for status in [
                TableStatus::MissingInTarget,
                TableStatus::MissingInSource,
            ] {
                let block: Vec<&str> = rows
                    .iter()
                    .filter(|r| r.status == status)
                    .map(|r| r.table.as_str())
                    .collect();
                assert!(block.windows(2).all(|w| w[0] < w[1]));
            }
            let common: Vec<&str> = rows
                .iter()
                .filter(|r| {
                    matches!(r.status, TableStatus::Match | TableStatus::RowCountMismatch)
                })
                .map(|r| r.table.as_str())
                .collect();
            assert!(common.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[tokio::test]
    async fn test_disjoint_sets_yield_one_row_per_table() {
        let source = FakeCounter::default();
        let target = FakeCounter::default();

        let rows = reconcile(
            &names(&["a", "b"]),
            &names(&["c", "d", "e"]),
            &BTreeSet::new(),
            &source,
            &target,
        )
        .await;

        assert_eq!(rows.len(), 5);
        assert!(rows[..2]
            .iter()
            .all(|r| r.status == TableStatus::MissingInTarget));
        assert!(rows[2..]
            .iter()
            .all(|r| r.status == TableStatus::MissingInSource));
    }
}
