// ABOUTME: Table reconciliation between a source and a target schema
// ABOUTME: Partitions table names and compares row counts per table

pub mod partition;
pub mod reconcile;
pub mod types;

pub use partition::{parse_exclusions, TablePartition};
pub use reconcile::{reconcile, Reconciler, RowCounter};
pub use types::{ComparisonRow, ComparisonSummary, CountValue, TableStatus};
