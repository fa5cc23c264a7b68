// ABOUTME: Result records produced by a comparison run
// ABOUTME: Row counts with MISSING/ERROR sentinels, statuses, and summaries

use std::fmt;

/// Row count for one side of a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountValue {
    Rows(i64),
    /// Table does not exist on this side
    Missing,
    /// Count query failed
    Error,
}

impl fmt::Display for CountValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountValue::Rows(n) => write!(f, "{}", n),
            CountValue::Missing => write!(f, "MISSING"),
            CountValue::Error => write!(f, "ERROR"),
        }
    }
}

/// Outcome for one table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableStatus {
    Match,
    RowCountMismatch,
    MissingInSource,
    MissingInTarget,
}

impl TableStatus {
    /// Status of a table present on both sides
    ///
    /// Only two equal integer counts match; an `Error` count never does.
    pub fn for_counts(source: CountValue, target: CountValue) -> Self {
        match (source, target) {
            (CountValue::Rows(s), CountValue::Rows(t)) if s == t => TableStatus::Match,
            _ => TableStatus::RowCountMismatch,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TableStatus::Match => "Match",
            TableStatus::RowCountMismatch => "Row Count Mismatch",
            TableStatus::MissingInSource => "Missing in Source",
            TableStatus::MissingInTarget => "Missing in Target",
        }
    }

    /// CSS class used by the HTML report
    pub fn css_class(&self) -> &'static str {
        match self {
            TableStatus::Match => "Match",
            TableStatus::RowCountMismatch => "Row_Count_Mismatch",
            TableStatus::MissingInSource => "Missing_in_Source",
            TableStatus::MissingInTarget => "Missing_in_Target",
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One output record per compared table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRow {
    pub table: String,
    pub source_count: CountValue,
    pub target_count: CountValue,
    pub status: TableStatus,
}

impl ComparisonRow {
    pub fn missing_in_target(table: impl Into<String>, source_count: CountValue) -> Self {
        Self {
            table: table.into(),
            source_count,
            target_count: CountValue::Missing,
            status: TableStatus::MissingInTarget,
        }
    }

    pub fn missing_in_source(table: impl Into<String>, target_count: CountValue) -> Self {
        Self {
            table: table.into(),
            source_count: CountValue::Missing,
            target_count,
            status: TableStatus::MissingInSource,
        }
    }

    pub fn compared(
        table: impl Into<String>,
        source_count: CountValue,
        target_count: CountValue,
    ) -> Self {
        Self {
            table: table.into(),
            source_count,
            target_count,
            status: TableStatus::for_counts(source_count, target_count),
        }
    }

    /// Boolean form of the status used by the `counts_match` report column
    pub fn counts_match(&self) -> bool {
        self.status == TableStatus::Match
    }

    pub fn has_error(&self) -> bool {
        self.source_count == CountValue::Error || self.target_count == CountValue::Error
    }
}

/// Tally of comparison outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComparisonSummary {
    pub total: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub missing_in_source: usize,
    pub missing_in_target: usize,
    /// Rows with at least one failed count
    pub errors: usize,
}

impl ComparisonSummary {
    pub fn from_rows(rows: &[ComparisonRow]) -> Self {
        let mut summary = Self {
            total: rows.len(),
            ..Self::default()
        };
        for row in rows {
            match row.status {
                TableStatus::Match => summary.matches += 1,
                TableStatus::RowCountMismatch => summary.mismatches += 1,
                TableStatus::MissingInSource => summary.missing_in_source += 1,
                TableStatus::MissingInTarget => summary.missing_in_target += 1,
            }
            if row.has_error() {
                summary.errors += 1;
            }
        }
        summary
    }

    pub fn all_match(&self) -> bool {
        self.matches == self.total
    }
}
