// ABOUTME: Splits two table-name lists into source-only, target-only, and common sets
// ABOUTME: Applies operator exclusions and keeps every set in lexicographic order

use std::collections::BTreeSet;

/// Parse a comma-separated exclusion list, ignoring blanks
pub fn parse_exclusions(input: &str) -> BTreeSet<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Three-way split of table names after exclusions
///
/// Names are compared case-sensitively. `BTreeSet` keeps each set sorted, which
/// fixes the order in which tables are counted and reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TablePartition {
    pub only_source: BTreeSet<String>,
    pub only_target: BTreeSet<String>,
    pub common: BTreeSet<String>,
}

impl TablePartition {
    pub fn new<S, T>(source: S, target: T, exclusions: &BTreeSet<String>) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        let source: BTreeSet<String> = source
            .into_iter()
            .map(Into::into)
            .filter(|name| !exclusions.contains(name))
            .collect();
        let target: BTreeSet<String> = target
            .into_iter()
            .map(Into::into)
            .filter(|name| !exclusions.contains(name))
            .collect();

        Self {
            only_source: source.difference(&target).cloned().collect(),
            only_target: target.difference(&source).cloned().collect(),
            common: source.intersection(&target).cloned().collect(),
        }
    }

    /// Number of tables that will appear in the output
    pub fn len(&self) -> usize {
        self.only_source.len() + self.only_target.len() + self.common.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
