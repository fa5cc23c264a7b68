// ABOUTME: Console summary table for comparison rows

use super::{header, outcome_cell};
use crate::compare::ComparisonRow;
use crate::config::StatusEncoding;
use comfy_table::Table;

/// Format `rows` as a bordered grid
pub fn render_table(rows: &[ComparisonRow], encoding: StatusEncoding) -> String {
    let mut table = Table::new();
    table.set_header(header(encoding).to_vec());

    for row in rows {
        table.add_row(vec![
            row.table.clone(),
            row.source_count.to_string(),
            row.target_count.to_string(),
            outcome_cell(row, encoding),
        ]);
    }

    table.to_string()
}
