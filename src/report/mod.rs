// ABOUTME: Report rendering for comparison results
// ABOUTME: Writes CSV and HTML files and formats the console summary table

pub mod console;
pub mod csv_writer;
pub mod html;

pub use console::render_table;
pub use csv_writer::write_csv;
pub use html::{render_html, write_html};

use crate::compare::ComparisonRow;
use crate::config::StatusEncoding;

/// Value of the last report column for `row`
pub(crate) fn outcome_cell(row: &ComparisonRow, encoding: StatusEncoding) -> String {
    match encoding {
        StatusEncoding::Status => row.status.label().to_string(),
        StatusEncoding::CountsMatch => row.counts_match().to_string(),
    }
}

pub(crate) fn header(encoding: StatusEncoding) -> [&'static str; 4] {
    ["table", "source_count", "target_count", encoding.column_name()]
}
