// ABOUTME: Static HTML report for comparison rows
// ABOUTME: Color-codes each table row by its status

use crate::compare::ComparisonRow;
use crate::error::Result;
use std::fmt::Write as _;
use std::path::Path;

const STYLE: &str = "\
        body { font-family: Arial; padding: 20px; }
        table { width: 100%; border-collapse: collapse; margin-top: 20px; }
        th, td { border: 1px solid #ccc; padding: 8px; text-align: center; }
        th { background-color: #f2f2f2; }
        tr:nth-child(even) { background-color: #f9f9f9; }
        .Match { background-color: #d4edda; }
        .Row_Count_Mismatch { background-color: #fff3cd; }
        .Missing_in_Source, .Missing_in_Target { background-color: #f8d7da; }";

/// Escape text for use inside HTML element content or attribute values
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render the full report page
pub fn render_html(rows: &[ComparisonRow]) -> String {
    let mut body = String::new();
    for row in rows {
        // Writing to a String cannot fail
        let _ = write!(
            body,
            "
            <tr class=\"{}\">
                <td>{}</td>
                <td>{}</td>
                <td>{}</td>
                <td>{}</td>
            </tr>",
            row.status.css_class(),
            escape_html(&row.table),
            row.source_count,
            row.target_count,
            row.status.label()
        );
    }

    format!(
        "<!DOCTYPE html>
<html>
<head>
    <meta charset=\"utf-8\">
    <title>PostgreSQL Comparison Report</title>
    <style>
{STYLE}
    </style>
</head>
<body>
    <h2>📊 PostgreSQL Table Comparison Report</h2>
    <table>
        <thead>
            <tr>
                <th>Table</th>
                <th>Source Count</th>
                <th>Target Count</th>
                <th>Status</th>
            </tr>
        </thead>
        <tbody>{body}
        </tbody>
    </table>
</body>
</html>
"
    )
}

/// Write the report page to `path`
pub fn write_html(rows: &[ComparisonRow], path: &Path) -> Result<()> {
    std::fs::write(path, render_html(rows))?;
    tracing::info!("🌐 HTML report saved to: {}", path.display());
    Ok(())
}
