// ABOUTME: CSV export of comparison rows
// ABOUTME: Emits either a status label or a counts_match boolean per table

use super::{header, outcome_cell};
use crate::compare::ComparisonRow;
use crate::config::StatusEncoding;
use crate::error::Result;
use std::io::Write;
use std::path::Path;

/// Write `rows` as CSV to any writer
pub fn write_rows<W: Write>(
    writer: W,
    rows: &[ComparisonRow],
    encoding: StatusEncoding,
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    writer.write_record(header(encoding))?;
    for row in rows {
        writer.write_record([
            row.table.clone(),
            row.source_count.to_string(),
            row.target_count.to_string(),
            outcome_cell(row, encoding),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `rows` to a CSV file, replacing any existing file
pub fn write_csv(rows: &[ComparisonRow], encoding: StatusEncoding, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_rows(file, rows, encoding)?;
    tracing::info!("📁 CSV saved to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::CountValue;

    fn sample_rows() -> Vec<ComparisonRow> {
        vec![
            ComparisonRow::missing_in_target("logs", CountValue::Rows(3)),
            ComparisonRow::compared("orders", CountValue::Rows(5), CountValue::Rows(5)),
            ComparisonRow::compared("t1", CountValue::Rows(4), CountValue::Error),
        ]
    }

    fn render(encoding: StatusEncoding) -> String {
        let mut buffer = Vec::new();
        write_rows(&mut buffer, &sample_rows(), encoding).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_status_encoding() {
        assert_eq!(
            render(StatusEncoding::Status),
            "table,source_count,target_count,status\n\
             logs,3,MISSING,Missing in Target\n\
             orders,5,5,Match\n\
             t1,4,ERROR,Row Count Mismatch\n"
        );
    }

    #[test]
    fn test_counts_match_encoding() {
        assert_eq!(
            render(StatusEncoding::CountsMatch),
            "table,source_count,target_count,counts_match\n\
             logs,3,MISSING,false\n\
             orders,5,5,true\n\
             t1,4,ERROR,false\n"
        );
    }

    #[test]
    fn test_table_names_are_quoted_when_needed() {
        let rows = vec![ComparisonRow::compared(
            "odd,name",
            CountValue::Rows(1),
            CountValue::Rows(1),
        )];
        let mut buffer = Vec::new();
        write_rows(&mut buffer, &rows, StatusEncoding::Status).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("\"odd,name\",1,1,Match"));
    }

    #[test]
    fn test_write_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comparison_results.csv");

        write_csv(&sample_rows(), StatusEncoding::Status, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 4);
        assert!(contents.starts_with("table,source_count,target_count,status"));
    }
}
