//! Tabular export: CSV rendering and timestamped batch snapshots
//!
//! The column layout is computed at export time as the alphabetically sorted
//! union of all row keys; rows missing a column render an empty cell.

use serde_json::Value;
use std::fs;
use std::path::PathBuf;

use crate::config::ExportConfig;
use crate::error::{Error, Result};
use crate::types::record::column_union;
use crate::types::{BatchResult, Row};

/// Render rows to CSV text with a sorted union header
pub fn render_csv(rows: &[Row]) -> Result<String> {
    let columns = column_union(rows);
    let mut writer = csv::Writer::from_writer(Vec::new());

    if !columns.is_empty() {
        writer.write_record(&columns)?;
        for row in rows {
            let cells: Vec<String> = columns
                .iter()
                .map(|column| row.get(column).map(cell_text).unwrap_or_default())
                .collect();
            writer.write_record(&cells)?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::internal(format!("CSV flush failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::internal(format!("CSV not UTF-8: {}", e)))
}

/// Render a JSON value as a CSV cell: strings verbatim, everything else as
/// compact JSON (nested field mappings stay inspectable)
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Writes one timestamped CSV file per batch run, so downloads can be served
/// from disk without rerunning extraction
pub struct SnapshotWriter {
    output_dir: PathBuf,
}

impl SnapshotWriter {
    /// Create a writer targeting the configured output directory
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
        }
    }

    /// Serialize the batch result to `result_<timestamp>.csv`
    pub fn write(&self, result: &BatchResult) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = self.output_dir.join(format!("result_{}.csv", timestamp));

        let csv = render_csv(&result.rows())?;
        fs::write(&path, csv)?;

        tracing::info!(
            "Wrote snapshot of {} records to {}",
            result.len(),
            path.display()
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect()
    }

    #[test]
    fn test_union_columns_with_empty_cells() {
        let rows = vec![row(&[("a", "1"), ("b", "2")]), row(&[("a", "3"), ("c", "4")])];
        let csv = render_csv(&rows).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "a,b,c");
        assert_eq!(lines[1], "1,2,");
        assert_eq!(lines[2], "3,,4");
    }

    #[test]
    fn test_empty_rows_render_empty_output() {
        assert_eq!(render_csv(&[]).unwrap(), "");
    }

    #[test]
    fn test_nested_mapping_renders_as_json() {
        let mut r = Row::new();
        r.insert(
            "extracted_fields".to_string(),
            serde_json::json!({"total": "42.00"}),
        );
        let csv = render_csv(&[r]).unwrap();
        assert!(csv.contains(r#"{""total"":""42.00""}"#));
    }

    #[test]
    fn test_snapshot_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(&ExportConfig {
            output_dir: dir.path().to_path_buf(),
        });

        let result = BatchResult {
            records: vec![crate::types::ExtractionRecord {
                filename: "a.pdf".to_string(),
                category: "Unclassified".to_string(),
                classification_confidence: 0,
                extracted_fields: BTreeMap::new(),
                content: "text".to_string(),
            }],
            skipped: 0,
        };

        let path = writer.write(&result).unwrap();
        assert!(path.exists());
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with(
            "category,classification_confidence,content,extracted_fields,filename"
        ));
        assert!(contents.contains("a.pdf"));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("result_") && name.ends_with(".csv"));
    }
}
