//! Per-document extraction records and the batch-level result

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Category assigned when no classifier fires
pub const DEFAULT_CATEGORY: &str = "Unclassified";

/// A flat record row: field name to JSON value
pub type Row = BTreeMap<String, Value>;

/// The structured result of processing one PDF document.
///
/// Created once by the extractor and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Base name of the archive member (directory prefixes stripped)
    pub filename: String,
    /// Classification label
    pub category: String,
    /// Integer classification score
    pub classification_confidence: i64,
    /// Structured fields produced by the classifier (may be empty)
    pub extracted_fields: BTreeMap<String, String>,
    /// Full extracted text: metadata header, then one delimited section per page
    pub content: String,
}

impl ExtractionRecord {
    /// Flatten the record into a row map for tabular assembly.
    ///
    /// `extracted_fields` stays nested as a JSON object cell.
    pub fn to_row(&self) -> Row {
        let mut row = Row::new();
        row.insert("filename".to_string(), Value::from(self.filename.clone()));
        row.insert("category".to_string(), Value::from(self.category.clone()));
        row.insert(
            "classification_confidence".to_string(),
            Value::from(self.classification_confidence),
        );
        row.insert(
            "extracted_fields".to_string(),
            Value::Object(
                self.extracted_fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v.clone())))
                    .collect(),
            ),
        );
        row.insert("content".to_string(), Value::from(self.content.clone()));
        row
    }
}

/// Ordered collection of extraction records produced from one archive.
///
/// Failed documents are not represented as rows; only their count survives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Successfully extracted records, in archive-enumeration order
    pub records: Vec<ExtractionRecord>,
    /// Number of members that failed extraction and were skipped
    pub skipped: usize,
}

impl BatchResult {
    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records were produced
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Flatten all records into row maps, preserving order
    pub fn rows(&self) -> Vec<Row> {
        self.records.iter().map(ExtractionRecord::to_row).collect()
    }

    /// Alphabetically sorted union of field names across all records
    pub fn columns(&self) -> Vec<String> {
        column_union(&self.rows())
    }
}

/// Compute the sorted union of keys across a set of rows
pub fn column_union(rows: &[Row]) -> Vec<String> {
    rows.iter()
        .flat_map(|row| row.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(keys: &[&str]) -> Row {
        keys.iter()
            .map(|k| (k.to_string(), Value::from("x")))
            .collect()
    }

    #[test]
    fn test_column_union_sorted() {
        let rows = vec![row(&["a", "b"]), row(&["a", "c"])];
        assert_eq!(column_union(&rows), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_column_union_empty() {
        assert!(column_union(&[]).is_empty());
    }

    #[test]
    fn test_record_row_shape() {
        let record = ExtractionRecord {
            filename: "invoice1.pdf".to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            classification_confidence: 0,
            extracted_fields: BTreeMap::from([("total".to_string(), "42.00".to_string())]),
            content: "Hello".to_string(),
        };

        let row = record.to_row();
        assert_eq!(row["filename"], Value::from("invoice1.pdf"));
        assert_eq!(row["classification_confidence"], Value::from(0));
        assert_eq!(row["extracted_fields"]["total"], Value::from("42.00"));
        assert_eq!(row.len(), 5);
    }

    #[test]
    fn test_batch_columns() {
        let record = ExtractionRecord {
            filename: "a.pdf".to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            classification_confidence: 0,
            extracted_fields: BTreeMap::new(),
            content: String::new(),
        };
        let batch = BatchResult {
            records: vec![record],
            skipped: 0,
        };
        assert_eq!(
            batch.columns(),
            vec![
                "category",
                "classification_confidence",
                "content",
                "extracted_fields",
                "filename"
            ]
        );
    }
}
