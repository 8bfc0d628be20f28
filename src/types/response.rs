//! API response types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{BatchRun, ExtractionRecord, Row};

/// Response for POST /api/upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Id of the persisted batch run
    pub batch_id: Uuid,
    /// One summary per extracted record, in archive order
    pub records: Vec<RecordSummary>,
    /// Number of records produced
    pub record_count: usize,
    /// Number of members skipped after extraction failure
    pub skipped_count: usize,
    /// Sorted union of record field names
    pub columns: Vec<String>,
    /// Where the CSV snapshot was written
    pub snapshot_path: Option<String>,
    /// Wall-clock processing time
    pub processing_time_ms: u64,
}

/// Lightweight view of one extraction record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSummary {
    pub filename: String,
    pub category: String,
    pub classification_confidence: i64,
    /// Length of the extracted content in characters
    pub content_chars: usize,
}

impl From<&ExtractionRecord> for RecordSummary {
    fn from(record: &ExtractionRecord) -> Self {
        Self {
            filename: record.filename.clone(),
            category: record.category.clone(),
            classification_confidence: record.classification_confidence,
            content_chars: record.content.chars().count(),
        }
    }
}

/// One entry in GET /api/batches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub id: Uuid,
    pub source_filename: String,
    pub record_count: usize,
    pub skipped_count: usize,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&BatchRun> for BatchSummary {
    fn from(run: &BatchRun) -> Self {
        Self {
            id: run.id,
            source_filename: run.source_filename.clone(),
            record_count: run.record_count,
            skipped_count: run.skipped_count,
            created_at: run.created_at,
        }
    }
}

/// Response for GET /api/batches/:id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchDetail {
    #[serde(flatten)]
    pub summary: BatchSummary,
    /// Sorted union of field names across the rows
    pub columns: Vec<String>,
    /// Flat record rows, in original order
    pub rows: Vec<Row>,
}
