//! Persisted batch run metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::types::BatchResult;

/// One persisted batch execution: the metadata surrounding a `BatchResult`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRun {
    /// Unique run id
    pub id: Uuid,
    /// Original filename of the uploaded archive (diagnostics only)
    pub source_filename: String,
    /// Hex SHA-256 of the archive bytes
    pub archive_hash: String,
    /// Number of records produced
    pub record_count: usize,
    /// Number of members that failed extraction and were skipped
    pub skipped_count: usize,
    /// Path of the timestamped CSV snapshot, if one was written
    pub snapshot_path: Option<PathBuf>,
    /// Run timestamp
    pub created_at: DateTime<Utc>,
}

impl BatchRun {
    /// Build run metadata for a freshly aggregated result
    pub fn new(
        source_filename: impl Into<String>,
        archive_hash: impl Into<String>,
        result: &BatchResult,
        snapshot_path: Option<PathBuf>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_filename: source_filename.into(),
            archive_hash: archive_hash.into(),
            record_count: result.len(),
            skipped_count: result.skipped,
            snapshot_path,
            created_at: Utc::now(),
        }
    }
}
