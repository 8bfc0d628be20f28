//! SQLite database for batch runs and their extraction records
//!
//! Each upload persists one `batches` row plus one `batch_records` row per
//! extracted document, in archive order, so a later export can be rebuilt
//! from disk without rerunning extraction.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row as SqlRow};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{BatchRun, ExtractionRecord};

/// SQLite-backed store for batch runs
pub struct BatchDb {
    conn: Arc<Mutex<Connection>>,
}

impl BatchDb {
    /// Create or open the database at the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)
            .map_err(|e| Error::internal(format!("Failed to open database: {}", e)))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::internal(format!("Failed to open in-memory database: {}", e)))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Run database migrations
    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA foreign_keys=ON;
        "#,
        )
        .map_err(|e| Error::internal(format!("Failed to set pragmas: {}", e)))?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS batches (
                id TEXT PRIMARY KEY,
                source_filename TEXT NOT NULL,
                archive_hash TEXT NOT NULL,
                record_count INTEGER NOT NULL,
                skipped_count INTEGER NOT NULL DEFAULT 0,
                snapshot_path TEXT,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_batches_created_at ON batches(created_at);
            CREATE INDEX IF NOT EXISTS idx_batches_archive_hash ON batches(archive_hash);

            CREATE TABLE IF NOT EXISTS batch_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                batch_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                filename TEXT NOT NULL,
                category TEXT NOT NULL,
                classification_confidence INTEGER NOT NULL,
                extracted_fields TEXT NOT NULL,
                content TEXT NOT NULL,
                FOREIGN KEY (batch_id) REFERENCES batches(id) ON DELETE CASCADE,
                UNIQUE(batch_id, position)
            );

            CREATE INDEX IF NOT EXISTS idx_batch_records_batch_id ON batch_records(batch_id);
        "#,
        )
        .map_err(|e| Error::internal(format!("Failed to run migrations: {}", e)))?;

        tracing::info!("Database migrations complete");
        Ok(())
    }

    /// Persist a batch run and its records in one transaction
    pub fn insert_batch(&self, run: &BatchRun, records: &[ExtractionRecord]) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(|e| Error::internal(format!("Failed to start transaction: {}", e)))?;

        tx.execute(
            r#"
            INSERT INTO batches (
                id, source_filename, archive_hash, record_count, skipped_count,
                snapshot_path, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                run.id.to_string(),
                run.source_filename,
                run.archive_hash,
                run.record_count as i64,
                run.skipped_count as i64,
                run.snapshot_path.as_ref().map(|p| p.display().to_string()),
                run.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| Error::internal(format!("Failed to insert batch: {}", e)))?;

        for (position, record) in records.iter().enumerate() {
            tx.execute(
                r#"
                INSERT INTO batch_records (
                    batch_id, position, filename, category,
                    classification_confidence, extracted_fields, content
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    run.id.to_string(),
                    position as i64,
                    record.filename,
                    record.category,
                    record.classification_confidence,
                    serde_json::to_string(&record.extracted_fields)?,
                    record.content,
                ],
            )
            .map_err(|e| Error::internal(format!("Failed to insert record: {}", e)))?;
        }

        tx.commit()
            .map_err(|e| Error::internal(format!("Failed to commit batch: {}", e)))?;
        Ok(())
    }

    /// Get a batch run by id
    pub fn get_batch(&self, id: Uuid) -> Result<Option<BatchRun>> {
        let conn = self.conn.lock();

        let mut stmt = conn
            .prepare("SELECT * FROM batches WHERE id = ?1")
            .map_err(|e| Error::internal(format!("Failed to prepare query: {}", e)))?;

        let run = stmt
            .query_row(params![id.to_string()], row_to_batch_run)
            .optional()
            .map_err(|e| Error::internal(format!("Failed to get batch: {}", e)))?;

        Ok(run)
    }

    /// List all batch runs, newest first
    pub fn list_batches(&self) -> Result<Vec<BatchRun>> {
        let conn = self.conn.lock();

        let mut stmt = conn
            .prepare("SELECT * FROM batches ORDER BY created_at DESC")
            .map_err(|e| Error::internal(format!("Failed to prepare query: {}", e)))?;

        let runs = stmt
            .query_map([], row_to_batch_run)
            .map_err(|e| Error::internal(format!("Failed to list batches: {}", e)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(runs)
    }

    /// Get a batch's records in original archive order
    pub fn get_records(&self, batch_id: Uuid) -> Result<Vec<ExtractionRecord>> {
        let conn = self.conn.lock();

        let mut stmt = conn
            .prepare(
                r#"
                SELECT filename, category, classification_confidence, extracted_fields, content
                FROM batch_records WHERE batch_id = ?1 ORDER BY position ASC
                "#,
            )
            .map_err(|e| Error::internal(format!("Failed to prepare query: {}", e)))?;

        let records = stmt
            .query_map(params![batch_id.to_string()], row_to_record)
            .map_err(|e| Error::internal(format!("Failed to get records: {}", e)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(records)
    }

    /// Delete a batch run and (via cascade) its records
    pub fn delete_batch(&self, id: Uuid) -> Result<bool> {
        let conn = self.conn.lock();

        let count = conn
            .execute("DELETE FROM batches WHERE id = ?1", params![id.to_string()])
            .map_err(|e| Error::internal(format!("Failed to delete batch: {}", e)))?;

        Ok(count > 0)
    }
}

fn row_to_batch_run(row: &SqlRow<'_>) -> rusqlite::Result<BatchRun> {
    let id: String = row.get("id")?;
    let created_at: String = row.get("created_at")?;
    let snapshot_path: Option<String> = row.get("snapshot_path")?;

    Ok(BatchRun {
        id: Uuid::parse_str(&id).unwrap_or_default(),
        source_filename: row.get("source_filename")?,
        archive_hash: row.get("archive_hash")?,
        record_count: row.get::<_, i64>("record_count")? as usize,
        skipped_count: row.get::<_, i64>("skipped_count")? as usize,
        snapshot_path: snapshot_path.map(PathBuf::from),
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

fn row_to_record(row: &SqlRow<'_>) -> rusqlite::Result<ExtractionRecord> {
    let fields_json: String = row.get("extracted_fields")?;
    let extracted_fields: BTreeMap<String, String> =
        serde_json::from_str(&fields_json).unwrap_or_default();

    Ok(ExtractionRecord {
        filename: row.get("filename")?,
        category: row.get("category")?,
        classification_confidence: row.get("classification_confidence")?,
        extracted_fields,
        content: row.get("content")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BatchResult;

    fn sample_record(filename: &str) -> ExtractionRecord {
        ExtractionRecord {
            filename: filename.to_string(),
            category: "Unclassified".to_string(),
            classification_confidence: 0,
            extracted_fields: BTreeMap::from([("total".to_string(), "42.00".to_string())]),
            content: format!("content of {}", filename),
        }
    }

    fn sample_run(records: &[ExtractionRecord]) -> BatchRun {
        let result = BatchResult {
            records: records.to_vec(),
            skipped: 1,
        };
        BatchRun::new("upload.zip", "deadbeef", &result, None)
    }

    #[test]
    fn test_insert_and_get_batch() {
        let db = BatchDb::in_memory().unwrap();
        let records = vec![sample_record("a.pdf"), sample_record("b.pdf")];
        let run = sample_run(&records);

        db.insert_batch(&run, &records).unwrap();

        let fetched = db.get_batch(run.id).unwrap().unwrap();
        assert_eq!(fetched.source_filename, "upload.zip");
        assert_eq!(fetched.record_count, 2);
        assert_eq!(fetched.skipped_count, 1);
    }

    #[test]
    fn test_records_roundtrip_in_order() {
        let db = BatchDb::in_memory().unwrap();
        let records = vec![
            sample_record("zzz.pdf"),
            sample_record("aaa.pdf"),
            sample_record("mmm.pdf"),
        ];
        let run = sample_run(&records);
        db.insert_batch(&run, &records).unwrap();

        let fetched = db.get_records(run.id).unwrap();
        assert_eq!(fetched, records);
    }

    #[test]
    fn test_missing_batch_is_none() {
        let db = BatchDb::in_memory().unwrap();
        assert!(db.get_batch(Uuid::new_v4()).unwrap().is_none());
        assert!(db.get_records(Uuid::new_v4()).unwrap().is_empty());
    }

    #[test]
    fn test_list_batches_newest_first() {
        let db = BatchDb::in_memory().unwrap();

        let first = sample_run(&[]);
        let mut second = sample_run(&[]);
        second.created_at = first.created_at + chrono::Duration::seconds(10);

        db.insert_batch(&first, &[]).unwrap();
        db.insert_batch(&second, &[]).unwrap();

        let runs = db.list_batches().unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].id, second.id);
    }

    #[test]
    fn test_delete_cascades_records() {
        let db = BatchDb::in_memory().unwrap();
        let records = vec![sample_record("a.pdf")];
        let run = sample_run(&records);
        db.insert_batch(&run, &records).unwrap();

        assert!(db.delete_batch(run.id).unwrap());
        assert!(db.get_batch(run.id).unwrap().is_none());
        assert!(db.get_records(run.id).unwrap().is_empty());
        assert!(!db.delete_batch(run.id).unwrap());
    }
}
