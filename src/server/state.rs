//! Application state for the extraction server

use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::DocintelConfig;
use crate::error::Result;
use crate::export::SnapshotWriter;
use crate::extraction::NoopClassifier;
use crate::pipeline::BatchPipeline;
use crate::storage::BatchDb;
use crate::types::BatchResult;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: DocintelConfig,
    /// Batch database
    db: Arc<BatchDb>,
    /// Extraction pipeline
    pipeline: BatchPipeline,
    /// CSV snapshot writer
    snapshots: SnapshotWriter,
    /// In-memory cache of recent batch results
    results: DashMap<Uuid, BatchResult>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: DocintelConfig) -> Result<Self> {
        tracing::info!("Initializing application state...");

        let db = Arc::new(BatchDb::new(&config.storage.database_path)?);
        tracing::info!(
            "Batch database at {}",
            config.storage.database_path.display()
        );

        let snapshots = SnapshotWriter::new(&config.export);
        let pipeline = BatchPipeline::new(Arc::new(NoopClassifier));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                pipeline,
                snapshots,
                results: DashMap::new(),
            }),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &DocintelConfig {
        &self.inner.config
    }

    /// Get the batch database
    pub fn db(&self) -> &BatchDb {
        &self.inner.db
    }

    /// Get the extraction pipeline
    pub fn pipeline(&self) -> &BatchPipeline {
        &self.inner.pipeline
    }

    /// Get the snapshot writer
    pub fn snapshots(&self) -> &SnapshotWriter {
        &self.inner.snapshots
    }

    /// Cache a batch result for fast detail reads
    pub fn cache_result(&self, batch_id: Uuid, result: BatchResult) {
        self.inner.results.insert(batch_id, result);
    }

    /// Look up a cached batch result
    pub fn cached_result(&self, batch_id: Uuid) -> Option<BatchResult> {
        self.inner.results.get(&batch_id).map(|r| r.clone())
    }
}
