//! Batch aggregation: drive the walker, extract each member, collect records
//!
//! Processing is strictly sequential: one member at a time, one page at a
//! time, with a cooperative yield between members so a large batch does not
//! monopolize the runtime. There are no retries; a failed document is counted
//! and skipped, and only archive-level failure or an empty result reaches the
//! caller.

use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::extraction::{ArchiveWalker, Classifier, DocumentExtractor};
use crate::types::BatchResult;

/// Sequential extraction pipeline over one archive
pub struct BatchPipeline {
    extractor: DocumentExtractor,
}

impl Default for BatchPipeline {
    fn default() -> Self {
        Self {
            extractor: DocumentExtractor::default(),
        }
    }
}

impl BatchPipeline {
    /// Create a pipeline whose extractor uses the given classifier
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            extractor: DocumentExtractor::new(classifier),
        }
    }

    /// Process every PDF member of the archive into a `BatchResult`.
    ///
    /// Records appear in archive-enumeration order. Members that fail
    /// extraction are skipped and counted, never represented as rows.
    /// An invalid container fails with `ArchiveFormat`; a batch that yields
    /// zero records fails with `EmptyBatch` so callers can distinguish
    /// "nothing extracted" from "bad file".
    pub async fn aggregate(&self, archive_bytes: Vec<u8>) -> Result<BatchResult> {
        let mut walker = ArchiveWalker::open(archive_bytes)?;
        tracing::info!("Walking archive with {} members", walker.member_count());

        let mut records = Vec::new();
        let mut skipped = 0usize;

        while let Some(member) = walker.next_pdf()? {
            match self.extractor.extract(&member.data, &member.name) {
                Ok(record) => records.push(record),
                Err(e) => {
                    skipped += 1;
                    tracing::warn!("Skipping member '{}': {}", member.name, e);
                }
            }
            // Don't starve the runtime between members
            tokio::task::yield_now().await;
        }

        if records.is_empty() {
            tracing::info!("Batch produced no records ({} members skipped)", skipped);
            return Err(Error::EmptyBatch);
        }

        tracing::info!(
            "Batch complete: {} records, {} skipped",
            records.len(),
            skipped
        );
        Ok(BatchResult { records, skipped })
    }
}

/// Hex SHA-256 digest of the raw archive bytes
pub fn archive_digest(archive_bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(archive_bytes);
    hex::encode(hasher.finalize())
}
