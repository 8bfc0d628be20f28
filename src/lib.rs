//! docintel: batch PDF extraction service
//!
//! Ingests a ZIP archive of PDF documents, extracts per-document text and
//! metadata into uniform tabular records, and persists each batch run for
//! later review and CSV export. Per-document failures are skipped (and
//! counted) without aborting the batch; only archive-level failure or an
//! empty result surfaces to the caller.

pub mod config;
pub mod error;
pub mod export;
pub mod extraction;
pub mod pipeline;
pub mod server;
pub mod storage;
pub mod types;

pub use config::DocintelConfig;
pub use error::{Error, Result};
pub use extraction::{ArchiveWalker, Classifier, DocumentExtractor, NoopClassifier};
pub use pipeline::BatchPipeline;
pub use types::{BatchResult, BatchRun, ExtractionRecord};
