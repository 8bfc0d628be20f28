//! Core types for the extraction service

pub mod batch_run;
pub mod record;
pub mod response;

pub use batch_run::BatchRun;
pub use record::{BatchResult, ExtractionRecord, Row, DEFAULT_CATEGORY};
pub use response::{BatchDetail, BatchSummary, RecordSummary, UploadResponse};
