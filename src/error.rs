//! Error types for the extraction service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, Error>;

/// Extraction service errors
///
/// Page-level extraction failures and classifier failures are absorbed inside
/// the extractor (empty page text / default classification) and never appear
/// here. Only archive-level failure and the empty-result case cross the
/// pipeline boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Empty or missing document bytes; local to one document
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Document bytes are not a parseable PDF; local to one document
    #[error("Failed to parse '{filename}': {message}")]
    ParseFailure { filename: String, message: String },

    /// Upload is not the expected archive type
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Archive bytes are not a valid ZIP container; fatal to the whole batch
    #[error("Invalid archive: {0}")]
    ArchiveFormat(String),

    /// Archive contained zero usable PDFs
    #[error("No PDF data extracted from the uploaded archive")]
    EmptyBatch,

    /// Batch run not found
    #[error("Batch not found: {0}")]
    BatchNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV rendering error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a parse failure error
    pub fn parse_failure(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseFailure {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an archive format error
    pub fn archive_format(message: impl Into<String>) -> Self {
        Self::ArchiveFormat(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::BAD_REQUEST, "config_error", msg.clone()),
            Error::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "invalid_input", msg.clone()),
            Error::ParseFailure { filename, message } => (
                StatusCode::BAD_REQUEST,
                "parse_error",
                format!("Failed to parse '{}': {}", filename, message),
            ),
            Error::UnsupportedFileType(ext) => (
                StatusCode::BAD_REQUEST,
                "unsupported_type",
                format!("Unsupported file type: {}", ext),
            ),
            Error::ArchiveFormat(msg) => (
                StatusCode::BAD_REQUEST,
                "archive_error",
                format!("Invalid archive: {}", msg),
            ),
            Error::EmptyBatch => (
                StatusCode::BAD_REQUEST,
                "empty_batch",
                "No PDF data extracted from the uploaded archive".to_string(),
            ),
            Error::BatchNotFound(id) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("Batch not found: {}", id),
            ),
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Csv(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "csv_error",
                err.to_string(),
            ),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
