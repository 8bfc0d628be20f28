//! Archive upload endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::pipeline::archive_digest;
use crate::server::state::AppState;
use crate::types::{BatchRun, RecordSummary, UploadResponse};

/// Archive suffix required on uploads (matched case-insensitively)
const ARCHIVE_SUFFIX: &str = ".zip";

/// POST /api/upload - Upload a ZIP archive and extract every PDF member
pub async fn upload_archive(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let start = Instant::now();

    let (source_filename, archive_bytes) = read_archive_field(&mut multipart).await?;
    tracing::info!(
        "Processing upload '{}' ({} bytes)",
        source_filename,
        archive_bytes.len()
    );

    let digest = archive_digest(&archive_bytes);
    let result = state.pipeline().aggregate(archive_bytes).await?;

    let snapshot_path = match state.snapshots().write(&result) {
        Ok(path) => Some(path),
        Err(e) => {
            // The live result is still good; a failed snapshot should not
            // fail the upload
            tracing::error!("Failed to write snapshot: {}", e);
            None
        }
    };

    let run = BatchRun::new(source_filename.as_str(), digest, &result, snapshot_path);
    state.db().insert_batch(&run, &result.records)?;

    let response = UploadResponse {
        batch_id: run.id,
        records: result.records.iter().map(RecordSummary::from).collect(),
        record_count: result.len(),
        skipped_count: result.skipped,
        columns: result.columns(),
        snapshot_path: run
            .snapshot_path
            .as_ref()
            .map(|p| p.display().to_string()),
        processing_time_ms: start.elapsed().as_millis() as u64,
    };
    state.cache_result(run.id, result);

    tracing::info!(
        "Upload '{}' complete: {} records, {} skipped in {}ms",
        source_filename,
        response.record_count,
        response.skipped_count,
        response.processing_time_ms
    );
    Ok(Json(response))
}

/// Pull the archive file field out of the multipart body.
///
/// The suffix check lives here at the web boundary; the pipeline itself
/// never re-validates the upload's extension.
async fn read_archive_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::internal(format!("Failed to read multipart field: {}", e)))?
    {
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };

        if !filename.to_lowercase().ends_with(ARCHIVE_SUFFIX) {
            return Err(Error::UnsupportedFileType(format!(
                "'{}' (expected {})",
                filename, ARCHIVE_SUFFIX
            )));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::internal(format!("Failed to read upload: {}", e)))?;
        return Ok((filename, data.to_vec()));
    }

    Err(Error::invalid_input("no archive file in upload"))
}
