//! Batch inspection and export endpoints

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::export::render_csv;
use crate::server::state::AppState;
use crate::types::record::column_union;
use crate::types::{BatchDetail, BatchResult, BatchSummary, Row};

/// GET /api/batches - List persisted batch runs, newest first
pub async fn list_batches(State(state): State<AppState>) -> Result<Json<Vec<BatchSummary>>> {
    let runs = state.db().list_batches()?;
    Ok(Json(runs.iter().map(BatchSummary::from).collect()))
}

/// GET /api/batches/:id - One batch with its record rows
pub async fn get_batch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BatchDetail>> {
    let run = state
        .db()
        .get_batch(id)?
        .ok_or_else(|| Error::BatchNotFound(id.to_string()))?;

    let rows = batch_rows(&state, id)?;
    Ok(Json(BatchDetail {
        summary: BatchSummary::from(&run),
        columns: column_union(&rows),
        rows,
    }))
}

/// GET /api/batches/:id/csv - Batch rendered as a CSV attachment
pub async fn download_csv(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    if state.db().get_batch(id)?.is_none() {
        return Err(Error::BatchNotFound(id.to_string()));
    }

    let csv = render_csv(&batch_rows(&state, id)?)?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=result.csv".to_string(),
            ),
        ],
        csv,
    )
        .into_response())
}

/// DELETE /api/batches/:id - Remove a persisted batch run
pub async fn delete_batch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if state.db().delete_batch(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::BatchNotFound(id.to_string()))
    }
}

/// Record rows for a batch, served from the in-memory cache when available
/// and reconstructed from storage otherwise
fn batch_rows(state: &AppState, id: Uuid) -> Result<Vec<Row>> {
    if let Some(result) = state.cached_result(id) {
        return Ok(result.rows());
    }
    let records = state.db().get_records(id)?;
    Ok(BatchResult {
        records,
        skipped: 0,
    }
    .rows())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExtractionRecord;
    use std::collections::BTreeMap;

    #[test]
    fn test_batch_rows_match_record_rows() {
        let record = ExtractionRecord {
            filename: "a.pdf".to_string(),
            category: "Unclassified".to_string(),
            classification_confidence: 0,
            extracted_fields: BTreeMap::new(),
            content: "text".to_string(),
        };
        let result = BatchResult {
            records: vec![record.clone()],
            skipped: 0,
        };
        assert_eq!(result.rows(), vec![record.to_row()]);
    }
}
