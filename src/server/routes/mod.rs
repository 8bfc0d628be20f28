//! API routes for the extraction server

pub mod batches;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Archive upload - with larger body limit
        .route(
            "/upload",
            post(upload::upload_archive).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Batch management
        .route("/batches", get(batches::list_batches))
        .route("/batches/:id", get(batches::get_batch))
        .route("/batches/:id", delete(batches::delete_batch))
        .route("/batches/:id/csv", get(batches::download_csv))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "docintel",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Batch PDF extraction from uploaded ZIP archives",
        "endpoints": {
            "POST /api/upload": "Upload a ZIP of PDFs and extract all members",
            "GET /api/batches": "List persisted batch runs",
            "GET /api/batches/:id": "Get one batch with its record rows",
            "GET /api/batches/:id/csv": "Download a batch as CSV",
            "DELETE /api/batches/:id": "Delete a batch run"
        }
    }))
}
