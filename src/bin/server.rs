//! Extraction server binary
//!
//! Run with: cargo run --bin docintel-server

use docintel::{config::DocintelConfig, server::DocintelServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docintel=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DocintelConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Snapshot dir: {}", config.export.output_dir.display());
    tracing::info!("  - Database: {}", config.storage.database_path.display());
    tracing::info!(
        "  - Max upload: {} MB",
        config.server.max_upload_size / (1024 * 1024)
    );

    let server = DocintelServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/upload           - Upload a ZIP of PDFs");
    println!("  GET  /api/batches          - List batch runs");
    println!("  GET  /api/batches/:id      - Batch detail with rows");
    println!("  GET  /api/batches/:id/csv  - Download batch as CSV");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
