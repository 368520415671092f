//! TaskDeck HTTP Server
//!
//! Standalone binary serving the task record store over REST.
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings (port 5000, ~/.taskdeck/tasks.db)
//! cargo run --bin taskdeck-server
//!
//! # Custom port and database path
//! TASKDECK_PORT=5001 TASKDECK_DB=/tmp/tasks.db cargo run --bin taskdeck-server
//! ```
//!
//! # Environment Variables
//!
//! - `TASKDECK_PORT`: Server port (default: 5000)
//! - `TASKDECK_DB`: Database file path (default: ~/.taskdeck/tasks.db)
//! - `CORS_ALLOW_ORIGIN`: Pin CORS to a single origin (default: any)
//! - `RUST_LOG`: Logging level (e.g. "info", "debug", "trace")

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use taskdeck_core::{SqliteTable, TaskService};

mod http_error;
mod routes;

use routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("🚀 TaskDeck HTTP Server");

    let port = env::var("TASKDECK_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(5000);

    let db_path: PathBuf = match env::var("TASKDECK_DB") {
        Ok(custom) => PathBuf::from(custom),
        Err(_) => {
            let home_dir =
                dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Failed to get home directory"))?;
            home_dir.join(".taskdeck").join("tasks.db")
        }
    };

    tracing::info!("📡 Port: {}", port);
    tracing::info!("📦 Task table: {}", db_path.display());

    let table = Arc::new(SqliteTable::new(db_path).await?);
    let service = Arc::new(TaskService::new(table));

    let app = routes::create_router(AppState { service });

    let addr = format!("127.0.0.1:{}", port);
    tracing::info!("✅ Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
