//! Maintenance task API server binary.

use std::net::SocketAddr;

use api_server::{config::Config, create_app, create_state, init_tracing};
use task_store::PgTaskStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    tracing::info!(port = config.port, "Starting maintenance task API");

    // Connect the shared pool
    let store = PgTaskStore::connect(&config.database_url, config.db_max_connections).await?;

    // Create application state
    let state = create_state(store);

    // Create application router
    let app = create_app(state);

    // Parse server address
    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(addr = %addr, "Server listening");

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
