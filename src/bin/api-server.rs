//! TradeLens API Server
//!
//! HTTP API for support/resistance level computation, proximity checks and
//! on-demand scans. This service is stateless and can be horizontally
//! scaled; scheduled scans run as a separate process.

use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use tradelens::core::http::start_server;
use tradelens::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    // Initialize logging based on environment
    logging::init_logging();

    let port = tradelens::config::get_port();
    let env = tradelens::config::get_environment();
    info!("Starting TradeLens API Server");
    info!(environment = %env, "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port).await {
            error!(error = %e, "HTTP server error");
        }
    });

    // Graceful shutdown
    info!("API server started, waiting for shutdown signal...");
    info!("Note: scheduled scans run as separate process. Use 'cargo run --bin scanner' to start them.");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
            info!("API server stopped");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
