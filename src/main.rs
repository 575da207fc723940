//! Breath Pacer - A guided breathing-exercise timer served over HTTP
//!
//! This is the main entry point for the breath-pacer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use breath_pacer::{
    config::Config,
    state::AppState,
    api::create_router,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("breath_pacer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting breath-pacer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, cycle_gap={}s",
          config.host, config.port, config.cycle_gap);

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), config.timing()));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /patterns        - List breathing presets");
    info!("  POST /session/start   - Start a session (preset or custom pattern)");
    info!("  POST /session/pause   - Pause the countdown");
    info!("  POST /session/resume  - Resume the countdown");
    info!("  POST /session/stop    - Stop and reset the session");
    info!("  GET  /session         - Current session snapshot");
    info!("  GET  /session/events  - Live snapshot stream (SSE)");
    info!("  GET  /stats           - Practice statistics");
    info!("  GET  /status          - Session and server status");
    info!("  GET  /health          - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            match result {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => tracing::error!("Failed to install signal handler: {}", e),
            }
        }
    }

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
