//! Chess Clock - a two-timer chess clock served over HTTP
//!
//! This is the main entry point for the chess-clock application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use chess_clock::{
    api::create_router,
    clock::SystemClock,
    config::Config,
    engine::Side,
    state::AppState,
    tasks::display_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("chess_clock={},tower_http=info", config.log_level()))
        .init();

    info!("Starting chess-clock server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms",
          config.host, config.port, config.tick_ms);

    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        Arc::new(SystemClock::new()),
        config.tick_interval(),
    ));

    // Follow both timers in the log
    let (left_rx, right_rx) = {
        let clock = state.clock.lock()
            .map_err(|e| anyhow::anyhow!("Failed to lock clock: {}", e))?;
        (clock.subscribe(Side::Left), clock.subscribe(Side::Right))
    };
    tokio::spawn(display_task(left_rx, right_rx));

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /:side/start - Start left|right, stopping the other");
    info!("  POST /:side/stop  - Stop one timer");
    info!("  POST /:side/reset - Zero one timer");
    info!("  PUT  /:side/value - Edit a stopped timer (HH:MM:SS)");
    info!("  POST /stop-all    - Stop both timers");
    info!("  POST /reset-all   - Zero both timers");
    info!("  GET  /status      - Both timers and server info");
    info!("  GET  /health      - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // No ticker may outlive the server
    if let Err(e) = state.stop_all() {
        tracing::error!("Failed to stop timers: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
