//! Delivery Countdown - tracks an order through preparation and delivery
//! 
//! This is the main entry point for the delivery-countdown server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use delivery_countdown::{
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
        .with_env_filter(format!("delivery_countdown={},tower_http=info", config.log_level()))
        .init();

    info!("Starting delivery-countdown server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}s",
          config.host, config.port, config.tick_seconds);

    let state = Arc::new(AppState::new(config.port, config.host.clone(), config.tick_period()));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /timer        - Current countdown");
    info!("  POST /timer/start  - Start the countdown for an order");
    info!("  POST /timer/status - Record an order status change");
    info!("  POST /timer/stop   - Reset the countdown");
    info!("  GET  /health       - Health check");

    // Setup graceful shutdown
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

    state.engine.stop_timer();
    info!("Server shutdown complete");
    Ok(())
}
