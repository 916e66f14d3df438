use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use matryx_e2ee_filter::{AppState, FilterConfig, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = FilterConfig::init()
        .map_err(|e| format!("Failed to load filter configuration: {}", e))?;

    let addr: SocketAddr = std::env::var("E2EE_FILTER_BIND")
        .unwrap_or_else(|_| "127.0.0.1:8009".to_string())
        .parse()
        .map_err(|e| format!("Invalid E2EE_FILTER_BIND address: {}", e))?;

    let app_state = AppState::new(Arc::new(config.clone()));
    let app = create_router(app_state);

    tracing::info!("E2EE room filter listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to address {}: {}", addr, e))?;
    axum::serve(listener, app)
        .await
        .map_err(|e| format!("Failed to start axum server: {}", e))?;

    Ok(())
}
