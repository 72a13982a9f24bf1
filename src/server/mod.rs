pub mod api;

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::services::{DataSync, SharedDataStore, SharedHealthStats};
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: SharedDataStore,
    pub sync: Arc<DataSync>,
    pub health_stats: SharedHealthStats,
}

/// Start the axum server
pub async fn serve(
    config: &AppConfig,
    store: SharedDataStore,
    sync: Arc<DataSync>,
    health_stats: SharedHealthStats,
) -> Result<()> {
    tracing::info!("Starting stockboard server");

    let app_state = AppState {
        store,
        sync,
        health_stats,
    };

    // CORS is scoped to the configured frontend origin.
    let origin = config
        .frontend_origin
        .parse::<HeaderValue>()
        .map_err(|_| {
            AppError::Config(format!("Invalid FRONTEND_ORIGIN: {}", config.frontend_origin))
        })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any);

    tracing::info!("Registering routes:");
    tracing::info!("  GET  /symbols/{{symbol}}?interval=1day&performance=true");
    tracing::info!("  POST /symbols");
    tracing::info!("  PUT  /symbols/{{symbol}}?interval=1day");
    tracing::info!("  GET  /market");
    tracing::info!("  PUT  /market");
    tracing::info!("  GET  /symbols-list?plan=Basic");
    tracing::info!("  GET  /health");

    let app = Router::new()
        .route(
            "/symbols/{symbol}",
            get(api::get_symbol_handler).put(api::refresh_symbol_handler),
        )
        .route("/symbols", axum::routing::post(api::create_symbol_handler))
        .route(
            "/market",
            get(api::get_market_handler).put(api::refresh_market_handler),
        )
        .route("/symbols-list", get(api::list_symbols_handler))
        .route("/health", get(api::health_handler))
        .layer(cors)
        .with_state(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind {}: {}", addr, e)))?;
    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Network(format!("Server error: {}", e)))?;

    Ok(())
}
