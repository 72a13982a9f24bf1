use crate::error::AppError;
use crate::models::{Interval, MarketSession, PriceSeries, StatsResult};
use crate::server::AppState;
use crate::services::{chart, stock_stats, RefreshOutcome};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// Symbol payload: chart-ready data plus derived statistics.
#[derive(Debug, Serialize)]
pub struct SymbolPayload {
    pub symbol: String,
    pub data: Vec<(i64, f64)>,
    pub stats: StatsResult,
    pub status: &'static str,
}

impl SymbolPayload {
    fn from_series(series: &PriceSeries, performance: bool) -> Self {
        Self {
            symbol: series.symbol.clone(),
            data: chart::to_chart_points(Some(series), performance),
            stats: stock_stats::evaluate_stats(series, &series.symbol),
            status: "ok",
        }
    }
}

/// Uniform error body: {status: "error", code, message}.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub code: u16,
    pub message: String,
}

impl ErrorBody {
    fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            status: "error",
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (http_status, body) = match self {
            AppError::Upstream { code, message } => {
                (StatusCode::BAD_GATEWAY, ErrorBody::new(code, message))
            }
            AppError::DataShape(message) => (StatusCode::BAD_GATEWAY, ErrorBody::new(500, message)),
            AppError::Network(message) => (StatusCode::BAD_GATEWAY, ErrorBody::new(500, message)),
            AppError::InvalidInput(message) => {
                (StatusCode::BAD_REQUEST, ErrorBody::new(400, message))
            }
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new(500, other.to_string()),
            ),
        };

        warn!(code = body.code, message = %body.message, "Request failed");
        (http_status, Json(body)).into_response()
    }
}

/// Query parameters shared by the symbol endpoints.
#[derive(Debug, Deserialize)]
pub struct SymbolQuery {
    /// Interval: 1day (default), or any of the supported set.
    pub interval: Option<String>,
    /// Rebase values to percent-of-first-value.
    #[serde(default)]
    pub performance: bool,
}

fn parse_interval(raw: &Option<String>) -> Result<Interval, AppError> {
    match raw {
        Some(raw) => raw.parse(),
        None => Ok(Interval::default()),
    }
}

/// GET /symbols/{symbol} - serve cached data with stats, 204 when absent.
#[instrument(skip(app_state))]
pub async fn get_symbol_handler(
    State(app_state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<SymbolQuery>,
) -> Response {
    let interval = match parse_interval(&params.interval) {
        Ok(interval) => interval,
        Err(err) => return err.into_response(),
    };

    match app_state.store.get(&symbol, interval).await {
        Some(series) => {
            info!(%symbol, %interval, points = series.points.len(), "Serving cached series");
            Json(SymbolPayload::from_series(&series, params.performance)).into_response()
        }
        None => {
            debug!(%symbol, %interval, "No cached series");
            StatusCode::NO_CONTENT.into_response()
        }
    }
}

/// PUT /symbols/{symbol} - freshness flow. 200 with the new payload when
/// refreshed, 304 when fresh or withheld, 204 when nothing is cached,
/// 409 when stale without a session record.
#[instrument(skip(app_state))]
pub async fn refresh_symbol_handler(
    State(app_state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<SymbolQuery>,
) -> Response {
    let interval = match parse_interval(&params.interval) {
        Ok(interval) => interval,
        Err(err) => return err.into_response(),
    };

    match app_state.sync.refresh(&symbol, interval, Utc::now()).await {
        Ok(RefreshOutcome::Updated(series)) => {
            Json(SymbolPayload::from_series(&series, params.performance)).into_response()
        }
        Ok(RefreshOutcome::NotModified) => StatusCode::NOT_MODIFIED.into_response(),
        Ok(RefreshOutcome::NoCache) => StatusCode::NO_CONTENT.into_response(),
        Ok(RefreshOutcome::Conflict) => {
            let body = ErrorBody::new(
                409,
                format!("No market session data for the exchange of {}", symbol),
            );
            (StatusCode::CONFLICT, Json(body)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateSymbolRequest {
    pub symbol: String,
    pub interval: Option<String>,
    #[serde(default)]
    pub performance: bool,
}

/// POST /symbols - create path: fetch from the provider and store.
#[instrument(skip(app_state, request))]
pub async fn create_symbol_handler(
    State(app_state): State<AppState>,
    Json(request): Json<CreateSymbolRequest>,
) -> Response {
    let interval = match parse_interval(&request.interval) {
        Ok(interval) => interval,
        Err(err) => return err.into_response(),
    };

    info!(symbol = %request.symbol, %interval, "Creating series");
    match app_state.sync.create(&request.symbol, interval).await {
        Ok(series) => (
            StatusCode::CREATED,
            Json(SymbolPayload::from_series(&series, request.performance)),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Serialize)]
pub struct MarketPayload {
    pub data: Vec<MarketSession>,
    pub status: &'static str,
}

/// GET /market - sessions currently in the store.
pub async fn get_market_handler(State(app_state): State<AppState>) -> Response {
    let data = app_state.store.sessions().await;
    Json(MarketPayload { data, status: "ok" }).into_response()
}

/// PUT /market - refresh sessions from the provider and upsert the store.
#[instrument(skip(app_state))]
pub async fn refresh_market_handler(State(app_state): State<AppState>) -> Response {
    match app_state.sync.refresh_market_sessions().await {
        Ok(data) => Json(MarketPayload { data, status: "ok" }).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct SymbolsListQuery {
    pub plan: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SymbolsListPayload {
    pub data: BTreeMap<String, Vec<String>>,
    pub status: &'static str,
}

/// GET /symbols-list - symbols available under the provider plan.
#[instrument(skip(app_state))]
pub async fn list_symbols_handler(
    State(app_state): State<AppState>,
    Query(params): Query<SymbolsListQuery>,
) -> Response {
    let plan = params.plan.unwrap_or_else(|| "Basic".to_string());
    match app_state.sync.available_symbols(&plan).await {
        Ok(data) => Json(SymbolsListPayload { data, status: "ok" }).into_response(),
        Err(err) => err.into_response(),
    }
}

/// GET /health - worker and store statistics.
pub async fn health_handler(State(app_state): State<AppState>) -> Response {
    let mut health = app_state.health_stats.read().await.clone();
    health.series_count = app_state.store.series_count().await;
    health.session_count = app_state.store.session_count().await;
    health.current_system_time = Utc::now().to_rfc3339();
    Json(health).into_response()
}
