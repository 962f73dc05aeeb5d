//! REST API server
//!
//! Exposes the orchestrator and the market-data wrappers to the dashboard
//! frontend. The orchestrator endpoint is the sole query entry point; it
//! always answers 200 with readable text, even when the domain call failed.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::agent::Orchestrator;
use crate::market::{self, MarketDataClient, Quote};

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionParams {
    #[serde(default)]
    pub q: String,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub orchestrator: Arc<Orchestrator>,
    pub market: Option<Arc<MarketDataClient>>,
}

/// =============================
/// Handlers
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn run_query(
    State(state): State<ApiState>,
    Json(req): Json<QueryRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    info!("Received query request: {}", req.query);

    let (response, metadata) = state.orchestrator.handle(&req.query).await;

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "response": response,
            "metadata": metadata,
        }))),
    )
}

fn group_to_json(quotes: Vec<(String, Quote)>) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> = quotes
        .into_iter()
        .filter_map(|(name, quote)| Some((name, serde_json::to_value(quote).ok()?)))
        .collect();
    serde_json::Value::Object(map)
}

async fn market_overview(State(state): State<ApiState>) -> (StatusCode, Json<ApiResponse>) {
    let Some(client) = state.market.as_ref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::error(
                "MARKET_API_BASE_URL is not configured".to_string(),
            )),
        );
    };

    let indices = client.get_group(market::INDIAN_INDICES).await;
    let global = client.get_group(market::GLOBAL_INDICES).await;
    let commodities = client.get_group(market::COMMODITIES).await;

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "indices": group_to_json(indices),
            "global": group_to_json(global),
            "commodities": group_to_json(commodities),
        }))),
    )
}

async fn stock_suggestions(
    Query(params): Query<SuggestionParams>,
) -> (StatusCode, Json<ApiResponse>) {
    let suggestions: Vec<serde_json::Value> = market::search_stock_suggestions(&params.q)
        .into_iter()
        .map(|(ticker, name)| serde_json::json!({"ticker": ticker, "name": name}))
        .collect();

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "suggestions": suggestions,
        }))),
    )
}

/// =============================
/// Router
/// =============================

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/query", post(run_query))
        .route("/api/market/overview", get(market_overview))
        .route("/api/market/suggestions", get(stock_suggestions))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    state: ApiState,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
