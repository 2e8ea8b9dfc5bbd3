use crate::stats::{QueryError, ReviewerSnapshot, StatsService};
use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use scholar_badges::BadgeTier;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Clone)]
struct AppState {
    stats: StatsService,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BadgesResponse {
    pub tiers: Vec<BadgeTier>,
}

/// Failure returned to HTTP clients.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::InvalidWallet => ApiError::BadRequest(e.to_string()),
            QueryError::Store(source) => {
                // Storage detail stays in the logs
                error!(error = %source, "❌ Review store read failed");
                ApiError::Internal("Failed to load reviewer stats".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

pub fn router(stats: StatsService) -> Router {
    let state = AppState { stats };

    Router::new()
        .route("/health", get(health))
        .route("/v1/reviewers/:wallet/stats", get(get_reviewer_stats))
        .route("/v1/badges", get(get_badges))
        .route("/metrics", get(get_metrics))
        .with_state(Arc::new(state))
}

/// Bind the listener and serve the API in a background task.
pub async fn start_api_server(
    stats: StatsService,
    host: &str,
    port: u16,
) -> anyhow::Result<JoinHandle<()>> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind API server on {}", addr))?;

    info!(address = %addr, "📡 API server listening");

    let app = router(stats);
    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "❌ API server failed");
        }
    }))
}

async fn health() -> &'static str {
    "OK"
}

async fn get_reviewer_stats(
    State(state): State<Arc<AppState>>,
    Path(wallet): Path<String>,
) -> Result<Json<ReviewerSnapshot>, ApiError> {
    let snapshot = state.stats.query(&wallet).await?;
    Ok(Json(snapshot))
}

async fn get_badges(State(state): State<Arc<AppState>>) -> Json<BadgesResponse> {
    Json(BadgesResponse {
        tiers: state.stats.badges().tiers().to_vec(),
    })
}

async fn get_metrics(State(state): State<Arc<AppState>>) -> String {
    state.stats.metrics().gather()
}
