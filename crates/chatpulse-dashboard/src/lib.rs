//! chatpulse-dashboard — JSON summary API.
//!
//! Serves the aggregator's [`SummaryView`] to whatever renders the dashboard.
//! No markup is produced here.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /dashboard?top=N` | `SummaryView` as JSON, leaderboards truncated to `N` |
//! | `GET /healthz` | `ok` |

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chatpulse_core::{Aggregator, SummaryView};
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Upper bound on `?top=`; keeps a single request from serialising the
/// whole hashtag table.
pub const MAX_TOP_N: usize = 100;

#[derive(Clone)]
pub struct DashboardState {
    aggregator: Arc<Aggregator>,
    default_top_n: usize,
}

impl DashboardState {
    pub fn new(aggregator: Arc<Aggregator>, default_top_n: usize) -> Self {
        Self {
            aggregator,
            default_top_n,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SummaryParams {
    top: Option<usize>,
}

pub fn router(state: DashboardState) -> Router {
    Router::new()
        .route("/dashboard", get(summary))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
}

/// Serve the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: DashboardState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!(addr = %listener.local_addr()?, "dashboard api listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn summary(
    State(state): State<DashboardState>,
    Query(params): Query<SummaryParams>,
) -> Result<Json<SummaryView>, ApiError> {
    let top = params.top.unwrap_or(state.default_top_n).min(MAX_TOP_N);
    let aggregator = Arc::clone(&state.aggregator);

    // Store reads may hit SQLite; keep them off the async workers.
    let view = tokio::task::spawn_blocking(move || aggregator.summary(top))
        .await
        .map_err(|e| ApiError(e.to_string()))?
        .map_err(|e| ApiError(e.to_string()))?;
    Ok(Json(view))
}

struct ApiError(String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "summary failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": self.0 })),
        )
            .into_response()
    }
}
