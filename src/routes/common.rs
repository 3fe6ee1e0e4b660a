//! Common routes: health with a database round trip, and the JSON 404 fallback.

use crate::error::ErrorBody;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    database: &'static str,
    version: &'static str,
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthBody>) {
    let reachable = crate::store::ping(&state.pool).await.is_ok();
    let (code, status, database) = if reachable {
        (StatusCode::OK, "healthy", "connected")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "disconnected")
    };
    (
        code,
        Json(HealthBody {
            status,
            database,
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// Unmatched paths answer in the same `{"detail"}` shape as handler errors.
pub async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            detail: "Not Found".into(),
        }),
    )
}

/// Registered paths called with a method they do not serve.
pub async fn method_not_allowed() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody {
            detail: "Method Not Allowed".into(),
        }),
    )
}

/// GET /health. Mounted outside the API prefix.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health).fallback(method_not_allowed))
        .with_state(state)
}
