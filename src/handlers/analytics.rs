//! Cross-resource dashboard and prediction validation.

use super::resource::parse_id;
use crate::error::AppError;
use crate::response;
use crate::service::{filters, CrudService, DEFAULT_DASHBOARD_DAYS};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use std::collections::HashMap;

/// GET /dashboard/summary?site_id=&days=
pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let site_id = match params.get("site_id").map(|s| s.trim()).filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            uuid::Uuid::parse_str(raw).map_err(|_| AppError::Validation("site_id must be a valid UUID".into()))?,
        ),
        None => None,
    };
    let days = filters::int_param(&params, "days")?.unwrap_or(DEFAULT_DASHBOARD_DAYS);
    if !(1..=filters::MAX_DAYS).contains(&days) {
        return Err(AppError::BadRequest(format!("days must be between 1 and {}", filters::MAX_DAYS)));
    }
    let body = CrudService::new(&state.pool, &state.schema, &state.catalog)
        .dashboard(site_id, days)
        .await?;
    Ok(response::ok(body))
}

/// PUT /ai-predictions/:id/validate?actual_value=x
pub async fn validate_prediction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let raw = params
        .get("actual_value")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("actual_value is required".into()))?;
    let actual: f64 = raw
        .parse()
        .ok()
        .filter(|n: &f64| n.is_finite())
        .ok_or_else(|| AppError::Validation("actual_value must be a number".into()))?;
    let row = CrudService::new(&state.pool, &state.schema, &state.catalog)
        .validate_prediction(id, actual)
        .await?;
    Ok(response::ok(row))
}
