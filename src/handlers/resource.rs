//! Catalogue resource handlers: list, summary, get, create, update, action, delete.
//! Each takes the resource's `TableDef` first; routes bind it per path.

use crate::caller::Caller;
use crate::catalog::{ActionDef, TableDef};
use crate::error::AppError;
use crate::response;
use crate::service::{filters, CrudService, ListQuery};
use crate::state::AppState;
use axum::response::IntoResponse;
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// Path ids are parsed by hand so a malformed one is a `{"detail"}` 400 like every other error.
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::Validation(format!("Invalid id '{}': must be a UUID", raw)))
}

fn service(state: &AppState) -> CrudService<'_> {
    CrudService::new(&state.pool, &state.schema, &state.catalog)
}

pub async fn list(
    t: &'static TableDef,
    state: AppState,
    params: HashMap<String, String>,
) -> Result<impl IntoResponse, AppError> {
    let query = ListQuery::parse(t, &params)?;
    let rows = service(&state).list(t, &query).await?;
    Ok(response::many(rows))
}

pub async fn summary(
    t: &'static TableDef,
    state: AppState,
    params: HashMap<String, String>,
) -> Result<impl IntoResponse, AppError> {
    let conditions = filters::conditions(t, &params)?;
    let body = service(&state).summary(t, &conditions).await?;
    Ok(response::ok(body))
}

pub async fn read(t: &'static TableDef, state: AppState, id: String) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let row = service(&state).get(t, id).await?;
    Ok(response::ok(row))
}

pub async fn create(
    t: &'static TableDef,
    state: AppState,
    caller: Caller,
    body: Value,
) -> Result<impl IntoResponse, AppError> {
    let row = service(&state).create(t, body, caller).await?;
    Ok(response::created(row))
}

pub async fn update(
    t: &'static TableDef,
    state: AppState,
    id: String,
    body: Value,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let row = service(&state).update(t, id, body).await?;
    Ok(response::ok(row))
}

pub async fn action(
    t: &'static TableDef,
    action: &'static ActionDef,
    state: AppState,
    caller: Caller,
    id: String,
    params: HashMap<String, String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let row = service(&state).action(t, id, action, &params, caller).await?;
    Ok(response::ok(row))
}

pub async fn delete(t: &'static TableDef, state: AppState, id: String) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    service(&state).delete(t, id).await?;
    Ok(response::deleted(t.label))
}
