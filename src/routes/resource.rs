//! Resource routes built from the catalogue. Every resource gets its own static path segment,
//! so `/{path}/summary` and `/{path}/:id/{action}` never compete with another resource's routes.

use super::common::method_not_allowed;
use crate::caller::Caller;
use crate::catalog::{models::AI_PREDICTIONS, ActionDef, TableDef};
use crate::extractors::JsonBody;
use crate::handlers::{analytics, resource};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, put, MethodRouter},
    Router,
};
use std::collections::HashMap;

type Params = Query<HashMap<String, String>>;

fn collection(t: &'static TableDef) -> MethodRouter<AppState> {
    let mut m = MethodRouter::new();
    if t.ops.list {
        m = m.get(move |State(state): State<AppState>, Query(params): Params| resource::list(t, state, params));
    }
    if t.ops.create {
        m = m.post(
            move |State(state): State<AppState>, caller: Caller, JsonBody(body): JsonBody| {
                resource::create(t, state, caller, body)
            },
        );
    }
    m.fallback(method_not_allowed)
}

fn item(t: &'static TableDef) -> MethodRouter<AppState> {
    let mut m = MethodRouter::new();
    if t.ops.get {
        m = m.get(move |State(state): State<AppState>, Path(id): Path<String>| resource::read(t, state, id));
    }
    if t.ops.update {
        m = m.put(
            move |State(state): State<AppState>, Path(id): Path<String>, JsonBody(body): JsonBody| {
                resource::update(t, state, id, body)
            },
        );
    }
    if t.ops.delete {
        m = m.delete(move |State(state): State<AppState>, Path(id): Path<String>| resource::delete(t, state, id));
    }
    m.fallback(method_not_allowed)
}

fn action(t: &'static TableDef, action: &'static ActionDef) -> MethodRouter<AppState> {
    put(
        move |State(state): State<AppState>, caller: Caller, Path(id): Path<String>, Query(params): Params| {
            resource::action(t, action, state, caller, id, params)
        },
    )
    .fallback(method_not_allowed)
}

/// Every catalogue resource, plus the dashboard and prediction validation. Paths are relative
/// to the API prefix.
pub fn resource_routes(state: AppState) -> Router {
    let mut router = Router::new();
    for &t in state.catalog.tables() {
        router = router
            .route(&format!("/{}", t.path), collection(t))
            .route(&format!("/{}/:id", t.path), item(t));
        if t.summary.is_some() {
            router = router.route(
                &format!("/{}/summary", t.path),
                get(move |State(state): State<AppState>, Query(params): Params| resource::summary(t, state, params))
                    .fallback(method_not_allowed),
            );
        }
        let actions: &'static [ActionDef] = t.actions;
        for a in actions {
            router = router.route(&format!("/{}/:id/{}", t.path, a.name), action(t, a));
        }
    }
    if state.catalog.by_table(AI_PREDICTIONS.table).is_some() {
        router = router.route(
            &format!("/{}/:id/validate", AI_PREDICTIONS.path),
            put(analytics::validate_prediction).fallback(method_not_allowed),
        );
    }
    router
        .route("/dashboard/summary", get(analytics::dashboard).fallback(method_not_allowed))
        .with_state(state)
}
