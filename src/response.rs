//! Success response helpers. Resources are returned bare (no envelope); lists are JSON arrays.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct Message {
    pub message: String,
}

pub fn created(row: Value) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, Json(row))
}

pub fn ok(row: Value) -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(row))
}

pub fn many(rows: Vec<Value>) -> (StatusCode, Json<Vec<Value>>) {
    (StatusCode::OK, Json(rows))
}

/// `{"message": "<Label> deleted successfully"}`.
pub fn deleted(label: &str) -> (StatusCode, Json<Message>) {
    (
        StatusCode::OK,
        Json(Message {
            message: format!("{} deleted successfully", label),
        }),
    )
}
