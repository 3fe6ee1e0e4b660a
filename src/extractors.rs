//! Request body extraction that answers in the `{"detail"}` error shape.

use crate::error::AppError;
use async_trait::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde_json::Value;

/// JSON request body. Malformed JSON, a missing `Content-Type` or an oversized body keep axum's
/// status code (400, 415, 413) but are rendered as [`AppError`].
#[derive(Debug)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(AppError::Rejected(rejection.status(), rejection.body_text())),
        }
    }
}
