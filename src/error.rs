//! Typed errors and HTTP mapping. Every error body is `{"detail": "..."}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// PostgreSQL SQLSTATE codes the API translates instead of reporting a 500.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const INVALID_TEXT_REPRESENTATION: &str = "22P02";
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("missing reference: {kind} '{id}'")]
    MissingReference { kind: &'static str, id: String },
    #[error("duplicate path segment: {0}")]
    DuplicatePath(String),
    #[error("catalogue: {0}")]
    Validation(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    /// A framework rejection (body parsing, content type, size, method) keeping its status.
    #[error("{1}")]
    Rejected(StatusCode, String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl AppError {
    /// Status and client-facing message. Store errors never leak their text.
    pub fn status_and_detail(&self) -> (StatusCode, String) {
        match self {
            AppError::Catalog(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            AppError::Validation(m) | AppError::BadRequest(m) | AppError::Conflict(m) => {
                (StatusCode::BAD_REQUEST, m.clone())
            }
            AppError::Rejected(status, m) => (*status, m.clone()),
            AppError::Db(e) => db_status(e),
        }
    }
}

fn db_status(e: &sqlx::Error) -> (StatusCode, String) {
    if let sqlx::Error::RowNotFound = e {
        return (StatusCode::NOT_FOUND, "Not found".into());
    }
    let code = e.as_database_error().and_then(|d| d.code()).map(|c| c.into_owned());
    sqlstate_status(code.as_deref())
}

fn sqlstate_status(code: Option<&str>) -> (StatusCode, String) {
    match code {
        Some(UNIQUE_VIOLATION) => (StatusCode::BAD_REQUEST, "Record already exists".into()),
        Some(FOREIGN_KEY_VIOLATION) => (StatusCode::BAD_REQUEST, "Referenced record does not exist".into()),
        Some(INVALID_TEXT_REPRESENTATION) => (StatusCode::BAD_REQUEST, "Invalid input value".into()),
        Some(NUMERIC_VALUE_OUT_OF_RANGE) => (StatusCode::BAD_REQUEST, "Numeric value out of range".into()),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into()),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(ErrorBody { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_client_errors_keep_their_message() {
        let (status, detail) = AppError::NotFound("Site not found".into()).status_and_detail();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(detail, "Site not found");

        let (status, detail) = AppError::Conflict("Site code already exists".into()).status_and_detail();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(detail, "Site code already exists");

        let (status, _) = AppError::Validation("bad".into()).status_and_detail();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, detail) =
            AppError::Rejected(StatusCode::UNSUPPORTED_MEDIA_TYPE, "wrong type".into()).status_and_detail();
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(detail, "wrong type");
    }

    #[test]
    fn test_store_errors_are_masked() {
        let (status, detail) = AppError::Db(sqlx::Error::PoolTimedOut).status_and_detail();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(detail, "Internal server error");

        let (status, _) = AppError::Db(sqlx::Error::RowNotFound).status_and_detail();
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = AppError::from(CatalogError::DuplicatePath("sites".into())).status_and_detail();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_sqlstate_mapping() {
        assert_eq!(sqlstate_status(Some("22003")).0, StatusCode::BAD_REQUEST);
        assert_eq!(sqlstate_status(Some("22003")).1, "Numeric value out of range");
        assert_eq!(sqlstate_status(Some("23505")).0, StatusCode::BAD_REQUEST);
        assert_eq!(sqlstate_status(Some("23503")).0, StatusCode::BAD_REQUEST);
        assert_eq!(sqlstate_status(Some("22P02")).0, StatusCode::BAD_REQUEST);
        assert_eq!(sqlstate_status(Some("40001")).0, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(sqlstate_status(None).0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_body_is_detail_object() {
        let response = AppError::NotFound("Site not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "detail": "Site not found" }));
    }
}
