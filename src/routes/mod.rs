//! Router assembly: health at the root, every resource under the API prefix, JSON 404 fallback.

mod common;
mod resource;

pub use common::{common_routes, method_not_allowed, not_found};
pub use resource::resource_routes;

use crate::state::AppState;
use axum::Router;

/// Nest `api_routes` under `api_prefix`; an empty prefix mounts them at the root.
pub fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(api_routes: Router<S>, api_prefix: &str) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}

/// Full application router without transport layers.
pub fn build_app(state: AppState, api_prefix: &str) -> Router {
    common_routes(state.clone())
        .merge(build_router_with_prefix(resource_routes(state), api_prefix))
        .fallback(not_found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caller::SelfAssertedIdentity;
    use crate::catalog::Catalog;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Pool that never connects: every request below must fail before touching the store.
    fn app(prefix: &str) -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://sitewatch@127.0.0.1:1/sitewatch")
            .unwrap();
        let state = AppState {
            pool,
            catalog: Arc::new(Catalog::standard()),
            schema: Arc::from("sitewatch"),
            identity: Arc::new(SelfAssertedIdentity),
        };
        build_app(state, prefix)
    }

    async fn call(app: Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if body.is_some() {
            req = req.header("content-type", "application/json");
        }
        let req = req.body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty)).unwrap();
        send(app, req).await
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_bad_enum_filter() {
        let (status, body) = call(app("/api"), "GET", "/api/alerts?status=closed", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("Invalid status 'closed'"));
    }

    #[tokio::test]
    async fn test_bad_date() {
        let (status, body) = call(app("/api"), "GET", "/api/safety-incidents?date_from=2024/01/01", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Invalid date_from format. Use YYYY-MM-DD");
    }

    #[tokio::test]
    async fn test_bad_limit() {
        let (status, _) = call(app("/api"), "GET", "/api/sites?limit=5000", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bad_uuid() {
        let (status, body) = call(app("/api"), "GET", "/api/sites/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("not-a-uuid"));

        let (status, _) = call(app("/api"), "PUT", "/api/alerts/xyz/acknowledge", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bad_caller() {
        let (status, body) = call(
            app("/api"),
            "POST",
            "/api/safety-incidents?current_user_id=nobody",
            Some(r#"{"title": "x"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "current_user_id must be a valid UUID");
    }

    #[tokio::test]
    async fn test_missing_required_field() {
        let (status, body) = call(app("/api"), "POST", "/api/sites", Some(r#"{"name": "Site A"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "code is required");
    }

    #[tokio::test]
    async fn test_invalid_body_enum() {
        let (status, body) = call(
            app("/api"),
            "POST",
            "/api/sites",
            Some(r#"{"name": "Site A", "code": "SA-001", "status": "demolished"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().starts_with("Invalid status 'demolished'"));
    }

    #[tokio::test]
    async fn test_span_order() {
        let (status, body) = call(
            app("/api"),
            "POST",
            "/api/sites",
            Some(r#"{"name": "A", "code": "A", "start_date": "2024-05-01", "expected_end_date": "2024-04-01"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "start_date must be on or before expected_end_date");
    }

    #[tokio::test]
    async fn test_missing_action_param() {
        let id = uuid::Uuid::new_v4();
        let (status, body) = call(app("/api"), "PUT", &format!("/api/ai-predictions/{}/validate", id), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "actual_value is required");
    }

    #[tokio::test]
    async fn test_unknown_resource() {
        let (status, body) = call(app("/api"), "GET", "/api/spaceships", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Not Found");

        let (status, _) = call(app("/api"), "GET", "/sites", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_operation_not_exposed() {
        let id = uuid::Uuid::new_v4();
        let (status, body) = call(app("/api"), "DELETE", &format!("/api/users/{}", id), None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["detail"], "Method Not Allowed");

        let (status, body) = call(app("/api"), "DELETE", "/api/dashboard/summary", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["detail"], "Method Not Allowed");
    }

    #[tokio::test]
    async fn test_malformed_json_body() {
        let (status, body) = call(app("/api"), "POST", "/api/sites", Some("{bad")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("JSON"));
    }

    #[tokio::test]
    async fn test_body_without_content_type() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/sites")
            .body(Body::from(r#"{"name": "A", "code": "A"}"#))
            .unwrap();
        let (status, body) = send(app("/api"), req).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(body["detail"].as_str().unwrap().contains("Content-Type"));
    }

    #[tokio::test]
    async fn test_oversized_body() {
        let app = app("/api").layer(axum::extract::DefaultBodyLimit::max(16));
        let (status, body) = call(app, "POST", "/api/sites", Some(r#"{"name": "A long site name", "code": "A"}"#)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_decimal_out_of_range() {
        let (status, body) = call(
            app("/api"),
            "POST",
            "/api/ai-training-jobs",
            Some(&format!(r#"{{"model_id": "{}", "progress_percentage": 1000}}"#, uuid::Uuid::new_v4())),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "progress_percentage is out of range");

        let uri = format!("/api/ai-predictions/{}/validate?actual_value=1e12", uuid::Uuid::new_v4());
        let (status, body) = call(app("/api"), "PUT", &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "actual_value is out of range");
    }

    #[tokio::test]
    async fn test_empty_prefix_mounts_at_root() {
        let (status, _) = call(app(""), "GET", "/alerts?priority=urgent", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_dashboard_rejects_bad_site() {
        let (status, body) = call(app("/api"), "GET", "/api/dashboard/summary?site_id=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "site_id must be a valid UUID");
    }
}
