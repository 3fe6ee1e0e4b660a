//! Sitewatch: construction-site monitoring REST backend on PostgreSQL.
//!
//! Every resource is declared once in [`catalog`]; migrations, SQL, validation and routes are
//! derived from those declarations.

pub mod caller;
pub mod catalog;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod response;
pub mod routes;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;

pub use caller::{Caller, IdentityProvider, SelfAssertedIdentity};
pub use catalog::Catalog;
pub use error::{AppError, CatalogError};
pub use migration::apply_migrations;
pub use routes::build_app;
pub use settings::Settings;
pub use state::AppState;
pub use store::ensure_database_exists;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application router with transport layers: CORS, request body limit, HTTP tracing. The body
/// limit is enforced by the JSON extractor, so an oversized body is a `{"detail"}` 413.
pub fn app(state: AppState, settings: &Settings) -> Router {
    build_app(state, &settings.api_prefix)
        .layer(cors_layer(&settings.cors_allowed_origins))
        .layer(DefaultBodyLimit::max(settings.max_body_bytes))
        .layer(TraceLayer::new_for_http())
}

/// Permissive unless an allow list is configured. Unparseable origins are skipped with a warning.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return base.allow_origin(Any);
    }
    let list: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(list))
}
