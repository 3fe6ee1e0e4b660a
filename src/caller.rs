//! Caller identity. Handlers only see `Caller`; how it is established lives behind
//! `IdentityProvider` so real authentication can replace the self-asserted default.

use crate::error::AppError;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use std::collections::HashMap;
use uuid::Uuid;

/// Header carrying a self-asserted user id.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Query parameters accepted as a caller id, in precedence order.
const USER_ID_PARAMS: &[&str] = &["current_user_id", "created_by"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Caller(Option<Uuid>);

impl Caller {
    pub fn anonymous() -> Self {
        Caller(None)
    }

    pub fn user(id: Uuid) -> Self {
        Caller(Some(id))
    }

    pub fn id(&self) -> Option<Uuid> {
        self.0
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn identify(&self, parts: &Parts) -> Result<Caller, AppError>;
}

/// Trusts whatever id the client presents. No authentication.
#[derive(Clone, Copy, Debug, Default)]
pub struct SelfAssertedIdentity;

#[async_trait]
impl IdentityProvider for SelfAssertedIdentity {
    async fn identify(&self, parts: &Parts) -> Result<Caller, AppError> {
        if let Some(raw) = parts.headers.get(USER_ID_HEADER) {
            let s = raw
                .to_str()
                .map_err(|_| AppError::BadRequest(format!("invalid {} header", USER_ID_HEADER)))?;
            return parse_caller(s.trim(), USER_ID_HEADER);
        }
        let Ok(Query(params)) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri) else {
            return Ok(Caller::anonymous());
        };
        for name in USER_ID_PARAMS {
            if let Some(s) = params.get(*name) {
                return parse_caller(s.trim(), name);
            }
        }
        Ok(Caller::anonymous())
    }
}

fn parse_caller(s: &str, source: &str) -> Result<Caller, AppError> {
    if s.is_empty() {
        return Ok(Caller::anonymous());
    }
    Uuid::parse_str(s)
        .map(Caller::user)
        .map_err(|_| AppError::BadRequest(format!("{} must be a valid UUID", source)))
}

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state.identity.identify(parts).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(uri: &str, header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(h) = header {
            builder = builder.header(USER_ID_HEADER, h);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_header_wins_over_query() {
        let header_id = Uuid::new_v4();
        let query_id = Uuid::new_v4();
        let p = parts(&format!("/api/sites?created_by={}", query_id), Some(&header_id.to_string()));
        let caller = SelfAssertedIdentity.identify(&p).await.unwrap();
        assert_eq!(caller.id(), Some(header_id));
    }

    #[tokio::test]
    async fn test_query_params_in_order() {
        let current = Uuid::new_v4();
        let creator = Uuid::new_v4();
        let p = parts(&format!("/x?created_by={}&current_user_id={}", creator, current), None);
        assert_eq!(SelfAssertedIdentity.identify(&p).await.unwrap().id(), Some(current));

        let p = parts(&format!("/x?created_by={}", creator), None);
        assert_eq!(SelfAssertedIdentity.identify(&p).await.unwrap().id(), Some(creator));
    }

    #[tokio::test]
    async fn test_absent_identity_is_anonymous() {
        let p = parts("/api/alerts?status=open", None);
        assert_eq!(SelfAssertedIdentity.identify(&p).await.unwrap(), Caller::anonymous());
    }

    #[tokio::test]
    async fn test_malformed_identity_is_rejected() {
        let p = parts("/x", Some("not-a-uuid"));
        let err = SelfAssertedIdentity.identify(&p).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let p = parts("/x?current_user_id=42", None);
        assert!(SelfAssertedIdentity.identify(&p).await.is_err());
    }
}
