//! Shared application state for all routes. Built once at startup and never mutated.

use crate::caller::IdentityProvider;
use crate::catalog::Catalog;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub catalog: Arc<Catalog>,
    /// Schema holding every resource table and enum type.
    pub schema: Arc<str>,
    pub identity: Arc<dyn IdentityProvider>,
}
