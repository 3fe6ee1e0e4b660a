//! CrudService: generic CRUD, validation, list queries, transitions and analytics.

mod analytics;
mod crud;
pub mod filters;
pub mod transitions;
pub mod validation;

pub use analytics::{percentage_error, DEFAULT_DASHBOARD_DAYS};
pub use crud::{row_to_json, CrudService};
pub use filters::ListQuery;
