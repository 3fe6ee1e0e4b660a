//! HTTP handlers for catalogue resources, the dashboard and prediction validation.

pub mod analytics;
pub mod resource;
