//! Resource catalogue: tables, columns, enum sets and per-resource behaviour, declared once
//! and consumed by migrations, SQL builders, validation and routing.

pub mod enums;
mod registry;
pub mod types;

pub mod access;
pub mod admin;
pub mod alerts;
pub mod cameras;
pub mod detections;
pub mod models;
pub mod navigation;
pub mod personnel;
pub mod sites;
pub mod video;

pub use registry::Catalog;
pub use types::*;
