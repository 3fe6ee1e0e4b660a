//! Typed bind values. Each variant binds with its concrete Rust type so the driver sends the
//! matching wire type; enums and decimals add a SQL cast at the placeholder.

use crate::catalog::ColumnType;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;
use std::cmp::Ordering;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq)]
pub enum SqlValue {
    Uuid(Option<Uuid>),
    /// Text and enum tags.
    Text(Option<String>),
    Int(Option<i32>),
    BigInt(Option<i64>),
    /// Decimal columns travel as float8 and are cast to numeric in SQL.
    Float(Option<f64>),
    Bool(Option<bool>),
    Timestamp(Option<DateTime<Utc>>),
    Date(Option<NaiveDate>),
    Json(Option<Value>),
}

impl SqlValue {
    /// SQL NULL carrying the wire type of `ty`.
    pub fn null_for(ty: &ColumnType) -> Self {
        match ty {
            ColumnType::Uuid => SqlValue::Uuid(None),
            ColumnType::Text | ColumnType::Enum(_) => SqlValue::Text(None),
            ColumnType::Int => SqlValue::Int(None),
            ColumnType::BigInt => SqlValue::BigInt(None),
            ColumnType::Decimal(..) => SqlValue::Float(None),
            ColumnType::Bool => SqlValue::Bool(None),
            ColumnType::Timestamp => SqlValue::Timestamp(None),
            ColumnType::Date => SqlValue::Date(None),
            ColumnType::Json => SqlValue::Json(None),
        }
    }

    pub fn text(s: &str) -> Self {
        SqlValue::Text(Some(s.to_string()))
    }

    pub fn now() -> Self {
        SqlValue::Timestamp(Some(Utc::now()))
    }

    pub fn is_null(&self) -> bool {
        match self {
            SqlValue::Uuid(v) => v.is_none(),
            SqlValue::Text(v) => v.is_none(),
            SqlValue::Int(v) => v.is_none(),
            SqlValue::BigInt(v) => v.is_none(),
            SqlValue::Float(v) => v.is_none(),
            SqlValue::Bool(v) => v.is_none(),
            SqlValue::Timestamp(v) => v.is_none(),
            SqlValue::Date(v) => v.is_none(),
            SqlValue::Json(v) => v.is_none(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Int(v) => v.map(f64::from),
            SqlValue::BigInt(v) => v.map(|n| n as f64),
            SqlValue::Float(v) => *v,
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            SqlValue::Uuid(v) => *v,
            _ => None,
        }
    }

    /// Order two non-null values of the same kind; `None` when they are not comparable.
    pub fn compare(&self, other: &SqlValue) -> Option<Ordering> {
        match (self, other) {
            (SqlValue::Timestamp(Some(a)), SqlValue::Timestamp(Some(b))) => Some(a.cmp(b)),
            (SqlValue::Date(Some(a)), SqlValue::Date(Some(b))) => Some(a.cmp(b)),
            (SqlValue::Text(Some(a)), SqlValue::Text(Some(b))) => Some(a.cmp(b)),
            _ => self.as_f64()?.partial_cmp(&other.as_f64()?),
        }
    }

    pub fn bind<'q>(self, query: Query<'q, Postgres, PgArguments>) -> Query<'q, Postgres, PgArguments> {
        match self {
            SqlValue::Uuid(v) => query.bind(v),
            SqlValue::Text(v) => query.bind(v),
            SqlValue::Int(v) => query.bind(v),
            SqlValue::BigInt(v) => query.bind(v),
            SqlValue::Float(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Timestamp(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::Json(v) => query.bind(v),
        }
    }
}
