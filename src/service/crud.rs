//! Generic CRUD execution against PostgreSQL.

use super::filters::ListQuery;
use super::transitions::{action_payload, apply_side_effects};
use super::validation::{check_required, check_spans, parse_body, Payload};
use crate::caller::Caller;
use crate::catalog::{ActionDef, Catalog, ColumnType, TableDef, ID};
use crate::error::{AppError, CatalogError};
use crate::sql::{self, QueryBuf, SqlValue};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Number, Value};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use uuid::Uuid;

/// Borrowed view of what every operation needs: the pool, the schema and the catalogue
/// (for reference pre-checks).
#[derive(Clone, Copy)]
pub struct CrudService<'a> {
    pub pool: &'a PgPool,
    pub schema: &'a str,
    pub catalog: &'a Catalog,
}

impl<'a> CrudService<'a> {
    pub fn new(pool: &'a PgPool, schema: &'a str, catalog: &'a Catalog) -> Self {
        CrudService { pool, schema, catalog }
    }

    pub async fn list(&self, t: &TableDef, query: &ListQuery) -> Result<Vec<Value>, AppError> {
        let q = sql::select_list(self.schema, t, &query.conditions, query.page);
        let rows = fetch_all(self.pool, q).await?;
        rows.iter().map(|r| row_to_json(t, r)).collect()
    }

    /// Fetch one row by primary key.
    pub async fn read(&self, t: &TableDef, id: Uuid) -> Result<Option<Value>, AppError> {
        let q = sql::select_by_id(self.schema, t, id);
        fetch_optional(self.pool, q).await?.map(|r| row_to_json(t, &r)).transpose()
    }

    /// Like `read`, but a miss is `404 <Label> not found`.
    pub async fn get(&self, t: &TableDef, id: Uuid) -> Result<Value, AppError> {
        self.read(t, id).await?.ok_or_else(|| AppError::NotFound(t.not_found_message()))
    }

    /// Insert one row with a fresh v4 id. Returns the created row.
    pub async fn create(&self, t: &TableDef, body: Value, caller: Caller) -> Result<Value, AppError> {
        let mut payload = parse_body(t, body)?;
        if let (Some(name), Some(id)) = (t.caller_column, caller.id()) {
            if let (false, Some(column)) = (payload.contains(name), t.column(name)) {
                payload.set(column, SqlValue::Uuid(Some(id)));
            }
        }
        apply_side_effects(t, &mut payload);
        check_required(t, &payload)?;
        check_spans(t, &payload, None)?;
        self.check_references(t, &payload).await?;
        self.check_unique(t, &payload, None).await?;

        let id = Uuid::new_v4();
        let q = sql::insert(self.schema, t, id, payload.values());
        let row = fetch_optional(self.pool, q).await?.ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
        tracing::debug!(table = t.table, %id, "created");
        row_to_json(t, &row)
    }

    /// Partial update from a JSON body: only supplied writable fields change.
    pub async fn update(&self, t: &TableDef, id: Uuid, body: Value) -> Result<Value, AppError> {
        let existing = self.get(t, id).await?;
        let mut payload = parse_body(t, body)?;
        apply_side_effects(t, &mut payload);
        self.write(t, id, &existing, payload).await
    }

    /// Single-purpose update driven by query parameters.
    pub async fn action(
        &self,
        t: &TableDef,
        id: Uuid,
        action: &ActionDef,
        params: &HashMap<String, String>,
        caller: Caller,
    ) -> Result<Value, AppError> {
        let existing = self.get(t, id).await?;
        let payload = action_payload(t, action, params, caller)?;
        self.write(t, id, &existing, payload).await
    }

    pub async fn delete(&self, t: &TableDef, id: Uuid) -> Result<(), AppError> {
        let q = sql::delete(self.schema, t, id);
        match fetch_optional(self.pool, q).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(t.not_found_message())),
        }
    }

    async fn write(&self, t: &TableDef, id: Uuid, existing: &Value, payload: Payload) -> Result<Value, AppError> {
        let stored = Payload::from_row(t, existing);
        check_spans(t, &payload, Some(&stored))?;
        self.check_references(t, &payload).await?;
        self.check_unique(t, &payload, Some((id, &stored))).await?;

        let q = sql::update(self.schema, t, id, payload.values());
        let row = fetch_optional(self.pool, q)
            .await?
            .ok_or_else(|| AppError::NotFound(t.not_found_message()))?;
        row_to_json(t, &row)
    }

    /// Every non-null foreign key in the write must point at an existing row.
    async fn check_references(&self, t: &TableDef, payload: &Payload) -> Result<(), AppError> {
        for (column, value) in payload.values() {
            let (Some(fk), Some(target_id)) = (column.references, value.as_uuid()) else {
                continue;
            };
            let target = self.catalog.by_table(fk.table).ok_or_else(|| CatalogError::MissingReference {
                kind: "table",
                id: format!("{}.{} -> {}", t.table, column.name, fk.table),
            })?;
            let q = sql::exists(self.schema, target, &[(&ID, SqlValue::Uuid(Some(target_id)))], None);
            if !fetch_exists(self.pool, q).await? {
                return Err(AppError::NotFound(target.not_found_message()));
            }
        }
        Ok(())
    }

    /// Declared unique keys touched by the write must stay unique. On update the stored row fills
    /// in key columns the write leaves alone; keys with a null part are never in conflict.
    async fn check_unique(&self, t: &TableDef, payload: &Payload, existing: Option<(Uuid, &Payload)>) -> Result<(), AppError> {
        'keys: for key in t.unique {
            if !key.columns.iter().any(|c| payload.contains(c)) {
                continue;
            }
            let mut matches = Vec::with_capacity(key.columns.len());
            for name in key.columns {
                let value = payload.get(name).or_else(|| existing.and_then(|(_, row)| row.get(name)));
                match (t.column(name), value) {
                    (Some(column), Some(v)) if !v.is_null() => matches.push((column, v.clone())),
                    _ => continue 'keys,
                }
            }
            let q = sql::exists(self.schema, t, &matches, existing.map(|(id, _)| id));
            if fetch_exists(self.pool, q).await? {
                return Err(AppError::Conflict(key.message.to_string()));
            }
        }
        Ok(())
    }
}

fn bound(q: &QueryBuf) -> sqlx::query::Query<'_, sqlx::Postgres, sqlx::postgres::PgArguments> {
    tracing::debug!(sql = %q.sql, params = q.params.len(), "query");
    q.params.iter().cloned().fold(sqlx::query(&q.sql), |query, p| p.bind(query))
}

pub(crate) async fn fetch_optional(pool: &PgPool, q: QueryBuf) -> Result<Option<PgRow>, AppError> {
    Ok(bound(&q).fetch_optional(pool).await?)
}

pub(crate) async fn fetch_all(pool: &PgPool, q: QueryBuf) -> Result<Vec<PgRow>, AppError> {
    Ok(bound(&q).fetch_all(pool).await?)
}

async fn fetch_exists(pool: &PgPool, q: QueryBuf) -> Result<bool, AppError> {
    let row = bound(&q).fetch_one(pool).await?;
    Ok(row.try_get::<bool, _>("exists")?)
}

/// Render a row as its Response shape: visible columns only, decimals as numbers, timestamps as
/// RFC 3339 and dates as `YYYY-MM-DD`.
pub fn row_to_json(t: &TableDef, row: &PgRow) -> Result<Value, AppError> {
    let mut map = Map::new();
    for c in t.visible_columns() {
        let name = c.name;
        let v = match c.ty {
            ColumnType::Uuid => row.try_get::<Option<Uuid>, _>(name)?.map(|u| Value::String(u.to_string())),
            ColumnType::Text | ColumnType::Enum(_) => row.try_get::<Option<String>, _>(name)?.map(Value::String),
            ColumnType::Int => row.try_get::<Option<i32>, _>(name)?.map(Value::from),
            ColumnType::BigInt => row.try_get::<Option<i64>, _>(name)?.map(Value::from),
            ColumnType::Decimal(..) => row
                .try_get::<Option<f64>, _>(name)?
                .and_then(Number::from_f64)
                .map(Value::Number),
            ColumnType::Bool => row.try_get::<Option<bool>, _>(name)?.map(Value::Bool),
            ColumnType::Timestamp => row
                .try_get::<Option<DateTime<Utc>>, _>(name)?
                .map(|ts| Value::String(ts.to_rfc3339())),
            ColumnType::Date => row
                .try_get::<Option<NaiveDate>, _>(name)?
                .map(|d| Value::String(d.format("%Y-%m-%d").to_string())),
            ColumnType::Json => row.try_get::<Option<Value>, _>(name)?,
        };
        map.insert(name.to_string(), v.unwrap_or(Value::Null));
    }
    Ok(Value::Object(map))
}
