//! Request validation against the catalogue: JSON and query-string values are coerced into
//! typed bind values per column, then checked for required fields, formats and date spans.

use crate::catalog::{ColumnDef, ColumnType, Format, TableDef};
use crate::error::AppError;
use crate::sql::SqlValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::OnceLock;

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
const URL_PATTERN: &str = r"^https?://[^\s/$.?#][^\s]*$";

static EMAIL_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static URL_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

/// Validated column writes, in the order they were supplied.
#[derive(Clone, Debug, Default)]
pub struct Payload {
    values: Vec<(&'static ColumnDef, SqlValue)>,
}

impl Payload {
    pub fn new() -> Self {
        Payload::default()
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.values.iter().find(|(c, _)| c.name == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Insert or replace the value for `column`.
    pub fn set(&mut self, column: &'static ColumnDef, value: SqlValue) {
        match self.values.iter_mut().find(|(c, _)| c.name == column.name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((column, value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[(&'static ColumnDef, SqlValue)] {
        &self.values
    }

    /// Re-read a stored row (as rendered for clients) so merged checks can see prior values.
    pub fn from_row(t: &TableDef, row: &Value) -> Self {
        let mut out = Payload::new();
        for c in t.visible_columns() {
            if let Some(v) = row.get(c.name) {
                if let Ok(value) = coerce(c, v) {
                    out.set(c, value);
                }
            }
        }
        out
    }
}

/// Parse a JSON body into writable column values. Unknown and server-managed keys are ignored.
pub fn parse_body(t: &TableDef, body: Value) -> Result<Payload, AppError> {
    let Value::Object(map) = body else {
        return Err(AppError::Validation("Request body must be a JSON object".into()));
    };
    let mut payload = Payload::new();
    for (key, value) in &map {
        let Some(column) = t.column(key) else { continue };
        if !column.is_writable() {
            continue;
        }
        if value.is_null() && !column.nullable {
            return Err(AppError::Validation(format!("{} may not be null", column.name)));
        }
        payload.set(column, coerce(column, value)?);
    }
    Ok(payload)
}

/// Every column that has neither a value nor a store default must be present on create.
pub fn check_required(t: &TableDef, payload: &Payload) -> Result<(), AppError> {
    for column in t.columns.iter().filter(|c| c.required_on_create()) {
        match payload.get(column.name) {
            Some(v) if !v.is_null() => {}
            _ => return Err(AppError::Validation(format!("{} is required", column.name))),
        }
    }
    Ok(())
}

/// Declared start/end pairs must be ordered whenever both ends are known. `existing` supplies the
/// stored row on update so a write touching one end is checked against the other.
pub fn check_spans(t: &TableDef, payload: &Payload, existing: Option<&Payload>) -> Result<(), AppError> {
    let lookup = |name: &str| {
        payload
            .get(name)
            .or_else(|| existing.and_then(|e| e.get(name)))
            .filter(|v| !v.is_null())
    };
    for span in t.spans {
        if !payload.contains(span.start) && !payload.contains(span.end) {
            continue;
        }
        let (Some(start), Some(end)) = (lookup(span.start), lookup(span.end)) else {
            continue;
        };
        let ordered = match start.compare(end) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => !span.strict,
            _ => false,
        };
        if !ordered {
            let relation = if span.strict { "before" } else { "on or before" };
            return Err(AppError::Validation(format!("{} must be {} {}", span.start, relation, span.end)));
        }
    }
    Ok(())
}

/// Coerce one JSON value into the column's bind type.
pub fn coerce(column: &ColumnDef, value: &Value) -> Result<SqlValue, AppError> {
    if value.is_null() {
        return Ok(SqlValue::null_for(&column.ty));
    }
    let name = column.name;
    let invalid = |what: &str| AppError::Validation(format!("{} must be {}", name, what));
    Ok(match &column.ty {
        ColumnType::Uuid => {
            let s = value.as_str().ok_or_else(|| invalid("a valid UUID"))?;
            SqlValue::Uuid(Some(uuid::Uuid::parse_str(s.trim()).map_err(|_| invalid("a valid UUID"))?))
        }
        ColumnType::Text => {
            let s = value.as_str().ok_or_else(|| invalid("a string"))?;
            check_format(column, s)?;
            SqlValue::Text(Some(s.to_string()))
        }
        ColumnType::Enum(def) => {
            let s = value.as_str().ok_or_else(|| invalid("a string"))?;
            if !def.contains(s) {
                return Err(AppError::Validation(format!(
                    "Invalid {} '{}'. Must be one of: {}",
                    name,
                    s,
                    def.values.join(", ")
                )));
            }
            SqlValue::Text(Some(s.to_string()))
        }
        ColumnType::Int => {
            let n = integer(value).ok_or_else(|| invalid("an integer"))?;
            SqlValue::Int(Some(i32::try_from(n).map_err(|_| invalid("a 32-bit integer"))?))
        }
        ColumnType::BigInt => SqlValue::BigInt(Some(integer(value).ok_or_else(|| invalid("an integer"))?)),
        ColumnType::Decimal(precision, scale) => {
            let n = number(value).filter(|n| n.is_finite()).ok_or_else(|| invalid("a number"))?;
            if !fits_numeric(n, *precision, *scale) {
                return Err(out_of_range(name));
            }
            SqlValue::Float(Some(n))
        }
        ColumnType::Bool => SqlValue::Bool(Some(boolean(value).ok_or_else(|| invalid("a boolean"))?)),
        ColumnType::Timestamp => {
            let s = value.as_str().ok_or_else(|| invalid("an ISO 8601 datetime"))?;
            SqlValue::Timestamp(Some(parse_timestamp(s).ok_or_else(|| invalid("an ISO 8601 datetime"))?))
        }
        ColumnType::Date => {
            let s = value.as_str().ok_or_else(|| invalid("a date in YYYY-MM-DD format"))?;
            SqlValue::Date(Some(parse_date(s).ok_or_else(|| invalid("a date in YYYY-MM-DD format"))?))
        }
        ColumnType::Json => SqlValue::Json(Some(value.clone())),
    })
}

/// Coerce a query-string value. Numbers and booleans are parsed from text; JSON columns accept
/// a JSON document and fall back to a plain string.
pub fn coerce_str(column: &ColumnDef, raw: &str) -> Result<SqlValue, AppError> {
    let value = match &column.ty {
        ColumnType::Json => serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())),
        _ => Value::String(raw.to_string()),
    };
    coerce(column, &value)
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reject a number the column's `NUMERIC(p, s)` type cannot hold. Other column types pass.
pub fn check_range(column: &ColumnDef, n: f64) -> Result<(), AppError> {
    match column.ty {
        ColumnType::Decimal(precision, scale) if !n.is_finite() || !fits_numeric(n, precision, scale) => {
            Err(out_of_range(column.name))
        }
        _ => Ok(()),
    }
}

/// Clamp a computed number into the column's `NUMERIC(p, s)` range.
pub fn clamp_to_column(column: &ColumnDef, n: f64) -> f64 {
    match column.ty {
        ColumnType::Decimal(precision, scale) => {
            let max = 10f64.powi(i32::from(precision) - i32::from(scale)) - 10f64.powi(-i32::from(scale));
            n.clamp(-max, max)
        }
        _ => n,
    }
}

fn out_of_range(name: &str) -> AppError {
    AppError::Validation(format!("{} is out of range", name))
}

/// Whether `n` rounded to `scale` places fits `NUMERIC(precision, scale)`.
pub fn fits_numeric(n: f64, precision: u8, scale: u8) -> bool {
    let factor = 10f64.powi(i32::from(scale));
    let rounded = (n.abs() * factor).round() / factor;
    rounded < 10f64.powi(i32::from(precision) - i32::from(scale))
}

fn boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// RFC 3339, or a naive datetime / bare date taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0)).map(|dt| dt.and_utc())
}

fn check_format(column: &ColumnDef, s: &str) -> Result<(), AppError> {
    let (cell, pattern, what) = match column.format {
        Format::Any => return Ok(()),
        Format::Email => (&EMAIL_RE, EMAIL_PATTERN, "a valid email"),
        Format::Url => (&URL_RE, URL_PATTERN, "a valid http(s) URL"),
    };
    let re = cell
        .get_or_init(|| Regex::new(pattern))
        .as_ref()
        .map_err(|_| AppError::Validation(format!("invalid pattern for {}", column.name)))?;
    if !re.is_match(s) {
        return Err(AppError::Validation(format!("{} must be {}", column.name, what)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::{AI_PREDICTIONS, AI_TRAINING_JOBS};
    use crate::catalog::personnel::USERS;
    use crate::catalog::sites::SITES;
    use crate::catalog::video::VIDEO_EXPORTS;
    use serde_json::json;

    fn col(t: &TableDef, name: &str) -> &'static ColumnDef {
        t.column(name).unwrap()
    }

    #[test]
    fn test_coerce_by_column_type() {
        assert_eq!(coerce(col(&SITES, "budget"), &json!(12.5)).unwrap(), SqlValue::Float(Some(12.5)));
        assert_eq!(coerce(col(&SITES, "budget"), &json!("7")).unwrap(), SqlValue::Float(Some(7.0)));
        assert_eq!(
            coerce(col(&SITES, "start_date"), &json!("2024-03-01")).unwrap(),
            SqlValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1))
        );
        assert_eq!(coerce(col(&SITES, "status"), &json!("on_hold")).unwrap(), SqlValue::text("on_hold"));
        assert_eq!(coerce(col(&SITES, "metadata"), &json!({"a": [1]})).unwrap(), SqlValue::Json(Some(json!({"a": [1]}))));
        assert!(coerce(col(&SITES, "project_manager_id"), &Value::Null).unwrap().is_null());
    }

    #[test]
    fn test_coerce_rejects_bad_values() {
        let err = coerce(col(&SITES, "status"), &json!("paused")).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.starts_with("Invalid status 'paused'")));
        assert!(coerce(col(&SITES, "start_date"), &json!("03/01/2024")).is_err());
        assert!(coerce(col(&SITES, "project_manager_id"), &json!("abc")).is_err());
        assert!(coerce(col(&SITES, "name"), &json!(5)).is_err());
        assert!(coerce(col(&USERS, "email"), &json!("nobody")).is_err());
        assert!(coerce(col(&USERS, "email"), &json!("a@b.io")).is_ok());
    }

    #[test]
    fn test_decimal_range_follows_precision() {
        let progress = col(&AI_TRAINING_JOBS, "progress_percentage");
        assert_eq!(coerce(progress, &json!(100)).unwrap(), SqlValue::Float(Some(100.0)));
        assert_eq!(coerce(progress, &json!(-999.99)).unwrap(), SqlValue::Float(Some(-999.99)));
        let err = coerce(progress, &json!(1000)).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "progress_percentage is out of range"));
        assert!(coerce(progress, &json!(999.996)).is_err());
        assert!(coerce_str(progress, "1e6").is_err());

        let actual = col(&AI_PREDICTIONS, "actual_value");
        assert!(check_range(actual, 1.5).is_ok());
        assert!(check_range(actual, 1e12).is_err());
        let error = col(&AI_PREDICTIONS, "error_percentage");
        assert!((clamp_to_column(error, 99_999_900.0) - 999_999.9999).abs() < 1e-6);
        assert_eq!(clamp_to_column(error, 12.5), 12.5);
        assert!(check_range(error, clamp_to_column(error, 1e20)).is_ok());

        assert!(fits_numeric(99_999_999.99, 10, 2));
        assert!(!fits_numeric(100_000_000.0, 10, 2));
        assert!(!fits_numeric(1.0, 2, 2));
        assert!(fits_numeric(0.99, 2, 2));
    }

    #[test]
    fn test_format_checks_repeat_consistently() {
        let email = col(&USERS, "email");
        for _ in 0..3 {
            assert!(coerce(email, &json!("ops@site.io")).is_ok());
            assert!(coerce(email, &json!("ops at site")).is_err());
        }
    }

    #[test]
    fn test_coerce_str_parses_query_values() {
        let c = col(&VIDEO_EXPORTS, "file_size_bytes");
        assert_eq!(coerce_str(c, "1024").unwrap(), SqlValue::BigInt(Some(1024)));
        assert!(coerce_str(c, "big").is_err());
        assert!(coerce_str(col(&VIDEO_EXPORTS, "download_url"), "ftp://x").is_err());
        assert!(coerce_str(col(&VIDEO_EXPORTS, "download_url"), "https://x/y.mp4").is_ok());
    }

    #[test]
    fn test_timestamps_accept_common_shapes() {
        assert!(parse_timestamp("2024-05-01T10:00:00Z").is_some());
        assert!(parse_timestamp("2024-05-01T10:00:00+02:00").is_some());
        assert!(parse_timestamp("2024-05-01T10:00:00.123").is_some());
        assert!(parse_timestamp("2024-05-01").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_parse_body_ignores_unknown_and_read_only() {
        let p = parse_body(&SITES, json!({"name": "A", "code": "SA-1", "id": "x", "created_at": "x", "bogus": 1})).unwrap();
        assert_eq!(p.values().len(), 2);
        assert!(parse_body(&SITES, json!([1, 2])).is_err());
        assert!(parse_body(&SITES, json!({"name": null})).is_err());
    }

    #[test]
    fn test_required_fields() {
        let p = parse_body(&SITES, json!({"name": "Site A"})).unwrap();
        let err = check_required(&SITES, &p).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "code is required"));
        let p = parse_body(&SITES, json!({"name": "Site A", "code": "SA-001"})).unwrap();
        check_required(&SITES, &p).unwrap();
    }

    #[test]
    fn test_spans() {
        let p = parse_body(
            &AI_TRAINING_JOBS,
            json!({"scheduled_start": "2024-01-02T00:00:00Z", "scheduled_end": "2024-01-02T00:00:00Z"}),
        )
        .unwrap();
        assert!(check_spans(&AI_TRAINING_JOBS, &p, None).is_err());

        let p = parse_body(&SITES, json!({"start_date": "2024-01-02", "expected_end_date": "2024-01-02"})).unwrap();
        assert!(check_spans(&SITES, &p, None).is_ok());

        let existing = parse_body(&SITES, json!({"start_date": "2024-06-01"})).unwrap();
        let p = parse_body(&SITES, json!({"expected_end_date": "2024-01-01"})).unwrap();
        assert!(check_spans(&SITES, &p, Some(&existing)).is_err());
        assert!(check_spans(&SITES, &Payload::new(), Some(&existing)).is_ok());
    }

    #[test]
    fn test_from_row_reads_rendered_values() {
        let row = json!({"id": "6a2f41a3-c54f-4d2c-9f0a-4c2f8d7b6e11", "name": "A", "budget": 10.0, "status": "active"});
        let p = Payload::from_row(&SITES, &row);
        assert_eq!(p.get("budget"), Some(&SqlValue::Float(Some(10.0))));
        assert!(p.get("id").and_then(|v| v.as_uuid()).is_some());
    }
}
