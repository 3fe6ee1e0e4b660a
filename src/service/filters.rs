//! List-query parsing: pagination, equality filters on declared columns, and date windows on
//! the resource's time column. Unknown parameters are ignored.

use super::validation::{coerce_str, parse_date};
use crate::catalog::{ColumnType, TableDef};
use crate::error::AppError;
use crate::sql::{Conditions, Page, SqlValue};
use chrono::{Duration, NaiveDate, Utc};
use std::collections::HashMap;

pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 1000;
pub const MAX_DAYS: i64 = 3650;

#[derive(Clone, Debug, Default)]
pub struct ListQuery {
    pub conditions: Conditions,
    pub page: Page,
}

impl ListQuery {
    pub fn parse(t: &TableDef, params: &HashMap<String, String>) -> Result<Self, AppError> {
        let page = Page {
            skip: int_param(params, "skip")?.unwrap_or(0),
            limit: int_param(params, "limit")?.unwrap_or(DEFAULT_LIMIT),
        };
        if page.skip < 0 {
            return Err(AppError::BadRequest("skip must be greater than or equal to 0".into()));
        }
        if !(1..=MAX_LIMIT).contains(&page.limit) {
            return Err(AppError::BadRequest(format!("limit must be between 1 and {}", MAX_LIMIT)));
        }
        Ok(ListQuery {
            conditions: conditions(t, params)?,
            page,
        })
    }
}

/// Filters and date window without pagination; shared by list and summary.
pub fn conditions(t: &TableDef, params: &HashMap<String, String>) -> Result<Conditions, AppError> {
    let mut out = Conditions::default();
    for name in t.filters {
        let Some(raw) = non_empty(params, name) else { continue };
        let Some(column) = t.column(name) else { continue };
        out.eq.push((column, coerce_str(column, raw)?));
    }

    let time_type = t.column(t.time_column).map(|c| c.ty).unwrap_or(ColumnType::Timestamp);
    let date_from = date_param(params, "date_from")?;
    let date_to = date_param(params, "date_to")?;
    if let (Some(from), Some(to)) = (date_from, date_to) {
        if from > to {
            return Err(AppError::Validation("date_from must be on or before date_to".into()));
        }
    }
    if let Some(from) = date_from {
        out.since = Some(day_start(&time_type, from));
    } else if let Some(days) = int_param(params, "days")? {
        if !(1..=MAX_DAYS).contains(&days) {
            return Err(AppError::BadRequest(format!("days must be between 1 and {}", MAX_DAYS)));
        }
        out.since = Some(days_ago(&time_type, days));
    }
    if let Some(to) = date_to {
        let next = to.succ_opt().ok_or_else(|| AppError::Validation("date_to is out of range".into()))?;
        out.before = Some(day_start(&time_type, next));
    }
    Ok(out)
}

/// Start of `days` days ago, typed for the time column.
pub fn days_ago(time_type: &ColumnType, days: i64) -> SqlValue {
    let at = Utc::now() - Duration::days(days);
    match time_type {
        ColumnType::Date => SqlValue::Date(Some(at.date_naive())),
        _ => SqlValue::Timestamp(Some(at)),
    }
}

fn day_start(time_type: &ColumnType, day: NaiveDate) -> SqlValue {
    match time_type {
        ColumnType::Date => SqlValue::Date(Some(day)),
        _ => SqlValue::Timestamp(day.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc())),
    }
}

fn non_empty<'a>(params: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    params.get(name).map(|s| s.trim()).filter(|s| !s.is_empty())
}

pub fn int_param(params: &HashMap<String, String>, name: &str) -> Result<Option<i64>, AppError> {
    non_empty(params, name)
        .map(|s| s.parse().map_err(|_| AppError::BadRequest(format!("{} must be an integer", name))))
        .transpose()
}

fn date_param(params: &HashMap<String, String>, name: &str) -> Result<Option<NaiveDate>, AppError> {
    non_empty(params, name)
        .map(|s| {
            parse_date(s).ok_or_else(|| AppError::Validation(format!("Invalid {} format. Use YYYY-MM-DD", name)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::alerts::ALERTS;
    use crate::catalog::models::AI_PREDICTIONS;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_defaults() {
        let q = ListQuery::parse(&ALERTS, &HashMap::new()).unwrap();
        assert_eq!(q.page, Page { skip: 0, limit: 100 });
        assert!(q.conditions.eq.is_empty());
        assert!(q.conditions.since.is_none());
    }

    #[test]
    fn test_declared_filters_only() {
        let q = ListQuery::parse(
            &ALERTS,
            &params(&[("priority", "critical"), ("status", "open"), ("title", "ignored"), ("foo", "bar")]),
        )
        .unwrap();
        let names: Vec<_> = q.conditions.eq.iter().map(|(c, _)| c.name).collect();
        assert_eq!(names, vec!["priority", "status"]);
    }

    #[test]
    fn test_bad_enum_filter_is_rejected() {
        let err = ListQuery::parse(&ALERTS, &params(&[("status", "closed")])).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("Invalid status 'closed'")));
    }

    #[test]
    fn test_pagination_bounds() {
        assert!(ListQuery::parse(&ALERTS, &params(&[("limit", "0")])).is_err());
        assert!(ListQuery::parse(&ALERTS, &params(&[("limit", "1001")])).is_err());
        assert!(ListQuery::parse(&ALERTS, &params(&[("skip", "-1")])).is_err());
        assert!(ListQuery::parse(&ALERTS, &params(&[("skip", "x")])).is_err());
        let q = ListQuery::parse(&ALERTS, &params(&[("skip", "10"), ("limit", "1000")])).unwrap();
        assert_eq!(q.page, Page { skip: 10, limit: 1000 });
    }

    #[test]
    fn test_date_window_is_inclusive() {
        let q = ListQuery::parse(&ALERTS, &params(&[("date_from", "2024-01-01"), ("date_to", "2024-01-31")])).unwrap();
        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap().and_utc();
        let until = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap().and_hms_opt(0, 0, 0).unwrap().and_utc();
        assert_eq!(q.conditions.since, Some(SqlValue::Timestamp(Some(from))));
        assert_eq!(q.conditions.before, Some(SqlValue::Timestamp(Some(until))));
    }

    #[test]
    fn test_date_window_on_date_column() {
        let q = ListQuery::parse(&AI_PREDICTIONS, &params(&[("date_to", "2024-02-29")])).unwrap();
        assert_eq!(q.conditions.before, Some(SqlValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1))));
        let q = ListQuery::parse(&AI_PREDICTIONS, &params(&[("days", "7")])).unwrap();
        assert!(matches!(q.conditions.since, Some(SqlValue::Date(Some(_)))));
    }

    #[test]
    fn test_bad_dates() {
        assert!(ListQuery::parse(&ALERTS, &params(&[("date_from", "01-01-2024")])).is_err());
        assert!(ListQuery::parse(&ALERTS, &params(&[("date_from", "2024-02-01"), ("date_to", "2024-01-01")])).is_err());
        assert!(ListQuery::parse(&ALERTS, &params(&[("days", "0")])).is_err());
    }
}
