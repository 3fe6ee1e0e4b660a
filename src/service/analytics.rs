//! Aggregate endpoints: per-resource summaries, the cross-resource dashboard and prediction
//! validation. Every call recomputes from the filtered rows.

use super::crud::{fetch_all, fetch_optional, row_to_json, CrudService};
use super::filters::days_ago;
use super::validation;
use crate::catalog::detections::{AI_DETECTIONS, PPE_VIOLATIONS, SAFETY_INCIDENTS};
use crate::catalog::enums::{AlertPriority, AlertStatus, CameraStatus, PredictionStatus, SiteStatus, ViolationStatus};
use crate::catalog::{alerts::ALERTS, cameras::CAMERAS, models::AI_PREDICTIONS, sites::SITES, TableDef};
use crate::error::AppError;
use crate::sql::{self, Conditions, SqlValue};
use serde_json::{json, Map, Number, Value};
use sqlx::Row;
use uuid::Uuid;

pub const DEFAULT_DASHBOARD_DAYS: i64 = 7;

impl CrudService<'_> {
    /// `{"total", "by_<col>": {tag: n}, "avg_<col>"}` over the filtered rows.
    pub async fn summary(&self, t: &TableDef, conditions: &Conditions) -> Result<Value, AppError> {
        let (group_by, averages) = t.summary.map(|s| (s.group_by, s.averages)).unwrap_or((&[], &[]));
        let q = sql::aggregate(self.schema, t, conditions, averages);
        let row = fetch_optional(self.pool, q).await?.ok_or(AppError::Db(sqlx::Error::RowNotFound))?;

        let mut out = Map::new();
        out.insert("total".into(), Value::from(row.try_get::<i64, _>("total")?));
        for column in group_by {
            let rows = fetch_all(self.pool, sql::group_counts(self.schema, t, conditions, column)).await?;
            let mut counts = Map::new();
            for r in &rows {
                counts.insert(r.try_get::<String, _>("key")?, Value::from(r.try_get::<i64, _>("count")?));
            }
            out.insert(format!("by_{}", column), Value::Object(counts));
        }
        for column in averages {
            let key = format!("avg_{}", column);
            let avg = row.try_get::<Option<f64>, _>(key.as_str())?;
            out.insert(key, avg.and_then(Number::from_f64).map(Value::Number).unwrap_or(Value::Null));
        }
        Ok(Value::Object(out))
    }

    /// Headline counts across sites, cameras, alerts, detections, incidents and PPE violations,
    /// optionally scoped to one site. Windowed counts cover the last `days` days.
    pub async fn dashboard(&self, site_id: Option<Uuid>, days: i64) -> Result<Value, AppError> {
        let scoped = |t: &TableDef| scope(t, site_id);
        let windowed = |t: &TableDef| {
            let time_type = t.column(t.time_column).map(|c| c.ty);
            let base = scope(t, site_id);
            match time_type {
                Some(ty) => base.since(days_ago(&ty, days)),
                None => base,
            }
        };

        let (active_sites, total_cameras, cameras_online, open_alerts, critical_alerts, detections, incidents, open_ppe) = tokio::try_join!(
            self.count(&SITES, with_tag(scoped(&SITES), &SITES, "status", SiteStatus::Active.as_str())),
            self.count(&CAMERAS, scoped(&CAMERAS)),
            self.count(&CAMERAS, with_tag(scoped(&CAMERAS), &CAMERAS, "status", CameraStatus::Online.as_str())),
            self.count(&ALERTS, with_tag(scoped(&ALERTS), &ALERTS, "status", AlertStatus::Open.as_str())),
            self.count(
                &ALERTS,
                with_tag(
                    with_tag(scoped(&ALERTS), &ALERTS, "status", AlertStatus::Open.as_str()),
                    &ALERTS,
                    "priority",
                    AlertPriority::Critical.as_str()
                )
            ),
            self.count(&AI_DETECTIONS, windowed(&AI_DETECTIONS)),
            self.count(&SAFETY_INCIDENTS, windowed(&SAFETY_INCIDENTS)),
            self.count(
                &PPE_VIOLATIONS,
                with_tag(scoped(&PPE_VIOLATIONS), &PPE_VIOLATIONS, "status", ViolationStatus::Open.as_str())
            ),
        )?;

        Ok(json!({
            "site_id": site_id,
            "period_days": days,
            "active_sites": active_sites,
            "total_cameras": total_cameras,
            "cameras_online": cameras_online,
            "open_alerts": open_alerts,
            "critical_alerts": critical_alerts,
            "detections_in_period": detections,
            "incidents_in_period": incidents,
            "open_ppe_violations": open_ppe,
        }))
    }

    /// Record the observed value for a prediction, derive its percentage error and mark it validated.
    pub async fn validate_prediction(&self, id: Uuid, actual: f64) -> Result<Value, AppError> {
        let t = &AI_PREDICTIONS;
        if let Some(column) = t.column("actual_value") {
            validation::check_range(column, actual)?;
        }
        let existing = self.get(t, id).await?;
        let predicted = existing.get("predicted_value").and_then(Value::as_f64);
        let error = predicted
            .and_then(|p| percentage_error(p, actual))
            .map(|e| match t.column("error_percentage") {
                Some(column) => validation::clamp_to_column(column, e),
                None => e,
            });

        let mut values = Vec::with_capacity(4);
        for (name, value) in [
            ("actual_value", SqlValue::Float(Some(actual))),
            ("error_percentage", SqlValue::Float(error)),
            ("status", SqlValue::text(PredictionStatus::Validated.as_str())),
            ("validated_at", SqlValue::now()),
        ] {
            if let Some(column) = t.column(name) {
                values.push((column, value));
            }
        }
        let q = sql::update(self.schema, t, id, &values);
        let row = fetch_optional(self.pool, q)
            .await?
            .ok_or_else(|| AppError::NotFound(t.not_found_message()))?;
        row_to_json(t, &row)
    }

    async fn count(&self, t: &TableDef, conditions: Conditions) -> Result<i64, AppError> {
        let q = sql::aggregate(self.schema, t, &conditions, &[]);
        let row = fetch_optional(self.pool, q).await?.ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
        Ok(row.try_get::<i64, _>("total")?)
    }
}

/// `|predicted - actual| / |actual| * 100`; undefined when the actual value is zero.
pub fn percentage_error(predicted: f64, actual: f64) -> Option<f64> {
    if actual == 0.0 {
        return None;
    }
    Some((predicted - actual).abs() / actual.abs() * 100.0)
}

/// Restrict to one site: sites match on `id`, everything else on `site_id`.
fn scope(t: &TableDef, site_id: Option<Uuid>) -> Conditions {
    let key = if t.table == SITES.table { "id" } else { "site_id" };
    match (site_id, t.column(key)) {
        (Some(id), Some(column)) => Conditions::default().eq(column, SqlValue::Uuid(Some(id))),
        _ => Conditions::default(),
    }
}

fn with_tag(conditions: Conditions, t: &TableDef, column: &str, tag: &str) -> Conditions {
    match t.column(column) {
        Some(c) => conditions.eq(c, SqlValue::text(tag)),
        None => conditions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_error() {
        assert_eq!(percentage_error(110.0, 100.0), Some(10.0));
        assert_eq!(percentage_error(90.0, 100.0), Some(10.0));
        assert_eq!(percentage_error(-5.0, -10.0), Some(50.0));
        assert_eq!(percentage_error(1.0, 0.0), None);
    }

    #[test]
    fn test_scope_uses_id_for_sites() {
        let id = Uuid::new_v4();
        let c = scope(&SITES, Some(id));
        assert_eq!(c.eq.len(), 1);
        assert_eq!(c.eq[0].0.name, "id");
        let c = scope(&ALERTS, Some(id));
        assert_eq!(c.eq[0].0.name, "site_id");
        assert!(scope(&ALERTS, None).eq.is_empty());
    }

    #[test]
    fn test_with_tag_adds_filter() {
        let c = with_tag(Conditions::default(), &ALERTS, "priority", "critical");
        assert_eq!(c.eq[0].1, SqlValue::text("critical"));
        assert!(with_tag(Conditions::default(), &ALERTS, "nope", "x").eq.is_empty());
    }
}
