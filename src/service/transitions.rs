//! Status side effects and single-purpose actions.
//!
//! Writes pass through `apply_side_effects` before they reach the store: numeric thresholds can
//! promote a status (progress reaching 100 marks the record completed), and writing a terminal
//! status stamps its timestamp column. Both yield to values the same write supplies explicitly.

use super::validation::{coerce_str, Payload};
use crate::caller::Caller;
use crate::catalog::{ActionDef, Assign, TableDef};
use crate::error::AppError;
use crate::sql::SqlValue;
use std::collections::HashMap;

pub fn apply_side_effects(t: &TableDef, payload: &mut Payload) {
    for th in t.thresholds {
        let reached = payload.get(th.when).and_then(SqlValue::as_f64).is_some_and(|n| n >= th.at_least);
        if !reached || payload.contains(th.column) {
            continue;
        }
        if let Some(column) = t.column(th.column) {
            payload.set(column, SqlValue::text(th.value));
        }
    }
    for stamp in t.stamps {
        let hit = match payload.get(stamp.column) {
            Some(SqlValue::Text(Some(tag))) => stamp.values.contains(&tag.as_str()),
            _ => false,
        };
        if !hit || payload.contains(stamp.sets) {
            continue;
        }
        if let Some(column) = t.column(stamp.sets) {
            payload.set(column, SqlValue::now());
        }
    }
}

/// Build the write for `PUT /{path}/{id}/{action}` from query parameters and fixed assignments.
pub fn action_payload(
    t: &TableDef,
    action: &ActionDef,
    params: &HashMap<String, String>,
    caller: Caller,
) -> Result<Payload, AppError> {
    let mut payload = Payload::new();
    for p in action.params {
        let Some(column) = t.column(p.column) else { continue };
        match params.get(p.name).map(|s| s.trim()).filter(|s| !s.is_empty()) {
            Some(raw) => payload.set(column, coerce_str(column, raw)?),
            None if p.required => return Err(AppError::Validation(format!("{} is required", p.name))),
            None => {}
        }
    }
    for (name, assign) in action.assigns {
        let Some(column) = t.column(name) else { continue };
        let value = match assign {
            Assign::Tag(tag) => SqlValue::text(tag),
            Assign::Flag(b) => SqlValue::Bool(Some(*b)),
            Assign::Now => SqlValue::now(),
            Assign::Caller => match caller.id() {
                Some(id) => SqlValue::Uuid(Some(id)),
                None => continue,
            },
        };
        payload.set(column, value);
    }
    apply_side_effects(t, &mut payload);
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::alerts::{ALERTS, NOTIFICATIONS};
    use crate::catalog::models::AI_TRAINING_JOBS;
    use crate::catalog::sites::SITE_MILESTONES;
    use crate::catalog::video::VIDEO_EXPORTS;
    use crate::service::validation::parse_body;
    use serde_json::json;
    use uuid::Uuid;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_terminal_status_stamps_time() {
        let mut p = parse_body(&VIDEO_EXPORTS, json!({"export_status": "completed"})).unwrap();
        apply_side_effects(&VIDEO_EXPORTS, &mut p);
        assert!(matches!(p.get("processing_completed_at"), Some(SqlValue::Timestamp(Some(_)))));
        assert!(!p.contains("processing_started_at"));
    }

    #[test]
    fn test_explicit_stamp_is_kept() {
        let mut p = parse_body(
            &VIDEO_EXPORTS,
            json!({"export_status": "failed", "processing_completed_at": "2024-01-01T00:00:00Z"}),
        )
        .unwrap();
        let before = p.get("processing_completed_at").cloned();
        apply_side_effects(&VIDEO_EXPORTS, &mut p);
        assert_eq!(p.get("processing_completed_at").cloned(), before);
    }

    #[test]
    fn test_threshold_completes_and_stamps() {
        let mut p = parse_body(&SITE_MILESTONES, json!({"completion_percentage": 100})).unwrap();
        apply_side_effects(&SITE_MILESTONES, &mut p);
        assert_eq!(p.get("status"), Some(&SqlValue::text("completed")));
        assert!(p.contains("completed_at"));

        let mut p = parse_body(&SITE_MILESTONES, json!({"completion_percentage": 99.5})).unwrap();
        apply_side_effects(&SITE_MILESTONES, &mut p);
        assert!(!p.contains("status"));
    }

    #[test]
    fn test_export_status_action() {
        let p = action_payload(
            &VIDEO_EXPORTS,
            VIDEO_EXPORTS.action("status").unwrap(),
            &params(&[("status", "completed"), ("download_url", "https://x/y.mp4")]),
            Caller::anonymous(),
        )
        .unwrap();
        assert_eq!(p.get("export_status"), Some(&SqlValue::text("completed")));
        assert_eq!(p.get("download_url"), Some(&SqlValue::text("https://x/y.mp4")));
        assert!(p.contains("processing_completed_at"));
    }

    #[test]
    fn test_action_rejects_missing_and_bad_params() {
        let action = VIDEO_EXPORTS.action("status").unwrap();
        assert!(action_payload(&VIDEO_EXPORTS, action, &HashMap::new(), Caller::anonymous()).is_err());
        assert!(action_payload(&VIDEO_EXPORTS, action, &params(&[("status", "done")]), Caller::anonymous()).is_err());
    }

    #[test]
    fn test_fixed_assignments() {
        let user = Uuid::new_v4();
        let p = action_payload(&ALERTS, ALERTS.action("acknowledge").unwrap(), &HashMap::new(), Caller::user(user)).unwrap();
        assert_eq!(p.get("status"), Some(&SqlValue::text("acknowledged")));
        assert_eq!(p.get("acknowledged_by"), Some(&SqlValue::Uuid(Some(user))));
        assert!(p.contains("acknowledged_at"));

        let p = action_payload(&ALERTS, ALERTS.action("acknowledge").unwrap(), &HashMap::new(), Caller::anonymous()).unwrap();
        assert!(!p.contains("acknowledged_by"));

        let p = action_payload(&NOTIFICATIONS, NOTIFICATIONS.action("read").unwrap(), &HashMap::new(), Caller::anonymous()).unwrap();
        assert_eq!(p.get("is_read"), Some(&SqlValue::Bool(Some(true))));
        assert!(p.contains("read_at"));
    }

    #[test]
    fn test_progress_action_may_override_status() {
        let action = AI_TRAINING_JOBS.action("progress").unwrap();
        let p = action_payload(&AI_TRAINING_JOBS, action, &params(&[("progress_percentage", "100")]), Caller::anonymous()).unwrap();
        assert_eq!(p.get("status"), Some(&SqlValue::text("completed")));
        assert!(p.contains("completed_at"));

        let p = action_payload(
            &AI_TRAINING_JOBS,
            action,
            &params(&[("progress_percentage", "100"), ("status", "failed")]),
            Caller::anonymous(),
        )
        .unwrap();
        assert_eq!(p.get("status"), Some(&SqlValue::text("failed")));
    }
}
