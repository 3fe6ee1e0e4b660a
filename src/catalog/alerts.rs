//! Alert rules, alerts, escalations and user notifications.

use super::enums::*;
use super::types::*;

pub static ALERT_RULES: TableDef = TableDef {
    table: "alert_rules",
    path: "alert-rules",
    label: "Alert rule",
    columns: &[
        uuid("site_id").owned_by("sites"),
        text("name").required(),
        tag("detection_type", &DetectionType::DEF).required(),
        decimal("min_confidence", 5, 4).required().default("0.5"),
        tag("priority", &AlertPriority::DEF).required().default("'medium'"),
        boolean("is_enabled").required().default("true"),
        json("conditions"),
        json("notify_roles"),
        int("cooldown_seconds").required().default("300"),
    ],
    filters: &["site_id", "detection_type", "priority", "is_enabled"],
    actions: &[
        ActionDef {
            name: "enable",
            params: &[],
            assigns: &[("is_enabled", Assign::Flag(true))],
        },
        ActionDef {
            name: "disable",
            params: &[],
            assigns: &[("is_enabled", Assign::Flag(false))],
        },
    ],
    ..TableDef::BASE
};

pub static ALERTS: TableDef = TableDef {
    table: "alerts",
    path: "alerts",
    label: "Alert",
    columns: &[
        uuid("site_id").required().references("sites"),
        uuid("camera_id").weak_ref("cameras"),
        uuid("detection_id").weak_ref("ai_detections"),
        uuid("rule_id").weak_ref("alert_rules"),
        tag("alert_type", &AlertType::DEF).required(),
        tag("priority", &AlertPriority::DEF).required().default("'medium'"),
        tag("status", &AlertStatus::DEF).required().default("'open'"),
        text("title").required(),
        text("message"),
        timestamp("triggered_at").required().default("now()"),
        uuid("acknowledged_by").weak_ref("users"),
        timestamp("acknowledged_at"),
        uuid("resolved_by").weak_ref("users"),
        timestamp("resolved_at"),
        text("resolution_notes"),
        json("payload"),
    ],
    time_column: "triggered_at",
    filters: &["site_id", "camera_id", "rule_id", "alert_type", "priority", "status"],
    indexes: &[&["site_id", "status"], &["site_id", "triggered_at"], &["priority", "status"]],
    stamps: &[
        Stamp {
            column: "status",
            values: &[AlertStatus::Acknowledged.as_str()],
            sets: "acknowledged_at",
        },
        Stamp {
            column: "status",
            values: &[AlertStatus::Resolved.as_str(), AlertStatus::FalsePositive.as_str()],
            sets: "resolved_at",
        },
    ],
    actions: &[
        ActionDef {
            name: "acknowledge",
            params: &[],
            assigns: &[
                ("status", Assign::Tag(AlertStatus::Acknowledged.as_str())),
                ("acknowledged_by", Assign::Caller),
            ],
        },
        ActionDef {
            name: "resolve",
            params: &[ActionParam {
                name: "resolution_notes",
                column: "resolution_notes",
                required: false,
            }],
            assigns: &[
                ("status", Assign::Tag(AlertStatus::Resolved.as_str())),
                ("resolved_by", Assign::Caller),
            ],
        },
        ActionDef {
            name: "status",
            params: &[ActionParam {
                name: "status",
                column: "status",
                required: true,
            }],
            assigns: &[],
        },
    ],
    summary: Some(SummaryDef {
        group_by: &["status", "priority", "alert_type"],
        averages: &[],
    }),
    ..TableDef::BASE
};

pub static ALERT_ESCALATIONS: TableDef = TableDef {
    table: "alert_escalations",
    path: "alert-escalations",
    label: "Escalation",
    columns: &[
        uuid("alert_id").required().owned_by("alerts"),
        uuid("escalated_to").required().references("users"),
        int("level").required().default("1"),
        text("reason"),
        timestamp("escalated_at").required().default("now()"),
        tag("status", &EscalationStatus::DEF).required().default("'pending'"),
    ],
    time_column: "escalated_at",
    filters: &["alert_id", "escalated_to", "status"],
    ..TableDef::BASE
};

pub static NOTIFICATIONS: TableDef = TableDef {
    table: "notifications",
    path: "notifications",
    label: "Notification",
    columns: &[
        uuid("user_id").required().owned_by("users"),
        uuid("alert_id").weak_ref("alerts"),
        tag("channel", &NotificationChannel::DEF).required().default("'in_app'"),
        text("title").required(),
        text("body"),
        boolean("is_read").required().default("false"),
        timestamp("read_at"),
        timestamp("sent_at").required().default("now()"),
    ],
    time_column: "sent_at",
    filters: &["user_id", "alert_id", "channel", "is_read"],
    indexes: &[&["user_id", "is_read"]],
    actions: &[ActionDef {
        name: "read",
        params: &[],
        assigns: &[("is_read", Assign::Flag(true)), ("read_at", Assign::Now)],
    }],
    ..TableDef::BASE
};

pub(super) static TABLES: &[&TableDef] = &[&ALERT_RULES, &ALERTS, &ALERT_ESCALATIONS, &NOTIFICATIONS];
