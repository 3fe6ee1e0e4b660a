//! Administration: system configuration, dashboards, audit trail and generated reports.

use super::enums::*;
use super::types::*;

pub static SYSTEM_CONFIGS: TableDef = TableDef {
    table: "system_configs",
    path: "system-configs",
    label: "Config",
    columns: &[
        text("key").required(),
        json("value").required(),
        tag("category", &ConfigCategory::DEF).required().default("'general'"),
        text("description"),
        boolean("is_editable").required().default("true"),
        uuid("updated_by").weak_ref("users"),
    ],
    filters: &["category", "is_editable"],
    unique: &[UniqueKey {
        columns: &["key"],
        message: "Config key already exists",
    }],
    caller_column: Some("updated_by"),
    ..TableDef::BASE
};

pub static DASHBOARDS: TableDef = TableDef {
    table: "dashboards",
    path: "dashboards",
    label: "Dashboard",
    columns: &[
        uuid("owner_id").required().owned_by("users"),
        uuid("site_id").weak_ref("sites"),
        text("name").required(),
        json("layout"),
        boolean("is_default").required().default("false"),
        tag("visibility", &DashboardVisibility::DEF).required().default("'private'"),
    ],
    filters: &["owner_id", "site_id", "visibility", "is_default"],
    caller_column: Some("owner_id"),
    ..TableDef::BASE
};

pub static DASHBOARD_WIDGETS: TableDef = TableDef {
    table: "dashboard_widgets",
    path: "dashboard-widgets",
    label: "Widget",
    columns: &[
        uuid("dashboard_id").required().owned_by("dashboards"),
        tag("widget_type", &WidgetType::DEF).required(),
        text("title").required(),
        json("position"),
        json("config"),
        int("refresh_seconds").required().default("60"),
    ],
    filters: &["dashboard_id", "widget_type"],
    ..TableDef::BASE
};

pub static AUDIT_LOGS: TableDef = TableDef {
    table: "audit_logs",
    path: "audit-logs",
    label: "Audit log",
    columns: &[
        uuid("user_id").weak_ref("users"),
        tag("action", &AuditAction::DEF).required(),
        text("entity_type").required(),
        uuid("entity_id"),
        json("changes"),
        text("ip_address"),
        timestamp("occurred_at").required().default("now()"),
    ],
    audit: Audit::AppendOnly,
    time_column: "occurred_at",
    filters: &["user_id", "action", "entity_type", "entity_id"],
    indexes: &[&["entity_type", "entity_id"], &["user_id", "occurred_at"]],
    ops: Ops::READ_CREATE,
    caller_column: Some("user_id"),
    summary: Some(SummaryDef {
        group_by: &["action", "entity_type"],
        averages: &[],
    }),
    ..TableDef::BASE
};

pub static REPORTS: TableDef = TableDef {
    table: "reports",
    path: "reports",
    label: "Report",
    columns: &[
        uuid("site_id").weak_ref("sites"),
        tag("report_type", &ReportType::DEF).required(),
        text("title").required(),
        json("parameters"),
        date("period_start"),
        date("period_end"),
        tag("status", &ReportStatus::DEF).required().default("'queued'"),
        text("file_url").format(Format::Url),
        uuid("generated_by").weak_ref("users"),
        timestamp("completed_at"),
    ],
    filters: &["site_id", "report_type", "status", "generated_by"],
    caller_column: Some("generated_by"),
    spans: &[Span {
        start: "period_start",
        end: "period_end",
        strict: false,
    }],
    stamps: &[Stamp {
        column: "status",
        values: &[ReportStatus::Completed.as_str(), ReportStatus::Failed.as_str()],
        sets: "completed_at",
    }],
    actions: &[ActionDef {
        name: "status",
        params: &[
            ActionParam {
                name: "status",
                column: "status",
                required: true,
            },
            ActionParam {
                name: "file_url",
                column: "file_url",
                required: false,
            },
        ],
        assigns: &[],
    }],
    summary: Some(SummaryDef {
        group_by: &["report_type", "status"],
        averages: &[],
    }),
    ..TableDef::BASE
};

pub(super) static TABLES: &[&TableDef] = &[&SYSTEM_CONFIGS, &DASHBOARDS, &DASHBOARD_WIDGETS, &AUDIT_LOGS, &REPORTS];
