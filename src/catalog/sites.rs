//! Sites, zones, milestones, daily reports and on-site equipment.

use super::enums::*;
use super::types::*;

pub static SITES: TableDef = TableDef {
    table: "sites",
    path: "sites",
    label: "Site",
    columns: &[
        text("name").required(),
        text("code").required(),
        text("address"),
        text("city"),
        text("country"),
        decimal("latitude", 9, 6),
        decimal("longitude", 9, 6),
        tag("status", &SiteStatus::DEF).required().default("'active'"),
        uuid("project_manager_id").weak_ref("users"),
        date("start_date"),
        date("expected_end_date"),
        decimal("budget", 14, 2),
        json("metadata"),
    ],
    filters: &["status", "project_manager_id", "city", "country"],
    unique: &[UniqueKey {
        columns: &["code"],
        message: "Site code already exists",
    }],
    spans: &[Span {
        start: "start_date",
        end: "expected_end_date",
        strict: false,
    }],
    summary: Some(SummaryDef {
        group_by: &["status"],
        averages: &["budget"],
    }),
    ..TableDef::BASE
};

pub static SITE_ZONES: TableDef = TableDef {
    table: "site_zones",
    path: "site-zones",
    label: "Zone",
    columns: &[
        uuid("site_id").required().owned_by("sites"),
        text("name").required(),
        tag("zone_type", &ZoneType::DEF).required(),
        tag("risk_level", &RiskLevel::DEF).required().default("'low'"),
        json("boundary"),
        int("max_occupancy"),
        boolean("is_active").required().default("true"),
    ],
    filters: &["site_id", "zone_type", "risk_level", "is_active"],
    indexes: &[&["site_id", "zone_type"]],
    summary: Some(SummaryDef {
        group_by: &["zone_type", "risk_level"],
        averages: &["max_occupancy"],
    }),
    ..TableDef::BASE
};

pub static SITE_MILESTONES: TableDef = TableDef {
    table: "site_milestones",
    path: "site-milestones",
    label: "Milestone",
    columns: &[
        uuid("site_id").required().owned_by("sites"),
        text("name").required(),
        text("description"),
        date("due_date"),
        tag("status", &MilestoneStatus::DEF).required().default("'pending'"),
        decimal("completion_percentage", 5, 2).required().default("0"),
        timestamp("completed_at"),
    ],
    time_column: "due_date",
    filters: &["site_id", "status"],
    indexes: &[&["site_id", "status"]],
    stamps: &[Stamp {
        column: "status",
        values: &[MilestoneStatus::Completed.as_str()],
        sets: "completed_at",
    }],
    thresholds: &[Threshold {
        when: "completion_percentage",
        at_least: 100.0,
        column: "status",
        value: MilestoneStatus::Completed.as_str(),
    }],
    actions: &[ActionDef {
        name: "progress",
        params: &[
            ActionParam {
                name: "completion_percentage",
                column: "completion_percentage",
                required: true,
            },
            ActionParam {
                name: "status",
                column: "status",
                required: false,
            },
        ],
        assigns: &[],
    }],
    summary: Some(SummaryDef {
        group_by: &["status"],
        averages: &["completion_percentage"],
    }),
    ..TableDef::BASE
};

pub static DAILY_REPORTS: TableDef = TableDef {
    table: "site_daily_reports",
    path: "daily-reports",
    label: "Daily report",
    columns: &[
        uuid("site_id").required().owned_by("sites"),
        date("report_date").required(),
        json("weather"),
        int("workers_present").required().default("0"),
        int("incidents_count").required().default("0"),
        text("summary"),
        json("checklist"),
        uuid("created_by").weak_ref("users"),
    ],
    time_column: "report_date",
    filters: &["site_id", "created_by"],
    unique: &[UniqueKey {
        columns: &["site_id", "report_date"],
        message: "Daily report already exists for this date",
    }],
    caller_column: Some("created_by"),
    summary: Some(SummaryDef {
        group_by: &[],
        averages: &["workers_present", "incidents_count"],
    }),
    ..TableDef::BASE
};

pub static EQUIPMENT: TableDef = TableDef {
    table: "equipment",
    path: "equipment",
    label: "Equipment",
    columns: &[
        uuid("site_id").required().references("sites"),
        text("name").required(),
        tag("equipment_type", &EquipmentType::DEF).required(),
        text("serial_number"),
        tag("status", &EquipmentStatus::DEF).required().default("'operational'"),
        date("last_inspection_date"),
        date("next_inspection_date"),
        uuid("operator_id").weak_ref("personnel"),
        json("telemetry"),
    ],
    filters: &["site_id", "equipment_type", "status", "operator_id"],
    unique: &[UniqueKey {
        columns: &["serial_number"],
        message: "Equipment serial number already exists",
    }],
    indexes: &[&["site_id", "status"]],
    spans: &[Span {
        start: "last_inspection_date",
        end: "next_inspection_date",
        strict: false,
    }],
    actions: &[ActionDef {
        name: "status",
        params: &[ActionParam {
            name: "status",
            column: "status",
            required: true,
        }],
        assigns: &[],
    }],
    summary: Some(SummaryDef {
        group_by: &["equipment_type", "status"],
        averages: &[],
    }),
    ..TableDef::BASE
};

pub(super) static TABLES: &[&TableDef] = &[&SITES, &SITE_ZONES, &SITE_MILESTONES, &DAILY_REPORTS, &EQUIPMENT];
