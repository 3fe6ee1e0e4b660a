//! Cameras and their health and maintenance history.

use super::enums::*;
use super::types::*;

pub static CAMERAS: TableDef = TableDef {
    table: "cameras",
    path: "cameras",
    label: "Camera",
    columns: &[
        uuid("site_id").required().references("sites"),
        uuid("zone_id").weak_ref("site_zones"),
        text("name").required(),
        text("rtsp_url"),
        tag("camera_type", &CameraType::DEF).required().default("'fixed'"),
        tag("status", &CameraStatus::DEF).required().default("'offline'"),
        text("resolution"),
        int("fps"),
        json("location"),
        boolean("is_recording").required().default("false"),
        timestamp("last_heartbeat_at"),
        json("config"),
    ],
    filters: &["site_id", "zone_id", "status", "camera_type", "is_recording"],
    indexes: &[&["site_id", "status"]],
    actions: &[
        ActionDef {
            name: "status",
            params: &[ActionParam {
                name: "status",
                column: "status",
                required: true,
            }],
            assigns: &[],
        },
        ActionDef {
            name: "heartbeat",
            params: &[],
            assigns: &[
                ("status", Assign::Tag(CameraStatus::Online.as_str())),
                ("last_heartbeat_at", Assign::Now),
            ],
        },
    ],
    summary: Some(SummaryDef {
        group_by: &["status", "camera_type"],
        averages: &["fps"],
    }),
    ..TableDef::BASE
};

pub static CAMERA_HEALTH_LOGS: TableDef = TableDef {
    table: "camera_health_logs",
    path: "camera-health-logs",
    label: "Camera health log",
    columns: &[
        uuid("camera_id").required().owned_by("cameras"),
        timestamp("recorded_at").required().default("now()"),
        tag("status", &CameraStatus::DEF).required(),
        decimal("cpu_usage", 5, 2),
        int("bandwidth_kbps"),
        decimal("frame_drop_rate", 5, 2),
        json("details"),
    ],
    audit: Audit::AppendOnly,
    time_column: "recorded_at",
    filters: &["camera_id", "status"],
    indexes: &[&["camera_id", "recorded_at"]],
    ops: Ops {
        update: false,
        ..Ops::ALL
    },
    summary: Some(SummaryDef {
        group_by: &["status"],
        averages: &["cpu_usage", "bandwidth_kbps", "frame_drop_rate"],
    }),
    ..TableDef::BASE
};

pub static CAMERA_MAINTENANCE: TableDef = TableDef {
    table: "camera_maintenance",
    path: "camera-maintenance",
    label: "Maintenance record",
    columns: &[
        uuid("camera_id").required().owned_by("cameras"),
        tag("maintenance_type", &MaintenanceType::DEF).required(),
        tag("status", &MaintenanceStatus::DEF).required().default("'scheduled'"),
        timestamp("scheduled_for").required(),
        uuid("performed_by").weak_ref("users"),
        text("notes"),
        timestamp("completed_at"),
    ],
    time_column: "scheduled_for",
    filters: &["camera_id", "status", "maintenance_type", "performed_by"],
    indexes: &[&["camera_id", "status"]],
    stamps: &[Stamp {
        column: "status",
        values: &[MaintenanceStatus::Completed.as_str()],
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
                name: "notes",
                column: "notes",
                required: false,
            },
        ],
        assigns: &[("performed_by", Assign::Caller)],
    }],
    ..TableDef::BASE
};

pub(super) static TABLES: &[&TableDef] = &[&CAMERAS, &CAMERA_HEALTH_LOGS, &CAMERA_MAINTENANCE];
