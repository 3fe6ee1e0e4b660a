//! AI detections produced by the upstream video pipeline, and the safety records derived from them.

use super::enums::*;
use super::types::*;

pub static AI_DETECTIONS: TableDef = TableDef {
    table: "ai_detections",
    path: "ai-detections",
    label: "Detection",
    columns: &[
        uuid("camera_id").required().references("cameras"),
        uuid("site_id").required().references("sites"),
        uuid("zone_id").weak_ref("site_zones"),
        uuid("model_id").weak_ref("ai_models"),
        tag("detection_type", &DetectionType::DEF).required(),
        decimal("confidence", 5, 4).required(),
        json("bounding_boxes"),
        json("results"),
        text("frame_url"),
        timestamp("detected_at").required().default("now()"),
        boolean("is_verified").required().default("false"),
        uuid("verified_by").weak_ref("users"),
        tag("review_status", &ReviewStatus::DEF).required().default("'pending'"),
    ],
    time_column: "detected_at",
    filters: &[
        "camera_id",
        "site_id",
        "zone_id",
        "model_id",
        "detection_type",
        "review_status",
        "is_verified",
    ],
    indexes: &[&["camera_id", "detected_at"], &["site_id", "detected_at"]],
    actions: &[ActionDef {
        name: "review",
        params: &[ActionParam {
            name: "review_status",
            column: "review_status",
            required: true,
        }],
        assigns: &[("is_verified", Assign::Flag(true)), ("verified_by", Assign::Caller)],
    }],
    summary: Some(SummaryDef {
        group_by: &["detection_type", "review_status"],
        averages: &["confidence"],
    }),
    ..TableDef::BASE
};

pub static PPE_VIOLATIONS: TableDef = TableDef {
    table: "ppe_violations",
    path: "ppe-violations",
    label: "PPE violation",
    columns: &[
        uuid("detection_id").weak_ref("ai_detections"),
        uuid("site_id").required().references("sites"),
        uuid("camera_id").weak_ref("cameras"),
        uuid("personnel_id").weak_ref("personnel"),
        tag("violation_type", &PpeType::DEF).required(),
        tag("severity", &Severity::DEF).required().default("'medium'"),
        tag("status", &ViolationStatus::DEF).required().default("'open'"),
        timestamp("detected_at").required().default("now()"),
        text("snapshot_url"),
        text("notes"),
        timestamp("resolved_at"),
    ],
    time_column: "detected_at",
    filters: &[
        "site_id",
        "camera_id",
        "personnel_id",
        "violation_type",
        "severity",
        "status",
    ],
    indexes: &[&["site_id", "status"], &["site_id", "detected_at"]],
    stamps: &[Stamp {
        column: "status",
        values: &[ViolationStatus::Resolved.as_str(), ViolationStatus::Dismissed.as_str()],
        sets: "resolved_at",
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
        assigns: &[],
    }],
    summary: Some(SummaryDef {
        group_by: &["violation_type", "severity", "status"],
        averages: &[],
    }),
    ..TableDef::BASE
};

pub static SAFETY_INCIDENTS: TableDef = TableDef {
    table: "safety_incidents",
    path: "safety-incidents",
    label: "Incident",
    columns: &[
        uuid("site_id").required().references("sites"),
        uuid("zone_id").weak_ref("site_zones"),
        tag("incident_type", &IncidentType::DEF).required(),
        tag("severity", &Severity::DEF).required(),
        tag("status", &IncidentStatus::DEF).required().default("'reported'"),
        text("title").required(),
        text("description"),
        timestamp("occurred_at").required(),
        uuid("reported_by").weak_ref("users"),
        int("injuries_count").required().default("0"),
        text("root_cause"),
        json("corrective_actions"),
        timestamp("resolved_at"),
        timestamp("closed_at"),
    ],
    time_column: "occurred_at",
    filters: &["site_id", "zone_id", "incident_type", "severity", "status", "reported_by"],
    indexes: &[&["site_id", "status"], &["site_id", "occurred_at"]],
    caller_column: Some("reported_by"),
    stamps: &[
        Stamp {
            column: "status",
            values: &[IncidentStatus::Resolved.as_str()],
            sets: "resolved_at",
        },
        Stamp {
            column: "status",
            values: &[IncidentStatus::Closed.as_str()],
            sets: "closed_at",
        },
    ],
    actions: &[ActionDef {
        name: "status",
        params: &[
            ActionParam {
                name: "status",
                column: "status",
                required: true,
            },
            ActionParam {
                name: "root_cause",
                column: "root_cause",
                required: false,
            },
        ],
        assigns: &[],
    }],
    summary: Some(SummaryDef {
        group_by: &["incident_type", "severity", "status"],
        averages: &["injuries_count"],
    }),
    ..TableDef::BASE
};

pub static OCCUPANCY_SNAPSHOTS: TableDef = TableDef {
    table: "occupancy_snapshots",
    path: "occupancy-snapshots",
    label: "Occupancy snapshot",
    columns: &[
        uuid("site_id").required().owned_by("sites"),
        uuid("zone_id").weak_ref("site_zones"),
        uuid("camera_id").weak_ref("cameras"),
        int("person_count").required().default("0"),
        int("vehicle_count").required().default("0"),
        timestamp("captured_at").required().default("now()"),
    ],
    audit: Audit::AppendOnly,
    time_column: "captured_at",
    filters: &["site_id", "zone_id", "camera_id"],
    indexes: &[&["site_id", "captured_at"], &["zone_id", "captured_at"]],
    ops: Ops {
        update: false,
        ..Ops::ALL
    },
    summary: Some(SummaryDef {
        group_by: &[],
        averages: &["person_count", "vehicle_count"],
    }),
    ..TableDef::BASE
};

pub(super) static TABLES: &[&TableDef] = &[&AI_DETECTIONS, &PPE_VIOLATIONS, &SAFETY_INCIDENTS, &OCCUPANCY_SNAPSHOTS];
