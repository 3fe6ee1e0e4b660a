//! Access control: entry points, permissions, access logs and visitor passes.

use super::enums::*;
use super::types::*;

pub static ACCESS_POINTS: TableDef = TableDef {
    table: "access_points",
    path: "access-points",
    label: "Access point",
    columns: &[
        uuid("site_id").required().owned_by("sites"),
        uuid("zone_id").weak_ref("site_zones"),
        text("name").required(),
        tag("access_type", &AccessPointType::DEF).required(),
        tag("status", &AccessPointStatus::DEF).required().default("'active'"),
        text("device_serial"),
        uuid("camera_id").weak_ref("cameras"),
    ],
    filters: &["site_id", "zone_id", "access_type", "status"],
    unique: &[UniqueKey {
        columns: &["device_serial"],
        message: "Device serial already registered",
    }],
    ..TableDef::BASE
};

pub static ACCESS_PERMISSIONS: TableDef = TableDef {
    table: "access_permissions",
    path: "access-permissions",
    label: "Access permission",
    columns: &[
        uuid("personnel_id").required().owned_by("personnel"),
        uuid("zone_id").required().owned_by("site_zones"),
        tag("access_level", &AccessLevel::DEF).required().default("'standard'"),
        date("valid_from").required().default("CURRENT_DATE"),
        date("valid_until"),
        boolean("is_active").required().default("true"),
        uuid("granted_by").weak_ref("users"),
    ],
    time_column: "valid_from",
    filters: &["personnel_id", "zone_id", "access_level", "is_active"],
    unique: &[UniqueKey {
        columns: &["personnel_id", "zone_id"],
        message: "Permission already exists for this zone",
    }],
    caller_column: Some("granted_by"),
    spans: &[Span {
        start: "valid_from",
        end: "valid_until",
        strict: false,
    }],
    actions: &[ActionDef {
        name: "revoke",
        params: &[],
        assigns: &[("is_active", Assign::Flag(false))],
    }],
    ..TableDef::BASE
};

pub static ACCESS_LOGS: TableDef = TableDef {
    table: "access_logs",
    path: "access-logs",
    label: "Access log",
    columns: &[
        uuid("access_point_id").required().owned_by("access_points"),
        uuid("personnel_id").weak_ref("personnel"),
        tag("event_type", &AccessEvent::DEF).required(),
        tag("credential_type", &CredentialType::DEF),
        timestamp("occurred_at").required().default("now()"),
        json("details"),
    ],
    audit: Audit::AppendOnly,
    time_column: "occurred_at",
    filters: &["access_point_id", "personnel_id", "event_type", "credential_type"],
    indexes: &[&["access_point_id", "occurred_at"], &["personnel_id", "occurred_at"]],
    ops: Ops::READ_CREATE,
    summary: Some(SummaryDef {
        group_by: &["event_type", "credential_type"],
        averages: &[],
    }),
    ..TableDef::BASE
};

pub static VISITOR_PASSES: TableDef = TableDef {
    table: "visitor_passes",
    path: "visitor-passes",
    label: "Visitor pass",
    columns: &[
        uuid("site_id").required().owned_by("sites"),
        text("visitor_name").required(),
        text("company"),
        uuid("host_user_id").weak_ref("users"),
        text("purpose"),
        timestamp("valid_from").required(),
        timestamp("valid_until").required(),
        tag("status", &VisitorStatus::DEF).required().default("'pending'"),
        timestamp("checked_in_at"),
        timestamp("checked_out_at"),
    ],
    time_column: "valid_from",
    filters: &["site_id", "host_user_id", "status"],
    spans: &[Span {
        start: "valid_from",
        end: "valid_until",
        strict: true,
    }],
    stamps: &[
        Stamp {
            column: "status",
            values: &[VisitorStatus::Active.as_str()],
            sets: "checked_in_at",
        },
        Stamp {
            column: "status",
            values: &[VisitorStatus::Expired.as_str(), VisitorStatus::Revoked.as_str()],
            sets: "checked_out_at",
        },
    ],
    actions: &[
        ActionDef {
            name: "check-in",
            params: &[],
            assigns: &[("status", Assign::Tag(VisitorStatus::Active.as_str()))],
        },
        ActionDef {
            name: "check-out",
            params: &[],
            assigns: &[("status", Assign::Tag(VisitorStatus::Expired.as_str()))],
        },
    ],
    ..TableDef::BASE
};

pub(super) static TABLES: &[&TableDef] = &[&ACCESS_POINTS, &ACCESS_PERMISSIONS, &ACCESS_LOGS, &VISITOR_PASSES];
