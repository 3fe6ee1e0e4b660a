//! Platform users, site personnel, certifications and attendance.

use super::enums::*;
use super::types::*;

pub static USERS: TableDef = TableDef {
    table: "users",
    path: "users",
    label: "User",
    columns: &[
        text("email").required().format(Format::Email),
        text("full_name").required(),
        tag("role", &UserRole::DEF).required().default("'viewer'"),
        text("phone"),
        text("password_hash").write_only(),
        boolean("is_active").required().default("true"),
        timestamp("last_login_at"),
        json("preferences"),
    ],
    filters: &["role", "is_active"],
    unique: &[UniqueKey {
        columns: &["email"],
        message: "Email already registered",
    }],
    ops: Ops::NO_DELETE,
    actions: &[
        ActionDef {
            name: "deactivate",
            params: &[],
            assigns: &[("is_active", Assign::Flag(false))],
        },
        ActionDef {
            name: "login",
            params: &[],
            assigns: &[("last_login_at", Assign::Now)],
        },
    ],
    summary: Some(SummaryDef {
        group_by: &["role", "is_active"],
        averages: &[],
    }),
    ..TableDef::BASE
};

pub static PERSONNEL: TableDef = TableDef {
    table: "personnel",
    path: "personnel",
    label: "Personnel",
    columns: &[
        uuid("site_id").required().references("sites"),
        uuid("user_id").weak_ref("users"),
        text("employee_code").required(),
        text("full_name").required(),
        tag("trade", &Trade::DEF).required(),
        text("company"),
        text("badge_id"),
        date("certification_expiry"),
        tag("status", &PersonnelStatus::DEF).required().default("'active'"),
        json("emergency_contact"),
    ],
    filters: &["site_id", "user_id", "trade", "status", "company"],
    unique: &[UniqueKey {
        columns: &["employee_code"],
        message: "Employee code already exists",
    }],
    indexes: &[&["site_id", "status"]],
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
        group_by: &["trade", "status"],
        averages: &[],
    }),
    ..TableDef::BASE
};

pub static CERTIFICATIONS: TableDef = TableDef {
    table: "personnel_certifications",
    path: "certifications",
    label: "Certification",
    columns: &[
        uuid("personnel_id").required().owned_by("personnel"),
        text("certification_type").required(),
        text("issuer"),
        date("issued_on").required(),
        date("expires_on"),
        tag("status", &CertificationStatus::DEF).required().default("'valid'"),
        text("document_url").format(Format::Url),
    ],
    time_column: "issued_on",
    filters: &["personnel_id", "status", "certification_type"],
    spans: &[Span {
        start: "issued_on",
        end: "expires_on",
        strict: true,
    }],
    ..TableDef::BASE
};

pub static ATTENDANCE: TableDef = TableDef {
    table: "attendance_records",
    path: "attendance",
    label: "Attendance record",
    columns: &[
        uuid("personnel_id").required().owned_by("personnel"),
        uuid("site_id").required().references("sites"),
        timestamp("check_in_at").required().default("now()"),
        timestamp("check_out_at"),
        tag("method", &AttendanceMethod::DEF).required().default("'badge'"),
        uuid("camera_id").weak_ref("cameras"),
    ],
    audit: Audit::AppendOnly,
    time_column: "check_in_at",
    filters: &["personnel_id", "site_id", "method"],
    indexes: &[&["site_id", "check_in_at"], &["personnel_id", "check_in_at"]],
    spans: &[Span {
        start: "check_in_at",
        end: "check_out_at",
        strict: true,
    }],
    actions: &[ActionDef {
        name: "check-out",
        params: &[],
        assigns: &[("check_out_at", Assign::Now)],
    }],
    summary: Some(SummaryDef {
        group_by: &["method"],
        averages: &[],
    }),
    ..TableDef::BASE
};

pub(super) static TABLES: &[&TableDef] = &[&USERS, &PERSONNEL, &CERTIFICATIONS, &ATTENDANCE];
