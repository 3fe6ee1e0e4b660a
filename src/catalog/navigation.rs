//! On-site navigation: routes, live sessions and geofences.

use super::enums::*;
use super::types::*;

pub static NAVIGATION_ROUTES: TableDef = TableDef {
    table: "navigation_routes",
    path: "navigation-routes",
    label: "Route",
    columns: &[
        uuid("site_id").required().owned_by("sites"),
        text("name").required(),
        tag("route_type", &RouteType::DEF).required(),
        json("waypoints").required(),
        decimal("distance_meters", 10, 2),
        int("estimated_duration_minutes"),
        boolean("is_active").required().default("true"),
        text("hazard_notes"),
        uuid("created_by").weak_ref("users"),
    ],
    filters: &["site_id", "route_type", "is_active"],
    caller_column: Some("created_by"),
    ..TableDef::BASE
};

pub static NAVIGATION_SESSIONS: TableDef = TableDef {
    table: "navigation_sessions",
    path: "navigation-sessions",
    label: "Navigation session",
    columns: &[
        uuid("route_id").required().references("navigation_routes"),
        uuid("user_id").required().references("users"),
        tag("status", &NavigationStatus::DEF).required().default("'active'"),
        timestamp("started_at").required().default("now()"),
        timestamp("ended_at"),
        json("current_position"),
        int("deviation_count").required().default("0"),
    ],
    time_column: "started_at",
    filters: &["route_id", "user_id", "status"],
    indexes: &[&["user_id", "status"]],
    ops: Ops::NO_DELETE,
    caller_column: Some("user_id"),
    spans: &[Span {
        start: "started_at",
        end: "ended_at",
        strict: false,
    }],
    stamps: &[Stamp {
        column: "status",
        values: &[NavigationStatus::Completed.as_str(), NavigationStatus::Aborted.as_str()],
        sets: "ended_at",
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
                name: "deviation_count",
                column: "deviation_count",
                required: false,
            },
        ],
        assigns: &[],
    }],
    ..TableDef::BASE
};

pub static GEOFENCES: TableDef = TableDef {
    table: "geofences",
    path: "geofences",
    label: "Geofence",
    columns: &[
        uuid("site_id").required().owned_by("sites"),
        uuid("zone_id").weak_ref("site_zones"),
        text("name").required(),
        tag("fence_type", &GeofenceType::DEF).required(),
        json("geometry").required(),
        boolean("is_active").required().default("true"),
        json("applies_to_roles"),
    ],
    filters: &["site_id", "zone_id", "fence_type", "is_active"],
    ..TableDef::BASE
};

pub(super) static TABLES: &[&TableDef] = &[&NAVIGATION_ROUTES, &NAVIGATION_SESSIONS, &GEOFENCES];
