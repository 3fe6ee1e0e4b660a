//! Enumerated status and category fields. Each type maps to a PostgreSQL enum of the same tag set;
//! unknown tags are rejected at the API boundary through [`EnumDef::contains`].

use super::types::EnumDef;

macro_rules! tag_enum {
    ($(#[$meta:meta])* $name:ident = $pg:literal { $($variant:ident => $tag:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const TAGS: &'static [&'static str] = &[$($tag),+];
            pub const DEF: EnumDef = EnumDef { name: $pg, values: Self::TAGS };

            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $tag,)+
                }
            }
        }
    };
}

// Sites

tag_enum!(SiteStatus = "site_status" {
    Planning => "planning",
    Active => "active",
    OnHold => "on_hold",
    Completed => "completed",
    Archived => "archived",
});

tag_enum!(ZoneType = "zone_type" {
    WorkArea => "work_area",
    Storage => "storage",
    Restricted => "restricted",
    Hazardous => "hazardous",
    Office => "office",
    Parking => "parking",
    Entrance => "entrance",
});

tag_enum!(RiskLevel = "risk_level" {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

tag_enum!(MilestoneStatus = "milestone_status" {
    Pending => "pending",
    InProgress => "in_progress",
    Completed => "completed",
    Delayed => "delayed",
    Cancelled => "cancelled",
});

tag_enum!(EquipmentType = "equipment_type" {
    Excavator => "excavator",
    Crane => "crane",
    Bulldozer => "bulldozer",
    Forklift => "forklift",
    Loader => "loader",
    Truck => "truck",
    Generator => "generator",
    Scaffold => "scaffold",
    Other => "other",
});

tag_enum!(EquipmentStatus = "equipment_status" {
    Operational => "operational",
    InUse => "in_use",
    Maintenance => "maintenance",
    OutOfService => "out_of_service",
    Retired => "retired",
});

// Personnel

tag_enum!(UserRole = "user_role" {
    Admin => "admin",
    SiteManager => "site_manager",
    SafetyOfficer => "safety_officer",
    Supervisor => "supervisor",
    Worker => "worker",
    Viewer => "viewer",
});

tag_enum!(Trade = "trade" {
    GeneralLabor => "general_labor",
    Carpenter => "carpenter",
    Electrician => "electrician",
    Plumber => "plumber",
    Welder => "welder",
    Mason => "mason",
    Operator => "operator",
    Ironworker => "ironworker",
    Engineer => "engineer",
});

tag_enum!(PersonnelStatus = "personnel_status" {
    Active => "active",
    Inactive => "inactive",
    Suspended => "suspended",
    Terminated => "terminated",
});

tag_enum!(CertificationStatus = "certification_status" {
    Valid => "valid",
    Expiring => "expiring",
    Expired => "expired",
    Revoked => "revoked",
});

tag_enum!(AttendanceMethod = "attendance_method" {
    Badge => "badge",
    FaceRecognition => "face_recognition",
    Manual => "manual",
    Mobile => "mobile",
});

// Cameras

tag_enum!(CameraType = "camera_type" {
    Fixed => "fixed",
    Ptz => "ptz",
    Thermal => "thermal",
    Dome => "dome",
    Bullet => "bullet",
    BodyWorn => "body_worn",
});

tag_enum!(CameraStatus = "camera_status" {
    Online => "online",
    Offline => "offline",
    Maintenance => "maintenance",
    Error => "error",
    Decommissioned => "decommissioned",
});

tag_enum!(MaintenanceType = "maintenance_type" {
    Cleaning => "cleaning",
    Repair => "repair",
    FirmwareUpdate => "firmware_update",
    Calibration => "calibration",
    Replacement => "replacement",
    Inspection => "inspection",
});

tag_enum!(MaintenanceStatus = "maintenance_status" {
    Scheduled => "scheduled",
    InProgress => "in_progress",
    Completed => "completed",
    Cancelled => "cancelled",
});

// Detections

tag_enum!(DetectionType = "detection_type" {
    Person => "person",
    Vehicle => "vehicle",
    PpeViolation => "ppe_violation",
    Fall => "fall",
    Fire => "fire",
    Smoke => "smoke",
    Intrusion => "intrusion",
    Equipment => "equipment",
    UnsafeBehavior => "unsafe_behavior",
});

tag_enum!(ReviewStatus = "review_status" {
    Pending => "pending",
    Confirmed => "confirmed",
    Rejected => "rejected",
});

tag_enum!(PpeType = "ppe_type" {
    Helmet => "helmet",
    Vest => "vest",
    Gloves => "gloves",
    Goggles => "goggles",
    Harness => "harness",
    Boots => "boots",
    Mask => "mask",
});

tag_enum!(Severity = "severity" {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

tag_enum!(ViolationStatus = "violation_status" {
    Open => "open",
    Acknowledged => "acknowledged",
    Resolved => "resolved",
    Dismissed => "dismissed",
});

tag_enum!(IncidentType = "incident_type" {
    NearMiss => "near_miss",
    Injury => "injury",
    PropertyDamage => "property_damage",
    Environmental => "environmental",
    Fire => "fire",
    Fall => "fall",
    EquipmentFailure => "equipment_failure",
});

tag_enum!(IncidentStatus = "incident_status" {
    Reported => "reported",
    Investigating => "investigating",
    Resolved => "resolved",
    Closed => "closed",
});

// Alerts

tag_enum!(AlertType = "alert_type" {
    SafetyViolation => "safety_violation",
    Intrusion => "intrusion",
    EquipmentFault => "equipment_fault",
    Fire => "fire",
    Fall => "fall",
    CameraOffline => "camera_offline",
    Geofence => "geofence",
    System => "system",
});

tag_enum!(AlertPriority = "alert_priority" {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

tag_enum!(AlertStatus = "alert_status" {
    Open => "open",
    Acknowledged => "acknowledged",
    Investigating => "investigating",
    Resolved => "resolved",
    FalsePositive => "false_positive",
});

tag_enum!(EscalationStatus = "escalation_status" {
    Pending => "pending",
    Notified => "notified",
    Acknowledged => "acknowledged",
    Expired => "expired",
});

tag_enum!(NotificationChannel = "notification_channel" {
    InApp => "in_app",
    Email => "email",
    Sms => "sms",
    Push => "push",
});

// Video

tag_enum!(RecordingStatus = "recording_status" {
    Recording => "recording",
    Completed => "completed",
    Failed => "failed",
    Archived => "archived",
});

tag_enum!(EvidenceStatus = "evidence_status" {
    Pending => "pending",
    Processing => "processing",
    Available => "available",
    Archived => "archived",
});

tag_enum!(ExportFormat = "export_format" {
    Mp4 => "mp4",
    Avi => "avi",
    Mkv => "mkv",
    Webm => "webm",
});

tag_enum!(ExportStatus = "export_status" {
    Pending => "pending",
    Processing => "processing",
    Completed => "completed",
    Failed => "failed",
    Cancelled => "cancelled",
});

tag_enum!(AnnotationType = "annotation_type" {
    Note => "note",
    BoundingBox => "bounding_box",
    Arrow => "arrow",
    Highlight => "highlight",
});

// Navigation

tag_enum!(RouteType = "route_type" {
    Evacuation => "evacuation",
    MaterialDelivery => "material_delivery",
    Personnel => "personnel",
    Vehicle => "vehicle",
    Inspection => "inspection",
});

tag_enum!(NavigationStatus = "navigation_status" {
    Active => "active",
    Paused => "paused",
    Completed => "completed",
    Aborted => "aborted",
});

tag_enum!(GeofenceType = "geofence_type" {
    Inclusion => "inclusion",
    Exclusion => "exclusion",
    Warning => "warning",
});

// Access control

tag_enum!(AccessPointType = "access_point_type" {
    Turnstile => "turnstile",
    Gate => "gate",
    Door => "door",
    Barrier => "barrier",
});

tag_enum!(AccessPointStatus = "access_point_status" {
    Active => "active",
    Inactive => "inactive",
    Fault => "fault",
});

tag_enum!(AccessLevel = "access_level" {
    Standard => "standard",
    Elevated => "elevated",
    Supervisor => "supervisor",
    Emergency => "emergency",
});

tag_enum!(AccessEvent = "access_event" {
    Entry => "entry",
    Exit => "exit",
    Denied => "denied",
    Tailgating => "tailgating",
    Forced => "forced",
});

tag_enum!(CredentialType = "credential_type" {
    Badge => "badge",
    Face => "face",
    Pin => "pin",
    Qr => "qr",
});

tag_enum!(VisitorStatus = "visitor_status" {
    Pending => "pending",
    Approved => "approved",
    Active => "active",
    Expired => "expired",
    Revoked => "revoked",
});

// AI model lifecycle

tag_enum!(ModelType = "model_type" {
    ObjectDetection => "object_detection",
    Classification => "classification",
    Segmentation => "segmentation",
    PoseEstimation => "pose_estimation",
    AnomalyDetection => "anomaly_detection",
    Forecasting => "forecasting",
});

tag_enum!(ModelStatus = "model_status" {
    Draft => "draft",
    Training => "training",
    Validating => "validating",
    Deployed => "deployed",
    Deprecated => "deprecated",
    Archived => "archived",
});

tag_enum!(DatasetStatus = "dataset_status" {
    Collecting => "collecting",
    Labeling => "labeling",
    Ready => "ready",
    Archived => "archived",
});

tag_enum!(TrainingStatus = "training_status" {
    Queued => "queued",
    Running => "running",
    Completed => "completed",
    Failed => "failed",
    Cancelled => "cancelled",
});

tag_enum!(DeploymentStatus = "deployment_status" {
    Pending => "pending",
    Active => "active",
    Paused => "paused",
    RolledBack => "rolled_back",
    Failed => "failed",
});

tag_enum!(PredictionType = "prediction_type" {
    RiskScore => "risk_score",
    DelayDays => "delay_days",
    CostOverrun => "cost_overrun",
    IncidentProbability => "incident_probability",
    Occupancy => "occupancy",
});

tag_enum!(PredictionStatus = "prediction_status" {
    Pending => "pending",
    Validated => "validated",
    Expired => "expired",
});

// Admin

tag_enum!(ConfigCategory = "config_category" {
    General => "general",
    Alerts => "alerts",
    Detection => "detection",
    Video => "video",
    Retention => "retention",
    Integration => "integration",
});

tag_enum!(DashboardVisibility = "dashboard_visibility" {
    Private => "private",
    Team => "team",
    Public => "public",
});

tag_enum!(WidgetType = "widget_type" {
    Kpi => "kpi",
    Chart => "chart",
    Table => "table",
    Map => "map",
    CameraFeed => "camera_feed",
    AlertFeed => "alert_feed",
});

tag_enum!(AuditAction = "audit_action" {
    Create => "create",
    Update => "update",
    Delete => "delete",
    Login => "login",
    Logout => "logout",
    Export => "export",
    ConfigChange => "config_change",
});

tag_enum!(ReportType = "report_type" {
    DailySafety => "daily_safety",
    WeeklyProgress => "weekly_progress",
    IncidentSummary => "incident_summary",
    Compliance => "compliance",
    Analytics => "analytics",
});

tag_enum!(ReportStatus = "report_status" {
    Queued => "queued",
    Generating => "generating",
    Completed => "completed",
    Failed => "failed",
});
