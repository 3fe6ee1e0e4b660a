//! Recordings, evidence clips, exports and annotations.

use super::enums::*;
use super::types::*;

pub static VIDEO_RECORDINGS: TableDef = TableDef {
    table: "video_recordings",
    path: "video-recordings",
    label: "Recording",
    columns: &[
        uuid("camera_id").required().references("cameras"),
        uuid("site_id").required().references("sites"),
        timestamp("started_at").required(),
        timestamp("ended_at"),
        int("duration_seconds"),
        text("storage_path").required(),
        bigint("file_size_bytes"),
        tag("status", &RecordingStatus::DEF).required().default("'recording'"),
        date("retention_until"),
    ],
    time_column: "started_at",
    filters: &["camera_id", "site_id", "status"],
    indexes: &[&["camera_id", "started_at"]],
    spans: &[Span {
        start: "started_at",
        end: "ended_at",
        strict: true,
    }],
    summary: Some(SummaryDef {
        group_by: &["status"],
        averages: &["duration_seconds", "file_size_bytes"],
    }),
    ..TableDef::BASE
};

pub static VIDEO_EVIDENCE: TableDef = TableDef {
    table: "video_evidence",
    path: "video-evidence",
    label: "Video evidence",
    columns: &[
        uuid("camera_id").required().references("cameras"),
        uuid("recording_id").weak_ref("video_recordings"),
        uuid("alert_id").weak_ref("alerts"),
        uuid("incident_id").weak_ref("safety_incidents"),
        timestamp("clip_start").required(),
        timestamp("clip_end").required(),
        text("evidence_url"),
        text("thumbnail_url"),
        text("sha256"),
        tag("status", &EvidenceStatus::DEF).required().default("'pending'"),
        json("tags"),
        text("notes"),
        uuid("created_by").weak_ref("users"),
    ],
    time_column: "clip_start",
    filters: &["camera_id", "recording_id", "alert_id", "incident_id", "status", "created_by"],
    indexes: &[&["camera_id", "clip_start"]],
    caller_column: Some("created_by"),
    spans: &[Span {
        start: "clip_start",
        end: "clip_end",
        strict: true,
    }],
    actions: &[ActionDef {
        name: "archive",
        params: &[],
        assigns: &[("status", Assign::Tag(EvidenceStatus::Archived.as_str()))],
    }],
    ..TableDef::BASE
};

pub static VIDEO_EXPORTS: TableDef = TableDef {
    table: "video_exports",
    path: "video-exports",
    label: "Video export",
    columns: &[
        uuid("camera_id").required().references("cameras"),
        uuid("evidence_id").weak_ref("video_evidence"),
        uuid("requested_by").weak_ref("users"),
        timestamp("start_time").required(),
        timestamp("end_time").required(),
        tag("format", &ExportFormat::DEF).required().default("'mp4'"),
        tag("export_status", &ExportStatus::DEF).required().default("'pending'"),
        text("download_url").format(Format::Url),
        bigint("file_size_bytes"),
        text("error_message"),
        timestamp("processing_started_at"),
        timestamp("processing_completed_at"),
        timestamp("expires_at"),
    ],
    filters: &["camera_id", "evidence_id", "requested_by", "export_status", "format"],
    indexes: &[&["requested_by", "export_status"]],
    caller_column: Some("requested_by"),
    spans: &[Span {
        start: "start_time",
        end: "end_time",
        strict: true,
    }],
    stamps: &[
        Stamp {
            column: "export_status",
            values: &[ExportStatus::Processing.as_str()],
            sets: "processing_started_at",
        },
        Stamp {
            column: "export_status",
            values: &[ExportStatus::Completed.as_str(), ExportStatus::Failed.as_str()],
            sets: "processing_completed_at",
        },
    ],
    actions: &[ActionDef {
        name: "status",
        params: &[
            ActionParam {
                name: "status",
                column: "export_status",
                required: true,
            },
            ActionParam {
                name: "download_url",
                column: "download_url",
                required: false,
            },
            ActionParam {
                name: "file_size_bytes",
                column: "file_size_bytes",
                required: false,
            },
            ActionParam {
                name: "error_message",
                column: "error_message",
                required: false,
            },
        ],
        assigns: &[],
    }],
    summary: Some(SummaryDef {
        group_by: &["export_status", "format"],
        averages: &["file_size_bytes"],
    }),
    ..TableDef::BASE
};

pub static VIDEO_ANNOTATIONS: TableDef = TableDef {
    table: "video_annotations",
    path: "video-annotations",
    label: "Annotation",
    columns: &[
        uuid("evidence_id").required().owned_by("video_evidence"),
        uuid("author_id").weak_ref("users"),
        bigint("timestamp_offset_ms").required().default("0"),
        tag("annotation_type", &AnnotationType::DEF).required().default("'note'"),
        text("text"),
        json("content"),
    ],
    filters: &["evidence_id", "author_id", "annotation_type"],
    caller_column: Some("author_id"),
    ..TableDef::BASE
};

pub(super) static TABLES: &[&TableDef] = &[&VIDEO_RECORDINGS, &VIDEO_EVIDENCE, &VIDEO_EXPORTS, &VIDEO_ANNOTATIONS];
