//! AI model lifecycle: models, datasets, training jobs, deployments and forecast predictions.

use super::enums::*;
use super::types::*;

pub static AI_MODELS: TableDef = TableDef {
    table: "ai_models",
    path: "ai-models",
    label: "AI model",
    columns: &[
        text("name").required(),
        text("version").required(),
        tag("model_type", &ModelType::DEF).required(),
        text("framework"),
        tag("status", &ModelStatus::DEF).required().default("'draft'"),
        decimal("accuracy", 5, 4),
        text("artifact_url"),
        json("config"),
        json("metrics"),
        uuid("created_by").weak_ref("users"),
        timestamp("deployed_at"),
    ],
    filters: &["model_type", "status", "name", "created_by"],
    unique: &[UniqueKey {
        columns: &["name", "version"],
        message: "Model version already exists",
    }],
    ops: Ops::NO_DELETE,
    caller_column: Some("created_by"),
    stamps: &[Stamp {
        column: "status",
        values: &[ModelStatus::Deployed.as_str()],
        sets: "deployed_at",
    }],
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
            name: "archive",
            params: &[],
            assigns: &[("status", Assign::Tag(ModelStatus::Archived.as_str()))],
        },
    ],
    summary: Some(SummaryDef {
        group_by: &["model_type", "status"],
        averages: &["accuracy"],
    }),
    ..TableDef::BASE
};

pub static AI_DATASETS: TableDef = TableDef {
    table: "ai_datasets",
    path: "ai-datasets",
    label: "Dataset",
    columns: &[
        text("name").required(),
        text("description"),
        tag("target_type", &DetectionType::DEF),
        int("sample_count").required().default("0"),
        text("storage_uri"),
        json("labels"),
        tag("status", &DatasetStatus::DEF).required().default("'collecting'"),
        uuid("created_by").weak_ref("users"),
    ],
    filters: &["status", "target_type", "created_by"],
    caller_column: Some("created_by"),
    actions: &[ActionDef {
        name: "archive",
        params: &[],
        assigns: &[("status", Assign::Tag(DatasetStatus::Archived.as_str()))],
    }],
    ..TableDef::BASE
};

pub static AI_TRAINING_JOBS: TableDef = TableDef {
    table: "ai_training_jobs",
    path: "ai-training-jobs",
    label: "Training job",
    columns: &[
        uuid("model_id").required().references("ai_models"),
        uuid("dataset_id").weak_ref("ai_datasets"),
        tag("status", &TrainingStatus::DEF).required().default("'queued'"),
        json("hyperparameters"),
        json("metrics"),
        timestamp("scheduled_start"),
        timestamp("scheduled_end"),
        timestamp("started_at"),
        timestamp("completed_at"),
        decimal("progress_percentage", 5, 2).required().default("0"),
        text("error_message"),
        uuid("created_by").weak_ref("users"),
    ],
    filters: &["model_id", "dataset_id", "status", "created_by"],
    indexes: &[&["model_id", "status"]],
    ops: Ops::NO_DELETE,
    caller_column: Some("created_by"),
    spans: &[Span {
        start: "scheduled_start",
        end: "scheduled_end",
        strict: true,
    }],
    stamps: &[
        Stamp {
            column: "status",
            values: &[TrainingStatus::Running.as_str()],
            sets: "started_at",
        },
        Stamp {
            column: "status",
            values: &[
                TrainingStatus::Completed.as_str(),
                TrainingStatus::Failed.as_str(),
                TrainingStatus::Cancelled.as_str(),
            ],
            sets: "completed_at",
        },
    ],
    thresholds: &[Threshold {
        when: "progress_percentage",
        at_least: 100.0,
        column: "status",
        value: TrainingStatus::Completed.as_str(),
    }],
    actions: &[
        ActionDef {
            name: "progress",
            params: &[
                ActionParam {
                    name: "progress_percentage",
                    column: "progress_percentage",
                    required: true,
                },
                ActionParam {
                    name: "status",
                    column: "status",
                    required: false,
                },
            ],
            assigns: &[],
        },
        ActionDef {
            name: "status",
            params: &[
                ActionParam {
                    name: "status",
                    column: "status",
                    required: true,
                },
                ActionParam {
                    name: "error_message",
                    column: "error_message",
                    required: false,
                },
            ],
            assigns: &[],
        },
    ],
    summary: Some(SummaryDef {
        group_by: &["status"],
        averages: &["progress_percentage"],
    }),
    ..TableDef::BASE
};

pub static AI_DEPLOYMENTS: TableDef = TableDef {
    table: "ai_model_deployments",
    path: "ai-deployments",
    label: "Deployment",
    columns: &[
        uuid("model_id").required().references("ai_models"),
        uuid("site_id").weak_ref("sites"),
        uuid("camera_id").weak_ref("cameras"),
        tag("status", &DeploymentStatus::DEF).required().default("'pending'"),
        json("config"),
        timestamp("deployed_at"),
        uuid("deployed_by").weak_ref("users"),
    ],
    filters: &["model_id", "site_id", "camera_id", "status"],
    indexes: &[&["model_id", "status"]],
    caller_column: Some("deployed_by"),
    stamps: &[Stamp {
        column: "status",
        values: &[DeploymentStatus::Active.as_str()],
        sets: "deployed_at",
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
    ..TableDef::BASE
};

pub static AI_PREDICTIONS: TableDef = TableDef {
    table: "ai_predictions",
    path: "ai-predictions",
    label: "Prediction",
    columns: &[
        uuid("model_id").required().references("ai_models"),
        uuid("site_id").required().references("sites"),
        tag("prediction_type", &PredictionType::DEF).required(),
        date("target_date").required(),
        decimal("predicted_value", 14, 4).required(),
        decimal("confidence", 5, 4),
        decimal("actual_value", 14, 4).read_only(),
        decimal("error_percentage", 10, 4).read_only(),
        tag("status", &PredictionStatus::DEF).required().default("'pending'"),
        timestamp("validated_at").read_only(),
        json("inputs"),
    ],
    time_column: "target_date",
    filters: &["model_id", "site_id", "prediction_type", "status"],
    indexes: &[&["site_id", "target_date"], &["model_id", "status"]],
    summary: Some(SummaryDef {
        group_by: &["prediction_type", "status"],
        averages: &["error_percentage", "confidence"],
    }),
    ..TableDef::BASE
};

pub(super) static TABLES: &[&TableDef] = &[&AI_MODELS, &AI_DATASETS, &AI_TRAINING_JOBS, &AI_DEPLOYMENTS, &AI_PREDICTIONS];
