//! Request/response bodies for the REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::gcn::IngestOutcome;
use crate::models::{Event, GcnNotice, Plan, PlannedObservation};
use crate::tasks::LogEntry;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EventListResponse {
    pub events: Vec<Event>,
    pub total: usize,
}

/// Notice metadata without the raw XML payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct NoticeDto {
    pub ivorn: String,
    pub notice_type: i64,
    pub stream: String,
    pub date: DateTime<Utc>,
    pub dateobs: DateTime<Utc>,
}

impl From<GcnNotice> for NoticeDto {
    fn from(notice: GcnNotice) -> Self {
        Self {
            ivorn: notice.ivorn,
            notice_type: notice.notice_type.code(),
            stream: notice.stream,
            date: notice.date,
            dateobs: notice.dateobs,
        }
    }
}

/// Localization metadata; the flattened map itself is large and only served
/// on explicit request.
#[derive(Debug, Serialize, Deserialize)]
pub struct LocalizationDto {
    pub localization_name: String,
    pub credible_area_deg2: Option<f64>,
    pub total_probability: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlanDetailResponse {
    pub plan: Plan,
    pub observations: Vec<PlannedObservation>,
}

/// Outcome of `POST /v1/notices`.
#[derive(Debug, Serialize, Deserialize)]
pub struct IngestResponse {
    /// `ingested`, `duplicate` or `iamalive`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dateobs: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ivorn: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

impl From<IngestOutcome> for IngestResponse {
    fn from(outcome: IngestOutcome) -> Self {
        match outcome {
            IngestOutcome::Iamalive => Self {
                status: "iamalive".into(),
                dateobs: None,
                ivorn: None,
                tags: vec![],
                job_id: None,
            },
            IngestOutcome::Duplicate { ivorn } => Self {
                status: "duplicate".into(),
                dateobs: None,
                ivorn: Some(ivorn),
                tags: vec![],
                job_id: None,
            },
            IngestOutcome::Ingested {
                dateobs,
                ivorn,
                tags,
                job_id,
                ..
            } => Self {
                status: "ingested".into(),
                dateobs: Some(dateobs),
                ivorn: Some(ivorn),
                tags,
                job_id: Some(job_id),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: String,
    pub logs: Vec<LogEntry>,
    pub result: Option<serde_json::Value>,
}
