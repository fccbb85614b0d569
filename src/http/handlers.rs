//! HTTP handlers for the REST API.
//!
//! Read handlers delegate to the event service; the notice handler feeds the
//! ingestion pipeline directly.

use axum::{
    extract::{Path, State},
    response::sse::{Event, Sse},
    Json,
};
use chrono::{DateTime, Utc};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;

use super::dto::{
    EventListResponse, HealthResponse, IngestResponse, JobStatusResponse, LocalizationDto,
    NoticeDto, PlanDetailResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::repository::{EventRepository, PlanRepository};
use crate::db::services::EventSummary;
use crate::models::time::parse_isotime;
use crate::tasks::JobStatus;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn parse_dateobs(raw: &str) -> Result<DateTime<Utc>, AppError> {
    parse_isotime(raw).map_err(|e| AppError::BadRequest(format!("Invalid dateobs: {e}")))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Events
// =============================================================================

/// GET /v1/events
pub async fn list_events(State(state): State<AppState>) -> HandlerResult<EventListResponse> {
    let events = state.service.list_events().await?;
    let total = events.len();
    Ok(Json(EventListResponse { events, total }))
}

/// GET /v1/events/{dateobs}
pub async fn get_event(
    State(state): State<AppState>,
    Path(dateobs): Path<String>,
) -> HandlerResult<EventSummary> {
    let dateobs = parse_dateobs(&dateobs)?;
    Ok(Json(state.service.event_summary(dateobs).await?))
}

/// GET /v1/events/{dateobs}/notices
pub async fn list_notices(
    State(state): State<AppState>,
    Path(dateobs): Path<String>,
) -> HandlerResult<Vec<NoticeDto>> {
    let dateobs = parse_dateobs(&dateobs)?;
    let notices = state.service.notices(dateobs).await?;
    Ok(Json(notices.into_iter().map(Into::into).collect()))
}

/// GET /v1/events/{dateobs}/localizations
pub async fn list_localizations(
    State(state): State<AppState>,
    Path(dateobs): Path<String>,
) -> HandlerResult<Vec<LocalizationDto>> {
    let dateobs = parse_dateobs(&dateobs)?;
    let localizations = state.service.localizations(dateobs).await?;
    Ok(Json(
        localizations
            .into_iter()
            .map(|l| LocalizationDto {
                total_probability: l.total_probability(),
                localization_name: l.localization_name,
                credible_area_deg2: l.credible_area_deg2,
            })
            .collect(),
    ))
}

/// GET /v1/events/{dateobs}/plans
pub async fn list_plans(
    State(state): State<AppState>,
    Path(dateobs): Path<String>,
) -> HandlerResult<Vec<crate::models::Plan>> {
    let dateobs = parse_dateobs(&dateobs)?;
    Ok(Json(state.repository.plans_for_event(dateobs).await?))
}

/// GET /v1/events/{dateobs}/plans/{telescope}/{plan_name}
pub async fn get_plan(
    State(state): State<AppState>,
    Path((dateobs, telescope, plan_name)): Path<(String, String, String)>,
) -> HandlerResult<PlanDetailResponse> {
    let dateobs = parse_dateobs(&dateobs)?;
    let (plan, observations) = state
        .service
        .plan_detail(dateobs, &telescope, &plan_name)
        .await?;
    Ok(Json(PlanDetailResponse { plan, observations }))
}

// =============================================================================
// Notice ingestion
// =============================================================================

/// POST /v1/notices
///
/// Ingest a raw VOEvent XML payload, exactly as the GCN listener would.
pub async fn ingest_notice(
    State(state): State<AppState>,
    body: String,
) -> HandlerResult<IngestResponse> {
    let outcome = state
        .pipeline
        .handle(body.as_bytes())
        .await
        .map_err(|e| AppError::BadRequest(format!("{e:#}")))?;
    Ok(Json(outcome.into()))
}

// =============================================================================
// Follow-up jobs
// =============================================================================

/// GET /v1/jobs/{job_id}
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> HandlerResult<JobStatusResponse> {
    let job = state
        .job_tracker
        .get_job(&job_id)
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))?;

    Ok(Json(JobStatusResponse {
        job_id: job.job_id,
        status: format!("{:?}", job.status).to_lowercase(),
        logs: job.logs,
        result: job.result,
    }))
}

/// GET /v1/jobs/{job_id}/logs
///
/// Stream job logs via Server-Sent Events (SSE).
pub async fn stream_job_logs(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    if state.job_tracker.get_job(&job_id).is_none() {
        return Err(AppError::NotFound(format!("Job {} not found", job_id)));
    }

    let tracker = state.job_tracker.clone();
    let stream = async_stream::stream! {
        let mut last_log_count = 0;
        loop {
            let logs = tracker.get_logs(&job_id);
            for log in logs.iter().skip(last_log_count) {
                let event_data = serde_json::to_string(log).unwrap_or_default();
                yield Ok(Event::default().data(event_data));
            }
            last_log_count = logs.len();

            if let Some(job) = tracker.get_job(&job_id) {
                if job.status != JobStatus::Running {
                    let final_event = serde_json::json!({
                        "status": job.status,
                        "result": job.result,
                    });
                    yield Ok(Event::default()
                        .event("complete")
                        .data(serde_json::to_string(&final_event).unwrap_or_default()));
                    break;
                }
            } else {
                break;
            }

            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    };

    Ok(Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(1))
            .text("keep-alive"),
    ))
}
