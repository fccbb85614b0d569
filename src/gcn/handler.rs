//! Ingestion entry point: one raw payload in, rows and follow-up out.
//!
//! `Pipeline::handle` is called once per frame from the VTP listener (or
//! directly by tests). The whole follow-up chain runs inline, so when the
//! call returns the notice, its event, any localization and any plans are
//! all visible in the repository.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;

use crate::config::PipelineConfig;
use crate::db::{calculate_checksum, EventRepository, FullRepository};
use crate::models::{GcnNotice, Telescope};
use crate::plans::PlanParams;
use crate::tasks::followup::run_followup;
use crate::tasks::job_tracker::{JobTracker, LogLevel};
use crate::tasks::Notifier;

use super::classify::tags_for;
use super::voevent::VoEvent;

/// What `handle` did with a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// Transport heartbeat, acknowledged but not stored.
    Iamalive,
    /// Notice stored (and follow-up run, when the notice was localized).
    Ingested {
        dateobs: chrono::DateTime<Utc>,
        ivorn: String,
        tags: Vec<String>,
        job_id: String,
        /// (telescope, plan_name) pairs stored by follow-up.
        plans: Vec<(String, String)>,
    },
    /// A notice with this ivorn already exists; nothing was written.
    Duplicate { ivorn: String },
}

/// The ingestion pipeline.
pub struct Pipeline {
    repository: Arc<dyn FullRepository>,
    notifier: Arc<dyn Notifier>,
    tracker: JobTracker,
    telescopes: Vec<Telescope>,
    plan_params: PlanParams,
}

impl Pipeline {
    pub fn new(
        repository: Arc<dyn FullRepository>,
        notifier: Arc<dyn Notifier>,
        config: &PipelineConfig,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            repository,
            notifier,
            tracker: JobTracker::new(),
            telescopes: config.resolve_telescopes()?,
            plan_params: config.plan.clone(),
        })
    }

    /// Follow-up job tracker, shared with the HTTP API.
    pub fn tracker(&self) -> &JobTracker {
        &self.tracker
    }

    /// Ingest one raw VOEvent payload.
    pub async fn handle(&self, payload: &[u8]) -> anyhow::Result<IngestOutcome> {
        let voevent = VoEvent::parse(payload).context("Failed to parse VOEvent payload")?;
        if voevent.is_iamalive() {
            return Ok(IngestOutcome::Iamalive);
        }

        let notice_type = voevent.notice_type()?;
        let dateobs = voevent.dateobs()?;
        let notice = GcnNotice {
            ivorn: voevent.ivorn.clone(),
            notice_type,
            stream: voevent.stream(),
            date: voevent.who_date.unwrap_or_else(Utc::now),
            dateobs,
            content: payload.to_vec(),
        };
        let event_dateobs = notice.event_dateobs();
        let tags = tags_for(notice_type, &voevent);

        let job_id = self.tracker.create_job(notice.ivorn.as_str());
        self.tracker.log(
            &job_id,
            LogLevel::Info,
            format!(
                "Notice {:?} for event {} (payload sha256 {})",
                notice_type,
                event_dateobs.format("%Y-%m-%dT%H:%M:%S"),
                calculate_checksum(payload)
            ),
        );

        match self
            .ingest(&job_id, &voevent, notice_type, &notice, &tags)
            .await
        {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.tracker.fail_job(&job_id, format!("{e:#}"));
                Err(e)
            }
        }
    }

    async fn ingest(
        &self,
        job_id: &str,
        voevent: &VoEvent,
        notice_type: super::NoticeType,
        notice: &GcnNotice,
        tags: &[String],
    ) -> anyhow::Result<IngestOutcome> {
        let event_dateobs = notice.event_dateobs();
        let event = self.repository.upsert_event(event_dateobs, tags).await?;

        if !self.repository.insert_notice(notice).await? {
            self.tracker.log(
                job_id,
                LogLevel::Warning,
                format!("Notice {} already ingested, skipping", notice.ivorn),
            );
            self.tracker.complete_job(
                job_id,
                Some(serde_json::json!({ "duplicate": true })),
            );
            return Ok(IngestOutcome::Duplicate {
                ivorn: notice.ivorn.clone(),
            });
        }
        self.tracker.log(
            job_id,
            LogLevel::Success,
            format!("Event tags now {:?}", event.tags),
        );

        let mut plans = Vec::new();
        if let Some(cone) = voevent.position {
            let result = run_followup(
                job_id,
                &self.tracker,
                &self.repository,
                event_dateobs,
                cone,
                &self.telescopes,
                &self.plan_params,
            )
            .await?;
            plans = result.plans;
        } else {
            self.tracker.log(
                job_id,
                LogLevel::Info,
                "Notice carries no position, skipping localization",
            );
        }

        // Humans are only paged for gravitational-wave events. Retractions
        // and test-role notices stay quiet.
        if notice_type.is_lvc()
            && voevent.role != "test"
            && !tags.iter().any(|t| t == "retraction")
        {
            self.notifier.call_everyone(&event).await?;
            self.notifier
                .text_everyone(&event, &format!("New LVC event {}", event))
                .await?;
            self.tracker
                .log(job_id, LogLevel::Success, "Responders paged");
        }

        self.tracker.complete_job(
            job_id,
            Some(serde_json::json!({
                "dateobs": event_dateobs,
                "tags": event.tags.clone(),
                "plans": plans.clone(),
            })),
        );

        Ok(IngestOutcome::Ingested {
            dateobs: event_dateobs,
            ivorn: notice.ivorn.clone(),
            tags: event.tags,
            job_id: job_id.to_string(),
            plans,
        })
    }
}
