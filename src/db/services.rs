//! High-level read operations built on top of the repository traits.
//!
//! The ingestion handler writes through the repository directly; this service
//! assembles the aggregate views the HTTP API serves.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::repository::{EventRepository, FullRepository, PlanRepository, RepositoryResult};
use crate::models::{Event, GcnNotice, Localization, Plan, PlannedObservation};

/// Aggregate view of an event: tags plus everything hanging off it.
#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    pub event: Event,
    pub notice_count: usize,
    pub localization_names: Vec<String>,
    pub plans: Vec<Plan>,
}

/// Read-side service over a repository.
#[derive(Clone)]
pub struct EventService {
    repository: Arc<dyn FullRepository>,
}

impl EventService {
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self { repository }
    }

    /// List all events, most recent first.
    pub async fn list_events(&self) -> RepositoryResult<Vec<Event>> {
        self.repository.list_events().await
    }

    /// Assemble the aggregate view of one event.
    pub async fn event_summary(&self, dateobs: DateTime<Utc>) -> RepositoryResult<EventSummary> {
        let event = self.repository.get_event(dateobs).await?;
        let notices = self.repository.notices_for_event(dateobs).await?;
        let localizations = self.repository.localizations_for_event(dateobs).await?;
        let plans = self.repository.plans_for_event(dateobs).await?;

        Ok(EventSummary {
            event,
            notice_count: notices.len(),
            localization_names: localizations
                .iter()
                .map(|l| l.localization_name.clone())
                .collect(),
            plans,
        })
    }

    /// Notices of an event, in arrival order.
    pub async fn notices(&self, dateobs: DateTime<Utc>) -> RepositoryResult<Vec<GcnNotice>> {
        self.repository.notices_for_event(dateobs).await
    }

    /// Localizations of an event.
    pub async fn localizations(
        &self,
        dateobs: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Localization>> {
        self.repository.localizations_for_event(dateobs).await
    }

    /// One plan together with its exposures.
    pub async fn plan_detail(
        &self,
        dateobs: DateTime<Utc>,
        telescope: &str,
        plan_name: &str,
    ) -> RepositoryResult<(Plan, Vec<PlannedObservation>)> {
        let plan = self.repository.get_plan(dateobs, telescope, plan_name).await?;
        let observations = self
            .repository
            .planned_observations(dateobs, telescope, plan_name)
            .await?;
        Ok((plan, observations))
    }
}
