//! In-memory local repository implementation.
//!
//! Stores everything in `HashMap`s behind an `RwLock`, giving tests and local
//! development fast, deterministic, isolated storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::db::repository::{
    ErrorContext, EventRepository, PlanRepository, RepositoryError, RepositoryResult,
};
use crate::models::{Event, GcnNotice, Localization, Plan, PlannedObservation};

type PlanKey = (DateTime<Utc>, String, String);

/// In-memory local repository.
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

#[derive(Default)]
struct LocalData {
    events: HashMap<DateTime<Utc>, Event>,
    /// Notices by ivorn, with per-event arrival order.
    notices: HashMap<String, GcnNotice>,
    notices_by_event: HashMap<DateTime<Utc>, Vec<String>>,
    localizations: HashMap<DateTime<Utc>, Vec<Localization>>,
    plans: HashMap<PlanKey, Plan>,
    planned_observations: HashMap<PlanKey, Vec<PlannedObservation>>,

    // Connection health, settable for testing failure paths.
    unhealthy: bool,
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().unwrap().unhealthy = !healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write().unwrap();
        let unhealthy = data.unhealthy;
        *data = LocalData {
            unhealthy,
            ..Default::default()
        };
    }

    /// Number of events stored.
    pub fn event_count(&self) -> usize {
        self.data.read().unwrap().events.len()
    }

    /// Number of notices stored across all events.
    pub fn notice_count(&self) -> usize {
        self.data.read().unwrap().notices.len()
    }

    fn check_health(&self) -> RepositoryResult<()> {
        if self.data.read().unwrap().unhealthy {
            return Err(RepositoryError::connection("Database is not healthy"));
        }
        Ok(())
    }
}

#[async_trait]
impl EventRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(!self.data.read().unwrap().unhealthy)
    }

    async fn upsert_event(
        &self,
        dateobs: DateTime<Utc>,
        tags: &[String],
    ) -> RepositoryResult<Event> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        let event = data
            .events
            .entry(dateobs)
            .or_insert_with(|| Event::new(dateobs, Vec::new()));
        event.merge_tags(tags);
        Ok(event.clone())
    }

    async fn get_event(&self, dateobs: DateTime<Utc>) -> RepositoryResult<Event> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        data.events.get(&dateobs).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                "Event not found",
                ErrorContext::new("get_event")
                    .with_entity("event")
                    .with_entity_id(dateobs),
            )
        })
    }

    async fn list_events(&self) -> RepositoryResult<Vec<Event>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        let mut events: Vec<Event> = data.events.values().cloned().collect();
        events.sort_by(|a, b| b.dateobs.cmp(&a.dateobs));
        Ok(events)
    }

    async fn insert_notice(&self, notice: &GcnNotice) -> RepositoryResult<bool> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        if data.notices.contains_key(&notice.ivorn) {
            return Ok(false);
        }
        data.notices.insert(notice.ivorn.clone(), notice.clone());
        data.notices_by_event
            .entry(notice.event_dateobs())
            .or_default()
            .push(notice.ivorn.clone());
        Ok(true)
    }

    async fn notices_for_event(
        &self,
        dateobs: DateTime<Utc>,
    ) -> RepositoryResult<Vec<GcnNotice>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        Ok(data
            .notices_by_event
            .get(&dateobs)
            .map(|ivorns| {
                ivorns
                    .iter()
                    .filter_map(|ivorn| data.notices.get(ivorn).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn store_localization(&self, localization: &Localization) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        let entries = data.localizations.entry(localization.dateobs).or_default();
        entries.retain(|l| l.localization_name != localization.localization_name);
        entries.push(localization.clone());
        Ok(())
    }

    async fn localizations_for_event(
        &self,
        dateobs: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Localization>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        Ok(data.localizations.get(&dateobs).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl PlanRepository for LocalRepository {
    async fn store_plan(
        &self,
        plan: &Plan,
        observations: &[PlannedObservation],
    ) -> RepositoryResult<()> {
        self.check_health()?;
        let key = (plan.dateobs, plan.telescope.clone(), plan.plan_name.clone());
        let mut data = self.data.write().unwrap();
        data.plans.insert(key.clone(), plan.clone());
        data.planned_observations.insert(key, observations.to_vec());
        Ok(())
    }

    async fn get_plan(
        &self,
        dateobs: DateTime<Utc>,
        telescope: &str,
        plan_name: &str,
    ) -> RepositoryResult<Plan> {
        self.check_health()?;
        let key = (dateobs, telescope.to_string(), plan_name.to_string());
        let data = self.data.read().unwrap();
        data.plans.get(&key).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                "Plan not found",
                ErrorContext::new("get_plan")
                    .with_entity("plan")
                    .with_entity_id(format!("{}/{}/{}", dateobs, telescope, plan_name)),
            )
        })
    }

    async fn plans_for_event(&self, dateobs: DateTime<Utc>) -> RepositoryResult<Vec<Plan>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        let mut plans: Vec<Plan> = data
            .plans
            .values()
            .filter(|p| p.dateobs == dateobs)
            .cloned()
            .collect();
        plans.sort_by(|a, b| {
            a.telescope
                .cmp(&b.telescope)
                .then_with(|| a.plan_name.cmp(&b.plan_name))
        });
        Ok(plans)
    }

    async fn planned_observations(
        &self,
        dateobs: DateTime<Utc>,
        telescope: &str,
        plan_name: &str,
    ) -> RepositoryResult<Vec<PlannedObservation>> {
        self.check_health()?;
        let key = (dateobs, telescope.to_string(), plan_name.to_string());
        let data = self.data.read().unwrap();
        Ok(data.planned_observations.get(&key).cloned().unwrap_or_default())
    }
}
