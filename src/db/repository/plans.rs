//! Observation plan repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::RepositoryResult;
use crate::models::{Plan, PlannedObservation};

/// Repository trait for observation plans and their exposures.
///
/// Plans are keyed by the composite (`dateobs`, `telescope`, `plan_name`).
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Store a plan together with its exposures, replacing any plan with the
    /// same composite key.
    async fn store_plan(
        &self,
        plan: &Plan,
        observations: &[PlannedObservation],
    ) -> RepositoryResult<()>;

    /// Fetch a plan by its composite key.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` if no such plan exists.
    async fn get_plan(
        &self,
        dateobs: DateTime<Utc>,
        telescope: &str,
        plan_name: &str,
    ) -> RepositoryResult<Plan>;

    /// All plans for an event, across telescopes.
    async fn plans_for_event(&self, dateobs: DateTime<Utc>) -> RepositoryResult<Vec<Plan>>;

    /// Exposures of a plan, in observation order.
    async fn planned_observations(
        &self,
        dateobs: DateTime<Utc>,
        telescope: &str,
        plan_name: &str,
    ) -> RepositoryResult<Vec<PlannedObservation>>;
}
