//! Follow-up of a localized notice: sky map, contours, tiling and plans.
//!
//! Runs inline on the ingestion path so a stored notice and its plans become
//! visible atomically from the caller's point of view. The numeric work is
//! pushed onto the blocking pool.

use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};

use crate::db::{EventRepository, FullRepository, PlanRepository};
use crate::gcn::voevent::ConePosition;
use crate::models::Telescope;
use crate::plans::{generate_plan, PlanParams};
use crate::skymaps::{self, contour};
use crate::tasks::job_tracker::{JobTracker, LogLevel};
use crate::tiles::tile;

/// What a follow-up run produced.
#[derive(Debug, Clone)]
pub struct FollowupResult {
    pub localization_name: String,
    /// Area of the 90% credible region, square degrees.
    pub area_90_deg2: f64,
    /// (telescope, plan_name) pairs stored.
    pub plans: Vec<(String, String)>,
}

/// Build and persist the localization and one plan per telescope.
pub async fn run_followup(
    job_id: &str,
    tracker: &JobTracker,
    repository: &Arc<dyn FullRepository>,
    dateobs: DateTime<Utc>,
    cone: ConePosition,
    telescopes: &[Telescope],
    params: &PlanParams,
) -> anyhow::Result<FollowupResult> {
    tracker.log(
        job_id,
        LogLevel::Info,
        format!(
            "Building localization at ra={:.3} dec={:.3} err={:.3}",
            cone.ra, cone.dec, cone.error_radius
        ),
    );

    let (mut localization, contours) = tokio::task::spawn_blocking(move || {
        let localization = skymaps::from_cone(dateobs, &cone);
        let contours = contour(&localization);
        (localization, contours)
    })
    .await
    .context("Localization task panicked")?;

    localization.credible_area_deg2 = Some(contours.area_90_deg2);
    repository
        .store_localization(&localization)
        .await
        .context("Failed to store localization")?;
    tracker.log(
        job_id,
        LogLevel::Success,
        format!(
            "Localization {} stored, 90% area {:.1} deg2",
            localization.localization_name, contours.area_90_deg2
        ),
    );

    let mut plans = Vec::with_capacity(telescopes.len());
    for telescope in telescopes {
        let loc = localization.clone();
        let scope = telescope.clone();
        let plan_params = params.clone();
        let (plan, observations) = tokio::task::spawn_blocking(move || {
            let ranked = tile(&loc, &scope);
            generate_plan(dateobs, &scope, &ranked, &plan_params)
        })
        .await
        .context("Tiling task panicked")?;

        if observations.is_empty() {
            tracker.log(
                job_id,
                LogLevel::Warning,
                format!("No fields with probability mass for {}", telescope.name),
            );
            continue;
        }

        repository
            .store_plan(&plan, &observations)
            .await
            .with_context(|| format!("Failed to store plan for {}", telescope.name))?;
        tracker.log(
            job_id,
            LogLevel::Success,
            format!(
                "Plan {} for {} stored with {} exposures",
                plan.plan_name,
                telescope.name,
                observations.len()
            ),
        );
        plans.push((telescope.name.clone(), plan.plan_name));
    }

    Ok(FollowupResult {
        localization_name: localization.localization_name,
        area_90_deg2: contours.area_90_deg2,
        plans,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::models::time::parse_isotime;

    #[tokio::test]
    async fn test_followup_stores_localization_and_plans() {
        let repo: Arc<dyn FullRepository> = Arc::new(LocalRepository::new());
        let tracker = JobTracker::new();
        let job_id = tracker.create_job("ivo://test");
        let dateobs = parse_isotime("2018-01-16T00:36:53").unwrap();

        let result = run_followup(
            &job_id,
            &tracker,
            &repo,
            dateobs,
            ConePosition {
                ra: 184.37,
                dec: -58.36,
                error_radius: 5.0,
            },
            &[Telescope::ztf()],
            &PlanParams::default(),
        )
        .await
        .unwrap();

        assert_eq!(result.localization_name, "184.370_-58.360_5.000");
        assert!(result.area_90_deg2 > 0.0);
        assert_eq!(result.plans.len(), 1);

        let stored = repo.localizations_for_event(dateobs).await.unwrap();
        assert_eq!(stored[0].credible_area_deg2, Some(result.area_90_deg2));

        let (telescope, plan_name) = &result.plans[0];
        let obs = repo
            .planned_observations(dateobs, telescope, plan_name)
            .await
            .unwrap();
        assert!(!obs.is_empty());
        assert!(!tracker.get_logs(&job_id).is_empty());
    }
}
