//! Observation plan generation.
//!
//! A plan turns a ranked field list (from [`crate::tiles`]) into a sequence
//! of exposures for one telescope: fields are accumulated greedily until the
//! requested probability threshold is enclosed, then each retained field is
//! exposed once per filter block.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Plan, PlanStatus, PlannedObservation, Telescope};
use crate::tiles::FieldProbability;

/// Parameters controlling plan generation.
///
/// The defaults reproduce the standard GRB follow-up setup: a g-r-g filter
/// block, 300 s exposures, greedy scheduling to the 90% credible mass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanParams {
    /// Filter sequence, one block of exposures per entry.
    pub filters: Vec<String>,
    /// Exposure time per field in seconds; strictly positive.
    pub exposure_time: f64,
    /// Scheduling algorithm name; only `greedy` is implemented.
    pub schedule_type: String,
    /// Filter schedule layout (`block`: all fields in one filter, then the next).
    pub filter_schedule_type: String,
    pub do_dither: bool,
    pub do_references: bool,
    /// Probability mass to enclose, in `(0, 1]`.
    pub probability: f64,
    /// How long the plan stays valid after the event, in days.
    pub validity_days: i64,
}

impl Default for PlanParams {
    fn default() -> Self {
        Self {
            filters: vec!["g".into(), "r".into(), "g".into()],
            exposure_time: 300.0,
            schedule_type: "greedy".into(),
            filter_schedule_type: "block".into(),
            do_dither: false,
            do_references: true,
            probability: 0.9,
            validity_days: 3,
        }
    }
}

impl PlanParams {
    /// Render the composite plan name, e.g. `grg_greedy_0_1_block_300_90`.
    pub fn plan_name(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}_{}_{}",
            self.filters.concat(),
            self.schedule_type,
            self.do_dither as u8,
            self.do_references as u8,
            self.filter_schedule_type,
            self.exposure_time as i64,
            (100.0 * self.probability) as i64,
        )
    }
}

/// Generate an observation plan from a ranked field list.
///
/// Fields are taken in rank order until the cumulative probability reaches
/// `params.probability`; each retained field gets one exposure per filter
/// block, weighted by its probability relative to the best field.
pub fn generate_plan(
    dateobs: DateTime<Utc>,
    telescope: &Telescope,
    ranked_fields: &[FieldProbability],
    params: &PlanParams,
) -> (Plan, Vec<PlannedObservation>) {
    let plan_name = params.plan_name();
    let plan = Plan {
        dateobs,
        telescope: telescope.name.clone(),
        plan_name: plan_name.clone(),
        validity_window_start: dateobs,
        validity_window_end: dateobs + Duration::days(params.validity_days),
        status: PlanStatus::Ready,
        created_at: Utc::now(),
    };

    let mut selected = Vec::new();
    let mut cumulative = 0.0;
    for field in ranked_fields {
        if cumulative >= params.probability {
            break;
        }
        selected.push(*field);
        cumulative += field.probability;
    }

    let max_probability = selected
        .first()
        .map(|f| f.probability)
        .filter(|&p| p > 0.0)
        .unwrap_or(1.0);

    let mut observations = Vec::with_capacity(selected.len() * params.filters.len());
    let mut obs_order = 0u32;
    for filter_id in &params.filters {
        for field in &selected {
            observations.push(PlannedObservation {
                dateobs,
                telescope: telescope.name.clone(),
                plan_name: plan_name.clone(),
                field_id: field.field_id,
                filter_id: filter_id.clone(),
                exposure_time: params.exposure_time,
                weight: field.probability / max_probability,
                obs_order,
            });
            obs_order += 1;
        }
    }

    (plan, observations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time::parse_isotime;

    fn ranked() -> Vec<FieldProbability> {
        vec![
            FieldProbability { field_id: 412, probability: 0.55 },
            FieldProbability { field_id: 413, probability: 0.30 },
            FieldProbability { field_id: 380, probability: 0.10 },
            FieldProbability { field_id: 379, probability: 0.05 },
        ]
    }

    fn dateobs() -> DateTime<Utc> {
        parse_isotime("2018-01-16T00:36:53").unwrap()
    }

    #[test]
    fn test_default_plan_name() {
        assert_eq!(PlanParams::default().plan_name(), "grg_greedy_0_1_block_300_90");
    }

    #[test]
    fn test_greedy_stops_at_threshold() {
        let (_, obs) = generate_plan(dateobs(), &Telescope::ztf(), &ranked(), &PlanParams::default());
        // 0.55 + 0.30 + 0.10 >= 0.9 after three fields; three filter blocks.
        assert_eq!(obs.len(), 9);
        assert!(obs.iter().all(|o| o.field_id != 379));
    }

    #[test]
    fn test_weights_normalized_to_best_field() {
        let (_, obs) = generate_plan(dateobs(), &Telescope::ztf(), &ranked(), &PlanParams::default());
        assert!(obs.iter().all(|o| o.weight > 0.0 && o.weight <= 1.0));
        assert!(obs.iter().any(|o| (o.weight - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_exposures_positive_and_ordered() {
        let (_, obs) = generate_plan(dateobs(), &Telescope::ztf(), &ranked(), &PlanParams::default());
        assert!(obs.iter().all(|o| o.exposure_time > 0.0));
        for (i, o) in obs.iter().enumerate() {
            assert_eq!(o.obs_order as usize, i);
        }
    }

    #[test]
    fn test_block_filter_schedule_layout() {
        let (_, obs) = generate_plan(dateobs(), &Telescope::ztf(), &ranked(), &PlanParams::default());
        // First block all g, second all r, third all g again.
        assert!(obs[..3].iter().all(|o| o.filter_id == "g"));
        assert!(obs[3..6].iter().all(|o| o.filter_id == "r"));
        assert!(obs[6..].iter().all(|o| o.filter_id == "g"));
    }

    #[test]
    fn test_plan_validity_window() {
        let (plan, _) = generate_plan(dateobs(), &Telescope::ztf(), &ranked(), &PlanParams::default());
        assert_eq!(plan.validity_window_start, dateobs());
        assert_eq!(plan.validity_window_end - plan.validity_window_start, Duration::days(3));
        assert_eq!(plan.status, PlanStatus::Ready);
    }

    #[test]
    fn test_empty_field_list_yields_empty_plan() {
        let (plan, obs) = generate_plan(dateobs(), &Telescope::ztf(), &[], &PlanParams::default());
        assert!(obs.is_empty());
        assert_eq!(plan.plan_name, "grg_greedy_0_1_block_300_90");
    }
}
