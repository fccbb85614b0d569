use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of an observation plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Working,
    Ready,
    Submitted,
}

/// An observation plan for one telescope and one event.
///
/// Plans are keyed by the composite (`dateobs`, `telescope`, `plan_name`),
/// where the name encodes the filter sequence, scheduling algorithm,
/// dither/reference flags, filter-schedule type, exposure time and
/// probability threshold, e.g. `grg_greedy_0_1_block_300_90`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub dateobs: DateTime<Utc>,
    pub telescope: String,
    pub plan_name: String,
    pub validity_window_start: DateTime<Utc>,
    pub validity_window_end: DateTime<Utc>,
    pub status: PlanStatus,
    pub created_at: DateTime<Utc>,
}

/// A single exposure belonging to a [`Plan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedObservation {
    pub dateobs: DateTime<Utc>,
    pub telescope: String,
    pub plan_name: String,
    /// Field identifier; bounded by the telescope's field catalog size.
    pub field_id: u32,
    /// Filter for this exposure, e.g. `g` or `r`.
    pub filter_id: String,
    /// Exposure time in seconds; strictly positive.
    pub exposure_time: f64,
    /// Relative weight of the field in the localization, in `[0, 1]`.
    pub weight: f64,
    /// Position of this exposure in the plan sequence.
    pub obs_order: u32,
}
