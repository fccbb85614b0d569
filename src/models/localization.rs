use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A probability sky map associated with an event.
///
/// The map is stored flattened over the equal-area pixel grid defined in
/// [`crate::skymaps`]. Invariant: the flattened density sums to 1.0 within
/// floating tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Localization {
    /// Event key this localization belongs to.
    pub dateobs: DateTime<Utc>,
    /// Name derived from the cone parameters, e.g. `184.370_-58.360_5.000`.
    pub localization_name: String,
    /// Flattened per-pixel probability, normalized to unit sum.
    pub flat_2d: Vec<f64>,
    /// Area of the 90% credible region in square degrees, once contoured.
    pub credible_area_deg2: Option<f64>,
}

impl Localization {
    /// Total probability of the flattened map. Should be ~1.0.
    pub fn total_probability(&self) -> f64 {
        self.flat_2d.iter().sum()
    }
}
