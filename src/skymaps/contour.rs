//! Credible-region contours for localizations.
//!
//! The credible level of a pixel is the smallest probability mass one must
//! enclose (taking pixels in descending density order) before that pixel is
//! included. Ranking pixels and taking a cumulative sum gives the whole
//! contour structure in one pass.

use crate::models::Localization;
use super::grid::SkyGrid;

/// Contour summary for a localization.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourSet {
    /// Per-pixel credible level, same indexing as the flat map.
    pub credible_levels: Vec<f64>,
    /// Area of the 90% credible region, square degrees.
    pub area_90_deg2: f64,
}

/// Compute per-pixel credible levels and the 90% credible-region area.
pub fn contour(localization: &Localization) -> ContourSet {
    let flat = &localization.flat_2d;
    let mut order: Vec<usize> = (0..flat.len()).collect();
    order.sort_by(|&a, &b| flat[b].partial_cmp(&flat[a]).unwrap_or(std::cmp::Ordering::Equal));

    let mut credible_levels = vec![0.0; flat.len()];
    let mut cumulative = 0.0;
    let mut pixels_in_90 = 0usize;
    for &idx in &order {
        // Level of a pixel is the mass enclosed *before* it joins the region.
        credible_levels[idx] = cumulative;
        if cumulative < 0.9 {
            pixels_in_90 += 1;
        }
        cumulative += flat[idx];
    }

    let area_90_deg2 = pixels_in_90 as f64 * SkyGrid::shared().pixel_area_deg2();
    ContourSet {
        credible_levels,
        area_90_deg2,
    }
}
