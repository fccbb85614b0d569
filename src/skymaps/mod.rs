//! Probability sky maps.
//!
//! Localizations are held on a fixed equal-area pixel grid: declination bands
//! equally spaced in `cos(colatitude)` (so each band covers the same solid
//! angle), each split into the same number of pixels. Every pixel therefore
//! subtends `4*pi / N` steradians, and a normalized map is just a per-pixel
//! probability vector summing to one.
//!
//! Cone localizations (Fermi GBM positions, AMON events) are rendered as a
//! von Mises-Fisher density around the best-fit position. This is not a
//! substitute for a proper detector likelihood map; it exists to rank fields
//! for tiling and to report credible-region areas.

pub mod contour;
pub mod grid;

pub use contour::{contour, ContourSet};
pub use grid::SkyGrid;

use chrono::{DateTime, Utc};

use crate::models::Localization;
use crate::gcn::voevent::ConePosition;

/// Error radii below this are clamped so the Fisher concentration stays
/// finite (well-localized events still get a sharply peaked map).
const MIN_ERROR_RADIUS_DEG: f64 = 0.05;

/// Build a normalized cone localization around a best-fit position.
pub fn from_cone(dateobs: DateTime<Utc>, cone: &ConePosition) -> Localization {
    let grid = SkyGrid::shared();
    let center = grid::unit_vector(cone.ra, cone.dec);
    let sigma_rad = cone.error_radius.max(MIN_ERROR_RADIUS_DEG).to_radians();
    // Fisher concentration for a cone of half-angle sigma.
    let kappa = 1.0 / (sigma_rad * sigma_rad);

    let mut flat: Vec<f64> = grid
        .pixel_vectors()
        .iter()
        .map(|v| {
            let cos_dist = v[0] * center[0] + v[1] * center[1] + v[2] * center[2];
            // Subtract kappa so the exponent peaks at zero; the constant
            // factor cancels in normalization and avoids overflow for
            // tight cones.
            (kappa * (cos_dist - 1.0)).exp()
        })
        .collect();

    let total: f64 = flat.iter().sum();
    if total > 0.0 {
        for p in &mut flat {
            *p /= total;
        }
    }

    Localization {
        dateobs,
        localization_name: format!("{:.3}_{:.3}_{:.3}", cone.ra, cone.dec, cone.error_radius),
        flat_2d: flat,
        credible_area_deg2: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time::parse_isotime;

    fn cone(ra: f64, dec: f64, err: f64) -> Localization {
        from_cone(
            parse_isotime("2018-01-16T00:36:53").unwrap(),
            &ConePosition {
                ra,
                dec,
                error_radius: err,
            },
        )
    }

    #[test]
    fn test_cone_map_normalized() {
        let loc = cone(184.37, -58.36, 5.0);
        assert!((loc.total_probability() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_radius_still_normalized() {
        let loc = cone(10.0, 0.0, 0.0);
        assert!((loc.total_probability() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_probability_peaks_at_center() {
        let loc = cone(90.0, 30.0, 3.0);
        let grid = SkyGrid::shared();
        let peak_pixel = loc
            .flat_2d
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        let center = grid::unit_vector(90.0, 30.0);
        let v = grid.pixel_vectors()[peak_pixel];
        let cos_dist = v[0] * center[0] + v[1] * center[1] + v[2] * center[2];
        // Peak pixel center within a few degrees of the cone center.
        assert!(cos_dist > (6.0_f64).to_radians().cos());
    }

    #[test]
    fn test_localization_name_encodes_cone() {
        let loc = cone(184.37, -58.36, 5.0);
        assert_eq!(loc.localization_name, "184.370_-58.360_5.000");
    }

    #[test]
    fn test_wide_cone_flatter_than_narrow() {
        let narrow = cone(0.0, 0.0, 1.0);
        let wide = cone(0.0, 0.0, 30.0);
        let max_narrow = narrow.flat_2d.iter().cloned().fold(0.0, f64::max);
        let max_wide = wide.flat_2d.iter().cloned().fold(0.0, f64::max);
        assert!(max_narrow > max_wide);
    }
}
