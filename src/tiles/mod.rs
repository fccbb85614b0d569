//! Telescope tiling of localizations.
//!
//! Tiling projects a probability sky map onto a telescope's field catalog:
//! every grid pixel is assigned to its nearest field center, and fields are
//! ranked by the probability mass they enclose. The ranked list feeds the
//! plan generator.

use crate::models::{Localization, Telescope};
use crate::skymaps::grid::{unit_vector, SkyGrid};

/// Probability mass enclosed by one telescope field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldProbability {
    pub field_id: u32,
    pub probability: f64,
}

/// Tile a localization onto a telescope's field grid.
///
/// Returns fields carrying nonzero probability, ranked by descending
/// probability mass.
pub fn tile(localization: &Localization, telescope: &Telescope) -> Vec<FieldProbability> {
    let fields = telescope.field_grid();
    if fields.is_empty() {
        return Vec::new();
    }
    let centers: Vec<[f64; 3]> = fields.iter().map(|f| unit_vector(f.ra, f.dec)).collect();

    let grid = SkyGrid::shared();
    let mut mass = vec![0.0_f64; fields.len()];
    for (pixel, &p) in grid.pixel_vectors().iter().zip(&localization.flat_2d) {
        if p <= 0.0 {
            continue;
        }
        // Nearest field center by maximum dot product.
        let mut best = 0usize;
        let mut best_dot = f64::NEG_INFINITY;
        for (i, c) in centers.iter().enumerate() {
            let dot = pixel[0] * c[0] + pixel[1] * c[1] + pixel[2] * c[2];
            if dot > best_dot {
                best_dot = dot;
                best = i;
            }
        }
        mass[best] += p;
    }

    let mut ranked: Vec<FieldProbability> = fields
        .iter()
        .zip(&mass)
        .filter(|(_, &m)| m > 0.0)
        .map(|(f, &m)| FieldProbability {
            field_id: f.field_id,
            probability: m,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}
