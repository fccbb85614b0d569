use std::sync::OnceLock;

/// Declination bands in the grid.
const N_RINGS: usize = 64;
/// Pixels per band.
const N_PER_RING: usize = 128;

/// Fixed equal-area pixel grid over the whole sky.
///
/// Band boundaries are equally spaced in `cos(colatitude)`, so every band has
/// the same solid angle; splitting each band into the same pixel count makes
/// every pixel equal-area. Pixel centers are precomputed as unit vectors.
pub struct SkyGrid {
    vectors: Vec<[f64; 3]>,
}

impl SkyGrid {
    /// Process-wide shared grid. The grid is immutable and a few hundred
    /// kilobytes, so one copy serves every localization.
    pub fn shared() -> &'static SkyGrid {
        static GRID: OnceLock<SkyGrid> = OnceLock::new();
        GRID.get_or_init(SkyGrid::build)
    }

    fn build() -> Self {
        let mut vectors = Vec::with_capacity(N_RINGS * N_PER_RING);
        for ring in 0..N_RINGS {
            // Midpoint of the band in cos(colatitude), from +1 (north pole)
            // down to -1.
            let cos_theta = 1.0 - 2.0 * (ring as f64 + 0.5) / N_RINGS as f64;
            let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
            for j in 0..N_PER_RING {
                let phi = 2.0 * std::f64::consts::PI * (j as f64 + 0.5) / N_PER_RING as f64;
                vectors.push([sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta]);
            }
        }
        Self { vectors }
    }

    /// Number of pixels in the grid.
    pub fn npix(&self) -> usize {
        self.vectors.len()
    }

    /// Solid angle per pixel, square degrees.
    pub fn pixel_area_deg2(&self) -> f64 {
        let full_sky_deg2 = 4.0 * std::f64::consts::PI * (180.0 / std::f64::consts::PI).powi(2);
        full_sky_deg2 / self.npix() as f64
    }

    /// Precomputed unit vectors of the pixel centers.
    pub fn pixel_vectors(&self) -> &[[f64; 3]] {
        &self.vectors
    }
}

/// Unit vector for an (ra, dec) pair in degrees.
pub fn unit_vector(ra: f64, dec: f64) -> [f64; 3] {
    let ra_rad = ra.to_radians();
    let dec_rad = dec.to_radians();
    [
        dec_rad.cos() * ra_rad.cos(),
        dec_rad.cos() * ra_rad.sin(),
        dec_rad.sin(),
    ]
}
