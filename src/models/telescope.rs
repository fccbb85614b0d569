use serde::{Deserialize, Serialize};

/// A pointing in a telescope's field catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub field_id: u32,
    /// Field center right ascension, degrees.
    pub ra: f64,
    /// Field center declination, degrees.
    pub dec: f64,
}

/// Static configuration of a follow-up telescope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telescope {
    pub name: String,
    /// Field-of-view width in degrees (square fields assumed).
    pub fov_deg: f64,
    /// Size of the instrument's field catalog. Field ids are dense and
    /// strictly below this bound.
    pub field_count: u32,
    /// Filters available on the instrument.
    pub filters: Vec<String>,
    /// Default exposure time per field, seconds.
    pub default_exposure_time: f64,
}

impl Telescope {
    /// Zwicky Transient Facility.
    pub fn ztf() -> Self {
        Self {
            name: "ZTF".to_string(),
            fov_deg: 7.0,
            field_count: 907,
            filters: vec!["g".into(), "r".into(), "i".into()],
            default_exposure_time: 300.0,
        }
    }

    /// Palomar Gattini-IR.
    pub fn gattini() -> Self {
        Self {
            name: "Gattini".to_string(),
            fov_deg: 5.0,
            field_count: 1600,
            filters: vec!["J".into()],
            default_exposure_time: 64.0,
        }
    }

    /// Look up a telescope configuration by name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "ZTF" => Some(Self::ztf()),
            "Gattini" => Some(Self::gattini()),
            _ => None,
        }
    }

    /// Generate the field catalog for this telescope.
    ///
    /// Fields are laid out on declination rings spaced by the field of view,
    /// with per-ring counts following `cos(dec)` so coverage stays roughly
    /// uniform on the sphere. The catalog is truncated at `field_count`, so
    /// every field id is `< field_count`.
    pub fn field_grid(&self) -> Vec<Field> {
        let mut fields = Vec::new();
        let fov = self.fov_deg;
        let mut dec = -90.0 + fov / 2.0;
        let mut field_id: u32 = 0;
        while dec <= 90.0 - fov / 2.0 + 1e-9 {
            let circumference = 360.0 * dec.to_radians().cos();
            let n = ((circumference / fov).ceil() as u32).max(1);
            for j in 0..n {
                if field_id >= self.field_count {
                    return fields;
                }
                let ra = 360.0 * (j as f64 + 0.5) / n as f64;
                fields.push(Field { field_id, ra, dec });
                field_id += 1;
            }
            dec += fov;
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ztf_grid_bounded_by_catalog() {
        let ztf = Telescope::ztf();
        let grid = ztf.field_grid();
        assert!(!grid.is_empty());
        assert!(grid.len() <= ztf.field_count as usize);
        assert!(grid.iter().all(|f| f.field_id < ztf.field_count));
    }

    #[test]
    fn test_field_ids_dense() {
        let grid = Telescope::ztf().field_grid();
        for (i, field) in grid.iter().enumerate() {
            assert_eq!(field.field_id as usize, i);
        }
    }

    #[test]
    fn test_grid_covers_both_hemispheres() {
        let grid = Telescope::ztf().field_grid();
        assert!(grid.iter().any(|f| f.dec < -60.0));
        assert!(grid.iter().any(|f| f.dec > 60.0));
    }

    #[test]
    fn test_ra_in_range() {
        let grid = Telescope::gattini().field_grid();
        assert!(grid.iter().all(|f| (0.0..=360.0).contains(&f.ra)));
    }

    #[test]
    fn test_by_name() {
        assert_eq!(Telescope::by_name("ZTF").unwrap().field_count, 907);
        assert!(Telescope::by_name("Keck").is_none());
    }
}
