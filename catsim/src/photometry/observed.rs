//! Observed survey photometry for one source

/// Standard-table labels of the observed bands, in wavelength order.
pub const INPUT_FILTERS: [&str; 10] = [
    "GAIA gbp", "GAIA g ", "GAIA grp", "2MASS J", "2MASS H", "2MASS Ks", "WISE W1", "WISE W2",
    "WISE W3", "WISE W4",
];

pub const BP: usize = 0;
pub const G: usize = 1;
pub const RP: usize = 2;
pub const J: usize = 3;
pub const H: usize = 4;
pub const KS: usize = 5;
pub const W1: usize = 6;

/// First infrared band; everything from here on is 2MASS or WISE.
const FIRST_INFRARED: usize = J;

/// Magnitudes in [`INPUT_FILTERS`] order; `None` means no usable measurement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ObservedMagnitudes(pub [Option<f64>; 10]);

impl ObservedMagnitudes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, band: usize) -> Option<f64> {
        self.0.get(band).copied().flatten()
    }

    pub fn set(&mut self, band: usize, value: Option<f64>) {
        if let Some(slot) = self.0.get_mut(band) {
            *slot = value;
        }
    }

    /// Set the three Gaia bands.
    pub fn set_gaia(&mut self, bp: Option<f64>, g: Option<f64>, rp: Option<f64>) {
        self.0[BP] = bp;
        self.0[G] = g;
        self.0[RP] = rp;
    }

    /// Set J, H, Ks.
    pub fn set_twomass(&mut self, jhk: [Option<f64>; 3]) {
        self.0[J..J + 3].copy_from_slice(&jhk);
    }

    /// Set W1..W4, each band independently.
    pub fn set_wise(&mut self, w: [Option<f64>; 4]) {
        self.0[W1..W1 + 4].copy_from_slice(&w);
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    pub fn has_infrared(&self) -> bool {
        self.0[FIRST_INFRARED..].iter().any(Option::is_some)
    }

    /// Number of bands with a measurement.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|m| m.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_groups() {
        let mut obs = ObservedMagnitudes::new();
        assert!(obs.is_empty());
        assert!(!obs.has_infrared());

        obs.set_gaia(None, Some(14.0), None);
        assert!(!obs.is_empty());
        assert!(!obs.has_infrared());

        obs.set_wise([None, None, None, Some(7.5)]);
        assert!(obs.has_infrared());
        assert_eq!(obs.get(9), Some(7.5));
        assert_eq!(obs.get(8), None);
        assert_eq!(obs.count(), 2);
    }

    #[test]
    fn test_set_twomass_positions() {
        let mut obs = ObservedMagnitudes::new();
        obs.set_twomass([Some(12.0), None, Some(11.5)]);
        assert_eq!(obs.get(J), Some(12.0));
        assert_eq!(obs.get(H), None);
        assert_eq!(obs.get(KS), Some(11.5));
    }
}
