//! Equatorial coordinates and rectangular sky regions

use nalgebra::Vector3;
use rand::Rng;
use shared::units::{Angle, AngleExt};

/// A position on the celestial sphere, stored in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equatorial {
    pub ra: f64,
    pub dec: f64,
}

impl Equatorial {
    pub fn new(ra: f64, dec: f64) -> Self {
        Self { ra, dec }
    }

    pub fn from_degrees(ra_deg: f64, dec_deg: f64) -> Self {
        Self::new(ra_deg.to_radians(), dec_deg.to_radians())
    }

    pub fn ra_degrees(&self) -> f64 {
        self.ra.to_degrees()
    }

    pub fn dec_degrees(&self) -> f64 {
        self.dec.to_degrees()
    }

    /// Cartesian unit vector (x towards RA=0, z towards the north pole).
    pub fn to_unit_vector(&self) -> Vector3<f64> {
        let (sin_dec, cos_dec) = self.dec.sin_cos();
        let (sin_ra, cos_ra) = self.ra.sin_cos();
        Vector3::new(cos_dec * cos_ra, cos_dec * sin_ra, sin_dec)
    }

    /// Great-circle separation, accurate at sub-arcsecond scales.
    pub fn angular_distance(&self, other: &Equatorial) -> Angle {
        let a = self.to_unit_vector();
        let b = other.to_unit_vector();
        Angle::from_radians(a.cross(&b).norm().atan2(a.dot(&b)))
    }
}

/// Square query region of side `width` centred on `center`.
///
/// The box is treated as small: RA bounds are `center.ra ± width/2` without a
/// `cos(dec)` correction, so it degrades near the poles.
#[derive(Debug, Clone, Copy)]
pub struct SkyBox {
    pub center: Equatorial,
    pub width: Angle,
}

impl SkyBox {
    pub fn new(center: Equatorial, width: Angle) -> Self {
        Self { center, width }
    }

    /// `(ra_min, ra_max, dec_min, dec_max)` in degrees.
    pub fn bounds_degrees(&self) -> (f64, f64, f64, f64) {
        let half = self.width.as_degrees() * 0.5;
        let ra = self.center.ra_degrees();
        let dec = self.center.dec_degrees();
        (ra - half, ra + half, dec - half, dec + half)
    }

    /// Draw `count` positions uniformly in RA and Dec within the box.
    pub fn random_positions<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> (Vec<f64>, Vec<f64>) {
        let (ra_min, ra_max, dec_min, dec_max) = self.bounds_degrees();
        let mut ra = Vec::with_capacity(count);
        let mut dec = Vec::with_capacity(count);
        for _ in 0..count {
            ra.push(ra_min + rng.gen::<f64>() * (ra_max - ra_min));
            dec.push(dec_min + rng.gen::<f64>() * (dec_max - dec_min));
        }
        (ra, dec)
    }
}
