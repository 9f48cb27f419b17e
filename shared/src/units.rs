//! Type-safe angle units built on `uom`.
//!
//! Catalog code passes match radii and sky-box sizes as [`Angle`] so that
//! arcseconds, degrees and radians cannot be mixed up at call sites.

use uom::si::angle::{degree, radian, second as arcsecond};

/// Plane angle stored in SI radians.
pub type Angle = uom::si::f64::Angle;

/// Extension trait for angle conversions common in astrometry.
pub trait AngleExt {
    fn from_degrees(deg: f64) -> Self;
    fn as_degrees(&self) -> f64;

    /// Create an angle from arcseconds
    fn from_arcseconds(arcsec: f64) -> Self;
    fn as_arcseconds(&self) -> f64;

    fn from_radians(rad: f64) -> Self;
    fn as_radians(&self) -> f64;
}

impl AngleExt for Angle {
    fn from_degrees(deg: f64) -> Self {
        Angle::new::<degree>(deg)
    }

    fn as_degrees(&self) -> f64 {
        self.get::<degree>()
    }

    fn from_arcseconds(arcsec: f64) -> Self {
        Angle::new::<arcsecond>(arcsec)
    }

    fn as_arcseconds(&self) -> f64 {
        self.get::<arcsecond>()
    }

    fn from_radians(rad: f64) -> Self {
        Angle::new::<radian>(rad)
    }

    fn as_radians(&self) -> f64 {
        self.get::<radian>()
    }
}
