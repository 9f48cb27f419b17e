//! Source catalog containers
//!
//! Catalogs are columnar: parallel RA/Dec arrays plus an ordered set of
//! band-keyed magnitude columns that always match the source count.

pub mod combine;
pub mod galaxy;
pub mod magnitudes;
pub mod point_source;

pub use combine::combine_catalogs;
pub use galaxy::GalaxyCatalog;
pub use magnitudes::{
    band_key, observed, to_sentinel, MagnitudeColumn, MagnitudeColumns, MagnitudeSystem,
    MAGNITUDE_PRESENT_LIMIT, SENTINEL_MAGNITUDE,
};
pub use point_source::{catalog_from_sources, PointSourceCatalog, SurveySource};

/// Location-units tag for positions given as RA/Dec in degrees.
pub const POSITION_RA_DEC: &str = "position_RA_Dec";

/// Common read access shared by every catalog variant
pub trait SourceCatalog {
    /// Right ascension of each source, degrees
    fn ra(&self) -> &[f64];

    /// Declination of each source, degrees
    fn dec(&self) -> &[f64];

    /// Coordinate-units tag; catalogs combine only when these agree
    fn location_units(&self) -> &str;

    fn magnitudes(&self) -> &MagnitudeColumns;

    /// Number of sources
    fn len(&self) -> usize {
        self.ra().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Magnitude column for `key`, if present
    fn magnitude(&self, key: &str) -> Option<&MagnitudeColumn> {
        self.magnitudes().get(key)
    }

    /// Indices of sources whose position satisfies `predicate(ra, dec)`
    fn filter_positions<F>(&self, predicate: F) -> Vec<usize>
    where
        F: Fn(f64, f64) -> bool,
    {
        self.ra()
            .iter()
            .zip(self.dec())
            .enumerate()
            .filter(|(_, (ra, dec))| predicate(**ra, **dec))
            .map(|(i, _)| i)
            .collect()
    }
}
