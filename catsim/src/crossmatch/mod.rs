//! Cross-identification between survey tables

pub mod identity;
pub mod spatial;

pub use identity::DesignationIndex;
pub use spatial::{default_match_radius, match_to_catalog, SkyIndex, SkyMatch};

/// Separation below which two survey entries are treated as one source.
pub const MATCH_RADIUS_ARCSEC: f64 = 0.4;
