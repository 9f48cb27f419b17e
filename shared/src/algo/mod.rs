//! Algorithms shared across the catalog builder
//!
//! This module provides interpolation, coordinate string parsing and a
//! spatial index used for positional cross-matching.

pub mod kdtree;
pub mod misc;

pub use kdtree::{KdTree3, Neighbor};
pub use misc::{
    dec_dms_to_deg, interp, interp_clamped, parse_dec_degrees, parse_ra_degrees, ra_hms_to_deg,
    AngleParseError, InterpError,
};
