//! Input catalog construction for simulated observations
//!
//! This crate cross-matches Gaia, 2MASS and WISE tables for a sky region,
//! deduplicates them into one source list and transforms the observed
//! photometry onto the filters of a target instrument. Besançon model stars
//! can be added as a synthetic population; the result is written as a flat
//! text catalog.

pub mod config;
pub mod crossmatch;
pub mod error;
pub mod merge;
pub mod photometry;
pub mod pipeline;
pub mod shared_args;

// Re-exports for easier access
pub use config::CatalogConfig;
pub use crossmatch::{match_to_catalog, SkyIndex, SkyMatch, MATCH_RADIUS_ARCSEC};
pub use error::{Error, MergeError, PhotometryError, Result, TableError};
pub use merge::{combine_and_interpolate, merge_sources, MergeInputs, MergeSummary};
pub use photometry::{Instrument, Interpolator, StandardMagnitudeTable};
pub use pipeline::{build_catalog, CatalogBuild, InputPaths, SurveyTables};
