//! Photometric transformations onto the target instrument's filters

pub mod besancon;
pub mod filter_system;
pub mod interpolate;
pub mod model_match;
pub mod observed;
pub mod standard_mags;

pub use besancon::{transform_besancon, within_k_limits, VjhklMagnitudes};
pub use filter_system::{
    band_key_for_label, crossmatch_filter_names, make_filter_names, resolve_filters, Instrument,
};
pub use interpolate::{interpolate_magnitudes, Interpolator};
pub use model_match::{match_columns, match_model_magnitudes, TemplateMatch};
pub use observed::{ObservedMagnitudes, INPUT_FILTERS};
pub use standard_mags::{standard_magnitudes, StandardMagnitudeTable, STANDARD_FILTER_LABELS};
