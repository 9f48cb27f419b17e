//! Besançon model stars to target-filter magnitudes
//!
//! The population synthesis model reports V plus the colors V-K, J-K, J-H and
//! J-L and the V-band extinction. Absolute J, H, K and L follow from those
//! colors; the Johnson V/J/H/K set is then template matched and reddened by
//! `Av` times each filter's relative extinction.

use ndarray::Array2;
use skycat::surveys::BesanconStar;

use super::filter_system::resolve_filters;
use super::model_match::match_columns;
use super::standard_mags::StandardMagnitudeTable;
use crate::error::PhotometryError;

/// Table labels matched against the derived Johnson magnitudes, in
/// [`VjhklMagnitudes::matched`] order.
pub const JOHNSON_VJHK: [&str; 4] = ["Johnson V", "Johnson J", "Johnson H", "Johnson K"];

/// Johnson magnitudes of one model star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VjhklMagnitudes {
    pub v: f64,
    pub j: f64,
    pub h: f64,
    pub k: f64,
    pub l: f64,
}

impl VjhklMagnitudes {
    pub fn from_star(star: &BesanconStar) -> Self {
        let k = star.v - star.v_minus_k;
        let j = k + star.j_minus_k;
        Self {
            v: star.v,
            j,
            h: j - star.j_minus_h,
            k,
            l: j - star.j_minus_l,
        }
    }

    /// V, J, H, K; L has no template column and is not matched.
    pub fn matched(&self) -> [f64; 4] {
        [self.v, self.j, self.h, self.k]
    }
}

/// Stars whose K magnitude lies in `[k_min, k_max]`.
pub fn within_k_limits(stars: &[BesanconStar], k_min: f64, k_max: f64) -> Vec<BesanconStar> {
    stars
        .iter()
        .filter(|s| (k_min..=k_max).contains(&s.k()))
        .copied()
        .collect()
}

/// Magnitudes of every star in `output_labels`, shape `(stars, outputs)`.
///
/// A single unmatched star fails the whole batch.
pub fn transform_besancon<S: AsRef<str>>(
    stars: &[BesanconStar],
    output_labels: &[S],
    table: &StandardMagnitudeTable,
) -> Result<Array2<f64>, PhotometryError> {
    let johnson_columns = resolve_filters(&JOHNSON_VJHK, table.filters())?;
    let output_columns = resolve_filters(output_labels, table.filters())?;
    let extinction = table.relative_extinction();

    let mut out = Array2::zeros((stars.len(), output_columns.len()));
    for (i, star) in stars.iter().enumerate() {
        let observed = VjhklMagnitudes::from_star(star).matched();
        let matched = match_columns(&observed, &johnson_columns, table).map_err(|e| {
            PhotometryError::TemplateMatch(format!("Besancon star {i}: {e}"))
        })?;
        for (o, &c) in output_columns.iter().enumerate() {
            out[[i, o]] = matched.magnitudes[c] + star.av * extinction[c];
        }
    }

    log::debug!(
        "Transformed {} Besancon stars into {} filters",
        stars.len(),
        output_columns.len()
    );
    Ok(out)
}
