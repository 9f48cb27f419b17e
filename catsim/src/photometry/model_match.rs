//! Template matching against the standard magnitude table
//!
//! For each template the best constant offset to the observed magnitudes is
//! the mean residual. The template with the smallest RMS residual after that
//! offset wins; ties keep the earlier template.

use ndarray::{Array1, ArrayView1};

use super::filter_system::resolve_filters;
use super::standard_mags::StandardMagnitudeTable;
use crate::error::PhotometryError;

/// Winning template and its offset-corrected magnitudes in every filter.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateMatch {
    pub template_index: usize,
    /// Mean of (template - observed) over the matched bands
    pub offset: f64,
    /// RMS residual after removing `offset`
    pub rms: f64,
    /// Template row minus `offset`, one value per table filter
    pub magnitudes: Array1<f64>,
}

/// Offset and RMS residual of one template against `observed`.
///
/// `columns` picks the template entries that correspond to `observed`.
pub fn offset_and_rms(template: ArrayView1<'_, f64>, columns: &[usize], observed: &[f64]) -> (f64, f64) {
    let n = observed.len() as f64;
    let offset = columns
        .iter()
        .zip(observed)
        .map(|(&c, &obs)| template[c] - obs)
        .sum::<f64>()
        / n;
    let sum_sq = columns
        .iter()
        .zip(observed)
        .map(|(&c, &obs)| {
            let d = template[c] - offset - obs;
            d * d
        })
        .sum::<f64>();
    (offset, (sum_sq / n).sqrt())
}

/// Match observed magnitudes in named bands against every template.
pub fn match_model_magnitudes<S: AsRef<str>>(
    observed: &[f64],
    bands: &[S],
    table: &StandardMagnitudeTable,
) -> Result<TemplateMatch, PhotometryError> {
    if observed.len() != bands.len() {
        return Err(PhotometryError::TemplateMatch(format!(
            "{} magnitudes given for {} bands",
            observed.len(),
            bands.len()
        )));
    }
    let columns = resolve_filters(bands, table.filters()).map_err(|e| {
        PhotometryError::TemplateMatch(format!("band resolution failed: {e}"))
    })?;
    match_columns(observed, &columns, table)
}

/// Match observed magnitudes in already-resolved table columns.
pub fn match_columns(
    observed: &[f64],
    columns: &[usize],
    table: &StandardMagnitudeTable,
) -> Result<TemplateMatch, PhotometryError> {
    if observed.is_empty() || observed.len() != columns.len() {
        return Err(PhotometryError::TemplateMatch(format!(
            "{} magnitudes for {} columns",
            observed.len(),
            columns.len()
        )));
    }
    if let Some(bad) = observed.iter().find(|m| !m.is_finite()) {
        return Err(PhotometryError::TemplateMatch(format!(
            "non-finite observed magnitude {bad}"
        )));
    }
    if let Some(&c) = columns.iter().find(|&&c| c >= table.n_filters()) {
        return Err(PhotometryError::TemplateMatch(format!(
            "column {c} outside table of {} filters",
            table.n_filters()
        )));
    }

    let mut best: Option<(usize, f64, f64)> = None;
    for index in 0..table.n_templates() {
        let (offset, rms) = offset_and_rms(table.template(index), columns, observed);
        if !rms.is_finite() {
            continue;
        }
        if best.map_or(true, |(_, _, best_rms)| rms < best_rms) {
            best = Some((index, offset, rms));
        }
    }

    let (template_index, offset, rms) = best.ok_or_else(|| {
        PhotometryError::TemplateMatch("no template gives a finite residual".to_string())
    })?;
    let magnitudes = table.template(template_index).mapv(|m| m - offset);

    Ok(TemplateMatch {
        template_index,
        offset,
        rms,
        magnitudes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photometry::standard_mags::test_support::small_table;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_exact_template_with_offset() {
        let table = small_table();
        // Template 1 ("warm") shifted 2 magnitudes fainter
        let observed = [13.0, 12.0, 11.0, 10.5];
        let m = match_model_magnitudes(
            &observed,
            &["GAIA gbp", "GAIA grp", "2MASS J", "2MASS Ks"],
            &table,
        )
        .unwrap();

        assert_eq!(m.template_index, 1);
        assert_relative_eq!(m.offset, -2.0, epsilon = 1e-12);
        assert_relative_eq!(m.rms, 0.0, epsilon = 1e-12);
        assert_relative_eq!(m.magnitudes[4], 10.9, epsilon = 1e-12);
    }

    #[test]
    fn test_best_fit_is_optimal_for_random_inputs() {
        let table = small_table();
        let columns = [0usize, 1, 2, 3];
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        for _ in 0..200 {
            let observed: Vec<f64> = (0..4).map(|_| rng.gen_range(5.0..20.0)).collect();
            let m = match_columns(&observed, &columns, &table).unwrap();
            for t in 0..table.n_templates() {
                let (_, rms) = offset_and_rms(table.template(t), &columns, &observed);
                assert!(m.rms <= rms + 1e-12);
            }
        }
    }

    #[test]
    fn test_ties_keep_first_template() {
        let magnitudes = array![[10.0, 9.0, 5.0], [11.0, 10.0, 7.0], [10.0, 9.0, 6.0]];
        let aux = ndarray::Array2::zeros((4, 3));
        let table = StandardMagnitudeTable::new(
            magnitudes,
            aux,
            vec!["a".into(), "b".into(), "c".into()],
            vec!["t0".into(), "t1".into(), "t2".into()],
        )
        .unwrap();

        // All three templates fit bands a/b perfectly after an offset
        let m = match_model_magnitudes(&[12.0, 11.0], &["a", "b"], &table).unwrap();
        assert_eq!(m.template_index, 0);
        assert_relative_eq!(m.magnitudes[2], 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_nan_template_rejected() {
        let magnitudes = array![[f64::NAN, 9.0], [11.0, 10.0]];
        let err = StandardMagnitudeTable::new(
            magnitudes,
            ndarray::Array2::zeros((4, 2)),
            vec!["a".into(), "b".into()],
            vec!["t0".into(), "t1".into()],
        )
        .unwrap_err();
        assert!(matches!(err, crate::error::TableError::Shape(_)));
    }

    #[test]
    fn test_unresolvable_band_fails() {
        let table = small_table();
        let err = match_model_magnitudes(&[12.0, 11.0], &["GAIA gbp", "Johnson V"], &table).unwrap_err();
        assert!(matches!(err, PhotometryError::TemplateMatch(_)));
    }

    #[test]
    fn test_non_finite_input_fails() {
        let table = small_table();
        assert!(match_columns(&[f64::NAN, 11.0], &[0, 1], &table).is_err());
        assert!(match_columns(&[], &[], &table).is_err());
    }
}
