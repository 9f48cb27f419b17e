//! Observed photometry to target-filter magnitudes
//!
//! Policy, chosen per source from which bands carry data:
//!
//! 1. Nothing observed: every output is the sentinel.
//! 2. Optical only, with both BP and RP: match a template on BP/RP and read
//!    it at the output filters.
//! 3. Optical only, G without the BP/RP pair: broadcast G to every output.
//! 4. Otherwise: linear interpolation in pivot wavelength over the observed
//!    bands, holding the end values outside the observed range.

use shared::algo::interp_clamped;
use skycat::catalogs::SENTINEL_MAGNITUDE;

use super::filter_system::resolve_filters;
use super::model_match::match_columns;
use super::observed::{ObservedMagnitudes, BP, G, INPUT_FILTERS, RP};
use super::standard_mags::StandardMagnitudeTable;
use crate::error::PhotometryError;

/// Interpolate magnitudes over wavelength, skipping absent inputs.
///
/// Inputs need not be sorted. Outputs outside the observed wavelength range
/// take the nearest endpoint's magnitude. With no observed inputs every
/// output is [`SENTINEL_MAGNITUDE`].
pub fn interpolate_magnitudes(
    in_wavelengths: &[f64],
    in_magnitudes: &[Option<f64>],
    out_wavelengths: &[f64],
) -> Result<Vec<f64>, PhotometryError> {
    let mut points: Vec<(f64, f64)> = in_wavelengths
        .iter()
        .zip(in_magnitudes)
        .filter_map(|(&wl, &mag)| mag.map(|m| (wl, m)))
        .collect();
    if points.is_empty() {
        return Ok(vec![SENTINEL_MAGNITUDE; out_wavelengths.len()]);
    }
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    let (xs, ys): (Vec<f64>, Vec<f64>) = points.into_iter().unzip();

    out_wavelengths
        .iter()
        .map(|&wl| interp_clamped(wl, &xs, &ys).map_err(PhotometryError::from))
        .collect()
}

/// Converts observed survey photometry to a fixed list of output filters.
#[derive(Debug, Clone)]
pub struct Interpolator<'a> {
    table: &'a StandardMagnitudeTable,
    input_wavelengths: Vec<f64>,
    color_columns: [usize; 2],
    output_labels: Vec<String>,
    output_columns: Vec<usize>,
    output_wavelengths: Vec<f64>,
}

impl<'a> Interpolator<'a> {
    /// Resolve the observed bands and `output_labels` against `table`.
    pub fn new<S: AsRef<str>>(
        table: &'a StandardMagnitudeTable,
        output_labels: &[S],
    ) -> Result<Self, PhotometryError> {
        let input_columns = resolve_filters(&INPUT_FILTERS, table.filters())?;
        let output_columns = resolve_filters(output_labels, table.filters())?;
        let pivots = table.pivot_wavelengths();

        Ok(Self {
            table,
            input_wavelengths: input_columns.iter().map(|&c| pivots[c]).collect(),
            color_columns: [input_columns[BP], input_columns[RP]],
            output_wavelengths: output_columns.iter().map(|&c| pivots[c]).collect(),
            output_labels: output_labels.iter().map(|l| l.as_ref().to_string()).collect(),
            output_columns,
        })
    }

    pub fn output_len(&self) -> usize {
        self.output_columns.len()
    }

    pub fn output_labels(&self) -> &[String] {
        &self.output_labels
    }

    /// Output magnitudes for one source, in output-label order.
    pub fn interpolate(&self, observed: &ObservedMagnitudes) -> Result<Vec<f64>, PhotometryError> {
        let n = self.output_len();
        if observed.is_empty() {
            return Ok(vec![SENTINEL_MAGNITUDE; n]);
        }

        if !observed.has_infrared() {
            if let (Some(bp), Some(rp)) = (observed.get(BP), observed.get(RP)) {
                let matched = match_columns(&[bp, rp], &self.color_columns, self.table)?;
                return Ok(self
                    .output_columns
                    .iter()
                    .map(|&c| matched.magnitudes[c])
                    .collect());
            }
            if let Some(g) = observed.get(G) {
                return Ok(vec![g; n]);
            }
        }

        interpolate_magnitudes(&self.input_wavelengths, &observed.0, &self.output_wavelengths)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use ndarray::{Array1, Array2};

    /// Observed bands, three NIRCam outputs at 0.9, 2.0 and 4.4 microns, then
    /// Johnson V/J/H/K.
    ///
    /// Template `t` is nearly flat at `10 + t` except BP/RP, which carry a
    /// color of `0.2 * t`, so each BP-RP color picks out a single template.
    pub fn photometric_table() -> StandardMagnitudeTable {
        let labels: Vec<String> = INPUT_FILTERS
            .iter()
            .chain(&[
                "nircam_f090w_magnitude",
                "nircam_f200w_magnitude",
                "nircam_f444w_magnitude",
                "Johnson V",
                "Johnson J",
                "Johnson H",
                "Johnson K",
            ])
            .map(|s| s.to_string())
            .collect();
        let pivots = Array1::from(vec![
            0.51, 0.62, 0.78, 1.24, 1.66, 2.16, 3.35, 4.60, 11.56, 22.09, 0.90, 2.00, 4.40, 0.55,
            1.22, 1.63, 2.19,
        ]);
        let n_filters = labels.len();

        let n_templates = 4;
        let magnitudes = Array2::from_shape_fn((n_templates, n_filters), |(t, f)| {
            let base = 10.0 + t as f64;
            match f {
                BP => base + 0.1 * t as f64,
                RP => base - 0.1 * t as f64,
                _ => base + 0.01 * f as f64 * t as f64,
            }
        });
        let mut aux = Array2::zeros((4, n_filters));
        aux.row_mut(0).assign(&pivots);
        aux.row_mut(3).fill(0.1);

        let templates = (0..n_templates).map(|t| format!("t{t}")).collect();
        StandardMagnitudeTable::new(magnitudes, aux, labels, templates).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::photometric_table;
    use super::*;
    use crate::photometry::observed::{J, KS, W1};
    use approx::assert_relative_eq;

    const OUTPUTS: [&str; 3] = [
        "nircam_f090w_magnitude",
        "nircam_f200w_magnitude",
        "nircam_f444w_magnitude",
    ];

    #[test]
    fn test_clamped_interpolation() {
        let wl = [1.0, 2.0, 3.0];
        let mags = [Some(15.0), Some(14.0), Some(13.0)];
        let out = interpolate_magnitudes(&wl, &mags, &[0.5, 4.0, 2.5]).unwrap();
        assert_eq!(out[0], 15.0);
        assert_eq!(out[1], 13.0);
        assert_relative_eq!(out[2], 13.5);
    }

    #[test]
    fn test_absent_inputs_are_skipped() {
        let wl = [1.0, 2.0, 3.0];
        let mags = [Some(15.0), None, Some(13.0)];
        let out = interpolate_magnitudes(&wl, &mags, &[2.0]).unwrap();
        assert_relative_eq!(out[0], 14.0);
    }

    #[test]
    fn test_all_sentinel_input_gives_sentinel_output() {
        let table = photometric_table();
        let interp = Interpolator::new(&table, &OUTPUTS).unwrap();
        let out = interp.interpolate(&ObservedMagnitudes::new()).unwrap();
        assert_eq!(out, vec![SENTINEL_MAGNITUDE; 3]);
    }

    #[test]
    fn test_single_band_broadcast() {
        let table = photometric_table();
        let interp = Interpolator::new(&table, &OUTPUTS).unwrap();
        let mut obs = ObservedMagnitudes::new();
        obs.set_gaia(None, Some(12.3), None);

        assert_eq!(interp.interpolate(&obs).unwrap(), vec![12.3; 3]);
    }

    #[test]
    fn test_optical_colors_use_template() {
        let table = photometric_table();
        let interp = Interpolator::new(&table, &OUTPUTS).unwrap();

        // Template 2: BP = 12.2, RP = 11.8. Observed one magnitude fainter.
        let mut obs = ObservedMagnitudes::new();
        obs.set_gaia(Some(13.2), Some(13.0), Some(12.8));
        let out = interp.interpolate(&obs).unwrap();

        for (value, column) in out.iter().zip(10..13) {
            let expected = table.template(2)[column] + 1.0;
            assert_relative_eq!(*value, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_infrared_triggers_interpolation() {
        let table = photometric_table();
        let interp = Interpolator::new(&table, &OUTPUTS).unwrap();

        let mut obs = ObservedMagnitudes::new();
        obs.set_gaia(Some(15.4), Some(15.0), Some(14.6));
        obs.set(J, Some(13.0));
        obs.set(KS, Some(12.0));
        obs.set(W1, Some(11.5));
        let out = interp.interpolate(&obs).unwrap();

        // 0.90 um lies between RP (0.78) and J (1.24)
        let expected_090 = 14.6 + (0.90 - 0.78) / (1.24 - 0.78) * (13.0 - 14.6);
        assert_relative_eq!(out[0], expected_090, epsilon = 1e-9);
        // 2.00 um between J (1.24) and Ks (2.16)
        let expected_200 = 13.0 + (2.00 - 1.24) / (2.16 - 1.24) * (12.0 - 13.0);
        assert_relative_eq!(out[1], expected_200, epsilon = 1e-9);
        // 4.40 um past W1 (3.35): clamped
        assert_relative_eq!(out[2], 11.5);
    }

    #[test]
    fn test_unknown_output_label_fails() {
        let table = photometric_table();
        let err = Interpolator::new(&table, &["niriss_f090w_magnitude"]).unwrap_err();
        assert!(matches!(err, PhotometryError::FilterResolution { .. }));
    }
}
