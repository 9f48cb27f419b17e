//! Multi-survey merge
//!
//! Gaia sources seed the merged list and pick up 2MASS and WISE photometry
//! through the precision archive's cross-reference tables. Standalone 2MASS
//! entries not already represented are appended next, each taking the nearest
//! unclaimed standalone WISE entry within the match radius. Whatever WISE
//! entries remain unclaimed are appended last.
//!
//! Every merged source then goes through the [`Interpolator`] to produce
//! magnitudes in the target filters.

use std::collections::HashSet;

use shared::units::{Angle, AngleExt};
use skycat::catalogs::{MagnitudeColumn, MagnitudeSystem, PointSourceCatalog};
use skycat::surveys::{CrossReference, GaiaSource, TwoMassSource, WiseSource};
use skycat::Equatorial;

use crate::crossmatch::{DesignationIndex, SkyIndex};
use crate::error::MergeError;
use crate::photometry::{band_key_for_label, Interpolator, ObservedMagnitudes};

/// Survey tables for one sky region.
///
/// `gaia_2mass` and `gaia_wise` are the 2MASS and WISE rows embedded in the
/// precision archive, reached through the two cross-reference tables;
/// `twomass` and `wise` are the standalone survey queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeInputs<'a> {
    pub gaia: &'a [GaiaSource],
    pub gaia_2mass_xref: &'a [CrossReference],
    pub gaia_2mass: &'a [TwoMassSource],
    pub gaia_wise_xref: &'a [CrossReference],
    pub gaia_wise: &'a [WiseSource],
    pub twomass: &'a [TwoMassSource],
    pub wise: &'a [WiseSource],
}

/// Survey that contributed a merged source's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOrigin {
    Gaia,
    TwoMass,
    Wise,
}

/// One deduplicated source with its observed photometry.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedSource {
    pub ra: f64,
    pub dec: f64,
    pub observed: ObservedMagnitudes,
    pub origin: SourceOrigin,
}

/// Per-stage counts of a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub gaia: usize,
    /// Gaia sources that found 2MASS photometry through the cross-reference
    pub gaia_with_twomass: usize,
    /// Gaia sources that found a standalone WISE entry through the cross-reference
    pub gaia_with_wise: usize,
    /// Standalone 2MASS entries already represented by a Gaia source
    pub twomass_covered: usize,
    pub twomass_appended: usize,
    /// Appended 2MASS entries that claimed a standalone WISE entry
    pub twomass_with_wise: usize,
    pub wise_appended: usize,
    /// Measured magnitudes dropped for upper-limit flags or missing uncertainties
    pub quality_excluded: usize,
}

impl MergeSummary {
    pub fn total(&self) -> usize {
        self.gaia + self.twomass_appended + self.wise_appended
    }
}

fn twomass_photometry(source: &TwoMassSource, excluded: &mut usize) -> [Option<f64>; 3] {
    let mut mags = source.magnitudes();
    for (band, mag) in mags.iter_mut().enumerate() {
        if mag.is_some() && source.is_upper_limit(band) {
            *mag = None;
            *excluded += 1;
        }
    }
    mags
}

fn wise_photometry(source: &WiseSource, excluded: &mut usize) -> [Option<f64>; 4] {
    let mut mags = [None; 4];
    for (band, mag) in mags.iter_mut().enumerate() {
        *mag = source.usable_magnitude(band);
        if mag.is_none() && source.mpro[band].is_some() {
            *excluded += 1;
        }
    }
    mags
}

/// Deduplicate the survey tables into one source list.
///
/// Output order is Gaia sources, then appended 2MASS entries, then leftover
/// WISE entries, each in input order. The count is
/// `gaia + (twomass - covered) + (wise - claimed)`.
pub fn merge_sources(inputs: &MergeInputs<'_>, radius: Angle) -> (Vec<MergedSource>, MergeSummary) {
    let mut summary = MergeSummary {
        gaia: inputs.gaia.len(),
        ..Default::default()
    };

    let twomass_xref = DesignationIndex::new(inputs.gaia_2mass_xref.iter().map(|x| x.designation.as_str()));
    let wise_xref = DesignationIndex::new(inputs.gaia_wise_xref.iter().map(|x| x.designation.as_str()));
    let embedded_twomass = DesignationIndex::new(inputs.gaia_2mass.iter().map(|t| t.designation.as_str()));
    let embedded_wise = DesignationIndex::new(inputs.gaia_wise.iter().map(|w| w.designation.as_str()));

    let wise_ra: Vec<f64> = inputs.wise.iter().map(|w| w.ra).collect();
    let wise_dec: Vec<f64> = inputs.wise.iter().map(|w| w.dec).collect();
    let wise_index = SkyIndex::from_degrees(&wise_ra, &wise_dec);
    let mut wise_claimed = vec![false; inputs.wise.len()];

    let mut merged = Vec::with_capacity(inputs.gaia.len() + inputs.twomass.len() + inputs.wise.len());
    // 2MASS designations whose photometry a Gaia source picked up
    let mut covered: HashSet<&str> = HashSet::new();

    for gaia in inputs.gaia {
        let mut observed = ObservedMagnitudes::new();
        observed.set_gaia(gaia.bp, gaia.g, gaia.rp);

        let twomass = twomass_xref
            .get(&gaia.designation)
            .and_then(|x| embedded_twomass.get(&inputs.gaia_2mass_xref[x].designation_2))
            .map(|row| &inputs.gaia_2mass[row]);
        if let Some(twomass) = twomass {
            observed.set_twomass(twomass_photometry(twomass, &mut summary.quality_excluded));
            covered.insert(twomass.designation.trim());
            summary.gaia_with_twomass += 1;
        }

        let wise = wise_xref
            .get(&gaia.designation)
            .and_then(|x| embedded_wise.get(&inputs.gaia_wise_xref[x].designation_2))
            .and_then(|row| {
                let linked = &inputs.gaia_wise[row];
                wise_index.nearest_within(&Equatorial::from_degrees(linked.ra, linked.dec), radius)
            });
        if let Some(m) = wise {
            wise_claimed[m.index] = true;
            observed.set_wise(wise_photometry(&inputs.wise[m.index], &mut summary.quality_excluded));
            summary.gaia_with_wise += 1;
        }

        merged.push(MergedSource {
            ra: gaia.ra,
            dec: gaia.dec,
            observed,
            origin: SourceOrigin::Gaia,
        });
    }

    for twomass in inputs.twomass {
        if covered.contains(twomass.designation.trim()) {
            summary.twomass_covered += 1;
            continue;
        }

        let mut observed = ObservedMagnitudes::new();
        observed.set_twomass(twomass_photometry(twomass, &mut summary.quality_excluded));

        let position = Equatorial::from_degrees(twomass.ra, twomass.dec);
        if let Some(m) = wise_index.nearest_within(&position, radius) {
            if !wise_claimed[m.index] {
                wise_claimed[m.index] = true;
                observed.set_wise(wise_photometry(&inputs.wise[m.index], &mut summary.quality_excluded));
                summary.twomass_with_wise += 1;
            }
        }

        merged.push(MergedSource {
            ra: twomass.ra,
            dec: twomass.dec,
            observed,
            origin: SourceOrigin::TwoMass,
        });
        summary.twomass_appended += 1;
    }

    for (wise, &claimed) in inputs.wise.iter().zip(&wise_claimed) {
        if claimed {
            continue;
        }
        let mut observed = ObservedMagnitudes::new();
        observed.set_wise(wise_photometry(wise, &mut summary.quality_excluded));
        merged.push(MergedSource {
            ra: wise.ra,
            dec: wise.dec,
            observed,
            origin: SourceOrigin::Wise,
        });
        summary.wise_appended += 1;
    }

    log::info!(
        "Merged {} sources: {} Gaia ({} with 2MASS, {} with WISE), {} 2MASS ({} covered by Gaia), {} WISE",
        merged.len(),
        summary.gaia,
        summary.gaia_with_twomass,
        summary.gaia_with_wise,
        summary.twomass_appended,
        summary.twomass_covered,
        summary.wise_appended
    );
    if summary.quality_excluded > 0 {
        log::info!(
            "Excluded {} magnitudes flagged as upper limits or lacking uncertainties",
            summary.quality_excluded
        );
    }

    (merged, summary)
}

/// Merge the survey tables and convert every source to the target filters.
///
/// Band keys come from the interpolator's output labels
/// (`nircam_f200w_magnitude` -> `nircam_f200w`); magnitudes are Vega.
pub fn combine_and_interpolate(
    inputs: &MergeInputs<'_>,
    interpolator: &Interpolator<'_>,
    radius: Angle,
) -> Result<(PointSourceCatalog, MergeSummary), MergeError> {
    let (sources, summary) = merge_sources(inputs, radius);

    let n_out = interpolator.output_len();
    let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(sources.len()); n_out];
    for source in &sources {
        let mags = interpolator.interpolate(&source.observed)?;
        for (column, mag) in columns.iter_mut().zip(mags) {
            column.push(mag);
        }
    }

    let ra = sources.iter().map(|s| s.ra).collect();
    let dec = sources.iter().map(|s| s.dec).collect();
    let mut catalog = PointSourceCatalog::new(ra, dec)?;
    for (label, values) in interpolator.output_labels().iter().zip(columns) {
        catalog.insert_band(
            band_key_for_label(label),
            MagnitudeColumn {
                system: MagnitudeSystem::Vegamag,
                values,
            },
        )?;
    }

    log::debug!(
        "Observed catalog has {} sources in {} bands (match radius {:.2}\")",
        sources.len(),
        n_out,
        radius.as_arcseconds()
    );
    Ok((catalog, summary))
}
