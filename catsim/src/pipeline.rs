//! End-to-end catalog construction for one sky region
//!
//! Survey tables are merged and interpolated into the observed catalog;
//! Besançon model stars, if any, are transformed into a synthetic catalog with
//! random positions in the box; the two are combined and written out.

use std::path::{Path, PathBuf};

use ndarray::Axis;
use rand::rngs::StdRng;
use rand::SeedableRng;
use skycat::catalogs::{
    combine_catalogs, MagnitudeColumn, MagnitudeSystem, PointSourceCatalog, SourceCatalog,
};
use skycat::io::write_catalog;
use skycat::surveys::{
    BesanconStar, CrossReference, GaiaSource, SurveyTable, TwoMassSource, WiseSource,
};

use crate::config::CatalogConfig;
use crate::error::Result;
use crate::merge::{combine_and_interpolate, MergeInputs, MergeSummary};
use crate::photometry::{
    band_key_for_label, standard_magnitudes, transform_besancon, within_k_limits, Interpolator,
    StandardMagnitudeTable,
};

/// CSV file for each survey table. Missing tables count as empty.
#[derive(Debug, Clone, Default)]
pub struct InputPaths {
    pub gaia: Option<PathBuf>,
    pub gaia_2mass_xref: Option<PathBuf>,
    pub gaia_2mass: Option<PathBuf>,
    pub gaia_wise_xref: Option<PathBuf>,
    pub gaia_wise: Option<PathBuf>,
    pub twomass: Option<PathBuf>,
    pub wise: Option<PathBuf>,
    pub besancon: Option<PathBuf>,
}

fn load_optional<T: SurveyTable>(path: Option<&Path>) -> Result<Vec<T>> {
    match path {
        Some(path) => Ok(T::load(path)?),
        None => {
            log::debug!("No {} table given", T::NAME);
            Ok(Vec::new())
        }
    }
}

/// Survey tables for one region.
#[derive(Debug, Clone, Default)]
pub struct SurveyTables {
    pub gaia: Vec<GaiaSource>,
    pub gaia_2mass_xref: Vec<CrossReference>,
    pub gaia_2mass: Vec<TwoMassSource>,
    pub gaia_wise_xref: Vec<CrossReference>,
    pub gaia_wise: Vec<WiseSource>,
    pub twomass: Vec<TwoMassSource>,
    pub wise: Vec<WiseSource>,
    pub besancon: Vec<BesanconStar>,
}

impl SurveyTables {
    pub fn load(paths: &InputPaths) -> Result<Self> {
        Ok(Self {
            gaia: load_optional(paths.gaia.as_deref())?,
            gaia_2mass_xref: load_optional(paths.gaia_2mass_xref.as_deref())?,
            gaia_2mass: load_optional(paths.gaia_2mass.as_deref())?,
            gaia_wise_xref: load_optional(paths.gaia_wise_xref.as_deref())?,
            gaia_wise: load_optional(paths.gaia_wise.as_deref())?,
            twomass: load_optional(paths.twomass.as_deref())?,
            wise: load_optional(paths.wise.as_deref())?,
            besancon: load_optional(paths.besancon.as_deref())?,
        })
    }

    pub fn merge_inputs(&self) -> MergeInputs<'_> {
        MergeInputs {
            gaia: &self.gaia,
            gaia_2mass_xref: &self.gaia_2mass_xref,
            gaia_2mass: &self.gaia_2mass,
            gaia_wise_xref: &self.gaia_wise_xref,
            gaia_wise: &self.gaia_wise,
            twomass: &self.twomass,
            wise: &self.wise,
        }
    }
}

/// A finished region catalog and how it was assembled.
#[derive(Debug, Clone)]
pub struct CatalogBuild {
    pub catalog: PointSourceCatalog,
    pub merge: MergeSummary,
    /// Besançon stars kept after the K limits
    pub synthetic: usize,
}

/// Catalog of Besançon stars at random positions inside the configured box.
pub fn synthetic_catalog(
    stars: &[BesanconStar],
    config: &CatalogConfig,
    table: &StandardMagnitudeTable,
) -> Result<PointSourceCatalog> {
    let (k_min, k_max) = config.kmag_limits;
    let kept = within_k_limits(stars, k_min, k_max);
    if kept.len() < stars.len() {
        log::info!(
            "Dropped {} of {} Besancon stars outside K in [{k_min}, {k_max}]",
            stars.len() - kept.len(),
            stars.len()
        );
    }

    let labels = config.output_labels();
    let magnitudes = transform_besancon(&kept, &labels, table)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let (ra, dec) = config.sky_box().random_positions(kept.len(), &mut rng);
    let mut catalog = PointSourceCatalog::new(ra, dec)?;
    for (label, column) in labels.iter().zip(magnitudes.axis_iter(Axis(1))) {
        catalog.insert_band(
            band_key_for_label(label),
            MagnitudeColumn {
                system: MagnitudeSystem::Vegamag,
                values: column.to_vec(),
            },
        )?;
    }
    Ok(catalog)
}

/// Build the combined catalog for one region.
pub fn build_catalog(
    config: &CatalogConfig,
    tables: &SurveyTables,
    table: &StandardMagnitudeTable,
) -> Result<CatalogBuild> {
    let labels = config.output_labels();
    log::info!(
        "Building {} catalog in {} filters around ({:.5}, {:.5})",
        config.instrument,
        labels.len(),
        config.center_ra,
        config.center_dec
    );

    let interpolator = Interpolator::new(table, &labels)?;
    let (observed, merge) =
        combine_and_interpolate(&tables.merge_inputs(), &interpolator, config.match_radius())?;

    if tables.besancon.is_empty() {
        log::info!("Catalog has {} observed sources", observed.len());
        return Ok(CatalogBuild {
            catalog: observed,
            merge,
            synthetic: 0,
        });
    }

    let synthetic = synthetic_catalog(&tables.besancon, config, table)?;
    let n_synthetic = synthetic.len();
    let catalog = combine_catalogs(&observed, &synthetic)?;
    log::info!(
        "Catalog has {} sources: {} observed + {} synthetic",
        catalog.len(),
        observed.len(),
        n_synthetic
    );

    Ok(CatalogBuild {
        catalog,
        merge,
        synthetic: n_synthetic,
    })
}

/// Load inputs, build the region's catalog and write it to `output`.
pub fn run(config: &CatalogConfig, paths: &InputPaths, output: &Path) -> Result<CatalogBuild> {
    let table = standard_magnitudes(config.standard_magnitudes.as_deref())?;
    let tables = SurveyTables::load(paths)?;
    let build = build_catalog(config, &tables, table)?;
    write_catalog(&build.catalog, output)?;
    Ok(build)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photometry::interpolate::test_support::photometric_table;
    use crate::photometry::Instrument;

    fn star(v: f64, v_minus_k: f64) -> BesanconStar {
        BesanconStar {
            v,
            v_minus_k,
            j_minus_k: 0.9,
            j_minus_h: 0.6,
            j_minus_l: 1.0,
            av: 0.1,
        }
    }

    fn config() -> CatalogConfig {
        CatalogConfig {
            instrument: Instrument::NirCam,
            filters: vec!["F090W".into(), "F444W".into()],
            center_ra: 150.0,
            center_dec: 2.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_synthetic_positions_are_seeded_and_in_box() {
        let table = photometric_table();
        let stars = [star(15.0, 3.0), star(16.0, 3.0), star(40.0, 3.0)];
        let a = synthetic_catalog(&stars, &config(), &table).unwrap();
        let b = synthetic_catalog(&stars, &config(), &table).unwrap();

        assert_eq!(a.len(), 2);
        assert_eq!(a, b);
        let (ra_min, ra_max, dec_min, dec_max) = config().sky_box().bounds_degrees();
        for (&ra, &dec) in a.ra().iter().zip(a.dec()) {
            assert!((ra_min..=ra_max).contains(&ra));
            assert!((dec_min..=dec_max).contains(&dec));
        }
    }

    #[test]
    fn test_observed_and_synthetic_are_combined() {
        let table = photometric_table();
        let tables = SurveyTables {
            gaia: vec![GaiaSource {
                designation: "Gaia DR2 1".into(),
                ra: 150.0,
                dec: 2.0,
                g: Some(15.0),
                bp: Some(15.3),
                rp: Some(14.6),
            }],
            besancon: vec![star(15.0, 3.0), star(16.0, 3.0)],
            ..Default::default()
        };
        let build = build_catalog(&config(), &tables, &table).unwrap();

        assert_eq!(build.catalog.len(), 3);
        assert_eq!(build.synthetic, 2);
        assert_eq!(build.merge.gaia, 1);
        let keys: Vec<&str> = build.catalog.magnitudes().keys().collect();
        assert_eq!(keys, vec!["nircam_f090w", "nircam_f444w"]);
    }

    #[test]
    fn test_missing_tables_are_empty() {
        let tables = SurveyTables::load(&InputPaths::default()).unwrap();
        assert!(tables.gaia.is_empty());
        assert!(tables.besancon.is_empty());
    }
}
