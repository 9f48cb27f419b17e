//! Catalog build configuration
//!
//! Stored as JSON so a region's settings can be kept next to its survey
//! tables and rerun later.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared::units::{Angle, AngleExt};
use skycat::{Equatorial, SkyBox};

use crate::crossmatch::MATCH_RADIUS_ARCSEC;
use crate::error::{Error, Result};
use crate::photometry::{make_filter_names, Instrument};

/// Settings for building one region's catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub instrument: Instrument,
    /// Filters to produce; empty selects every filter of the instrument
    pub filters: Vec<String>,
    /// Box center, degrees
    pub center_ra: f64,
    pub center_dec: f64,
    /// Box side length, arcseconds
    pub box_width_arcsec: f64,
    /// Synthetic stars outside [min, max] in K are dropped
    pub kmag_limits: (f64, f64),
    /// Seed for synthetic star positions
    pub seed: u64,
    pub match_radius_arcsec: f64,
    /// Standard magnitude table; `$SIMCAT_DATA` is used when unset
    pub standard_magnitudes: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            instrument: Instrument::default(),
            filters: Vec::new(),
            center_ra: 0.0,
            center_dec: 0.0,
            box_width_arcsec: 120.0,
            kmag_limits: (10.0, 29.0),
            seed: 42,
            match_radius_arcsec: MATCH_RADIUS_ARCSEC,
            standard_magnitudes: None,
        }
    }
}

impl CatalogConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..360.0).contains(&self.center_ra) {
            return Err(Error::Config(format!("center_ra {} outside [0, 360)", self.center_ra)));
        }
        if !(-90.0..=90.0).contains(&self.center_dec) {
            return Err(Error::Config(format!("center_dec {} outside [-90, 90]", self.center_dec)));
        }
        if !(self.box_width_arcsec > 0.0) {
            return Err(Error::Config(format!(
                "box_width_arcsec must be positive, got {}",
                self.box_width_arcsec
            )));
        }
        if !(self.match_radius_arcsec > 0.0) {
            return Err(Error::Config(format!(
                "match_radius_arcsec must be positive, got {}",
                self.match_radius_arcsec
            )));
        }
        let (k_min, k_max) = self.kmag_limits;
        if k_min > k_max {
            return Err(Error::Config(format!("kmag_limits ({k_min}, {k_max}) are reversed")));
        }
        if self.output_labels().is_empty() {
            return Err(Error::Config(format!(
                "none of {:?} is a {} filter",
                self.filters, self.instrument
            )));
        }
        Ok(())
    }

    /// Standard-table labels of the requested output filters.
    pub fn output_labels(&self) -> Vec<String> {
        make_filter_names(self.instrument, &self.filters)
    }

    pub fn sky_box(&self) -> SkyBox {
        SkyBox::new(
            Equatorial::from_degrees(self.center_ra, self.center_dec),
            Angle::from_arcseconds(self.box_width_arcsec),
        )
    }

    pub fn match_radius(&self) -> Angle {
        Angle::from_arcseconds(self.match_radius_arcsec)
    }
}
