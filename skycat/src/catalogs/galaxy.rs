//! Galaxy catalog container
//!
//! Extends the point-source layout with Sérsic-profile structural parameters.
//! Every per-source array, structural or photometric, holds one entry per
//! galaxy.

use super::magnitudes::{band_key, MagnitudeColumn, MagnitudeColumns, MagnitudeSystem};
use super::{SourceCatalog, POSITION_RA_DEC};
use crate::error::CatalogError;

/// Units tag for the effective radius column.
pub const RADIUS_ARCSEC: &str = "arcsec";

/// Structural parameters for each galaxy.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Morphology {
    /// Effective (half-light) radius
    pub radius: Vec<f64>,
    pub sersic_index: Vec<f64>,
    pub ellipticity: Vec<f64>,
    /// Position angle, degrees
    pub position_angle: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalaxyCatalog {
    ra: Vec<f64>,
    dec: Vec<f64>,
    morphology: Morphology,
    location_units: String,
    radius_units: String,
    magnitudes: MagnitudeColumns,
}

impl GalaxyCatalog {
    pub fn new(ra: Vec<f64>, dec: Vec<f64>, morphology: Morphology) -> Result<Self, CatalogError> {
        if ra.len() != dec.len() {
            return Err(CatalogError::PositionLengthMismatch {
                ra: ra.len(),
                dec: dec.len(),
            });
        }

        let n = ra.len();
        let columns = [
            ("radius", morphology.radius.len()),
            ("sersic_index", morphology.sersic_index.len()),
            ("ellipticity", morphology.ellipticity.len()),
            ("position_angle", morphology.position_angle.len()),
        ];
        for (column, got) in columns {
            if got != n {
                return Err(CatalogError::LengthMismatch {
                    column: column.to_string(),
                    expected: n,
                    got,
                });
            }
        }

        Ok(Self {
            ra,
            dec,
            morphology,
            location_units: POSITION_RA_DEC.to_string(),
            radius_units: RADIUS_ARCSEC.to_string(),
            magnitudes: MagnitudeColumns::new(),
        })
    }

    pub fn with_radius_units(mut self, units: impl Into<String>) -> Self {
        self.radius_units = units.into();
        self
    }

    pub fn morphology(&self) -> &Morphology {
        &self.morphology
    }

    pub fn radius_units(&self) -> &str {
        &self.radius_units
    }

    pub fn add_magnitude_column(
        &mut self,
        values: Vec<f64>,
        instrument: &str,
        filter: &str,
        system: MagnitudeSystem,
    ) -> Result<(), CatalogError> {
        let n = self.ra.len();
        self.magnitudes
            .insert(band_key(instrument, filter), MagnitudeColumn { system, values }, n)
    }
}

impl SourceCatalog for GalaxyCatalog {
    fn ra(&self) -> &[f64] {
        &self.ra
    }

    fn dec(&self) -> &[f64] {
        &self.dec
    }

    fn location_units(&self) -> &str {
        &self.location_units
    }

    fn magnitudes(&self) -> &MagnitudeColumns {
        &self.magnitudes
    }
}
