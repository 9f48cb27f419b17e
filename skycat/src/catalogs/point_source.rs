//! Point-source catalog container

use super::magnitudes::{band_key, to_sentinel, MagnitudeColumn, MagnitudeColumns, MagnitudeSystem};
use super::{SourceCatalog, POSITION_RA_DEC};
use crate::error::CatalogError;

/// Ordered RA/Dec positions with per-band magnitude columns.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSourceCatalog {
    ra: Vec<f64>,
    dec: Vec<f64>,
    location_units: String,
    magnitudes: MagnitudeColumns,
}

impl PointSourceCatalog {
    /// Create a catalog from RA/Dec in degrees with no magnitude columns yet.
    pub fn new(ra: Vec<f64>, dec: Vec<f64>) -> Result<Self, CatalogError> {
        if ra.len() != dec.len() {
            return Err(CatalogError::PositionLengthMismatch {
                ra: ra.len(),
                dec: dec.len(),
            });
        }
        Ok(Self {
            ra,
            dec,
            location_units: POSITION_RA_DEC.to_string(),
            magnitudes: MagnitudeColumns::new(),
        })
    }

    pub(crate) fn from_parts(
        ra: Vec<f64>,
        dec: Vec<f64>,
        location_units: String,
        magnitudes: MagnitudeColumns,
    ) -> Self {
        Self {
            ra,
            dec,
            location_units,
            magnitudes,
        }
    }

    pub fn with_location_units(mut self, units: impl Into<String>) -> Self {
        self.location_units = units.into();
        self
    }

    /// Add magnitudes under the key `{instrument}_{filter}` (lowercased).
    pub fn add_magnitude_column(
        &mut self,
        values: Vec<f64>,
        instrument: &str,
        filter: &str,
        system: MagnitudeSystem,
    ) -> Result<(), CatalogError> {
        self.insert_band(band_key(instrument, filter), MagnitudeColumn { system, values })
    }

    /// Add a column under an already-formed band key.
    pub fn insert_band(&mut self, key: String, column: MagnitudeColumn) -> Result<(), CatalogError> {
        let n = self.ra.len();
        self.magnitudes.insert(key, column, n)
    }
}

impl SourceCatalog for PointSourceCatalog {
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

/// A survey row that can be turned into a catalog entry.
pub trait SurveySource {
    /// (RA, Dec) in degrees
    fn position_degrees(&self) -> (f64, f64);

    /// Value of a named magnitude column. `None` when the survey has no such
    /// column, `Some(None)` when the column exists but this row is empty.
    fn magnitude_column(&self, name: &str) -> Option<Option<f64>>;
}

/// Build a catalog straight from survey rows, one band per requested column.
///
/// Band keys are `{instrument}_{column}`; empty cells become
/// [`SENTINEL_MAGNITUDE`](super::SENTINEL_MAGNITUDE).
pub fn catalog_from_sources<S: SurveySource>(
    sources: &[S],
    instrument: &str,
    columns: &[&str],
    system: MagnitudeSystem,
) -> Result<PointSourceCatalog, CatalogError> {
    let (ra, dec): (Vec<f64>, Vec<f64>) = sources.iter().map(|s| s.position_degrees()).unzip();
    let mut catalog = PointSourceCatalog::new(ra, dec)?;

    for column in columns {
        let values = sources
            .iter()
            .map(|s| {
                s.magnitude_column(column)
                    .map(to_sentinel)
                    .ok_or_else(|| CatalogError::UnknownColumn(column.to_string()))
            })
            .collect::<Result<Vec<f64>, _>>()?;
        catalog.add_magnitude_column(values, instrument, column, system)?;
    }

    log::debug!(
        "built '{instrument}' catalog with {} sources and {} bands",
        catalog.len(),
        columns.len()
    );
    Ok(catalog)
}
