//! Concatenation of two point-source catalogs

use std::collections::BTreeSet;

use super::magnitudes::{MagnitudeColumn, MagnitudeColumns};
use super::point_source::PointSourceCatalog;
use super::SourceCatalog;
use crate::error::CombineError;

/// Append `second` to `first`.
///
/// Both catalogs must carry the same set of band keys and the same location
/// units. Positions and magnitudes keep `first`'s sources ahead of
/// `second`'s; band order and each band's magnitude system come from `first`.
pub fn combine_catalogs(
    first: &PointSourceCatalog,
    second: &PointSourceCatalog,
) -> Result<PointSourceCatalog, CombineError> {
    let first_keys: BTreeSet<&str> = first.magnitudes().keys().collect();
    let second_keys: BTreeSet<&str> = second.magnitudes().keys().collect();
    if first_keys != second_keys {
        return Err(CombineError::BandMismatch {
            first: first_keys.into_iter().map(String::from).collect(),
            second: second_keys.into_iter().map(String::from).collect(),
        });
    }

    if first.location_units() != second.location_units() {
        return Err(CombineError::UnitsMismatch {
            first: first.location_units().to_string(),
            second: second.location_units().to_string(),
        });
    }

    let mut magnitudes = MagnitudeColumns::new();
    for (key, column) in first.magnitudes().iter() {
        let tail = second
            .magnitude(key)
            .map(|c| c.values.as_slice())
            .unwrap_or_default();
        magnitudes.push(
            key.to_string(),
            MagnitudeColumn {
                system: column.system,
                values: [column.values.as_slice(), tail].concat(),
            },
        );
    }

    log::debug!(
        "combined catalogs of {} and {} sources across {} bands",
        first.len(),
        second.len(),
        magnitudes.len()
    );

    Ok(PointSourceCatalog::from_parts(
        [first.ra(), second.ra()].concat(),
        [first.dec(), second.dec()].concat(),
        first.location_units().to_string(),
        magnitudes,
    ))
}
