//! Magnitude systems, the missing-data sentinel and band-keyed magnitude columns

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Value written for "no measurement" at the catalog and file boundary.
pub const SENTINEL_MAGNITUDE: f64 = 10000.0;

/// Raw magnitudes at or above this value are treated as absent.
pub const MAGNITUDE_PRESENT_LIMIT: f64 = 100.0;

/// Interpret a raw magnitude: present iff finite and below [`MAGNITUDE_PRESENT_LIMIT`].
pub fn observed(raw: f64) -> Option<f64> {
    (raw.is_finite() && raw < MAGNITUDE_PRESENT_LIMIT).then_some(raw)
}

/// Inverse of [`observed`] for writing: absent becomes [`SENTINEL_MAGNITUDE`].
pub fn to_sentinel(value: Option<f64>) -> f64 {
    value.unwrap_or(SENTINEL_MAGNITUDE)
}

/// Photometric zero-point convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MagnitudeSystem {
    #[default]
    Vegamag,
    Abmag,
    Stmag,
}

impl MagnitudeSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            MagnitudeSystem::Vegamag => "vegamag",
            MagnitudeSystem::Abmag => "abmag",
            MagnitudeSystem::Stmag => "stmag",
        }
    }
}

impl fmt::Display for MagnitudeSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MagnitudeSystem {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vegamag" => Ok(MagnitudeSystem::Vegamag),
            "abmag" => Ok(MagnitudeSystem::Abmag),
            "stmag" => Ok(MagnitudeSystem::Stmag),
            _ => Err(CatalogError::UnknownMagnitudeSystem(s.to_string())),
        }
    }
}

/// Band key for an instrument/filter pair, e.g. `("NIRCam", "F200W")` -> `nircam_f200w`.
///
/// An empty filter yields just the instrument, so `("guider1", "")` -> `guider1`.
pub fn band_key(instrument: &str, filter: &str) -> String {
    if filter.is_empty() {
        instrument.to_lowercase()
    } else {
        format!("{instrument}_{filter}").to_lowercase()
    }
}

/// Magnitudes for one band, all in a single system.
#[derive(Debug, Clone, PartialEq)]
pub struct MagnitudeColumn {
    pub system: MagnitudeSystem,
    pub values: Vec<f64>,
}

/// Insertion-ordered map from band key to magnitude column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MagnitudeColumns {
    columns: Vec<(String, MagnitudeColumn)>,
}

impl MagnitudeColumns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a column after checking it has `expected_len` values.
    pub fn insert(
        &mut self,
        key: String,
        column: MagnitudeColumn,
        expected_len: usize,
    ) -> Result<(), CatalogError> {
        if column.values.len() != expected_len {
            return Err(CatalogError::LengthMismatch {
                column: key,
                expected: expected_len,
                got: column.values.len(),
            });
        }
        if self.get(&key).is_some() {
            return Err(CatalogError::DuplicateBand(key));
        }
        self.columns.push((key, column));
        Ok(())
    }

    /// Append without validation; callers guarantee length and uniqueness.
    pub(crate) fn push(&mut self, key: String, column: MagnitudeColumn) {
        self.columns.push((key, column));
    }

    pub fn get(&self, key: &str) -> Option<&MagnitudeColumn> {
        self.columns
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, column)| column)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MagnitudeColumn)> {
        self.columns.iter().map(|(k, c)| (k.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observed_threshold() {
        assert_eq!(observed(15.2), Some(15.2));
        assert_eq!(observed(99.99), Some(99.99));
        assert_eq!(observed(100.0), None);
        assert_eq!(observed(SENTINEL_MAGNITUDE), None);
        assert_eq!(observed(f64::NAN), None);
        assert_eq!(to_sentinel(None), SENTINEL_MAGNITUDE);
    }

    #[test]
    fn test_band_key() {
        assert_eq!(band_key("NIRCam", "F200W"), "nircam_f200w");
        assert_eq!(band_key("2MASS", "j_m"), "2mass_j_m");
        assert_eq!(band_key("guider1", ""), "guider1");
    }

    #[test]
    fn test_system_parsing() {
        assert_eq!("ABmag".parse::<MagnitudeSystem>().unwrap(), MagnitudeSystem::Abmag);
        assert_eq!(MagnitudeSystem::Stmag.to_string(), "stmag");
        assert!(matches!(
            "jansky".parse::<MagnitudeSystem>(),
            Err(CatalogError::UnknownMagnitudeSystem(_))
        ));
    }

    #[test]
    fn test_columns_keep_insertion_order_and_reject_bad_lengths() {
        let mut cols = MagnitudeColumns::new();
        for key in ["z_band", "a_band"] {
            cols.insert(
                key.to_string(),
                MagnitudeColumn {
                    system: MagnitudeSystem::Vegamag,
                    values: vec![1.0, 2.0],
                },
                2,
            )
            .unwrap();
        }
        assert_eq!(cols.keys().collect::<Vec<_>>(), vec!["z_band", "a_band"]);

        let short = MagnitudeColumn {
            system: MagnitudeSystem::Vegamag,
            values: vec![1.0],
        };
        assert_eq!(
            cols.insert("b_band".to_string(), short.clone(), 2),
            Err(CatalogError::LengthMismatch {
                column: "b_band".to_string(),
                expected: 2,
                got: 1
            })
        );
        assert_eq!(
            cols.insert("z_band".to_string(), MagnitudeColumn { values: vec![0.0, 0.0], ..short }, 2),
            Err(CatalogError::DuplicateBand("z_band".to_string()))
        );
    }
}
