//! Filter name resolution
//!
//! Two concerns live here: turning an instrument plus a filter selection into
//! the standard table's column labels, and resolving any list of names to
//! column indices by substring containment.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PhotometryError;

/// Column index of the first label containing each name.
///
/// Labels are scanned in table order and the first containing label wins.
/// Names with no match are skipped, so the result can be shorter than
/// `names`; callers that need every name should use [`resolve_filters`].
pub fn crossmatch_filter_names<S: AsRef<str>>(names: &[S], labels: &[String]) -> Vec<usize> {
    names
        .iter()
        .filter_map(|name| labels.iter().position(|label| label.contains(name.as_ref())))
        .collect()
}

/// Like [`crossmatch_filter_names`] but every name must resolve.
pub fn resolve_filters<S: AsRef<str>>(
    names: &[S],
    labels: &[String],
) -> Result<Vec<usize>, PhotometryError> {
    let indices = crossmatch_filter_names(names, labels);
    if indices.len() == names.len() && !names.is_empty() {
        return Ok(indices);
    }

    let missing: Vec<String> = names
        .iter()
        .map(|n| n.as_ref())
        .filter(|n| !labels.iter().any(|label| label.contains(n)))
        .map(String::from)
        .collect();
    Err(PhotometryError::FilterResolution { missing })
}

/// Target instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Instrument {
    #[serde(alias = "guider", alias = "GUIDER", alias = "FGS")]
    Guider,
    #[serde(rename = "NIRCam", alias = "nircam", alias = "NIRCAM")]
    NirCam,
    #[default]
    #[serde(rename = "NIRISS", alias = "niriss")]
    Niriss,
    #[serde(alias = "all", alias = "ALL")]
    All,
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Instrument::Guider => "Guider",
            Instrument::NirCam => "NIRCam",
            Instrument::Niriss => "NIRISS",
            Instrument::All => "All",
        };
        f.write_str(name)
    }
}

impl FromStr for Instrument {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "guider" | "fgs" => Ok(Instrument::Guider),
            "nircam" => Ok(Instrument::NirCam),
            "niriss" => Ok(Instrument::Niriss),
            "all" => Ok(Instrument::All),
            other => Err(format!(
                "unknown instrument '{other}' (expected Guider, NIRCam, NIRISS or All)"
            )),
        }
    }
}

/// Filter names and the table label each maps to, per instrument.
struct FilterSet {
    instrument: Instrument,
    filters: &'static [&'static str],
    labels: &'static [&'static str],
}

const GUIDER: FilterSet = FilterSet {
    instrument: Instrument::Guider,
    filters: &["guider1", "guider2"],
    labels: &["guider1_magnitude", "guider2_magnitude"],
};

// The medium-band NIRISS filters map onto the nearest wide-band column.
const NIRISS: FilterSet = FilterSet {
    instrument: Instrument::Niriss,
    filters: &[
        "F090W", "F115W", "F140M", "F150W", "F158M", "F200W", "F277W", "F356W", "F380M", "F430M",
        "F444W", "F480M",
    ],
    labels: &[
        "niriss_f090w_magnitude",
        "niriss_f115w_magnitude",
        "niriss_f140w_magnitude",
        "niriss_f150w_magnitude",
        "niriss_f158w_magnitude",
        "niriss_f200w_magnitude",
        "niriss_f277w_magnitude",
        "niriss_f356w_magnitude",
        "niriss_f380w_magnitude",
        "niriss_f430w_magnitude",
        "niriss_f444w_magnitude",
        "niriss_f480w_magnitude",
    ],
};

const NIRCAM: FilterSet = FilterSet {
    instrument: Instrument::NirCam,
    filters: &[
        "F070W", "F090W", "F115W", "F140W", "F150W", "F150W2", "F162W", "F164W", "F182W", "F187W",
        "F200W", "F210W", "F212W", "F250W", "F277W", "F300W", "F322W2", "F323W", "F335W", "F356W",
        "F360W", "F405W", "F410W", "F430W", "F444W", "F460W", "F466W", "F470W", "F480W",
    ],
    labels: &[
        "nircam_f070w_magnitude",
        "nircam_f090w_magnitude",
        "nircam_f115w_magnitude",
        "nircam_f140w_magnitude",
        "nircam_f150w_magnitude",
        "nircam_f150w2_magnitude",
        "nircam_f162w_magnitude",
        "nircam_f164w_magnitude",
        "nircam_f182w_magnitude",
        "nircam_f187w_magnitude",
        "nircam_f200w_magnitude",
        "nircam_f210w_magnitude",
        "nircam_f212w_magnitude",
        "nircam_f250w_magnitude",
        "nircam_f277w_magnitude",
        "nircam_f300w_magnitude",
        "nircam_f322w2_magnitude",
        "nircam_f323w_magnitude",
        "nircam_f335w_magnitude",
        "nircam_f356w_magnitude",
        "nircam_f360w_magnitude",
        "nircam_f405w_magnitude",
        "nircam_f410w_magnitude",
        "nircam_f430w_magnitude",
        "nircam_f444w_magnitude",
        "nircam_f460w_magnitude",
        "nircam_f466w_magnitude",
        "nircam_f470w_magnitude",
        "nircam_f480w_magnitude",
    ],
};

/// Instrument order used when `All` is requested.
const FILTER_SETS: [&FilterSet; 3] = [&GUIDER, &NIRCAM, &NIRISS];

/// Standard-table labels for an instrument and filter selection.
///
/// Filter names compare case-insensitively. An empty `filters` selects every
/// filter of the instrument; `All` walks Guider, NIRCam and NIRISS in turn.
/// Unknown filter names are skipped.
pub fn make_filter_names<S: AsRef<str>>(instrument: Instrument, filters: &[S]) -> Vec<String> {
    let mut labels = Vec::new();
    for set in FILTER_SETS {
        if instrument != Instrument::All && instrument != set.instrument {
            continue;
        }
        if filters.is_empty() {
            labels.extend(set.labels.iter().map(|l| l.to_string()));
            continue;
        }
        for requested in filters {
            if let Some(pos) = set
                .filters
                .iter()
                .position(|f| f.eq_ignore_ascii_case(requested.as_ref().trim()))
            {
                labels.push(set.labels[pos].to_string());
            }
        }
    }
    labels
}

/// Catalog band key for a table label: `nircam_f200w_magnitude` -> `nircam_f200w`.
pub fn band_key_for_label(label: &str) -> String {
    label
        .trim()
        .strip_suffix("_magnitude")
        .unwrap_or(label.trim())
        .to_lowercase()
}
