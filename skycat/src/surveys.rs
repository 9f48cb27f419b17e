//! Survey query tables
//!
//! Each catalog service hands back a complete table for a sky box; here those
//! tables arrive as CSV files. Rows are deserialized with `serde`, rows lacking
//! a position are dropped, and magnitudes are normalized so that an empty
//! cell, a non-finite value or anything at or above 100 is absent.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::catalogs::{observed, SurveySource};
use crate::error::Result;

/// A typed survey row built from a raw CSV record.
pub trait SurveyTable: Sized {
    /// Table name used in log messages
    const NAME: &'static str;

    type Record: DeserializeOwned;

    /// Convert a raw record; `None` drops the row.
    fn from_record(record: Self::Record) -> Option<Self>;

    fn read<R: Read>(reader: R) -> Result<Vec<Self>> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut rows = Vec::new();
        let mut dropped = 0usize;

        for result in csv_reader.deserialize() {
            let record: Self::Record = result?;
            match Self::from_record(record) {
                Some(row) => rows.push(row),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            log::warn!("{}: dropped {dropped} rows with missing RA/Dec", Self::NAME);
        }
        log::debug!("{}: loaded {} rows", Self::NAME, rows.len());
        Ok(rows)
    }

    fn load<P: AsRef<Path>>(path: P) -> Result<Vec<Self>> {
        log::info!("Loading {} table from {:?}", Self::NAME, path.as_ref());
        Self::read(File::open(path)?)
    }
}

fn position(ra: Option<f64>, dec: Option<f64>) -> Option<(f64, f64)> {
    match (ra, dec) {
        (Some(ra), Some(dec)) if ra.is_finite() && dec.is_finite() => Some((ra, dec)),
        _ => None,
    }
}

fn magnitude(raw: Option<f64>) -> Option<f64> {
    raw.and_then(observed)
}

/// Upper-limit flag at `band` in a photometric quality string.
fn is_upper_limit(ph_qual: &str, band: usize) -> bool {
    ph_qual.chars().nth(band) == Some('U')
}

#[derive(Debug, Deserialize)]
pub struct GaiaRecord {
    designation: String,
    ra: Option<f64>,
    dec: Option<f64>,
    #[serde(default)]
    phot_g_mean_mag: Option<f64>,
    #[serde(default)]
    phot_bp_mean_mag: Option<f64>,
    #[serde(default)]
    phot_rp_mean_mag: Option<f64>,
}

/// A precision-catalog source with its native optical photometry.
#[derive(Debug, Clone, PartialEq)]
pub struct GaiaSource {
    pub designation: String,
    pub ra: f64,
    pub dec: f64,
    pub g: Option<f64>,
    pub bp: Option<f64>,
    pub rp: Option<f64>,
}

impl SurveyTable for GaiaSource {
    const NAME: &'static str = "Gaia";
    type Record = GaiaRecord;

    fn from_record(r: GaiaRecord) -> Option<Self> {
        let (ra, dec) = position(r.ra, r.dec)?;
        Some(Self {
            designation: r.designation,
            ra,
            dec,
            g: magnitude(r.phot_g_mean_mag),
            bp: magnitude(r.phot_bp_mean_mag),
            rp: magnitude(r.phot_rp_mean_mag),
        })
    }
}

impl SurveySource for GaiaSource {
    fn position_degrees(&self) -> (f64, f64) {
        (self.ra, self.dec)
    }

    fn magnitude_column(&self, name: &str) -> Option<Option<f64>> {
        match name {
            "phot_g_mean_mag" => Some(self.g),
            "phot_bp_mean_mag" => Some(self.bp),
            "phot_rp_mean_mag" => Some(self.rp),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TwoMassRecord {
    designation: String,
    ra: Option<f64>,
    dec: Option<f64>,
    #[serde(default)]
    j_m: Option<f64>,
    #[serde(default)]
    h_m: Option<f64>,
    #[serde(default, alias = "ks_m")]
    k_m: Option<f64>,
    #[serde(default)]
    ph_qual: Option<String>,
}

/// A 2MASS point source, either standalone or embedded in the precision archive.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoMassSource {
    pub designation: String,
    pub ra: f64,
    pub dec: f64,
    pub j: Option<f64>,
    pub h: Option<f64>,
    pub ks: Option<f64>,
    /// Per-band quality codes in J, H, Ks order
    pub ph_qual: String,
}

impl TwoMassSource {
    /// J, H, Ks in order
    pub fn magnitudes(&self) -> [Option<f64>; 3] {
        [self.j, self.h, self.ks]
    }

    /// True when band `band` (0 = J, 1 = H, 2 = Ks) is only an upper limit.
    pub fn is_upper_limit(&self, band: usize) -> bool {
        is_upper_limit(&self.ph_qual, band)
    }
}

impl SurveyTable for TwoMassSource {
    const NAME: &'static str = "2MASS";
    type Record = TwoMassRecord;

    fn from_record(r: TwoMassRecord) -> Option<Self> {
        let (ra, dec) = position(r.ra, r.dec)?;
        Some(Self {
            designation: r.designation,
            ra,
            dec,
            j: magnitude(r.j_m),
            h: magnitude(r.h_m),
            ks: magnitude(r.k_m),
            ph_qual: r.ph_qual.unwrap_or_default(),
        })
    }
}

impl SurveySource for TwoMassSource {
    fn position_degrees(&self) -> (f64, f64) {
        (self.ra, self.dec)
    }

    fn magnitude_column(&self, name: &str) -> Option<Option<f64>> {
        match name {
            "j_m" => Some(self.j),
            "h_m" => Some(self.h),
            "k_m" | "ks_m" => Some(self.ks),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WiseRecord {
    designation: String,
    ra: Option<f64>,
    dec: Option<f64>,
    #[serde(default)]
    w1mpro: Option<f64>,
    #[serde(default)]
    w2mpro: Option<f64>,
    #[serde(default)]
    w3mpro: Option<f64>,
    #[serde(default)]
    w4mpro: Option<f64>,
    #[serde(default)]
    w1sigmpro: Option<f64>,
    #[serde(default)]
    w2sigmpro: Option<f64>,
    #[serde(default)]
    w3sigmpro: Option<f64>,
    #[serde(default)]
    w4sigmpro: Option<f64>,
    #[serde(default)]
    ph_qual: Option<String>,
}

/// A WISE source. Profile-fit magnitudes and their uncertainties in W1..W4 order.
#[derive(Debug, Clone, PartialEq)]
pub struct WiseSource {
    pub designation: String,
    pub ra: f64,
    pub dec: f64,
    pub mpro: [Option<f64>; 4],
    pub sigmpro: [Option<f64>; 4],
    pub ph_qual: String,
}

impl WiseSource {
    /// Magnitude in band `band` (0 = W1) when it is a real detection: a
    /// magnitude with a measured uncertainty that is not flagged as an upper
    /// limit.
    pub fn usable_magnitude(&self, band: usize) -> Option<f64> {
        let mag = self.mpro.get(band).copied().flatten()?;
        if self.sigmpro.get(band).copied().flatten().is_none() || is_upper_limit(&self.ph_qual, band)
        {
            return None;
        }
        Some(mag)
    }
}

impl SurveyTable for WiseSource {
    const NAME: &'static str = "WISE";
    type Record = WiseRecord;

    fn from_record(r: WiseRecord) -> Option<Self> {
        let (ra, dec) = position(r.ra, r.dec)?;
        Some(Self {
            designation: r.designation,
            ra,
            dec,
            mpro: [r.w1mpro, r.w2mpro, r.w3mpro, r.w4mpro].map(magnitude),
            sigmpro: [r.w1sigmpro, r.w2sigmpro, r.w3sigmpro, r.w4sigmpro]
                .map(|s| s.filter(|v| v.is_finite())),
            ph_qual: r.ph_qual.unwrap_or_default(),
        })
    }
}

impl SurveySource for WiseSource {
    fn position_degrees(&self) -> (f64, f64) {
        (self.ra, self.dec)
    }

    fn magnitude_column(&self, name: &str) -> Option<Option<f64>> {
        let band = match name {
            "w1mpro" => 0,
            "w2mpro" => 1,
            "w3mpro" => 2,
            "w4mpro" => 3,
            _ => return None,
        };
        Some(self.mpro[band])
    }
}

/// Identity link between a source in one catalog and its counterpart in another.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CrossReference {
    /// Identifier in the precision catalog
    pub designation: String,
    /// Identifier in the linked survey
    pub designation_2: String,
}

impl SurveyTable for CrossReference {
    const NAME: &'static str = "cross-reference";
    type Record = CrossReference;

    fn from_record(record: CrossReference) -> Option<Self> {
        Some(record)
    }
}

/// One star from the Besançon population synthesis model.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BesanconStar {
    #[serde(rename = "V")]
    pub v: f64,
    #[serde(rename = "V-K")]
    pub v_minus_k: f64,
    #[serde(rename = "J-K")]
    pub j_minus_k: f64,
    #[serde(rename = "J-H")]
    pub j_minus_h: f64,
    #[serde(rename = "J-L")]
    pub j_minus_l: f64,
    /// Interstellar extinction in V
    #[serde(rename = "Av")]
    pub av: f64,
}

impl BesanconStar {
    /// K magnitude implied by the V magnitude and V-K color.
    pub fn k(&self) -> f64 {
        self.v - self.v_minus_k
    }
}

impl SurveyTable for BesanconStar {
    const NAME: &'static str = "Besancon";
    type Record = BesanconStar;

    fn from_record(record: BesanconStar) -> Option<Self> {
        Some(record)
    }
}
