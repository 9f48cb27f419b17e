use std::path::PathBuf;

use clap::Parser;
use shared::algo::{parse_dec_degrees, parse_ra_degrees};

use crate::config::CatalogConfig;
use crate::error::Result;
use crate::photometry::Instrument;

/// Region and filter arguments shared by the catalog binaries.
///
/// Any argument left unset keeps the value from `--config`, or the default
/// configuration when no file is given.
#[derive(Parser, Debug, Clone, Default)]
pub struct SharedCatalogArgs {
    /// JSON configuration to start from
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Target instrument (Guider, NIRCam, NIRISS or All)
    #[arg(long)]
    pub instrument: Option<Instrument>,

    /// Comma-separated filter names, e.g. F200W,F444W
    #[arg(long, value_delimiter = ',')]
    pub filters: Vec<String>,

    /// Box center RA, decimal degrees or hh:mm:ss
    #[arg(long, value_parser = parse_ra_degrees, allow_hyphen_values = true)]
    pub ra: Option<f64>,

    /// Box center Dec, decimal degrees or dd:mm:ss
    #[arg(long, value_parser = parse_dec_degrees, allow_hyphen_values = true)]
    pub dec: Option<f64>,

    /// Box side length in arcseconds
    #[arg(long)]
    pub box_width: Option<f64>,

    /// Seed for synthetic star positions
    #[arg(long)]
    pub seed: Option<u64>,

    /// Standard magnitude table (defaults to $SIMCAT_DATA/standard_magnitudes.txt)
    #[arg(long)]
    pub standard_magnitudes: Option<PathBuf>,
}

impl SharedCatalogArgs {
    /// Configuration file (if any) with the command-line overrides applied.
    pub fn to_config(&self) -> Result<CatalogConfig> {
        let mut config = match &self.config {
            Some(path) => CatalogConfig::load_from_file(path)?,
            None => CatalogConfig::default(),
        };

        if let Some(instrument) = self.instrument {
            config.instrument = instrument;
        }
        if !self.filters.is_empty() {
            config.filters = self.filters.clone();
        }
        if let Some(ra) = self.ra {
            config.center_ra = ra;
        }
        if let Some(dec) = self.dec {
            config.center_dec = dec;
        }
        if let Some(width) = self.box_width {
            config.box_width_arcsec = width;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.standard_magnitudes.is_some() {
            config.standard_magnitudes = self.standard_magnitudes.clone();
        }

        config.validate()?;
        Ok(config)
    }
}
