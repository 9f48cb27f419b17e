//! Tool to summarize a source catalog
//!
//! Reads a catalog written by `build_catalog` (or a raw 2MASS table) and prints
//! source counts, the spatial spread and per-band magnitude statistics.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use skycat::catalogs::{catalog_from_sources, observed, MagnitudeSystem, SourceCatalog};
use skycat::io::read_catalog;
use skycat::surveys::{SurveyTable, TwoMassSource};

#[derive(Parser, Debug)]
#[command(
    name = "Catalog Statistics",
    about = "Prints counts and magnitude statistics for a source catalog",
    long_about = None
)]
struct Args {
    /// Catalog file written by build_catalog
    #[arg(long, conflicts_with = "twomass")]
    catalog: Option<PathBuf>,

    /// Raw 2MASS CSV table to summarize instead of a built catalog
    #[arg(long)]
    twomass: Option<PathBuf>,

    /// Number of declination bins across the field
    #[arg(long, default_value_t = 4)]
    dec_bins: usize,
}

struct BandStats {
    present: usize,
    absent: usize,
    min: f64,
    max: f64,
    mean: f64,
}

fn band_stats(values: &[f64]) -> BandStats {
    let present: Vec<f64> = values.iter().copied().filter_map(observed).collect();
    let (min, max) = present
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let mean = if present.is_empty() {
        f64::NAN
    } else {
        present.iter().sum::<f64>() / present.len() as f64
    };
    BandStats {
        present: present.len(),
        absent: values.len() - present.len(),
        min,
        max,
        mean,
    }
}

fn report<C: SourceCatalog>(catalog: &C, dec_bins: usize) {
    println!("Total sources: {}", catalog.len());
    println!("Location units: {}", catalog.location_units());
    if catalog.is_empty() {
        return;
    }

    let dec = catalog.dec();
    let dec_min = dec.iter().copied().fold(f64::INFINITY, f64::min);
    let dec_max = dec.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (dec_max - dec_min) / dec_bins.max(1) as f64;

    println!("\nSpatial distribution (by declination):");
    for bin in 0..dec_bins.max(1) {
        let lo = dec_min + bin as f64 * step;
        let hi = if bin + 1 == dec_bins.max(1) {
            f64::INFINITY
        } else {
            lo + step
        };
        let count = catalog.filter_positions(|_, d| d >= lo && d < hi).len();
        let percentage = count as f64 / catalog.len() as f64 * 100.0;
        println!("  dec {lo:>10.5}°: {count} sources ({percentage:.1}%)");
    }

    println!("\nMagnitudes:");
    for (key, column) in catalog.magnitudes().iter() {
        let stats = band_stats(&column.values);
        if stats.present == 0 {
            println!("  {key} [{}]: no measurements ({} absent)", column.system, stats.absent);
            continue;
        }
        println!(
            "  {key} [{}]: {} measured, {} absent, range {:.3}..{:.3}, mean {:.3}",
            column.system, stats.present, stats.absent, stats.min, stats.max, stats.mean
        );
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match (&args.catalog, &args.twomass) {
        (Some(path), _) => {
            let catalog = read_catalog(path)
                .with_context(|| format!("Failed to read catalog {}", path.display()))?;
            report(&catalog, args.dec_bins);
        }
        (None, Some(path)) => {
            let rows = TwoMassSource::load(path)
                .with_context(|| format!("Failed to load 2MASS table {}", path.display()))?;
            let catalog = catalog_from_sources(
                &rows,
                "2MASS",
                &["j_m", "h_m", "k_m"],
                MagnitudeSystem::Vegamag,
            )?;
            report(&catalog, args.dec_bins);
        }
        (None, None) => bail!("one of --catalog or --twomass is required"),
    }

    Ok(())
}
