//! Build a simulation input catalog for one sky region
//!
//! Reads the survey CSV tables for the region, merges and transforms them onto
//! the requested instrument filters, optionally adds Besançon model stars and
//! writes the combined catalog.

use std::path::PathBuf;

use anyhow::{Context, Result};
use catsim::pipeline::{run, InputPaths};
use catsim::shared_args::SharedCatalogArgs;
use clap::Parser;
use skycat::catalogs::SourceCatalog;

#[derive(Parser, Debug)]
#[command(author, version, about = "Build a source catalog from survey tables")]
struct Args {
    #[command(flatten)]
    shared: SharedCatalogArgs,

    /// Gaia source table
    #[arg(long)]
    gaia: Option<PathBuf>,

    /// Gaia to 2MASS cross-reference
    #[arg(long)]
    gaia_2mass_xref: Option<PathBuf>,

    /// 2MASS rows from the Gaia archive
    #[arg(long)]
    gaia_2mass: Option<PathBuf>,

    /// Gaia to WISE cross-reference
    #[arg(long)]
    gaia_wise_xref: Option<PathBuf>,

    /// WISE rows from the Gaia archive
    #[arg(long)]
    gaia_wise: Option<PathBuf>,

    /// Standalone 2MASS point source table
    #[arg(long)]
    twomass: Option<PathBuf>,

    /// Standalone WISE source table
    #[arg(long)]
    wise: Option<PathBuf>,

    /// Besançon model stars
    #[arg(long)]
    besancon: Option<PathBuf>,

    /// Output catalog file
    #[arg(short, long, default_value = "source_catalog.list")]
    output: PathBuf,

    /// Also write the effective configuration as JSON
    #[arg(long)]
    save_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = args
        .shared
        .to_config()
        .context("Failed to assemble catalog configuration")?;
    if let Some(path) = &args.save_config {
        config
            .save_to_file(path)
            .with_context(|| format!("Failed to write configuration to {}", path.display()))?;
    }

    let paths = InputPaths {
        gaia: args.gaia,
        gaia_2mass_xref: args.gaia_2mass_xref,
        gaia_2mass: args.gaia_2mass,
        gaia_wise_xref: args.gaia_wise_xref,
        gaia_wise: args.gaia_wise,
        twomass: args.twomass,
        wise: args.wise,
        besancon: args.besancon,
    };

    let build = run(&config, &paths, &args.output)
        .with_context(|| format!("Failed to build catalog {}", args.output.display()))?;

    println!(
        "Wrote {} sources ({} observed, {} synthetic) to {}",
        build.catalog.len(),
        build.merge.total(),
        build.synthetic,
        args.output.display()
    );
    if build.merge.quality_excluded > 0 {
        println!(
            "{} magnitudes excluded as upper limits or without uncertainties",
            build.merge.quality_excluded
        );
    }
    Ok(())
}
