//! Flat whitespace-delimited catalog files
//!
//! Layout:
//!
//! ```text
//! # position_RA_Dec
//! # vegamag
//! #
//! index   x_or_RA        y_or_Dec       nircam_f200w_magnitude  nircam_f444w_magnitude
//! 1       53.10000000    -27.80000000   15.234000               14.900000
//! ```
//!
//! The second header line holds a single magnitude system when every band
//! shares one, otherwise one system per band in column order.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::catalogs::{MagnitudeColumn, MagnitudeSystem, PointSourceCatalog, SourceCatalog};
use crate::error::{Result, SkycatError};

const MAGNITUDE_SUFFIX: &str = "_magnitude";

/// Write `catalog` to `path`, one row per source.
pub fn write_catalog<P: AsRef<Path>>(catalog: &PointSourceCatalog, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut out = BufWriter::new(file);
    write_to(catalog, &mut out)?;
    out.flush()?;
    log::info!(
        "wrote {} sources to {}",
        catalog.len(),
        path.as_ref().display()
    );
    Ok(())
}

fn write_to<W: Write>(catalog: &PointSourceCatalog, out: &mut W) -> Result<()> {
    let columns: Vec<(&str, &MagnitudeColumn)> = catalog.magnitudes().iter().collect();

    let systems: Vec<&str> = columns.iter().map(|(_, c)| c.system.as_str()).collect();
    let uniform = systems.windows(2).all(|w| w[0] == w[1]);
    let system_line = if uniform {
        systems
            .first()
            .copied()
            .unwrap_or(MagnitudeSystem::default().as_str())
            .to_string()
    } else {
        systems.join(" ")
    };

    writeln!(out, "# {}", catalog.location_units())?;
    writeln!(out, "# {system_line}")?;
    writeln!(out, "#")?;

    write!(out, "index   x_or_RA        y_or_Dec      ")?;
    for (key, _) in &columns {
        write!(out, "  {key}{MAGNITUDE_SUFFIX}")?;
    }
    writeln!(out)?;

    for i in 0..catalog.len() {
        write!(
            out,
            "{:<7} {:<14.8} {:<14.8}",
            i + 1,
            catalog.ra()[i],
            catalog.dec()[i]
        )?;
        for (_, column) in &columns {
            write!(out, "  {:.6}", column.values[i])?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn format_error(line: usize, message: impl Into<String>) -> SkycatError {
    SkycatError::Format {
        line,
        message: message.into(),
    }
}

/// Read a catalog previously written by [`write_catalog`].
pub fn read_catalog<P: AsRef<Path>>(path: P) -> Result<PointSourceCatalog> {
    let file = File::open(path.as_ref())?;
    read_from(BufReader::new(file))
}

fn read_from<R: BufRead>(reader: R) -> Result<PointSourceCatalog> {
    let mut comments: Vec<String> = Vec::new();
    let mut band_keys: Option<Vec<String>> = None;
    let mut ra = Vec::new();
    let mut dec = Vec::new();
    let mut values: Vec<Vec<f64>> = Vec::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_idx + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }
        if let Some(comment) = trimmed.strip_prefix('#') {
            comments.push(comment.trim().to_string());
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if band_keys.is_none() {
            if fields.len() < 3 || fields[1] != "x_or_RA" || fields[2] != "y_or_Dec" {
                return Err(format_error(line_no, "expected column header"));
            }
            let keys = fields[3..]
                .iter()
                .map(|f| f.strip_suffix(MAGNITUDE_SUFFIX).unwrap_or(f).to_string())
                .collect::<Vec<_>>();
            values = vec![Vec::new(); keys.len()];
            band_keys = Some(keys);
            continue;
        }
        let keys = band_keys.as_deref().unwrap_or_default();

        if fields.len() != keys.len() + 3 {
            return Err(format_error(
                line_no,
                format!("expected {} fields, found {}", keys.len() + 3, fields.len()),
            ));
        }
        let parse = |s: &str| {
            s.parse::<f64>()
                .map_err(|_| format_error(line_no, format!("invalid number '{s}'")))
        };
        ra.push(parse(fields[1])?);
        dec.push(parse(fields[2])?);
        for (column, field) in values.iter_mut().zip(&fields[3..]) {
            column.push(parse(field)?);
        }
    }

    let keys = band_keys.ok_or_else(|| format_error(0, "missing column header"))?;
    let location_units = comments
        .first()
        .filter(|c| !c.is_empty())
        .cloned()
        .ok_or_else(|| format_error(1, "missing location units line"))?;

    let system_tokens: Vec<MagnitudeSystem> = comments
        .get(1)
        .map(|line| {
            line.split_whitespace()
                .map(|s| s.parse::<MagnitudeSystem>())
                .collect::<std::result::Result<Vec<_>, _>>()
        })
        .transpose()?
        .unwrap_or_default();
    let system_for = |i: usize| match system_tokens.len() {
        0 => MagnitudeSystem::default(),
        1 => system_tokens[0],
        _ => system_tokens.get(i).copied().unwrap_or_default(),
    };

    let mut catalog = PointSourceCatalog::new(ra, dec)?.with_location_units(location_units);
    for (i, (key, column)) in keys.into_iter().zip(values).enumerate() {
        catalog.insert_band(
            key,
            MagnitudeColumn {
                system: system_for(i),
                values: column,
            },
        )?;
    }
    Ok(catalog)
}
