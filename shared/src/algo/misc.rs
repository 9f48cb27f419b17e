//! Miscellaneous numeric and coordinate utilities.
//!
//! - **Linear interpolation**: bounded [`interp`] and endpoint-clamped
//!   [`interp_clamped`] (the latter matches the usual "hold the edge value"
//!   convention used when interpolating photometry in wavelength)
//! - **Coordinate conversions**: sexagesimal RA/Dec to decimal degrees, and
//!   string parsing that accepts either form

use thiserror::Error;

/// Errors that can occur during interpolation operations.
#[derive(Error, Debug, PartialEq)]
pub enum InterpError {
    #[error("Value {0} is out of bounds for interpolation range [{1}, {2}]")]
    OutOfBounds(f64, f64, f64),
    #[error("Input vectors must have at least {0} point(s)")]
    InsufficientData(usize),
    #[error("Input vectors must have the same length")]
    MismatchedLengths,
    #[error("X values must be sorted in ascending order")]
    UnsortedData,
}

/// Errors produced when parsing an RA or Dec string.
#[derive(Error, Debug, PartialEq)]
pub enum AngleParseError {
    #[error("could not parse angle '{0}'")]
    Malformed(String),
    #[error("angle '{value}' outside allowed range [{min}, {max}]")]
    OutOfRange { value: String, min: f64, max: f64 },
}

fn validate(xs: &[f64], ys: &[f64], min_points: usize) -> Result<(), InterpError> {
    if xs.len() != ys.len() {
        return Err(InterpError::MismatchedLengths);
    }
    if xs.len() < min_points {
        return Err(InterpError::InsufficientData(min_points));
    }
    if xs.windows(2).any(|w| w[1] < w[0]) {
        return Err(InterpError::UnsortedData);
    }
    Ok(())
}

/// Linear interpolation on 1D data using binary search.
///
/// # Arguments
///
/// * `x` - The x-coordinate at which to interpolate
/// * `xs` - x-coordinates, sorted ascending
/// * `ys` - y-values, same length as `xs`
///
/// # Errors
///
/// `OutOfBounds` when `x` lies outside `[xs[0], xs[n-1]]`, plus the input
/// validation errors of [`InterpError`].
///
/// # Examples
///
/// ```rust
/// use shared::algo::misc::interp;
///
/// let xs = vec![0.0, 1.0, 2.0, 3.0];
/// let ys = vec![0.0, 2.0, 4.0, 6.0];
/// assert_eq!(interp(1.5, &xs, &ys).unwrap(), 3.0);
/// assert_eq!(interp(2.0, &xs, &ys).unwrap(), 4.0);
/// ```
pub fn interp(x: f64, xs: &[f64], ys: &[f64]) -> Result<f64, InterpError> {
    validate(xs, ys, 2)?;

    let last = xs.len() - 1;
    if x < xs[0] || x > xs[last] {
        return Err(InterpError::OutOfBounds(x, xs[0], xs[last]));
    }

    // Index of the first element > x
    let idx = xs.partition_point(|&val| val <= x);
    if idx == 0 {
        return Ok(ys[0]);
    }
    if idx == xs.len() {
        return Ok(ys[last]);
    }

    let (x1, x2) = (xs[idx - 1], xs[idx]);
    let (y1, y2) = (ys[idx - 1], ys[idx]);
    let t = (x - x1) / (x2 - x1);

    Ok(y1 + t * (y2 - y1))
}

/// Linear interpolation that holds the endpoint value outside the data range.
///
/// Values of `x` below `xs[0]` return `ys[0]`, values above the last sample
/// return the last `y`. A single sample broadcasts its value everywhere.
/// No extrapolation is ever performed.
///
/// ```rust
/// use shared::algo::misc::interp_clamped;
///
/// let xs = [1.0, 2.0, 3.0];
/// let ys = [15.0, 14.0, 13.0];
/// assert_eq!(interp_clamped(0.5, &xs, &ys).unwrap(), 15.0);
/// assert_eq!(interp_clamped(4.0, &xs, &ys).unwrap(), 13.0);
/// assert_eq!(interp_clamped(2.5, &xs, &ys).unwrap(), 13.5);
/// ```
pub fn interp_clamped(x: f64, xs: &[f64], ys: &[f64]) -> Result<f64, InterpError> {
    validate(xs, ys, 1)?;

    let last = xs.len() - 1;
    if x <= xs[0] {
        return Ok(ys[0]);
    }
    if x >= xs[last] {
        return Ok(ys[last]);
    }

    interp(x, xs, ys)
}

/// Converts Right Ascension from Hours, Minutes, Seconds to Decimal Degrees.
/// RA (Hours) * 15 = RA (Degrees)
pub fn ra_hms_to_deg(hours: f64, minutes: f64, seconds: f64) -> f64 {
    (hours + minutes / 60.0 + seconds / 3600.0) * 15.0
}

/// Converts Declination from Degrees, Minutes, Seconds to Decimal Degrees.
/// Handles negative declination correctly.
pub fn dec_dms_to_deg(degrees: f64, minutes: f64, seconds: f64) -> f64 {
    let sign = if degrees < 0.0 { -1.0 } else { 1.0 };
    (degrees.abs() + minutes / 60.0 + seconds / 3600.0) * sign
}

/// Split "12:34:56.7" / "12h34m56.7s" / "12 34 56.7" into three numbers.
fn split_sexagesimal(s: &str) -> Option<(f64, f64, f64)> {
    let cleaned: String = s
        .chars()
        .map(|c| match c {
            'h' | 'd' | 'm' | 's' | ':' | '\'' | '"' => ' ',
            other => other,
        })
        .collect();
    let parts: Vec<f64> = cleaned
        .split_whitespace()
        .map(str::parse::<f64>)
        .collect::<Result<_, _>>()
        .ok()?;

    match parts.as_slice() {
        [a, b, c] => Some((*a, *b, *c)),
        [a, b] => Some((*a, *b, 0.0)),
        _ => None,
    }
}

/// Parse a right ascension given in decimal degrees or as `hh:mm:ss`.
///
/// ```rust
/// use shared::algo::misc::parse_ra_degrees;
///
/// assert_eq!(parse_ra_degrees("80.5").unwrap(), 80.5);
/// assert_eq!(parse_ra_degrees("06:00:00").unwrap(), 90.0);
/// ```
pub fn parse_ra_degrees(s: &str) -> Result<f64, AngleParseError> {
    let trimmed = s.trim();
    let degrees = match trimmed.parse::<f64>() {
        Ok(value) => value,
        Err(_) => {
            let (h, m, sec) = split_sexagesimal(trimmed)
                .ok_or_else(|| AngleParseError::Malformed(s.to_string()))?;
            ra_hms_to_deg(h, m, sec)
        }
    };

    if !(0.0..=360.0).contains(&degrees) {
        return Err(AngleParseError::OutOfRange {
            value: s.to_string(),
            min: 0.0,
            max: 360.0,
        });
    }
    Ok(degrees)
}

/// Parse a declination given in decimal degrees or as `±dd:mm:ss`.
///
/// A leading minus sign applies to the whole value, including "-00:30:00".
pub fn parse_dec_degrees(s: &str) -> Result<f64, AngleParseError> {
    let trimmed = s.trim();
    let degrees = match trimmed.parse::<f64>() {
        Ok(value) => value,
        Err(_) => {
            let negative = trimmed.starts_with('-');
            let unsigned = trimmed.trim_start_matches(['-', '+']);
            let (d, m, sec) = split_sexagesimal(unsigned)
                .ok_or_else(|| AngleParseError::Malformed(s.to_string()))?;
            let value = dec_dms_to_deg(d, m, sec);
            if negative {
                -value
            } else {
                value
            }
        }
    };

    if !(-90.0..=90.0).contains(&degrees) {
        return Err(AngleParseError::OutOfRange {
            value: s.to_string(),
            min: -90.0,
            max: 90.0,
        });
    }
    Ok(degrees)
}
