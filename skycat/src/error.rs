//! Error types for catalog construction, combination and file I/O

use thiserror::Error;

/// Violations of the catalog container invariants.
#[derive(Error, Debug, PartialEq)]
pub enum CatalogError {
    #[error("RA has {ra} entries but Dec has {dec}")]
    PositionLengthMismatch { ra: usize, dec: usize },

    #[error("column '{column}' has {got} values, catalog holds {expected} sources")]
    LengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },

    #[error("band '{0}' is already present in the catalog")]
    DuplicateBand(String),

    #[error("unknown magnitude system '{0}' (expected vegamag, abmag or stmag)")]
    UnknownMagnitudeSystem(String),

    #[error("survey table has no column named '{0}'")]
    UnknownColumn(String),
}

/// Reasons two catalogs cannot be concatenated.
#[derive(Error, Debug, PartialEq)]
pub enum CombineError {
    #[error("band sets differ: {first:?} vs {second:?}")]
    BandMismatch {
        first: Vec<String>,
        second: Vec<String>,
    },

    #[error("location units differ: '{first}' vs '{second}'")]
    UnitsMismatch { first: String, second: String },
}

/// Crate-level error.
#[derive(Error, Debug)]
pub enum SkycatError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Combine(#[from] CombineError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed catalog file at line {line}: {message}")]
    Format { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, SkycatError>;
