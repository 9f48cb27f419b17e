//! Error types for the catalog construction engine

use std::path::PathBuf;

use shared::algo::InterpError;
use skycat::{CatalogError, CombineError, SkycatError};
use thiserror::Error;

/// Failures while loading the standard magnitude table.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("I/O error reading standard magnitudes: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("table shape mismatch: {0}")]
    Shape(String),

    #[error("no standard magnitude file given and ${0} is not set")]
    MissingDataDir(&'static str),

    #[error("standard magnitude file {} does not exist", .0.display())]
    NotFound(PathBuf),
}

/// Failures in filter resolution, template matching and interpolation.
#[derive(Error, Debug, PartialEq)]
pub enum PhotometryError {
    #[error("filters not found in the standard magnitude table: {missing:?}")]
    FilterResolution { missing: Vec<String> },

    #[error("template match failed: {0}")]
    TemplateMatch(String),

    #[error(transparent)]
    Interpolation(#[from] InterpError),
}

/// Failures while merging survey tables into one catalog.
#[derive(Error, Debug)]
pub enum MergeError {
    #[error(transparent)]
    Photometry(#[from] PhotometryError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Crate-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Photometry(#[from] PhotometryError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Combine(#[from] CombineError),

    #[error(transparent)]
    Skycat(#[from] SkycatError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
