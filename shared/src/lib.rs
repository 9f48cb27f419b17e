//! Shared components and utilities for the catalog builder crates.
//!
//! This crate contains the small numeric building blocks used by both the
//! catalog container crate (`skycat`) and the catalog construction engine
//! (`catsim`): clamped 1D interpolation, sexagesimal coordinate parsing,
//! a 3D k-d tree for nearest-neighbor queries and type-safe angle units.

pub mod algo;
pub mod units;
