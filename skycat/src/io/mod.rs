//! Catalog file formats

pub mod text_table;

pub use text_table::{read_catalog, write_catalog};
