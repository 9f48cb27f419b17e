//! Sky source catalogs
//!
//! In-memory containers for point-source and galaxy catalogs, the loaders for
//! the survey tables they are built from, and the flat text format used to
//! hand a finished catalog to the scene simulator.

pub mod catalogs;
pub mod coords;
pub mod error;
pub mod io;
pub mod surveys;

pub use catalogs::{
    combine_catalogs, GalaxyCatalog, MagnitudeColumn, MagnitudeSystem, PointSourceCatalog,
    SourceCatalog, SENTINEL_MAGNITUDE,
};
pub use coords::{Equatorial, SkyBox};
pub use error::{CatalogError, CombineError, Result, SkycatError};
