//! Core processing engines: raster band algebra (`algebra`), vector
//! geoprocessing (`geoprocess`), and tunable options (`params`). These are
//! file-in/file-out primitives consumed by the high-level `api` module.
pub mod algebra;
pub mod geoprocess;
pub mod params;
