//! I/O layer: GDAL-backed raster and vector dataset adapters plus the
//! PostGIS import boundary. Everything above this layer works on the owned
//! in-memory representations (`RasterDataset`, `VectorDataset`).
pub mod raster;
pub use raster::{GeoProfile, RasterDataset, RasterReader, write_raster};

pub mod vector;
pub use vector::{FeatureRecord, FieldSpec, VectorDataset, same_crs};

pub mod postgis;
pub use postgis::DatabaseConnection;
