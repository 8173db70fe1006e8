#![doc = r#"
GEOSTACK — a desktop-GIS core for layered raster/vector analysis.

This crate provides the non-widget heart of a simple GIS application: an
ordered, named layer registry with visibility state, a "topmost wins"
rendering compositor, a raster band-algebra engine (NDVI, NDBI, LST, UHI
overlay), and a vector geoprocessing engine (buffer, clip, intersect). Every
geoprocessing operation persists its result to a file and re-enters it as a
layer. It can back a GUI, a CLI, or be embedded in other Rust applications.

Requirements
------------
- GDAL development headers and runtime available on your system.
- Rust 2024 edition toolchain.

Quick start: derive NDVI and stack it
-------------------------------------
```rust,no_run
use std::path::Path;
use geostack::{GisSession, NullSurface};

fn main() -> geostack::Result<()> {
    let mut session = GisSession::new(Box::new(NullSurface));
    session.open(Path::new("/data/scene.tif"))?;
    session.ndvi(
        Path::new("/data/scene.tif"),
        5, // NIR band
        4, // red band
        Path::new("/out/ndvi.tif"),
    )?;
    // ndvi.tif is now the topmost visible layer
    Ok(())
}
```

Vector geoprocessing
--------------------
```rust,no_run
use std::path::Path;
use geostack::{GisSession, NullSurface};

fn main() -> geostack::Result<()> {
    let mut session = GisSession::new(Box::new(NullSurface));
    session.buffer(
        Path::new("/data/wells.shp"),
        Path::new("/out/wells_500m.shp"),
        500.0,
    )?;
    session.clip(
        Path::new("/data/roads.shp"),
        Path::new("/data/district.shp"),
        Path::new("/out/roads_in_district.shp"),
    )?;
    Ok(())
}
```

Bring your own display
----------------------
Implement [`DisplaySurface`] to receive the composited result: either one
raster grid with a fresh min/max normalization, color ramp, and legend, or
one vector feature set with fixed styling, or a cleared display. The
compositor draws exactly the topmost visible layer.

Error handling
--------------
All public functions return `geostack::Result<T>`; match on
[`Error`](crate::Error) for the semantic failure kinds (`SourceNotFound`,
`UnsupportedFormat`, `InvalidParameter`, `GeometryMismatch`, `Processing`,
`Persistence`). A failed operation never leaves a half-registered layer.

Useful modules
--------------
- [`api`] — the high-level `GisSession` entry point.
- [`layers`] — `LayerStore` and `RenderCompositor`.
- [`core`] — band algebra and vector geoprocessing engines.
- [`io`] — GDAL raster/vector adapters and the PostGIS import boundary.
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod layers;
pub mod types;

// Curated public API surface
pub use api::GisSession;
pub use core::params::ProcessingOptions;
pub use error::{Error, Result};
pub use types::{DataFormat, DerivedIndex, LayerKind};

pub use io::{
    DatabaseConnection, FeatureRecord, FieldSpec, GeoProfile, RasterDataset, RasterReader,
    VectorDataset, write_raster,
};
pub use layers::{
    ColorRamp, DisplaySurface, Layer, LayerPayload, LayerStore, Legend, Normalization,
    NullSurface, RenderCompositor, VectorStyle,
};
