//! Shared types and enums used across GEOSTACK.
//! Includes `LayerKind`, the closed `DerivedIndex` operation set, and
//! extension-based `DataFormat` detection for incoming dataset files.
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Kind of dataset a layer wraps.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum LayerKind {
    Raster,
    Vector,
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerKind::Raster => write!(f, "Raster"),
            LayerKind::Vector => write!(f, "Vector"),
        }
    }
}

/// The closed set of derived-index operations the algebra engine supports.
///
/// Each is a fixed formula over one or two bands of the same source raster;
/// there is no general band-math expression language.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum DerivedIndex {
    /// Normalized difference vegetation index: (nir - red) / (nir + red)
    Ndvi,
    /// Normalized difference built-up index: (swir - nir) / (swir + nir)
    Ndbi,
    /// Land surface temperature from a thermal band, in degrees Celsius
    Lst,
}

impl DerivedIndex {
    /// Whether the operation consumes a second band.
    pub fn needs_second_band(&self) -> bool {
        !matches!(self, DerivedIndex::Lst)
    }
}

impl std::fmt::Display for DerivedIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DerivedIndex::Ndvi => write!(f, "NDVI"),
            DerivedIndex::Ndbi => write!(f, "NDBI"),
            DerivedIndex::Lst => write!(f, "LST"),
        }
    }
}

/// File-extension based dataset format detection.
///
/// Mirrors the open-file filter of the desktop application: `.tif`, `.tiff`
/// and `.img` are raster containers, `.shp` is a vector dataset, anything
/// else is unsupported.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DataFormat {
    GeoTiff,
    ErdasImg,
    Shapefile,
}

impl DataFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "tif" | "tiff" => Some(DataFormat::GeoTiff),
            "img" => Some(DataFormat::ErdasImg),
            "shp" => Some(DataFormat::Shapefile),
            _ => None,
        }
    }

    pub fn kind(&self) -> LayerKind {
        match self {
            DataFormat::GeoTiff | DataFormat::ErdasImg => LayerKind::Raster,
            DataFormat::Shapefile => LayerKind::Vector,
        }
    }
}
