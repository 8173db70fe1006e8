//! Raster band-algebra engine: the fixed derived-index operations (NDVI,
//! NDBI, LST) and the UHI overlay, computed whole-raster in memory.
//!
//! Division follows IEEE float semantics: where `a + b` is zero the
//! normalized-difference result is infinite or NaN, never an error. The
//! output profile is the primary input's profile; only the dtype changes
//! (Float32).
use std::path::Path;

use ndarray::{Array2, Zip};
use tracing::info;

use crate::error::{Error, Result};
use crate::io::{RasterDataset, RasterReader, write_raster};
use crate::types::DerivedIndex;

impl DerivedIndex {
    /// Apply the formula to one pixel. `b` is ignored by LST.
    fn pixel(&self, a: f32, b: f32) -> f32 {
        match self {
            DerivedIndex::Ndvi | DerivedIndex::Ndbi => (a - b) / (a + b),
            DerivedIndex::Lst => a * 0.003_418_02 + 149.0 - 273.15,
        }
    }

    /// Apply the formula element-wise over a whole band pair.
    pub fn apply(&self, a: &Array2<f32>, b: Option<&Array2<f32>>) -> Array2<f32> {
        match (self, b) {
            (DerivedIndex::Lst, _) => a.mapv(|v| self.pixel(v, 0.0)),
            (_, Some(b)) => {
                let mut out = Array2::zeros(a.dim());
                Zip::from(a)
                    .and(b)
                    .and(&mut out)
                    .for_each(|&a, &b, out| *out = self.pixel(a, b));
                out
            }
            // callers validate band arity before getting here
            (_, None) => a.mapv(|v| self.pixel(v, 0.0)),
        }
    }
}

/// UHI overlay over three already-derived single-band grids:
/// `lst - (ndvi + ndbi) / 2`.
pub fn overlay(
    lst: &Array2<f32>,
    ndvi: &Array2<f32>,
    ndbi: &Array2<f32>,
) -> Result<Array2<f32>> {
    if lst.dim() != ndvi.dim() || lst.dim() != ndbi.dim() {
        return Err(Error::GeometryMismatch(format!(
            "overlay inputs must share a grid shape: lst {:?}, ndvi {:?}, ndbi {:?}",
            lst.dim(),
            ndvi.dim(),
            ndbi.dim()
        )));
    }
    let mut out = Array2::zeros(lst.dim());
    Zip::from(lst)
        .and(ndvi)
        .and(ndbi)
        .and(&mut out)
        .for_each(|&lst, &ndvi, &ndbi, out| *out = lst - (ndvi + ndbi) / 2.0);
    Ok(out)
}

/// Compute a derived index from one or two bands of `input` and write the
/// Float32 result to `output`.
///
/// Bands are 1-indexed within the same source file. Returns the in-memory
/// result so the caller can register it as a layer; nothing is registered
/// here, and on any failure the output is simply not produced.
pub fn compute_index(
    input: &Path,
    index: DerivedIndex,
    band1: usize,
    band2: Option<usize>,
    output: &Path,
) -> Result<RasterDataset> {
    let reader = RasterReader::open(input)?;
    let a = reader.read_band(band1)?;
    let b = if index.needs_second_band() {
        let band2 = band2.ok_or(Error::InvalidParameter {
            param: "band2",
            value: format!("required for {index}"),
        })?;
        Some(reader.read_band(band2)?)
    } else {
        None
    };
    let grid = index.apply(&a, b.as_ref());
    let profile = reader.profile().clone();
    write_raster(output, &grid, &profile)?;
    info!("{index} written to {}", output.display());
    Ok(RasterDataset { grid, profile })
}

/// Compute the UHI overlay from three already-computed index rasters and
/// write the Float32 result to `output`, carrying the LST input's profile.
pub fn compute_overlay(
    lst_path: &Path,
    ndvi_path: &Path,
    ndbi_path: &Path,
    output: &Path,
) -> Result<RasterDataset> {
    let lst_reader = RasterReader::open(lst_path)?;
    let lst = lst_reader.read_band(1)?;
    let ndvi = RasterReader::open(ndvi_path)?.read_band(1)?;
    let ndbi = RasterReader::open(ndbi_path)?.read_band(1)?;
    let grid = overlay(&lst, &ndvi, &ndbi)?;
    let profile = lst_reader.profile().clone();
    write_raster(output, &grid, &profile)?;
    info!("UHI overlay written to {}", output.display());
    Ok(RasterDataset { grid, profile })
}
