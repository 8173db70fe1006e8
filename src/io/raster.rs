//! GDAL-backed raster adapter: read single bands from a georeferenced
//! container (GeoTIFF/IMG) and write single-band Float32 outputs that carry
//! the georeferencing profile of their primary input.
use std::path::Path;

use gdal::raster::Buffer;
use gdal::{Dataset, DriverManager};
use ndarray::Array2;

use crate::error::{Error, Result};

/// Georeferencing metadata attached to a raster dataset.
///
/// Preserved verbatim when writing derived outputs; only the pixel dtype
/// changes (always Float32 for derived indices).
#[derive(Debug, Clone)]
pub struct GeoProfile {
    /// Width (pixels) of the raster
    pub width: usize,
    /// Height (lines) of the raster
    pub height: usize,
    /// Affine geotransform coefficients ([origin_x, pixel_width, rot_x, origin_y, rot_y, pixel_height])
    pub geotransform: [f64; 6],
    /// Projection in WKT format (or an EPSG code string)
    pub projection: String,
    /// Nodata value of band 1, if declared
    pub nodata: Option<f64>,
}

/// A single raster band held in memory together with its profile.
#[derive(Debug, Clone)]
pub struct RasterDataset {
    pub grid: Array2<f32>,
    pub profile: GeoProfile,
}

/// Reader over one raster file; bands are read on demand, one at a time.
pub struct RasterReader {
    dataset: Dataset,
    profile: GeoProfile,
    bands: usize,
}

impl RasterReader {
    /// Open a GDAL-supported raster dataset.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::SourceNotFound {
                path: path.to_path_buf(),
            });
        }
        let dataset = Dataset::open(path).map_err(|_| Error::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let (size_x, size_y) = dataset.raster_size();
        let bands = dataset.raster_count() as usize;
        if bands == 0 {
            return Err(Error::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
        let geotransform = match dataset.geo_transform() {
            Ok(gt) => gt,
            Err(_) => [0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        };
        let projection = dataset.projection();
        let nodata = dataset
            .rasterband(1)
            .map_err(Error::processing)?
            .no_data_value();
        Ok(RasterReader {
            dataset,
            profile: GeoProfile {
                width: size_x as usize,
                height: size_y as usize,
                geotransform,
                projection,
                nodata,
            },
            bands,
        })
    }

    pub fn profile(&self) -> &GeoProfile {
        &self.profile
    }

    pub fn band_count(&self) -> usize {
        self.bands
    }

    /// Read a single band (1-based index) as an f32 ndarray of shape (height, width).
    pub fn read_band(&self, index: usize) -> Result<Array2<f32>> {
        if index == 0 || index > self.bands {
            return Err(Error::InvalidParameter {
                param: "band",
                value: format!("{index} (file has {} bands)", self.bands),
            });
        }
        let band = self.dataset.rasterband(index).map_err(Error::processing)?;
        let window = (self.profile.width, self.profile.height);
        let buf = band
            .read_as::<f32>((0, 0), window, window, None)
            .map_err(Error::processing)?;
        let data_vec = buf.data().to_vec();
        Array2::from_shape_vec((self.profile.height, self.profile.width), data_vec).map_err(|_| {
            Error::Processing(format!(
                "band {index} returned a buffer that does not match {}x{}",
                self.profile.width, self.profile.height
            ))
        })
    }

    /// Read band 1 together with the profile, producing an owned dataset.
    pub fn read_dataset(&self) -> Result<RasterDataset> {
        Ok(RasterDataset {
            grid: self.read_band(1)?,
            profile: self.profile.clone(),
        })
    }
}

/// Write a single-band Float32 GeoTIFF carrying `profile`'s georeferencing.
///
/// The grid shape must agree with the profile dimensions; the write is
/// flushed before the handle drops so a successful return means the file is
/// fully on disk.
pub fn write_raster(output: &Path, grid: &Array2<f32>, profile: &GeoProfile) -> Result<()> {
    let (rows, cols) = grid.dim();
    if rows != profile.height || cols != profile.width {
        return Err(Error::GeometryMismatch(format!(
            "grid is {cols}x{rows} but profile says {}x{}",
            profile.width, profile.height
        )));
    }
    let driver =
        DriverManager::get_driver_by_name("GTiff").map_err(|e| Error::persistence(output, e))?;
    let mut ds = driver
        .create_with_band_type::<f32, _>(output, cols, rows, 1)
        .map_err(|e| Error::persistence(output, e))?;
    ds.set_geo_transform(&profile.geotransform)
        .map_err(|e| Error::persistence(output, e))?;
    if !profile.projection.is_empty() {
        ds.set_projection(&profile.projection)
            .map_err(|e| Error::persistence(output, e))?;
    }
    {
        let mut band = ds.rasterband(1).map_err(|e| Error::persistence(output, e))?;
        if profile.nodata.is_some() {
            band.set_no_data_value(profile.nodata)
                .map_err(|e| Error::persistence(output, e))?;
        }
        let data: Vec<f32> = grid.iter().copied().collect();
        let mut buf = Buffer::new((cols, rows), data);
        band.write((0, 0), (cols, rows), &mut buf)
            .map_err(|e| Error::persistence(output, e))?;
    }
    ds.flush_cache().map_err(|e| Error::persistence(output, e))?;
    Ok(())
}
