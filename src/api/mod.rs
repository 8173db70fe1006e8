//! High-level session API: one [`GisSession`] owns the layer registry, the
//! compositor, and the display surface, and keeps the displayed result in
//! step with every registry mutation.
//!
//! Every geoprocessing entry point follows the same contract: read the
//! inputs, compute, persist the output file, and only then register the
//! result as a new layer. A failure at any stage returns the error and
//! leaves both the registry and the display in their last-good state.
use std::path::Path;

use tracing::info;

use crate::core::algebra;
use crate::core::geoprocess;
use crate::core::params::ProcessingOptions;
use crate::error::{Error, Result};
use crate::io::{
    DatabaseConnection, RasterDataset, RasterReader, VectorDataset,
};
use crate::layers::{DisplaySurface, LayerPayload, LayerStore, RenderCompositor};
use crate::types::{DataFormat, DerivedIndex, LayerKind};

/// A single-user GIS session: layer registry, compositor, display surface.
///
/// Single-threaded by design; every operation runs to completion on the
/// calling thread, and the surface never reflects a stale registry state
/// after a mutating call returns.
pub struct GisSession {
    store: LayerStore,
    compositor: RenderCompositor,
    surface: Box<dyn DisplaySurface>,
    options: ProcessingOptions,
}

impl GisSession {
    pub fn new(surface: Box<dyn DisplaySurface>) -> Self {
        Self::with_options(surface, ProcessingOptions::default())
    }

    pub fn with_options(surface: Box<dyn DisplaySurface>, options: ProcessingOptions) -> Self {
        GisSession {
            store: LayerStore::new(),
            compositor: RenderCompositor::with_legend_ticks(options.legend_ticks),
            surface,
            options,
        }
    }

    /// Read-only view of the registry.
    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    /// Load a dataset file and register it as a layer named after the file.
    ///
    /// The format is detected from the extension; anything that is neither a
    /// raster container nor a shapefile fails with `UnsupportedFormat`.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        let format = DataFormat::from_path(path).ok_or(Error::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        match format.kind() {
            LayerKind::Raster => {
                let dataset = RasterReader::open(path)?.read_dataset()?;
                self.register(path, LayerPayload::Raster(dataset));
            }
            LayerKind::Vector => {
                let dataset = VectorDataset::open(path)?;
                self.register(path, LayerPayload::Vector(dataset));
            }
        }
        Ok(())
    }

    /// Register an already-loaded raster under an explicit name.
    pub fn add_raster_layer(&mut self, name: impl Into<String>, dataset: RasterDataset) {
        self.store.add(name, LayerPayload::Raster(dataset));
        self.refresh();
    }

    /// Register an already-loaded feature collection under an explicit name.
    pub fn add_vector_layer(&mut self, name: impl Into<String>, dataset: VectorDataset) {
        self.store.add(name, LayerPayload::Vector(dataset));
        self.refresh();
    }

    pub fn remove_layer(&mut self, name: &str) {
        self.store.remove(name);
        self.refresh();
    }

    pub fn set_layer_visible(&mut self, name: &str, visible: bool) {
        self.store.set_visible(name, visible);
        self.refresh();
    }

    /// Discard every layer and clear the display (new session).
    pub fn new_session(&mut self) {
        self.store.clear();
        self.refresh();
        info!("session cleared");
    }

    /// Compute a derived index (NDVI, NDBI, LST) from bands of `input`,
    /// persist it to `output`, and register it as a new raster layer.
    pub fn derive_index(
        &mut self,
        input: &Path,
        index: DerivedIndex,
        band1: usize,
        band2: Option<usize>,
        output: &Path,
    ) -> Result<()> {
        let dataset = algebra::compute_index(input, index, band1, band2, output)?;
        self.register(output, LayerPayload::Raster(dataset));
        Ok(())
    }

    pub fn ndvi(&mut self, input: &Path, nir: usize, red: usize, output: &Path) -> Result<()> {
        self.derive_index(input, DerivedIndex::Ndvi, nir, Some(red), output)
    }

    pub fn ndbi(&mut self, input: &Path, swir: usize, nir: usize, output: &Path) -> Result<()> {
        self.derive_index(input, DerivedIndex::Ndbi, swir, Some(nir), output)
    }

    pub fn lst(&mut self, input: &Path, thermal: usize, output: &Path) -> Result<()> {
        self.derive_index(input, DerivedIndex::Lst, thermal, None, output)
    }

    /// UHI overlay of three already-derived index rasters.
    pub fn overlay(
        &mut self,
        lst: &Path,
        ndvi: &Path,
        ndbi: &Path,
        output: &Path,
    ) -> Result<()> {
        let dataset = algebra::compute_overlay(lst, ndvi, ndbi, output)?;
        self.register(output, LayerPayload::Raster(dataset));
        Ok(())
    }

    /// Buffer every feature of `input` by `distance` map units.
    pub fn buffer(&mut self, input: &Path, output: &Path, distance: f64) -> Result<()> {
        let dataset = geoprocess::buffer(input, output, distance, self.options.buffer_segments)?;
        self.register(output, LayerPayload::Vector(dataset));
        Ok(())
    }

    /// Clip `input` to the boundary of `clip`.
    pub fn clip(&mut self, input: &Path, clip: &Path, output: &Path) -> Result<()> {
        let dataset = geoprocess::clip(input, clip, output)?;
        self.register(output, LayerPayload::Vector(dataset));
        Ok(())
    }

    /// Intersect two feature collections.
    pub fn intersect(&mut self, first: &Path, second: &Path, output: &Path) -> Result<()> {
        let dataset = geoprocess::intersect(first, second, output)?;
        self.register(output, LayerPayload::Vector(dataset));
        Ok(())
    }

    /// Import a PostGIS table as a vector layer named after the table.
    pub fn import_from_database(
        &mut self,
        connection: &DatabaseConnection,
        table: &str,
    ) -> Result<()> {
        let dataset = connection.import_table(table)?;
        self.store.add(table, LayerPayload::Vector(dataset));
        self.refresh();
        Ok(())
    }

    fn register(&mut self, path: &Path, payload: LayerPayload) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        info!("layer registered: {name}");
        self.store.add(name, payload);
        self.refresh();
    }

    fn refresh(&mut self) {
        self.compositor.render(&self.store, self.surface.as_mut());
    }
}
