//! GDAL/OGR-backed vector adapter: read a shapefile-class feature collection
//! into memory (schema, geometries, attributes, CRS) and write one back out.
use std::path::Path;

use gdal::spatial_ref::SpatialRef;
use gdal::vector::{Feature, FieldValue, Geometry, LayerAccess, LayerOptions, OGRwkbGeometryType};
use gdal::{Dataset, DriverManager};

use crate::error::{Error, Result};

/// One attribute column: name and OGR field type.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub field_type: gdal::vector::OGRFieldType::Type,
}

/// One feature: an owned geometry plus attribute values aligned to the
/// dataset schema (None where the source field was null).
#[derive(Debug)]
pub struct FeatureRecord {
    pub geometry: Geometry,
    pub attributes: Vec<Option<FieldValue>>,
}

/// An in-memory feature collection with its attribute schema and CRS tag.
#[derive(Debug)]
pub struct VectorDataset {
    pub schema: Vec<FieldSpec>,
    pub features: Vec<FeatureRecord>,
    pub crs: Option<SpatialRef>,
    /// Geometry type of the source layer, reused when writing back out
    pub geometry_type: OGRwkbGeometryType::Type,
}

impl VectorDataset {
    /// Read the first layer of a vector dataset file.
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
        let mut layer = dataset.layers().next().ok_or(Error::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        Self::from_layer(&mut layer)
    }

    /// Drain an OGR layer into an owned dataset.
    pub fn from_layer(layer: &mut gdal::vector::Layer) -> Result<Self> {
        let crs = layer.spatial_ref();
        let defn = layer.defn();
        let schema: Vec<FieldSpec> = defn
            .fields()
            .map(|f| FieldSpec {
                name: f.name(),
                field_type: f.field_type(),
            })
            .collect();
        let mut geometry_type = OGRwkbGeometryType::wkbUnknown;
        let mut features = Vec::new();
        for feature in layer.features() {
            let Some(geometry) = feature.geometry() else {
                continue;
            };
            if geometry_type == OGRwkbGeometryType::wkbUnknown {
                geometry_type = geometry.geometry_type();
            }
            let mut attributes = Vec::with_capacity(schema.len());
            for spec in &schema {
                let field_idx = feature.field_index(&spec.name).map_err(Error::processing)?;
                attributes.push(feature.field(field_idx).map_err(Error::processing)?);
            }
            features.push(FeatureRecord {
                geometry: geometry.clone(),
                attributes,
            });
        }
        Ok(VectorDataset {
            schema,
            features,
            crs,
            geometry_type,
        })
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Write the collection as an ESRI Shapefile, carrying schema and CRS.
    ///
    /// Flushed before the dataset handle drops; a successful return means
    /// the file set is fully on disk.
    pub fn write<P: AsRef<Path>>(&self, output: P) -> Result<()> {
        let output = output.as_ref();
        let driver = DriverManager::get_driver_by_name("ESRI Shapefile")
            .map_err(|e| Error::persistence(output, e))?;
        let mut dataset = driver
            .create_vector_only(output)
            .map_err(|e| Error::persistence(output, e))?;
        {
            let layer = dataset
                .create_layer(LayerOptions {
                    name: "layer",
                    srs: self.crs.as_ref(),
                    ty: self.geometry_type,
                    options: None,
                })
                .map_err(|e| Error::persistence(output, e))?;
            let fields_def: Vec<(&str, gdal::vector::OGRFieldType::Type)> = self
                .schema
                .iter()
                .map(|spec| (spec.name.as_str(), spec.field_type))
                .collect();
            layer
                .create_defn_fields(&fields_def)
                .map_err(|e| Error::persistence(output, e))?;
            for record in &self.features {
                let mut feature =
                    Feature::new(layer.defn()).map_err(|e| Error::persistence(output, e))?;
                feature
                    .set_geometry(record.geometry.clone())
                    .map_err(|e| Error::persistence(output, e))?;
                for (spec, value) in self.schema.iter().zip(record.attributes.iter()) {
                    let field_idx = feature
                        .field_index(&spec.name)
                        .map_err(|e| Error::persistence(output, e))?;
                    match value {
                        Some(value) => feature
                            .set_field(field_idx, value)
                            .map_err(|e| Error::persistence(output, e))?,
                        None => feature
                            .set_field_null(field_idx)
                            .map_err(|e| Error::persistence(output, e))?,
                    }
                }
                feature
                    .create(&layer)
                    .map_err(|e| Error::persistence(output, e))?;
            }
        }
        dataset
            .flush_cache()
            .map_err(|e| Error::persistence(output, e))?;
        Ok(())
    }
}

/// Whether two CRS tags refer to the same reference system.
///
/// Compared by authority code when both declare one, with a WKT string
/// comparison as the fallback. `None` on either side is treated as a match;
/// the engines only reject a mismatch when both inputs actually carry a CRS.
pub fn same_crs(a: Option<&SpatialRef>, b: Option<&SpatialRef>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => {
            if let (Ok(code_a), Ok(code_b)) = (a.auth_code(), b.auth_code()) {
                return code_a == code_b;
            }
            match (a.to_wkt(), b.to_wkt()) {
                (Ok(wkt_a), Ok(wkt_b)) => wkt_a == wkt_b,
                _ => true,
            }
        }
        _ => true,
    }
}
