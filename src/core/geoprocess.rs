//! Vector geoprocessing engine: planar buffer, clip, and intersect over
//! shapefile-class feature collections.
//!
//! All three operations propagate the primary input's CRS unchanged and
//! perform no reprojection. Binary operations refuse inputs whose CRS tags
//! disagree rather than producing silently misaligned output.
use std::path::Path;

use gdal::vector::Geometry;
use tracing::info;

use crate::error::{Error, Result};
use crate::io::vector::{FeatureRecord, FieldSpec, VectorDataset, same_crs};

/// Replace every feature's geometry with its planar buffer of `distance`.
///
/// Attribute records are carried through untouched. `distance` must be a
/// finite number; `quad_segs` controls how many segments approximate a
/// quarter circle.
pub fn buffer(
    input: &Path,
    output: &Path,
    distance: f64,
    quad_segs: u32,
) -> Result<VectorDataset> {
    if !distance.is_finite() {
        return Err(Error::InvalidParameter {
            param: "distance",
            value: distance.to_string(),
        });
    }
    let source = VectorDataset::open(input)?;
    let mut features = Vec::with_capacity(source.feature_count());
    for record in &source.features {
        let buffered = record
            .geometry
            .buffer(distance, quad_segs)
            .map_err(Error::processing)?;
        features.push(FeatureRecord {
            geometry: buffered,
            attributes: record.attributes.clone(),
        });
    }
    let result = VectorDataset {
        schema: source.schema.clone(),
        features,
        crs: source.crs.clone(),
        geometry_type: gdal::vector::OGRwkbGeometryType::wkbPolygon,
    };
    result.write(output)?;
    info!(
        "buffer({distance}) wrote {} features to {}",
        result.feature_count(),
        output.display()
    );
    Ok(result)
}

/// Truncate the input's geometries to the clip layer's geometries.
///
/// Attributes of partially clipped features are retained; features entirely
/// outside the clip boundary are dropped. An empty result is a success.
pub fn clip(input: &Path, clip: &Path, output: &Path) -> Result<VectorDataset> {
    let source = VectorDataset::open(input)?;
    let mask = VectorDataset::open(clip)?;
    if !same_crs(source.crs.as_ref(), mask.crs.as_ref()) {
        return Err(Error::GeometryMismatch(
            "input and clip layers carry different coordinate reference systems".to_string(),
        ));
    }
    let boundary = union_all(&mask)?;
    let mut features = Vec::new();
    if let Some(boundary) = boundary {
        for record in &source.features {
            let clipped = intersection_of(&record.geometry, &boundary)?;
            if clipped.is_empty() {
                continue;
            }
            features.push(FeatureRecord {
                geometry: clipped,
                attributes: record.attributes.clone(),
            });
        }
    }
    let result = VectorDataset {
        schema: source.schema.clone(),
        features,
        crs: source.crs.clone(),
        geometry_type: source.geometry_type,
    };
    result.write(output)?;
    info!(
        "clip wrote {} features to {}",
        result.feature_count(),
        output.display()
    );
    Ok(result)
}

/// Pairwise geometric intersection of two feature collections.
///
/// Only feature pairs that actually intersect produce an output feature;
/// disjoint inputs yield an empty collection. The attribute schemas of both
/// inputs are combined, with colliding names from the second input suffixed.
pub fn intersect(first: &Path, second: &Path, output: &Path) -> Result<VectorDataset> {
    let a = VectorDataset::open(first)?;
    let b = VectorDataset::open(second)?;
    if !same_crs(a.crs.as_ref(), b.crs.as_ref()) {
        return Err(Error::GeometryMismatch(
            "intersect inputs carry different coordinate reference systems".to_string(),
        ));
    }
    let schema = combine_schemas(&a.schema, &b.schema);
    let mut features = Vec::new();
    for record_a in &a.features {
        for record_b in &b.features {
            let geometry = intersection_of(&record_a.geometry, &record_b.geometry)?;
            if geometry.is_empty() {
                continue;
            }
            let mut attributes = record_a.attributes.clone();
            attributes.extend(record_b.attributes.iter().cloned());
            features.push(FeatureRecord {
                geometry,
                attributes,
            });
        }
    }
    let result = VectorDataset {
        schema,
        features,
        crs: a.crs.clone(),
        // intersections of line or point inputs are lower-dimensional than
        // their sources; leave the layer type open and let the driver take
        // it from the first feature
        geometry_type: gdal::vector::OGRwkbGeometryType::wkbUnknown,
    };
    result.write(output)?;
    info!(
        "intersect wrote {} features to {}",
        result.feature_count(),
        output.display()
    );
    Ok(result)
}

/// Planar intersection of two geometries.
///
/// GDAL returns `None` only when the underlying overlay operation fails
/// (invalid topology and the like); disjoint geometries intersect to an
/// empty geometry. Failure is an error here, never a silently dropped
/// feature.
fn intersection_of(a: &Geometry, b: &Geometry) -> Result<Geometry> {
    a.intersection(b)
        .ok_or_else(|| Error::Processing("geometry intersection failed".to_string()))
}

/// Cascade-union every geometry of a dataset into one clip boundary.
fn union_all(dataset: &VectorDataset) -> Result<Option<Geometry>> {
    let mut merged: Option<Geometry> = None;
    for record in &dataset.features {
        merged = match merged {
            None => Some(record.geometry.clone()),
            Some(acc) => Some(acc.union(&record.geometry).ok_or_else(|| {
                Error::Processing("union of clip geometries failed".to_string())
            })?),
        };
    }
    Ok(merged)
}

/// Append the second schema to the first, renaming collisions with a `_2`
/// suffix (shapefile field names stay unique).
fn combine_schemas(a: &[FieldSpec], b: &[FieldSpec]) -> Vec<FieldSpec> {
    let mut combined = a.to_vec();
    for spec in b {
        let name = if combined.iter().any(|existing| existing.name == spec.name) {
            format!("{}_2", spec.name)
        } else {
            spec.name.clone()
        };
        combined.push(FieldSpec {
            name,
            field_type: spec.field_type,
        });
    }
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdal::vector::OGRFieldType;

    #[test]
    fn disjoint_intersection_is_empty_not_a_failure() {
        let a = Geometry::from_wkt("POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))").unwrap();
        let b = Geometry::from_wkt("POLYGON ((5 5, 6 5, 6 6, 5 6, 5 5))").unwrap();
        // disjoint pairs come back as Some(empty); only a failed overlay
        // operation maps to an error
        let result = intersection_of(&a, &b).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn overlapping_intersection_keeps_the_common_area() {
        let a = Geometry::from_wkt("POLYGON ((0 0, 2 0, 2 2, 0 2, 0 0))").unwrap();
        let b = Geometry::from_wkt("POLYGON ((1 1, 3 1, 3 3, 1 3, 1 1))").unwrap();
        let result = intersection_of(&a, &b).unwrap();
        assert!((result.area() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn combined_schema_suffixes_collisions() {
        let a = vec![
            FieldSpec {
                name: "id".to_string(),
                field_type: OGRFieldType::OFTInteger,
            },
            FieldSpec {
                name: "area".to_string(),
                field_type: OGRFieldType::OFTReal,
            },
        ];
        let b = vec![
            FieldSpec {
                name: "id".to_string(),
                field_type: OGRFieldType::OFTInteger,
            },
            FieldSpec {
                name: "name".to_string(),
                field_type: OGRFieldType::OFTString,
            },
        ];
        let combined = combine_schemas(&a, &b);
        let names: Vec<&str> = combined.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["id", "area", "id_2", "name"]);
    }
}
