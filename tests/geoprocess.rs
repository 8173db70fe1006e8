//! File-in/file-out properties of the geoprocessing and algebra engines:
//! buffer geometry, clip/intersect behavior on disjoint and identical
//! inputs, and the no-partial-state guarantees on failure.
//!
//! These tests exercise GDAL and need its runtime available, like the crate
//! itself.

use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use gdal::spatial_ref::SpatialRef;
use gdal::vector::{Geometry, OGRFieldType, OGRwkbGeometryType};
use ndarray::{Array2, array};
use tempfile::TempDir;

use geostack::core::{algebra, geoprocess};
use geostack::{
    DerivedIndex, FeatureRecord, FieldSpec, GeoProfile, GisSession, NullSurface, VectorDataset,
    write_raster,
};

fn vector_from_wkts(wkts: &[&str], geometry_type: OGRwkbGeometryType::Type) -> VectorDataset {
    let features = wkts
        .iter()
        .enumerate()
        .map(|(i, wkt)| FeatureRecord {
            geometry: Geometry::from_wkt(wkt).unwrap(),
            attributes: vec![Some(gdal::vector::FieldValue::IntegerValue(i as i32))],
        })
        .collect();
    VectorDataset {
        schema: vec![FieldSpec {
            name: "id".to_string(),
            field_type: OGRFieldType::OFTInteger,
        }],
        features,
        crs: Some(SpatialRef::from_epsg(32630).unwrap()),
        geometry_type,
    }
}

fn shapefile_with(dir: &Path, name: &str, wkts: &[&str]) -> PathBuf {
    let ty = if wkts[0].starts_with("POINT") {
        OGRwkbGeometryType::wkbPoint
    } else if wkts[0].starts_with("LINESTRING") {
        OGRwkbGeometryType::wkbLineString
    } else {
        OGRwkbGeometryType::wkbPolygon
    };
    let path = dir.join(name);
    vector_from_wkts(wkts, ty).write(&path).unwrap();
    path
}

const UNIT_SQUARE: &str = "POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))";
const FAR_SQUARE: &str = "POLYGON ((100 100, 101 100, 101 101, 100 101, 100 100))";

#[test]
fn buffered_point_area_approximates_circle() {
    let dir = TempDir::new().unwrap();
    let input = shapefile_with(dir.path(), "wells.shp", &["POINT (10 20)"]);
    let output = dir.path().join("wells_buf.shp");

    let distance = 5.0;
    let result = geoprocess::buffer(&input, &output, distance, 30).unwrap();
    assert_eq!(result.feature_count(), 1);
    let area = result.features[0].geometry.area();
    let expected = PI * distance * distance;
    let relative_error = (area - expected).abs() / expected;
    assert!(
        relative_error < 0.01,
        "buffer area {area} too far from {expected}"
    );
    assert!(output.exists());
}

#[test]
fn buffer_rejects_non_finite_distance() {
    let dir = TempDir::new().unwrap();
    let input = shapefile_with(dir.path(), "wells.shp", &["POINT (0 0)"]);
    let output = dir.path().join("out.shp");
    let err = geoprocess::buffer(&input, &output, f64::NAN, 30).unwrap_err();
    assert!(matches!(err, geostack::Error::InvalidParameter { .. }));
    assert!(!output.exists());
}

#[test]
fn clip_outside_boundary_yields_empty_set() {
    let dir = TempDir::new().unwrap();
    let input = shapefile_with(dir.path(), "input.shp", &[UNIT_SQUARE]);
    let mask = shapefile_with(dir.path(), "mask.shp", &[FAR_SQUARE]);
    let output = dir.path().join("clipped.shp");

    let result = geoprocess::clip(&input, &mask, &output).unwrap();
    // empty output is a success, not an error
    assert_eq!(result.feature_count(), 0);
    assert!(output.exists());
}

#[test]
fn clip_truncates_to_boundary_and_keeps_attributes() {
    let dir = TempDir::new().unwrap();
    let big = "POLYGON ((0 0, 4 0, 4 4, 0 4, 0 0))";
    let input = shapefile_with(dir.path(), "input.shp", &[big]);
    let mask = shapefile_with(dir.path(), "mask.shp", &[UNIT_SQUARE]);
    let output = dir.path().join("clipped.shp");

    let result = geoprocess::clip(&input, &mask, &output).unwrap();
    assert_eq!(result.feature_count(), 1);
    assert!((result.features[0].geometry.area() - 1.0).abs() < 1e-9);
    assert_eq!(result.features[0].attributes.len(), 1);
}

#[test]
fn intersect_disjoint_inputs_yields_no_features() {
    let dir = TempDir::new().unwrap();
    let a = shapefile_with(dir.path(), "a.shp", &[UNIT_SQUARE]);
    let b = shapefile_with(dir.path(), "b.shp", &[FAR_SQUARE]);
    let output = dir.path().join("out.shp");

    let result = geoprocess::intersect(&a, &b, &output).unwrap();
    assert_eq!(result.feature_count(), 0);
}

#[test]
fn intersect_identical_inputs_yields_the_same_geometry() {
    let dir = TempDir::new().unwrap();
    let a = shapefile_with(dir.path(), "a.shp", &[UNIT_SQUARE]);
    let b = shapefile_with(dir.path(), "b.shp", &[UNIT_SQUARE]);
    let output = dir.path().join("out.shp");

    let result = geoprocess::intersect(&a, &b, &output).unwrap();
    assert_eq!(result.feature_count(), 1);
    assert!((result.features[0].geometry.area() - 1.0).abs() < 1e-9);
    // schemas of both inputs combined, collision suffixed
    let names: Vec<&str> = result.schema.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["id", "id_2"]);
    assert_eq!(result.features[0].attributes.len(), 2);
}

#[test]
fn intersect_of_crossing_lines_writes_point_output() {
    let dir = TempDir::new().unwrap();
    let a = shapefile_with(dir.path(), "a.shp", &["LINESTRING (0 0, 2 2)"]);
    let b = shapefile_with(dir.path(), "b.shp", &["LINESTRING (0 2, 2 0)"]);
    let output = dir.path().join("crossings.shp");

    // line inputs intersect in a lower-dimensional geometry; the output
    // layer must still write cleanly
    let result = geoprocess::intersect(&a, &b, &output).unwrap();
    assert_eq!(result.feature_count(), 1);
    assert_eq!(
        result.features[0].geometry.geometry_type(),
        OGRwkbGeometryType::wkbPoint
    );
    let reread = VectorDataset::open(&output).unwrap();
    assert_eq!(reread.feature_count(), 1);
}

fn profile(cols: usize, rows: usize) -> GeoProfile {
    GeoProfile {
        width: cols,
        height: rows,
        geotransform: [400000.0, 30.0, 0.0, 5000000.0, 0.0, -30.0],
        projection: String::new(),
        nodata: None,
    }
}

fn raster_file(dir: &Path, name: &str, grid: Array2<f32>) -> PathBuf {
    let (rows, cols) = grid.dim();
    let path = dir.join(name);
    write_raster(&path, &grid, &profile(cols, rows)).unwrap();
    path
}

#[test]
fn derived_index_round_trips_through_a_file() {
    let dir = TempDir::new().unwrap();
    let input = raster_file(dir.path(), "scene.tif", array![[2.0f32, 4.0], [6.0, 8.0]]);
    let output = dir.path().join("lst.tif");

    let result = algebra::compute_index(&input, DerivedIndex::Lst, 1, None, &output).unwrap();
    assert!((result.grid[[0, 0]] - (2.0 * 0.00341802 - 124.15)).abs() < 1e-4);
    assert_eq!(result.profile.width, 2);
    assert_eq!(result.profile.geotransform, profile(2, 2).geotransform);

    // the persisted file reads back the same values
    let reread = geostack::RasterReader::open(&output).unwrap().read_band(1).unwrap();
    for (a, b) in reread.iter().zip(result.grid.iter()) {
        assert!((a - b).abs() < 1e-5);
    }
}

#[test]
fn out_of_range_band_is_an_invalid_parameter() {
    let dir = TempDir::new().unwrap();
    let input = raster_file(dir.path(), "scene.tif", array![[1.0f32]]);
    let output = dir.path().join("out.tif");
    let err =
        algebra::compute_index(&input, DerivedIndex::Ndvi, 1, Some(99), &output).unwrap_err();
    assert!(matches!(err, geostack::Error::InvalidParameter { .. }));
    assert!(!output.exists());
}

#[test]
fn overlay_shape_mismatch_is_rejected_before_writing() {
    let dir = TempDir::new().unwrap();
    let lst = raster_file(dir.path(), "lst.tif", Array2::zeros((2, 2)));
    let ndvi = raster_file(dir.path(), "ndvi.tif", Array2::zeros((3, 3)));
    let ndbi = raster_file(dir.path(), "ndbi.tif", Array2::zeros((2, 2)));
    let output = dir.path().join("uhi.tif");

    let mut session = GisSession::new(Box::new(NullSurface));
    let err = session.overlay(&lst, &ndvi, &ndbi, &output).unwrap_err();
    assert!(matches!(err, geostack::Error::GeometryMismatch(_)));
    assert!(!output.exists());
    assert!(session.store().is_empty());
}

#[test]
fn failed_write_leaves_the_registry_unchanged() {
    let dir = TempDir::new().unwrap();
    let input = raster_file(dir.path(), "scene.tif", array![[1.0f32, 2.0]]);
    let unwritable = dir.path().join("no_such_dir").join("out.tif");

    let mut session = GisSession::new(Box::new(NullSurface));
    session
        .add_raster_layer("existing", geostack::RasterReader::open(&input).unwrap().read_dataset().unwrap());
    let err = session.lst(&input, 1, &unwritable).unwrap_err();
    assert!(matches!(err, geostack::Error::Persistence { .. }));
    // last-good state: the one pre-existing layer, nothing else
    assert_eq!(session.store().len(), 1);
    assert!(session.store().contains("existing"));
}

#[test]
fn session_registers_outputs_under_the_file_name() {
    let dir = TempDir::new().unwrap();
    let input = raster_file(dir.path(), "scene.tif", array![[2.0f32, 4.0]]);
    let output = dir.path().join("lst.tif");

    let mut session = GisSession::new(Box::new(NullSurface));
    session.lst(&input, 1, &output).unwrap();
    assert!(session.store().contains("lst.tif"));
}
