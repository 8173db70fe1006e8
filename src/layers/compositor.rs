//! Derives what to draw from the current registry state and hands it to an
//! external display surface.
//!
//! The composition rule is "topmost wins": scanning top-to-bottom, the first
//! layer that is visible is drawn and the scan stops. Nothing below it is
//! composited. When no layer is visible the surface is left cleared.
use ndarray::Array2;

use crate::io::VectorDataset;
use crate::layers::store::{Layer, LayerPayload, LayerStore};

/// Min/max normalization over the finite values of a grid, recomputed fresh
/// for every draw rather than fixed across redraws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub min: f32,
    pub max: f32,
}

impl Normalization {
    pub fn from_grid(grid: &Array2<f32>) -> Self {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in grid.iter() {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
            }
        }
        if min > max {
            // all-nodata grid
            return Normalization { min: 0.0, max: 0.0 };
        }
        Normalization { min, max }
    }

    /// Map a value into [0, 1]. Non-finite values pass through untouched so
    /// the surface can decide how to paint them.
    pub fn apply(&self, v: f32) -> f32 {
        if !v.is_finite() {
            return v;
        }
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((v - self.min) / span).clamp(0.0, 1.0)
    }
}

/// Continuous color ramp with linear interpolation between stops.
#[derive(Debug, Clone)]
pub struct ColorRamp {
    stops: Vec<(f32, [u8; 3])>,
}

impl ColorRamp {
    /// The ramp the application legend shows: red, yellow, green, blue.
    pub fn spectral() -> Self {
        ColorRamp {
            stops: vec![
                (0.0, [255, 0, 0]),
                (0.33, [255, 255, 0]),
                (0.66, [0, 255, 0]),
                (1.0, [0, 0, 255]),
            ],
        }
    }

    pub fn color_at(&self, t: f32) -> [u8; 3] {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mut prev = self.stops[0];
        for &stop in &self.stops {
            if t <= stop.0 {
                let span = stop.0 - prev.0;
                if span <= 0.0 {
                    return stop.1;
                }
                let f = (t - prev.0) / span;
                let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * f).round() as u8;
                return [
                    lerp(prev.1[0], stop.1[0]),
                    lerp(prev.1[1], stop.1[1]),
                    lerp(prev.1[2], stop.1[2]),
                ];
            }
            prev = stop;
        }
        self.stops[self.stops.len() - 1].1
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::spectral()
    }
}

/// Value-to-color legend shown next to a raster draw. Owned by the
/// compositor and updated in place on every redraw instead of recreated.
#[derive(Debug, Clone)]
pub struct Legend {
    pub entries: Vec<(f32, [u8; 3])>,
    pub label: &'static str,
}

/// Fixed vector styling: outline color, unfilled interior.
#[derive(Debug, Clone, Copy)]
pub struct VectorStyle {
    pub outline: [u8; 3],
    pub fill: Option<[u8; 3]>,
}

impl Default for VectorStyle {
    fn default() -> Self {
        VectorStyle {
            outline: [0, 0, 255],
            fill: None,
        }
    }
}

/// The external drawing surface boundary.
///
/// The surface decides how to rasterize; the contract it must honor is
/// equal-scale aspect (one map unit in X spans the same screen distance as
/// one in Y) and no axis decoration.
pub trait DisplaySurface {
    fn clear(&mut self);
    fn draw_raster(&mut self, grid: &Array2<f32>, norm: &Normalization, ramp: &ColorRamp);
    fn draw_vector(&mut self, dataset: &VectorDataset, style: &VectorStyle);
    fn update_legend(&mut self, legend: &Legend);
}

/// A surface that draws nowhere. Used by the CLI and by tests that only
/// exercise registry semantics.
#[derive(Default)]
pub struct NullSurface;

impl DisplaySurface for NullSurface {
    fn clear(&mut self) {}
    fn draw_raster(&mut self, _: &Array2<f32>, _: &Normalization, _: &ColorRamp) {}
    fn draw_vector(&mut self, _: &VectorDataset, _: &VectorStyle) {}
    fn update_legend(&mut self, _: &Legend) {}
}

pub struct RenderCompositor {
    ramp: ColorRamp,
    style: VectorStyle,
    legend: Legend,
    legend_ticks: usize,
}

impl Default for RenderCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderCompositor {
    pub fn new() -> Self {
        Self::with_legend_ticks(5)
    }

    pub fn with_legend_ticks(legend_ticks: usize) -> Self {
        RenderCompositor {
            ramp: ColorRamp::default(),
            style: VectorStyle::default(),
            legend: Legend {
                entries: Vec::new(),
                label: "Value",
            },
            legend_ticks,
        }
    }

    /// The layer the composition rule selects: the first visible one walking
    /// top-to-bottom, or `None` when nothing is visible.
    pub fn select<'a>(&self, store: &'a LayerStore) -> Option<&'a Layer> {
        store.ordered_top_to_bottom().find(|layer| layer.visible)
    }

    /// Recompute the displayed result from the current registry state.
    pub fn render(&mut self, store: &LayerStore, surface: &mut dyn DisplaySurface) {
        surface.clear();
        let Some(layer) = self.select(store) else {
            return;
        };
        match &layer.payload {
            LayerPayload::Raster(dataset) => {
                let norm = Normalization::from_grid(&dataset.grid);
                self.refresh_legend(&norm);
                surface.draw_raster(&dataset.grid, &norm, &self.ramp);
                surface.update_legend(&self.legend);
            }
            LayerPayload::Vector(dataset) => {
                surface.draw_vector(dataset, &self.style);
            }
        }
    }

    fn refresh_legend(&mut self, norm: &Normalization) {
        self.legend.entries.clear();
        let ticks = self.legend_ticks.max(2);
        for i in 0..ticks {
            let t = i as f32 / (ticks - 1) as f32;
            let value = norm.min + t * (norm.max - norm.min);
            self.legend.entries.push((value, self.ramp.color_at(t)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{GeoProfile, RasterDataset};
    use ndarray::array;

    fn raster(values: Array2<f32>) -> LayerPayload {
        let (rows, cols) = values.dim();
        LayerPayload::Raster(RasterDataset {
            grid: values,
            profile: GeoProfile {
                width: cols,
                height: rows,
                geotransform: [0.0, 1.0, 0.0, 0.0, 0.0, -1.0],
                projection: String::new(),
                nodata: None,
            },
        })
    }

    #[test]
    fn normalization_uses_finite_values_only() {
        let grid = array![[1.0, f32::NAN], [3.0, f32::INFINITY]];
        let norm = Normalization::from_grid(&grid);
        assert_eq!(norm.min, 1.0);
        assert_eq!(norm.max, 3.0);
        assert_eq!(norm.apply(1.0), 0.0);
        assert_eq!(norm.apply(3.0), 1.0);
        assert_eq!(norm.apply(2.0), 0.5);
        assert!(norm.apply(f32::NAN).is_nan());
    }

    #[test]
    fn degenerate_normalization_maps_to_zero() {
        let grid = array![[7.0, 7.0], [7.0, 7.0]];
        let norm = Normalization::from_grid(&grid);
        assert_eq!(norm.apply(7.0), 0.0);
    }

    #[test]
    fn ramp_endpoints_match_stops() {
        let ramp = ColorRamp::spectral();
        assert_eq!(ramp.color_at(0.0), [255, 0, 0]);
        assert_eq!(ramp.color_at(1.0), [0, 0, 255]);
        // out-of-range input clamps
        assert_eq!(ramp.color_at(2.0), [0, 0, 255]);
    }

    #[test]
    fn selects_topmost_visible_layer() {
        let mut store = LayerStore::new();
        store.add("bottom", raster(array![[1.0]]));
        store.add("middle", raster(array![[2.0]]));
        store.add("top", raster(array![[3.0]]));
        let compositor = RenderCompositor::new();
        assert_eq!(compositor.select(&store).unwrap().name, "top");

        store.set_visible("top", false);
        assert_eq!(compositor.select(&store).unwrap().name, "middle");

        store.set_visible("middle", false);
        store.set_visible("bottom", false);
        assert!(compositor.select(&store).is_none());
    }

    #[test]
    fn legend_is_updated_in_place() {
        let mut compositor = RenderCompositor::new();
        let norm = Normalization { min: 0.0, max: 10.0 };
        compositor.refresh_legend(&norm);
        let first: Vec<_> = compositor.legend.entries.clone();
        assert_eq!(first.len(), 5);
        assert_eq!(first[0].0, 0.0);
        assert_eq!(first[4].0, 10.0);

        let norm = Normalization { min: -1.0, max: 1.0 };
        compositor.refresh_legend(&norm);
        assert_eq!(compositor.legend.entries.len(), 5);
        assert_eq!(compositor.legend.entries[0].0, -1.0);
    }
}
