//! The authoritative, ordered, named registry of loaded layers.
//!
//! Ordering is an explicit property of the store: index 0 is the bottom of
//! the stack, the last index is the top, and newly added layers go on top.
//! Names are the unique key; adding under an existing name replaces that
//! entry and moves it to the top without disturbing the relative order of
//! the other layers.
use crate::io::{RasterDataset, VectorDataset};
use crate::types::LayerKind;

/// Dataset payload of a layer. The store exclusively owns the payload once
/// the layer is added.
pub enum LayerPayload {
    Raster(RasterDataset),
    Vector(VectorDataset),
}

impl LayerPayload {
    pub fn kind(&self) -> LayerKind {
        match self {
            LayerPayload::Raster(_) => LayerKind::Raster,
            LayerPayload::Vector(_) => LayerKind::Vector,
        }
    }
}

/// A named, visibility-toggled registry entry wrapping one dataset.
pub struct Layer {
    pub name: String,
    pub payload: LayerPayload,
    pub visible: bool,
}

/// Ordered, named layer registry. Bottom of the stack first.
#[derive(Default)]
pub struct LayerStore {
    layers: Vec<Layer>,
}

impl LayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the named layer at the top of the order, visible.
    ///
    /// An existing entry under the same name is discarded; the remaining
    /// layers keep their relative order.
    pub fn add(&mut self, name: impl Into<String>, payload: LayerPayload) {
        let name = name.into();
        self.layers.retain(|layer| layer.name != name);
        self.layers.push(Layer {
            name,
            payload,
            visible: true,
        });
    }

    /// Remove the named layer; no-op if absent.
    pub fn remove(&mut self, name: &str) {
        self.layers.retain(|layer| layer.name != name);
    }

    /// Toggle visibility of the named layer; no-op if absent.
    pub fn set_visible(&mut self, name: &str, visible: bool) {
        if let Some(layer) = self.layers.iter_mut().find(|layer| layer.name == name) {
            layer.visible = visible;
        }
    }

    /// Remove all layers (new session).
    pub fn clear(&mut self) {
        self.layers.clear();
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.layers.iter().any(|layer| layer.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.name == name)
    }

    /// Read-only view in top-to-bottom order (most recently added first).
    /// This is the order the compositor scans.
    pub fn ordered_top_to_bottom(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().rev()
    }
}
