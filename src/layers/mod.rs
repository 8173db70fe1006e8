//! Layer registry and rendering composition: the ordered, named
//! `LayerStore` and the `RenderCompositor` that derives what to draw from
//! its current order and visibility state.
pub mod store;
pub use store::{Layer, LayerPayload, LayerStore};

pub mod compositor;
pub use compositor::{
    ColorRamp, DisplaySurface, Legend, Normalization, NullSurface, RenderCompositor, VectorStyle,
};
