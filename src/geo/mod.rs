//! Geographic layer system for the map canvas.
//!
//! This module loads `.geojson` feature collections, projects their
//! coordinates to canvas space, and renders them with per-file styles.

mod layer;
pub mod projection;
mod renderer;

pub use layer::{load_layers, GeoFeature, GeoLayer, LayerSet, Ring, LAYER_SUFFIX};
pub use projection::CanvasScale;
pub use renderer::{render_geo_layers, render_map};
