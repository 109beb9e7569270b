//! Geographic layer rendering.
//!
//! Renders loaded layers onto a [`Canvas`] using each file's style.

use super::projection::{lon_lat_to_meters, CanvasScale};
use super::{GeoFeature, GeoLayer, LayerSet, Ring};
use crate::canvas::Canvas;
use crate::config::Config;
use crate::error::Result;
use crate::style::{Style, StyleTable, ZERO_STYLE};
use glam::DVec2;

/// Creates the canvas described by `config` and draws every layer on it.
pub fn render_map(config: &Config, layers: &LayerSet, styles: &StyleTable) -> Result<Canvas> {
    let mut canvas = Canvas::new(config.canvas_width, config.canvas_height)?;
    canvas.invert_y();
    canvas.set_rgba([1.0, 1.0, 1.0, 1.0]);
    canvas.clear();
    canvas.set_dash(&[]);

    let scale = CanvasScale::new(config.canvas_width, config.canvas_height);
    log::debug!("Mercator to canvas scale: {} x {}", scale.x, scale.y);

    render_geo_layers(&mut canvas, layers, styles, &scale);
    Ok(canvas)
}

/// Renders all layers in file-name order (back to front).
pub fn render_geo_layers(
    canvas: &mut Canvas,
    layers: &LayerSet,
    styles: &StyleTable,
    scale: &CanvasScale,
) {
    for (name, layer) in layers {
        let style = styles.get(name).unwrap_or_else(|| {
            log::debug!("No style for {}, drawing with zero-valued style", name);
            &ZERO_STYLE
        });
        log::info!("Rendering {}", name);
        render_layer(canvas, layer, style, scale);
    }
}

/// Renders a single geographic layer.
fn render_layer(canvas: &mut Canvas, layer: &GeoLayer, style: &Style, scale: &CanvasScale) {
    for feature in &layer.features {
        render_feature(canvas, feature, style, scale);
    }
}

/// Renders a single geographic feature.
fn render_feature(canvas: &mut Canvas, feature: &GeoFeature, style: &Style, scale: &CanvasScale) {
    match feature {
        GeoFeature::Point(coord) => {
            // Points are not projected
            canvas.set_rgba(style.point_color);
            canvas.fill_circle(DVec2::new(coord.x, coord.y), style.point_radius);
        }
        GeoFeature::LineString(coords) => {
            canvas.set_line_width(style.line_width);
            for coord in coords {
                canvas.line_to(lon_lat_to_meters(*coord));
            }
            canvas.set_rgba(style.line_color);
            canvas.stroke();
        }
        GeoFeature::Polygon(rings) => {
            for ring in rings {
                // Polygon rings share the multipolygon width
                canvas.set_line_width(style.mpoly_width);
                trace_ring(canvas, ring, |c| scale.polygon_to_canvas(c));
                canvas.set_rgba(style.poly_border_color);
                canvas.stroke_preserve();
                canvas.set_rgba(style.poly_color);
                canvas.fill();
            }
        }
        GeoFeature::MultiPolygon(polygons) => {
            for ring in polygons.iter().flatten() {
                trace_ring(canvas, ring, |c| scale.multipolygon_to_canvas(c));
                canvas.set_line_width(style.mpoly_width);
                canvas.set_rgba(style.mpoly_border_color);
                canvas.stroke_preserve();
                canvas.set_rgba(style.mpoly_color);
                canvas.fill();
            }
        }
    }
}

/// Appends a closed subpath through every projected vertex of `ring`.
fn trace_ring(
    canvas: &mut Canvas,
    ring: &Ring,
    project: impl Fn(geo_types::Coord<f64>) -> DVec2,
) {
    for coord in ring {
        canvas.line_to(project(*coord));
    }
    canvas.close_path();
}
