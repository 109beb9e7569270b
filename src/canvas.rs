//! Stateful 2D drawing context backed by a `tiny_skia::Pixmap`.
//!
//! Drawing follows a current-path model: vertices are appended with
//! [`Canvas::line_to`], then the path is stroked and/or filled with the
//! current color and line width. `stroke` and `fill` consume the path,
//! `stroke_preserve` keeps it for a following fill.

use crate::error::{RenderError, Result};
use crate::style::RgbaColor;
use glam::DVec2;
use std::path::Path;
use tiny_skia::{
    Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform,
};

/// Raster surface plus the drawing state applied to the next operation.
pub struct Canvas {
    pixmap: Pixmap,
    transform: Transform,
    color: Color,
    line_width: f64,
    dash: Vec<f32>,
    path: PathBuilder,
    has_current_point: bool,
}

impl Canvas {
    /// Allocates a transparent canvas of the given size.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })?;
        Ok(Self {
            pixmap,
            transform: Transform::identity(),
            color: Color::BLACK,
            line_width: 1.0,
            dash: Vec::new(),
            path: PathBuilder::new(),
            has_current_point: false,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Read access to the raster, mainly for inspection in tests.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Flips the Y axis so that logical y = 0 is the bottom pixel row.
    pub fn invert_y(&mut self) {
        let flip = Transform::from_row(1.0, 0.0, 0.0, -1.0, 0.0, self.height() as f32);
        self.transform = self.transform.pre_concat(flip);
    }

    /// Sets the current color from RGBA components in 0–1.
    pub fn set_rgba(&mut self, color: RgbaColor) {
        self.color = to_color(color);
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    /// Sets the dash pattern in pixels. An empty pattern draws solid lines.
    pub fn set_dash(&mut self, pattern: &[f64]) {
        self.dash = pattern.iter().map(|&d| d as f32).collect();
    }

    /// Fills the whole canvas with the current color.
    pub fn clear(&mut self) {
        self.pixmap.fill(self.color);
    }

    /// Starts a new subpath at `point`.
    pub fn move_to(&mut self, point: DVec2) {
        self.path.move_to(point.x as f32, point.y as f32);
        self.has_current_point = true;
    }

    /// Adds a segment to `point`, or starts a subpath there if the path is empty.
    pub fn line_to(&mut self, point: DVec2) {
        if self.has_current_point {
            self.path.line_to(point.x as f32, point.y as f32);
        } else {
            self.move_to(point);
        }
    }

    /// Closes the current subpath back to its first point.
    pub fn close_path(&mut self) {
        if self.has_current_point {
            self.path.close();
        }
    }

    /// Discards the current path.
    pub fn clear_path(&mut self) {
        self.path = PathBuilder::new();
        self.has_current_point = false;
    }

    /// Strokes the current path and clears it.
    pub fn stroke(&mut self) {
        self.stroke_preserve();
        self.clear_path();
    }

    /// Strokes the current path and keeps it.
    pub fn stroke_preserve(&mut self) {
        if self.line_width <= 0.0 {
            return;
        }
        let Some(path) = self.path.clone().finish() else {
            log::trace!("Skipping stroke of empty or degenerate path");
            return;
        };

        let stroke = Stroke {
            width: self.line_width as f32,
            dash: self.stroke_dash(),
            ..Stroke::default()
        };
        let paint = self.paint();
        self.pixmap
            .stroke_path(&path, &paint, &stroke, self.transform, None);
    }

    /// Fills the current path (non-zero winding) and clears it.
    pub fn fill(&mut self) {
        self.fill_preserve();
        self.clear_path();
    }

    /// Fills the current path (non-zero winding) and keeps it.
    pub fn fill_preserve(&mut self) {
        let Some(path) = self.path.clone().finish() else {
            log::trace!("Skipping fill of empty or degenerate path");
            return;
        };

        let paint = self.paint();
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, self.transform, None);
    }

    /// Draws a filled circle with the current color. The current path is
    /// left untouched.
    pub fn fill_circle(&mut self, center: DVec2, radius: f64) {
        if radius <= 0.0 {
            return;
        }
        let Some(circle) = PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32)
        else {
            log::trace!("Skipping circle at {:?} with radius {}", center, radius);
            return;
        };

        let paint = self.paint();
        self.pixmap
            .fill_path(&circle, &paint, FillRule::Winding, self.transform, None);
    }

    /// Encodes the canvas as PNG and writes it to `path`.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.pixmap
            .save_png(path)
            .map_err(|e| RenderError::Encode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        log::info!(
            "Wrote {}x{} image to {}",
            self.width(),
            self.height(),
            path.display()
        );
        Ok(())
    }

    fn paint(&self) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(self.color);
        paint.anti_alias = true;
        paint
    }

    fn stroke_dash(&self) -> Option<StrokeDash> {
        if self.dash.is_empty() {
            None
        } else {
            StrokeDash::new(self.dash.clone(), 0.0)
        }
    }
}

/// Converts 0–1 float components to a drawing color, clamping out-of-range
/// values.
fn to_color(color: RgbaColor) -> Color {
    let [r, g, b, a] = color.map(|c| if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) as f32 });
    Color::from_rgba(r, g, b, a).unwrap_or(Color::TRANSPARENT)
}
