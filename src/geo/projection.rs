//! Map projection and coordinate transformation.
//!
//! Converts geographic coordinates (lon/lat) to spherical Mercator meters,
//! and meters to canvas pixels. Each geometry kind uses its own policy:
//!
//! - Polygon: meters, then [`fold`], then [`CanvasScale::apply`].
//! - MultiPolygon: meters, then [`center_russia`], then [`CanvasScale::apply`].
//! - LineString: meters only, drawn without scaling to pixels.
//! - Point: drawn at its stored coordinates with no projection.
//!
//! Point and LineString layers therefore do not line up with polygon layers
//! on the same canvas.

use glam::DVec2;
use geo_types::Coord;
use std::f64::consts::PI;

/// Half the width of the spherical Mercator world, in meters (π · 6378137).
pub const MERCATOR_MAX_VALUE: f64 = 20037508.342789244;

/// Western shift used to recenter multipolygon layers across the antimeridian.
pub const RUSSIA_WEST_OFFSET: f64 = 1635093.15883866;

/// Converts a geographic coordinate (x = longitude, y = latitude, degrees)
/// to spherical Mercator meters.
///
/// Valid for |lat| < 90°; at the poles y becomes infinite.
pub fn lon_lat_to_meters(coord: Coord<f64>) -> DVec2 {
    let x = coord.x * MERCATOR_MAX_VALUE / 180.0;
    let y = ((90.0 + coord.y) * PI / 360.0).tan().ln() / (PI / 180.0);
    DVec2::new(x, y * MERCATOR_MAX_VALUE / 180.0)
}

/// Converts spherical Mercator meters back to a geographic coordinate.
pub fn meters_to_lon_lat(meters: DVec2) -> Coord<f64> {
    let lon = meters.x / MERCATOR_MAX_VALUE * 180.0;
    let lat = meters.y / MERCATOR_MAX_VALUE * 180.0;
    let lat = 180.0 / PI * (2.0 * (lat * PI / 180.0).exp().atan() - PI / 2.0);
    Coord { x: lon, y: lat }
}

/// Shifts signed meters into the positive range, per axis.
///
/// Both branches add `MERCATOR_MAX_VALUE`; the result spans
/// [0, 2 · MERCATOR_MAX_VALUE) for in-range input.
pub fn fold(meters: DVec2) -> DVec2 {
    DVec2::new(fold_axis(meters.x), fold_axis(meters.y))
}

fn fold_axis(v: f64) -> f64 {
    if v > 0.0 {
        v + MERCATOR_MAX_VALUE
    } else {
        MERCATOR_MAX_VALUE + v
    }
}

/// Moves geometry that straddles the antimeridian into one contiguous band.
///
/// Eastern x is shifted west by [`RUSSIA_WEST_OFFSET`]; western x is wrapped
/// round to the far east. y is unchanged.
pub fn center_russia(meters: DVec2) -> DVec2 {
    let x = if meters.x > 0.0 {
        meters.x - RUSSIA_WEST_OFFSET
    } else {
        meters.x + 2.0 * MERCATOR_MAX_VALUE - RUSSIA_WEST_OFFSET
    };
    DVec2::new(x, meters.y)
}

/// Meters-to-pixel scale factors for one canvas.
///
/// Computed from the half-extent, so folded polygon coordinates can reach
/// twice the canvas size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasScale {
    /// Pixels per meter along x
    pub x: f64,
    /// Pixels per meter along y
    pub y: f64,
}

impl CanvasScale {
    /// Creates the scale for a canvas of the given pixel size.
    pub fn new(canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            x: canvas_width as f64 / MERCATOR_MAX_VALUE,
            y: canvas_height as f64 / MERCATOR_MAX_VALUE,
        }
    }

    /// Scales meters to pixels.
    pub fn apply(&self, meters: DVec2) -> DVec2 {
        DVec2::new(meters.x * self.x, meters.y * self.y)
    }

    /// Projects a polygon vertex to canvas pixels.
    pub fn polygon_to_canvas(&self, coord: Coord<f64>) -> DVec2 {
        self.apply(fold(lon_lat_to_meters(coord)))
    }

    /// Projects a multipolygon vertex to canvas pixels.
    pub fn multipolygon_to_canvas(&self, coord: Coord<f64>) -> DVec2 {
        self.apply(center_russia(lon_lat_to_meters(coord)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    #[test]
    fn test_origin_maps_to_zero() {
        let m = lon_lat_to_meters(Coord { x: 0.0, y: 0.0 });
        assert!(m.x.abs() < EPS);
        assert!(m.y.abs() < EPS);
    }

    #[test]
    fn test_antimeridian_is_world_edge() {
        let east = lon_lat_to_meters(Coord { x: 180.0, y: 0.0 });
        let west = lon_lat_to_meters(Coord { x: -180.0, y: 0.0 });
        assert!((east.x - MERCATOR_MAX_VALUE).abs() < EPS);
        assert!((west.x + MERCATOR_MAX_VALUE).abs() < EPS);

        // Web Mercator's square extent ends near 85.0511°
        let top = lon_lat_to_meters(Coord { x: 0.0, y: 85.051_128_779_806_6 });
        assert!((top.y - MERCATOR_MAX_VALUE).abs() < 1e-2);
    }

    #[test]
    fn test_inverse_recovers_lon_lat() {
        for lon in [-179.5, -120.0, -0.25, 0.0, 33.3, 179.9] {
            for lat in [-84.9, -45.0, -1.0, 0.0, 12.5, 60.0, 84.9] {
                let back = meters_to_lon_lat(lon_lat_to_meters(Coord { x: lon, y: lat }));
                assert!((back.x - lon).abs() < EPS, "lon {} -> {}", lon, back.x);
                assert!((back.y - lat).abs() < EPS, "lat {} -> {}", lat, back.y);
            }
        }
    }

    #[test]
    fn test_fold_and_scale() {
        let scale = CanvasScale::new(800, 600);

        // x = 0 lands exactly on MAX * scale
        let zero = scale.apply(fold(DVec2::ZERO));
        assert_eq!(zero.x, MERCATOR_MAX_VALUE * scale.x);
        assert_eq!(zero.y, MERCATOR_MAX_VALUE * scale.y);

        let positive = fold(DVec2::new(1_000_000.0, 0.0));
        assert_eq!(positive.x, 1_000_000.0 + MERCATOR_MAX_VALUE);

        let negative = fold(DVec2::new(-1_000_000.0, -2_000_000.0));
        assert_eq!(negative.x, MERCATOR_MAX_VALUE - 1_000_000.0);
        assert_eq!(negative.y, MERCATOR_MAX_VALUE - 2_000_000.0);
    }

    #[test]
    fn test_polygon_vertex_can_exceed_canvas() {
        let scale = CanvasScale::new(800, 600);
        let p = scale.polygon_to_canvas(Coord { x: 90.0, y: 0.0 });
        assert!((p.x - 1200.0).abs() < EPS);
        assert!((p.y - 600.0).abs() < EPS);
    }

    #[test]
    fn test_center_russia() {
        let shifted = center_russia(DVec2::new(RUSSIA_WEST_OFFSET, 0.0));
        assert_eq!(shifted, DVec2::ZERO);

        let wrapped = center_russia(DVec2::new(-1.0, 0.0));
        assert_eq!(
            wrapped,
            DVec2::new(2.0 * MERCATOR_MAX_VALUE - RUSSIA_WEST_OFFSET - 1.0, 0.0)
        );

        // y passes through untouched
        assert_eq!(center_russia(DVec2::new(5.0, -7.0)).y, -7.0);
    }

    #[test]
    fn test_multipolygon_vertex() {
        let scale = CanvasScale::new(1000, 500);
        let p = scale.multipolygon_to_canvas(Coord { x: 0.0, y: 0.0 });
        let expected_x = (2.0 * MERCATOR_MAX_VALUE - RUSSIA_WEST_OFFSET) * scale.x;
        assert!((p.x - expected_x).abs() < EPS);
        assert!(p.y.abs() < EPS);
    }
}
