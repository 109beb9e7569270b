//! Geographic layer data structures and the `.geojson` directory loader.

use crate::error::{RenderError, Result};
use geo_types::Coord;
use geojson::{FeatureCollection, GeoJson, Geometry, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// File name suffix of loadable layers.
pub const LAYER_SUFFIX: &str = ".geojson";

/// Closed or open sequence of vertices.
pub type Ring = Vec<Coord<f64>>;

/// A geographic feature that can be rendered.
///
/// Coordinates keep their GeoJSON meaning: x is longitude and y latitude,
/// except for points, whose pair is drawn as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoFeature {
    /// A single position
    Point(Coord<f64>),
    /// A series of connected line segments (roads, rivers)
    LineString(Vec<Coord<f64>>),
    /// Rings of one polygon, exterior first
    Polygon(Vec<Ring>),
    /// Polygons, each a list of rings
    MultiPolygon(Vec<Vec<Ring>>),
}

/// One loaded `.geojson` file.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLayer {
    /// Source file name, used to look up the layer style
    pub name: String,
    /// Features in file order
    pub features: Vec<GeoFeature>,
}

/// Loaded layers keyed by file name. Iterates in sorted name order, which
/// is also the drawing order.
pub type LayerSet = BTreeMap<String, GeoLayer>;

impl GeoLayer {
    /// Creates a new empty layer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            features: Vec::new(),
        }
    }

    /// Parses a GeoJSON FeatureCollection document into a layer.
    ///
    /// Features without a geometry, and geometry kinds the renderer has no
    /// routine for, are skipped.
    pub fn from_geojson_str(name: impl Into<String>, geojson_str: &str) -> Result<Self> {
        let mut layer = Self::new(name);
        let geojson: GeoJson = geojson_str.parse().map_err(RenderError::decode)?;

        match geojson {
            GeoJson::FeatureCollection(fc) => layer.load_feature_collection(fc)?,
            GeoJson::Feature(_) | GeoJson::Geometry(_) => {
                return Err(RenderError::decode("expected a FeatureCollection document"));
            }
        }

        Ok(layer)
    }

    fn load_feature_collection(&mut self, fc: FeatureCollection) -> Result<()> {
        for (index, feature) in fc.features.into_iter().enumerate() {
            let Some(geometry) = feature.geometry else {
                log::debug!("{}: feature {} has no geometry, skipping", self.name, index);
                continue;
            };

            match self.convert_geometry(&geometry)? {
                Some(geo_feature) => self.features.push(geo_feature),
                None => log::debug!(
                    "{}: feature {} is a {}, skipping",
                    self.name,
                    index,
                    kind_name(&geometry.value)
                ),
            }
        }
        Ok(())
    }

    fn convert_geometry(&self, geometry: &Geometry) -> Result<Option<GeoFeature>> {
        let feature = match &geometry.value {
            Value::Point(position) => GeoFeature::Point(self.coord(position)?),
            Value::LineString(positions) => GeoFeature::LineString(self.ring(positions)?),
            Value::Polygon(rings) => GeoFeature::Polygon(self.rings(rings)?),
            Value::MultiPolygon(polygons) => GeoFeature::MultiPolygon(
                polygons
                    .iter()
                    .map(|rings| self.rings(rings))
                    .collect::<Result<_>>()?,
            ),
            Value::MultiPoint(_) | Value::MultiLineString(_) | Value::GeometryCollection(_) => {
                return Ok(None)
            }
        };
        Ok(Some(feature))
    }

    fn rings(&self, rings: &[Vec<Vec<f64>>]) -> Result<Vec<Ring>> {
        rings.iter().map(|ring| self.ring(ring)).collect()
    }

    fn ring(&self, positions: &[Vec<f64>]) -> Result<Ring> {
        positions.iter().map(|p| self.coord(p)).collect()
    }

    fn coord(&self, position: &[f64]) -> Result<Coord<f64>> {
        match position {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(RenderError::decode(format!(
                "position {:?} has fewer than two values",
                position
            ))),
        }
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

/// Loads every `.geojson` file in `dir`.
///
/// Subdirectories and files with other suffixes are ignored. The first
/// unreadable or unparsable file aborts the whole load.
pub fn load_layers(dir: impl AsRef<Path>) -> Result<LayerSet> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|e| RenderError::io(dir, e))?;

    let mut layers = LayerSet::new();
    for entry in entries {
        let entry = entry.map_err(|e| RenderError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| RenderError::io(&path, e))?;
        let file_name = entry.file_name().to_string_lossy().into_owned();

        if file_type.is_dir() || !file_name.ends_with(LAYER_SUFFIX) {
            log::trace!("Ignoring {}", path.display());
            continue;
        }

        let bytes = std::fs::read(&path).map_err(|e| RenderError::io(&path, e))?;
        let text = std::str::from_utf8(&bytes).map_err(|e| RenderError::parse(&path, e))?;
        let layer = GeoLayer::from_geojson_str(file_name.clone(), text)
            .map_err(|e| e.in_file(&path))?;

        log::info!("Loaded {} features from {}", layer.features.len(), file_name);
        layers.insert(file_name, layer);
    }

    Ok(layers)
}
