//! Per-layer drawing styles loaded from `app.style`.
//!
//! The style file is a JSON array with one record per data file. Records
//! are keyed by `fileName`, which must match the data file name including
//! its `.geojson` suffix.

use crate::error::{RenderError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// RGB color with components in 0–1.
pub type RgbColor = [f64; 3];
/// RGBA color with components in 0–1.
pub type RgbaColor = [f64; 4];

/// Drawing style for every feature of one data file.
///
/// All fields except `file_name` default to zero, so an incomplete record
/// behaves like the missing-style fallback for the fields it omits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    /// Data file this style applies to (e.g. "rivers.geojson")
    pub file_name: String,
    /// Layer background. Loaded but never painted.
    #[serde(default)]
    pub canvas_color: RgbColor,
    #[serde(default)]
    pub point_color: RgbaColor,
    #[serde(default)]
    pub point_radius: f64,
    #[serde(default)]
    pub line_width: f64,
    #[serde(default)]
    pub line_color: RgbaColor,
    /// Not read by the renderer; polygon rings are stroked with `mpoly_width`.
    #[serde(default)]
    pub poly_width: f64,
    #[serde(default)]
    pub poly_border_color: RgbaColor,
    #[serde(default)]
    pub poly_color: RgbaColor,
    #[serde(default)]
    pub mpoly_width: f64,
    #[serde(default)]
    pub mpoly_border_color: RgbaColor,
    #[serde(default)]
    pub mpoly_color: RgbaColor,
}

/// Zero-valued style handed out for files without a style record.
pub(crate) static ZERO_STYLE: Style = Style {
    file_name: String::new(),
    canvas_color: [0.0; 3],
    point_color: [0.0; 4],
    point_radius: 0.0,
    line_width: 0.0,
    line_color: [0.0; 4],
    poly_width: 0.0,
    poly_border_color: [0.0; 4],
    poly_color: [0.0; 4],
    mpoly_width: 0.0,
    mpoly_border_color: [0.0; 4],
    mpoly_color: [0.0; 4],
};

/// Read-only lookup from data file name to style.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    styles: HashMap<String, Style>,
}

impl StyleTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and decodes a style file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| RenderError::io(path, e))?;
        let records: Vec<Style> =
            serde_json::from_slice(&bytes).map_err(|e| RenderError::parse(path, e))?;
        let table = Self::from_records(records);

        log::info!("Loaded {} styles from {}", table.len(), path.display());
        Ok(table)
    }

    /// Decodes a style array that has already been read.
    pub fn from_json(text: &str) -> Result<Self> {
        let records: Vec<Style> = serde_json::from_str(text).map_err(RenderError::decode)?;
        Ok(Self::from_records(records))
    }

    /// Indexes records by file name. Later duplicates replace earlier ones.
    pub fn from_records(records: impl IntoIterator<Item = Style>) -> Self {
        let mut styles = HashMap::new();
        for style in records {
            if let Some(previous) = styles.insert(style.file_name.clone(), style) {
                log::debug!("Style for {} overridden by a later record", previous.file_name);
            }
        }
        Self { styles }
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Returns the style record for a file, if one was loaded.
    pub fn get(&self, file_name: &str) -> Option<&Style> {
        self.styles.get(file_name)
    }

    /// Returns the style for a file, falling back to the zero-valued style
    /// (fully transparent, zero widths) when no record exists.
    pub fn style_for(&self, file_name: &str) -> &Style {
        self.get(file_name).unwrap_or(&ZERO_STYLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_RECORD: &str = r#"[{
        "fileName": "countries.geojson",
        "canvasColor": [0.1, 0.2, 0.3],
        "pointColor": [1, 0, 0, 1],
        "pointRadius": 4,
        "lineWidth": 2,
        "lineColor": [0, 1, 0, 0.5],
        "polyWidth": 3,
        "polyBorderColor": [0, 0, 1, 1],
        "polyColor": [0.5, 0.5, 0.5, 1],
        "mpolyWidth": 1.5,
        "mpolyBorderColor": [0, 0, 0, 1],
        "mpolyColor": [0.9, 0.8, 0.7, 0.6]
    }]"#;

    #[test]
    fn test_full_record_fields() {
        let table = StyleTable::from_json(FULL_RECORD).unwrap();
        let style = table.get("countries.geojson").unwrap();

        assert_eq!(style.canvas_color, [0.1, 0.2, 0.3]);
        assert_eq!(style.point_color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(style.point_radius, 4.0);
        assert_eq!(style.line_width, 2.0);
        assert_eq!(style.line_color, [0.0, 1.0, 0.0, 0.5]);
        assert_eq!(style.poly_width, 3.0);
        assert_eq!(style.poly_border_color, [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(style.poly_color, [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(style.mpoly_width, 1.5);
        assert_eq!(style.mpoly_border_color, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(style.mpoly_color, [0.9, 0.8, 0.7, 0.6]);
    }

    #[test]
    fn test_duplicate_file_name_last_wins() {
        let table = StyleTable::from_json(
            r#"[
                {"fileName": "a.geojson", "pointRadius": 1},
                {"fileName": "b.geojson", "pointRadius": 2},
                {"fileName": "a.geojson", "pointRadius": 3}
            ]"#,
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.style_for("a.geojson").point_radius, 3.0);
        assert_eq!(table.style_for("b.geojson").point_radius, 2.0);
    }

    #[test]
    fn test_missing_entry_is_zero_valued() {
        let table = StyleTable::from_json("[]").unwrap();
        assert!(table.is_empty());
        assert!(table.get("a.geojson").is_none());
        assert_eq!(table.style_for("a.geojson"), &Style::default());
    }

    #[test]
    fn test_partial_record_defaults_to_zero() {
        let table =
            StyleTable::from_json(r#"[{"fileName": "a.geojson", "lineWidth": 2}]"#).unwrap();
        let style = table.style_for("a.geojson");
        assert_eq!(style.line_width, 2.0);
        assert_eq!(style.line_color, [0.0; 4]);
        assert_eq!(style.mpoly_width, 0.0);
    }

    #[test]
    fn test_invalid_style_files() {
        // Not an array
        assert!(matches!(
            StyleTable::from_json(r#"{"fileName": "a.geojson"}"#),
            Err(RenderError::Parse { .. })
        ));

        // Wrong color arity
        assert!(matches!(
            StyleTable::from_json(r#"[{"fileName": "a.geojson", "pointColor": [1, 0, 0]}]"#),
            Err(RenderError::Parse { .. })
        ));

        // Missing file name
        assert!(matches!(
            StyleTable::from_json(r#"[{"pointRadius": 1}]"#),
            Err(RenderError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            StyleTable::load(dir.path().join("app.style")),
            Err(RenderError::Io { .. })
        ));
    }

    #[test]
    fn test_load_invalid_utf8_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.style");
        std::fs::write(&path, [b'[', 0xff, b']']).unwrap();

        match StyleTable::load(&path) {
            Err(RenderError::Parse { path: p, .. }) => assert_eq!(p, Some(path)),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
