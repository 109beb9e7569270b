//! Render configuration loaded from `app.config`.
//!
//! The file is a single JSON object giving the canvas size in pixels and
//! the directory holding the `.geojson` layers.

use crate::error::{RenderError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Canvas dimensions and data location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Output image width in pixels.
    pub canvas_width: u32,
    /// Output image height in pixels.
    pub canvas_height: u32,
    /// Directory scanned for `.geojson` files.
    pub data_dir: PathBuf,
}

impl Config {
    /// Reads and decodes a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| RenderError::io(path, e))?;
        let config: Self =
            serde_json::from_slice(&bytes).map_err(|e| RenderError::parse(path, e))?;

        log::info!(
            "Loaded config from {}: {}x{} canvas, data in {}",
            path.display(),
            config.canvas_width,
            config.canvas_height,
            config.data_dir.display()
        );
        Ok(config)
    }

    /// Decodes config JSON that has already been read.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(RenderError::decode)
    }
}
