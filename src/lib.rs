#![warn(clippy::all)]

//! geomap-render - draws a directory of GeoJSON layers onto a PNG map.
//!
//! A run is a single pass: load the config, load the styles, load the
//! layers, draw them on a Mercator canvas, and save the image.

pub mod canvas;
pub mod config;
pub mod error;
pub mod geo;
pub mod style;

pub use canvas::Canvas;
pub use config::Config;
pub use error::{RenderError, Result, RunError, Stage};
pub use style::{Style, StyleTable};

use std::path::PathBuf;

/// Input and output locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    /// JSON config with canvas size and data directory
    pub config: PathBuf,
    /// JSON array of per-file styles
    pub styles: PathBuf,
    /// PNG written at the end of the run
    pub output: PathBuf,
}

impl Default for RunPaths {
    fn default() -> Self {
        Self {
            config: PathBuf::from("./app.config"),
            styles: PathBuf::from("./app.style"),
            output: PathBuf::from("out.png"),
        }
    }
}

/// Runs the whole pipeline and returns the path of the written image.
///
/// Stops at the first failing stage; nothing is written unless every
/// earlier stage succeeded.
pub fn run(paths: &RunPaths) -> std::result::Result<PathBuf, RunError> {
    let config = Config::load(&paths.config).map_err(Stage::Config.wrap())?;
    let styles = StyleTable::load(&paths.styles).map_err(Stage::Styles.wrap())?;
    let layers = geo::load_layers(&config.data_dir).map_err(Stage::Data.wrap())?;

    let canvas = geo::render_map(&config, &layers, &styles).map_err(Stage::Render.wrap())?;
    canvas
        .save_png(&paths.output)
        .map_err(Stage::Save.wrap())?;

    Ok(paths.output.clone())
}
