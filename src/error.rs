//! Error type shared by every stage of the render pipeline.
//!
//! Each loader returns its first failure to the caller unchanged; the
//! binary logs it and stops the run.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading inputs, drawing, or saving.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A file or directory could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// JSON or GeoJSON content was malformed or had the wrong shape.
    /// `path` is `None` when the text was decoded from memory.
    #[error("Parse error{}: {message}", location(.path))]
    Parse {
        path: Option<PathBuf>,
        message: String,
    },
    /// The raster surface could not be allocated.
    #[error("Cannot create a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },
    /// The finished canvas could not be encoded or written as PNG.
    #[error("Failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },
}

impl RenderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RenderError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        RenderError::Parse {
            path: Some(path.into()),
            message: message.to_string(),
        }
    }

    /// Parse error for text that did not come from a file.
    pub(crate) fn decode(message: impl ToString) -> Self {
        RenderError::Parse {
            path: None,
            message: message.to_string(),
        }
    }

    /// Attaches the source file to a parse error that has none yet.
    pub(crate) fn in_file(self, file: &Path) -> Self {
        match self {
            RenderError::Parse {
                path: None,
                message,
            } => RenderError::parse(file, message),
            other => other,
        }
    }
}

fn location(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Step of a run, used to label the error that stopped it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Styles,
    Data,
    Render,
    Save,
}

impl Stage {
    /// Returns a closure tagging a [`RenderError`] with this stage.
    pub fn wrap(self) -> impl FnOnce(RenderError) -> RunError {
        move |source| RunError {
            stage: self,
            source,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Config => "Config reading",
            Stage::Styles => "Style reading",
            Stage::Data => "Data reading",
            Stage::Render => "Rendering",
            Stage::Save => "Saving",
        };
        f.write_str(name)
    }
}

/// A [`RenderError`] together with the stage that raised it.
#[derive(Debug, Error)]
#[error("{stage} error: {source}")]
pub struct RunError {
    pub stage: Stage,
    #[source]
    pub source: RenderError,
}
