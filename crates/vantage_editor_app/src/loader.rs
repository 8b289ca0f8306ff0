// SPDX-License-Identifier: MIT OR Apache-2.0
//! Model loading seam.
//!
//! Mesh parsing lives outside the editor. The editor only needs a name and a
//! bounding radius for picking, so a loader hands back a [`ModelAsset`].

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced while loading a model
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file does not exist
    #[error("model file not found: {0}")]
    NotFound(PathBuf),

    /// The file exists but could not be read as a model
    #[error("failed to parse model {path}: {reason}")]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Loader-specific reason
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Editor-side description of a loaded model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAsset {
    /// Display name
    pub name: String,
    /// File the model came from
    pub source: Option<PathBuf>,
    /// Radius of a sphere around the model origin enclosing the mesh
    pub bounding_radius: f32,
}

impl ModelAsset {
    /// Create an asset that was not loaded from a file
    pub fn new(name: impl Into<String>, bounding_radius: f32) -> Self {
        Self {
            name: name.into(),
            source: None,
            bounding_radius,
        }
    }

    /// Create an asset for a file, named after the file stem
    pub fn from_file(path: &Path, bounding_radius: f32) -> Self {
        Self {
            name: model_name_from_path(path),
            source: Some(path.to_path_buf()),
            bounding_radius,
        }
    }
}

/// Something that turns a model file into a [`ModelAsset`]
pub trait ModelLoader {
    /// Load the model at `path`
    fn load_model(&mut self, path: &Path) -> Result<ModelAsset, LoadError>;
}

impl<F> ModelLoader for F
where
    F: FnMut(&Path) -> Result<ModelAsset, LoadError>,
{
    fn load_model(&mut self, path: &Path) -> Result<ModelAsset, LoadError> {
        self(path)
    }
}

/// Model name derived from a file name (`meshes/crate.obj` -> `crate`)
pub fn model_name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Model".to_string())
}

/// Loader that accepts any existing file and gives it a unit bounding radius
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderLoader;

impl ModelLoader for PlaceholderLoader {
    fn load_model(&mut self, path: &Path) -> Result<ModelAsset, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }
        Ok(ModelAsset::from_file(path, 1.0))
    }
}
