// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor configuration, stored as RON.

use crate::gizmo::GizmoType;
use crate::markers::MarkerScales;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "vantage_editor.ron";

/// Configuration format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Errors that can occur while loading or saving the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid RON for this configuration
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// Written by a newer editor
    #[error("Config version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest supported version
        supported: u32,
    },
}

/// Viewport camera control speeds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSpeeds {
    /// Orbit radians per screen width of drag
    pub orbit: f32,
    /// Pan distance per screen width of drag, relative to orbit distance
    pub pan: f32,
    /// Zoom step per wheel notch
    pub zoom: f32,
}

impl Default for ViewportSpeeds {
    fn default() -> Self {
        Self {
            orbit: 3.0,
            pan: 1.0,
            zoom: 1.0,
        }
    }
}

/// Editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Format version
    pub version: u32,
    /// Longest press, in seconds, that still counts as a click
    pub click_threshold: f64,
    /// Marker sizes
    pub marker_scales: MarkerScales,
    /// Flat color of the selection outline
    pub selection_color: Vec3,
    /// Color of path overlays
    pub path_color: Vec3,
    /// Line segments drawn between two keyframes
    pub path_detail: u32,
    /// Size of the debug line buffer
    pub max_debug_vertices: usize,
    /// Gizmo active at startup
    pub default_gizmo: GizmoType,
    /// Draw every path, not only the one being edited
    pub render_all_paths: bool,
    /// Distance from a gizmo's pivot to its handles
    pub gizmo_handle_length: f32,
    /// Pick radius of gizmo handles
    pub gizmo_handle_radius: f32,
    /// Viewport camera speeds
    pub viewport: ViewportSpeeds,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            click_threshold: 0.2,
            marker_scales: MarkerScales::default(),
            selection_color: Vec3::new(0.25, 1.0, 0.63),
            path_color: Vec3::new(1.0, 0.85, 0.2),
            path_detail: vantage_editor_paths::DEFAULT_PATH_DETAIL,
            max_debug_vertices: 65536,
            default_gizmo: GizmoType::Translate,
            render_all_paths: false,
            gizmo_handle_length: 1.0,
            gizmo_handle_radius: 0.15,
            viewport: ViewportSpeeds::default(),
        }
    }
}

impl EditorConfig {
    /// Load the configuration, falling back to defaults when the file does
    /// not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: EditorConfig = ron::from_str(&content)?;

        if config.version > CONFIG_FORMAT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_FORMAT_VERSION,
            });
        }

        tracing::info!("Loaded editor config from {:?}", path);
        Ok(config)
    }

    /// Save the configuration as pretty RON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let pretty = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        let content = ron::ser::to_string_pretty(self, pretty)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.click_threshold, 0.2);
        assert_eq!(config.marker_scales.camera, 0.5);
        assert_eq!(config.path_detail, 10);
        assert_eq!(config.default_gizmo, GizmoType::Translate);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EditorConfig::load(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let config = EditorConfig {
            render_all_paths: true,
            default_gizmo: GizmoType::Rotate,
            ..EditorConfig::default()
        };
        config.save(&path).unwrap();

        let loaded = EditorConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "(click_threshold: 0.5)").unwrap();

        let loaded = EditorConfig::load(&path).unwrap();
        assert_eq!(loaded.click_threshold, 0.5);
        assert_eq!(loaded.max_debug_vertices, 65536);
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "(version: 99)").unwrap();
        assert!(matches!(
            EditorConfig::load(&path),
            Err(ConfigError::UnsupportedVersion { found: 99, .. })
        ));
        std::fs::write(&path, "(version: ").unwrap();
        assert!(matches!(EditorConfig::load(&path), Err(ConfigError::Parse(_))));
    }
}
