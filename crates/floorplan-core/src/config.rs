//! Editor configuration.

use crate::history::MAX_UNDO_HISTORY;
use crate::snap::{DEFAULT_GRID_SIZE, GridSettings};
use crate::viewport::{DEFAULT_VIEW, MAX_ZOOM_SPAN, MIN_ZOOM_SPAN, Viewport};
use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tunables for an [`crate::Editor`]. Every field has a default, so a config
/// file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub grid_size: f64,
    pub snap_to_grid: bool,
    pub show_grid: bool,
    pub show_lamps: bool,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub min_zoom_span: f64,
    pub max_zoom_span: f64,
    pub max_undo: usize,
    /// View used when a document has nothing to frame.
    pub default_view: Rect,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            snap_to_grid: true,
            show_grid: true,
            show_lamps: true,
            canvas_width: 1200.0,
            canvas_height: 800.0,
            min_zoom_span: MIN_ZOOM_SPAN,
            max_zoom_span: MAX_ZOOM_SPAN,
            max_undo: MAX_UNDO_HISTORY,
            default_view: DEFAULT_VIEW,
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn grid(&self) -> GridSettings {
        GridSettings {
            size: self.grid_size,
            snap_enabled: self.snap_to_grid,
            visible: self.show_grid,
        }
    }

    /// A viewport showing the default view on the configured canvas.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.default_view, Size::new(self.canvas_width, self.canvas_height))
            .with_zoom_limits(self.min_zoom_span, self.max_zoom_span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_config() {
        let config = EditorConfig::from_json(r#"{"grid_size": 50.0, "snap_to_grid": false}"#).unwrap();
        assert_eq!(config.grid_size, 50.0);
        assert!(!config.snap_to_grid);
        assert_eq!(config.max_undo, MAX_UNDO_HISTORY);
        assert_eq!(config.default_view, DEFAULT_VIEW);
    }

    #[test]
    fn test_invalid_grid_size_falls_back_at_use() {
        let config = EditorConfig::from_json(r#"{"grid_size": -5.0}"#).unwrap();
        assert_eq!(config.grid().size(), DEFAULT_GRID_SIZE);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("editor.json");
        std::fs::write(&path, r#"{"canvas_width": 640.0, "canvas_height": 480.0}"#).unwrap();
        let config = EditorConfig::load(&path).unwrap();
        assert_eq!(config.viewport().size, Size::new(640.0, 480.0));

        let missing = EditorConfig::load(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(EditorConfig::from_json("{"), Err(ConfigError::Json(_))));
    }
}
