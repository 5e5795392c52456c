//! Inspector layout configuration
//!
//! Values default to [`crate::constants::layout`] and can be overridden from a
//! JSON file, either explicitly or from the platform config directory.

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::constants::{app, layout};
use crate::error::Result;

/// Global layout configuration shared by every field editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    pub line_height: f32,
    pub label_width: f32,
    pub foldout_width: f32,
    pub indent_width: f32,
    pub label_prefix_width: f32,
    pub vertical_spacing: f32,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            line_height: layout::SINGLE_LINE_HEIGHT,
            label_width: layout::LABEL_WIDTH,
            foldout_width: layout::FOLDOUT_WIDTH,
            indent_width: layout::INDENT_WIDTH,
            label_prefix_width: layout::LABEL_PREFIX_WIDTH,
            vertical_spacing: layout::VERTICAL_SPACING,
        }
    }
}

impl InspectorConfig {
    /// Parse a configuration from JSON; missing keys keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        info!("Loaded inspector config from {}", path.display());
        Ok(config)
    }

    /// Default location of the configuration file, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(app::CONFIG_DIR_NAME).join(app::CONFIG_FILE_NAME))
    }

    /// Load from the given path or the default location, falling back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let candidate = path.map(Path::to_path_buf).or_else(Self::default_path);
        match candidate {
            Some(path) if path.exists() => Self::load(&path).unwrap_or_else(|err| {
                log::warn!("Ignoring inspector config {}: {}", path.display(), err);
                Self::default()
            }),
            _ => {
                debug!("No inspector config found, using defaults");
                Self::default()
            }
        }
    }
}
