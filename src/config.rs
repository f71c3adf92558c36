use egui::{Color32, Vec2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::color::serde_hex;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunables for a canvas session. Every field has a default so partial
/// config files are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Logical canvas size; also the export raster size
    pub canvas_size: [f32; 2],
    #[serde(with = "serde_hex")]
    pub background: Color32,

    /// Property panel defaults for the first object
    #[serde(with = "serde_hex")]
    pub default_color: Color32,
    pub default_width: u32,
    pub default_opacity: u8,

    /// Width and height of double-click shapes
    pub shape_size: f32,
    pub line_length: f32,
    /// Text boxes are placed at the click point minus this offset on both axes
    pub text_anchor_offset: f32,
    pub default_text: String,
    pub font_size: f32,

    #[serde(with = "serde_hex")]
    pub mask_fill: Color32,
    #[serde(with = "serde_hex")]
    pub mask_stroke: Color32,

    /// Scale dropped images down so they fit the canvas
    pub fit_imports: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_size: [500.0, 500.0],
            background: Color32::WHITE,
            default_color: Color32::BLACK,
            default_width: 1,
            default_opacity: 10,
            shape_size: 50.0,
            line_length: 48.0,
            text_anchor_offset: 25.0,
            default_text: "Text".to_owned(),
            font_size: 40.0,
            mask_fill: Color32::from_rgba_unmultiplied(178, 178, 178, 77),
            mask_stroke: Color32::BLACK,
            fit_imports: true,
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Loads `path` if it exists, falling back to defaults otherwise
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("Ignoring config {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    pub fn canvas_size(&self) -> Vec2 {
        Vec2::new(self.canvas_size[0], self.canvas_size[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = EditorConfig::from_json_str(r##"{ "shape_size": 80.0, "background": "#202020" }"##)
            .unwrap();
        assert_eq!(config.shape_size, 80.0);
        assert_eq!(config.background, Color32::from_rgb(0x20, 0x20, 0x20));
        assert_eq!(config.default_width, 1);
        assert_eq!(config.default_opacity, 10);
    }

    #[test]
    fn test_bad_color_is_rejected() {
        let result = EditorConfig::from_json_str(r#"{ "default_color": "not-a-color" }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let config = EditorConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"#ffffff\""));
        let back = EditorConfig::from_json_str(&json).unwrap();
        assert_eq!(back.canvas_size, config.canvas_size);
        assert_eq!(back.default_color, config.default_color);
    }
}
