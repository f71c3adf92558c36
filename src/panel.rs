use egui::Color32;

use crate::config::EditorConfig;

pub const MIN_WIDTH: u32 = 1;
pub const MAX_WIDTH: u32 = 100;
pub const MIN_OPACITY: u8 = 1;
pub const MAX_OPACITY: u8 = 10;

/// Externally observed mirror of the property controls.
///
/// Reflects the active element when there is one, otherwise the defaults the
/// next created element will use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyPanelState {
    pub color: Color32,
    /// Stroke width slider, 1–100
    pub width: u32,
    /// Opacity slider, 1–10 (tenths)
    pub opacity: u8,
}

impl PropertyPanelState {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            color: config.default_color,
            width: clamp_width(config.default_width as i64),
            opacity: clamp_opacity(config.default_opacity as i64),
        }
    }

    /// Opacity as stored on elements
    pub fn opacity_fraction(&self) -> f32 {
        opacity_to_fraction(self.opacity)
    }
}

impl Default for PropertyPanelState {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

pub fn clamp_width(raw: i64) -> u32 {
    raw.clamp(MIN_WIDTH as i64, MAX_WIDTH as i64) as u32
}

pub fn clamp_opacity(raw: i64) -> u8 {
    raw.clamp(MIN_OPACITY as i64, MAX_OPACITY as i64) as u8
}

/// Slider step (1–10) to element opacity (0.1–1.0)
pub fn opacity_to_fraction(step: u8) -> f32 {
    step as f32 / 10.0
}

/// Element opacity back to the nearest slider step
pub fn fraction_to_opacity(opacity: f32) -> u8 {
    clamp_opacity((opacity * 10.0).round() as i64)
}
