use egui::Color32;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Empty color string")]
    Empty,
    #[error("Invalid hex color: {0}")]
    InvalidHex(String),
    #[error("Invalid rgb() color: {0}")]
    InvalidRgb(String),
    #[error("Unknown color name: {0}")]
    UnknownName(String),
}

/// Parses the strings a color input produces: `#rgb`, `#rrggbb`, `#rrggbbaa`,
/// `rgb(r, g, b)`, `rgba(r, g, b, a)` (alpha in 0.0–1.0) and a handful of names.
pub fn parse_color(input: &str) -> Result<Color32, ColorParseError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ColorParseError::Empty);
    }

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| ColorParseError::InvalidHex(s.to_owned()));
    }

    let lower = s.to_ascii_lowercase();
    if let Some(body) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
    {
        return parse_rgb_body(body).ok_or_else(|| ColorParseError::InvalidRgb(s.to_owned()));
    }

    named(&lower).ok_or_else(|| ColorParseError::UnknownName(s.to_owned()))
}

fn parse_hex(hex: &str) -> Option<Color32> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();

    match hex.len() {
        3 => {
            let (r, g, b) = (digit(0)?, digit(1)?, digit(2)?);
            Some(Color32::from_rgb(r * 17, g * 17, b * 17))
        }
        6 => Some(Color32::from_rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color32::from_rgba_unmultiplied(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            byte(6)?,
        )),
        _ => None,
    }
}

fn parse_rgb_body(body: &str) -> Option<Color32> {
    let body = body.strip_suffix(')')?;
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();

    let channel = |s: &str| s.parse::<u8>().ok();
    match parts.as_slice() {
        [r, g, b] => Some(Color32::from_rgb(channel(r)?, channel(g)?, channel(b)?)),
        [r, g, b, a] => {
            let alpha = a.parse::<f32>().ok()?.clamp(0.0, 1.0);
            Some(Color32::from_rgba_unmultiplied(
                channel(r)?,
                channel(g)?,
                channel(b)?,
                (alpha * 255.0).round() as u8,
            ))
        }
        _ => None,
    }
}

fn named(name: &str) -> Option<Color32> {
    let color = match name {
        "black" => Color32::BLACK,
        "white" => Color32::WHITE,
        "red" => Color32::from_rgb(255, 0, 0),
        "green" => Color32::from_rgb(0, 128, 0),
        "blue" => Color32::from_rgb(0, 0, 255),
        "yellow" => Color32::from_rgb(255, 255, 0),
        "gray" | "grey" => Color32::from_rgb(128, 128, 128),
        "transparent" => Color32::TRANSPARENT,
        _ => return None,
    };
    Some(color)
}

/// Formats as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
pub fn to_hex(color: Color32) -> String {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    if a == 255 {
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
    }
}

/// serde adapter storing colors as hex strings
pub mod serde_hex {
    use egui::Color32;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_hex(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color32, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_color(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_forms() {
        assert_eq!(parse_color("#ff0000").unwrap(), Color32::from_rgb(255, 0, 0));
        assert_eq!(parse_color("#0f0").unwrap(), Color32::from_rgb(0, 255, 0));
        assert_eq!(parse_color(" #000000 ").unwrap(), Color32::BLACK);
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("#zzzzzz").is_err());
        assert!(parse_color("#+f+f+f").is_err());
        assert!(parse_color("#+ff").is_err());
    }

    #[test]
    fn test_rgb_forms() {
        assert_eq!(
            parse_color("rgb(10, 20, 30)").unwrap(),
            Color32::from_rgb(10, 20, 30)
        );
        let translucent = parse_color("rgba(178, 178, 178, 0.3)").unwrap();
        assert_eq!(translucent.to_srgba_unmultiplied()[3], 77);
        assert!(parse_color("rgb(300, 0, 0)").is_err());
    }

    #[test]
    fn test_names_and_errors() {
        assert_eq!(parse_color("black").unwrap(), Color32::BLACK);
        assert_eq!(parse_color("Transparent").unwrap(), Color32::TRANSPARENT);
        assert_eq!(parse_color(""), Err(ColorParseError::Empty));
        assert!(matches!(parse_color("mauve"), Err(ColorParseError::UnknownName(_))));
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(Color32::from_rgb(255, 0, 16)), "#ff0010");
        assert_eq!(to_hex(Color32::TRANSPARENT), "#00000000");
    }
}
