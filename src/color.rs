//! Background tint and opacity value types
//!
//! Colors are accepted as `#AARRGGBB`, `#RRGGBB` or `rgba(r, g, b, a)` and are
//! always written back in the `rgba(...)` form with an integer alpha.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tracing::warn;

use crate::constants::validation::{MAX_OPACITY_PERCENT, MIN_OPACITY_PERCENT};

/// Straight (non-premultiplied) RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackgroundColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl BackgroundColor {
    pub const TRANSPARENT: Self = Self::from_argb32(0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_argb32(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Parse any supported color notation, `None` when unrecognised
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Some(hex) = input.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        let lower = input.to_ascii_lowercase();
        if let Some(body) = lower.strip_prefix("rgba(").and_then(|s| s.strip_suffix(')')) {
            return Self::parse_rgba(body);
        }
        if let Some(body) = lower.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
            let (r, g, b) = parse_channels(body)?;
            return Some(Self::new(r, g, b, u8::MAX));
        }
        None
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            8 => u32::from_str_radix(hex, 16).ok().map(Self::from_argb32),
            // No alpha given: fully opaque
            6 => u32::from_str_radix(hex, 16)
                .ok()
                .map(|rgb| Self::from_argb32(0xFF00_0000 | rgb)),
            _ => None,
        }
    }

    fn parse_rgba(body: &str) -> Option<Self> {
        let (rgb, alpha) = body.rsplit_once(',')?;
        let (r, g, b) = parse_channels(rgb)?;
        let alpha = alpha.trim();
        // A decimal point means a CSS fraction, otherwise a 0-255 integer
        let a = if alpha.contains('.') {
            let fraction: f32 = alpha.parse().ok()?;
            if !(0.0..=1.0).contains(&fraction) {
                return None;
            }
            (fraction * 255.0).round() as u8
        } else {
            alpha.parse().ok()?
        };
        Some(Self::new(r, g, b, a))
    }

    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

fn parse_channels(body: &str) -> Option<(u8, u8, u8)> {
    let mut parts = body.split(',').map(|p| p.trim().parse::<u8>());
    let r = parts.next()?.ok()?;
    let g = parts.next()?.ok()?;
    let b = parts.next()?.ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((r, g, b))
}

impl Default for BackgroundColor {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl Serialize for BackgroundColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

/// Unknown notations fall back to transparent instead of failing the whole file
impl<'de> Deserialize<'de> for BackgroundColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw).unwrap_or_else(|| {
            warn!(bg_color = %raw, "Invalid background color, using transparent");
            Self::TRANSPARENT
        }))
    }
}

/// Whole-window opacity, held as an integer percent in 10..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Opacity(u8);

impl Opacity {
    pub fn from_percent(percent: u8) -> Self {
        Self(percent.clamp(MIN_OPACITY_PERCENT, MAX_OPACITY_PERCENT))
    }

    /// Nearest percent step, clamped into range
    pub fn from_fraction(fraction: f64) -> Self {
        let percent = (fraction * 100.0).round();
        if percent.is_nan() || percent < f64::from(MIN_OPACITY_PERCENT) {
            Self(MIN_OPACITY_PERCENT)
        } else if percent > f64::from(MAX_OPACITY_PERCENT) {
            Self(MAX_OPACITY_PERCENT)
        } else {
            Self(percent as u8)
        }
    }

    pub fn percent(&self) -> u8 {
        self.0
    }

    pub fn fraction(&self) -> f32 {
        f32::from(self.0) / 100.0
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self(crate::constants::defaults::OPACITY_PERCENT)
    }
}

impl Serialize for Opacity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(f64::from(self.0) / 100.0)
    }
}

impl<'de> Deserialize<'de> for Opacity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fraction = f64::deserialize(deserializer)?;
        let opacity = Self::from_fraction(fraction);
        if (f64::from(opacity.0) / 100.0 - fraction).abs() > 0.005 {
            warn!(opacity = fraction, using = opacity.fraction(), "opacity out of range, clamping");
        }
        Ok(opacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_argb() {
        assert_eq!(BackgroundColor::parse("#00000000"), Some(BackgroundColor::TRANSPARENT));
        assert_eq!(
            BackgroundColor::parse("#7F112233"),
            Some(BackgroundColor::new(0x11, 0x22, 0x33, 0x7F))
        );
    }

    #[test]
    fn test_parse_hex_rgb_is_opaque() {
        assert_eq!(
            BackgroundColor::parse("#FF0000"),
            Some(BackgroundColor::new(255, 0, 0, 255))
        );
    }

    #[test]
    fn test_parse_rgba_integer_alpha() {
        assert_eq!(
            BackgroundColor::parse("rgba(10, 20, 30, 128)"),
            Some(BackgroundColor::new(10, 20, 30, 128))
        );
    }

    #[test]
    fn test_parse_rgba_fractional_alpha() {
        assert_eq!(
            BackgroundColor::parse("rgba(10,20,30,0.5)"),
            Some(BackgroundColor::new(10, 20, 30, 128))
        );
        assert_eq!(
            BackgroundColor::parse("RGBA(1, 2, 3, 1.0)"),
            Some(BackgroundColor::new(1, 2, 3, 255))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(BackgroundColor::parse("blue"), None);
        assert_eq!(BackgroundColor::parse("#12345"), None);
        assert_eq!(BackgroundColor::parse("#GG000000"), None);
        assert_eq!(BackgroundColor::parse("rgba(300, 0, 0, 1)"), None);
        assert_eq!(BackgroundColor::parse("rgba(0, 0, 0, 1.5)"), None);
        assert_eq!(BackgroundColor::parse("rgba(0, 0, 0)"), None);
    }

    #[test]
    fn test_css_output_reparses() {
        let color = BackgroundColor::new(12, 34, 56, 78);
        assert_eq!(color.to_css(), "rgba(12, 34, 56, 78)");
        assert_eq!(BackgroundColor::parse(&color.to_css()), Some(color));
    }

    #[test]
    fn test_invalid_color_deserializes_transparent() {
        let color: BackgroundColor = serde_json::from_str("\"not a color\"").unwrap();
        assert_eq!(color, BackgroundColor::TRANSPARENT);
    }

    #[test]
    fn test_opacity_clamps() {
        assert_eq!(Opacity::from_percent(5).percent(), 10);
        assert_eq!(Opacity::from_percent(150).percent(), 100);
        assert_eq!(Opacity::from_fraction(0.0).percent(), 10);
        assert_eq!(Opacity::from_fraction(2.0).percent(), 100);
        assert_eq!(Opacity::from_fraction(f64::NAN).percent(), 10);
        assert_eq!(Opacity::from_fraction(0.8).percent(), 80);
    }

    #[test]
    fn test_opacity_serializes_as_fraction() {
        assert_eq!(serde_json::to_string(&Opacity::from_percent(80)).unwrap(), "0.8");
        let parsed: Opacity = serde_json::from_str("0.35").unwrap();
        assert_eq!(parsed.percent(), 35);
    }
}
