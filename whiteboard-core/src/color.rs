//! 24-bit colors and the lenient color parser used by text requests and
//! markup attributes.
//!
//! Accepted forms:
//! - `#rgb` / `#rrggbb` (the `#` is optional)
//! - CSS named colors (`red`, `light gray`, ...)
//! - `rgb(r, g, b)` with integer or percent components
//!
//! Named and functional forms go through `csscolorparser`; alpha is dropped.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Opaque RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
    pub const RED: Rgb = Rgb::new(0xFF, 0x00, 0x00);
    pub const GREEN: Rgb = Rgb::new(0x00, 0x80, 0x00);
    pub const BLUE: Rgb = Rgb::new(0x00, 0x00, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub const fn from_u32(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xFF) as u8,
            g: ((packed >> 8) & 0xFF) as u8,
            b: (packed & 0xFF) as u8,
        }
    }

    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Parse `#rgb` / `#rrggbb`, with or without the leading `#`.
    pub fn parse_hex(raw: &str) -> Option<Rgb> {
        let trimmed = raw.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return None,
        };
        u32::from_str_radix(&expanded, 16).ok().map(Rgb::from_u32)
    }

    /// Parse any accepted color form. Returns `None` when nothing matches.
    pub fn parse_css(raw: &str) -> Option<Rgb> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Some(hex) = Rgb::parse_hex(trimmed) {
            return Some(hex);
        }
        // "light gray" and "rgb( 1, 2, 3 )" both normalise by dropping spaces.
        let normalized: String = trimmed
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        let parsed: csscolorparser::Color = normalized.parse().ok()?;
        let [r, g, b, _alpha] = parsed.to_rgba8();
        Some(Rgb::new(r, g, b))
    }

    /// Parse, falling back to `fallback` on failure.
    pub fn parse_or(raw: &str, fallback: Rgb) -> Rgb {
        Rgb::parse_css(raw).unwrap_or(fallback)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Color parse failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Empty color value")]
    Empty,
    #[error("Unrecognized color: {0}")]
    Unrecognized(String),
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ColorParseError::Empty);
        }
        Rgb::parse_css(s).ok_or_else(|| ColorParseError::Unrecognized(s.to_string()))
    }
}
