//! Board-wide tunables.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::font::FontSpec;

/// Side of one tile's canvas in pixels.
pub const TILE_SIDE: i32 = 128;

/// Max rounding residual (grid units) when matching candidate tiles to cells.
pub const GRID_TOLERANCE: f64 = 0.60;

/// Max rounding residual (grid units) when addressing atoms to tiles.
pub const PROJECTION_TOLERANCE: f64 = 0.75;

/// Inclusive integer range used for clamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clamp {
    pub min: i32,
    pub max: i32,
}

impl Clamp {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn apply(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }
}

/// Configuration shared by every board in a registry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Tile canvas side in pixels (default: 128)
    pub tile_side: i32,
    /// Orientation resolver tolerance (default: 0.60)
    pub grid_tolerance: f64,
    /// Atom projection tolerance (default: 0.75)
    pub projection_tolerance: f64,
    /// Point size used when a request gives none (default: 16)
    pub default_point_size: u32,
    /// Text color used when a request gives none (default: black)
    pub default_color: Rgb,
    /// Background of freshly established boards (default: white)
    pub default_background: Rgb,
    /// Base font of freshly established boards
    pub default_font: FontSpec,
    /// Clamp for request-level point sizes (default: 8..=64)
    pub request_size: Clamp,
    /// Clamp for sizes derived inside markup (default: 8..=256)
    pub markup_size: Clamp,
    /// Clamp for line heights (default: 8..=256)
    pub line_height: Clamp,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            tile_side: TILE_SIDE,
            grid_tolerance: GRID_TOLERANCE,
            projection_tolerance: PROJECTION_TOLERANCE,
            default_point_size: 16,
            default_color: Rgb::BLACK,
            default_background: Rgb::WHITE,
            default_font: FontSpec::default(),
            request_size: Clamp::new(8, 64),
            markup_size: Clamp::new(8, 256),
            line_height: Clamp::new(8, 256),
        }
    }
}

impl BoardConfig {
    /// Parse from JSON; missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp a request-level point size.
    pub fn clamp_request_size(&self, size: u32) -> u32 {
        self.request_size.apply(size.min(i32::MAX as u32) as i32) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = BoardConfig::default();
        assert_eq!(cfg.tile_side, 128);
        assert_eq!(cfg.grid_tolerance, 0.60);
        assert_eq!(cfg.projection_tolerance, 0.75);
        assert_eq!(cfg.default_point_size, 16);
        assert_eq!(cfg.default_color, Rgb::BLACK);
        assert_eq!(cfg.default_background, Rgb::WHITE);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg = BoardConfig::from_json(r#"{ "default_point_size": 24 }"#).unwrap();
        assert_eq!(cfg.default_point_size, 24);
        assert_eq!(cfg.tile_side, 128);
        assert_eq!(cfg.line_height, Clamp::new(8, 256));
    }

    #[test]
    fn test_json_round_trip() {
        let cfg = BoardConfig {
            default_color: Rgb::RED,
            ..Default::default()
        };
        let back = BoardConfig::from_json(&cfg.to_json().unwrap()).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_request_clamp() {
        let cfg = BoardConfig::default();
        assert_eq!(cfg.clamp_request_size(2), 8);
        assert_eq!(cfg.clamp_request_size(20), 20);
        assert_eq!(cfg.clamp_request_size(500), 64);
    }
}
