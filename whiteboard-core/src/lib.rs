//! # whiteboard-core
//!
//! Value types shared by every whiteboard crate: world geometry, colors,
//! fonts, identifiers, placed text atoms, the per-tile content store and
//! board configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub mod color;
pub mod config;
pub mod font;
pub mod geometry;
pub mod tile;

pub use color::{ColorParseError, Rgb};
pub use config::{BoardConfig, Clamp, GRID_TOLERANCE, PROJECTION_TOLERANCE, TILE_SIDE};
pub use font::{FontSpec, FontStyle, DEFAULT_FONT_FAMILY};
pub use geometry::{Facing, Vec3};
pub use tile::{TileCanvas, TilePlacement};

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

uuid_id!(
    /// Opaque handle of one physical display tile.
    TileId
);
uuid_id!(
    /// Identity of one logical board (grid group).
    BoardId
);
uuid_id!(
    /// Identity of one undoable user edit.
    ActionId
);

/// One indivisible fragment of text placed in the board's global
/// coordinate space (`x` grows right across tiles, `y` is the baseline
/// and grows down without bound).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedAtom {
    pub text: String,
    pub color: Rgb,
    pub point_size: u32,
    pub x: i32,
    pub y: i32,
    /// Measured pixel width of `text`.
    pub width: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = ActionId::new();
        let b = ActionId::new();
        assert_ne!(a, b);
        assert_ne!(TileId::new(), TileId::new());
    }

    #[test]
    fn test_id_serializes_as_plain_uuid() {
        let id = BoardId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.0));
        let back: BoardId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_atom_structure() {
        let atom = PlacedAtom {
            text: "Hi".into(),
            color: Rgb::RED,
            point_size: 16,
            x: 10,
            y: 20,
            width: 14,
        };
        assert_eq!(atom.clone(), atom);
        assert_eq!(atom.point_size, 16);
    }
}
