//! Per-tile content store.
//!
//! A `TileCanvas` is what the external renderer reads: background, base
//! font, and the list of text placements addressed to this tile. Every
//! mutation raises the dirty flag; the render tick drains it.

use crate::color::Rgb;
use crate::font::FontSpec;
use crate::{ActionId, TileId};

/// One piece of text stored on one tile, in tile-local pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TilePlacement {
    pub tile_col: usize,
    pub tile_row: usize,
    pub local_x: i32,
    /// Baseline, tile-local.
    pub local_y: i32,
    pub text: String,
    pub color: Rgb,
    pub point_size: u32,
    /// Action that created this placement; `None` for unlogged content.
    pub action_id: Option<ActionId>,
}

#[derive(Clone, Debug)]
pub struct TileCanvas {
    id: TileId,
    background: Rgb,
    base_font: FontSpec,
    placements: Vec<TilePlacement>,
    dirty: bool,
}

impl TileCanvas {
    pub fn new(id: TileId, background: Rgb, base_font: FontSpec) -> Self {
        Self {
            id,
            background,
            base_font,
            placements: Vec::new(),
            dirty: true,
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn set_background(&mut self, color: Rgb) {
        self.background = color;
        self.dirty = true;
    }

    pub fn base_font(&self) -> &FontSpec {
        &self.base_font
    }

    pub fn set_base_font(&mut self, font: FontSpec) {
        self.base_font = font;
        self.dirty = true;
    }

    pub fn placements(&self) -> &[TilePlacement] {
        &self.placements
    }

    pub fn append(&mut self, placement: TilePlacement) {
        self.placements.push(placement);
        self.dirty = true;
    }

    /// Drop every placement. Returns how many were removed.
    pub fn clear_texts(&mut self) -> usize {
        let removed = self.placements.len();
        self.placements.clear();
        self.dirty = true;
        removed
    }

    /// Drop the placements created by `action`. Returns how many were removed.
    pub fn remove_by_action(&mut self, action: ActionId) -> usize {
        let before = self.placements.len();
        self.placements.retain(|p| p.action_id != Some(action));
        let removed = before - self.placements.len();
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and reset the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(text: &str, action: Option<ActionId>) -> TilePlacement {
        TilePlacement {
            tile_col: 0,
            tile_row: 0,
            local_x: 0,
            local_y: 16,
            text: text.into(),
            color: Rgb::BLACK,
            point_size: 16,
            action_id: action,
        }
    }

    fn canvas() -> TileCanvas {
        TileCanvas::new(TileId::new(), Rgb::WHITE, FontSpec::default())
    }

    #[test]
    fn test_new_canvas_is_dirty() {
        let mut c = canvas();
        assert!(c.take_dirty());
        assert!(!c.is_dirty());
    }

    #[test]
    fn test_remove_by_action_only_touches_matching() {
        let mut c = canvas();
        let a = ActionId::new();
        let b = ActionId::new();
        c.append(placement("a1", Some(a)));
        c.append(placement("b1", Some(b)));
        c.append(placement("a2", Some(a)));
        c.append(placement("free", None));
        c.take_dirty();

        assert_eq!(c.remove_by_action(a), 2);
        assert!(c.is_dirty());
        let texts: Vec<_> = c.placements().iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["b1", "free"]);
    }

    #[test]
    fn test_remove_unknown_action_keeps_clean() {
        let mut c = canvas();
        c.append(placement("x", Some(ActionId::new())));
        c.take_dirty();
        assert_eq!(c.remove_by_action(ActionId::new()), 0);
        assert!(!c.is_dirty());
    }

    #[test]
    fn test_clear_keeps_background() {
        let mut c = canvas();
        c.append(placement("x", None));
        c.set_background(Rgb::RED);
        c.take_dirty();
        assert_eq!(c.clear_texts(), 1);
        assert!(c.is_dirty());
        assert_eq!(c.background(), Rgb::RED);
        assert!(c.placements().is_empty());
    }
}
