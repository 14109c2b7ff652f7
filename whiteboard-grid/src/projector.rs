//! Global → tile-local coordinate projection.
//!
//! Every tile's measured center is projected back onto the grid axes to
//! find which `tile_side`-pixel window of the global canvas it shows. An
//! atom is addressed to each tile whose window its extent touches, with
//! coordinates re-expressed relative to that window (not clipped).

use whiteboard_core::{PlacedAtom, PROJECTION_TOLERANCE, TILE_SIDE};

use crate::grid::Grid;

/// Where one atom lands on one tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Projection {
    pub col: usize,
    pub row: usize,
    pub local_x: i32,
    /// Baseline, tile-local.
    pub local_y: i32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateProjector {
    tile_side: i32,
    tolerance: f64,
}

impl Default for CoordinateProjector {
    fn default() -> Self {
        Self::new(TILE_SIDE, PROJECTION_TOLERANCE)
    }
}

impl CoordinateProjector {
    pub fn new(tile_side: i32, tolerance: f64) -> Self {
        Self {
            tile_side,
            tolerance,
        }
    }

    pub fn tile_side(&self) -> i32 {
        self.tile_side
    }

    /// All tiles `atom` should be drawn on.
    pub fn project(&self, grid: &Grid, atom: &PlacedAtom) -> Vec<Projection> {
        let side = self.tile_side;
        let origin = grid.origin();
        let (right, down) = (grid.right(), grid.down());

        // Horizontal: pen x to pen x + width. Vertical: ascender above the
        // baseline to descender below it.
        let size = atom.point_size as i32;
        let (x0, x1) = (atom.x, atom.x.saturating_add(atom.width.max(1)));
        let (y0, y1) = (atom.y.saturating_sub(size), atom.y.saturating_add((size / 2).max(1)));

        let mut out = Vec::new();
        for (col, row, tile) in grid.cells() {
            let offset = tile.center - origin;
            let u = offset.dot(&right);
            let v = offset.dot(&down);
            let (ix, iy) = (u.round(), v.round());
            if (u - ix).abs() > self.tolerance || (v - iy).abs() > self.tolerance {
                continue;
            }

            let (wx, wy) = ((ix as i32).saturating_mul(side), (iy as i32).saturating_mul(side));
            let touches =
                x0 < wx.saturating_add(side) && x1 > wx && y0 < wy.saturating_add(side) && y1 > wy;
            if !touches {
                continue;
            }

            out.push(Projection {
                col,
                row,
                local_x: atom.x.saturating_sub(wx),
                local_y: atom.y.saturating_sub(wy),
            });
        }
        out
    }
}
