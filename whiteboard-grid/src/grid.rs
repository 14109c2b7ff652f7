//! The logical W×H tile matrix of one board.
//!
//! A `Grid` is built once (by the resolver, or from persisted state) and
//! never changes shape afterwards. Cell `(0, 0)` is always the anchor tile,
//! and `origin + right × col + down × row` is the theoretical center of
//! cell `(col, row)`.

use rustc_hash::FxHashMap;
use whiteboard_core::{TileId, Vec3};

use crate::error::GeometryError;

/// One physical tile and the world position of its center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileRef {
    pub id: TileId,
    pub center: Vec3,
}

impl TileRef {
    pub fn new(id: TileId, center: Vec3) -> Self {
        Self { id, center }
    }
}

#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    origin: Vec3,
    right: Vec3,
    down: Vec3,
    /// Row-major, `width × height` entries.
    tiles: Vec<TileRef>,
    index: FxHashMap<TileId, usize>,
}

impl Grid {
    /// Assemble a grid from validated parts.
    ///
    /// `tiles` is row-major. Axes must be orthogonal, axis-aligned unit
    /// vectors.
    pub fn from_parts(
        width: usize,
        height: usize,
        origin: Vec3,
        right: Vec3,
        down: Vec3,
        tiles: Vec<TileRef>,
    ) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::InvalidDimensions { width, height });
        }
        let expected = width * height;
        if tiles.len() != expected {
            return Err(GeometryError::TileCountMismatch {
                expected,
                actual: tiles.len(),
            });
        }
        if !right.is_axis_aligned() || !down.is_axis_aligned() || right.dot(&down).abs() > 1e-9 {
            return Err(GeometryError::InvalidAxes);
        }

        let index = tiles
            .iter()
            .enumerate()
            .map(|(i, tile)| (tile.id, i))
            .collect();

        Ok(Self {
            width,
            height,
            origin,
            right,
            down,
            tiles,
            index,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// World position of the anchor tile's center.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn down(&self) -> Vec3 {
        self.down
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tile(&self, col: usize, row: usize) -> Option<&TileRef> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.tiles.get(row * self.width + col)
    }

    /// Cell `(0, 0)`.
    pub fn anchor(&self) -> &TileRef {
        &self.tiles[0]
    }

    /// Row-major tiles.
    pub fn tiles(&self) -> &[TileRef] {
        &self.tiles
    }

    /// `(col, row, tile)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &TileRef)> + '_ {
        let width = self.width;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, tile)| (i % width, i / width, tile))
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.index.contains_key(&id)
    }

    /// Row-major index of `id`.
    pub fn index_of(&self, id: TileId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn cell_of(&self, id: TileId) -> Option<(usize, usize)> {
        self.index_of(id).map(|i| (i % self.width, i / self.width))
    }

    /// Theoretical center of `(col, row)`; defined outside the grid too.
    pub fn cell_center(&self, col: usize, row: usize) -> Vec3 {
        self.origin + self.right * col as f64 + self.down * row as f64
    }

    /// Global canvas width in pixels.
    pub fn canvas_width(&self, tile_side: i32) -> i32 {
        self.width as i32 * tile_side
    }
}
