//! Grid orientation resolver.
//!
//! Given an anchor tile and nearby candidate tiles (offsets measured from
//! the anchor), figure out which physical tile sits in which logical cell.
//! The wall facing fixes the plane; the four sign combinations of the base
//! right/down axes are tried in canonical order and the one that fills the
//! most cells wins (first found on ties). Empty cells are then filled
//! through a [`SurfaceProvider`], all-or-nothing.

use whiteboard_core::{Facing, TileId, Vec3, GRID_TOLERANCE};

use crate::error::GeometryError;
use crate::grid::{Grid, TileRef};

/// The tile the user started from. Becomes cell `(0, 0)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub id: TileId,
    pub position: Vec3,
    pub facing: Facing,
}

impl Anchor {
    /// `position` is snapped to the center of its block.
    pub fn new(id: TileId, position: Vec3, facing: Facing) -> Self {
        Self {
            id,
            position: position.snapped_to_block_center(),
            facing,
        }
    }
}

/// A nearby tile that may belong to the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub id: TileId,
    /// World offset from the anchor's position.
    pub offset: Vec3,
    pub facing: Facing,
}

impl Candidate {
    pub fn new(id: TileId, offset: Vec3, facing: Facing) -> Self {
        Self { id, offset, facing }
    }

    /// Build from an absolute world position, snapped to its block center.
    pub fn at(id: TileId, position: Vec3, facing: Facing, anchor: &Anchor) -> Self {
        Self::new(id, position.snapped_to_block_center() - anchor.position, facing)
    }
}

/// Creates or finds tiles for cells nobody occupies yet.
pub trait SurfaceProvider {
    /// A tile centered at `center` facing `facing`, or `None` when there is
    /// no supporting surface behind that point.
    fn place_tile(&mut self, center: Vec3, facing: Facing) -> Option<TileId>;

    /// Undo a `place_tile` made during an establish that later failed.
    fn release_tile(&mut self, _id: TileId) {}
}

/// Result of evaluating one axis pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Orientation {
    pub right: Vec3,
    pub down: Vec3,
    /// Row-major; `None` for cells no candidate landed in.
    pub cells: Vec<Option<TileRef>>,
    pub filled: usize,
}

impl Orientation {
    pub fn missing(&self, width: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(move |(i, _)| (i % width, i / width))
    }
}

/// Established grid plus how many tiles had to be created for it.
#[derive(Clone, Debug)]
pub struct Resolved {
    pub grid: Grid,
    pub synthesized: usize,
}

#[derive(Clone, Copy, Debug)]
pub struct GridResolver {
    width: usize,
    height: usize,
    tolerance: f64,
}

impl GridResolver {
    pub fn new(width: usize, height: usize) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            tolerance: GRID_TOLERANCE,
        })
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(+r,+d), (+r,-d), (-r,+d), (-r,-d)` for the facing's base axes.
    pub fn orientations(facing: Facing) -> [(Vec3, Vec3); 4] {
        let r = facing.right_axis();
        let d = facing.down_axis();
        [(r, d), (r, -d), (-r, d), (-r, -d)]
    }

    /// Pick the best orientation without touching any surface.
    pub fn resolve_orientation(
        &self,
        anchor: &Anchor,
        candidates: &[Candidate],
    ) -> Result<Orientation, GeometryError> {
        let candidates = self.usable_candidates(anchor, candidates);
        let mut best: Option<Orientation> = None;

        for (i, (right, down)) in Self::orientations(anchor.facing).into_iter().enumerate() {
            match self.evaluate(right, down, anchor, &candidates) {
                Some(orientation) => {
                    log::debug!(
                        "Orientation #{i} fills {}/{} cells",
                        orientation.filled,
                        orientation.cells.len()
                    );
                    if best.as_ref().map_or(true, |b| orientation.filled > b.filled) {
                        best = Some(orientation);
                    }
                }
                None => log::debug!("Orientation #{i} rejected: anchor not at (0, 0)"),
            }
        }

        best.ok_or(GeometryError::NoValidOrientation)
    }

    /// Resolve the orientation, fill missing cells via `provider`, and
    /// build the grid. On failure every tile created here is released.
    pub fn establish(
        &self,
        anchor: &Anchor,
        candidates: &[Candidate],
        provider: &mut dyn SurfaceProvider,
    ) -> Result<Resolved, GeometryError> {
        let orientation = self.resolve_orientation(anchor, candidates)?;
        let Orientation {
            right, down, cells, ..
        } = orientation;

        let mut created: Vec<TileId> = Vec::new();
        let mut tiles = Vec::with_capacity(cells.len());

        for (i, cell) in cells.into_iter().enumerate() {
            if let Some(tile) = cell {
                tiles.push(tile);
                continue;
            }
            let (col, row) = (i % self.width, i / self.width);
            let center = anchor.position + right * col as f64 + down * row as f64;
            match provider.place_tile(center, anchor.facing) {
                Some(id) => {
                    created.push(id);
                    tiles.push(TileRef::new(id, center));
                }
                None => {
                    log::warn!(
                        "No supporting surface for cell ({col}, {row}); releasing {} tiles",
                        created.len()
                    );
                    for id in created {
                        provider.release_tile(id);
                    }
                    return Err(GeometryError::CellUnfillable { col, row });
                }
            }
        }

        let grid = match Grid::from_parts(self.width, self.height, anchor.position, right, down, tiles) {
            Ok(grid) => grid,
            Err(err) => {
                for id in created {
                    provider.release_tile(id);
                }
                return Err(err);
            }
        };

        log::info!(
            "Established {}x{} grid (right={:?}, down={:?}), synthesized {} tiles",
            self.width,
            self.height,
            right,
            down,
            created.len()
        );

        Ok(Resolved {
            grid,
            synthesized: created.len(),
        })
    }

    /// Same-facing candidates; the anchor is added at offset zero when
    /// the list does not contain it.
    fn usable_candidates(&self, anchor: &Anchor, candidates: &[Candidate]) -> Vec<Candidate> {
        let mut usable: Vec<Candidate> = candidates
            .iter()
            .filter(|c| c.facing == anchor.facing)
            .copied()
            .collect();
        if !usable.iter().any(|c| c.id == anchor.id) {
            usable.insert(0, Candidate::new(anchor.id, Vec3::ZERO, anchor.facing));
        }
        usable
    }

    fn evaluate(
        &self,
        right: Vec3,
        down: Vec3,
        anchor: &Anchor,
        candidates: &[Candidate],
    ) -> Option<Orientation> {
        // (tile, squared distance from the theoretical cell center)
        let mut cells: Vec<Option<(TileRef, f64)>> = vec![None; self.width * self.height];

        for candidate in candidates {
            let u = candidate.offset.dot(&right);
            let v = candidate.offset.dot(&down);
            let (ix, iy) = (u.round(), v.round());
            if (u - ix).abs() > self.tolerance || (v - iy).abs() > self.tolerance {
                continue;
            }
            if ix < 0.0 || iy < 0.0 || ix >= self.width as f64 || iy >= self.height as f64 {
                continue;
            }

            let expected = right * ix + down * iy;
            let error = candidate.offset.distance_squared(&expected);
            let slot = &mut cells[iy as usize * self.width + ix as usize];
            if slot.as_ref().map_or(true, |(_, best)| error < *best) {
                let tile = TileRef::new(candidate.id, anchor.position + candidate.offset);
                *slot = Some((tile, error));
            }
        }

        match &cells[0] {
            Some((tile, _)) if tile.id == anchor.id => {}
            _ => return None,
        }

        let cells: Vec<Option<TileRef>> = cells.into_iter().map(|c| c.map(|(t, _)| t)).collect();
        let filled = cells.iter().filter(|c| c.is_some()).count();
        Some(Orientation {
            right,
            down,
            cells,
            filled,
        })
    }
}
