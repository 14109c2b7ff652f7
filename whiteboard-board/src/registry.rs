//! Index of every live board and the tiles they own.
//!
//! A tile belongs to at most one board. Establishing a board over tiles
//! that already belong to another dissolves the older board first.

use rustc_hash::{FxHashMap, FxHashSet};
use whiteboard_core::{ActionId, BoardConfig, BoardId, TileId};
use whiteboard_grid::{Anchor, Candidate, GridResolver, SurfaceProvider};

use crate::board::Board;
use crate::error::BoardError;
use crate::store::BoardStore;

pub struct BoardRegistry {
    config: BoardConfig,
    boards: FxHashMap<BoardId, Board>,
    tile_index: FxHashMap<TileId, BoardId>,
}

impl Default for BoardRegistry {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl BoardRegistry {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            config,
            boards: FxHashMap::default(),
            tile_index: FxHashMap::default(),
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    pub fn boards(&self) -> impl Iterator<Item = &Board> {
        self.boards.values()
    }

    // ─── Lifecycle ────────────────────────────────────────────────────

    /// Resolve a `width × height` grid around `anchor` and register it as a
    /// new board. Returns the board id and how many tiles were synthesized.
    pub fn establish(
        &mut self,
        width: usize,
        height: usize,
        anchor: &Anchor,
        candidates: &[Candidate],
        provider: &mut dyn SurfaceProvider,
    ) -> Result<(BoardId, usize), BoardError> {
        let resolver = GridResolver::new(width, height)?.with_tolerance(self.config.grid_tolerance);
        let resolved = resolver.establish(anchor, candidates, provider)?;
        let board = Board::new(BoardId::new(), resolved.grid, self.config.clone());
        let id = self.insert(board);
        Ok((id, resolved.synthesized))
    }

    /// Register `board`, dissolving every board that shares a tile with it.
    pub fn insert(&mut self, board: Board) -> BoardId {
        let id = board.id();
        let overlapping: FxHashSet<BoardId> = board
            .grid()
            .tiles()
            .iter()
            .filter_map(|t| self.tile_index.get(&t.id).copied())
            .collect();
        for old in overlapping {
            log::info!("Board {old} overlaps new board {id}; dissolving it");
            self.remove_board(old);
        }

        for tile in board.grid().tiles() {
            self.tile_index.insert(tile.id, id);
        }
        self.boards.insert(id, board);
        id
    }

    pub fn dissolve(&mut self, id: BoardId) -> Result<Board, BoardError> {
        self.remove_board(id).ok_or(BoardError::UnknownBoard(id))
    }

    fn remove_board(&mut self, id: BoardId) -> Option<Board> {
        let board = self.boards.remove(&id)?;
        for tile in board.grid().tiles() {
            if self.tile_index.get(&tile.id) == Some(&id) {
                self.tile_index.remove(&tile.id);
            }
        }
        Some(board)
    }

    // ─── Lookup ───────────────────────────────────────────────────────

    pub fn get(&self, id: BoardId) -> Result<&Board, BoardError> {
        self.boards.get(&id).ok_or(BoardError::UnknownBoard(id))
    }

    pub fn get_mut(&mut self, id: BoardId) -> Result<&mut Board, BoardError> {
        self.boards.get_mut(&id).ok_or(BoardError::UnknownBoard(id))
    }

    pub fn board_for_tile(&self, tile: TileId) -> Option<&Board> {
        self.tile_index.get(&tile).and_then(|id| self.boards.get(id))
    }

    pub fn board_for_tile_mut(&mut self, tile: TileId) -> Option<&mut Board> {
        let id = *self.tile_index.get(&tile)?;
        self.boards.get_mut(&id)
    }

    /// Tile belongs to a locked board.
    pub fn is_protected(&self, tile: TileId) -> bool {
        self.board_for_tile(tile).is_some_and(Board::is_locked)
    }

    // ─── History by tile ──────────────────────────────────────────────

    pub fn undo_at(&mut self, tile: TileId) -> Result<ActionId, BoardError> {
        let board = self
            .board_for_tile_mut(tile)
            .ok_or(BoardError::NoBoardAtTile(tile))?;
        Ok(board.undo()?)
    }

    pub fn redo_at(&mut self, tile: TileId) -> Result<ActionId, BoardError> {
        let board = self
            .board_for_tile_mut(tile)
            .ok_or(BoardError::NoBoardAtTile(tile))?;
        Ok(board.redo()?)
    }

    // ─── Persistence ──────────────────────────────────────────────────

    /// Write every board and delete the files of boards no longer
    /// registered. Returns how many were saved.
    pub fn save_all(&self, store: &BoardStore) -> Result<usize, BoardError> {
        for board in self.boards.values() {
            store.save(&board.state())?;
        }
        for id in store.ids()? {
            if !self.boards.contains_key(&id) && store.remove(id)? {
                log::info!("Removed stored board {id}: no longer registered");
            }
        }
        Ok(self.boards.len())
    }

    /// Rebuild a registry from `store`. Invalid boards are skipped.
    pub fn restore(store: &BoardStore, config: BoardConfig) -> Result<Self, BoardError> {
        let mut registry = Self::new(config);
        for state in store.load_all()? {
            let id = state.id;
            match Board::from_state(state, registry.config.clone()) {
                Ok(board) => {
                    registry.insert(board);
                }
                Err(e) => log::warn!("Skipping stored board {id}: {e}"),
            }
        }
        log::info!("Restored {} boards from {}", registry.len(), store.path().display());
        Ok(registry)
    }
}
