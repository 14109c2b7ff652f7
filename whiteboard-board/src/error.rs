use thiserror::Error;
use whiteboard_core::{BoardId, TileId};
use whiteboard_grid::GeometryError;

use crate::history::HistoryError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
    #[error("History error: {0}")]
    History(#[from] HistoryError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Board not found: {0}")]
    UnknownBoard(BoardId),
    #[error("Tile {0} does not belong to any board")]
    NoBoardAtTile(TileId),
}
