//! # whiteboard-board
//!
//! Boards as the rest of the system sees them: a resolved grid, one
//! content canvas per tile, linear undo/redo, and a registry that maps
//! tiles back to the board that owns them.
//!
//! - **`board`**: `Board`: text requests, history, whole-board edits.
//! - **`history`**: `ActionLog`: undo/redo stacks of action groups.
//! - **`registry`**: `BoardRegistry`: boards by id, tiles → board.
//! - **`store`**: `BoardStore`: one JSON file per board.

pub mod board;
pub mod error;
pub mod history;
pub mod registry;
pub mod store;

pub use board::{Board, BoardState, TextOutcome, TextRequest};
pub use error::BoardError;
pub use history::{ActionGroup, ActionLog, HistoryError};
pub use registry::BoardRegistry;
pub use store::{BoardStore, StoreConfig, StoreError};
