//! JSON persistence of board geometry.
//!
//! One `<board-id>.json` file per board under the configured directory.
//! Writes go to a temp file first and are renamed into place, so a crash
//! never leaves a half-written board behind. Unreadable files are skipped
//! on load with a warning; one bad file never hides the others.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;
use whiteboard_core::{BoardConfig, BoardId};
use whiteboard_grid::GeometryError;

use crate::board::{Board, BoardState};

const EXTENSION: &str = "json";

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the board files
    pub path: PathBuf,
    /// Pretty-print JSON (default: true)
    pub pretty: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("whiteboard_data"),
            pretty: true,
        }
    }
}

impl StoreConfig {
    /// Config for tests: compact JSON in the given directory.
    pub fn for_testing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: false,
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid board state: {0}")]
    Geometry(#[from] GeometryError),
}

pub struct BoardStore {
    config: StoreConfig,
}

impl BoardStore {
    /// Open (creating if needed) the store directory.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        fs::create_dir_all(&config.path)?;
        Ok(Self { config })
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn file_for(&self, id: BoardId) -> PathBuf {
        self.config.path.join(format!("{id}.{EXTENSION}"))
    }

    pub fn save(&self, state: &BoardState) -> Result<(), StoreError> {
        let json = if self.config.pretty {
            serde_json::to_vec_pretty(state)?
        } else {
            serde_json::to_vec(state)?
        };
        let target = self.file_for(state.id);
        let tmp = target.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &target)?;
        Ok(())
    }

    pub fn load(&self, id: BoardId) -> Result<BoardState, StoreError> {
        let bytes = fs::read(self.file_for(id))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Load and rebuild one board.
    pub fn load_board(&self, id: BoardId, config: BoardConfig) -> Result<Board, StoreError> {
        let state = self.load(id)?;
        Ok(Board::from_state(state, config)?)
    }

    /// Every readable board file, ordered by id.
    pub fn load_all(&self) -> Result<Vec<BoardState>, StoreError> {
        let mut states = Vec::new();
        for (id, path) in self.board_files()? {
            match self.load(id) {
                Ok(state) if state.id == id => states.push(state),
                Ok(state) => log::warn!(
                    "Skipping {}: contains board {}",
                    path.display(),
                    state.id
                ),
                Err(e) => log::warn!("Skipping {}: {e}", path.display()),
            }
        }
        states.sort_by_key(|s| s.id);
        Ok(states)
    }

    /// Ids of every board file on disk, readable or not.
    pub fn ids(&self) -> Result<Vec<BoardId>, StoreError> {
        let mut ids: Vec<BoardId> = self.board_files()?.into_iter().map(|(id, _)| id).collect();
        ids.sort();
        Ok(ids)
    }

    fn board_files(&self) -> Result<Vec<(BoardId, PathBuf)>, StoreError> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.config.path)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            match path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| Uuid::parse_str(s).ok())
            {
                Some(id) => files.push((BoardId(id), path)),
                None => log::warn!("Skipping unexpected file {}", path.display()),
            }
        }
        Ok(files)
    }

    /// Returns whether a file was removed.
    pub fn remove(&self, id: BoardId) -> Result<bool, StoreError> {
        match fs::remove_file(self.file_for(id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
