//! One logical board: a grid, one canvas per tile, and its edit history.
//!
//! Text requests run the whole pipeline synchronously:
//!
//! ```text
//! TextRequest ─► MarkupTokenizer ─► LineLayoutEngine ─► [PlacedAtom]
//!                                                           │
//!                       ActionLog ◄── ActionGroup ◄─────────┤
//!                                                           ▼
//!                   TileCanvas[col,row] ◄── CoordinateProjector
//! ```

use serde::{Deserialize, Serialize};
use whiteboard_core::{
    ActionId, BoardConfig, BoardId, FontSpec, PlacedAtom, Rgb, TileCanvas, TileId, TilePlacement,
    Vec3,
};
use whiteboard_grid::{CoordinateProjector, GeometryError, Grid, TileRef};
use whiteboard_text::{
    parse_directives, resolve_line_height, FontMetrics, LayoutOptions, LineLayoutEngine,
    MarkupMode, MarkupTokenizer, TextStyle,
};

use crate::history::{ActionLog, HistoryError};

/// A text edit as the user asked for it. Unset fields fall back to the
/// board configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRequest {
    pub text: String,
    pub mode: MarkupMode,
    pub point_size: Option<u32>,
    pub color: Option<Rgb>,
    /// Pen start in global pixels.
    pub origin: (i32, i32),
    pub line_height: Option<i32>,
}

impl Default for TextRequest {
    fn default() -> Self {
        Self {
            text: String::new(),
            mode: MarkupMode::Markup,
            point_size: None,
            color: None,
            origin: (0, 0),
            line_height: None,
        }
    }
}

impl TextRequest {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: MarkupMode::Plain,
            ..Default::default()
        }
    }

    pub fn markup(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: MarkupMode::Markup,
            ..Default::default()
        }
    }

    pub fn with_size(mut self, point_size: u32) -> Self {
        self.point_size = Some(point_size);
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.origin = (x, y);
        self
    }

    pub fn with_line_height(mut self, line_height: i32) -> Self {
        self.line_height = Some(line_height);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextOutcome {
    /// Stored as one undoable action.
    Added { action: ActionId, atoms: usize },
    /// Nothing renderable; the board was not touched.
    Nothing,
}

/// Everything needed to rebuild a board after a restart. Text is not
/// persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardState {
    pub id: BoardId,
    pub width: usize,
    pub height: usize,
    pub origin: Vec3,
    pub right: Vec3,
    pub down: Vec3,
    /// Row-major tile ids.
    pub tiles: Vec<TileId>,
    /// Row-major tile centers, aligned with `tiles`.
    pub centers: Vec<Vec3>,
    pub locked: bool,
    pub background: Rgb,
    pub base_font: FontSpec,
}

pub struct Board {
    id: BoardId,
    grid: Grid,
    /// Row-major, aligned with `grid.tiles()`.
    canvases: Vec<TileCanvas>,
    history: ActionLog,
    locked: bool,
    config: BoardConfig,
    projector: CoordinateProjector,
}

impl Board {
    /// Fresh board: locked, default background and font, empty history.
    pub fn new(id: BoardId, grid: Grid, config: BoardConfig) -> Self {
        let canvases = grid
            .tiles()
            .iter()
            .map(|tile| TileCanvas::new(tile.id, config.default_background, config.default_font.clone()))
            .collect();
        let projector = CoordinateProjector::new(config.tile_side, config.projection_tolerance);
        Self {
            id,
            grid,
            canvases,
            history: ActionLog::new(),
            locked: true,
            config,
            projector,
        }
    }

    pub fn id(&self) -> BoardId {
        self.id
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn history(&self) -> &ActionLog {
        &self.history
    }

    pub fn canvases(&self) -> &[TileCanvas] {
        &self.canvases
    }

    pub fn canvas(&self, col: usize, row: usize) -> Option<&TileCanvas> {
        if col >= self.grid.width() || row >= self.grid.height() {
            return None;
        }
        self.canvases.get(row * self.grid.width() + col)
    }

    pub fn canvas_for(&self, tile: TileId) -> Option<&TileCanvas> {
        self.grid.index_of(tile).and_then(|i| self.canvases.get(i))
    }

    /// Global canvas width in pixels.
    pub fn canvas_width(&self) -> i32 {
        self.grid.canvas_width(self.config.tile_side)
    }

    /// Font used for measuring: the first tile's base font.
    pub fn base_font(&self) -> FontSpec {
        self.canvases
            .first()
            .map(|c| c.base_font().clone())
            .unwrap_or_else(|| self.config.default_font.clone())
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    // ─── Whole-board edits ────────────────────────────────────────────

    /// Returns the number of tiles touched.
    pub fn set_background(&mut self, color: Rgb) -> usize {
        for canvas in &mut self.canvases {
            canvas.set_background(color);
        }
        self.canvases.len()
    }

    pub fn set_base_font(&mut self, font: FontSpec) -> usize {
        for canvas in &mut self.canvases {
            canvas.set_base_font(font.clone());
        }
        self.canvases.len()
    }

    /// Remove all text and forget the history. Background is kept.
    pub fn clear(&mut self) -> usize {
        for canvas in &mut self.canvases {
            canvas.clear_texts();
        }
        self.history.clear();
        log::debug!("Cleared board {}", self.id);
        self.canvases.len()
    }

    // ─── Text ─────────────────────────────────────────────────────────

    /// Tokenize and lay out `request` without touching the board.
    pub fn layout<M: FontMetrics + ?Sized>(
        &self,
        metrics: &mut M,
        request: &TextRequest,
    ) -> Vec<PlacedAtom> {
        let cfg = &self.config;
        let point_size = cfg.clamp_request_size(request.point_size.unwrap_or(cfg.default_point_size));
        let color = request.color.unwrap_or(cfg.default_color);
        let line_height = resolve_line_height(request.line_height, point_size, cfg.line_height);

        let tokens = MarkupTokenizer::with_size_clamp(cfg.markup_size).tokenize(
            &request.text,
            request.mode,
            TextStyle::new(color, point_size),
        );
        let options = LayoutOptions::new(
            request.origin.0,
            request.origin.1,
            self.canvas_width(),
            line_height,
        );
        LineLayoutEngine::new(metrics, self.base_font()).layout(&tokens, &options)
    }

    /// Lay out and store `request` as one undoable action.
    pub fn add_text<M: FontMetrics + ?Sized>(
        &mut self,
        metrics: &mut M,
        request: &TextRequest,
    ) -> TextOutcome {
        let atoms = self.layout(metrics, request);
        self.commit(atoms)
    }

    /// Apply header directives from `raw` over `defaults`, then add it.
    pub fn add_document<M: FontMetrics + ?Sized>(
        &mut self,
        metrics: &mut M,
        raw: &str,
        defaults: &TextRequest,
    ) -> TextOutcome {
        let directives = parse_directives(raw);
        if directives.clear_before {
            self.clear();
        }
        let request = TextRequest {
            text: directives.content,
            mode: directives.mode.unwrap_or(defaults.mode),
            point_size: directives
                .point_size
                .map(|size| size.max(0) as u32)
                .or(defaults.point_size),
            color: directives.color.or(defaults.color),
            origin: directives.origin.unwrap_or(defaults.origin),
            line_height: directives.line_height.or(defaults.line_height),
        };
        self.add_text(metrics, &request)
    }

    /// Place `text` as a single unwrapped atom with its own action.
    pub fn place_atom<M: FontMetrics + ?Sized>(
        &mut self,
        metrics: &mut M,
        text: &str,
        point_size: u32,
        color: Rgb,
        x: i32,
        y: i32,
    ) -> TextOutcome {
        if text.trim().is_empty() {
            return TextOutcome::Nothing;
        }
        let point_size = self.config.clamp_request_size(point_size);
        let width = metrics.text_width(&self.base_font(), point_size, text);
        self.commit(vec![PlacedAtom {
            text: text.to_string(),
            color,
            point_size,
            x,
            y,
            width,
        }])
    }

    fn commit(&mut self, atoms: Vec<PlacedAtom>) -> TextOutcome {
        if atoms.is_empty() {
            return TextOutcome::Nothing;
        }
        let action = self.history.record(atoms);
        let atoms = self.history.peek_undo().map(|group| group.atoms.as_slice()).unwrap_or_default();
        let stored = store_atoms(&self.grid, &self.projector, &mut self.canvases, action, atoms);
        log::debug!(
            "Action {action} on board {}: {} atoms, {stored} placements",
            self.id,
            atoms.len()
        );
        TextOutcome::Added {
            action,
            atoms: atoms.len(),
        }
    }

    // ─── History ──────────────────────────────────────────────────────

    /// Revert the newest action on every tile.
    pub fn undo(&mut self) -> Result<ActionId, HistoryError> {
        let action = self.history.undo()?.id;
        let removed: usize = self
            .canvases
            .iter_mut()
            .map(|canvas| canvas.remove_by_action(action))
            .sum();
        log::debug!("Undo {action} on board {}: removed {removed} placements", self.id);
        Ok(action)
    }

    /// Re-apply the newest undone action.
    pub fn redo(&mut self) -> Result<ActionId, HistoryError> {
        let group = self.history.redo()?;
        let stored = store_atoms(&self.grid, &self.projector, &mut self.canvases, group.id, &group.atoms);
        log::debug!("Redo {} on board {}: {stored} placements", group.id, self.id);
        Ok(group.id)
    }

    // ─── Render tick ──────────────────────────────────────────────────

    /// Cells changed since the last call. Clears their dirty flags.
    pub fn drain_dirty(&mut self) -> Vec<(usize, usize)> {
        let width = self.grid.width();
        self.canvases
            .iter_mut()
            .enumerate()
            .filter_map(|(i, canvas)| canvas.take_dirty().then_some((i % width, i / width)))
            .collect()
    }

    // ─── Persistence ──────────────────────────────────────────────────

    pub fn state(&self) -> BoardState {
        let first = self.canvases.first();
        BoardState {
            id: self.id,
            width: self.grid.width(),
            height: self.grid.height(),
            origin: self.grid.origin(),
            right: self.grid.right(),
            down: self.grid.down(),
            tiles: self.grid.tiles().iter().map(|t| t.id).collect(),
            centers: self.grid.tiles().iter().map(|t| t.center).collect(),
            locked: self.locked,
            background: first.map_or(self.config.default_background, |c| c.background()),
            base_font: self.base_font(),
        }
    }

    /// Rebuild from persisted state. History starts empty.
    pub fn from_state(state: BoardState, config: BoardConfig) -> Result<Self, GeometryError> {
        if state.tiles.len() != state.centers.len() {
            return Err(GeometryError::TileCountMismatch {
                expected: state.tiles.len(),
                actual: state.centers.len(),
            });
        }
        let tiles = state
            .tiles
            .iter()
            .zip(&state.centers)
            .map(|(id, center)| TileRef::new(*id, *center))
            .collect();
        let grid = Grid::from_parts(state.width, state.height, state.origin, state.right, state.down, tiles)?;

        let mut board = Board::new(state.id, grid, config);
        board.set_background(state.background);
        board.set_base_font(state.base_font);
        board.locked = state.locked;
        Ok(board)
    }
}

/// Project `atoms` and append the placements to their tiles.
fn store_atoms(
    grid: &Grid,
    projector: &CoordinateProjector,
    canvases: &mut [TileCanvas],
    action: ActionId,
    atoms: &[PlacedAtom],
) -> usize {
    let width = grid.width();
    let mut stored = 0;
    for atom in atoms {
        for p in projector.project(grid, atom) {
            let Some(canvas) = canvases.get_mut(p.row * width + p.col) else {
                continue;
            };
            canvas.append(TilePlacement {
                tile_col: p.col,
                tile_row: p.row,
                local_x: p.local_x,
                local_y: p.local_y,
                text: atom.text.clone(),
                color: atom.color,
                point_size: atom.point_size,
                action_id: Some(action),
            });
            stored += 1;
        }
    }
    stored
}
