//! Whiteboard Demo: headless walk through the board lifecycle.
//!
//! Builds a synthetic wall of tiles (with a hole that gets synthesized),
//! establishes a board on it, writes styled text, walks the undo history,
//! and persists the registry. Run with `RUST_LOG=info` to follow along.
//!
//! ```text
//! whiteboard-demo [--fixed] [DATA_DIR]
//! ```
//!
//! `--fixed` swaps system-font shaping for fixed-advance metrics.

use log::info;

use whiteboard_board::{BoardError, BoardRegistry, BoardStore, StoreConfig, TextOutcome, TextRequest};
use whiteboard_core::{BoardConfig, Facing, FontSpec, FontStyle, Rgb, TileId, Vec3, DEFAULT_FONT_FAMILY};
use whiteboard_grid::{Anchor, Candidate, SurfaceProvider};
use whiteboard_text::{CosmicMetrics, FixedAdvanceMetrics, FontMetrics};

const WALL_WIDTH: usize = 3;
const WALL_HEIGHT: usize = 2;

const DOCUMENT: &str = "html: [size 20] [color navy] \
    <h1>Site notes</h1>\
    <p>Meet at the <span color=\"#d03030\">north gate</span> &amp; bring torches.</p>\
    <p><font size=\"75%\">Long paragraphs wrap at tile edges and keep going on the next line \
    until the board runs out.</font></p>";

/// Solid wall one block behind the display plane. A tile can be hung
/// wherever the block behind it is part of the wall rectangle.
struct SyntheticWall {
    origin: Vec3,
    facing: Facing,
    created: Vec<TileId>,
}

impl SyntheticWall {
    fn new(origin: Vec3, facing: Facing) -> Self {
        Self {
            origin,
            facing,
            created: Vec::new(),
        }
    }

    fn supports(&self, center: Vec3) -> bool {
        let normal = self.facing.normal();
        let offset = (center - normal) - self.origin;
        let depth = offset.dot(&normal);
        let col = offset.dot(&self.facing.right_axis()).round();
        let row = offset.dot(&self.facing.down_axis()).round();
        (depth + 1.0).abs() < 0.5
            && (0.0..WALL_WIDTH as f64).contains(&col)
            && (0.0..WALL_HEIGHT as f64).contains(&row)
    }
}

impl SurfaceProvider for SyntheticWall {
    fn place_tile(&mut self, center: Vec3, _facing: Facing) -> Option<TileId> {
        if !self.supports(center) {
            return None;
        }
        let id = TileId::new();
        info!("Placed tile {id} at ({:.1}, {:.1}, {:.1})", center.x, center.y, center.z);
        self.created.push(id);
        Some(id)
    }

    fn release_tile(&mut self, id: TileId) {
        self.created.retain(|t| *t != id);
    }
}

/// Tiles already on the wall: everything except the middle of the top row.
fn existing_tiles(anchor: &Anchor) -> Vec<Candidate> {
    let (right, down) = (anchor.facing.right_axis(), anchor.facing.down_axis());
    let mut candidates = Vec::new();
    for row in 0..WALL_HEIGHT {
        for col in 0..WALL_WIDTH {
            let id = match (col, row) {
                (0, 0) => anchor.id,
                (1, 0) => continue,
                _ => TileId::new(),
            };
            // Reported positions drift slightly.
            let jitter = Vec3::new(0.05 * col as f64, -0.04 * row as f64, 0.0);
            candidates.push(Candidate::new(id, right * col as f64 + down * row as f64 + jitter, anchor.facing));
        }
    }
    candidates
}

fn report(registry: &BoardRegistry) {
    for board in registry.boards() {
        for (index, canvas) in board.canvases().iter().enumerate() {
            let (col, row) = (index % board.grid().width(), index / board.grid().width());
            for p in canvas.placements() {
                info!(
                    "  tile ({col},{row}) @({},{}) {}pt {}: {:?}",
                    p.local_x, p.local_y, p.point_size, p.color, p.text
                );
            }
        }
    }
}

fn session(metrics: &mut dyn FontMetrics, store: &BoardStore) -> Result<(), BoardError> {
    let config = BoardConfig::default();
    let mut registry = BoardRegistry::restore(store, config)?;

    let anchor = Anchor::new(TileId::new(), Vec3::new(12.4, 70.6, -3.2), Facing::East);
    let candidates = existing_tiles(&anchor);
    let mut wall = SyntheticWall::new(anchor.position, anchor.facing);

    let (board_id, synthesized) =
        registry.establish(WALL_WIDTH, WALL_HEIGHT, &anchor, &candidates, &mut wall)?;
    info!("Board {board_id} established, {synthesized} tile(s) synthesized");

    let board = registry.get_mut(board_id)?;
    board.set_locked(false);
    board.set_background(Rgb::parse_or("ivory", Rgb::WHITE));
    board.set_base_font(FontSpec::new(DEFAULT_FONT_FAMILY, FontStyle::Bold));

    if let TextOutcome::Added { action, atoms } =
        board.add_document(metrics, DOCUMENT, &TextRequest::default().at(4, 0))
    {
        info!("Action {action}: {atoms} atom(s) placed");
    }
    if let TextOutcome::Added { action, .. } =
        board.place_atom(metrics, "draft", 12, Rgb::RED, 300, 240)
    {
        info!("Action {action}: stamp placed");
    }

    let undone = board.undo()?;
    info!("Undid {undone}");
    let redone = board.redo()?;
    info!("Redid {redone}");
    board.undo()?;

    let dirty = board.drain_dirty();
    info!("{} tile(s) need repainting: {dirty:?}", dirty.len());
    report(&registry);

    let saved = registry.save_all(store)?;
    info!("Saved {saved} board(s) to {}", store.path().display());
    Ok(())
}

fn main() {
    env_logger::init();

    info!("Starting Whiteboard Demo...");

    let mut fixed = false;
    let mut config = StoreConfig::default();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--fixed" => fixed = true,
            dir => config.path = dir.into(),
        }
    }

    let result = BoardStore::open(config)
        .map_err(BoardError::from)
        .and_then(|store| {
            if fixed {
                session(&mut FixedAdvanceMetrics::default(), &store)
            } else {
                session(&mut CosmicMetrics::new(), &store)
            }
        });

    if let Err(e) = result {
        log::error!("Demo failed: {e}");
        std::process::exit(1);
    }
}
