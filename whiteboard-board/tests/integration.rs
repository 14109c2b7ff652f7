//! End-to-end tests: establish a board on a synthetic wall, write text
//! through the full markup → layout → projection pipeline, walk the
//! history, and persist the registry.

use whiteboard_board::{
    BoardError, BoardRegistry, BoardStore, StoreConfig, TextOutcome, TextRequest,
};
use whiteboard_core::{BoardConfig, Facing, Rgb, TileId, TilePlacement, Vec3};
use whiteboard_grid::{Anchor, Candidate, GeometryError, SurfaceProvider};
use whiteboard_text::FixedAdvanceMetrics;

/// Wall of block positions that can host a tile; records what it created.
struct Wall {
    supported: Vec<Vec3>,
    created: Vec<TileId>,
    released: Vec<TileId>,
}

impl Wall {
    fn new(supported: Vec<Vec3>) -> Self {
        Self {
            supported,
            created: Vec::new(),
            released: Vec::new(),
        }
    }
}

impl SurfaceProvider for Wall {
    fn place_tile(&mut self, center: Vec3, _facing: Facing) -> Option<TileId> {
        self.supported
            .iter()
            .any(|p| p.distance_squared(&center) < 1e-6)
            .then(|| {
                let id = TileId::new();
                self.created.push(id);
                id
            })
    }

    fn release_tile(&mut self, id: TileId) {
        self.released.push(id);
    }
}

/// South-facing wall whose visual "right" runs toward -X, with the given
/// cells already hosting tiles. Returns the anchor, candidates, and ids.
fn south_wall(width: usize, height: usize, present: &[(usize, usize)]) -> (Anchor, Vec<Candidate>, Vec<TileId>) {
    let facing = Facing::South;
    let anchor = Anchor::new(TileId::new(), Vec3::new(-20.3, 71.9, 5.0), facing);
    let (right, down) = (facing.right_axis(), facing.down_axis());

    let mut ids = Vec::new();
    let mut candidates = Vec::new();
    for &(col, row) in present {
        assert!(col < width && row < height);
        let id = if (col, row) == (0, 0) { anchor.id } else { TileId::new() };
        ids.push(id);
        candidates.push(Candidate::new(id, right * col as f64 + down * row as f64, facing));
    }
    (anchor, candidates, ids)
}

fn all_cells(width: usize, height: usize) -> Vec<(usize, usize)> {
    (0..height)
        .flat_map(|row| (0..width).map(move |col| (col, row)))
        .collect()
}

fn snapshot(registry: &BoardRegistry, tile: TileId) -> Vec<Vec<TilePlacement>> {
    registry
        .board_for_tile(tile)
        .unwrap()
        .canvases()
        .iter()
        .map(|c| c.placements().to_vec())
        .collect()
}

#[test]
fn test_markup_wraps_across_tiles_and_undoes() {
    let mut registry = BoardRegistry::default();
    let (anchor, candidates, _) = south_wall(2, 2, &all_cells(2, 2));
    let (board_id, synthesized) = registry
        .establish(2, 2, &anchor, &candidates, &mut Wall::new(vec![]))
        .unwrap();
    assert_eq!(synthesized, 0);

    let board = registry.get_mut(board_id).unwrap();
    let mut metrics = FixedAdvanceMetrics::new(0.5);

    // 8 px per char at size 16, canvas 256 px wide.
    let text = "<span color=\"#ff0000\">Red</span> words that keep going until they wrap<br>next";
    let outcome = board.add_text(&mut metrics, &TextRequest::markup(text).at(0, 16));
    let TextOutcome::Added { action, atoms } = outcome else {
        panic!("expected text to be added");
    };
    assert!(atoms >= 3);

    let placements: Vec<&TilePlacement> = board
        .canvases()
        .iter()
        .flat_map(|c| c.placements())
        .collect();
    assert!(placements.iter().all(|p| p.action_id == Some(action)));
    assert!(placements.iter().any(|p| p.text == "Red" && p.color == Rgb::RED));
    assert!(placements.iter().any(|p| p.text == "next" && p.local_x == 0));
    let placed = placements.len();

    board.undo().unwrap();
    assert!(board.canvases().iter().all(|c| c.placements().is_empty()));
    board.redo().unwrap();
    assert_eq!(
        board.canvases().iter().map(|c| c.placements().len()).sum::<usize>(),
        placed
    );
}

#[test]
fn test_undo_is_scoped_to_one_action() {
    let mut registry = BoardRegistry::default();
    let (anchor, candidates, ids) = south_wall(2, 1, &all_cells(2, 1));
    registry
        .establish(2, 1, &anchor, &candidates, &mut Wall::new(vec![]))
        .unwrap();
    let mut metrics = FixedAdvanceMetrics::default();

    let board = registry.board_for_tile_mut(ids[1]).unwrap();
    board.add_text(&mut metrics, &TextRequest::plain("left").at(0, 20));
    let before = snapshot(&registry, ids[0]);

    let board = registry.board_for_tile_mut(ids[1]).unwrap();
    board.add_text(&mut metrics, &TextRequest::plain("right").at(150, 60));
    board.add_text(&mut metrics, &TextRequest::plain("more").at(10, 90));

    registry.undo_at(ids[0]).unwrap();
    registry.undo_at(ids[1]).unwrap();
    assert_eq!(snapshot(&registry, ids[0]), before);

    registry.redo_at(ids[0]).unwrap();
    let board = registry.board_for_tile(ids[0]).unwrap();
    let right: Vec<_> = board.canvas(1, 0).unwrap().placements().iter().map(|p| p.text.as_str()).collect();
    assert_eq!(right, vec!["right"]);

    // A new edit drops the remaining redo entry.
    let board = registry.board_for_tile_mut(ids[0]).unwrap();
    board.add_text(&mut metrics, &TextRequest::plain("new").at(0, 110));
    assert!(matches!(
        registry.redo_at(ids[0]),
        Err(BoardError::History(_))
    ));
}

#[test]
fn test_missing_tiles_are_synthesized() {
    let mut registry = BoardRegistry::default();
    let (anchor, candidates, _) = south_wall(3, 2, &[(0, 0), (1, 0), (2, 1)]);
    let (right, down) = (Facing::South.right_axis(), Facing::South.down_axis());
    let holes = vec![
        anchor.position + right * 2.0,
        anchor.position + down,
        anchor.position + right + down,
    ];
    let mut wall = Wall::new(holes);

    let (_, synthesized) = registry.establish(3, 2, &anchor, &candidates, &mut wall).unwrap();
    assert_eq!(synthesized, 3);
    for id in &wall.created {
        assert!(registry.board_for_tile(*id).is_some());
    }
}

#[test]
fn test_unsupported_hole_fails_without_side_effects() {
    let mut registry = BoardRegistry::default();
    let (anchor, candidates, ids) = south_wall(3, 1, &[(0, 0), (2, 0)]);
    let mut wall = Wall::new(vec![]);

    let err = registry.establish(3, 1, &anchor, &candidates, &mut wall).unwrap_err();
    assert!(matches!(
        err,
        BoardError::Geometry(GeometryError::CellUnfillable { col: 1, row: 0 })
    ));
    assert!(registry.is_empty());
    assert!(ids.iter().all(|id| registry.board_for_tile(*id).is_none()));
    assert_eq!(wall.created, wall.released);
}

#[test]
fn test_registry_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store = BoardStore::open(StoreConfig::for_testing(dir.path())).unwrap();
    let config = BoardConfig::default();

    let mut registry = BoardRegistry::new(config.clone());
    let (anchor, candidates, ids) = south_wall(2, 2, &all_cells(2, 2));
    let (board_id, _) = registry
        .establish(2, 2, &anchor, &candidates, &mut Wall::new(vec![]))
        .unwrap();
    {
        let board = registry.get_mut(board_id).unwrap();
        board.set_background(Rgb::parse_or("navy", Rgb::WHITE));
        board.set_locked(false);
        board.add_text(&mut FixedAdvanceMetrics::default(), &TextRequest::plain("transient"));
    }
    assert_eq!(registry.save_all(&store).unwrap(), 1);

    let restored = BoardRegistry::restore(&store, config).unwrap();
    assert_eq!(restored.len(), 1);
    let board = restored.get(board_id).unwrap();
    assert_eq!(board.grid().tiles(), registry.get(board_id).unwrap().grid().tiles());
    assert_eq!(board.canvas(1, 1).unwrap().background(), Rgb::new(0, 0, 128));
    assert!(!restored.is_protected(ids[3]));
    assert!(board.canvases().iter().all(|c| c.placements().is_empty()));
}

#[test]
fn test_document_header_end_to_end() {
    let mut registry = BoardRegistry::default();
    let (anchor, candidates, ids) = south_wall(2, 1, &all_cells(2, 1));
    registry
        .establish(2, 1, &anchor, &candidates, &mut Wall::new(vec![]))
        .unwrap();
    let board = registry.board_for_tile_mut(ids[0]).unwrap();
    let mut metrics = FixedAdvanceMetrics::default();

    let outcome = board.add_document(
        &mut metrics,
        "html: [color blue] [size 12] <p>a &amp; b</p>",
        &TextRequest::default().at(0, 20),
    );
    assert!(matches!(outcome, TextOutcome::Added { atoms: 1, .. }));
    let p = &board.canvas(0, 0).unwrap().placements()[0];
    assert_eq!(p.text, "a & b");
    assert_eq!((p.color, p.point_size), (Rgb::BLUE, 12));
    // <p> at the start is one break of 15 px (size 12 → line height 15).
    assert_eq!((p.local_x, p.local_y), (0, 35));
}

#[test]
fn test_dissolved_boards_stay_gone_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store = BoardStore::open(StoreConfig::for_testing(dir.path())).unwrap();
    let config = BoardConfig::default();
    let mut registry = BoardRegistry::new(config.clone());

    // Explicit dissolve.
    let (anchor, candidates, _) = south_wall(1, 1, &all_cells(1, 1));
    let (lonely, _) = registry
        .establish(1, 1, &anchor, &candidates, &mut Wall::new(vec![]))
        .unwrap();
    registry.save_all(&store).unwrap();
    registry.dissolve(lonely).unwrap();
    assert_eq!(registry.save_all(&store).unwrap(), 0);
    assert!(store.ids().unwrap().is_empty());

    // Dissolved by overlap: only the newer board survives the restart.
    let (anchor, candidates, ids) = south_wall(3, 1, &all_cells(3, 1));
    let (old, _) = registry
        .establish(3, 1, &anchor, &candidates, &mut Wall::new(vec![]))
        .unwrap();
    registry.save_all(&store).unwrap();
    let (new, _) = registry
        .establish(2, 1, &anchor, &candidates, &mut Wall::new(vec![]))
        .unwrap();
    registry.save_all(&store).unwrap();
    assert_eq!(store.ids().unwrap(), vec![new]);

    let restored = BoardRegistry::restore(&store, config).unwrap();
    assert_eq!(restored.len(), registry.len());
    assert!(restored.get(old).is_err());
    assert_eq!(restored.board_for_tile(ids[0]).map(|b| b.id()), Some(new));
    assert!(restored.board_for_tile(ids[2]).is_none());
}
