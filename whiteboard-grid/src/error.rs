use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Invalid grid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("Cannot establish grid: no orientation places the anchor at (0, 0)")]
    NoValidOrientation,
    #[error("Cannot fill cell ({col}, {row}): no supporting surface")]
    CellUnfillable { col: usize, row: usize },
    #[error("Grid axes must be orthogonal axis-aligned unit vectors")]
    InvalidAxes,
    #[error("Tile count mismatch: expected {expected}, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },
}
