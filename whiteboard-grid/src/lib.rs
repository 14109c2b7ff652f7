//! # whiteboard-grid
//!
//! Board geometry: discovering which physical tile is which logical cell,
//! and addressing globally laid out text to those tiles.
//!
//! ```text
//! Anchor + [Candidate] ──► GridResolver::establish ──► Grid { W×H TileRef, right, down }
//!                                 │ missing cells                  │
//!                                 ▼                                ▼
//!                          SurfaceProvider          CoordinateProjector::project(atom)
//!                                                                  │
//!                                                                  ▼
//!                                                   [Projection { col, row, local_x, local_y }]
//! ```

pub mod error;
pub mod grid;
pub mod projector;
pub mod resolver;

pub use error::GeometryError;
pub use grid::{Grid, TileRef};
pub use projector::{CoordinateProjector, Projection};
pub use resolver::{Anchor, Candidate, GridResolver, Orientation, Resolved, SurfaceProvider};
