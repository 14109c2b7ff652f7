//! # whiteboard-text
//!
//! Turns user text into positioned atoms on a board's global canvas.
//!
//! ## Pipeline
//!
//! ```text
//! raw document ──► parse_directives ──► Directives { mode, size, color, pos, .. }
//!                                            │
//!                                            ▼
//!                       MarkupTokenizer ──► Vec<Token> (runs + line breaks)
//!                                            │
//!                                            ▼
//!      LineLayoutEngine<FontMetrics> ──► Vec<PlacedAtom> (global x / baseline y)
//! ```
//!
//! - **`markup`**: Plain / HTML-flavoured tokenizer with a style stack.
//! - **`layout`**: Greedy word wrap against the board width.
//! - **`metrics`**: Width providers: fixed advance or `cosmic-text` shaping.
//! - **`directives`**: `[size N] [color X] [pos X Y] ..` document headers.

pub mod directives;
pub mod layout;
pub mod markup;
pub mod metrics;

// Re-exports for ergonomic use.
pub use directives::{parse_directives, Directives, ORIGIN_LIMIT};
pub use layout::{default_line_height, resolve_line_height, LayoutOptions, LineLayoutEngine};
pub use markup::{MarkupMode, MarkupTokenizer, StyledRun, TextStyle, Token};
pub use metrics::{CosmicMetrics, FixedAdvanceMetrics, FontMetrics};
