//! Greedy line layout: token stream → positioned atoms.
//!
//! Atoms are placed left to right starting at the requested origin. A run
//! that does not fit in the space left on the line is split at the last
//! space that fits (or hard-broken when no space fits on an empty line)
//! and continues at `x = 0` on the next line. Lines advance by the tallest
//! run seen on them, never less than the base line height.

use whiteboard_core::{Clamp, FontSpec, PlacedAtom};

use crate::markup::{StyledRun, Token};
use crate::metrics::FontMetrics;

/// Where and how wide the text block is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Pen x of the first line.
    pub origin_x: i32,
    /// Baseline of the first line.
    pub origin_y: i32,
    /// Board width in pixels (`grid width × tile side`).
    pub canvas_width: i32,
    pub base_line_height: i32,
}

impl LayoutOptions {
    pub fn new(origin_x: i32, origin_y: i32, canvas_width: i32, base_line_height: i32) -> Self {
        Self {
            origin_x,
            origin_y,
            canvas_width,
            base_line_height,
        }
    }
}

/// `max(8, round(point_size × 1.25))`
pub fn default_line_height(point_size: u32) -> i32 {
    ((point_size as f64 * 1.25).round() as i32).max(8)
}

/// Explicit line height if given, else the size default; clamped either way.
pub fn resolve_line_height(explicit: Option<i32>, point_size: u32, clamp: Clamp) -> i32 {
    clamp.apply(explicit.unwrap_or_else(|| default_line_height(point_size)))
}

/// Cursor state carried across tokens.
struct Pen {
    x: i32,
    y: i32,
    line_height: i32,
}

impl Pen {
    fn wrap(&mut self, next_line_height: i32) {
        self.x = 0;
        self.y = self.y.saturating_add(self.line_height);
        self.line_height = next_line_height;
    }
}

/// Lays out token streams with one base font and a metrics provider.
pub struct LineLayoutEngine<M> {
    metrics: M,
    font: FontSpec,
}

impl<M: FontMetrics> LineLayoutEngine<M> {
    pub fn new(metrics: M, font: FontSpec) -> Self {
        Self { metrics, font }
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub fn layout(&mut self, tokens: &[Token], options: &LayoutOptions) -> Vec<PlacedAtom> {
        let base = options.base_line_height;
        let mut pen = Pen {
            x: options.origin_x,
            y: options.origin_y,
            line_height: base,
        };
        let mut atoms = Vec::new();

        for token in tokens {
            match token {
                Token::LineBreak => pen.wrap(base),
                Token::Run(run) => self.layout_run(run, options, &mut pen, &mut atoms),
            }
        }

        log::trace!("Laid out {} tokens into {} atoms", tokens.len(), atoms.len());
        atoms
    }

    fn layout_run(
        &mut self,
        run: &StyledRun,
        options: &LayoutOptions,
        pen: &mut Pen,
        atoms: &mut Vec<PlacedAtom>,
    ) {
        let text = run.text.as_str();
        if text.is_empty() {
            return;
        }

        let run_line_height = default_line_height(run.point_size);
        pen.line_height = pen.line_height.max(run_line_height);
        let wrapped_line_height = options.base_line_height.max(run_line_height);

        let mut idx = 0;
        while idx < text.len() {
            if pen.x == 0 {
                let trimmed = text[idx..].trim_start_matches(' ');
                idx = text.len() - trimmed.len();
                if idx >= text.len() {
                    break;
                }
            }

            let remaining = options.canvas_width.saturating_sub(pen.x);
            if remaining <= 0 && pen.x != 0 {
                pen.wrap(wrapped_line_height);
                continue;
            }

            let mut next = self.find_wrap_point(text, idx, run.point_size, remaining);
            if next <= idx {
                if pen.x != 0 {
                    pen.wrap(wrapped_line_height);
                    continue;
                }
                // Nothing fits on an empty line: take one character.
                next = idx + text[idx..].chars().next().map_or(1, char::len_utf8);
            }

            let piece = &text[idx..next];
            idx = next;
            if piece.trim().is_empty() {
                continue;
            }

            let width = self.metrics.text_width(&self.font, run.point_size, piece);
            atoms.push(PlacedAtom {
                text: piece.to_string(),
                color: run.color,
                point_size: run.point_size,
                x: pen.x,
                y: pen.y,
                width,
            });
            pen.x = pen.x.saturating_add(width);

            if idx < text.len() {
                pen.wrap(wrapped_line_height);
            }
        }
    }

    /// Largest byte end `e > start` with `text[start..e]` no wider than
    /// `max_width`, backed up to just after the last space when one exists.
    /// Returns `start` when not even one character fits.
    fn find_wrap_point(&mut self, text: &str, start: usize, point_size: u32, max_width: i32) -> usize {
        let mut end = start;
        let mut last_space = None;

        for (offset, ch) in text[start..].char_indices() {
            let candidate = start + offset + ch.len_utf8();
            let width = self
                .metrics
                .text_width(&self.font, point_size, &text[start..candidate]);
            if width > max_width {
                break;
            }
            end = candidate;
            if ch == ' ' {
                last_space = Some(candidate);
            }
        }

        if end == text.len() {
            return end;
        }
        match last_space {
            Some(after_space) => after_space,
            None => end,
        }
    }
}
