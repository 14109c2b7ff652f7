//! Font metrics providers.
//!
//! The layout engine only needs one question answered: how many pixels
//! wide is this string in this font at this size. Answers must be
//! deterministic and monotonic in prefix length.
//!
//! - [`FixedAdvanceMetrics`]: every character advances by a fixed
//!   fraction of the point size. Headless and predictable.
//! - [`CosmicMetrics`]: real shaping via `cosmic-text` with an LRU cache
//!   of measured widths.

use std::num::NonZeroUsize;

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Style, Weight};
use lru::LruCache;
use whiteboard_core::{FontSpec, FontStyle};

/// Measures rendered text width in whole pixels.
pub trait FontMetrics {
    /// Width of `text` drawn with `font` at `point_size`. Zero for "".
    fn text_width(&mut self, font: &FontSpec, point_size: u32, text: &str) -> i32;
}

impl<M: FontMetrics + ?Sized> FontMetrics for &mut M {
    fn text_width(&mut self, font: &FontSpec, point_size: u32, text: &str) -> i32 {
        (**self).text_width(font, point_size, text)
    }
}

// ── Fixed advance ───────────────────────────────────────────────────

/// Monospace approximation: `ceil(chars × point_size × em_advance)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvanceMetrics {
    em_advance: f32,
}

impl FixedAdvanceMetrics {
    pub fn new(em_advance: f32) -> Self {
        Self { em_advance }
    }
}

impl Default for FixedAdvanceMetrics {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl FontMetrics for FixedAdvanceMetrics {
    fn text_width(&mut self, _font: &FontSpec, point_size: u32, text: &str) -> i32 {
        let chars = text.chars().count() as f32;
        (chars * point_size as f32 * self.em_advance).ceil() as i32
    }
}

// ── cosmic-text ─────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct WidthKey {
    family: String,
    style: FontStyle,
    point_size: u32,
    text: String,
}

/// Shaping-backed metrics with a bounded width cache.
pub struct CosmicMetrics {
    font_system: FontSystem,
    cache: LruCache<WidthKey, i32>,
}

impl CosmicMetrics {
    /// Widths remembered before eviction.
    pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

    /// System font discovery.
    pub fn new() -> Self {
        Self::with_font_system(FontSystem::new())
    }

    pub fn with_font_system(font_system: FontSystem) -> Self {
        let capacity = NonZeroUsize::new(Self::DEFAULT_CACHE_CAPACITY)
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            font_system,
            cache: LruCache::new(capacity),
        }
    }

    pub fn font_system(&self) -> &FontSystem {
        &self.font_system
    }

    pub fn cached_widths(&self) -> usize {
        self.cache.len()
    }

    fn family(name: &str) -> Family<'_> {
        match name.trim() {
            "sans-serif" => Family::SansSerif,
            "serif" => Family::Serif,
            "monospace" => Family::Monospace,
            concrete => Family::Name(concrete),
        }
    }

    fn shape_width(&mut self, font: &FontSpec, point_size: u32, text: &str) -> i32 {
        let size = point_size.max(1) as f32;
        let metrics = Metrics::new(size, (size * 1.25).ceil());

        let weight = if font.style.is_bold() {
            Weight::BOLD
        } else {
            Weight::NORMAL
        };
        let style = if font.style.is_italic() {
            Style::Italic
        } else {
            Style::Normal
        };
        let attrs = Attrs::new()
            .family(Self::family(&font.family))
            .weight(weight)
            .style(style);

        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let width = buffer
            .layout_runs()
            .map(|run| run.line_w)
            .fold(0.0f32, f32::max);
        width.ceil() as i32
    }
}

impl Default for CosmicMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl FontMetrics for CosmicMetrics {
    fn text_width(&mut self, font: &FontSpec, point_size: u32, text: &str) -> i32 {
        if text.is_empty() {
            return 0;
        }
        let key = WidthKey {
            family: font.family.clone(),
            style: font.style,
            point_size,
            text: text.to_string(),
        };
        if let Some(width) = self.cache.get(&key) {
            return *width;
        }
        let width = self.shape_width(font, point_size, text);
        self.cache.put(key, width);
        width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_advance_width() {
        let mut m = FixedAdvanceMetrics::new(0.5);
        let font = FontSpec::default();
        assert_eq!(m.text_width(&font, 16, ""), 0);
        assert_eq!(m.text_width(&font, 16, "Hello"), 40);
        assert_eq!(m.text_width(&font, 10, "abc"), 15);
        // Rounds up.
        assert_eq!(m.text_width(&font, 3, "a"), 2);
    }

    #[test]
    fn test_fixed_advance_counts_chars_not_bytes() {
        let mut m = FixedAdvanceMetrics::new(1.0);
        let font = FontSpec::default();
        assert_eq!(m.text_width(&font, 10, "日本"), 20);
    }

    #[test]
    fn test_metrics_through_mut_ref() {
        fn measure(mut m: impl FontMetrics) -> i32 {
            m.text_width(&FontSpec::default(), 16, "ab")
        }
        let mut inner = FixedAdvanceMetrics::default();
        assert_eq!(measure(&mut inner), 16);
    }

    #[test]
    fn test_cosmic_empty_is_zero() {
        let mut m = CosmicMetrics::new();
        assert_eq!(m.text_width(&FontSpec::default(), 16, ""), 0);
        assert_eq!(m.cached_widths(), 0);
    }

    #[test]
    fn test_cosmic_monotonic_and_cached() {
        let mut m = CosmicMetrics::new();
        let font = FontSpec::new("sans-serif", FontStyle::Plain);
        let short = m.text_width(&font, 16, "Hello");
        let long = m.text_width(&font, 16, "Hello World");
        assert!(long >= short, "{long} < {short}");
        assert_eq!(m.cached_widths(), 2);
        // Second lookup is served from the cache.
        assert_eq!(m.text_width(&font, 16, "Hello"), short);
        assert_eq!(m.cached_widths(), 2);
    }
}
