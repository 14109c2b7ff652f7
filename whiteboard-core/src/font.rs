//! Base font selection for a board.

use serde::{Deserialize, Serialize};

/// Family used when nothing else is configured.
pub const DEFAULT_FONT_FAMILY: &str = "Noto Sans CJK JP";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Plain,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    /// Lenient keyword parse (`bold`, `ITALIC`, `bold_italic`, ...).
    /// Anything unrecognised is `Plain`.
    pub fn from_keyword(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BOLD" => Self::Bold,
            "ITALIC" => Self::Italic,
            "BOLDITALIC" | "BOLD_ITALIC" => Self::BoldItalic,
            _ => Self::Plain,
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(self, Self::Bold | Self::BoldItalic)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, Self::Italic | Self::BoldItalic)
    }
}

/// Family + style. Point size is carried per text run, not here.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub style: FontStyle,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, style: FontStyle) -> Self {
        Self {
            family: family.into(),
            style,
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_FAMILY, FontStyle::Plain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_keywords() {
        assert_eq!(FontStyle::from_keyword("bold"), FontStyle::Bold);
        assert_eq!(FontStyle::from_keyword("Italic"), FontStyle::Italic);
        assert_eq!(FontStyle::from_keyword("BOLD_ITALIC"), FontStyle::BoldItalic);
        assert_eq!(FontStyle::from_keyword("bolditalic"), FontStyle::BoldItalic);
        assert_eq!(FontStyle::from_keyword("wavy"), FontStyle::Plain);
    }

    #[test]
    fn test_style_flags() {
        assert!(FontStyle::BoldItalic.is_bold());
        assert!(FontStyle::BoldItalic.is_italic());
        assert!(!FontStyle::Plain.is_bold());
    }

    #[test]
    fn test_default_family() {
        let font = FontSpec::default();
        assert_eq!(font.family, DEFAULT_FONT_FAMILY);
        assert_eq!(font.style, FontStyle::Plain);
    }
}
