//! Markup tokenizer: plain or HTML-flavoured text into styled runs.
//!
//! The grammar is deliberately small and forgiving:
//!
//! - `<span>` / `<font>` push a style derived from `color`, `size`,
//!   `font-size` and `style="color:..;font-size:.."`; the matching close
//!   pops it (never below the base style).
//! - `<br>` breaks the line; `<p>` / `<div>` (open or close) leave a
//!   paragraph gap.
//! - `&lt; &gt; &amp; &quot; &apos; &nbsp; &#N; &#xHH;` are decoded.
//! - Everything else that looks like a tag is dropped.
//!
//! Tokenizing never fails. An unterminated tag ends the scan; whatever
//! was emitted before it stands.

use whiteboard_core::{Clamp, Rgb};

/// How the input string is interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MarkupMode {
    Plain,
    #[default]
    Markup,
}

impl MarkupMode {
    /// `plain`/`text` → Plain, `html`/`htext` → Markup.
    pub fn from_keyword(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" => Some(Self::Plain),
            "html" | "htext" => Some(Self::Markup),
            _ => None,
        }
    }
}

/// Color + point size in effect for a run of text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextStyle {
    pub color: Rgb,
    pub point_size: u32,
}

impl TextStyle {
    pub fn new(color: Rgb, point_size: u32) -> Self {
        Self { color, point_size }
    }
}

/// Maximal span of text sharing one style. Never contains `\n`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub color: Rgb,
    pub point_size: u32,
}

impl StyledRun {
    pub fn style(&self) -> TextStyle {
        TextStyle::new(self.color, self.point_size)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Run(StyledRun),
    LineBreak,
}

impl Token {
    pub fn is_line_break(&self) -> bool {
        matches!(self, Token::LineBreak)
    }
}

/// Entity names/codes are short; anything longer is literal text.
const MAX_ENTITY_LEN: usize = 32;

/// Style stack with a floor at the base style.
struct StyleStack {
    styles: Vec<TextStyle>,
}

impl StyleStack {
    fn new(base: TextStyle) -> Self {
        Self { styles: vec![base] }
    }

    fn top(&self) -> TextStyle {
        // The base entry is never popped.
        self.styles[self.styles.len() - 1]
    }

    fn push(&mut self, style: TextStyle) {
        self.styles.push(style);
    }

    fn pop(&mut self) {
        if self.styles.len() > 1 {
            self.styles.pop();
        }
    }
}

/// Converts raw strings into [`Token`] sequences.
#[derive(Clone, Copy, Debug)]
pub struct MarkupTokenizer {
    size_clamp: Clamp,
}

impl Default for MarkupTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupTokenizer {
    pub fn new() -> Self {
        Self {
            size_clamp: Clamp::new(8, 256),
        }
    }

    /// Clamp applied to every point size derived from markup attributes.
    pub fn with_size_clamp(size_clamp: Clamp) -> Self {
        Self { size_clamp }
    }

    pub fn tokenize(&self, input: &str, mode: MarkupMode, defaults: TextStyle) -> Vec<Token> {
        match mode {
            MarkupMode::Plain => self.tokenize_plain(input, defaults),
            MarkupMode::Markup => self.tokenize_markup(input, defaults),
        }
    }

    /// One run per line, whitespace collapsed, leading blanks dropped.
    pub fn tokenize_plain(&self, input: &str, defaults: TextStyle) -> Vec<Token> {
        let mut tokens = Vec::new();
        if input.is_empty() {
            return tokens;
        }
        let normalized = input.replace('\r', "");
        emit_text(&normalized, defaults, &mut tokens, false);
        tokens
    }

    pub fn tokenize_markup(&self, input: &str, defaults: TextStyle) -> Vec<Token> {
        let mut tokens = Vec::new();
        if input.is_empty() {
            return tokens;
        }

        let input = input.replace('\r', "");
        let mut stack = StyleStack::new(defaults);
        let mut buffer = String::new();
        let mut i = 0;

        while let Some(ch) = input[i..].chars().next() {
            match ch {
                '<' => {
                    emit_text(&buffer, stack.top(), &mut tokens, true);
                    buffer.clear();

                    let Some(rel) = input[i + 1..].find('>') else {
                        log::debug!("Unterminated tag at byte {i}; stopping scan");
                        break;
                    };
                    let close = i + 1 + rel;
                    self.apply_tag(input[i + 1..close].trim(), &mut stack, &mut tokens);
                    i = close + 1;
                }
                '&' => match entity_at(&input[i + 1..]) {
                    Some((key, consumed)) => {
                        match decode_entity(key) {
                            Some(decoded) => buffer.push(decoded),
                            None => {
                                buffer.push('&');
                                buffer.push_str(key);
                                buffer.push(';');
                            }
                        }
                        i += 1 + consumed;
                    }
                    None => {
                        buffer.push('&');
                        i += 1;
                    }
                },
                _ => {
                    buffer.push(ch);
                    i += ch.len_utf8();
                }
            }
        }

        emit_text(&buffer, stack.top(), &mut tokens, false);
        tokens
    }

    fn apply_tag(&self, raw: &str, stack: &mut StyleStack, tokens: &mut Vec<Token>) {
        let (closing, body) = match raw.strip_prefix('/') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, raw),
        };
        let (self_closing, body) = match body.strip_suffix('/') {
            Some(rest) => (true, rest.trim_end()),
            None => (false, body),
        };
        let (name, attr_part) = match body.find(char::is_whitespace) {
            Some(pos) => (&body[..pos], &body[pos..]),
            None => (body, ""),
        };
        let name = name.to_ascii_lowercase();

        match (closing, name.as_str()) {
            (true, "span" | "font") => stack.pop(),
            (true, "p" | "div") | (false, "p" | "div") => paragraph_gap(tokens),
            (false, "br") => tokens.push(Token::LineBreak),
            (false, "span" | "font") => {
                // `<span/>` opens and closes at once: no effect.
                if !self_closing {
                    let attrs = parse_attributes(attr_part);
                    stack.push(self.derive_style(stack.top(), &attrs));
                }
            }
            _ => {}
        }
    }

    /// Attributes apply in document order; later ones win.
    fn derive_style(&self, parent: TextStyle, attrs: &[(String, String)]) -> TextStyle {
        let mut style = parent;
        for (key, value) in attrs {
            match key.as_str() {
                "color" => style.color = Rgb::parse_or(value, style.color),
                "size" | "font-size" => style.point_size = self.font_size(value, style.point_size),
                "style" => {
                    for decl in value.split(';') {
                        let Some((prop, val)) = decl.split_once(':') else {
                            continue;
                        };
                        match prop.trim().to_ascii_lowercase().as_str() {
                            "color" => style.color = Rgb::parse_or(val, style.color),
                            "font-size" => {
                                style.point_size = self.font_size(val, style.point_size)
                            }
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }
        style
    }

    fn font_size(&self, raw: &str, current: u32) -> u32 {
        let parsed = parse_font_size(raw, current);
        self.size_clamp.apply(parsed.min(i32::MAX as u32) as i32) as u32
    }
}

/// `<p>`/`<div>`: two breaks after text, one when already at a break.
fn paragraph_gap(tokens: &mut Vec<Token>) {
    if matches!(tokens.last(), Some(Token::Run(_))) {
        tokens.push(Token::LineBreak);
    }
    tokens.push(Token::LineBreak);
}

/// Collapse whitespace in `raw` and append runs/breaks to `tokens`.
///
/// `keep_trailing_space` preserves one collapsed space at the end of the
/// chunk so text split by a tag keeps its word gap.
fn emit_text(raw: &str, style: TextStyle, tokens: &mut Vec<Token>, keep_trailing_space: bool) {
    if raw.is_empty() {
        return;
    }

    let mut current = String::new();
    let mut line_start = !matches!(tokens.last(), Some(Token::Run(_)));
    let mut pending_space = false;

    for ch in raw.chars() {
        if ch == '\n' {
            push_run(tokens, &mut current, style);
            tokens.push(Token::LineBreak);
            line_start = true;
            pending_space = false;
            continue;
        }
        if ch.is_whitespace() {
            if !line_start {
                pending_space = true;
            }
            continue;
        }
        if pending_space {
            if !(current.is_empty() && previous_run_ends_with_space(tokens)) {
                current.push(' ');
            }
            pending_space = false;
        }
        current.push(ch);
        line_start = false;
    }

    if pending_space && keep_trailing_space {
        if !current.is_empty() {
            current.push(' ');
        } else if let Some(Token::Run(prev)) = tokens.last_mut() {
            if !prev.text.ends_with(' ') {
                prev.text.push(' ');
            }
        }
    }
    push_run(tokens, &mut current, style);
}

fn push_run(tokens: &mut Vec<Token>, current: &mut String, style: TextStyle) {
    if current.is_empty() {
        return;
    }
    tokens.push(Token::Run(StyledRun {
        text: std::mem::take(current),
        color: style.color,
        point_size: style.point_size,
    }));
}

fn previous_run_ends_with_space(tokens: &[Token]) -> bool {
    matches!(tokens.last(), Some(Token::Run(run)) if run.text.ends_with(' '))
}

/// Entity body following `&`, up to and excluding `;`.
/// Returns the body and the bytes consumed including the `;`.
fn entity_at(rest: &str) -> Option<(&str, usize)> {
    let semi = rest.find(';')?;
    let key = &rest[..semi];
    if semi > MAX_ENTITY_LEN || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '#') {
        return None;
    }
    Some((key, semi + 1))
}

/// Decode one entity body. `None` means "not an entity we know".
pub fn decode_entity(key: &str) -> Option<char> {
    if key.is_empty() {
        return None;
    }
    if let Some(hex) = key.strip_prefix("#x").or_else(|| key.strip_prefix("#X")) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(dec) = key.strip_prefix('#') {
        return dec.parse::<u32>().ok().and_then(char::from_u32);
    }
    match key.to_ascii_lowercase().as_str() {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => None,
    }
}

/// `key=value` pairs in source order. Values may be single/double quoted
/// or bare; valueless attributes are skipped.
fn parse_attributes(raw: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let mut rest = raw;

    loop {
        rest = rest.trim_start();
        let Some(eq) = rest.find('=') else {
            break;
        };
        // `checked color=red`: the key is the last word before '='.
        let key = rest[..eq]
            .split_whitespace()
            .last()
            .unwrap_or("")
            .to_ascii_lowercase();
        rest = rest[eq + 1..].trim_start();

        let value;
        match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let body = &rest[1..];
                match body.find(quote) {
                    Some(end) => {
                        value = &body[..end];
                        rest = &body[end + 1..];
                    }
                    None => {
                        value = body;
                        rest = "";
                    }
                }
            }
            Some(_) => {
                let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                value = &rest[..end];
                rest = &rest[end..];
            }
            None => break,
        }

        if !key.is_empty() {
            attrs.push((key, value.to_string()));
        }
    }
    attrs
}

/// `16`, `16px`, `150%`, `1.5em`. Unparseable input keeps `current`.
pub fn parse_font_size(raw: &str, current: u32) -> u32 {
    let lower = raw.trim().to_ascii_lowercase();
    let v = lower.strip_suffix("px").map(str::trim).unwrap_or(&lower);

    let scaled = |factor: f64| -> u32 { (current as f64 * factor).round().max(1.0) as u32 };

    if let Some(pct) = v.strip_suffix('%') {
        return pct
            .trim()
            .parse::<f64>()
            .map(|p| scaled(p / 100.0))
            .unwrap_or(current);
    }
    if let Some(em) = v.strip_suffix("em") {
        return em.trim().parse::<f64>().map(scaled).unwrap_or(current);
    }
    v.parse::<i64>()
        .map(|n| n.clamp(1, u32::MAX as i64) as u32)
        .unwrap_or(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: TextStyle = TextStyle {
        color: Rgb::BLACK,
        point_size: 16,
    };

    fn run(text: &str, color: Rgb, point_size: u32) -> Token {
        Token::Run(StyledRun {
            text: text.into(),
            color,
            point_size,
        })
    }

    fn markup(input: &str) -> Vec<Token> {
        MarkupTokenizer::new().tokenize(input, MarkupMode::Markup, BASE)
    }

    fn plain(input: &str) -> Vec<Token> {
        MarkupTokenizer::new().tokenize(input, MarkupMode::Plain, BASE)
    }

    // ── plain ──

    #[test]
    fn test_plain_collapses_and_splits_lines() {
        let tokens = plain("  Hello    world \n  second\tline  ");
        assert_eq!(
            tokens,
            vec![
                run("Hello world", Rgb::BLACK, 16),
                Token::LineBreak,
                run("second line", Rgb::BLACK, 16),
            ]
        );
    }

    #[test]
    fn test_plain_keeps_markup_literal() {
        let tokens = plain("<b>x</b> &amp;");
        assert_eq!(tokens, vec![run("<b>x</b> &amp;", Rgb::BLACK, 16)]);
    }

    #[test]
    fn test_plain_blank_lines_are_breaks() {
        let tokens = plain("a\r\n\nb");
        assert_eq!(
            tokens,
            vec![
                run("a", Rgb::BLACK, 16),
                Token::LineBreak,
                Token::LineBreak,
                run("b", Rgb::BLACK, 16),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(plain("").is_empty());
        assert!(markup("").is_empty());
        assert!(markup("<span></span>").is_empty());
    }

    // ── markup styles ──

    #[test]
    fn test_span_color_round_trip() {
        let tokens = markup("<span color=\"#ff0000\">A</span>B");
        assert_eq!(tokens, vec![run("A", Rgb::RED, 16), run("B", Rgb::BLACK, 16)]);
    }

    #[test]
    fn test_font_size_units() {
        let tokens = markup(
            "<font size=20>a</font><span font-size='150%'>b</span>\
             <span size=\"2em\">c</span><span size=12px>d</span>",
        );
        assert_eq!(
            tokens,
            vec![
                run("a", Rgb::BLACK, 20),
                run("b", Rgb::BLACK, 24),
                run("c", Rgb::BLACK, 32),
                run("d", Rgb::BLACK, 12),
            ]
        );
    }

    #[test]
    fn test_size_is_clamped() {
        let tokens = markup("<span size=2>a</span><span size=9000>b</span>");
        assert_eq!(tokens, vec![run("a", Rgb::BLACK, 8), run("b", Rgb::BLACK, 256)]);
    }

    #[test]
    fn test_style_declarations() {
        let tokens = markup("<span style=\"color: rgb(0,0,255); font-size: 20px;\">x</span>");
        assert_eq!(tokens, vec![run("x", Rgb::BLUE, 20)]);
    }

    #[test]
    fn test_later_attribute_wins() {
        let a = markup("<span color=red style=\"color:blue\">x</span>");
        assert_eq!(a, vec![run("x", Rgb::BLUE, 16)]);
        let b = markup("<span style=\"color:blue\" color=red>x</span>");
        assert_eq!(b, vec![run("x", Rgb::RED, 16)]);
    }

    #[test]
    fn test_nested_styles_compose() {
        let tokens = markup("<span color=red>a<span size=200%>b</span>c</span>d");
        assert_eq!(
            tokens,
            vec![
                run("a", Rgb::RED, 16),
                run("b", Rgb::RED, 32),
                run("c", Rgb::RED, 16),
                run("d", Rgb::BLACK, 16),
            ]
        );
    }

    #[test]
    fn test_unmatched_close_never_underflows() {
        let tokens = markup("</span></font>a<span color=red>b</span></span>c");
        assert_eq!(
            tokens,
            vec![
                run("a", Rgb::BLACK, 16),
                run("b", Rgb::RED, 16),
                run("c", Rgb::BLACK, 16),
            ]
        );
    }

    #[test]
    fn test_invalid_color_keeps_parent() {
        let tokens = markup("<span color=red><span color=nope>x</span></span>");
        assert_eq!(tokens, vec![run("x", Rgb::RED, 16)]);
    }

    // ── breaks ──

    #[test]
    fn test_br_breaks() {
        let tokens = markup("a<br>b<br/>c");
        assert_eq!(
            tokens,
            vec![
                run("a", Rgb::BLACK, 16),
                Token::LineBreak,
                run("b", Rgb::BLACK, 16),
                Token::LineBreak,
                run("c", Rgb::BLACK, 16),
            ]
        );
    }

    #[test]
    fn test_paragraph_gap() {
        let tokens = markup("<p>one</p><p>two</p>");
        assert_eq!(
            tokens,
            vec![
                Token::LineBreak,
                run("one", Rgb::BLACK, 16),
                Token::LineBreak,
                Token::LineBreak,
                Token::LineBreak,
                run("two", Rgb::BLACK, 16),
                Token::LineBreak,
                Token::LineBreak,
            ]
        );
    }

    #[test]
    fn test_div_after_break_adds_single() {
        let tokens = markup("a<br><div>b");
        assert_eq!(
            tokens,
            vec![
                run("a", Rgb::BLACK, 16),
                Token::LineBreak,
                Token::LineBreak,
                run("b", Rgb::BLACK, 16),
            ]
        );
    }

    #[test]
    fn test_close_paragraph_after_break_adds_single() {
        let tokens = markup("a<br></p>b");
        assert_eq!(
            tokens,
            vec![
                run("a", Rgb::BLACK, 16),
                Token::LineBreak,
                Token::LineBreak,
                run("b", Rgb::BLACK, 16),
            ]
        );
    }

    #[test]
    fn test_unknown_tags_are_stripped() {
        let tokens = markup("<b>bold</b> <i>it</i>");
        assert_eq!(tokens, vec![run("bold ", Rgb::BLACK, 16), run("it", Rgb::BLACK, 16)]);
    }

    #[test]
    fn test_word_gap_survives_tag_boundary() {
        let tokens = markup("Hello <span color=red>world</span> again");
        assert_eq!(
            tokens,
            vec![
                run("Hello ", Rgb::BLACK, 16),
                run("world", Rgb::RED, 16),
                run(" again", Rgb::BLACK, 16),
            ]
        );
    }

    #[test]
    fn test_whitespace_only_between_tags_joins_previous() {
        let tokens = markup("<span color=red>A</span> <span color=blue>B</span>");
        assert_eq!(tokens, vec![run("A ", Rgb::RED, 16), run("B", Rgb::BLUE, 16)]);
    }

    #[test]
    fn test_newline_in_markup_breaks() {
        let tokens = markup("a\n   b");
        assert_eq!(
            tokens,
            vec![run("a", Rgb::BLACK, 16), Token::LineBreak, run("b", Rgb::BLACK, 16)]
        );
    }

    // ── entities ──

    #[test]
    fn test_entity_decoding() {
        let tokens = markup("a &amp; b");
        assert_eq!(tokens, vec![run("a & b", Rgb::BLACK, 16)]);

        let tokens = markup("&lt;tag&gt; &quot;q&quot; &apos;s&apos; &#65;&#x42;");
        assert_eq!(tokens, vec![run("<tag> \"q\" 's' AB", Rgb::BLACK, 16)]);
    }

    #[test]
    fn test_unknown_entity_passes_through() {
        let tokens = markup("x &bogus; y &#xZZ; &");
        assert_eq!(tokens, vec![run("x &bogus; y &#xZZ; &", Rgb::BLACK, 16)]);
    }

    #[test]
    fn test_ampersand_before_tag_is_literal() {
        let tokens = markup("R & D<br>x;");
        assert_eq!(
            tokens,
            vec![run("R & D", Rgb::BLACK, 16), Token::LineBreak, run("x;", Rgb::BLACK, 16)]
        );
    }

    // ── malformed ──

    #[test]
    fn test_unterminated_tag_stops_scan() {
        let tokens = markup("before<span color=red>ok</span><broken tail");
        assert_eq!(tokens, vec![run("before", Rgb::BLACK, 16), run("ok", Rgb::RED, 16)]);
    }

    #[test]
    fn test_bare_angle_bracket_only() {
        assert!(markup("<").is_empty());
        assert_eq!(markup("<>x"), vec![run("x", Rgb::BLACK, 16)]);
        assert_eq!(markup("</>x"), vec![run("x", Rgb::BLACK, 16)]);
    }

    // ── helpers ──

    #[test]
    fn test_parse_font_size() {
        assert_eq!(parse_font_size("18", 16), 18);
        assert_eq!(parse_font_size(" 18px ", 16), 18);
        assert_eq!(parse_font_size("50%", 16), 8);
        assert_eq!(parse_font_size("0.5em", 16), 8);
        assert_eq!(parse_font_size("big", 16), 16);
        assert_eq!(parse_font_size("-4", 16), 1);
    }

    #[test]
    fn test_parse_attributes_forms() {
        let attrs = parse_attributes(r#" color="red" size='3' checked style=color:blue "#);
        assert_eq!(
            attrs,
            vec![
                ("color".to_string(), "red".to_string()),
                ("size".to_string(), "3".to_string()),
                ("style".to_string(), "color:blue".to_string()),
            ]
        );
    }

    #[test]
    fn test_mode_keywords() {
        assert_eq!(MarkupMode::from_keyword("TEXT"), Some(MarkupMode::Plain));
        assert_eq!(MarkupMode::from_keyword("htext"), Some(MarkupMode::Markup));
        assert_eq!(MarkupMode::from_keyword("rtf"), None);
    }
}
