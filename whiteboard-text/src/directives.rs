//! Document header directives.
//!
//! Long-form documents may start with an optional mode prefix followed by
//! any number of bracketed directives, then the content:
//!
//! ```text
//! [html] [size 24] [color #3366ff] [pos 10 40] [clear] <p>Hello</p>
//! text: [line 30] plain words
//! ```
//!
//! Parsing stops at the first bracket that is not a recognised directive;
//! that bracket and everything after it is content. Sizes and line heights
//! are raw here and clamped where they are applied; positions are clamped
//! to [`ORIGIN_LIMIT`] on parse.

use whiteboard_core::Rgb;

use crate::markup::MarkupMode;

/// Largest pen origin magnitude a `[pos]` directive can request, in pixels.
pub const ORIGIN_LIMIT: i32 = 1 << 20;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Directives {
    pub mode: Option<MarkupMode>,
    pub point_size: Option<i32>,
    pub color: Option<Rgb>,
    /// Pen start `(x, y)`.
    pub origin: Option<(i32, i32)>,
    pub line_height: Option<i32>,
    /// Clear the board before adding the content.
    pub clear_before: bool,
    pub content: String,
}

/// Split a raw document into its header directives and content.
pub fn parse_directives(raw: &str) -> Directives {
    let mut out = Directives::default();

    let (mode, mut rest) = parse_mode_prefix(raw);
    out.mode = mode;

    loop {
        let trimmed = rest.trim_start();
        let Some(body) = trimmed.strip_prefix('[') else {
            break;
        };
        let Some(close) = body.find(']') else {
            break;
        };
        if !apply_directive(body[..close].trim(), &mut out) {
            break;
        }
        rest = &body[close + 1..];
    }

    out.content = rest.trim_start().to_string();
    out
}

/// `[plain]` / `[html]` / ... or `word:` at the very start.
fn parse_mode_prefix(raw: &str) -> (Option<MarkupMode>, &str) {
    let trimmed = raw.trim_start();

    if let Some(body) = trimmed.strip_prefix('[') {
        if let Some(close) = body.find(']') {
            if let Some(mode) = MarkupMode::from_keyword(&body[..close]) {
                return (Some(mode), &body[close + 1..]);
            }
        }
        return (None, raw);
    }

    let word_end = trimmed
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(trimmed.len());
    let after_word = trimmed[word_end..].trim_start();
    if let Some(rest) = after_word.strip_prefix(':') {
        if let Some(mode) = MarkupMode::from_keyword(&trimmed[..word_end]) {
            return (Some(mode), rest);
        }
    }
    (None, raw)
}

/// Returns false when `token` is not a directive.
fn apply_directive(token: &str, out: &mut Directives) -> bool {
    let lower = token.to_ascii_lowercase();

    if lower == "clear" {
        out.clear_before = true;
        return true;
    }

    let (keyword, arg) = split_keyword(token);
    match keyword.to_ascii_lowercase().as_str() {
        "size" => match integers(arg).first() {
            Some(&size) => {
                out.point_size = Some(size);
                true
            }
            None => false,
        },
        "line" => match integers(arg).first() {
            Some(&line) => {
                out.line_height = Some(line);
                true
            }
            None => false,
        },
        "color" => {
            let value = arg.trim_start_matches(|c: char| c == '=' || c == ':' || c == ',' || c.is_whitespace());
            match Rgb::parse_css(value).or_else(|| Rgb::parse_css(arg)) {
                Some(color) => {
                    out.color = Some(color);
                    true
                }
                None => {
                    log::debug!("Ignoring color directive {token:?}");
                    false
                }
            }
        }
        "pos" | "xy" | "offset" => {
            let nums = integers(arg);
            match nums.first() {
                Some(&x) => {
                    let y = nums.get(1).copied().unwrap_or(0);
                    out.origin = Some((clamp_origin(x), clamp_origin(y)));
                    true
                }
                None => false,
            }
        }
        _ => false,
    }
}

fn clamp_origin(v: i32) -> i32 {
    v.clamp(-ORIGIN_LIMIT, ORIGIN_LIMIT)
}

fn split_keyword(token: &str) -> (&str, &str) {
    let end = token
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(token.len());
    (&token[..end], &token[end..])
}

/// Every optionally-signed decimal integer in `raw`, in order.
fn integers(raw: &str) -> Vec<i32> {
    let mut out = Vec::new();
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let negative = bytes[i] == b'-' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit);
        let start = i;
        if negative {
            i += 1;
        }
        if i < bytes.len() && bytes[i].is_ascii_digit() {
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            let digits = &raw[start..i];
            let value = digits.parse::<i64>().map(|v| v.clamp(i32::MIN as i64, i32::MAX as i64));
            if let Ok(v) = value {
                out.push(v as i32);
            } else if digits.starts_with('-') {
                out.push(i32::MIN);
            } else {
                out.push(i32::MAX);
            }
        } else {
            i = start + 1;
        }
    }
    out
}
