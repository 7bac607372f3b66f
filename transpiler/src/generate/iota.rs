//! Auto-increment (`iota`) simulation on rendered constant values.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `iota`, `iota + N` or `N + iota`, optionally wrapped in parentheses
    static ref IOTA_OFFSET: Regex =
        Regex::new(r"^\(*\s*(?:iota|iota \+ (-?\d+)|(-?\d+) \+ iota)\s*\)*$").unwrap();
    static ref IOTA_TOKEN: Regex = Regex::new(r"\biota\b").unwrap();
}

/// Whether `iota` occurs as an identifier outside of quoted literals
pub(crate) fn uses_iota(value: &str) -> bool {
    unquoted_segments(value).any(|(quoted, text)| !quoted && IOTA_TOKEN.is_match(text))
}

/// The constant offset of an `iota + N` style value
pub(crate) fn iota_offset(value: &str) -> Option<i64> {
    let caps = IOTA_OFFSET.captures(value)?;
    match caps.get(1).or_else(|| caps.get(2)) {
        Some(n) => n.as_str().parse().ok(),
        None => Some(0),
    }
}

/// Substitute the position into a rendered value.
///
/// Plain offsets collapse to a number; other expressions keep their shape
/// with every unquoted `iota` replaced.
pub(crate) fn replace_iota(value: &str, position: i64) -> String {
    if let Some(offset) = iota_offset(value) {
        return (offset + position).to_string();
    }
    if !uses_iota(value) {
        return value.to_string();
    }

    let replacement = position.to_string();
    let mut out = String::with_capacity(value.len());
    for (quoted, text) in unquoted_segments(value) {
        if quoted {
            out.push_str(text);
        } else {
            out.push_str(&IOTA_TOKEN.replace_all(text, replacement.as_str()));
        }
    }
    out
}

/// Split text into alternating unquoted and quoted (`"`, `'`, `` ` ``) runs.
fn unquoted_segments(value: &str) -> impl Iterator<Item = (bool, &str)> {
    let mut rest = value;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let Some(open) = rest.find(['"', '\'', '`']) else {
            let text = rest;
            rest = "";
            return Some((false, text));
        };
        if open > 0 {
            let text = &rest[..open];
            rest = &rest[open..];
            return Some((false, text));
        }

        let quote = rest.as_bytes()[0];
        let bytes = rest.as_bytes();
        let mut end = 1;
        while end < bytes.len() && bytes[end] != quote {
            if bytes[end] == b'\\' && quote != b'`' {
                end += 1;
            }
            end += 1;
        }
        let end = (end + 1).min(rest.len());
        let text = &rest[..end];
        rest = &rest[end..];
        Some((true, text))
    })
}
