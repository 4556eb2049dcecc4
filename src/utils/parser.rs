//! Text splitting, truncation and number formatting primitives.
//!
//! These operate on plain `&str` input and never touch configuration; callers
//! that need the configured ellipsis go through [`truncate_with`].

use crate::error::{Error, Result};

/// Default suffix appended by [`truncate`].
pub const ELLIPSIS: &str = "...";

/// Split a whitespace-delimited string into its tokens.
///
/// Input is trimmed first, so padding never produces empty tokens and an
/// empty or whitespace-only string yields an empty Vec.
pub fn unwhite(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Owned variant of [`unwhite`].
pub fn unwhite_owned(text: &str) -> Vec<String> {
    unwhite(text).into_iter().map(str::to_string).collect()
}

/// Truncate `text` at a word boundary and append `...`.
///
/// Falls back to a hard cut at `n - 1` characters when no boundary exists.
pub fn truncate(text: &str, n: usize) -> String {
    truncate_with(text, n, ELLIPSIS)
}

/// [`truncate`] with a caller-supplied ellipsis.
pub fn truncate_with(text: &str, n: usize, ellipsis: &str) -> String {
    match word_boundary(text, n) {
        Boundary::Fits => text.to_string(),
        Boundary::At(end) => format!("{}{}", &text[..end], ellipsis),
        Boundary::Missing => {
            let cut = byte_offset(text, n.saturating_sub(1));
            format!("{}{}", &text[..cut], ellipsis)
        }
    }
}

/// Strict variant of [`truncate_with`]: fails with `text.no_match` instead of
/// hard-cutting when no word boundary exists within `n` characters.
pub fn try_truncate(text: &str, n: usize, ellipsis: &str) -> Result<String> {
    match word_boundary(text, n) {
        Boundary::Fits => Ok(text.to_string()),
        Boundary::At(end) => Ok(format!("{}{}", &text[..end], ellipsis)),
        Boundary::Missing => Err(Error::text_no_match(text, n)),
    }
}

enum Boundary {
    Fits,
    At(usize),
    Missing,
}

/// Find the byte offset ending the longest prefix of at most `n` characters
/// whose last character is non-whitespace and is followed by whitespace.
/// Prefix characters never include a line break, and the prefix is always
/// shorter than `text`.
fn word_boundary(text: &str, n: usize) -> Boundary {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    if chars.len() < n {
        return Boundary::Fits;
    }

    let mut best = None;
    for (count, (offset, ch)) in chars.iter().enumerate().take(n) {
        if *ch == '\n' || *ch == '\r' {
            break;
        }
        if ch.is_whitespace() {
            continue;
        }
        let end = offset + ch.len_utf8();
        let followed_by_break = chars
            .get(count + 1)
            .map(|(_, next)| next.is_whitespace())
            .unwrap_or(false);
        if followed_by_break {
            best = Some(end);
        }
    }

    best.map(Boundary::At).unwrap_or(Boundary::Missing)
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}

/// English ordinal suffix for `n` (`st`, `nd`, `rd` or `th`). Sign is ignored.
pub fn ordinal(n: i64) -> &'static str {
    let n = n.unsigned_abs();
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// [`ordinal`] for fractional input; the fraction is discarded.
pub fn ordinal_f64(n: f64) -> &'static str {
    if !n.is_finite() {
        return "th";
    }
    ordinal(n.trunc() as i64)
}

/// Number followed by its ordinal suffix, e.g. `22nd`.
pub fn with_ordinal(n: i64) -> String {
    format!("{}{}", n, ordinal(n))
}
