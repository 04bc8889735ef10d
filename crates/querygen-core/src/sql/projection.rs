//! Module: sql::projection
//! Responsibility: positional extraction of output column names from the
//! top-level projection list (`SELECT <list> FROM`).
//!
//! This is an inference aid only; explicit `-- Returns:` lists win.


use crate::sql::lexer::{normalize_whitespace, strip_comments};

const SELECT: &str = "select";
const FROM: &str = "from";
const SELECT_MODIFIERS: [&str; 3] = ["distinctrow ", "distinct ", "all "];

/// Extract output field names from the first top-level projection list.
///
/// Returns an empty list when either keyword is missing or `FROM` does not
/// follow `SELECT`.
#[must_use]
pub fn extract_fields(sql: &str) -> Vec<String> {
    let normalized = normalize_whitespace(&strip_comments(sql));

    let Some(select_at) = find_keyword(&normalized, SELECT) else {
        return Vec::new();
    };
    let Some(from_at) = find_keyword(&normalized, FROM) else {
        return Vec::new();
    };

    let select_end = select_at + SELECT.len();
    if from_at <= select_end {
        return Vec::new();
    }

    let region = strip_select_modifier(&normalized[select_end..from_at]);

    split_top_level(region, b',')
        .into_iter()
        .filter_map(field_name)
        .collect()
}

// field_name
// `expr AS alias` yields the alias, otherwise the last `.` segment
fn field_name(item: &str) -> Option<String> {
    let item = item.trim();
    if item.is_empty() {
        return None;
    }

    let name = match find_alias(item) {
        Some(alias_at) => &item[alias_at..],
        None => item.rsplit('.').next().unwrap_or(item),
    };

    let name = name.trim_matches(|c: char| c == '`' || c.is_whitespace());

    (!name.is_empty()).then(|| name.to_string())
}

// find_alias
// Byte offset just past the last top-level ` as ` in the item.
fn find_alias(item: &str) -> Option<usize> {
    let bytes = item.as_bytes();
    let mut found = None;

    scan_top_level(item, |i| {
        if i > 0
            && bytes[i - 1].is_ascii_whitespace()
            && matches_word(bytes, i, "as")
            && bytes.get(i + 2).is_some_and(u8::is_ascii_whitespace)
        {
            found = Some(i + 3);
        }
        true
    });

    found
}

fn strip_select_modifier(region: &str) -> &str {
    let trimmed = region.trim_start();
    let lower = trimmed.to_ascii_lowercase();

    SELECT_MODIFIERS
        .iter()
        .find(|modifier| lower.starts_with(*modifier))
        .map_or(trimmed, |modifier| &trimmed[modifier.len()..])
}

// find_keyword
// First top-level, word-bounded, case-insensitive occurrence of `keyword`.
fn find_keyword(sql: &str, keyword: &str) -> Option<usize> {
    let bytes = sql.as_bytes();
    let mut found = None;

    scan_top_level(sql, |i| {
        if matches_word(bytes, i, keyword) {
            found = Some(i);
            return false;
        }
        true
    });

    found
}

fn matches_word(bytes: &[u8], at: usize, word: &str) -> bool {
    let end = at + word.len();
    if end > bytes.len() || !bytes[at..end].eq_ignore_ascii_case(word.as_bytes()) {
        return false;
    }

    let before = at.checked_sub(1).map(|i| bytes[i]);
    let after = bytes.get(end).copied();

    !before.is_some_and(is_word_byte) && !after.is_some_and(is_word_byte)
}

const fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn split_top_level(region: &str, separator: u8) -> Vec<&str> {
    let bytes = region.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;

    scan_top_level(region, |i| {
        if bytes[i] == separator {
            parts.push(&region[start..i]);
            start = i + 1;
        }
        true
    });
    parts.push(&region[start..]);

    parts
}

// scan_top_level
// Calls `visit` with every byte offset that sits outside quotes, backticks
// and parentheses. Stops early when `visit` returns false. Only ASCII bytes
// are structural, so offsets are always char boundaries when `visit` sees an
// ASCII byte.
fn scan_top_level(sql: &str, mut visit: impl FnMut(usize) -> bool) {
    let bytes = sql.as_bytes();
    let mut quote: Option<u8> = None;
    let mut depth = 0usize;

    for (i, &b) in bytes.iter().enumerate() {
        if let Some(open) = quote {
            if b == open {
                quote = None;
            }
            continue;
        }

        match b {
            b'\'' | b'"' | b'`' => quote = Some(b),
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            _ if depth == 0 && b.is_ascii() => {
                if !visit(i) {
                    return;
                }
            }
            _ => {}
        }
    }
}
