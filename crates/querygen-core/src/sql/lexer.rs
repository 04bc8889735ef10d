//! Module: sql::lexer
//! Responsibility: quote-aware statement splitting and comment stripping.
//!
//! Invariants:
//! - Nothing inside a single- or double-quoted span is ever treated as syntax.
//! - A doubled quote inside its own kind of span is an escape, not a terminator.
//! - The stripper never removes a top-level `;`, so split and strip commute.

#[cfg(test)]
mod tests;

use std::{iter::Peekable, str::Chars};

///
/// Quotes
/// Tracks whether the scanner is inside a quoted literal.
///

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Quotes {
    single: bool,
    double: bool,
}

impl Quotes {
    #[must_use]
    pub(crate) const fn quoted(self) -> bool {
        self.single || self.double
    }

    // observe
    // Feed one character outside of comments. Returns the escaped partner of
    // a doubled quote when one was consumed so the caller can keep it.
    pub(crate) fn observe(&mut self, c: char, chars: &mut Peekable<Chars<'_>>) -> Option<char> {
        match c {
            '\'' if !self.double => {
                if self.single && chars.peek() == Some(&'\'') {
                    return chars.next();
                }
                self.single = !self.single;
            }
            '"' if !self.single => {
                if self.double && chars.peek() == Some(&'"') {
                    return chars.next();
                }
                self.double = !self.double;
            }
            _ => {}
        }

        None
    }
}

///
/// Comment
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Comment {
    None,
    Line,
    Block,
}

/// Split raw SQL text into trimmed, non-empty statements at top-level `;`.
///
/// Comments are kept verbatim inside the statement they belong to, but a `;`
/// or quote character inside a comment never affects splitting. A trailing
/// fragment without a final `;` is still returned.
#[must_use]
pub fn split_statements(content: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut quotes = Quotes::default();
    let mut comment = Comment::None;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match comment {
            Comment::Line => {
                current.push(c);
                if c == '\n' {
                    comment = Comment::None;
                }
                continue;
            }
            Comment::Block => {
                current.push(c);
                if c == '*' && chars.peek() == Some(&'/') {
                    current.push('/');
                    chars.next();
                    comment = Comment::None;
                }
                continue;
            }
            Comment::None => {}
        }

        if !quotes.quoted() {
            match (c, chars.peek()) {
                ('-', Some('-')) => {
                    comment = Comment::Line;
                    current.push(c);
                    continue;
                }
                ('/', Some('*')) => {
                    comment = Comment::Block;
                    current.push_str("/*");
                    chars.next();
                    continue;
                }
                (';', _) => {
                    push_trimmed(&mut statements, &current);
                    current.clear();
                    continue;
                }
                _ => {}
            }
        }

        current.push(c);
        if let Some(escaped) = quotes.observe(c, &mut chars) {
            current.push(escaped);
        }
    }

    push_trimmed(&mut statements, &current);

    statements
}

/// Remove `-- ...` and `/* ... */` comments that sit outside quoted strings.
///
/// The newline closing a line comment is kept; block comments vanish
/// entirely, newlines included.
#[must_use]
pub fn strip_comments(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut quotes = Quotes::default();
    let mut comment = Comment::None;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match comment {
            Comment::Line => {
                if c == '\n' {
                    out.push(c);
                    comment = Comment::None;
                }
                continue;
            }
            Comment::Block => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    comment = Comment::None;
                }
                continue;
            }
            Comment::None => {}
        }

        if !quotes.quoted() {
            match (c, chars.peek()) {
                ('-', Some('-')) => {
                    chars.next();
                    comment = Comment::Line;
                    continue;
                }
                ('/', Some('*')) => {
                    chars.next();
                    comment = Comment::Block;
                    continue;
                }
                _ => {}
            }
        }

        out.push(c);
        if let Some(escaped) = quotes.observe(c, &mut chars) {
            out.push(escaped);
        }
    }

    out
}

/// Whether the statement carries a positional `?` placeholder outside
/// quoted strings and comments.
#[must_use]
pub fn has_placeholders(sql: &str) -> bool {
    let stripped = strip_comments(sql);
    let mut quotes = Quotes::default();
    let mut chars = stripped.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '?' && !quotes.quoted() {
            return true;
        }
        quotes.observe(c, &mut chars);
    }

    false
}

/// Collapse every whitespace run to a single space and trim the ends.
#[must_use]
pub fn normalize_whitespace(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn push_trimmed(statements: &mut Vec<String>, current: &str) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
}
