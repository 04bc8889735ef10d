//! Module: naming
//! Responsibility: turn raw catalog identifiers into exported PascalCase names.
//!
//! Invariants:
//! - Separator-delimited input is split only on separators; digits never split.
//! - Undelimited input is split by character class (camel-case tokenizer).
//! - No acronym preservation: every segment is first-upper, rest-lower.

#[cfg(test)]
mod tests;

/// Characters treated as word separators in raw identifiers.
pub const SEPARATORS: [char; 3] = ['_', '-', '.'];

/// Normalize a raw identifier into a PascalCase fragment.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let spaced: String = raw
        .chars()
        .map(|c| if SEPARATORS.contains(&c) { ' ' } else { c })
        .collect();

    // separator path
    if spaced.contains(' ') {
        return spaced
            .split(' ')
            .filter(|part| !part.is_empty())
            .map(capitalize)
            .collect();
    }

    // camel-case path
    split_camel(&spaced).iter().map(|run| capitalize(run)).collect()
}

/// Uppercase the first character and lowercase the rest (Unicode aware).
#[must_use]
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut out = String::with_capacity(s.len());
    out.extend(first.to_uppercase());
    for c in chars {
        out.extend(c.to_lowercase());
    }

    out
}

/// Whether a normalized name can be used verbatim as a Rust type identifier.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();

    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

///
/// CharClass
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum CharClass {
    Lower,
    Upper,
    Digit,
    Other,
}

impl CharClass {
    fn of(c: char) -> Self {
        if c.is_lowercase() {
            Self::Lower
        } else if c.is_uppercase() {
            Self::Upper
        } else if c.is_numeric() {
            Self::Digit
        } else {
            Self::Other
        }
    }
}

// split_camel
// Group characters into same-class runs, then hand the last capital of an
// uppercase run to a following lowercase run ("HTTPConnection" -> HTTP,
// Connection; "OAuthToken" -> O, Auth, Token).
fn split_camel(s: &str) -> Vec<String> {
    let mut runs: Vec<(CharClass, Vec<char>)> = Vec::new();

    for c in s.chars() {
        let class = CharClass::of(c);
        match runs.last_mut() {
            Some((last, run)) if *last == class => run.push(c),
            _ => runs.push((class, vec![c])),
        }
    }

    for i in 0..runs.len().saturating_sub(1) {
        if runs[i].0 == CharClass::Upper && runs[i + 1].0 == CharClass::Lower {
            if let Some(moved) = runs[i].1.pop() {
                runs[i + 1].1.insert(0, moved);
            }
        }
    }

    runs.into_iter()
        .filter(|(_, run)| !run.is_empty())
        .map(|(_, run)| run.into_iter().collect())
        .collect()
}
