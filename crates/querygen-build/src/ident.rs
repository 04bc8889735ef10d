//! Module: ident
//! Responsibility: derive generated Rust identifiers from catalog and query
//! names.
//!
//! Invariants:
//! - Every identifier goes through `normalize` first; raw names are never
//!   emitted verbatim.
//! - Keywords become raw identifiers; `self`, `Self`, `super`, `crate` get a
//!   trailing underscore since they cannot be raw.
//! - Invalid names are errors, never panics.

use crate::BuildError;
use heck::ToSnakeCase;
use proc_macro2::{Ident, Span};
use querygen_core::naming::{is_identifier, normalize};
use std::collections::BTreeMap;

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

const NON_RAW_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];

/// PascalCase type identifier for a raw name.
pub fn type_ident(raw: &str) -> Result<Ident, BuildError> {
    make(raw, &normalize(raw))
}

/// snake_case identifier (field, function or module) for a raw name.
pub fn snake_ident(raw: &str) -> Result<Ident, BuildError> {
    make(raw, &snake_name(raw))
}

#[must_use]
pub fn snake_name(raw: &str) -> String {
    normalize(raw).to_snake_case()
}

/// Build an identifier from an already derived name.
pub fn make(raw: &str, name: &str) -> Result<Ident, BuildError> {
    if name == "_" || !is_identifier(name) {
        return Err(BuildError::InvalidIdentifier {
            raw: raw.to_string(),
            name: name.to_string(),
        });
    }

    if NON_RAW_KEYWORDS.contains(&name) {
        return Ok(Ident::new(&format!("{name}_"), Span::call_site()));
    }
    if KEYWORDS.contains(&name) {
        return Ok(Ident::new_raw(name, Span::call_site()));
    }

    syn::parse_str::<Ident>(name).map_err(|_| BuildError::InvalidIdentifier {
        raw: raw.to_string(),
        name: name.to_string(),
    })
}

///
/// NameSet
/// Detects two raw names collapsing onto one generated identifier.
///

#[derive(Debug)]
pub struct NameSet<'a> {
    context: &'a str,
    seen: BTreeMap<String, String>,
}

impl<'a> NameSet<'a> {
    #[must_use]
    pub const fn new(context: &'a str) -> Self {
        Self {
            context,
            seen: BTreeMap::new(),
        }
    }

    /// Reserve a name that is not derived from user input.
    #[must_use]
    pub fn reserved(mut self, names: &[&str]) -> Self {
        for name in names {
            self.seen.insert((*name).to_string(), format!("built-in `{name}`"));
        }
        self
    }

    pub fn claim(&mut self, ident: &Ident, raw: &str) -> Result<(), BuildError> {
        let key = ident.to_string();

        if let Some(first) = self.seen.get(&key) {
            return Err(BuildError::NameCollision {
                name: key,
                context: format!("{}: '{first}' and '{raw}'", self.context),
            });
        }
        self.seen.insert(key, raw.to_string());

        Ok(())
    }
}
