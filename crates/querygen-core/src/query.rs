//! Module: query
//! Responsibility: the canonical query descriptor and the batch compiler that
//! turns annotated sources into validated descriptors.
//!
//! Invariants:
//! - Names are normalized, non-empty, valid identifiers and unique per batch.
//! - No compiled query projects `SELECT *`.
//! - A missing result field list is never fatal here; it becomes
//!   `ResultShape::Missing` and is reported by generated code at call time.

#[cfg(test)]
mod tests;

use crate::{
    naming::{is_identifier, normalize},
    source::QuerySource,
    sql::{check_no_select_star, extract_fields, has_placeholders, parse_block, split_statements},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;
use tracing::{debug, warn};

///
/// ValidationError
///

#[derive(Debug, ThisError)]
pub enum ValidationError {
    #[error("SELECT * is not allowed ({origin}, statement {index}): {query}")]
    SelectStar {
        origin: String,
        index: usize,
        query: String,
    },

    #[error("duplicate query name '{name}' in {first} and {second}")]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },

    #[error("query has no `-- Name:` annotation ({origin}, statement {index})")]
    MissingName { origin: String, index: usize },

    #[error("query name '{name}' does not form a valid identifier ({origin})")]
    InvalidName { name: String, origin: String },
}

///
/// ResultMode
///

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ResultMode {
    #[default]
    #[display("many")]
    Many,
    #[display("one")]
    One,
    #[display("exec")]
    Exec,
}

impl ResultMode {
    /// Parse a `ResultMode:` value: first comma token, case-insensitive.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let first = value.split(',').next().unwrap_or_default();

        match first.trim().to_ascii_lowercase().as_str() {
            "many" => Some(Self::Many),
            "one" => Some(Self::One),
            "exec" => Some(Self::Exec),
            _ => None,
        }
    }

    #[must_use]
    pub const fn returns_rows(self) -> bool {
        matches!(self, Self::Many | Self::One)
    }
}

///
/// ResultShape
/// What the generated core function hands back.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResultShape {
    Exec,
    Rows { fields: Vec<String>, inferred: bool },
    Missing,
}

///
/// NamedQuery
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NamedQuery {
    /// Normalized PascalCase name; every generated symbol derives from it.
    pub name: String,
    pub query: String,
    pub query_encoded: String,

    /// Declared parameter names (documentation only).
    pub params: Vec<String>,
    pub returns: Vec<String>,
    pub mode: ResultMode,
    pub use_tx: bool,
    pub use_ctx: bool,

    /// `<source>#<statement index>`, for diagnostics.
    pub origin: String,
}

impl NamedQuery {
    #[must_use]
    pub fn new(name: impl Into<String>, query: impl Into<String>, mode: ResultMode) -> Self {
        let query = query.into();

        Self {
            name: name.into(),
            query_encoded: STANDARD.encode(query.as_bytes()),
            query,
            params: Vec::new(),
            returns: Vec::new(),
            mode,
            use_tx: false,
            use_ctx: false,
            origin: String::new(),
        }
    }

    #[must_use]
    pub fn with_returns<I, S>(mut self, returns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.returns = returns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Declared params or a `?` placeholder both make the call take arguments.
    #[must_use]
    pub fn has_params(&self) -> bool {
        !self.params.is_empty() || has_placeholders(&self.query)
    }

    #[must_use]
    pub fn inferred_fields(&self) -> Vec<String> {
        extract_fields(&self.query)
    }

    #[must_use]
    pub fn result_shape(&self) -> ResultShape {
        if !self.mode.returns_rows() {
            return ResultShape::Exec;
        }
        if !self.returns.is_empty() {
            return ResultShape::Rows {
                fields: self.returns.clone(),
                inferred: false,
            };
        }

        // inference is only trusted when every name becomes a distinct identifier
        let inferred = self.inferred_fields();
        if !inferred.is_empty() && distinct_identifiers(&inferred) {
            return ResultShape::Rows {
                fields: inferred,
                inferred: true,
            };
        }

        ResultShape::Missing
    }
}

// distinct_identifiers
// Field idents are snake_case of the normalized name, so names equal after
// lowercasing the normalized form would collide.
fn distinct_identifiers(fields: &[String]) -> bool {
    let mut seen = BTreeSet::new();

    fields.iter().all(|field| {
        let name = normalize(field);
        is_identifier(&name) && seen.insert(name.to_lowercase())
    })
}

///
/// QueryCompiler
/// Accumulates descriptors across sources, enforcing batch-wide invariants.
///

#[derive(Debug, Default)]
pub struct QueryCompiler {
    queries: Vec<NamedQuery>,
    seen: BTreeMap<String, String>,
}

impl QueryCompiler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile every annotated block of one source; returns how many were added.
    pub fn compile(&mut self, source: &QuerySource) -> Result<usize, ValidationError> {
        let blocks: Vec<_> = split_statements(&source.content)
            .iter()
            .enumerate()
            .map(|(index, statement)| (index, parse_block(statement)))
            .filter(|(index, block)| {
                if block.query.is_empty() {
                    if let Some(name) = &block.name {
                        warn!(origin = %source.origin, index, name, "annotated block has no SQL, skipping");
                    }
                    return false;
                }
                true
            })
            .collect();

        let single = blocks.len() == 1;
        let mut added = 0;

        for (index, block) in blocks {
            check_no_select_star(&source.origin, index, &block.query)?;

            let raw_name = match block.name {
                Some(name) => name,
                None if single => source
                    .stem()
                    .map(str::to_string)
                    .ok_or_else(|| ValidationError::MissingName {
                        origin: source.origin.clone(),
                        index,
                    })?,
                None => {
                    return Err(ValidationError::MissingName {
                        origin: source.origin.clone(),
                        index,
                    });
                }
            };

            let origin = format!("{}#{index}", source.origin);
            let name = normalize(&raw_name);
            if !is_identifier(&name) {
                return Err(ValidationError::InvalidName {
                    name: raw_name,
                    origin,
                });
            }
            if let Some(first) = self.seen.get(&name) {
                return Err(ValidationError::DuplicateName {
                    name,
                    first: first.clone(),
                    second: origin,
                });
            }

            if let Some(raw_mode) = &block.unrecognized_mode {
                debug!(%name, raw_mode, "unrecognized ResultMode, using many");
            }

            let query = NamedQuery {
                params: block.params,
                returns: block.returns,
                use_tx: block.use_tx,
                use_ctx: block.use_ctx,
                origin: origin.clone(),
                ..NamedQuery::new(name.clone(), block.query, block.mode)
            };

            cross_check_fields(&query);
            debug!(%name, mode = %query.mode, %origin, "compiled query");

            self.seen.insert(name, origin);
            self.queries.push(query);
            added += 1;
        }

        Ok(added)
    }

    #[must_use]
    pub fn finish(self) -> Vec<NamedQuery> {
        self.queries
    }
}

/// Compile a batch of sources in order.
pub fn compile_sources(sources: &[QuerySource]) -> Result<Vec<NamedQuery>, ValidationError> {
    let mut compiler = QueryCompiler::new();
    for source in sources {
        compiler.compile(source)?;
    }

    Ok(compiler.finish())
}

// cross_check_fields
// explicit Returns stay authoritative; a count mismatch is only reported
fn cross_check_fields(query: &NamedQuery) {
    if !query.mode.returns_rows() || query.returns.is_empty() {
        return;
    }

    let inferred = query.inferred_fields();
    if !inferred.is_empty() && inferred.len() != query.returns.len() {
        warn!(
            name = %query.name,
            returns = query.returns.len(),
            inferred = inferred.len(),
            "Returns list and projection disagree, using Returns"
        );
    }
}
