use crate::{query::ValidationError, sql::lexer::normalize_whitespace};
use regex::Regex;
use std::sync::LazyLock;

// Only a bare `select *` trips this; `select t.*` and `count(*)` pass.
static SELECT_STAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)select\s*\*").expect("select-star regex is valid"));

/// Reject statements that project `SELECT *`.
///
/// `index` is the statement's position inside its source so the operator can
/// locate it.
pub fn check_no_select_star(origin: &str, index: usize, query: &str) -> Result<(), ValidationError> {
    let normalized = normalize_whitespace(query);

    if SELECT_STAR_REGEX.is_match(&normalized) {
        return Err(ValidationError::SelectStar {
            origin: origin.to_string(),
            index,
            query: normalized,
        });
    }

    Ok(())
}
