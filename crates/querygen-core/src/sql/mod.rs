//! Minimal SQL front end.
//!
//! Only enough syntax is recognized to split statements, strip comments,
//! read annotation lines and positionally pull the top-level projection list.
//! There is no general parser here.

pub mod annotation;
pub mod guard;
pub mod lexer;
pub mod projection;

pub use annotation::{Annotations, parse_block};
pub use guard::check_no_select_star;
pub use lexer::{has_placeholders, normalize_whitespace, split_statements, strip_comments};
pub use projection::extract_fields;
