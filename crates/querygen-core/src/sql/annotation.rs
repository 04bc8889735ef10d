//! Module: sql::annotation
//! Responsibility: read per-query metadata from `--` annotation lines and
//! produce the comment-free query body.
//!
//! Recognized tags (case-sensitive, whitespace after `--` is optional):
//! `Name:`, `Params:`, `Returns:`, `ResultMode:`, and the bare markers
//! `Transaction` (alias `Tx`) and `Context`. Any other `--` or `#` line is
//! dropped.


use crate::{query::ResultMode, sql::lexer::strip_comments};

///
/// Annotations
/// Raw metadata collected from one annotated block.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Annotations {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub returns: Vec<String>,
    pub mode: ResultMode,

    /// The `ResultMode:` value as written, when it was not recognized.
    pub unrecognized_mode: Option<String>,

    pub use_tx: bool,
    pub use_ctx: bool,

    /// Statement text with annotation lines and comments removed, trimmed.
    pub query: String,
}

///
/// Tag
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Tag<'a> {
    Name(&'a str),
    Params(&'a str),
    Returns(&'a str),
    ResultMode(&'a str),
    Transaction,
    Context,
}

///
/// Line
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Line<'a> {
    Tag(Tag<'a>),
    Comment,
    Sql,
}

impl<'a> Line<'a> {
    fn classify(line: &'a str) -> Self {
        let trimmed = line.trim();

        if let Some(body) = trimmed.strip_prefix("--") {
            return Tag::parse(body.trim()).map_or(Self::Comment, Self::Tag);
        }
        if trimmed.starts_with('#') {
            return Self::Comment;
        }

        Self::Sql
    }
}

impl<'a> Tag<'a> {
    fn parse(body: &'a str) -> Option<Self> {
        let valued = |prefix: &str| body.strip_prefix(prefix).map(str::trim);

        if let Some(v) = valued("Name:") {
            return Some(Self::Name(v));
        }
        if let Some(v) = valued("Params:") {
            return Some(Self::Params(v));
        }
        if let Some(v) = valued("Returns:") {
            return Some(Self::Returns(v));
        }
        if let Some(v) = valued("ResultMode:") {
            return Some(Self::ResultMode(v));
        }

        match body {
            "Transaction" | "Tx" => Some(Self::Transaction),
            "Context" => Some(Self::Context),
            _ => None,
        }
    }
}

/// Parse one annotated block (a single split statement).
#[must_use]
pub fn parse_block(raw: &str) -> Annotations {
    let mut annotations = Annotations::default();
    let mut kept = Vec::new();

    for line in raw.lines() {
        match Line::classify(line) {
            Line::Tag(tag) => annotations.apply(tag),
            Line::Comment => {}
            Line::Sql => kept.push(line),
        }
    }

    annotations.query = strip_comments(&kept.join("\n")).trim().to_string();

    annotations
}

impl Annotations {
    fn apply(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Name(v) => self.name = (!v.is_empty()).then(|| v.to_string()),
            Tag::Params(v) => self.params = identifier_list(v),
            Tag::Returns(v) => self.returns = identifier_list(v),
            Tag::ResultMode(v) => match ResultMode::parse(v) {
                Some(mode) => {
                    self.mode = mode;
                    self.unrecognized_mode = None;
                }
                None => {
                    self.mode = ResultMode::default();
                    self.unrecognized_mode = Some(v.to_string());
                }
            },
            Tag::Transaction => self.use_tx = true,
            Tag::Context => self.use_ctx = true,
        }
    }
}

// identifier_list
// whitespace-delimited, stray commas tolerated
fn identifier_list(value: &str) -> Vec<String> {
    value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
