use crate::Error;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::collections::HashMap;

///
/// EmbeddedQuery
/// One entry of the base64 query table baked into a generated module.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EmbeddedQuery {
    pub name: &'static str,
    pub encoded: &'static str,
}

impl EmbeddedQuery {
    #[must_use]
    pub const fn new(name: &'static str, encoded: &'static str) -> Self {
        Self { name, encoded }
    }

    pub fn decode(&self) -> Result<String, Error> {
        let embedded = |message: String| Error::Embedded {
            name: self.name.to_string(),
            message,
        };

        let bytes = STANDARD
            .decode(self.encoded)
            .map_err(|err| embedded(err.to_string()))?;

        String::from_utf8(bytes).map_err(|err| embedded(err.to_string()))
    }
}

///
/// QuerySet
/// Decoded SQL text by query name.
///

#[derive(Clone, Debug, Default)]
pub struct QuerySet {
    queries: HashMap<&'static str, String>,
}

impl QuerySet {
    /// Decode the whole table; any bad entry fails the set.
    pub fn decode(table: &[EmbeddedQuery]) -> Result<Self, Error> {
        let queries = table
            .iter()
            .map(|q| Ok((q.name, q.decode()?)))
            .collect::<Result<_, Error>>()?;

        Ok(Self { queries })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.queries.get(name).map(String::as_str)
    }

    /// SQL for `name`, or a configuration error naming it.
    pub fn sql(&self, name: &str) -> Result<&str, Error> {
        self.get(name)
            .ok_or_else(|| Error::config(name, "no embedded SQL for this query"))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_table() {
        // "SELECT 1"
        let set = QuerySet::decode(&[EmbeddedQuery::new("One", "U0VMRUNUIDE=")]).unwrap();

        assert_eq!(set.get("One"), Some("SELECT 1"));
        assert_eq!(set.len(), 1);
        assert!(matches!(set.sql("Two"), Err(Error::Config { .. })));
    }

    #[test]
    fn bad_base64_names_the_query() {
        let err = QuerySet::decode(&[EmbeddedQuery::new("Broken", "***")]).unwrap_err();

        assert!(matches!(err, Error::Embedded { ref name, .. } if name == "Broken"));
    }

    #[test]
    fn non_utf8_payload_is_rejected() {
        // 0xff 0xfe
        let err = EmbeddedQuery::new("Bin", "//4=").decode().unwrap_err();
        assert!(matches!(err, Error::Embedded { .. }));
    }
}
