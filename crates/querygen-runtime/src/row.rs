use crate::{
    Error,
    value::{FromValue, Value},
};

///
/// Row
/// Positional result row; decoding consumes values left to right.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    #[must_use]
    pub const fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    #[must_use]
    pub fn from_values(values: Vec<Value>) -> Self {
        Self {
            columns: Vec::new(),
            values,
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Move the value at `index` out and decode it; `column` names it in errors.
    pub fn take<T: FromValue>(&mut self, index: usize, column: &str) -> Result<T, Error> {
        let slot = self
            .values
            .get_mut(index)
            .ok_or_else(|| Error::MissingColumn {
                index,
                column: column.to_string(),
            })?;

        T::from_value(std::mem::take(slot), column)
    }
}

///
/// FromRow
///

pub trait FromRow: Sized {
    fn from_row(row: Row) -> Result<Self, Error>;
}

impl FromRow for Row {
    fn from_row(row: Row) -> Result<Self, Error> {
        Ok(row)
    }
}
