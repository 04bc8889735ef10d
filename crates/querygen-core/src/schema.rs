//! Module: schema
//! Responsibility: the table/column model and the introspection seam.
//!
//! Invariants:
//! - Tables keep backend order (by name); columns keep ordinal order.
//! - Every `TableField` carries a resolved `TargetType`; an unmapped column
//!   type aborts the whole run.

#[cfg(test)]
mod tests;

use crate::{
    Error,
    types::{TargetType, TypeError, map_type},
};
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;
use tracing::{debug, info};

///
/// IntrospectError
///

#[derive(Debug, ThisError)]
pub enum IntrospectError {
    #[error("schema backend error: {0}")]
    Backend(String),

    #[error("failed to read schema snapshot '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid schema snapshot: {0}")]
    Snapshot(#[from] toml::de::Error),

    #[error("table '{0}' is not part of the schema")]
    UnknownTable(String),
}

impl IntrospectError {
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }
}

///
/// ColumnInfo
/// One catalog row: name, base data type, full column type.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub column_type: String,
}

impl ColumnInfo {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        data_type: impl Into<String>,
        column_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            column_type: column_type.into(),
        }
    }
}

///
/// TableField
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableField {
    pub name: String,
    pub data_type: String,
    pub column_type: String,
    pub mapped: TargetType,
}

impl TableField {
    pub fn new(column: ColumnInfo) -> Result<Self, TypeError> {
        let mapped = map_type(&column.data_type, &column.column_type)?;

        Ok(Self {
            name: column.name,
            data_type: column.data_type,
            column_type: column.column_type,
            mapped,
        })
    }
}

///
/// Table
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Table {
    pub name: String,
    pub fields: Vec<TableField>,
}

///
/// SchemaIntrospector
/// Source of base-table names and their columns.
///

pub trait SchemaIntrospector {
    /// Base tables only (no views), ordered by name.
    fn table_names(&mut self) -> Result<Vec<String>, IntrospectError>;

    /// Columns of `table` in ordinal order.
    fn columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>, IntrospectError>;
}

/// Read every table and map every column type.
pub fn introspect(introspector: &mut dyn SchemaIntrospector) -> Result<Vec<Table>, Error> {
    let names = introspector.table_names()?;
    let mut tables = Vec::with_capacity(names.len());

    for name in names {
        let fields = introspector
            .columns(&name)?
            .into_iter()
            .map(TableField::new)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(table = %name, columns = fields.len(), "introspected table");
        tables.push(Table { name, fields });
    }

    info!(tables = tables.len(), "schema introspection complete");

    Ok(tables)
}

///
/// SchemaSnapshot
///
/// Offline schema description in TOML:
///
/// ```toml
/// [[tables]]
/// name = "users"
/// columns = [
///     { name = "id", data_type = "int", column_type = "int(11)" },
/// ]
/// ```
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaSnapshot {
    #[serde(default)]
    pub tables: Vec<SnapshotTable>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotTable {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,
}

impl SchemaSnapshot {
    pub fn from_toml_str(s: &str) -> Result<Self, IntrospectError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, IntrospectError> {
        let s = fs::read_to_string(path).map_err(|source| IntrospectError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&s)
    }
}

impl SchemaIntrospector for SchemaSnapshot {
    fn table_names(&mut self) -> Result<Vec<String>, IntrospectError> {
        let mut names: Vec<_> = self.tables.iter().map(|t| t.name.clone()).collect();
        names.sort();

        Ok(names)
    }

    fn columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>, IntrospectError> {
        self.tables
            .iter()
            .find(|t| t.name == table)
            .map(|t| t.columns.clone())
            .ok_or_else(|| IntrospectError::UnknownTable(table.to_string()))
    }
}
