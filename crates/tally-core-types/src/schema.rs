//! Authoritative table schema model
//!
//! The warehouse, not this system, owns the schema of every table. Adapters
//! report it through these types and the controller validates candidate rows
//! against it before any write.

use serde::{Deserialize, Serialize};

use crate::table::TableId;

/// Column type as declared by the warehouse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// 64-bit signed integer
    Integer,
    /// Double-precision float
    Real,
    /// UTF-8 text
    Text,
    /// Boolean flag
    Boolean,
    /// Point in time (UTC)
    Timestamp,
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Timestamp => "TIMESTAMP",
        };
        write!(f, "{}", name)
    }
}

/// One column of an authoritative table schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name
    pub name: String,
    /// Declared type
    pub column_type: ColumnType,
    /// Whether NULL is an acceptable value
    pub nullable: bool,
}

impl ColumnSpec {
    /// A required (non-nullable) column
    pub fn required(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
        }
    }

    /// An optional (nullable) column
    pub fn nullable(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
        }
    }
}

/// Ordered column layout of one warehouse table
///
/// The first column is by convention the surrogate key: a non-nullable
/// integer assigned by the load controller, never by the producer of
/// candidate rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// The table this schema describes
    pub table: TableId,
    /// Ordered columns; index 0 is the surrogate key column
    pub columns: Vec<ColumnSpec>,
}

impl TableSchema {
    /// Build a schema for `table` with the given columns
    pub fn new(table: TableId, columns: Vec<ColumnSpec>) -> Self {
        Self { table, columns }
    }

    /// Name of the surrogate key column (first column)
    pub fn key_column(&self) -> Option<&str> {
        self.columns.first().map(|c| c.name.as_str())
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns other than the surrogate key, in declaration order
    pub fn value_columns(&self) -> &[ColumnSpec] {
        if self.columns.is_empty() {
            &[]
        } else {
            &self.columns[1..]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> TableSchema {
        TableSchema::new(
            TableId::new("products"),
            vec![
                ColumnSpec::required("product_key", ColumnType::Integer),
                ColumnSpec::required("product_name", ColumnType::Text),
                ColumnSpec::nullable("list_price", ColumnType::Real),
            ],
        )
    }

    #[test]
    fn test_key_column_is_first() {
        let schema = sample_schema();
        assert_eq!(schema.key_column(), Some("product_key"));
    }

    #[test]
    fn test_value_columns_exclude_key() {
        let schema = sample_schema();
        let names: Vec<&str> = schema.value_columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["product_name", "list_price"]);
    }

    #[test]
    fn test_column_lookup() {
        let schema = sample_schema();
        assert!(schema.column("list_price").is_some());
        assert!(schema.column("missing").is_none());
    }
}
