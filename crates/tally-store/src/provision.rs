//! Table provisioning
//!
//! Creates warehouse tables from their schemas. This is bootstrap tooling
//! for operators (`tally init`); the load controller treats a missing table
//! as fatal and never calls into here.

use rusqlite::Connection;
use tally_core_types::{ColumnType, TableSchema};

use crate::errors::{from_rusqlite, Result};

/// SQLite declared type for a schema column type
fn declared_type(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Integer => "INTEGER",
        ColumnType::Real => "REAL",
        ColumnType::Text => "TEXT",
        ColumnType::Boolean => "BOOLEAN",
        ColumnType::Timestamp => "TIMESTAMP",
    }
}

/// Create the table described by `schema` if it does not already exist
///
/// The first column is declared the primary key; every non-nullable column
/// gets NOT NULL so `PRAGMA table_info` reports the schema back faithfully.
///
/// # Errors
/// * `Persistence` - if the DDL fails
pub fn provision(conn: &Connection, schema: &TableSchema) -> Result<()> {
    let mut defs: Vec<String> = Vec::with_capacity(schema.columns.len());
    for (i, column) in schema.columns.iter().enumerate() {
        let mut def = format!("\"{}\" {}", column.name, declared_type(column.column_type));
        if !column.nullable {
            def.push_str(" NOT NULL");
        }
        if i == 0 {
            def.push_str(" PRIMARY KEY");
        }
        defs.push(def);
    }
    let ddl = format!(
        "CREATE TABLE IF NOT EXISTS \"{}\" ({})",
        schema.table.as_str(),
        defs.join(", ")
    );
    conn.execute(&ddl, [])
        .map_err(|e| from_rusqlite("provision", e))?;
    tracing::debug!(table = %schema.table, "provisioned table");
    Ok(())
}
