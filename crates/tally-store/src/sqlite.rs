//! SQLite-backed Warehouse implementation

use std::collections::HashSet;

use rusqlite::types::Value as SqlValue;
use rusqlite::Connection;
use tally_core::{TallyError, Warehouse};
use tally_core_types::{
    ColumnSpec, ColumnType, Row, SurrogateKey, TableId, TableSchema, Value,
};

use crate::errors::{from_rusqlite, Result};

/// Warehouse adapter over one SQLite connection
///
/// Owns the connection for the lifetime of the run. Appends run inside a
/// transaction, so a batch lands whole or not at all.
pub struct SqliteWarehouse {
    conn: Connection,
}

impl SqliteWarehouse {
    /// Wrap an open connection
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Borrow the underlying connection (for provisioning and status tooling)
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Give the connection back
    pub fn into_inner(self) -> Connection {
        self.conn
    }

    /// Number of rows currently in a table
    ///
    /// # Errors
    /// * `TableNotProvisioned` - if the table does not exist
    /// * `Persistence` - on query failure
    pub fn row_count(&self, table: &TableId) -> Result<u64> {
        self.require_table(table)?;
        let count: i64 = self
            .conn
            .query_row(
                &format!("SELECT COUNT(*) FROM \"{}\"", table.as_str()),
                [],
                |row| row.get(0),
            )
            .map_err(|e| from_rusqlite("row_count", e))?;
        Ok(count as u64)
    }

    fn table_exists(&self, table: &TableId) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table.as_str()],
                |row| row.get(0),
            )
            .map_err(|e| from_rusqlite("table_exists", e))?;
        Ok(count > 0)
    }

    fn require_table(&self, table: &TableId) -> Result<()> {
        if self.table_exists(table)? {
            Ok(())
        } else {
            Err(TallyError::not_provisioned(table.as_str()))
        }
    }
}

/// Map a SQLite declared type to the schema model
///
/// Order matters: TIMESTAMP/DATETIME contain no affinity keywords we match
/// earlier, but BOOLEAN and BIGINT both contain "INT"-adjacent substrings,
/// so the boolean and timestamp checks run before the integer one.
fn column_type_from_declared(table: &TableId, column: &str, declared: &str) -> Result<ColumnType> {
    let upper = declared.to_ascii_uppercase();
    if upper.contains("BOOL") {
        Ok(ColumnType::Boolean)
    } else if upper.contains("TIME") || upper.contains("DATE") {
        Ok(ColumnType::Timestamp)
    } else if upper.contains("INT") {
        Ok(ColumnType::Integer)
    } else if upper.contains("CHAR") || upper.contains("TEXT") || upper.contains("CLOB") {
        Ok(ColumnType::Text)
    } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
        Ok(ColumnType::Real)
    } else {
        Err(TallyError::schema_mismatch(
            table.as_str(),
            column,
            format!("unsupported declared type '{}'", declared),
        ))
    }
}

/// Convert a cell to its SQLite representation
fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Integer(v) => SqlValue::Integer(*v),
        Value::Real(v) => SqlValue::Real(*v),
        Value::Text(v) => SqlValue::Text(v.clone()),
        Value::Boolean(v) => SqlValue::Integer(i64::from(*v)),
        Value::Timestamp(v) => SqlValue::Text(v.to_rfc3339()),
        Value::Null => SqlValue::Null,
    }
}

impl Warehouse for SqliteWarehouse {
    fn max_key(&self, table: &TableId) -> Result<SurrogateKey> {
        let schema = self.schema(table)?;
        let key_column = schema.key_column().ok_or_else(|| {
            TallyError::schema_mismatch(table.as_str(), "", "table has no columns")
        })?;
        let max: i64 = self
            .conn
            .query_row(
                &format!(
                    "SELECT COALESCE(MAX(\"{}\"), 0) FROM \"{}\"",
                    key_column,
                    table.as_str()
                ),
                [],
                |row| row.get(0),
            )
            .map_err(|e| from_rusqlite("max_key", e))?;
        Ok(SurrogateKey::new(max.max(0) as u64))
    }

    fn schema(&self, table: &TableId) -> Result<TableSchema> {
        self.require_table(table)?;
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info(\"{}\")", table.as_str()))
            .map_err(|e| from_rusqlite("schema", e))?;
        let mut rows = stmt
            .query([])
            .map_err(|e| from_rusqlite("schema", e))?;

        let mut columns = Vec::new();
        while let Some(row) = rows.next().map_err(|e| from_rusqlite("schema", e))? {
            let name: String = row.get(1).map_err(|e| from_rusqlite("schema", e))?;
            let declared: String = row.get(2).map_err(|e| from_rusqlite("schema", e))?;
            let notnull: i64 = row.get(3).map_err(|e| from_rusqlite("schema", e))?;
            columns.push(ColumnSpec {
                column_type: column_type_from_declared(table, &name, &declared)?,
                name,
                nullable: notnull == 0,
            });
        }
        Ok(TableSchema::new(table.clone(), columns))
    }

    fn business_keys(&self, table: &TableId, column: &str) -> Result<HashSet<String>> {
        let schema = self.schema(table)?;
        match schema.column(column) {
            Some(spec) if spec.column_type == ColumnType::Text => {}
            Some(spec) => {
                return Err(TallyError::schema_mismatch(
                    table.as_str(),
                    column,
                    format!("business key column must be text, found {}", spec.column_type),
                ))
            }
            None => {
                return Err(TallyError::schema_mismatch(
                    table.as_str(),
                    column,
                    "unknown business key column",
                ))
            }
        }

        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT DISTINCT \"{}\" FROM \"{}\" WHERE \"{}\" IS NOT NULL",
                column,
                table.as_str(),
                column
            ))
            .map_err(|e| from_rusqlite("business_keys", e))?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| from_rusqlite("business_keys", e))?
            .collect::<std::result::Result<HashSet<String>, _>>()
            .map_err(|e| from_rusqlite("business_keys", e))?;
        Ok(keys)
    }

    fn append(&mut self, table: &TableId, rows: &[Row]) -> Result<()> {
        self.require_table(table)?;
        let tx = self
            .conn
            .transaction()
            .map_err(|e| from_rusqlite("append", e))?;

        for row in rows {
            let names: Vec<String> = row
                .column_names()
                .map(|n| format!("\"{}\"", n))
                .collect();
            let placeholders: Vec<String> =
                (1..=row.len()).map(|i| format!("?{}", i)).collect();
            let sql = format!(
                "INSERT INTO \"{}\" ({}) VALUES ({})",
                table.as_str(),
                names.join(", "),
                placeholders.join(", ")
            );
            let params: Vec<SqlValue> = row.iter().map(|(_, v)| to_sql_value(v)).collect();
            tx.execute(&sql, rusqlite::params_from_iter(params))
                .map_err(|e| from_rusqlite("append", e))?;
        }

        tx.commit().map_err(|e| from_rusqlite("append", e))?;
        Ok(())
    }
}
