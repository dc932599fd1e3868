//! In-memory warehouse for tests and reference semantics

use std::collections::{HashMap, HashSet};

use tally_core_types::{ColumnType, Row, SurrogateKey, TableId, TableSchema, Value};

use crate::errors::{Result, TallyError};
use crate::warehouse::Warehouse;

/// One provisioned in-memory table
#[derive(Debug, Clone)]
struct MemoryTable {
    schema: TableSchema,
    rows: Vec<Row>,
}

/// HashMap-backed warehouse
///
/// Not thread-safe (no Arc/RwLock) - designed for single-threaded use,
/// matching the single-writer model. Rows are stored in append order and
/// never mutated or removed.
#[derive(Debug, Clone, Default)]
pub struct MemoryWarehouse {
    tables: HashMap<TableId, MemoryTable>,
}

impl MemoryWarehouse {
    /// Create an empty warehouse with no tables provisioned
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision a table from its schema
    ///
    /// Re-provisioning an existing table is a no-op; existing rows are kept.
    pub fn provision(&mut self, schema: TableSchema) {
        self.tables
            .entry(schema.table.clone())
            .or_insert(MemoryTable {
                schema,
                rows: Vec::new(),
            });
    }

    /// Whether a table has been provisioned
    pub fn is_provisioned(&self, table: &TableId) -> bool {
        self.tables.contains_key(table)
    }

    /// Number of rows in a table
    ///
    /// # Errors
    /// * `TableNotProvisioned` - if the table does not exist
    pub fn row_count(&self, table: &TableId) -> Result<usize> {
        Ok(self.table(table)?.rows.len())
    }

    /// All rows of a table in append order (test helper)
    ///
    /// # Errors
    /// * `TableNotProvisioned` - if the table does not exist
    pub fn rows(&self, table: &TableId) -> Result<&[Row]> {
        Ok(&self.table(table)?.rows)
    }

    fn table(&self, table: &TableId) -> Result<&MemoryTable> {
        self.tables
            .get(table)
            .ok_or_else(|| TallyError::not_provisioned(table.as_str()))
    }
}

impl Warehouse for MemoryWarehouse {
    fn max_key(&self, table: &TableId) -> Result<SurrogateKey> {
        let t = self.table(table)?;
        let key_column = t.schema.key_column().ok_or_else(|| {
            TallyError::schema_mismatch(table.as_str(), "", "table has no columns")
        })?;
        let max = t
            .rows
            .iter()
            .filter_map(|row| match row.get(key_column) {
                Some(Value::Integer(k)) if *k > 0 => Some(*k as u64),
                _ => None,
            })
            .max()
            .unwrap_or(0);
        Ok(SurrogateKey::new(max))
    }

    fn schema(&self, table: &TableId) -> Result<TableSchema> {
        Ok(self.table(table)?.schema.clone())
    }

    fn business_keys(&self, table: &TableId, column: &str) -> Result<HashSet<String>> {
        let t = self.table(table)?;
        match t.schema.column(column) {
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
        let mut keys = HashSet::new();
        for row in &t.rows {
            if let Some(Value::Text(s)) = row.get(column) {
                keys.insert(s.clone());
            }
        }
        Ok(keys)
    }

    fn append(&mut self, table: &TableId, rows: &[Row]) -> Result<()> {
        let t = self
            .tables
            .get_mut(table)
            .ok_or_else(|| TallyError::not_provisioned(table.as_str()))?;
        t.rows.extend(rows.iter().cloned());
        Ok(())
    }
}
