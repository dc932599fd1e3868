//! Warehouse store contract
//!
//! The warehouse is an external collaborator: this crate only consumes it.
//! Adapters (in-memory here, SQLite in tally-store) implement the trait; the
//! allocator and controller are written against it.

use std::collections::HashSet;

use tally_core_types::{Row, SurrogateKey, TableId, TableSchema};

use crate::errors::Result;

mod memory;

pub use memory::MemoryWarehouse;

/// External store consumed by the load controller
///
/// All calls are synchronous and blocking; the architecture assumes exactly
/// one writer per store at a time. Two concurrent runs could read the same
/// max key and allocate overlapping ranges - that race is out of scope and
/// must be prevented by the deployment, not by this contract.
pub trait Warehouse {
    /// Current maximum surrogate key in `table`
    ///
    /// Returns key 0 for a table that exists but holds no rows, so the first
    /// allocated key is 1.
    ///
    /// # Errors
    /// * `TableNotProvisioned` - if the table does not exist at all; never
    ///   silently conflated with the empty case
    /// * `TransientStore` / `Persistence` - on store failure
    fn max_key(&self, table: &TableId) -> Result<SurrogateKey>;

    /// Authoritative ordered column layout of `table`
    ///
    /// # Errors
    /// * `TableNotProvisioned` - if the table does not exist
    fn schema(&self, table: &TableId) -> Result<TableSchema>;

    /// Distinct values of a text business-key column in `table`
    ///
    /// Input to the reference-table novelty check. NULLs are omitted.
    ///
    /// # Errors
    /// * `TableNotProvisioned` - if the table does not exist
    /// * `SchemaMismatch` - if the column is unknown or not text
    fn business_keys(&self, table: &TableId, column: &str) -> Result<HashSet<String>>;

    /// Append `rows` to `table`
    ///
    /// Append-only: never truncates or overwrites. A single call writes the
    /// whole batch or nothing; that atomicity is the adapter's
    /// responsibility. Rows arrive complete, surrogate key included.
    ///
    /// # Errors
    /// * `TableNotProvisioned` - if the table does not exist
    /// * `TransientStore` / `Persistence` - on store failure
    fn append(&mut self, table: &TableId, rows: &[Row]) -> Result<()>;
}
