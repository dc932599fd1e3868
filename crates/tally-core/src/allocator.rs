//! Key allocation
//!
//! The store is the sole source of truth for allocation state: every call
//! reads the current maximum fresh, so there is no process-wide counter to go
//! stale across runs or processes.

use tally_core_types::{SurrogateKey, TableId};

use crate::errors::Result;
use crate::warehouse::Warehouse;

/// Next usable surrogate key for `table`: current maximum + 1
///
/// An existing-but-empty table has maximum 0, so the first key is 1. A table
/// that does not exist is surfaced as `TableNotProvisioned` rather than a
/// silent 1; whether to provision or abort is the caller's policy.
///
/// Known limitation: with two concurrent writers this read-then-allocate
/// pattern races. The deployment must guarantee a single writer; no
/// store-side reservation is attempted here.
///
/// # Errors
/// * `TableNotProvisioned` - if the table does not exist
/// * `TransientStore` / `Persistence` - on store failure
pub fn next_key<W: Warehouse + ?Sized>(warehouse: &W, table: &TableId) -> Result<SurrogateKey> {
    Ok(warehouse.max_key(table)?.next())
}
