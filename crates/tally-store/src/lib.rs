//! Tally Store - SQLite warehouse adapter
//!
//! Implements the `Warehouse` contract over a SQLite database:
//! - max-key lookup via `MAX()` over the surrogate key column
//! - authoritative schema derived from `PRAGMA table_info`
//! - business-key scan via `SELECT DISTINCT`
//! - whole-batch append inside a single transaction
//!
//! Also carries the provisioning helpers the CLI uses to bootstrap an empty
//! warehouse file; the load controller itself never provisions.

pub mod db;
pub mod errors;
pub mod provision;
pub mod sqlite;

pub use provision::provision;
pub use sqlite::SqliteWarehouse;
