//! Tally Core - append-only load controller for a billing warehouse
//!
//! This crate implements the load phase of an ELT pipeline whose one
//! non-trivial concern is ID continuity and append-only writes across
//! repeated runs:
//!
//! - `Warehouse` trait: the external store contract (max key, authoritative
//!   schema, business-key scan, whole-batch append)
//! - `MemoryWarehouse`: single-threaded in-memory implementation for tests
//! - key allocation: fresh max-key read per call, max + 1
//! - novelty: pure business-key set-difference for reference tables
//! - `AppendController`: skip-or-append for reference tables, always-append
//!   for transactional tables, with schema validation before every write
//! - `LoadPlan` / `RunReport`: ordered multi-table runs and their outcomes
//!
//! Strictly single-writer, single-run-at-a-time by design. A failed table
//! never writes partially; committed tables earlier in the same run are not
//! rolled back - repair is re-running, which reference novelty keeps safe.

pub mod allocator;
pub mod controller;
pub mod errors;
pub mod logging;
pub mod novelty;
pub mod plan;
pub mod validate;
pub mod warehouse;

pub use controller::{AppendController, AppendOutcome, SkipReason};
pub use errors::{Result, TallyError};
pub use plan::{run_plan, LoadPlan, RunReport, TableLoad};
pub use warehouse::{MemoryWarehouse, Warehouse};
