//! Core types shared across Tally facilities
//!
//! This crate provides the foundational vocabulary used by the load
//! controller, the warehouse adapters, and the data producer:
//!
//! - **Correlation types**: RunId for tagging everything one run emits
//! - **Identity types**: TableId and SurrogateKey newtypes
//! - **Schema model**: ColumnType, ColumnSpec, TableSchema (authoritative
//!   column layout as reported by the warehouse)
//! - **Row model**: Value and Row (candidate rows handed to the controller)
//! - **Field constants**: canonical structured-logging keys and event names

pub mod correlation;
pub mod fields;
pub mod row;
pub mod schema;
pub mod table;

pub use correlation::RunId;
pub use row::{Row, Value};
pub use schema::{ColumnSpec, ColumnType, TableSchema};
pub use table::{SurrogateKey, TableId};
