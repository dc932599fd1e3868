//! Canonical field keys and event names for structured logging
//!
//! These constants keep log output consistent across the controller, the
//! store adapters, and the CLI.

// Canonical field keys
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_RUN_ID: &str = "run_id";
pub const FIELD_TABLE: &str = "table";
pub const FIELD_ROWS: &str = "rows";
pub const FIELD_FIRST_KEY: &str = "first_key";
pub const FIELD_LAST_KEY: &str = "last_key";
pub const FIELD_CANDIDATES: &str = "candidates";
pub const FIELD_SKIP_REASON: &str = "skip_reason";

// Error fields
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
/// A batch was appended
pub const EVENT_APPEND: &str = "append";
/// A table was skipped without a write (explicit, distinguishable from append)
pub const EVENT_SKIP: &str = "skip";
