//! Error handling for tally-store
//!
//! Maps driver-level failures into the core taxonomy. SQLite busy/locked
//! conditions become `TransientStore` so callers can treat them as
//! re-runnable; everything else is `Persistence`.

use tally_core::TallyError;

/// Result type alias using TallyError
pub type Result<T> = tally_core::Result<T>;

/// Map a rusqlite error into the core taxonomy
pub fn from_rusqlite(op: &str, err: rusqlite::Error) -> TallyError {
    match &err {
        rusqlite::Error::SqliteFailure(code, _)
            if matches!(
                code.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ) =>
        {
            TallyError::TransientStore {
                op: op.to_string(),
                message: err.to_string(),
            }
        }
        _ => TallyError::Persistence {
            op: op.to_string(),
            message: err.to_string(),
        },
    }
}

/// Create an IO error
pub fn io_error(op: &str, err: std::io::Error) -> TallyError {
    TallyError::Persistence {
        op: op.to_string(),
        message: err.to_string(),
    }
}
