//! Database connection management
//!
//! Utilities for opening and configuring SQLite connections. One process
//! opens one connection; the single-writer model is enforced by deployment,
//! not by this module.

use std::path::Path;

use rusqlite::Connection;

use crate::errors::{from_rusqlite, Result};

/// Open a SQLite database at the given path
///
/// # Errors
/// * `Persistence` - if the file cannot be opened
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(|e| from_rusqlite("open", e))
}

/// Open an in-memory SQLite database (for testing)
///
/// # Errors
/// * `Persistence` - if the database cannot be created
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(|e| from_rusqlite("open", e))
}

/// Configure a connection with sensible settings
///
/// # Errors
/// * `Persistence` - if a PRAGMA fails
pub fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA busy_timeout = 5000;")
        .map_err(|e| from_rusqlite("configure", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory_and_configure() {
        let conn = open_in_memory().unwrap();
        configure(&conn).unwrap();
    }

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open(dir.path().join("warehouse.db")).unwrap();
        configure(&conn).unwrap();
    }
}
