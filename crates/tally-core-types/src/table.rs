//! Table identity and surrogate key newtypes

use serde::{Deserialize, Serialize};

/// Identifier of a warehouse table known to the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableId(String);

impl TableId {
    /// Create a table identifier
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the table name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TableId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// System-generated integer primary key with no business meaning
///
/// Keys within one table are strictly increasing, contiguous within a single
/// run's batch, and never reused across runs. Key 0 is never assigned; the
/// first row of an empty table gets key 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurrogateKey(u64);

impl SurrogateKey {
    /// Wrap a raw key value
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw key value
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The key immediately after this one
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// The key `offset` positions after this one
    pub fn offset(&self, offset: u64) -> Self {
        Self(self.0 + offset)
    }
}

impl std::fmt::Display for SurrogateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
