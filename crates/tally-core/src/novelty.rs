//! Reference-table novelty
//!
//! Novelty is decided by business key, never by surrogate key: a candidate
//! is new when its business key has not been seen by the store. Implemented
//! as a pure set-difference so it can be reasoned about and tested in
//! isolation.

use std::collections::HashSet;

/// Business keys present in `candidates` but absent from `existing`
pub fn novel_keys(existing: &HashSet<String>, candidates: &HashSet<String>) -> HashSet<String> {
    candidates.difference(existing).cloned().collect()
}
