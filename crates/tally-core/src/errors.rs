use thiserror::Error;

/// Result type alias using TallyError
pub type Result<T> = std::result::Result<T, TallyError>;

/// Error taxonomy for load operations
///
/// Three classes matter operationally:
/// - provisioning: the target table does not exist; the caller decides
///   whether to create it or abort, never this crate
/// - schema mismatch: a candidate row disagrees with the authoritative
///   schema; fatal for that table's whole batch, zero rows written
/// - transient store: connectivity-style failures; candidates for a full
///   re-run of the table's write, surfaced via [`TallyError::is_retryable`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TallyError {
    /// Target table is absent from the store
    #[error("Table not provisioned: {table}")]
    TableNotProvisioned { table: String },

    /// A candidate row violates the authoritative schema
    #[error("Schema mismatch in table {table}, column {column}: {reason}")]
    SchemaMismatch {
        table: String,
        column: String,
        reason: String,
    },

    /// Connectivity/quota failure during key lookup or append
    #[error("Transient store failure in {op}: {message}")]
    TransientStore { op: String, message: String },

    /// Non-transient store failure
    #[error("Persistence error in {op}: {message}")]
    Persistence { op: String, message: String },

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl TallyError {
    /// Get the stable error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            TallyError::TableNotProvisioned { .. } => "ERR_TABLE_NOT_PROVISIONED",
            TallyError::SchemaMismatch { .. } => "ERR_SCHEMA_MISMATCH",
            TallyError::TransientStore { .. } => "ERR_TRANSIENT_STORE",
            TallyError::Persistence { .. } => "ERR_PERSISTENCE",
            TallyError::Serialization { .. } => "ERR_SERIALIZATION",
            TallyError::Internal { .. } => "ERR_INTERNAL",
        }
    }

    /// Whether a full re-run of the failed table's write may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, TallyError::TransientStore { .. })
    }

    /// Build a schema mismatch error
    pub fn schema_mismatch(
        table: impl Into<String>,
        column: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        TallyError::SchemaMismatch {
            table: table.into(),
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Build a not-provisioned error
    pub fn not_provisioned(table: impl Into<String>) -> Self {
        TallyError::TableNotProvisioned {
            table: table.into(),
        }
    }
}
