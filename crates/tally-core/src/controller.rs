//! Append controller
//!
//! Decides, per table and per run, whether new rows exist to write and
//! issues the append with freshly allocated surrogate keys. Reference
//! tables append only novel rows (by business key) and skip explicitly when
//! nothing is novel; transactional tables always append their whole batch.
//!
//! Write policy: append-only, whole batch or nothing. Validation runs after
//! key assignment and before the append call, so a schema violation aborts
//! the table with zero rows written. A failed table does not roll back
//! tables already committed earlier in the run.

use serde::{Deserialize, Serialize};
use tally_core_types::{Row, RunId, SurrogateKey, TableId};

use crate::allocator;
use crate::errors::{Result, TallyError};
use crate::novelty::novel_keys;
use crate::validate::validate_batch;
use crate::warehouse::Warehouse;

/// Why a table performed no write this run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Every candidate's business key already exists in the store
    NoNovelRows,
    /// The producer handed over zero rows
    EmptyBatch,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SkipReason::NoNovelRows => "no_novel_rows",
            SkipReason::EmptyBatch => "empty_batch",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of one table's load within a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppendOutcome {
    /// A batch was appended with keys [first_key, first_key + rows - 1]
    Appended {
        table: TableId,
        first_key: SurrogateKey,
        rows: u64,
    },
    /// No write happened; explicit and distinguishable from an append
    Skipped { table: TableId, reason: SkipReason },
}

impl AppendOutcome {
    /// The table this outcome belongs to
    pub fn table(&self) -> &TableId {
        match self {
            AppendOutcome::Appended { table, .. } => table,
            AppendOutcome::Skipped { table, .. } => table,
        }
    }

    /// Inclusive key range of the appended batch, if any rows were written
    pub fn key_range(&self) -> Option<(SurrogateKey, SurrogateKey)> {
        match self {
            AppendOutcome::Appended {
                first_key, rows, ..
            } if *rows > 0 => Some((*first_key, first_key.offset(rows - 1))),
            _ => None,
        }
    }

    /// Number of rows written (0 for a skip)
    pub fn rows_appended(&self) -> u64 {
        match self {
            AppendOutcome::Appended { rows, .. } => *rows,
            AppendOutcome::Skipped { .. } => 0,
        }
    }
}

/// Single-run, single-writer append controller
///
/// Holds no allocation state: keys are read fresh from the store for every
/// table, which is what makes repeated runs safe.
#[derive(Debug, Clone)]
pub struct AppendController {
    run_id: RunId,
}

impl AppendController {
    /// Create a controller for one run
    pub fn new(run_id: RunId) -> Self {
        Self { run_id }
    }

    /// The run this controller is tagged with
    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    /// Load a reference table: append only candidates with novel business keys
    ///
    /// Candidates carry value columns only; the surrogate key column is
    /// assigned here, sequentially from the store's next key. Duplicate
    /// business keys within the candidate set keep their first occurrence.
    /// If nothing is novel the table is skipped without a write.
    ///
    /// # Errors
    /// * `TableNotProvisioned` - if the table does not exist
    /// * `SchemaMismatch` - bad business-key column, a candidate missing its
    ///   business key, or any row violating the authoritative schema; in all
    ///   cases zero rows are written
    /// * `TransientStore` / `Persistence` - on store failure
    pub fn append_reference<W: Warehouse + ?Sized>(
        &self,
        warehouse: &mut W,
        table: &TableId,
        business_key_column: &str,
        candidates: &[Row],
    ) -> Result<AppendOutcome> {
        tracing::debug!(
            run_id = %self.run_id,
            table = %table,
            candidates = candidates.len(),
            event = tally_core_types::fields::EVENT_START,
            "loading reference table"
        );

        let existing = warehouse.business_keys(table, business_key_column)?;
        let candidate_keys = candidates
            .iter()
            .map(|row| match row.get(business_key_column) {
                Some(tally_core_types::Value::Text(s)) => Ok(s.clone()),
                Some(other) => Err(TallyError::schema_mismatch(
                    table.as_str(),
                    business_key_column,
                    format!("business key must be text, found {}", other.type_name()),
                )),
                None => Err(TallyError::schema_mismatch(
                    table.as_str(),
                    business_key_column,
                    "candidate row has no business key",
                )),
            })
            .collect::<Result<Vec<String>>>()?;

        let novel = novel_keys(&existing, &candidate_keys.iter().cloned().collect());

        // First occurrence wins for duplicates within the candidate set
        let mut seen = std::collections::HashSet::new();
        let novel_rows: Vec<Row> = candidates
            .iter()
            .zip(candidate_keys.iter())
            .filter(|(_, key)| novel.contains(*key) && seen.insert((*key).clone()))
            .map(|(row, _)| row.clone())
            .collect();

        if novel_rows.is_empty() {
            return Ok(self.skip(table, SkipReason::NoNovelRows));
        }

        self.write_batch(warehouse, table, novel_rows)
    }

    /// Load a transactional table: always append the whole generated batch
    ///
    /// No novelty check: transactional data is always-growing by definition.
    /// An empty batch performs no write and reports a skip.
    ///
    /// # Errors
    /// * `TableNotProvisioned` - if the table does not exist
    /// * `SchemaMismatch` - any row violating the authoritative schema;
    ///   zero rows are written
    /// * `TransientStore` / `Persistence` - on store failure
    pub fn append_transactional<W: Warehouse + ?Sized>(
        &self,
        warehouse: &mut W,
        table: &TableId,
        batch: &[Row],
    ) -> Result<AppendOutcome> {
        tracing::debug!(
            run_id = %self.run_id,
            table = %table,
            candidates = batch.len(),
            event = tally_core_types::fields::EVENT_START,
            "loading transactional table"
        );

        if batch.is_empty() {
            return Ok(self.skip(table, SkipReason::EmptyBatch));
        }

        self.write_batch(warehouse, table, batch.to_vec())
    }

    /// Assign keys, validate, append - shared tail of both load paths
    fn write_batch<W: Warehouse + ?Sized>(
        &self,
        warehouse: &mut W,
        table: &TableId,
        rows: Vec<Row>,
    ) -> Result<AppendOutcome> {
        let schema = warehouse.schema(table)?;
        let first_key = allocator::next_key(warehouse, table)?;
        let keyed = assign_keys(&schema, first_key, rows)?;
        validate_batch(&schema, &keyed)?;
        warehouse.append(table, &keyed)?;

        let rows_written = keyed.len() as u64;
        tracing::info!(
            run_id = %self.run_id,
            table = %table,
            rows = rows_written,
            first_key = first_key.value(),
            last_key = first_key.value() + rows_written - 1,
            event = tally_core_types::fields::EVENT_APPEND,
            "appended batch"
        );
        Ok(AppendOutcome::Appended {
            table: table.clone(),
            first_key,
            rows: rows_written,
        })
    }

    fn skip(&self, table: &TableId, reason: SkipReason) -> AppendOutcome {
        tracing::info!(
            run_id = %self.run_id,
            table = %table,
            skip_reason = %reason,
            event = tally_core_types::fields::EVENT_SKIP,
            "skipped table, nothing to append"
        );
        AppendOutcome::Skipped {
            table: table.clone(),
            reason,
        }
    }
}

/// Inject sequential surrogate keys into `rows`, starting at `first_key`
///
/// The key column is the schema's first column and belongs to this system:
/// a producer that sets it is in breach of the contract.
fn assign_keys(
    schema: &tally_core_types::TableSchema,
    first_key: SurrogateKey,
    rows: Vec<Row>,
) -> Result<Vec<Row>> {
    let key_column = schema.key_column().ok_or_else(|| {
        TallyError::schema_mismatch(schema.table.as_str(), "", "table has no columns")
    })?;

    rows.into_iter()
        .enumerate()
        .map(|(i, mut row)| {
            if row.contains(key_column) {
                return Err(TallyError::schema_mismatch(
                    schema.table.as_str(),
                    key_column,
                    "surrogate key column must not be set by the producer",
                ));
            }
            let key = first_key.offset(i as u64);
            row.set(key_column, key.value() as i64);
            Ok(row)
        })
        .collect()
}
