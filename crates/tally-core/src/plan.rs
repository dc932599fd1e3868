//! Ordered multi-table runs
//!
//! A LoadPlan lists tables in dependency order: parents strictly before the
//! children whose rows embed their surrogate keys. The plan is executed
//! sequentially; there is no cross-table transaction, so a failure part way
//! through leaves earlier tables committed. Operators repair by re-running -
//! reference novelty keeps that safe, transactional tables grow again by
//! design.

use serde::{Deserialize, Serialize};
use tally_core_types::{Row, RunId, TableId};

use crate::controller::{AppendController, AppendOutcome};
use crate::errors::Result;
use crate::warehouse::Warehouse;

/// One table's load within a plan
#[derive(Debug, Clone)]
pub enum TableLoad {
    /// Append-on-novelty: slowly changing catalog/pricing style data
    Reference {
        table: TableId,
        business_key_column: String,
        candidates: Vec<Row>,
    },
    /// Always-append: continuously growing data
    Transactional { table: TableId, batch: Vec<Row> },
}

impl TableLoad {
    /// The table this load targets
    pub fn table(&self) -> &TableId {
        match self {
            TableLoad::Reference { table, .. } => table,
            TableLoad::Transactional { table, .. } => table,
        }
    }
}

/// Tables to load in one run, in dependency order
#[derive(Debug, Clone)]
pub struct LoadPlan {
    run_id: RunId,
    tables: Vec<TableLoad>,
}

impl LoadPlan {
    /// Create an empty plan for a run
    pub fn new(run_id: RunId) -> Self {
        Self {
            run_id,
            tables: Vec::new(),
        }
    }

    /// Add a reference table load (builder style)
    pub fn reference(
        mut self,
        table: TableId,
        business_key_column: impl Into<String>,
        candidates: Vec<Row>,
    ) -> Self {
        self.tables.push(TableLoad::Reference {
            table,
            business_key_column: business_key_column.into(),
            candidates,
        });
        self
    }

    /// Add a transactional table load (builder style)
    pub fn transactional(mut self, table: TableId, batch: Vec<Row>) -> Self {
        self.tables.push(TableLoad::Transactional { table, batch });
        self
    }

    /// The run this plan belongs to
    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    /// The planned loads, in execution order
    pub fn tables(&self) -> &[TableLoad] {
        &self.tables
    }
}

/// Per-table outcomes of one executed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// The run the report describes
    pub run_id: RunId,
    /// One outcome per planned table, in execution order
    pub outcomes: Vec<AppendOutcome>,
}

impl RunReport {
    /// Create an empty report
    pub fn new(run_id: RunId) -> Self {
        Self {
            run_id,
            outcomes: Vec::new(),
        }
    }

    /// Record one table's outcome
    pub fn push(&mut self, outcome: AppendOutcome) {
        self.outcomes.push(outcome);
    }

    /// Total rows written across all tables
    pub fn rows_appended(&self) -> u64 {
        self.outcomes.iter().map(AppendOutcome::rows_appended).sum()
    }

    /// Tables that performed no write
    pub fn skipped_tables(&self) -> Vec<&TableId> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, AppendOutcome::Skipped { .. }))
            .map(AppendOutcome::table)
            .collect()
    }

    /// Outcome for a specific table, if it was part of the run
    pub fn outcome_for(&self, table: &TableId) -> Option<&AppendOutcome> {
        self.outcomes.iter().find(|o| o.table() == table)
    }
}

/// Execute a plan table by table, in order
///
/// Stops at the first failing table. Outcomes of tables committed before the
/// failure are lost with the error; their rows are not - there is no
/// rollback, by design.
///
/// # Errors
/// Whatever the failing table's load returned; see
/// [`AppendController::append_reference`] and
/// [`AppendController::append_transactional`].
pub fn run_plan<W: Warehouse + ?Sized>(warehouse: &mut W, plan: &LoadPlan) -> Result<RunReport> {
    let controller = AppendController::new(plan.run_id().clone());
    let mut report = RunReport::new(plan.run_id().clone());

    tracing::info!(
        run_id = %plan.run_id(),
        tables = plan.tables().len(),
        event = tally_core_types::fields::EVENT_START,
        "run started"
    );

    for load in plan.tables() {
        let outcome = match load {
            TableLoad::Reference {
                table,
                business_key_column,
                candidates,
            } => controller.append_reference(warehouse, table, business_key_column, candidates),
            TableLoad::Transactional { table, batch } => {
                controller.append_transactional(warehouse, table, batch)
            }
        };
        match outcome {
            Ok(outcome) => report.push(outcome),
            Err(err) => {
                tracing::error!(
                    run_id = %plan.run_id(),
                    table = %load.table(),
                    err.code = err.code(),
                    event = tally_core_types::fields::EVENT_END_ERROR,
                    "run aborted: {}",
                    err
                );
                return Err(err);
            }
        }
    }

    tracing::info!(
        run_id = %plan.run_id(),
        rows = report.rows_appended(),
        event = tally_core_types::fields::EVENT_END,
        "run finished"
    );
    Ok(report)
}
