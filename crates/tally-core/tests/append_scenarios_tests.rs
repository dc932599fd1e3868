//! End-to-end append scenarios against the in-memory warehouse
//!
//! Exercises the full controller surface across repeated runs: key
//! continuity, reference novelty, transactional growth, and the
//! no-duplicate-keys guarantee.

use std::collections::HashSet;

use tally_core::{
    allocator, AppendController, AppendOutcome, LoadPlan, MemoryWarehouse, SkipReason,
};
use tally_core_types::{ColumnSpec, ColumnType, Row, RunId, SurrogateKey, TableId, TableSchema, Value};

fn products_schema() -> TableSchema {
    TableSchema::new(
        TableId::new("products"),
        vec![
            ColumnSpec::required("product_key", ColumnType::Integer),
            ColumnSpec::required("product_name", ColumnType::Text),
            ColumnSpec::nullable("list_price", ColumnType::Real),
        ],
    )
}

fn customers_schema() -> TableSchema {
    TableSchema::new(
        TableId::new("customers"),
        vec![
            ColumnSpec::required("customer_key", ColumnType::Integer),
            ColumnSpec::required("company_name", ColumnType::Text),
        ],
    )
}

fn subscriptions_schema() -> TableSchema {
    TableSchema::new(
        TableId::new("subscriptions"),
        vec![
            ColumnSpec::required("subscription_key", ColumnType::Integer),
            ColumnSpec::required("customer_key", ColumnType::Integer),
            ColumnSpec::required("status", ColumnType::Text),
        ],
    )
}

fn product(name: &str) -> Row {
    Row::new().with("product_name", name)
}

fn customer(name: &str) -> Row {
    Row::new().with("company_name", name)
}

fn keys_of(warehouse: &MemoryWarehouse, table: &TableId, key_column: &str) -> Vec<i64> {
    warehouse
        .rows(table)
        .unwrap()
        .iter()
        .map(|row| match row.get(key_column) {
            Some(Value::Integer(k)) => *k,
            other => panic!("Expected integer key, got {:?}", other),
        })
        .collect()
}

/// Store starts with 3 products and no customers. Run 1 brings one novel
/// product and 5 customers; run 2 brings no novel products and 5 more
/// customers. Final state: 4 products, 10 customers, zero duplicate keys.
#[test]
fn test_two_run_products_and_customers_scenario() {
    let mut warehouse = MemoryWarehouse::new();
    warehouse.provision(products_schema());
    warehouse.provision(customers_schema());
    let products = TableId::new("products");
    let customers = TableId::new("customers");

    // Pre-existing history: products with keys 1-3
    let seed = AppendController::new(RunId::new());
    seed.append_reference(
        &mut warehouse,
        &products,
        "product_name",
        &[product("Starter"), product("Growth"), product("Scale")],
    )
    .unwrap();
    assert_eq!(warehouse.row_count(&products).unwrap(), 3);

    // Run 1: one novel product, five customers
    let run1 = LoadPlan::new(RunId::new())
        .reference(
            products.clone(),
            "product_name",
            vec![
                product("Starter"),
                product("Growth"),
                product("Scale"),
                product("Enterprise"),
            ],
        )
        .transactional(
            customers.clone(),
            (0..5).map(|i| customer(&format!("co-{}", i))).collect(),
        );
    let report1 = tally_core::run_plan(&mut warehouse, &run1).unwrap();
    assert_eq!(report1.rows_appended(), 6);
    assert_eq!(
        report1.outcome_for(&products).unwrap().key_range(),
        Some((SurrogateKey::new(4), SurrogateKey::new(4)))
    );

    // Run 2: nothing novel in products, five more customers
    let run2 = LoadPlan::new(RunId::new())
        .reference(
            products.clone(),
            "product_name",
            vec![
                product("Starter"),
                product("Growth"),
                product("Scale"),
                product("Enterprise"),
            ],
        )
        .transactional(
            customers.clone(),
            (5..10).map(|i| customer(&format!("co-{}", i))).collect(),
        );
    let report2 = tally_core::run_plan(&mut warehouse, &run2).unwrap();
    assert_eq!(
        report2.outcome_for(&products),
        Some(&AppendOutcome::Skipped {
            table: products.clone(),
            reason: SkipReason::NoNovelRows
        })
    );
    assert_eq!(
        report2.outcome_for(&customers).unwrap().key_range(),
        Some((SurrogateKey::new(6), SurrogateKey::new(10)))
    );

    // Final state
    assert_eq!(warehouse.row_count(&products).unwrap(), 4);
    assert_eq!(warehouse.row_count(&customers).unwrap(), 10);

    let product_keys = keys_of(&warehouse, &products, "product_key");
    let customer_keys = keys_of(&warehouse, &customers, "customer_key");
    assert_eq!(
        product_keys.iter().collect::<HashSet<_>>().len(),
        product_keys.len(),
        "Duplicate product keys"
    );
    assert_eq!(customer_keys, (1..=10).collect::<Vec<i64>>());
}

/// After appending N rows starting at key k, the next allocation is k + N.
#[test]
fn test_key_continuity_across_batches() {
    let mut warehouse = MemoryWarehouse::new();
    warehouse.provision(customers_schema());
    let table = TableId::new("customers");
    let controller = AppendController::new(RunId::new());

    assert_eq!(
        allocator::next_key(&warehouse, &table).unwrap(),
        SurrogateKey::new(1)
    );

    let batch: Vec<Row> = (0..7).map(|i| customer(&format!("co-{}", i))).collect();
    let outcome = controller
        .append_transactional(&mut warehouse, &table, &batch)
        .unwrap();
    assert_eq!(
        outcome.key_range(),
        Some((SurrogateKey::new(1), SurrogateKey::new(7)))
    );
    assert_eq!(
        allocator::next_key(&warehouse, &table).unwrap(),
        SurrogateKey::new(8)
    );
}

/// Child rows generated from a parent's reported key range always reference
/// keys that exist in the parent table.
#[test]
fn test_referential_integrity_via_generation_order() {
    let mut warehouse = MemoryWarehouse::new();
    warehouse.provision(customers_schema());
    warehouse.provision(subscriptions_schema());
    let customers = TableId::new("customers");
    let subscriptions = TableId::new("subscriptions");
    let controller = AppendController::new(RunId::new());

    let batch: Vec<Row> = (0..4).map(|i| customer(&format!("co-{}", i))).collect();
    let parent = controller
        .append_transactional(&mut warehouse, &customers, &batch)
        .unwrap();
    let (first, last) = parent.key_range().unwrap();

    // Children are generated only after the parent append reported its range
    let children: Vec<Row> = (first.value()..=last.value())
        .map(|k| {
            Row::new()
                .with("customer_key", k as i64)
                .with("status", "active")
        })
        .collect();
    controller
        .append_transactional(&mut warehouse, &subscriptions, &children)
        .unwrap();

    let parent_keys: HashSet<i64> = keys_of(&warehouse, &customers, "customer_key")
        .into_iter()
        .collect();
    for row in warehouse.rows(&subscriptions).unwrap() {
        match row.get("customer_key") {
            Some(Value::Integer(fk)) => {
                assert!(parent_keys.contains(fk), "Dangling foreign key {}", fk)
            }
            other => panic!("Expected integer foreign key, got {:?}", other),
        }
    }
}

/// A schema violation part way through a batch writes nothing at all.
#[test]
fn test_failed_validation_leaves_store_untouched() {
    let mut warehouse = MemoryWarehouse::new();
    warehouse.provision(customers_schema());
    let table = TableId::new("customers");

    let batch = vec![
        customer("ok-1"),
        customer("ok-2"),
        Row::new().with("company_name", Value::Null),
    ];
    let result =
        AppendController::new(RunId::new()).append_transactional(&mut warehouse, &table, &batch);
    assert!(result.is_err());
    assert_eq!(warehouse.row_count(&table).unwrap(), 0);

    // A retry with a fixed batch starts at key 1: nothing was consumed
    let fixed = vec![customer("ok-1"), customer("ok-2"), customer("ok-3")];
    let outcome = AppendController::new(RunId::new())
        .append_transactional(&mut warehouse, &table, &fixed)
        .unwrap();
    assert_eq!(
        outcome.key_range(),
        Some((SurrogateKey::new(1), SurrogateKey::new(3)))
    );
}
