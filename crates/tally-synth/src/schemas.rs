//! Warehouse table layout for the billing domain
//!
//! Nine tables in two categories. Reference tables are identified by a text
//! business key; transactional tables embed foreign keys to their parents.
//! Listed in dependency order: every table appears after the tables its
//! rows reference.

use tally_core_types::{ColumnSpec, ColumnType, TableId, TableSchema};

pub const PRODUCTS: &str = "products";
pub const PLANS: &str = "plans";
pub const DISCOUNTS: &str = "discounts";
pub const CUSTOMERS: &str = "customers";
pub const SUBSCRIPTIONS: &str = "subscriptions";
pub const INVOICES: &str = "invoices";
pub const INVOICE_LINE_ITEMS: &str = "invoice_line_items";
pub const PAYMENTS: &str = "payments";
pub const SUBSCRIPTION_DISCOUNTS: &str = "subscription_discounts";

/// Business key column of each reference table
pub const PRODUCT_BUSINESS_KEY: &str = "product_name";
pub const PLAN_BUSINESS_KEY: &str = "plan_name";
pub const DISCOUNT_BUSINESS_KEY: &str = "discount_code";

/// Schema of the products catalog
pub fn products() -> TableSchema {
    TableSchema::new(
        TableId::new(PRODUCTS),
        vec![
            ColumnSpec::required("product_key", ColumnType::Integer),
            ColumnSpec::required(PRODUCT_BUSINESS_KEY, ColumnType::Text),
            ColumnSpec::required("category", ColumnType::Text),
            ColumnSpec::required("list_price", ColumnType::Real),
        ],
    )
}

/// Schema of the pricing plans catalog
pub fn plans() -> TableSchema {
    TableSchema::new(
        TableId::new(PLANS),
        vec![
            ColumnSpec::required("plan_key", ColumnType::Integer),
            ColumnSpec::required(PLAN_BUSINESS_KEY, ColumnType::Text),
            ColumnSpec::required("billing_period", ColumnType::Text),
            ColumnSpec::required("monthly_price", ColumnType::Real),
            ColumnSpec::nullable("seat_limit", ColumnType::Integer),
        ],
    )
}

/// Schema of the discount rules catalog
pub fn discounts() -> TableSchema {
    TableSchema::new(
        TableId::new(DISCOUNTS),
        vec![
            ColumnSpec::required("discount_key", ColumnType::Integer),
            ColumnSpec::required(DISCOUNT_BUSINESS_KEY, ColumnType::Text),
            ColumnSpec::required("percent_off", ColumnType::Real),
            ColumnSpec::nullable("expires_at", ColumnType::Timestamp),
        ],
    )
}

/// Schema of the customers table
pub fn customers() -> TableSchema {
    TableSchema::new(
        TableId::new(CUSTOMERS),
        vec![
            ColumnSpec::required("customer_key", ColumnType::Integer),
            ColumnSpec::required("company_name", ColumnType::Text),
            ColumnSpec::required("segment", ColumnType::Text),
            ColumnSpec::required("country", ColumnType::Text),
            ColumnSpec::required("signed_up_at", ColumnType::Timestamp),
        ],
    )
}

/// Schema of the subscriptions table (child of customers and plans)
pub fn subscriptions() -> TableSchema {
    TableSchema::new(
        TableId::new(SUBSCRIPTIONS),
        vec![
            ColumnSpec::required("subscription_key", ColumnType::Integer),
            ColumnSpec::required("customer_key", ColumnType::Integer),
            ColumnSpec::required("plan_key", ColumnType::Integer),
            ColumnSpec::required("status", ColumnType::Text),
            ColumnSpec::required("seats", ColumnType::Integer),
            ColumnSpec::required("started_at", ColumnType::Timestamp),
        ],
    )
}

/// Schema of the invoices table (child of subscriptions)
pub fn invoices() -> TableSchema {
    TableSchema::new(
        TableId::new(INVOICES),
        vec![
            ColumnSpec::required("invoice_key", ColumnType::Integer),
            ColumnSpec::required("subscription_key", ColumnType::Integer),
            ColumnSpec::required("issued_at", ColumnType::Timestamp),
            ColumnSpec::required("total_amount", ColumnType::Real),
            ColumnSpec::required("status", ColumnType::Text),
        ],
    )
}

/// Schema of the invoice line items table (child of invoices and products)
pub fn invoice_line_items() -> TableSchema {
    TableSchema::new(
        TableId::new(INVOICE_LINE_ITEMS),
        vec![
            ColumnSpec::required("line_item_key", ColumnType::Integer),
            ColumnSpec::required("invoice_key", ColumnType::Integer),
            ColumnSpec::required("product_key", ColumnType::Integer),
            ColumnSpec::required("quantity", ColumnType::Integer),
            ColumnSpec::required("unit_price", ColumnType::Real),
        ],
    )
}

/// Schema of the payments table (child of invoices)
pub fn payments() -> TableSchema {
    TableSchema::new(
        TableId::new(PAYMENTS),
        vec![
            ColumnSpec::required("payment_key", ColumnType::Integer),
            ColumnSpec::required("invoice_key", ColumnType::Integer),
            ColumnSpec::required("paid_at", ColumnType::Timestamp),
            ColumnSpec::required("amount", ColumnType::Real),
            ColumnSpec::required("method", ColumnType::Text),
        ],
    )
}

/// Schema of the subscription-discount link table
pub fn subscription_discounts() -> TableSchema {
    TableSchema::new(
        TableId::new(SUBSCRIPTION_DISCOUNTS),
        vec![
            ColumnSpec::required("subscription_discount_key", ColumnType::Integer),
            ColumnSpec::required("subscription_key", ColumnType::Integer),
            ColumnSpec::required("discount_key", ColumnType::Integer),
            ColumnSpec::required("applied_at", ColumnType::Timestamp),
        ],
    )
}

/// All table schemas in dependency order
pub fn all() -> Vec<TableSchema> {
    vec![
        products(),
        plans(),
        discounts(),
        customers(),
        subscriptions(),
        invoices(),
        invoice_line_items(),
        payments(),
        subscription_discounts(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_schema_keys_on_its_first_column() {
        for schema in all() {
            let key = schema.key_column().unwrap();
            assert!(
                key.ends_with("_key"),
                "Table {} key column {} lacks _key suffix",
                schema.table,
                key
            );
            let spec = schema.column(key).unwrap();
            assert_eq!(spec.column_type, ColumnType::Integer);
            assert!(!spec.nullable);
        }
    }

    #[test]
    fn test_parents_come_before_children() {
        let order: Vec<String> = all().iter().map(|s| s.table.to_string()).collect();
        let position =
            |name: &str| order.iter().position(|t| t == name).unwrap();
        assert!(position(CUSTOMERS) < position(SUBSCRIPTIONS));
        assert!(position(PLANS) < position(SUBSCRIPTIONS));
        assert!(position(SUBSCRIPTIONS) < position(INVOICES));
        assert!(position(INVOICES) < position(INVOICE_LINE_ITEMS));
        assert!(position(PRODUCTS) < position(INVOICE_LINE_ITEMS));
        assert!(position(INVOICES) < position(PAYMENTS));
        assert!(position(DISCOUNTS) < position(SUBSCRIPTION_DISCOUNTS));
        assert!(position(SUBSCRIPTIONS) < position(SUBSCRIPTION_DISCOUNTS));
    }
}
