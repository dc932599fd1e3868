//! Batch validation against the authoritative schema
//!
//! The warehouse owns every table's schema; candidate rows are checked
//! against it before any write. The first violation fails the whole batch -
//! a type mismatch is never silently coerced.

use tally_core_types::{ColumnType, Row, TableSchema, Value};

use crate::errors::{Result, TallyError};

/// Validate a complete batch (surrogate keys already assigned)
///
/// Checks, per row:
/// - every column present on the row exists in the schema
/// - every non-nullable column is present and non-NULL
/// - every present value matches the declared column type (NULL is accepted
///   only for nullable columns)
///
/// # Errors
/// * `SchemaMismatch` - on the first violating row/column; the caller must
///   not write any part of the batch
pub fn validate_batch(schema: &TableSchema, rows: &[Row]) -> Result<()> {
    for row in rows {
        // Unknown columns first: a row naming a column the store does not
        // have can never be appended.
        for name in row.column_names() {
            if schema.column(name).is_none() {
                return Err(TallyError::schema_mismatch(
                    schema.table.as_str(),
                    name,
                    "column not present in authoritative schema",
                ));
            }
        }

        for spec in &schema.columns {
            match row.get(&spec.name) {
                None => {
                    if !spec.nullable {
                        return Err(TallyError::schema_mismatch(
                            schema.table.as_str(),
                            &spec.name,
                            "required column missing",
                        ));
                    }
                }
                Some(Value::Null) => {
                    if !spec.nullable {
                        return Err(TallyError::schema_mismatch(
                            schema.table.as_str(),
                            &spec.name,
                            "NULL in non-nullable column",
                        ));
                    }
                }
                Some(value) => {
                    if !type_matches(spec.column_type, value) {
                        return Err(TallyError::schema_mismatch(
                            schema.table.as_str(),
                            &spec.name,
                            format!(
                                "expected {}, found {}",
                                spec.column_type,
                                value.type_name()
                            ),
                        ));
                    }
                }
            }
        }
    }
    Ok(())
}

/// Whether a non-NULL value is acceptable for a declared column type
fn type_matches(column_type: ColumnType, value: &Value) -> bool {
    matches!(
        (column_type, value),
        (ColumnType::Integer, Value::Integer(_))
            | (ColumnType::Real, Value::Real(_))
            | (ColumnType::Text, Value::Text(_))
            | (ColumnType::Boolean, Value::Boolean(_))
            | (ColumnType::Timestamp, Value::Timestamp(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core_types::{ColumnSpec, TableId};

    fn customers_schema() -> TableSchema {
        TableSchema::new(
            TableId::new("customers"),
            vec![
                ColumnSpec::required("customer_key", ColumnType::Integer),
                ColumnSpec::required("company_name", ColumnType::Text),
                ColumnSpec::nullable("employee_count", ColumnType::Integer),
            ],
        )
    }

    fn valid_row() -> Row {
        Row::new()
            .with("customer_key", 1i64)
            .with("company_name", "Acme")
            .with("employee_count", 40i64)
    }

    #[test]
    fn test_valid_batch_passes() {
        assert!(validate_batch(&customers_schema(), &[valid_row()]).is_ok());
    }

    #[test]
    fn test_missing_nullable_column_passes() {
        let row = Row::new()
            .with("customer_key", 1i64)
            .with("company_name", "Acme");
        assert!(validate_batch(&customers_schema(), &[row]).is_ok());
    }

    #[test]
    fn test_missing_required_column_fails() {
        let row = Row::new().with("customer_key", 1i64);
        let result = validate_batch(&customers_schema(), &[row]);
        assert!(matches!(result, Err(TallyError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_type_mismatch_fails() {
        let row = Row::new()
            .with("customer_key", 1i64)
            .with("company_name", 42i64);
        let err = validate_batch(&customers_schema(), &[row]).unwrap_err();
        match err {
            TallyError::SchemaMismatch { column, reason, .. } => {
                assert_eq!(column, "company_name");
                assert!(reason.contains("expected TEXT"));
            }
            other => panic!("Expected SchemaMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_null_in_required_column_fails() {
        let row = Row::new()
            .with("customer_key", 1i64)
            .with("company_name", Value::Null);
        let result = validate_batch(&customers_schema(), &[row]);
        assert!(matches!(result, Err(TallyError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_null_in_nullable_column_passes() {
        let row = Row::new()
            .with("customer_key", 1i64)
            .with("company_name", "Acme")
            .with("employee_count", Value::Null);
        assert!(validate_batch(&customers_schema(), &[row]).is_ok());
    }

    #[test]
    fn test_unknown_column_fails() {
        let row = valid_row().with("favourite_colour", "blue");
        let err = validate_batch(&customers_schema(), &[row]).unwrap_err();
        match err {
            TallyError::SchemaMismatch { column, .. } => {
                assert_eq!(column, "favourite_colour")
            }
            other => panic!("Expected SchemaMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_one_bad_row_fails_the_batch() {
        let rows = vec![valid_row(), Row::new().with("customer_key", 2i64)];
        assert!(validate_batch(&customers_schema(), &rows).is_err());
    }
}
