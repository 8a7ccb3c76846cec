//! Tests for output module

use super::*;
use arrow::array::{Array, Float64Array, Int64Array, ListArray, StringArray, StructArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs::File;
use tempfile::tempdir;
use test_case::test_case;

fn column_names(records: &[Value]) -> Vec<String> {
    infer_schema(records)
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect()
}

// ============================================================================
// Schema Inference Tests
// ============================================================================

#[test]
fn test_infer_schema_empty() {
    assert!(infer_schema(&[]).fields().is_empty());
}

#[test]
fn test_columns_in_first_seen_order() {
    let records = vec![
        json!({"id": "t1", "total": 10, "zone": "A"}),
        json!({"id": "t2", "memberId": "m1"}),
        json!({"balance": 1.5, "id": "t3"}),
    ];
    assert_eq!(
        column_names(&records),
        vec!["id", "total", "zone", "memberId", "balance"]
    );
}

#[test_case(json!(1), json!(2), DataType::Int64 ; "ints")]
#[test_case(json!(1), json!(2.5), DataType::Float64 ; "int and float")]
#[test_case(json!(true), json!(false), DataType::Boolean ; "bools")]
#[test_case(json!(null), json!("x"), DataType::Utf8 ; "null then string")]
#[test_case(json!(null), json!(null), DataType::Utf8 ; "only nulls")]
#[test_case(json!(1), json!("x"), DataType::Utf8 ; "conflict falls back to text")]
#[test_case(json!({}), json!({}), DataType::Utf8 ; "empty objects")]
fn test_column_type_widening(first: Value, second: Value, expected: DataType) {
    let schema = infer_schema(&[json!({"v": first}), json!({"v": second})]);
    assert_eq!(schema.field_with_name("v").unwrap().data_type(), &expected);
}

#[test]
fn test_struct_fields_are_unioned() {
    let records = vec![
        json!({"category": {"id": "c1"}}),
        json!({"category": {"id": "c2", "name": "Flower"}}),
    ];
    let schema = infer_schema(&records);

    let DataType::Struct(fields) = schema.field_with_name("category").unwrap().data_type() else {
        panic!("expected struct column");
    };
    let names: Vec<_> = fields.iter().map(|f| f.name().as_str()).collect();
    assert_eq!(names, vec!["id", "name"]);
}

#[test]
fn test_list_items_are_widened() {
    let schema = infer_schema(&[json!({"tags": []}), json!({"tags": [1, 2.5]})]);
    let DataType::List(item) = schema.field_with_name("tags").unwrap().data_type() else {
        panic!("expected list column");
    };
    assert_eq!(item.data_type(), &DataType::Float64);
}

#[test]
fn test_nested_nulls_are_settled() {
    let schema = infer_schema(&[json!({"vendor": {"id": "v1", "note": null}, "lines": [null]})]);

    let DataType::Struct(fields) = schema.field_with_name("vendor").unwrap().data_type() else {
        panic!("expected struct column");
    };
    assert_eq!(fields[1].data_type(), &DataType::Utf8);

    let DataType::List(item) = schema.field_with_name("lines").unwrap().data_type() else {
        panic!("expected list column");
    };
    assert_eq!(item.data_type(), &DataType::Utf8);
}

// ============================================================================
// records_to_batch Tests
// ============================================================================

#[test]
fn test_records_to_batch_empty() {
    let batch = records_to_batch(&[]).unwrap();
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.num_columns(), 0);
}

#[test]
fn test_records_to_batch_missing_fields_are_null() {
    let records = vec![
        json!({"id": "p1", "price": 10}),
        json!({"id": "p2"}),
        json!({"id": "p3", "price": null}),
    ];
    let batch = records_to_batch(&records).unwrap();
    assert_eq!(batch.num_rows(), 3);

    let price = batch
        .column(1)
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(price.value(0), 10);
    assert!(price.is_null(1));
    assert!(price.is_null(2));
}

#[test]
fn test_records_to_batch_mixed_numbers() {
    let batch = records_to_batch(&[json!({"qty": 1}), json!({"qty": 0.5})]).unwrap();
    let qty = batch
        .column(0)
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap();
    assert_eq!(qty.value(0), 1.0);
    assert_eq!(qty.value(1), 0.5);
}

#[test]
fn test_records_to_batch_conflicting_types_as_text() {
    let batch = records_to_batch(&[json!({"sku": 123}), json!({"sku": "A-9"})]).unwrap();
    let sku = batch
        .column(0)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(sku.value(0), "123");
    assert_eq!(sku.value(1), "A-9");
}

#[test]
fn test_records_to_batch_nested() {
    let records = vec![
        json!({"cart": {"total": 5.0}, "tags": ["a", "b"]}),
        json!({"tags": null}),
    ];
    let batch = records_to_batch(&records).unwrap();

    let cart = batch
        .column(0)
        .as_any()
        .downcast_ref::<StructArray>()
        .unwrap();
    assert!(cart.is_valid(0));
    assert!(cart.is_null(1));

    let tags = batch
        .column(1)
        .as_any()
        .downcast_ref::<ListArray>()
        .unwrap();
    assert_eq!(tags.value(0).len(), 2);
    assert!(tags.is_null(1));
}

// ============================================================================
// Writer Tests
// ============================================================================

#[test]
fn test_parquet_writer_config_default() {
    let config = ParquetWriterConfig::default();
    assert_eq!(config.compression(), ParquetCompression::Snappy);
    assert_eq!(config.row_group_size(), 1024 * 1024);
}

#[test]
fn test_parquet_writer_config_builder() {
    let config = ParquetWriterConfig::new()
        .with_compression(ParquetCompression::Zstd)
        .with_row_group_size(500);
    assert_eq!(config.compression(), ParquetCompression::Zstd);
    assert_eq!(config.row_group_size(), 500);
}

#[test]
fn test_write_parquet_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("item_sales.parquet");

    let records = vec![
        json!({"productId": "p1", "quantity": 2, "transaction.transNo": "1001", "join_key": "t1"}),
        json!({"productId": "p2", "quantity": 1, "transaction.transNo": "1001", "join_key": "t1"}),
        json!({"transaction.transNo": "1002", "join_key": "t2"}),
    ];
    let batch = records_to_batch(&records).unwrap();
    let rows = write_parquet(&path, &batch, &ParquetWriterConfig::default()).unwrap();
    assert_eq!(rows, 3);

    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap())
        .unwrap()
        .build()
        .unwrap();
    let read: Vec<_> = reader.map(Result::unwrap).collect();
    assert_eq!(read.iter().map(|b| b.num_rows()).sum::<usize>(), 3);
    let names: Vec<_> = read[0]
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    assert_eq!(names, vec!["productId", "quantity", "transaction.transNo", "join_key"]);
}

#[test]
fn test_write_parquet_bad_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("out.parquet");
    let batch = records_to_batch(&[json!({"id": 1})]).unwrap();
    let err = write_parquet(&path, &batch, &ParquetWriterConfig::default()).unwrap_err();
    assert!(matches!(err, crate::error::Error::Output { .. }));
}

#[test]
fn test_write_json_lines() {
    let batch = records_to_batch(&[json!({"id": "v1", "vendor_name": "Acme"}), json!({"id": "v2"})])
        .unwrap();
    let mut out = Vec::new();
    let rows = write_json_lines(&mut out, &batch).unwrap();
    assert_eq!(rows, 2);

    let lines: Vec<Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(
        lines,
        vec![json!({"id": "v1", "vendor_name": "Acme"}), json!({"id": "v2"})]
    );
}

#[test]
fn test_format_table() {
    let batch = records_to_batch(&[json!({"id": "b1", "name": "Brand"})]).unwrap();
    let text = format_table(&batch).unwrap();
    assert!(text.contains("| id "));
    assert!(text.contains("Brand"));
}
