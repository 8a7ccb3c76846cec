//! Records to Arrow tables
//!
//! Columns are the union of the fields observed across all records, in the
//! order each field was first seen. Types are inferred per column and widened
//! when records disagree.

use crate::error::{Error, Result};
use arrow::array::{
    ArrayRef, BooleanArray, Float64Array, Int64Array, ListArray, StringArray, StructArray,
};
use arrow::buffer::OffsetBuffer;
use arrow::datatypes::{DataType, Field, Fields, Schema};
use arrow::record_batch::RecordBatch;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Infer a table schema from records.
///
/// Every column is nullable. Columns that only ever hold null are typed as
/// strings so the table stays writable to Parquet.
pub fn infer_schema(records: &[Value]) -> Schema {
    let mut columns = ColumnSet::default();
    for record in records {
        if let Value::Object(obj) = record {
            for (key, value) in obj {
                columns.observe(key, infer_type(value));
            }
        }
    }
    let fields: Vec<Field> = columns
        .into_fields()
        .into_iter()
        .map(|f| Field::new(f.name(), settle(f.data_type().clone()), true))
        .collect();
    Schema::new(fields)
}

/// Build a `RecordBatch` from records, inferring the schema
pub fn records_to_batch(records: &[Value]) -> Result<RecordBatch> {
    let schema = Arc::new(infer_schema(records));

    if records.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }

    let columns = schema
        .fields()
        .iter()
        .map(|field| {
            let values: Vec<Option<&Value>> = records
                .iter()
                .map(|record| record.get(field.name()))
                .collect();
            build_array(&values, field.data_type())
        })
        .collect::<Result<Vec<ArrayRef>>>()?;

    RecordBatch::try_new(schema, columns)
        .map_err(|e| Error::output(format!("failed to assemble table: {e}")))
}

// ============================================================================
// Type inference
// ============================================================================

/// Field names in first-seen order with their widened types
#[derive(Default)]
struct ColumnSet {
    names: Vec<String>,
    types: HashMap<String, DataType>,
}

impl ColumnSet {
    fn observe(&mut self, name: &str, data_type: DataType) {
        match self.types.get_mut(name) {
            Some(existing) => *existing = merge_types(existing, &data_type),
            None => {
                self.names.push(name.to_string());
                self.types.insert(name.to_string(), data_type);
            }
        }
    }

    fn into_fields(mut self) -> Vec<Field> {
        self.names
            .into_iter()
            .map(|name| {
                let data_type = self.types.remove(&name).unwrap_or(DataType::Null);
                Field::new(name, data_type, true)
            })
            .collect()
    }
}

fn infer_type(value: &Value) -> DataType {
    match value {
        Value::Null => DataType::Null,
        Value::Bool(_) => DataType::Boolean,
        Value::Number(n) if n.is_i64() => DataType::Int64,
        Value::Number(_) => DataType::Float64,
        Value::String(_) => DataType::Utf8,
        Value::Array(items) => {
            let item = items
                .iter()
                .map(infer_type)
                .fold(DataType::Null, |acc, t| merge_types(&acc, &t));
            list_of(item)
        }
        // Empty objects carry no columns; keep them as their JSON text
        Value::Object(obj) if obj.is_empty() => DataType::Utf8,
        Value::Object(obj) => {
            let mut columns = ColumnSet::default();
            for (key, value) in obj {
                columns.observe(key, infer_type(value));
            }
            DataType::Struct(Fields::from(columns.into_fields()))
        }
    }
}

fn list_of(item: DataType) -> DataType {
    DataType::List(Arc::new(Field::new("item", item, true)))
}

/// Widen two types to one that holds both
fn merge_types(a: &DataType, b: &DataType) -> DataType {
    match (a, b) {
        (a, b) if a == b => a.clone(),
        (DataType::Null, other) | (other, DataType::Null) => other.clone(),
        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }
        (DataType::List(x), DataType::List(y)) => list_of(merge_types(x.data_type(), y.data_type())),
        (DataType::Struct(x), DataType::Struct(y)) => {
            let mut columns = ColumnSet::default();
            for field in x.iter().chain(y.iter()) {
                columns.observe(field.name(), field.data_type().clone());
            }
            DataType::Struct(Fields::from(columns.into_fields()))
        }
        // Anything else disagrees irreconcilably; fall back to JSON text
        _ => DataType::Utf8,
    }
}

/// Replace leftover null types with strings, at any depth
fn settle(data_type: DataType) -> DataType {
    match data_type {
        DataType::Null => DataType::Utf8,
        DataType::List(item) => list_of(settle(item.data_type().clone())),
        DataType::Struct(fields) => DataType::Struct(
            fields
                .iter()
                .map(|f| Field::new(f.name(), settle(f.data_type().clone()), true))
                .collect(),
        ),
        other => other,
    }
}

// ============================================================================
// Array building
// ============================================================================

fn build_array(values: &[Option<&Value>], data_type: &DataType) -> Result<ArrayRef> {
    let array: ArrayRef = match data_type {
        DataType::Boolean => Arc::new(
            values
                .iter()
                .map(|v| v.and_then(Value::as_bool))
                .collect::<BooleanArray>(),
        ),
        DataType::Int64 => Arc::new(
            values
                .iter()
                .map(|v| v.and_then(Value::as_i64))
                .collect::<Int64Array>(),
        ),
        DataType::Float64 => Arc::new(
            values
                .iter()
                .map(|v| v.and_then(Value::as_f64))
                .collect::<Float64Array>(),
        ),
        DataType::List(item) => build_list_array(values, item)?,
        DataType::Struct(fields) => build_struct_array(values, fields)?,
        _ => Arc::new(
            values
                .iter()
                .map(|v| v.and_then(as_text))
                .collect::<StringArray>(),
        ),
    };
    Ok(array)
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn build_list_array(values: &[Option<&Value>], item: &Arc<Field>) -> Result<ArrayRef> {
    let mut items: Vec<Option<&Value>> = Vec::new();
    let mut offsets: Vec<i32> = Vec::with_capacity(values.len() + 1);
    offsets.push(0);

    for value in values {
        if let Some(Value::Array(elements)) = value {
            items.extend(elements.iter().map(Some));
        }
        let offset = i32::try_from(items.len())
            .map_err(|_| Error::output("list column exceeds i32 offsets"))?;
        offsets.push(offset);
    }

    let child = build_array(&items, item.data_type())?;
    let nulls = values
        .iter()
        .map(|v| matches!(v, Some(Value::Array(_))))
        .collect::<Vec<bool>>();

    let array = ListArray::try_new(
        Arc::clone(item),
        OffsetBuffer::new(offsets.into()),
        child,
        Some(nulls.into()),
    )
    .map_err(|e| Error::output(format!("failed to build list column: {e}")))?;
    Ok(Arc::new(array))
}

fn build_struct_array(values: &[Option<&Value>], fields: &Fields) -> Result<ArrayRef> {
    let children = fields
        .iter()
        .map(|field| {
            let child: Vec<Option<&Value>> = values
                .iter()
                .map(|v| v.and_then(|v| v.get(field.name())))
                .collect();
            build_array(&child, field.data_type())
        })
        .collect::<Result<Vec<ArrayRef>>>()?;

    let nulls = values
        .iter()
        .map(|v| matches!(v, Some(Value::Object(_))))
        .collect::<Vec<bool>>();

    let array = StructArray::try_new(fields.clone(), children, Some(nulls.into()))
        .map_err(|e| Error::output(format!("failed to build struct column: {e}")))?;
    Ok(Arc::new(array))
}
