//! Flattening and normalisation of JSON records

use super::types::FlattenSpec;
use crate::error::{Error, Result};
use crate::types::JsonObject;
use serde_json::Value;
use std::collections::HashMap;

/// Look up a dotted path (`cart.items`) in a JSON value
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    let mut current = value;
    for part in path.split('.') {
        match current {
            Value::Object(map) => current = map.get(part)?,
            _ => return None,
        }
    }
    Some(current)
}

/// Explode each parent's nested list into child rows.
///
/// Every child row holds the child's own fields, the carried parent fields
/// and the join key column. Children are attached to the parent whose join
/// key equals theirs; rows come out in parent order, then list order. A
/// parent with no children yields one row of carried fields when
/// `keep_empty_parents` is set.
pub fn flatten(records: &[Value], spec: &FlattenSpec) -> Result<Vec<Value>> {
    let mut parent_keys = Vec::with_capacity(records.len());
    let mut index: HashMap<String, usize> = HashMap::with_capacity(records.len());

    for (i, record) in records.iter().enumerate() {
        if !record.is_object() {
            return Err(Error::flatten(format!("parent record {i} is not an object")));
        }
        let key = spec.parent_key(record, i)?;
        if let Some(previous) = index.insert(key.clone(), i) {
            return Err(Error::flatten(format!(
                "parent records {previous} and {i} both derive join key '{key}'"
            )));
        }
        parent_keys.push(key);
    }

    let mut grouped: Vec<Vec<JsonObject>> = vec![Vec::new(); records.len()];

    for (i, record) in records.iter().enumerate() {
        for (j, child) in nested_list(record, &spec.parent_field, i)?.iter().enumerate() {
            let Value::Object(child) = child else {
                return Err(Error::flatten(format!(
                    "element {j} of '{}' on parent record {i} is not an object",
                    spec.parent_field
                )));
            };

            let key = child_key(child, spec, &parent_keys[i])?;
            let target = *index.get(&key).ok_or_else(|| {
                Error::flatten(format!(
                    "child {j} of parent record {i} derives join key '{key}' which matches no parent"
                ))
            })?;

            let row = build_row(child.clone(), &records[target], &key, spec)?;
            grouped[target].push(row);
        }
    }

    let mut rows = Vec::new();
    for (i, children) in grouped.into_iter().enumerate() {
        if children.is_empty() {
            if spec.keep_empty_parents {
                let row = build_row(JsonObject::new(), &records[i], &parent_keys[i], spec)?;
                rows.push(Value::Object(row));
            }
        } else {
            rows.extend(children.into_iter().map(Value::Object));
        }
    }

    Ok(rows)
}

/// Read the nested list; absent or null counts as empty
fn nested_list<'a>(record: &'a Value, field: &str, index: usize) -> Result<&'a [Value]> {
    match get_path(record, field) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(Error::flatten(format!(
            "'{field}' on parent record {index} is not a list: {other}"
        ))),
    }
}

fn child_key(child: &JsonObject, spec: &FlattenSpec, parent_key: &str) -> Result<String> {
    let Some(field) = &spec.child_id_field else {
        return Ok(parent_key.to_string());
    };

    match child.get(field) {
        None | Some(Value::Null) => Ok(parent_key.to_string()),
        Some(id) => spec.join_key_rule.derive(id).ok_or_else(|| {
            Error::flatten(format!("cannot derive join key from child id {id}"))
        }),
    }
}

fn build_row(
    mut row: JsonObject,
    parent: &Value,
    key: &str,
    spec: &FlattenSpec,
) -> Result<JsonObject> {
    for carried in &spec.carried {
        let value = get_path(parent, &carried.source)
            .cloned()
            .unwrap_or(Value::Null);
        insert_unique(&mut row, &carried.target, value)?;
    }
    insert_unique(&mut row, &spec.join_key_column, Value::String(key.to_string()))?;
    Ok(row)
}

fn insert_unique(row: &mut JsonObject, column: &str, value: Value) -> Result<()> {
    if row.contains_key(column) {
        return Err(Error::flatten(format!(
            "column '{column}' already exists on the child row"
        )));
    }
    row.insert(column.to_string(), value);
    Ok(())
}

/// Flatten nested objects into dotted column names.
///
/// `{"a": {"b": 1}, "c": [..]}` becomes `{"a.b": 1, "c": [..]}`. Arrays are
/// left as they are; non-object records are returned unchanged.
pub fn normalize(record: Value) -> Value {
    match record {
        Value::Object(map) => {
            let mut out = JsonObject::new();
            normalize_into(&mut out, None, map);
            Value::Object(out)
        }
        other => other,
    }
}

/// Normalise every record
pub fn normalize_all(records: Vec<Value>) -> Vec<Value> {
    records.into_iter().map(normalize).collect()
}

fn normalize_into(out: &mut JsonObject, prefix: Option<&str>, map: JsonObject) {
    for (key, value) in map {
        let name = match prefix {
            Some(p) => format!("{p}.{key}"),
            None => key,
        };
        match value {
            Value::Object(inner) => normalize_into(out, Some(&name), inner),
            other => {
                out.insert(name, other);
            }
        }
    }
}
