//! Flatten configuration types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default name of the join key column added to flattened rows
pub const DEFAULT_JOIN_KEY_COLUMN: &str = "join_key";

/// How a join key is derived from a record id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum JoinKeyRule {
    /// The id itself
    #[default]
    Identity,
    /// The id with a fixed number of trailing characters removed
    StripSuffix {
        /// Number of characters to remove
        len: usize,
    },
}

impl JoinKeyRule {
    /// Derive a join key from an id value.
    ///
    /// Strings and numbers are accepted. Returns `None` for other JSON
    /// types and for ids no longer than the suffix being stripped.
    pub fn derive(self, id: &Value) -> Option<String> {
        let id = match id {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };

        match self {
            JoinKeyRule::Identity => Some(id),
            JoinKeyRule::StripSuffix { len } => {
                let count = id.chars().count();
                if count <= len {
                    return None;
                }
                Some(id.chars().take(count - len).collect())
            }
        }
    }
}

/// A parent field copied onto every child row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarriedField {
    /// Dotted path of the field on the parent record
    pub source: String,
    /// Column name on the child row
    pub target: String,
}

impl CarriedField {
    /// Carry `source` into a column named `target`
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Describes how one resource's nested list is exploded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenSpec {
    /// Dotted path of the nested list on the parent (e.g. `cart.items`)
    pub parent_field: String,
    /// Id field on the parent record
    pub parent_id_field: String,
    /// Id field on child elements; `None` makes children inherit the
    /// parent's key
    pub child_id_field: Option<String>,
    /// Join key derivation applied to both ids
    pub join_key_rule: JoinKeyRule,
    /// Parent fields copied onto each child row
    pub carried: Vec<CarriedField>,
    /// Emit one row for parents without children
    pub keep_empty_parents: bool,
    /// Name of the join key column
    pub join_key_column: String,
}

impl FlattenSpec {
    /// Explode `parent_field`, keying rows by the parent's `id`
    pub fn new(parent_field: impl Into<String>) -> Self {
        Self {
            parent_field: parent_field.into(),
            parent_id_field: "id".to_string(),
            child_id_field: None,
            join_key_rule: JoinKeyRule::Identity,
            carried: Vec::new(),
            keep_empty_parents: true,
            join_key_column: DEFAULT_JOIN_KEY_COLUMN.to_string(),
        }
    }

    /// Derive child keys from a child id field
    #[must_use]
    pub fn with_child_id(mut self, field: impl Into<String>) -> Self {
        self.child_id_field = Some(field.into());
        self
    }

    /// Set the join key rule
    #[must_use]
    pub fn with_rule(mut self, rule: JoinKeyRule) -> Self {
        self.join_key_rule = rule;
        self
    }

    /// Carry a parent field onto child rows
    #[must_use]
    pub fn carry(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.carried.push(CarriedField::new(source, target));
        self
    }

    /// Drop parents that have no children instead of emitting a row for them
    #[must_use]
    pub fn inner_join(mut self) -> Self {
        self.keep_empty_parents = false;
        self
    }

    /// Set the join key column name
    #[must_use]
    pub fn with_join_key_column(mut self, column: impl Into<String>) -> Self {
        self.join_key_column = column.into();
        self
    }

    /// Derive the join key of the parent at `index`
    pub(crate) fn parent_key(&self, parent: &Value, index: usize) -> Result<String> {
        let id = parent.get(&self.parent_id_field).ok_or_else(|| {
            Error::flatten(format!(
                "parent record {index} has no '{}' field",
                self.parent_id_field
            ))
        })?;
        self.join_key_rule.derive(id).ok_or_else(|| {
            Error::flatten(format!(
                "cannot derive join key from parent id {id} at record {index}"
            ))
        })
    }
}
