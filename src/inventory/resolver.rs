//! Name→id resolver for inventory locations

use crate::error::{Error, Result};
use crate::http::{RequestConfig, Session};
use crate::pagination::Envelope;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Endpoint listing the shop's inventory locations
pub const INVENTORIES_PATH: &str = "store/inventory/inventories";

/// Immutable name→id map of inventory locations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryResolver {
    ids: HashMap<String, String>,
}

impl InventoryResolver {
    /// Build the map from inventory-location records.
    ///
    /// Records without a string `name` or a string/number `id` are skipped.
    /// When two locations share a name the first one wins.
    pub fn from_records(records: &[Value]) -> Self {
        let mut ids = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            let name = record.get("name").and_then(Value::as_str);
            let id = match record.get("id") {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            };

            match (name, id) {
                (Some(name), Some(id)) => {
                    ids.entry(name.to_string()).or_insert(id);
                }
                _ => warn!("Skipping inventory record {} without name/id", i),
            }
        }
        Self { ids }
    }

    /// Fetch the inventory locations with a single GET and build the map
    pub async fn load(session: &Session) -> Result<Self> {
        let body = session
            .get_json(INVENTORIES_PATH, RequestConfig::new())
            .await?;
        let records = Envelope::parse_values(INVENTORIES_PATH, body)?;
        let resolver = Self::from_records(&records);
        debug!("Loaded {} inventory locations", resolver.len());
        Ok(resolver)
    }

    /// Resolve an inventory name to its id
    pub fn resolve(&self, name: &str) -> Result<&str> {
        self.ids
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| Error::inventory_not_found(name))
    }

    /// Known inventory names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.ids.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of known locations
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no locations are known
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
