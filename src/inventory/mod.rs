//! Inventory location resolution
//!
//! Quantity lookups are keyed by inventory id, while callers think in
//! inventory names ("Safe", "Back Room"). `InventoryResolver` holds the
//! name→id map for the current shop, loaded once from the
//! inventory-locations endpoint when the client is built.

mod resolver;

pub use resolver::{InventoryResolver, INVENTORIES_PATH};

#[cfg(test)]
mod tests;
