//! The partner API resources and their query configuration

use super::types::ResourceQuery;
use crate::error::{Error, Result};
use crate::flatten::FlattenSpec;
use crate::inventory::INVENTORIES_PATH;
use crate::pagination::{Pagination, SkipPaginator, TerminationRule};
use crate::types::{DateEncoding, DateRange};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inventory queried for batch quantities when none is named
pub const DEFAULT_INVENTORY: &str = "Safe";

/// Caller-supplied knobs for one resource fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Offset of the first page
    pub skip: u64,
    /// Page size, for endpoints that accept one
    pub page_size: Option<u32>,
    /// Date window, for date-filtered endpoints (default: yesterday..today)
    pub dates: Option<DateRange>,
    /// Inventory name, for batch quantities (default: `Safe`)
    pub inventory: Option<String>,
}

impl FetchOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at `skip`
    #[must_use]
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    /// Request `size` records per page
    #[must_use]
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Restrict to a date window
    #[must_use]
    pub fn dates(mut self, range: DateRange) -> Self {
        self.dates = Some(range);
        self
    }

    /// Query a named inventory
    #[must_use]
    pub fn inventory(mut self, name: impl Into<String>) -> Self {
        self.inventory = Some(name.into());
        self
    }

    /// The inventory name to resolve
    pub fn inventory_name(&self) -> &str {
        self.inventory.as_deref().unwrap_or(DEFAULT_INVENTORY)
    }
}

/// A partner API resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    Products,
    Vendors,
    Categories,
    Brands,
    Inventories,
    BatchQuantities,
    Members,
    Employees,
    Transactions,
    ItemSales,
    PurchaseOrders,
    PoLineItems,
}

impl Resource {
    /// Every resource, in catalog order
    pub const ALL: [Resource; 12] = [
        Resource::Products,
        Resource::Vendors,
        Resource::Categories,
        Resource::Brands,
        Resource::Inventories,
        Resource::BatchQuantities,
        Resource::Members,
        Resource::Employees,
        Resource::Transactions,
        Resource::ItemSales,
        Resource::PurchaseOrders,
        Resource::PoLineItems,
    ];

    /// Kebab-case name
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Products => "products",
            Resource::Vendors => "vendors",
            Resource::Categories => "categories",
            Resource::Brands => "brands",
            Resource::Inventories => "inventories",
            Resource::BatchQuantities => "batch-quantities",
            Resource::Members => "members",
            Resource::Employees => "employees",
            Resource::Transactions => "transactions",
            Resource::ItemSales => "item-sales",
            Resource::PurchaseOrders => "purchase-orders",
            Resource::PoLineItems => "po-line-items",
        }
    }

    /// Whether the resource is filtered by a date window
    pub fn is_date_filtered(self) -> bool {
        matches!(
            self,
            Resource::Members
                | Resource::Transactions
                | Resource::ItemSales
                | Resource::PurchaseOrders
                | Resource::PoLineItems
        )
    }

    /// Whether the resource needs an inventory id
    pub fn requires_inventory(self) -> bool {
        matches!(self, Resource::BatchQuantities)
    }

    /// Build the query for this resource.
    ///
    /// Batch quantities also need an `inventoryId` parameter, which the
    /// client adds once the inventory name has been resolved.
    pub fn query(self, options: &FetchOptions) -> ResourceQuery {
        let dates = options.dates.unwrap_or_default();
        let formatted = DateEncoding::default();

        let query = match self {
            Resource::Products => ResourceQuery::new(
                self.as_str(),
                "products",
                skip_only("skip", TerminationRule::CurrentSkip),
            ),
            Resource::Vendors => ResourceQuery::new(
                self.as_str(),
                "vendors",
                skip_only("skip", TerminationRule::CurrentSkip),
            )
            .rename("name", "vendor_name")
            .dedupe_by("id"),
            Resource::Categories => ResourceQuery::new(
                self.as_str(),
                "store/inventory/categories",
                Pagination::Single,
            )
            .normalized(),
            Resource::Brands => ResourceQuery::new(
                self.as_str(),
                "store/inventory/brands",
                limited("start", 200, TerminationRule::CurrentSkip),
            )
            .normalized(),
            Resource::Inventories => {
                ResourceQuery::new(self.as_str(), INVENTORIES_PATH, Pagination::Single)
                    .normalized()
            }
            Resource::BatchQuantities => ResourceQuery::new(
                self.as_str(),
                "store/batches/quantities",
                skip_only("start", TerminationRule::CurrentSkip),
            )
            .normalized(),
            Resource::Members => ResourceQuery::new(
                self.as_str(),
                "members",
                limited("skip", 100, TerminationRule::CurrentSkip),
            )
            .with_dates(DateEncoding::EpochMillis, dates)
            .normalized(),
            Resource::Employees => ResourceQuery::new(
                self.as_str(),
                "employees",
                limited("start", 200, TerminationRule::CurrentSkip),
            )
            .normalized(),
            Resource::Transactions => ResourceQuery::new(
                self.as_str(),
                "transactions",
                limited("skip", 100, TerminationRule::NextSkip),
            )
            .with_dates(formatted, dates)
            .normalized(),
            Resource::ItemSales => ResourceQuery::new(
                self.as_str(),
                "transactions",
                limited("skip", 100, TerminationRule::NextSkip),
            )
            .with_dates(formatted, dates)
            .flatten_with(
                FlattenSpec::new("cart.items")
                    .carry("transNo", "transaction.transNo")
                    .carry("processedTime", "transaction.processedTime")
                    .carry("created", "transaction.created")
                    .with_join_key_column("transaction.id"),
            )
            .normalized(),
            Resource::PurchaseOrders => ResourceQuery::new(
                self.as_str(),
                "purchaseorders/list",
                limited("start", 200, TerminationRule::NextSkip),
            )
            .with_dates(formatted, dates)
            .normalized(),
            Resource::PoLineItems => ResourceQuery::new(
                self.as_str(),
                "purchaseorders/list",
                limited("start", 200, TerminationRule::NextSkip),
            )
            .with_dates(formatted, dates)
            .flatten_with(
                FlattenSpec::new("poProductRequestResultList")
                    .carry("poNumber", "purchaseOrder.poNumber")
                    .carry("created", "purchaseOrder.created")
                    .with_join_key_column("purchaseOrder.id"),
            )
            .normalized(),
        };

        let query = query.starting_at(options.skip);
        match options.page_size {
            Some(size) => query.with_page_size(size),
            None => query,
        }
    }
}

fn skip_only(param: &str, termination: TerminationRule) -> Pagination {
    Pagination::Skip(SkipPaginator::new(param, termination))
}

fn limited(param: &str, page_size: u32, termination: TerminationRule) -> Pagination {
    Pagination::Skip(SkipPaginator::new(param, termination).with_limit("limit", page_size))
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str() == normalized)
            .ok_or_else(|| Error::UnknownResource { name: s.to_string() })
    }
}
