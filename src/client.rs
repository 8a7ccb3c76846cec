//! The partner API client
//!
//! `BlazeClient` owns an authenticated session, the fetch guards and the
//! inventory name→id map, and exposes one method per resource. Each method
//! builds the resource's query, runs it through the fetch engine, reshapes
//! the records and returns them as an Arrow table.

use crate::catalog::{FetchOptions, Resource, ResourceQuery};
use crate::config::ClientConfig;
use crate::engine::{FetchEngine, FetchLimits};
use crate::error::Result;
use crate::http::Session;
use crate::inventory::InventoryResolver;
use crate::output::records_to_batch;
use arrow::record_batch::RecordBatch;
use serde_json::Value;
use tracing::info;

/// Query parameter carrying the resolved inventory id
pub const INVENTORY_ID_PARAM: &str = "inventoryId";

/// Client for the BLAZE partner API
#[derive(Debug)]
pub struct BlazeClient {
    session: Session,
    limits: FetchLimits,
    inventory: InventoryResolver,
}

impl BlazeClient {
    /// Build a session from `config` and load the inventory map.
    ///
    /// Fails before any request when the credentials are missing or blank.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let session = Session::with_config(config.session_config(), config.to_credentials()?)?;
        Self::from_session(session, config.fetch_limits()).await
    }

    /// Wrap an existing session and load the inventory map
    pub async fn from_session(session: Session, limits: FetchLimits) -> Result<Self> {
        let inventory = InventoryResolver::load(&session).await?;
        info!(
            "Connected to {} ({} inventory locations)",
            session.config().base_url,
            inventory.len()
        );
        Ok(Self {
            session,
            limits,
            inventory,
        })
    }

    /// The inventory name→id map
    pub fn inventory(&self) -> &InventoryResolver {
        &self.inventory
    }

    /// Re-fetch the inventory map
    pub async fn refresh_inventories(&mut self) -> Result<()> {
        self.inventory = InventoryResolver::load(&self.session).await?;
        Ok(())
    }

    /// The fetch guards in effect
    pub fn limits(&self) -> &FetchLimits {
        &self.limits
    }

    /// The underlying session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The query a fetch of `resource` would run.
    ///
    /// For batch quantities this resolves the inventory name first, so an
    /// unknown name fails here without touching the network.
    pub fn query(&self, resource: Resource, options: &FetchOptions) -> Result<ResourceQuery> {
        let query = resource.query(options);
        if resource.requires_inventory() {
            let id = self.inventory.resolve(options.inventory_name())?;
            return Ok(query.param(INVENTORY_ID_PARAM, id));
        }
        Ok(query)
    }

    /// Fetch and reshape every record of a resource
    pub async fn fetch_records(
        &self,
        resource: Resource,
        options: &FetchOptions,
    ) -> Result<Vec<Value>> {
        let query = self.query(resource, options)?;
        let outcome = FetchEngine::new(&self.session)
            .with_limits(self.limits)
            .fetch_all(&query)
            .await?;
        Ok(query.shape(outcome.records))
    }

    /// Fetch a resource as a table
    pub async fn fetch(&self, resource: Resource, options: &FetchOptions) -> Result<RecordBatch> {
        let records = self.fetch_records(resource, options).await?;
        records_to_batch(&records)
    }

    // ========================================================================
    // Resources
    // ========================================================================

    /// Product catalogue
    pub async fn products(&self, options: &FetchOptions) -> Result<RecordBatch> {
        self.fetch(Resource::Products, options).await
    }

    /// Vendors, deduplicated by id, with `name` renamed to `vendor_name`
    pub async fn vendors(&self, options: &FetchOptions) -> Result<RecordBatch> {
        self.fetch(Resource::Vendors, options).await
    }

    /// Product categories
    pub async fn categories(&self) -> Result<RecordBatch> {
        self.fetch(Resource::Categories, &FetchOptions::new()).await
    }

    /// Brands
    pub async fn brands(&self, options: &FetchOptions) -> Result<RecordBatch> {
        self.fetch(Resource::Brands, options).await
    }

    /// Inventory locations
    pub async fn inventories(&self) -> Result<RecordBatch> {
        self.fetch(Resource::Inventories, &FetchOptions::new()).await
    }

    /// Batch quantities held in `options.inventory` (default `Safe`)
    pub async fn batch_quantities(&self, options: &FetchOptions) -> Result<RecordBatch> {
        self.fetch(Resource::BatchQuantities, options).await
    }

    /// Members registered in the date window
    pub async fn members(&self, options: &FetchOptions) -> Result<RecordBatch> {
        self.fetch(Resource::Members, options).await
    }

    /// Employees
    pub async fn employees(&self, options: &FetchOptions) -> Result<RecordBatch> {
        self.fetch(Resource::Employees, options).await
    }

    /// Transactions in the date window
    pub async fn transactions(&self, options: &FetchOptions) -> Result<RecordBatch> {
        self.fetch(Resource::Transactions, options).await
    }

    /// Cart line items of the transactions in the date window, one row each
    pub async fn item_sales(&self, options: &FetchOptions) -> Result<RecordBatch> {
        self.fetch(Resource::ItemSales, options).await
    }

    /// Purchase orders in the date window
    pub async fn purchase_orders(&self, options: &FetchOptions) -> Result<RecordBatch> {
        self.fetch(Resource::PurchaseOrders, options).await
    }

    /// Line items of the purchase orders in the date window, one row each
    pub async fn po_line_items(&self, options: &FetchOptions) -> Result<RecordBatch> {
        self.fetch(Resource::PoLineItems, options).await
    }
}
