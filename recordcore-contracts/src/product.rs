//! Product catalogue entries.
//!
//! Everything but the identifier and the creation timestamp can be replaced
//! by an update. `UpdateTimeStamp` reads [`NEVER_UPDATED`] until then.

use crate::NEVER_UPDATED;
use recordcore::{
    DomainEvent, EventSink, HistoryEntry, QueryResult, Record, RecordContract, RecordKey,
    RecordResult, RecordStore, StoreConfig, WorldState,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A product as stored in the world state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Always `"Product"`
    #[serde(rename = "docType")]
    pub doc_type: String,
    /// Product identifier and world-state key
    #[serde(rename = "ProductID")]
    pub product_id: RecordKey,
    /// Display title
    #[serde(rename = "ProductTitle")]
    pub product_title: String,
    /// Unit of sale
    #[serde(rename = "Unit")]
    pub unit: String,
    /// Price per unit
    #[serde(rename = "Price")]
    pub price: f64,
    /// Supplier name
    #[serde(rename = "Supplier")]
    pub supplier: String,
    /// Units in stock
    #[serde(rename = "Stock")]
    pub stock: i64,
    /// Storage temperature range
    #[serde(rename = "TemperatureConstraints")]
    pub temperature_constraints: String,
    /// Storage humidity range
    #[serde(rename = "Humidity")]
    pub humidity: String,
    /// Any further handling requirements
    #[serde(rename = "OtherLogisticalParameters")]
    pub other_logistical_parameters: String,
    /// Time the product was added
    #[serde(rename = "TimeStamp")]
    pub timestamp: String,
    /// Time of the last update
    #[serde(rename = "UpdateTimeStamp")]
    pub update_timestamp: String,
}

impl Product {
    /// Attribute holding the title.
    pub const PRODUCT_TITLE: &'static str = "ProductTitle";

    fn apply(&mut self, update: ProductUpdate) {
        self.product_title = update.product_title;
        self.unit = update.unit;
        self.price = update.price;
        self.supplier = update.supplier;
        self.stock = update.stock;
        self.temperature_constraints = update.temperature_constraints;
        self.humidity = update.humidity;
        self.other_logistical_parameters = update.other_logistical_parameters;
        self.update_timestamp = update.update_timestamp;
    }
}

impl Record for Product {
    const DOC_TYPE: &'static str = "Product";
    const ID_FIELD: &'static str = "ProductID";

    fn key(&self) -> &RecordKey {
        &self.product_id
    }

    fn doc_type(&self) -> &str {
        &self.doc_type
    }
}

/// Everything the caller supplies when adding a product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    /// Product identifier
    pub product_id: RecordKey,
    /// Display title
    pub product_title: String,
    /// Unit of sale
    pub unit: String,
    /// Price per unit
    pub price: f64,
    /// Supplier name
    pub supplier: String,
    /// Units in stock
    pub stock: i64,
    /// Storage temperature range
    pub temperature_constraints: String,
    /// Storage humidity range
    pub humidity: String,
    /// Any further handling requirements
    pub other_logistical_parameters: String,
    /// Time the product was added
    pub timestamp: String,
}

impl From<NewProduct> for Product {
    fn from(new: NewProduct) -> Self {
        Self {
            doc_type: Self::DOC_TYPE.to_string(),
            product_id: new.product_id,
            product_title: new.product_title,
            unit: new.unit,
            price: new.price,
            supplier: new.supplier,
            stock: new.stock,
            temperature_constraints: new.temperature_constraints,
            humidity: new.humidity,
            other_logistical_parameters: new.other_logistical_parameters,
            timestamp: new.timestamp,
            update_timestamp: NEVER_UPDATED.to_string(),
        }
    }
}

/// Replacement values for every mutable product attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    /// New title
    pub product_title: String,
    /// New unit of sale
    pub unit: String,
    /// New price
    pub price: f64,
    /// New supplier
    pub supplier: String,
    /// New stock level
    pub stock: i64,
    /// New temperature range
    pub temperature_constraints: String,
    /// New humidity range
    pub humidity: String,
    /// New handling requirements
    pub other_logistical_parameters: String,
    /// Time of this update
    pub update_timestamp: String,
}

/// Events emitted by the product contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductEvent {
    /// A new product was written
    Added,
    /// A product was replaced
    Updated,
}

impl DomainEvent for ProductEvent {
    fn event_name(self) -> &'static str {
        match self {
            Self::Added => "ProductAdded",
            Self::Updated => "ProductUpdated",
        }
    }
}

/// The product contract.
#[derive(Debug, Clone)]
pub struct ProductContract<W, S> {
    inner: RecordContract<Product, W, S>,
}

impl<W, S> ProductContract<W, S>
where
    W: WorldState,
    S: EventSink,
{
    /// Creates the contract with the default store configuration.
    pub fn new(world_state: W, events: S) -> RecordResult<Self> {
        Self::with_config(world_state, events, StoreConfig::default())
    }

    /// Creates the contract with an explicit store configuration.
    pub fn with_config(world_state: W, events: S, config: StoreConfig) -> RecordResult<Self> {
        let store = RecordStore::with_config(world_state, config)?;
        Ok(Self {
            inner: RecordContract::new(store, events),
        })
    }

    /// Deployment probe. Touches nothing.
    pub const fn init_ledger(&self) -> &'static str {
        "Product Chaincode Invoked!"
    }

    /// Writes a new product and emits `ProductAdded`.
    #[instrument(skip(self, product), fields(product_id = %product.product_id))]
    pub async fn add_product(&self, product: NewProduct) -> RecordResult<Product> {
        self.inner
            .create(Product::from(product), ProductEvent::Added)
            .await
    }

    /// Every product in the world state, paired with its key.
    pub async fn get_all_products(&self) -> RecordResult<Vec<QueryResult<Product>>> {
        self.inner.read_all().await
    }

    /// The product stored under `product_id`.
    pub async fn get_product_by_id(&self, product_id: &RecordKey) -> RecordResult<Product> {
        self.inner.read_by_id(product_id).await
    }

    /// Products titled exactly `product_title`.
    pub async fn get_product_by_title(&self, product_title: &str) -> RecordResult<Vec<Product>> {
        self.inner
            .read_by_attribute(Product::PRODUCT_TITLE, product_title)
            .await
    }

    /// Every revision of the product, newest first.
    pub async fn get_product_history(
        &self,
        product_id: &RecordKey,
    ) -> RecordResult<Vec<HistoryEntry>> {
        self.inner.history(product_id).await
    }

    /// Replaces every mutable attribute, then emits `ProductUpdated`.
    #[instrument(skip(self, product_id, update), fields(product_id = %product_id))]
    pub async fn update_product(
        &self,
        product_id: &RecordKey,
        update: ProductUpdate,
    ) -> RecordResult<Product> {
        self.inner
            .update(product_id, ProductEvent::Updated, move |product| {
                product.apply(update);
            })
            .await
    }

    /// The shared contract skeleton underneath.
    pub const fn contract(&self) -> &RecordContract<Product, W, S> {
        &self.inner
    }
}
