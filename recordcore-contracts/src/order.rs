//! Customer orders.
//!
//! An order is placed once and afterwards only its status and feedback
//! change. Every other attribute stays as it was placed.

use recordcore::{
    DomainEvent, EventSink, HistoryEntry, QueryResult, Record, RecordContract, RecordKey,
    RecordResult, RecordStore, StoreConfig, WorldState,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// An order as stored in the world state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Always `"Order"`
    #[serde(rename = "docType")]
    pub doc_type: String,
    /// Order identifier and world-state key
    #[serde(rename = "OrderID")]
    pub order_id: RecordKey,
    /// Number of items ordered
    #[serde(rename = "ItemCount")]
    pub item_count: i64,
    /// Customer who placed the order
    #[serde(rename = "CustomerID")]
    pub customer_id: String,
    /// Delivery latitude
    #[serde(rename = "Lat")]
    pub lat: f64,
    /// Delivery longitude
    #[serde(rename = "Long")]
    pub long: f64,
    /// Delivery slot
    #[serde(rename = "DeliveryScheduleID")]
    pub delivery_schedule_id: String,
    /// Delivery charges
    #[serde(rename = "DeliveryCharges")]
    pub delivery_charges: f64,
    /// Requested delivery time
    #[serde(rename = "DeliveryDateTime")]
    pub delivery_date_time: String,
    /// Time the order was placed
    #[serde(rename = "OrderPlaceDateTime")]
    pub order_place_date_time: String,
    /// Total before discount and tax
    #[serde(rename = "GrossTotal")]
    pub gross_total: f64,
    /// Discount applied
    #[serde(rename = "Discount")]
    pub discount: f64,
    /// Value added tax
    #[serde(rename = "VAT")]
    pub vat: f64,
    /// Amount due
    #[serde(rename = "NetTotal")]
    pub net_total: f64,
    /// Current status, e.g. `Placed` or `Shipped`
    #[serde(rename = "StatusTitle")]
    pub status_title: String,
    /// Time the status was last set
    #[serde(rename = "StatusTimeStamp")]
    pub status_timestamp: String,
    /// Customer feedback, empty until posted
    #[serde(rename = "FeedBack")]
    pub feedback: String,
}

impl Order {
    /// Attribute holding the customer reference.
    pub const CUSTOMER_ID: &'static str = "CustomerID";
    /// Attribute holding the status title.
    pub const STATUS_TITLE: &'static str = "StatusTitle";
}

impl Record for Order {
    const DOC_TYPE: &'static str = "Order";
    const ID_FIELD: &'static str = "OrderID";

    fn key(&self) -> &RecordKey {
        &self.order_id
    }

    fn doc_type(&self) -> &str {
        &self.doc_type
    }
}

/// Everything the caller supplies when placing an order.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    /// Order identifier
    pub order_id: RecordKey,
    /// Number of items ordered
    pub item_count: i64,
    /// Customer placing the order
    pub customer_id: String,
    /// Delivery latitude
    pub lat: f64,
    /// Delivery longitude
    pub long: f64,
    /// Delivery slot
    pub delivery_schedule_id: String,
    /// Delivery charges
    pub delivery_charges: f64,
    /// Requested delivery time
    pub delivery_date_time: String,
    /// Time the order was placed
    pub order_place_date_time: String,
    /// Total before discount and tax
    pub gross_total: f64,
    /// Discount applied
    pub discount: f64,
    /// Value added tax
    pub vat: f64,
    /// Amount due
    pub net_total: f64,
    /// Initial status
    pub status_title: String,
    /// Time the initial status was set
    pub status_timestamp: String,
}

impl From<NewOrder> for Order {
    fn from(new: NewOrder) -> Self {
        Self {
            doc_type: Self::DOC_TYPE.to_string(),
            order_id: new.order_id,
            item_count: new.item_count,
            customer_id: new.customer_id,
            lat: new.lat,
            long: new.long,
            delivery_schedule_id: new.delivery_schedule_id,
            delivery_charges: new.delivery_charges,
            delivery_date_time: new.delivery_date_time,
            order_place_date_time: new.order_place_date_time,
            gross_total: new.gross_total,
            discount: new.discount,
            vat: new.vat,
            net_total: new.net_total,
            status_title: new.status_title,
            status_timestamp: new.status_timestamp,
            feedback: String::new(),
        }
    }
}

/// Events emitted by the order contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderEvent {
    /// A new order was written
    Placed,
    /// The status changed
    Updated,
    /// Feedback was posted
    FeedBackUpdated,
}

impl DomainEvent for OrderEvent {
    fn event_name(self) -> &'static str {
        match self {
            Self::Placed => "OrderPlaced",
            Self::Updated => "OrderUpdated",
            Self::FeedBackUpdated => "FeedBackUpdated",
        }
    }
}

/// The order contract.
#[derive(Debug, Clone)]
pub struct OrderContract<W, S> {
    inner: RecordContract<Order, W, S>,
}

impl<W, S> OrderContract<W, S>
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
        "Order Chaincode Invoked!"
    }

    /// Writes a new order with empty feedback and emits `OrderPlaced`.
    #[instrument(skip(self, order), fields(order_id = %order.order_id))]
    pub async fn place_order(&self, order: NewOrder) -> RecordResult<Order> {
        self.inner.create(Order::from(order), OrderEvent::Placed).await
    }

    /// Every order in the world state, paired with its key.
    pub async fn get_all_orders(&self) -> RecordResult<Vec<QueryResult<Order>>> {
        self.inner.read_all().await
    }

    /// The order stored under `order_id`.
    pub async fn get_order_by_id(&self, order_id: &RecordKey) -> RecordResult<Order> {
        self.inner.read_by_id(order_id).await
    }

    /// Orders placed by `customer_id`.
    pub async fn get_orders_by_customer_id(&self, customer_id: &str) -> RecordResult<Vec<Order>> {
        self.inner
            .read_by_attribute(Order::CUSTOMER_ID, customer_id)
            .await
    }

    /// Orders whose current status is `status_title`.
    pub async fn get_order_by_status(&self, status_title: &str) -> RecordResult<Vec<Order>> {
        self.inner
            .read_by_attribute(Order::STATUS_TITLE, status_title)
            .await
    }

    /// Every revision of the order, newest first.
    pub async fn get_order_history(&self, order_id: &RecordKey) -> RecordResult<Vec<HistoryEntry>> {
        self.inner.history(order_id).await
    }

    /// Sets the status and its timestamp, then emits `OrderUpdated`.
    #[instrument(skip(self, order_id, status_title, status_timestamp), fields(order_id = %order_id))]
    pub async fn update_order_status(
        &self,
        order_id: &RecordKey,
        status_title: impl Into<String> + Send,
        status_timestamp: impl Into<String> + Send,
    ) -> RecordResult<Order> {
        let status_title = status_title.into();
        let status_timestamp = status_timestamp.into();
        self.inner
            .update(order_id, OrderEvent::Updated, move |order| {
                order.status_title = status_title;
                order.status_timestamp = status_timestamp;
            })
            .await
    }

    /// Replaces the feedback, then emits `FeedBackUpdated`.
    #[instrument(skip(self, order_id, feedback), fields(order_id = %order_id))]
    pub async fn post_order_feedback(
        &self,
        order_id: &RecordKey,
        feedback: impl Into<String> + Send,
    ) -> RecordResult<Order> {
        let feedback = feedback.into();
        self.inner
            .update(order_id, OrderEvent::FeedBackUpdated, move |order| {
                order.feedback = feedback;
            })
            .await
    }

    /// The shared contract skeleton underneath.
    pub const fn contract(&self) -> &RecordContract<Order, W, S> {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_order() -> NewOrder {
        NewOrder {
            order_id: RecordKey::try_new("O1").unwrap(),
            item_count: 2,
            customer_id: "C1".to_string(),
            lat: 24.86,
            long: 67.01,
            delivery_schedule_id: "DS1".to_string(),
            delivery_charges: 1.5,
            delivery_date_time: "2024-01-02T10:00".to_string(),
            order_place_date_time: "2024-01-01T09:00".to_string(),
            gross_total: 20.5,
            discount: 0.5,
            vat: 2.5,
            net_total: 22.5,
            status_title: "Placed".to_string(),
            status_timestamp: "t1".to_string(),
        }
    }

    #[test]
    fn new_order_starts_without_feedback() {
        let order = Order::from(new_order());
        assert_eq!(order.doc_type, "Order");
        assert_eq!(order.feedback, "");
        assert_eq!(order.key().as_str(), "O1");
    }

    #[test]
    fn order_wire_format_keeps_field_order() {
        insta::assert_json_snapshot!(Order::from(new_order()), @r#"
        {
          "docType": "Order",
          "OrderID": "O1",
          "ItemCount": 2,
          "CustomerID": "C1",
          "Lat": 24.86,
          "Long": 67.01,
          "DeliveryScheduleID": "DS1",
          "DeliveryCharges": 1.5,
          "DeliveryDateTime": "2024-01-02T10:00",
          "OrderPlaceDateTime": "2024-01-01T09:00",
          "GrossTotal": 20.5,
          "Discount": 0.5,
          "VAT": 2.5,
          "NetTotal": 22.5,
          "StatusTitle": "Placed",
          "StatusTimeStamp": "t1",
          "FeedBack": ""
        }
        "#);
    }

    #[test]
    fn event_names() {
        assert_eq!(OrderEvent::Placed.event_name(), "OrderPlaced");
        assert_eq!(OrderEvent::Updated.event_name(), "OrderUpdated");
        assert_eq!(OrderEvent::FeedBackUpdated.event_name(), "FeedBackUpdated");
    }
}
