//! Payments against orders.
//!
//! A payment is written once and never updated.

use recordcore::{
    DomainEvent, EventSink, HistoryEntry, QueryResult, Record, RecordContract, RecordKey,
    RecordResult, RecordStore, StoreConfig, WorldState,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A payment as stored in the world state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Always `"Payment"`
    #[serde(rename = "docType")]
    pub doc_type: String,
    /// Payment identifier and world-state key
    #[serde(rename = "PaymentID")]
    pub payment_id: RecordKey,
    /// Order being paid. Not checked against the order family.
    #[serde(rename = "OrderID")]
    pub order_id: String,
    /// Paying customer
    #[serde(rename = "CustomerID")]
    pub customer_id: String,
    /// Amount due on the order
    #[serde(rename = "NetTotal")]
    pub net_total: f64,
    /// Amount actually paid
    #[serde(rename = "PaidAmt")]
    pub paid_amt: f64,
    /// Time of payment
    #[serde(rename = "TimeStamp")]
    pub timestamp: String,
}

impl Payment {
    /// Attribute holding the order reference.
    pub const ORDER_ID: &'static str = "OrderID";
}

impl Record for Payment {
    const DOC_TYPE: &'static str = "Payment";
    const ID_FIELD: &'static str = "PaymentID";

    fn key(&self) -> &RecordKey {
        &self.payment_id
    }

    fn doc_type(&self) -> &str {
        &self.doc_type
    }
}

/// Everything the caller supplies when making a payment.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    /// Payment identifier
    pub payment_id: RecordKey,
    /// Order being paid
    pub order_id: String,
    /// Paying customer
    pub customer_id: String,
    /// Amount due on the order
    pub net_total: f64,
    /// Amount actually paid
    pub paid_amt: f64,
    /// Time of payment
    pub timestamp: String,
}

impl From<NewPayment> for Payment {
    fn from(new: NewPayment) -> Self {
        Self {
            doc_type: Self::DOC_TYPE.to_string(),
            payment_id: new.payment_id,
            order_id: new.order_id,
            customer_id: new.customer_id,
            net_total: new.net_total,
            paid_amt: new.paid_amt,
            timestamp: new.timestamp,
        }
    }
}

/// Events emitted by the payment contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentEvent {
    /// A payment was written
    Made,
}

impl DomainEvent for PaymentEvent {
    fn event_name(self) -> &'static str {
        match self {
            Self::Made => "PaymentMade",
        }
    }
}

/// The payment contract.
#[derive(Debug, Clone)]
pub struct PaymentContract<W, S> {
    inner: RecordContract<Payment, W, S>,
}

impl<W, S> PaymentContract<W, S>
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
        "Payment Chaincode Invoked!"
    }

    /// Writes a payment and emits `PaymentMade`.
    #[instrument(skip(self, payment), fields(payment_id = %payment.payment_id))]
    pub async fn make_payment(&self, payment: NewPayment) -> RecordResult<Payment> {
        self.inner
            .create(Payment::from(payment), PaymentEvent::Made)
            .await
    }

    /// Every payment in the world state, paired with its key.
    pub async fn get_all_payments(&self) -> RecordResult<Vec<QueryResult<Payment>>> {
        self.inner.read_all().await
    }

    /// The payment stored under `payment_id`.
    pub async fn get_payment_by_id(&self, payment_id: &RecordKey) -> RecordResult<Payment> {
        self.inner.read_by_id(payment_id).await
    }

    /// Payments made against `order_id`.
    pub async fn get_payments_by_order_id(&self, order_id: &str) -> RecordResult<Vec<Payment>> {
        self.inner
            .read_by_attribute(Payment::ORDER_ID, order_id)
            .await
    }

    /// Every revision of the payment, newest first.
    pub async fn get_payment_history(
        &self,
        payment_id: &RecordKey,
    ) -> RecordResult<Vec<HistoryEntry>> {
        self.inner.history(payment_id).await
    }

    /// The shared contract skeleton underneath.
    pub const fn contract(&self) -> &RecordContract<Payment, W, S> {
        &self.inner
    }
}
