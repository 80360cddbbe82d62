//! Domain events emitted by record contracts.
//!
//! Every successful mutation emits exactly one named event whose payload is
//! the serialized post-mutation record. Subscribers live outside this crate;
//! the contract only hands the event to an [`EventSink`].

use crate::errors::{RecordResult, WorldStateResult};
use crate::types::EventName;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt;

/// A kind of event a contract can emit, e.g. `OrderPlaced`.
///
/// Record kinds implement this on a small `Copy` enum so that call sites
/// cannot misspell an event name.
pub trait DomainEvent: Copy + fmt::Debug + Send + Sync + 'static {
    /// The wire name of the event.
    fn event_name(self) -> &'static str;
}

/// An event as handed to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractEvent {
    /// The event name
    pub name: EventName,
    /// The serialized post-mutation record
    pub payload: Vec<u8>,
}

impl ContractEvent {
    /// Creates a new contract event.
    pub const fn new(name: EventName, payload: Vec<u8>) -> Self {
        Self { name, payload }
    }

    /// Decodes the payload back into a record.
    pub fn decode<T: DeserializeOwned>(&self) -> RecordResult<T> {
        Ok(serde_json::from_slice(&self.payload)?)
    }
}

/// Outbound channel for contract events.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Publishes `payload` under `name`.
    async fn set_event(&self, name: &EventName, payload: Vec<u8>) -> WorldStateResult<()>;
}

#[async_trait]
impl<S> EventSink for std::sync::Arc<S>
where
    S: EventSink + ?Sized,
{
    async fn set_event(&self, name: &EventName, payload: Vec<u8>) -> WorldStateResult<()> {
        (**self).set_event(name, payload).await
    }
}
