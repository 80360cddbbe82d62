//! In-memory adapter for the `RecordCore` library
//!
//! This crate provides in-memory implementations of the `WorldState` and
//! `EventSink` ports, useful for testing and development where no ledger is
//! available. The world state keeps every revision of every key, so history
//! queries behave like the real substrate: newest first, one entry per write.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod faults;
mod query;

pub use faults::{FaultKind, FaultPlan, LedgerOperation};
pub use query::{Selector, SelectorError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use recordcore::{
    ContractEvent, EventName, EventSink, KeyModification, KeyValue, RecordKey, WorldState,
    WorldStateError, WorldStateResult,
};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Revision {
    tx_id: String,
    timestamp: DateTime<Utc>,
    value: Vec<u8>,
}

/// Thread-safe in-memory world state for testing
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorldState {
    // Maps keys to every revision written, oldest first
    keys: Arc<RwLock<BTreeMap<String, Vec<Revision>>>>,
    faults: FaultPlan,
}

impl InMemoryWorldState {
    /// Create a new empty world state
    pub fn new() -> Self {
        Self::default()
    }

    /// The failure plan consulted by every operation.
    pub const fn faults(&self) -> &FaultPlan {
        &self.faults
    }

    /// Number of keys holding a current value.
    pub fn key_count(&self) -> usize {
        self.keys.read().len()
    }

    /// Number of revisions written under `key`.
    pub fn revision_count(&self, key: &str) -> usize {
        self.keys.read().get(key).map_or(0, Vec::len)
    }
}

#[async_trait]
impl WorldState for InMemoryWorldState {
    async fn get_state(&self, key: &RecordKey) -> WorldStateResult<Option<Vec<u8>>> {
        self.faults.check(LedgerOperation::GetState, key.as_str())?;

        let keys = self.keys.read();
        Ok(keys
            .get(key.as_str())
            .and_then(|revisions| revisions.last())
            .map(|revision| revision.value.clone()))
    }

    async fn put_state(&self, key: &RecordKey, value: Vec<u8>) -> WorldStateResult<()> {
        self.faults.check(LedgerOperation::PutState, key.as_str())?;

        let revision = Revision {
            tx_id: Uuid::now_v7().to_string(),
            timestamp: Utc::now(),
            value,
        };
        debug!(%key, tx_id = %revision.tx_id, "put state");

        self.keys
            .write()
            .entry(key.to_string())
            .or_default()
            .push(revision);
        Ok(())
    }

    async fn get_state_by_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> WorldStateResult<Vec<KeyValue>> {
        self.faults
            .check(LedgerOperation::GetStateByRange, start_key)?;

        if !start_key.is_empty() && !end_key.is_empty() && start_key > end_key {
            return Ok(Vec::new());
        }

        let lower = if start_key.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start_key.to_string())
        };
        let upper = if end_key.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end_key.to_string())
        };

        let keys = self.keys.read();
        Ok(keys
            .range((lower, upper))
            .filter_map(|(key, revisions)| {
                revisions
                    .last()
                    .map(|revision| KeyValue::new(key.clone(), revision.value.clone()))
            })
            .collect())
    }

    async fn get_query_result(&self, query: &str) -> WorldStateResult<Vec<KeyValue>> {
        self.faults.check(LedgerOperation::GetQueryResult, query)?;

        let selector =
            Selector::parse(query).map_err(|error| WorldStateError::InvalidQuery(error.to_string()))?;

        let keys = self.keys.read();
        let results: Vec<KeyValue> = keys
            .iter()
            .filter_map(|(key, revisions)| {
                let revision = revisions.last()?;
                let document: serde_json::Value = serde_json::from_slice(&revision.value).ok()?;
                selector
                    .matches(&document)
                    .then(|| KeyValue::new(key.clone(), revision.value.clone()))
            })
            .collect();

        debug!(query, matched = results.len(), "rich query");
        Ok(results)
    }

    async fn get_history_for_key(&self, key: &RecordKey) -> WorldStateResult<Vec<KeyModification>> {
        self.faults
            .check(LedgerOperation::GetHistoryForKey, key.as_str())?;

        let keys = self.keys.read();
        Ok(keys
            .get(key.as_str())
            .map(|revisions| {
                revisions
                    .iter()
                    .rev()
                    .map(|revision| KeyModification {
                        tx_id: revision.tx_id.clone(),
                        timestamp: revision.timestamp,
                        value: revision.value.clone(),
                        is_delete: false,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Event sink that records every emitted event in order
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventSink {
    events: Arc<Mutex<Vec<ContractEvent>>>,
    faults: FaultPlan,
}

impl InMemoryEventSink {
    /// Create a new empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// The failure plan consulted on every emission.
    pub const fn faults(&self) -> &FaultPlan {
        &self.faults
    }

    /// Every event emitted so far, oldest first.
    pub fn events(&self) -> Vec<ContractEvent> {
        self.events.lock().clone()
    }

    /// Events emitted under `name`, oldest first.
    pub fn events_named(&self, name: &str) -> Vec<ContractEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.name.as_str() == name)
            .cloned()
            .collect()
    }

    /// The most recent event.
    pub fn last(&self) -> Option<ContractEvent> {
        self.events.lock().last().cloned()
    }

    /// Number of events emitted.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether nothing was emitted yet.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Forgets every recorded event.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

#[async_trait]
impl EventSink for InMemoryEventSink {
    async fn set_event(&self, name: &EventName, payload: Vec<u8>) -> WorldStateResult<()> {
        self.faults.check(LedgerOperation::SetEvent, name.as_str())?;

        debug!(event = %name, bytes = payload.len(), "event recorded");
        self.events
            .lock()
            .push(ContractEvent::new(name.clone(), payload));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> RecordKey {
        RecordKey::try_new(raw).unwrap()
    }

    #[tokio::test]
    async fn test_new_world_state_is_empty() {
        let state = InMemoryWorldState::new();
        assert_eq!(state.key_count(), 0);
        assert_eq!(state.get_state(&key("a")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clone_shares_storage() {
        let state1 = InMemoryWorldState::new();
        let state2 = state1.clone();

        assert!(Arc::ptr_eq(&state1.keys, &state2.keys));
        state1.put_state(&key("a"), b"1".to_vec()).await.unwrap();
        assert_eq!(state2.get_state(&key("a")).await.unwrap(), Some(b"1".to_vec()));
    }

    #[tokio::test]
    async fn test_put_overwrites_and_keeps_revisions() {
        let state = InMemoryWorldState::new();
        state.put_state(&key("a"), b"1".to_vec()).await.unwrap();
        state.put_state(&key("a"), b"2".to_vec()).await.unwrap();

        assert_eq!(state.get_state(&key("a")).await.unwrap(), Some(b"2".to_vec()));
        assert_eq!(state.key_count(), 1);
        assert_eq!(state.revision_count("a"), 2);
    }

    #[tokio::test]
    async fn test_range_is_key_ordered_and_end_exclusive() {
        let state = InMemoryWorldState::new();
        for raw in ["c", "a", "b", "d"] {
            state.put_state(&key(raw), raw.as_bytes().to_vec()).await.unwrap();
        }

        let all: Vec<String> = state
            .get_state_by_range("", "")
            .await
            .unwrap()
            .into_iter()
            .map(|kv| kv.key)
            .collect();
        assert_eq!(all, vec!["a", "b", "c", "d"]);

        let slice: Vec<String> = state
            .get_state_by_range("b", "d")
            .await
            .unwrap()
            .into_iter()
            .map(|kv| kv.key)
            .collect();
        assert_eq!(slice, vec!["b", "c"]);

        assert!(state.get_state_by_range("d", "a").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let state = InMemoryWorldState::new();
        state.put_state(&key("a"), b"1".to_vec()).await.unwrap();
        state.put_state(&key("a"), b"2".to_vec()).await.unwrap();

        let history = state.get_history_for_key(&key("a")).await.unwrap();
        let values: Vec<Vec<u8>> = history.iter().map(|m| m.value.clone()).collect();
        assert_eq!(values, vec![b"2".to_vec(), b"1".to_vec()]);
        assert!(history[0].timestamp >= history[1].timestamp);
        assert_ne!(history[0].tx_id, history[1].tx_id);

        assert!(state.get_history_for_key(&key("b")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_skips_non_json_values() {
        let state = InMemoryWorldState::new();
        state.put_state(&key("a"), br#"{"docType":"X","n":1}"#.to_vec()).await.unwrap();
        state.put_state(&key("b"), b"garbage".to_vec()).await.unwrap();

        let results = state
            .get_query_result(r#"{"selector":{"docType":"X"}}"#)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].key, "a");
    }

    #[tokio::test]
    async fn test_invalid_query_is_rejected() {
        let state = InMemoryWorldState::new();
        let error = state.get_query_result("not json").await.unwrap_err();
        assert!(matches!(error, WorldStateError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn test_injected_fault_fails_once() {
        let state = InMemoryWorldState::new();
        state
            .faults()
            .fail_next(LedgerOperation::PutState, FaultKind::Unavailable);

        assert!(state.put_state(&key("a"), b"1".to_vec()).await.is_err());
        assert!(state.put_state(&key("a"), b"1".to_vec()).await.is_ok());
        assert_eq!(state.revision_count("a"), 1);
    }

    #[tokio::test]
    async fn test_sink_records_in_order() {
        let sink = InMemoryEventSink::new();
        let placed = EventName::try_new("OrderPlaced").unwrap();
        let updated = EventName::try_new("OrderUpdated").unwrap();

        sink.set_event(&placed, b"1".to_vec()).await.unwrap();
        sink.set_event(&updated, b"2".to_vec()).await.unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.events_named("OrderPlaced").len(), 1);
        assert_eq!(sink.last().unwrap().name, updated);

        sink.clear();
        assert!(sink.is_empty());
    }
}
