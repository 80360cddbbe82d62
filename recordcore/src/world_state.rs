//! World-state port for the `RecordCore` library.
//!
//! This module defines the `WorldState` trait, the boundary between the
//! record store and whatever ledger substrate actually holds the key-value
//! snapshot. Replication, ordering and commit validation all live behind this
//! trait; the record store only sees point writes, range scans, selector
//! queries and per-key history.

use crate::errors::WorldStateResult;
use crate::types::RecordKey;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A raw key/value pair returned by range scans and selector queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    /// The world-state key. Not necessarily a valid [`RecordKey`]: other
    /// writers may share the keyspace.
    pub key: String,
    /// The stored bytes, normally UTF-8 JSON
    pub value: Vec<u8>,
}

impl KeyValue {
    /// Creates a new key/value pair.
    pub fn new(key: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// One historical revision of a key, as reported by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyModification {
    /// Identifier of the transaction that wrote this revision
    pub tx_id: String,
    /// When the revision was committed
    pub timestamp: DateTime<Utc>,
    /// The value written by that transaction
    pub value: Vec<u8>,
    /// Whether the transaction deleted the key
    pub is_delete: bool,
}

/// The ledger's current key-value snapshot plus per-key history.
///
/// Implementations must return range results in the world state's native key
/// order and history newest first. Range bounds follow the ledger convention:
/// an empty `start_key` means "from the first key", an empty `end_key` means
/// "through the last key", and `end_key` is exclusive otherwise.
#[async_trait]
pub trait WorldState: Send + Sync {
    /// Reads the current value of a key, `None` if it was never written.
    async fn get_state(&self, key: &RecordKey) -> WorldStateResult<Option<Vec<u8>>>;

    /// Writes `value` under `key`, replacing any current value.
    async fn put_state(&self, key: &RecordKey, value: Vec<u8>) -> WorldStateResult<()>;

    /// Returns every key/value pair in `[start_key, end_key)`.
    async fn get_state_by_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> WorldStateResult<Vec<KeyValue>>;

    /// Executes a JSON rich query of the form `{"selector": {...}}`.
    async fn get_query_result(&self, query: &str) -> WorldStateResult<Vec<KeyValue>>;

    /// Returns every revision ever written to `key`, newest first. A key that
    /// was never written has an empty history.
    async fn get_history_for_key(&self, key: &RecordKey) -> WorldStateResult<Vec<KeyModification>>;
}

#[async_trait]
impl<W> WorldState for std::sync::Arc<W>
where
    W: WorldState + ?Sized,
{
    async fn get_state(&self, key: &RecordKey) -> WorldStateResult<Option<Vec<u8>>> {
        (**self).get_state(key).await
    }

    async fn put_state(&self, key: &RecordKey, value: Vec<u8>) -> WorldStateResult<()> {
        (**self).put_state(key, value).await
    }

    async fn get_state_by_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> WorldStateResult<Vec<KeyValue>> {
        (**self).get_state_by_range(start_key, end_key).await
    }

    async fn get_query_result(&self, query: &str) -> WorldStateResult<Vec<KeyValue>> {
        (**self).get_query_result(query).await
    }

    async fn get_history_for_key(&self, key: &RecordKey) -> WorldStateResult<Vec<KeyModification>> {
        (**self).get_history_for_key(key).await
    }
}
