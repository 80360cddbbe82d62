//! Typed record store over a ledger world state.
//!
//! A `RecordStore<T, W>` owns the world-state handle for one record family.
//! The family's discriminator is fixed at construction from `T::DOC_TYPE`, so
//! no call site ever repeats it.

use crate::config::{MalformedValuePolicy, StoreConfig};
use crate::errors::{RecordError, RecordResult, WorldStateError};
use crate::record::{HistoryEntry, Record};
use crate::selector::{SelectorQuery, DOC_TYPE_FIELD};
use crate::types::{DocType, FieldName, RecordKey};
use crate::world_state::{KeyValue, WorldState};
use serde_json::Value;
use std::marker::PhantomData;
use tracing::{debug, instrument, warn};

/// Reads and writes records of kind `T` through the world state `W`.
#[derive(Debug, Clone)]
pub struct RecordStore<T, W> {
    world_state: W,
    doc_type: DocType,
    id_field: FieldName,
    config: StoreConfig,
    _record: PhantomData<fn() -> T>,
}

impl<T, W> RecordStore<T, W>
where
    T: Record,
    W: WorldState,
{
    /// Creates a store with the default configuration.
    pub fn new(world_state: W) -> RecordResult<Self> {
        Self::with_config(world_state, StoreConfig::default())
    }

    /// Creates a store with an explicit configuration.
    pub fn with_config(world_state: W, config: StoreConfig) -> RecordResult<Self> {
        Ok(Self {
            world_state,
            doc_type: DocType::try_new(T::DOC_TYPE)?,
            id_field: FieldName::try_new(T::ID_FIELD)?,
            config,
            _record: PhantomData,
        })
    }

    /// The discriminator of this family.
    pub const fn doc_type(&self) -> &DocType {
        &self.doc_type
    }

    /// The configuration in effect.
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The underlying world-state handle.
    pub const fn world_state(&self) -> &W {
        &self.world_state
    }

    /// Serializes `value` and writes it under `key`, replacing any current
    /// value. Returns the bytes written.
    ///
    /// A value whose JSON does not decode back into `T` is rejected with
    /// [`RecordError::Serialization`] before anything is written. Non-finite
    /// floats are the usual cause, since JSON writes them as `null`.
    #[instrument(skip(self, value), fields(doc_type = %self.doc_type))]
    pub async fn put(&self, key: &RecordKey, value: &T) -> RecordResult<Vec<u8>> {
        if value.doc_type() != self.doc_type.as_str() {
            return Err(RecordError::DocTypeMismatch {
                expected: self.doc_type.to_string(),
                found: value.doc_type().to_string(),
            });
        }

        let bytes = serde_json::to_vec(value)?;
        if let Err(error) = serde_json::from_slice::<T>(&bytes) {
            return Err(RecordError::Serialization(format!(
                "record '{key}' does not survive encoding: {error}"
            )));
        }

        self.world_state
            .put_state(key, bytes.clone())
            .await
            .map_err(|error| match error {
                WorldStateError::Conflict { key } => RecordError::Conflict { key },
                other => RecordError::StorageWrite {
                    key: key.to_string(),
                    reason: other.to_string(),
                },
            })?;

        debug!(%key, bytes = bytes.len(), "record written");
        Ok(bytes)
    }

    /// Returns every record of this family in the configured key range, in
    /// the world state's key order.
    ///
    /// Values written by other families are skipped. Values that cannot be
    /// decoded are logged and skipped, or abort the scan when the policy is
    /// [`MalformedValuePolicy::Fail`].
    #[instrument(skip(self), fields(doc_type = %self.doc_type))]
    pub async fn scan_all(&self) -> RecordResult<Vec<(String, T)>> {
        let scan = &self.config.scan;
        let entries = self
            .world_state
            .get_state_by_range(&scan.start_key, &scan.end_key)
            .await
            .map_err(|error| RecordError::StorageRead {
                reason: error.to_string(),
            })?;

        let mut records = Vec::with_capacity(entries.len());
        for KeyValue { key, value } in entries {
            match self.decode_scanned(&value) {
                Ok(Some(record)) => records.push((key, record)),
                Ok(None) => debug!(%key, "skipping record of another family"),
                Err(reason) => match scan.malformed {
                    MalformedValuePolicy::Skip => {
                        warn!(%key, %reason, "skipping malformed record");
                    }
                    MalformedValuePolicy::Fail => {
                        return Err(RecordError::StorageRead {
                            reason: format!("malformed record under key '{key}': {reason}"),
                        });
                    }
                },
            }
        }

        debug!(count = records.len(), "scan complete");
        Ok(records)
    }

    /// Returns the records of this family whose `field` equals `value`, in
    /// the executor's result order. No match is an empty vector.
    #[instrument(skip(self, field, value), fields(doc_type = %self.doc_type, field = %field))]
    pub async fn find_by_attribute(
        &self,
        field: &FieldName,
        value: impl Into<Value> + Send,
    ) -> RecordResult<Vec<T>> {
        let query = SelectorQuery::for_doc_type(self.doc_type.clone())
            .with_field(field.clone(), value)
            .to_string();

        let results = self
            .world_state
            .get_query_result(&query)
            .await
            .map_err(|error| RecordError::QueryExecution {
                query: query.clone(),
                reason: error.to_string(),
            })?;

        let mut records = results
            .iter()
            .map(|entry| {
                serde_json::from_slice::<T>(&entry.value).map_err(|error| {
                    RecordError::QueryExecution {
                        query: query.clone(),
                        reason: format!("undecodable result under key '{}': {error}", entry.key),
                    }
                })
            })
            .collect::<RecordResult<Vec<T>>>()?;

        if let Some(limit) = self.config.query_limit {
            let limit: usize = limit.into();
            if records.len() > limit {
                warn!(matched = records.len(), limit, "query results truncated");
                records.truncate(limit);
            }
        }

        debug!(count = records.len(), "query complete");
        Ok(records)
    }

    /// Returns the record stored under `id`.
    ///
    /// Fails with [`RecordError::NotFound`] when no record of this family has
    /// that id.
    #[instrument(skip(self), fields(doc_type = %self.doc_type))]
    pub async fn get_by_id(&self, id: &RecordKey) -> RecordResult<T> {
        self.find_by_attribute(&self.id_field, id.to_string())
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RecordError::NotFound {
                doc_type: self.doc_type.to_string(),
                id: id.to_string(),
            })
    }

    /// Returns every revision of this family written under `id`, newest
    /// first.
    ///
    /// Revisions written by another family under the same key are skipped.
    /// Fails with [`RecordError::HistoryUnavailable`] when no revision of this
    /// family was ever written there.
    #[instrument(skip(self), fields(doc_type = %self.doc_type))]
    pub async fn history(&self, id: &RecordKey) -> RecordResult<Vec<HistoryEntry>> {
        let modifications = self
            .world_state
            .get_history_for_key(id)
            .await
            .map_err(|error| RecordError::StorageRead {
                reason: format!("history of '{id}': {error}"),
            })?;

        let mut entries = Vec::with_capacity(modifications.len());
        for modification in modifications {
            if !self.is_own_family(&modification.value) {
                debug!(tx_id = %modification.tx_id, "skipping revision of another family");
                continue;
            }
            debug!(tx_id = %modification.tx_id, "history revision");
            let raw = String::from_utf8(modification.value).map_err(|error| {
                RecordError::StorageRead {
                    reason: format!("history of '{id}' is not UTF-8: {error}"),
                }
            })?;
            entries.push(HistoryEntry::new(raw));
        }

        if entries.is_empty() {
            return Err(RecordError::HistoryUnavailable { id: id.to_string() });
        }
        Ok(entries)
    }

    /// Whether `value` is a JSON object carrying this family's discriminator.
    fn is_own_family(&self, value: &[u8]) -> bool {
        serde_json::from_slice::<Value>(value).is_ok_and(|document| {
            document.get(DOC_TYPE_FIELD).and_then(Value::as_str) == Some(self.doc_type.as_str())
        })
    }

    /// Decodes one scanned value. `Ok(None)` means it belongs to another
    /// family; `Err` carries the reason it could not be decoded.
    fn decode_scanned(&self, value: &[u8]) -> Result<Option<T>, String> {
        let document: Value = serde_json::from_slice(value).map_err(|error| error.to_string())?;
        match document.get(DOC_TYPE_FIELD).and_then(Value::as_str) {
            Some(doc_type) if doc_type == self.doc_type.as_str() => {
                serde_json::from_value(document)
                    .map(Some)
                    .map_err(|error| error.to_string())
            }
            Some(_) => Ok(None),
            None => Err(format!("missing '{DOC_TYPE_FIELD}' attribute")),
        }
    }
}
