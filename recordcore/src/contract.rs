//! Generic record contract.
//!
//! A `RecordContract` is the orchestration skeleton every record kind shares:
//! compose a record, persist it through the [`RecordStore`], and announce the
//! mutation through the [`EventSink`]. Record kinds wrap it and add their own
//! field-level operations.
//!
//! Each record instance moves `Absent -> Active` on creation and
//! `Active -> Active` on every update. There is no transition out of `Active`.

use crate::errors::{RecordError, RecordResult};
use crate::events::{DomainEvent, EventSink};
use crate::record::{HistoryEntry, QueryResult, Record};
use crate::store::RecordStore;
use crate::types::{EventName, FieldName, RecordKey};
use crate::world_state::WorldState;
use serde_json::Value;
use tracing::{info, instrument};

/// The shared contract skeleton for record kind `T`.
#[derive(Debug, Clone)]
pub struct RecordContract<T, W, S> {
    store: RecordStore<T, W>,
    events: S,
}

impl<T, W, S> RecordContract<T, W, S>
where
    T: Record,
    W: WorldState,
    S: EventSink,
{
    /// Creates a contract over `store`, emitting through `events`.
    pub const fn new(store: RecordStore<T, W>, events: S) -> Self {
        Self { store, events }
    }

    /// The record store this contract writes through.
    pub const fn store(&self) -> &RecordStore<T, W> {
        &self.store
    }

    /// The event sink this contract emits to.
    pub const fn events(&self) -> &S {
        &self.events
    }

    /// Writes a new record and emits `event`.
    ///
    /// An existing record with the same key is overwritten.
    #[instrument(skip(self, record), fields(key = %record.key()))]
    pub async fn create<E: DomainEvent>(&self, record: T, event: E) -> RecordResult<T> {
        let payload = self.store.put(record.key(), &record).await?;
        self.emit(event, payload).await?;
        Ok(record)
    }

    /// Every record of this kind paired with its key.
    pub async fn read_all(&self) -> RecordResult<Vec<QueryResult<T>>> {
        Ok(self
            .store
            .scan_all()
            .await?
            .into_iter()
            .map(|(key, record)| QueryResult::new(key, record))
            .collect())
    }

    /// The record stored under `id`.
    pub async fn read_by_id(&self, id: &RecordKey) -> RecordResult<T> {
        self.store.get_by_id(id).await
    }

    /// The records whose `field` equals `value`.
    pub async fn read_by_attribute(
        &self,
        field: &str,
        value: impl Into<Value> + Send,
    ) -> RecordResult<Vec<T>> {
        let field = FieldName::try_new(field)?;
        self.store.find_by_attribute(&field, value).await
    }

    /// Reads the record under `id`, applies `mutate`, writes it back and emits
    /// `event`. Returns the post-update record.
    ///
    /// Lookup errors propagate unchanged. `mutate` must leave the identifier
    /// alone.
    #[instrument(skip(self, id, mutate), fields(id = %id))]
    pub async fn update<E, F>(&self, id: &RecordKey, event: E, mutate: F) -> RecordResult<T>
    where
        E: DomainEvent,
        F: FnOnce(&mut T) + Send,
    {
        let mut record = self.store.get_by_id(id).await?;
        mutate(&mut record);

        if record.key() != id {
            return Err(RecordError::IdentityChanged {
                expected: id.to_string(),
                found: record.key().to_string(),
            });
        }

        let payload = self.store.put(id, &record).await?;
        self.emit(event, payload).await?;
        Ok(record)
    }

    /// Every revision of `id`, newest first.
    pub async fn history(&self, id: &RecordKey) -> RecordResult<Vec<HistoryEntry>> {
        self.store.history(id).await
    }

    async fn emit<E: DomainEvent>(&self, event: E, payload: Vec<u8>) -> RecordResult<()> {
        let name = EventName::try_new(event.event_name())?;
        self.events
            .set_event(&name, payload)
            .await
            .map_err(|error| RecordError::EventEmission {
                event: name.to_string(),
                reason: error.to_string(),
            })?;
        info!(event = %name, doc_type = %self.store.doc_type(), "event emitted");
        Ok(())
    }
}
