//! The record abstraction shared by every record kind.

use crate::errors::RecordResult;
use crate::types::RecordKey;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A flat, discriminated ledger record.
///
/// Implementors are plain structs whose serde representation is the wire
/// format. `DOC_TYPE` is the value of the `docType` attribute carried by every
/// instance and `ID_FIELD` names the attribute holding the record key.
pub trait Record:
    Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static
{
    /// Discriminator shared by every record of this kind.
    const DOC_TYPE: &'static str;

    /// JSON name of the identifier attribute, e.g. `OrderID`.
    const ID_FIELD: &'static str;

    /// The record's key. Never changes after creation.
    fn key(&self) -> &RecordKey;

    /// The discriminator carried by this instance.
    fn doc_type(&self) -> &str;
}

/// A record paired with the raw key it was found under.
///
/// Returned by unfiltered range scans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult<T> {
    /// The world-state key
    #[serde(rename = "Key")]
    pub key: String,
    /// The decoded record
    #[serde(rename = "Record")]
    pub record: T,
}

impl<T> QueryResult<T> {
    /// Creates a new query result.
    pub const fn new(key: String, record: T) -> Self {
        Self { key, record }
    }
}

/// One historical snapshot of a record, exactly as it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The serialized record
    #[serde(rename = "Record")]
    pub record: String,
}

impl HistoryEntry {
    /// Creates a history entry from a serialized snapshot.
    pub fn new(record: impl Into<String>) -> Self {
        Self {
            record: record.into(),
        }
    }

    /// Decodes the snapshot into a record.
    ///
    /// Older snapshots decode as long as the field set is unchanged.
    pub fn decode<T: DeserializeOwned>(&self) -> RecordResult<T> {
        Ok(serde_json::from_str(&self.record)?)
    }
}
