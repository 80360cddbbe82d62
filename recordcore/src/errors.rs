//! Error types for `RecordCore`.
//!
//! Two layers, mirroring the ports they come from:
//!
//! - **WorldStateError**: failures reported by the ledger world state or the
//!   event channel. Adapters produce these.
//! - **RecordError**: failures of record store and contract operations. Every
//!   variant names the kind of failure and carries a human-readable reason.
//!
//! No operation retries or rolls back on its own. A write conflict reported by
//! the substrate is surfaced as [`RecordError::Conflict`] and left to the
//! caller.

use crate::types::{DocTypeError, EventNameError, FieldNameError, RecordKeyError};
use thiserror::Error;

/// Errors reported by a [`WorldState`](crate::world_state::WorldState) or
/// [`EventSink`](crate::events::EventSink) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldStateError {
    /// The backing ledger failed to serve the request.
    #[error("Ledger backend error: {0}")]
    Backend(String),

    /// A concurrent transaction wrote the same key.
    #[error("Write conflict on key '{key}'")]
    Conflict {
        /// The contended key
        key: String,
    },

    /// The ledger is temporarily unreachable.
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),

    /// The rich-query executor rejected the selector.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

/// Errors returned by record store and contract operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Writing a record to the world state failed.
    #[error("Failed to write record '{key}': {reason}")]
    StorageWrite {
        /// The key being written
        key: String,
        /// Why the write failed
        reason: String,
    },

    /// Reading from the world state (range scan or history) failed.
    #[error("Failed to read from world state: {reason}")]
    StorageRead {
        /// Why the read failed
        reason: String,
    },

    /// The selector query failed or returned undecodable data.
    #[error("Query {query} failed: {reason}")]
    QueryExecution {
        /// The selector sent to the executor
        query: String,
        /// Why the query failed
        reason: String,
    },

    /// No record of this kind exists with the given id.
    #[error("{doc_type} '{id}' does not exist")]
    NotFound {
        /// The record kind that was queried
        doc_type: String,
        /// The id that was looked up
        id: String,
    },

    /// The ledger holds no history for the key.
    #[error("No history for '{id}'")]
    HistoryUnavailable {
        /// The key whose history was requested
        id: String,
    },

    /// A concurrent writer touched the same key; the write was rejected.
    #[error("Write conflict on key '{key}'")]
    Conflict {
        /// The contended key
        key: String,
    },

    /// A record could not be encoded.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// A record carried a discriminator of another family.
    #[error("Discriminator mismatch: expected '{expected}', found '{found}'")]
    DocTypeMismatch {
        /// The discriminator of the store
        expected: String,
        /// The discriminator found on the record
        found: String,
    },

    /// An update changed the record identifier.
    #[error("Record identity changed from '{expected}' to '{found}'")]
    IdentityChanged {
        /// The id the update was issued for
        expected: String,
        /// The id the record carried after the update
        found: String,
    },

    /// The mutation was written but its event could not be emitted.
    #[error("Failed to emit event {event}: {reason}")]
    EventEmission {
        /// Name of the event
        event: String,
        /// Why emission failed
        reason: String,
    },

    /// An identifier or name did not pass validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be loaded or applied.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl RecordError {
    /// Returns `true` when the failure was a write conflict that a caller may
    /// choose to resubmit.
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Returns `true` for [`RecordError::NotFound`].
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<RecordKeyError> for RecordError {
    fn from(error: RecordKeyError) -> Self {
        Self::InvalidInput(format!("record key: {error}"))
    }
}

impl From<DocTypeError> for RecordError {
    fn from(error: DocTypeError) -> Self {
        Self::InvalidInput(format!("doc type: {error}"))
    }
}

impl From<FieldNameError> for RecordError {
    fn from(error: FieldNameError) -> Self {
        Self::InvalidInput(format!("field name: {error}"))
    }
}

impl From<EventNameError> for RecordError {
    fn from(error: EventNameError) -> Self {
        Self::InvalidInput(format!("event name: {error}"))
    }
}

/// Result type for world-state port operations.
pub type WorldStateResult<T> = Result<T, WorldStateError>;

/// Result type for record operations.
pub type RecordResult<T> = Result<T, RecordError>;
