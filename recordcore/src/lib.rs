//! `RecordCore` - typed ledger records over a key-value world state
//!
//! This library implements the access pattern shared by record-keeping smart
//! contracts: typed writes into an opaque world state, attribute lookups
//! through a JSON selector executor, full per-key revision history, and one
//! domain event per successful mutation.
//!
//! The ledger itself stays outside: it is reached only through the
//! [`WorldState`] and [`EventSink`] ports, which every store and contract
//! receives explicitly.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod contract;
pub mod errors;
pub mod events;
pub mod logging;
pub mod record;
pub mod selector;
pub mod store;
pub mod types;
pub mod world_state;

pub use config::{MalformedValuePolicy, QueryLimit, ScanConfig, StoreConfig};
pub use contract::RecordContract;
pub use errors::{RecordError, RecordResult, WorldStateError, WorldStateResult};
pub use events::{ContractEvent, DomainEvent, EventSink};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use record::{HistoryEntry, QueryResult, Record};
pub use selector::{SelectorQuery, DOC_TYPE_FIELD};
pub use store::RecordStore;
pub use types::{DocType, EventName, FieldName, RecordKey};
pub use world_state::{KeyModification, KeyValue, WorldState};
