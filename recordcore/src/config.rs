//! Record store configuration.
//!
//! Values that have a valid range are `nutype` types, so a configuration that
//! deserializes is a configuration that can be used. The defaults reproduce
//! the plain ledger behavior: scan the whole keyspace, skip undecodable
//! values, return every query match.

use crate::errors::{RecordError, RecordResult};
use nutype::nutype;
use serde::{Deserialize, Serialize};

/// Upper bound on the number of records a rich query may return.
///
/// Validated to be between 1 and 100 000.
#[nutype(
    validate(greater_or_equal = 1, less_or_equal = 100_000),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Into,
        Serialize,
        Deserialize
    )
)]
pub struct QueryLimit(usize);

/// What a range scan does with a value it cannot decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedValuePolicy {
    /// Log the entry and continue with the next one.
    #[default]
    Skip,
    /// Abort the scan with a read error.
    Fail,
}

/// Key range and decoding policy for `scan_all`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// First key of the scan (inclusive); empty scans from the first key.
    pub start_key: String,
    /// Last key of the scan (exclusive); empty scans through the last key.
    pub end_key: String,
    /// Handling of undecodable values.
    pub malformed: MalformedValuePolicy,
}

/// Configuration of a [`RecordStore`](crate::store::RecordStore).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Range scan settings
    pub scan: ScanConfig,
    /// Optional cap on rich-query results
    pub query_limit: Option<QueryLimit>,
}

impl StoreConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from a JSON document. Missing fields take their
    /// defaults.
    pub fn from_json(document: &str) -> RecordResult<Self> {
        serde_json::from_str(document)
            .map_err(|error| RecordError::Configuration(error.to_string()))
    }

    /// Restricts scans to `[start_key, end_key)`.
    #[must_use]
    pub fn with_scan_range(mut self, start_key: impl Into<String>, end_key: impl Into<String>) -> Self {
        self.scan.start_key = start_key.into();
        self.scan.end_key = end_key.into();
        self
    }

    /// Sets the malformed-value policy for scans.
    #[must_use]
    pub const fn with_malformed_policy(mut self, policy: MalformedValuePolicy) -> Self {
        self.scan.malformed = policy;
        self
    }

    /// Caps rich-query results.
    #[must_use]
    pub const fn with_query_limit(mut self, limit: QueryLimit) -> Self {
        self.query_limit = Some(limit);
        self
    }
}
