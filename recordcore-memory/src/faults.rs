//! Failure injection for the in-memory ledger.
//!
//! A [`FaultPlan`] queues one-shot failures per ledger operation. The next
//! matching call pops the fault and fails with the corresponding
//! [`WorldStateError`]; later calls behave normally again. This makes every
//! error path of the record store reachable from tests without a real
//! substrate.

use parking_lot::Mutex;
use recordcore::{WorldStateError, WorldStateResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// A ledger operation that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerOperation {
    /// Point read
    GetState,
    /// Point write
    PutState,
    /// Range scan
    GetStateByRange,
    /// Rich query
    GetQueryResult,
    /// Key history
    GetHistoryForKey,
    /// Event emission
    SetEvent,
}

impl fmt::Display for LedgerOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GetState => "GetState",
            Self::PutState => "PutState",
            Self::GetStateByRange => "GetStateByRange",
            Self::GetQueryResult => "GetQueryResult",
            Self::GetHistoryForKey => "GetHistoryForKey",
            Self::SetEvent => "SetEvent",
        };
        f.write_str(name)
    }
}

/// The kind of failure to inject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultKind {
    /// Generic backend failure
    Backend,
    /// Concurrent write to the same key
    Conflict,
    /// Ledger unreachable
    Unavailable,
}

impl FaultKind {
    /// Converts the fault into the error the operation returns.
    pub fn to_error(self, operation: LedgerOperation, target: &str) -> WorldStateError {
        match self {
            Self::Backend => {
                WorldStateError::Backend(format!("injected failure in {operation} for '{target}'"))
            }
            Self::Conflict => WorldStateError::Conflict {
                key: target.to_string(),
            },
            Self::Unavailable => {
                WorldStateError::Unavailable(format!("injected outage in {operation}"))
            }
        }
    }
}

/// Queued one-shot failures, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct FaultPlan {
    pending: Arc<Mutex<HashMap<LedgerOperation, VecDeque<FaultKind>>>>,
}

impl FaultPlan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next call of `operation` fail with `fault`.
    pub fn fail_next(&self, operation: LedgerOperation, fault: FaultKind) {
        self.fail_times(operation, fault, 1);
    }

    /// Makes the next `times` calls of `operation` fail with `fault`.
    pub fn fail_times(&self, operation: LedgerOperation, fault: FaultKind, times: usize) {
        let mut pending = self.pending.lock();
        let queue = pending.entry(operation).or_default();
        queue.extend(std::iter::repeat(fault).take(times));
    }

    /// Number of failures still queued for `operation`.
    pub fn pending(&self, operation: LedgerOperation) -> usize {
        self.pending.lock().get(&operation).map_or(0, VecDeque::len)
    }

    /// Drops every queued failure.
    pub fn clear(&self) {
        self.pending.lock().clear();
    }

    /// Pops the next fault for `operation`, if any.
    pub(crate) fn check(&self, operation: LedgerOperation, target: &str) -> WorldStateResult<()> {
        let fault = self
            .pending
            .lock()
            .get_mut(&operation)
            .and_then(VecDeque::pop_front);

        match fault {
            Some(fault) => {
                warn!(%operation, target, ?fault, "injecting ledger failure");
                Err(fault.to_error(operation, target))
            }
            None => Ok(()),
        }
    }
}
