//! Scheduled operations

use dao_core::{Address, Call, Hash32};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A call bundle waiting in, or already released from, the timelock.
/// Executed operations are kept as an audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledOperation {
    pub id: Hash32,
    pub calls: Vec<Call>,
    pub predecessor: Option<Hash32>,
    pub salt: Hash32,
    pub scheduled_by: Address,
    pub ready_at: u64,
    pub executed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationState {
    Unset,
    Waiting,
    Ready,
    Done,
}

/// Deterministic operation id over the calls, predecessor and salt
pub fn hash_operation_batch(calls: &[Call], predecessor: Option<&Hash32>, salt: &Hash32) -> Hash32 {
    let mut hasher = Sha256::new();
    hasher.update((calls.len() as u64).to_be_bytes());
    for call in calls {
        hasher.update(call.target.as_bytes());
        hasher.update(call.value.to_be_bytes());
        hasher.update((call.calldata.len() as u64).to_be_bytes());
        hasher.update(&call.calldata);
    }
    hasher.update(predecessor.unwrap_or(&Hash32::ZERO).as_bytes());
    hasher.update(salt.as_bytes());
    Hash32::new(hasher.finalize().into())
}
