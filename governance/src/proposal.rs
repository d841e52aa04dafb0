//! Proposal types and identity

use crate::voting::ProposalVotes;
use dao_core::{Address, Call, Hash32};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProposalState {
    Pending,
    Active,
    Canceled,
    Defeated,
    Succeeded,
    Queued,
    Executed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Proposal {
    pub id: Hash32,
    pub proposer: Address,
    pub targets: Vec<Address>,
    pub values: Vec<u64>,
    pub calldatas: Vec<Vec<u8>>,
    pub description: String,
    pub description_hash: Hash32,
    pub created_at: u64,
    pub vote_start: u64,
    pub vote_end: u64,
    pub votes: ProposalVotes,
    /// Timelock operation and its ready time, set once queued
    pub operation_id: Option<Hash32>,
    pub eta: Option<u64>,
    pub executed: bool,
    pub canceled: bool,
}

impl Proposal {
    /// Timepoint whose closing balances weigh votes and size the quorum:
    /// the last tick before voting opens.
    pub fn snapshot(&self) -> u64 {
        self.vote_start.saturating_sub(1)
    }

    pub fn calls(&self) -> Vec<Call> {
        Call::zip(&self.targets, &self.values, &self.calldatas)
    }
}

/// Deterministic proposal id over the call bundle and description hash
pub fn hash_proposal(
    targets: &[Address],
    values: &[u64],
    calldatas: &[Vec<u8>],
    description_hash: &Hash32,
) -> Hash32 {
    let mut hasher = Sha256::new();
    hasher.update((targets.len() as u64).to_be_bytes());
    for target in targets {
        hasher.update(target.as_bytes());
    }
    hasher.update((values.len() as u64).to_be_bytes());
    for value in values {
        hasher.update(value.to_be_bytes());
    }
    hasher.update((calldatas.len() as u64).to_be_bytes());
    for calldata in calldatas {
        hasher.update((calldata.len() as u64).to_be_bytes());
        hasher.update(calldata);
    }
    hasher.update(description_hash.as_bytes());
    Hash32::new(hasher.finalize().into())
}
