use crate::proposal::ProposalState;
use crate::voting::VoteType;
use dao_core::{Address, Hash32};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernorEvent {
    ProposalCreated {
        id: Hash32,
        proposer: Address,
        targets: Vec<Address>,
        values: Vec<u64>,
        description: String,
        vote_start: u64,
        vote_end: u64,
    },
    VoteCast {
        voter: Address,
        id: Hash32,
        support: VoteType,
        weight: u64,
        reason: String,
    },
    /// Emitted for explicit transitions (queue, execute, cancel). Time-driven
    /// transitions are derived on read and have no event.
    ProposalStateChanged {
        id: Hash32,
        state: ProposalState,
    },
}
