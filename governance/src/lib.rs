//! DAO Governance Module
//!
//! Proposal lifecycle for token-weighted governance: proposals are created
//! against a call bundle, voted on with checkpointed token power, tallied
//! against a quorum, and handed to the timelock for delayed execution.
//!
//! States are derived from the clock on every read; nothing runs in the
//! background.

pub mod engine;
pub mod error;
pub mod events;
pub mod proposal;
pub mod quorum;
pub mod storage;
pub mod voting;

pub use engine::{GovernanceEngine, GovernorSettings};
pub use error::{GovernanceError, Result};
pub use events::GovernorEvent;
pub use proposal::{hash_proposal, Proposal, ProposalState};
pub use quorum::{QuorumFraction, QuorumPolicy};
pub use storage::{InMemoryProposalStore, ProposalStore};
pub use voting::{ProposalVotes, Receipt, SimpleCounting, VoteCounting, VoteType};

/// Governance configuration constants
pub mod config {
    /// Ticks between proposal creation and the opening of the vote
    pub const VOTING_DELAY: u64 = 1;

    /// Ticks the vote stays open
    pub const VOTING_PERIOD: u64 = 5;

    /// Required participation, percent of total supply at the snapshot
    pub const QUORUM_PERCENTAGE: u64 = 4;

    /// Votes needed to create a proposal
    pub const PROPOSAL_THRESHOLD: u64 = 0;

    /// Denominator of the quorum fraction
    pub const QUORUM_DENOMINATOR: u64 = 100;
}
