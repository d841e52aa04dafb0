//! Governance error types

use crate::proposal::ProposalState;
use dao_core::{Address, Hash32};
use dao_timelock::TimelockError;
use dao_token::TokenError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("Insufficient proposer power: {proposer} has {power}, threshold {threshold}")]
    InsufficientProposerPower {
        proposer: Address,
        power: u64,
        threshold: u64,
    },

    #[error("Duplicate proposal: {0}")]
    DuplicateProposal(Hash32),

    #[error("Invalid proposal length: {targets} targets, {values} values, {calldatas} calldatas")]
    InvalidProposalLength {
        targets: usize,
        values: usize,
        calldatas: usize,
    },

    #[error("Empty proposal")]
    EmptyProposal,

    #[error("Proposal not found: {0}")]
    ProposalNotFound(Hash32),

    #[error("Voting closed for {id}: proposal is {state:?}")]
    VotingClosed { id: Hash32, state: ProposalState },

    #[error("Already voted: {voter} on {id}")]
    AlreadyVoted { id: Hash32, voter: Address },

    #[error("Unexpected state for {id}: {current:?}, expected {expected:?}")]
    UnexpectedState {
        id: Hash32,
        current: ProposalState,
        expected: ProposalState,
    },

    #[error("Timelock not ready for {id}: ready at {ready_at}, now {now}")]
    TimelockNotReady { id: Hash32, ready_at: u64, now: u64 },

    #[error("Proposal already executed: {0}")]
    AlreadyExecuted(Hash32),

    #[error("Proposal {id} already finalized as {state:?}")]
    AlreadyFinalized { id: Hash32, state: ProposalState },

    #[error("Unauthorized: {0}")]
    Unauthorized(Address),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Tally overflow on {0}")]
    Overflow(Hash32),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Timelock(#[from] TimelockError),
}

pub type Result<T> = std::result::Result<T, GovernanceError>;
