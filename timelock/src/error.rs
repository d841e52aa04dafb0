//! Timelock error types

use crate::roles::Role;
use dao_core::{Address, CallError, Hash32};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimelockError {
    #[error("Unauthorized: {caller} is missing role {role:?}")]
    Unauthorized { caller: Address, role: Role },

    #[error("Operation already scheduled: {0}")]
    AlreadyScheduled(Hash32),

    #[error("Operation already executed: {0}")]
    AlreadyExecuted(Hash32),

    #[error("Unknown operation: {0}")]
    UnknownOperation(Hash32),

    #[error("Operation {id} not ready: ready at {ready_at}, now {now}")]
    NotReady { id: Hash32, ready_at: u64, now: u64 },

    #[error("Insufficient delay: {delay} < minimum {min_delay}")]
    InsufficientDelay { delay: u64, min_delay: u64 },

    #[error("Predecessor operation not executed: {0}")]
    MissingDependency(Hash32),

    #[error("Empty call batch")]
    EmptyBatch,

    #[error("The timelock cannot give up its own admin role")]
    ProtectedRole,

    #[error("Call {index} failed: {source}")]
    CallFailed { index: usize, source: CallError },
}

pub type Result<T> = std::result::Result<T, TimelockError>;
