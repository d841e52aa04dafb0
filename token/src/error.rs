//! Token error types

use dao_core::Address;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid delegate: {0}")]
    InvalidDelegate(Address),

    #[error("Invalid receiver: {0}")]
    InvalidReceiver(Address),

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: u64, available: u64 },

    #[error("Lookup of time {requested} is not finalized (current time {current})")]
    FutureLookup { requested: u64, current: u64 },

    #[error("Unauthorized: {0}")]
    Unauthorized(Address),

    #[error("Supply overflow: {supply} + {amount}")]
    Overflow { supply: u64, amount: u64 },
}

pub type Result<T> = std::result::Result<T, TokenError>;
