//! Call bundles and the target dispatch seam
//!
//! A proposal carries `(target, value, calldata)` triples. Call data is a
//! JSON-encoded message understood by the target. Targets are invoked in two
//! phases: `prepare` decodes, authorizes and validates without touching
//! state and hands back an `Effect`; effects are only applied once every
//! call of a batch has prepared successfully.

use crate::address::Address;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Deferred state change produced by a successful `prepare`
pub type Effect = Box<dyn FnOnce() + Send>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("Failed to encode call data: {0}")]
    Encode(String),

    #[error("Failed to decode call data: {0}")]
    Decode(String),

    #[error("Caller {caller} is not authorized")]
    Unauthorized { caller: Address },

    #[error("Target does not accept value transfers (value {value})")]
    NonPayable { value: u64 },

    #[error("No call target registered at {0}")]
    UnknownTarget(Address),

    #[error("Call rejected: {0}")]
    Rejected(String),
}

/// One entry of a call bundle
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Call {
    pub target: Address,
    pub value: u64,
    pub calldata: Vec<u8>,
}

impl Call {
    pub fn new(target: Address, value: u64, calldata: Vec<u8>) -> Self {
        Self {
            target,
            value,
            calldata,
        }
    }

    /// Zip the parallel target/value/calldata lists of a proposal.
    /// Callers validate equal lengths beforehand.
    pub fn zip(targets: &[Address], values: &[u64], calldatas: &[Vec<u8>]) -> Vec<Call> {
        targets
            .iter()
            .zip(values)
            .zip(calldatas)
            .map(|((target, value), calldata)| Call::new(*target, *value, calldata.clone()))
            .collect()
    }
}

/// Anything the timelock can invoke
pub trait CallTarget: Send + Sync {
    fn prepare(&self, caller: &Address, value: u64, calldata: &[u8]) -> Result<Effect, CallError>;
}

pub fn encode_call<T: Serialize>(message: &T) -> Result<Vec<u8>, CallError> {
    serde_json::to_vec(message).map_err(|e| CallError::Encode(e.to_string()))
}

pub fn decode_call<T: DeserializeOwned>(calldata: &[u8]) -> Result<T, CallError> {
    serde_json::from_slice(calldata).map_err(|e| CallError::Decode(e.to_string()))
}
