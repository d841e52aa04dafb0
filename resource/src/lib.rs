//! Governed Resource
//!
//! A single named value (the current office holder) that only its owner may
//! change. After setup the owner is the timelock, so the value changes only
//! when a proposal has passed and waited out its delay.

use dao_core::{decode_call, Address, CallError, CallTarget, Effect, EventSink};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("Unauthorized: {0} is not the owner")]
    Unauthorized(Address),

    #[error("Invalid owner: {0}")]
    InvalidOwner(Address),

    #[error("Ownership already transferred to {0}")]
    OwnershipLocked(Address),
}

pub type Result<T> = std::result::Result<T, ResourceError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceEvent {
    ValueChanged {
        previous: String,
        value: String,
    },
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
}

/// Call data accepted when the resource is invoked through the timelock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceCall {
    SetValue { value: String },
}

pub struct GovernedResource {
    owner: Address,
    handed_off: bool,
    value: String,
    events: Arc<dyn EventSink<ResourceEvent>>,
}

impl GovernedResource {
    pub fn new(owner: Address, events: Arc<dyn EventSink<ResourceEvent>>) -> Self {
        Self {
            owner,
            handed_off: false,
            value: String::new(),
            events,
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn get_value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, caller: &Address, value: impl Into<String>) -> Result<()> {
        self.check_owner(caller)?;
        self.store(value.into());
        Ok(())
    }

    /// One-shot hand-off of the owner identity, done once during setup
    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: &Address) -> Result<()> {
        if self.handed_off {
            return Err(ResourceError::OwnershipLocked(self.owner));
        }
        self.check_owner(caller)?;
        if new_owner.is_zero() {
            return Err(ResourceError::InvalidOwner(*new_owner));
        }

        let previous_owner = std::mem::replace(&mut self.owner, *new_owner);
        self.handed_off = true;
        self.events.emit(ResourceEvent::OwnershipTransferred {
            previous_owner,
            new_owner: *new_owner,
        });
        tracing::info!(previous_owner = %previous_owner, new_owner = %new_owner, "resource_ownership_transferred");
        Ok(())
    }

    fn check_owner(&self, caller: &Address) -> Result<()> {
        if *caller != self.owner {
            return Err(ResourceError::Unauthorized(*caller));
        }
        Ok(())
    }

    fn store(&mut self, value: String) {
        let previous = std::mem::replace(&mut self.value, value.clone());
        tracing::info!(previous = %previous, value = %value, "governed_value_changed");
        self.events.emit(ResourceEvent::ValueChanged { previous, value });
    }
}

/// Shared handle: readers take the read lock, the timelock calls in through
/// `CallTarget`.
#[derive(Clone)]
pub struct SharedResource(Arc<RwLock<GovernedResource>>);

impl SharedResource {
    pub fn new(resource: GovernedResource) -> Self {
        Self(Arc::new(RwLock::new(resource)))
    }

    pub fn get_value(&self) -> String {
        self.0.read().get_value().to_string()
    }

    pub fn owner(&self) -> Address {
        self.0.read().owner()
    }

    pub fn set_value(&self, caller: &Address, value: impl Into<String>) -> Result<()> {
        self.0.write().set_value(caller, value)
    }

    pub fn transfer_ownership(&self, caller: &Address, new_owner: &Address) -> Result<()> {
        self.0.write().transfer_ownership(caller, new_owner)
    }
}

impl CallTarget for SharedResource {
    fn prepare(&self, caller: &Address, value: u64, calldata: &[u8]) -> std::result::Result<Effect, CallError> {
        if value != 0 {
            return Err(CallError::NonPayable { value });
        }
        let call: ResourceCall = decode_call(calldata)?;
        let ResourceCall::SetValue { value: new_value } = call;
        self.0
            .read()
            .check_owner(caller)
            .map_err(|_| CallError::Unauthorized { caller: *caller })?;

        let inner = self.0.clone();
        Ok(Box::new(move || inner.write().store(new_value)))
    }
}
