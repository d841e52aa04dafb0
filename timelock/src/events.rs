use crate::roles::Role;
use dao_core::{Address, Hash32};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelockEvent {
    OperationScheduled {
        id: Hash32,
        calls: usize,
        predecessor: Option<Hash32>,
        ready_at: u64,
    },
    OperationExecuted {
        id: Hash32,
    },
    RoleGranted {
        role: Role,
        account: Address,
        sender: Address,
    },
    RoleRevoked {
        role: Role,
        account: Address,
        sender: Address,
    },
    MinDelayChanged {
        old_delay: u64,
        new_delay: u64,
    },
}
