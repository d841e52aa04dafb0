use serde::{Deserialize, Serialize};

/// Capabilities on the timelock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Grants and revokes every role
    Admin,
    /// Schedules operations
    Proposer,
    /// Runs ready operations
    Executor,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Proposer, Role::Executor];
}
