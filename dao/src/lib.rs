//! Token-weighted DAO
//!
//! Wires a vote-weight token, a governor, a timelock and one governed
//! resource into a single deployment. Proposals flow
//! propose -> vote -> queue -> (delay) -> execute, and the resource only
//! changes through that path.

pub mod config;
pub mod deploy;
pub mod error;
pub mod events;
pub mod facade;

pub use config::{DaoConfig, GovernorConfig, ResourceConfig, TimelockConfig, TokenConfig};
pub use deploy::{deploy, DaoAddresses};
pub use error::{DeployError, Result};
pub use events::DaoEvent;
pub use facade::Dao;

pub use dao_core::{
    decode_call, encode_call, Address, Clock, EventLog, EventSink, Hash32, ManualClock,
    NoopSink, SystemClock,
};
pub use dao_governance::{GovernanceError, GovernorSettings, ProposalState, VoteType};
pub use dao_resource::{ResourceCall, ResourceError};
pub use dao_timelock::{OperationState, Role, TimelockCall, TimelockError};
pub use dao_token::TokenError;
