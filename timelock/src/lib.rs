//! Timelock Executor
//!
//! Holds approved call bundles for a minimum delay before they may run,
//! and separates who may schedule from who may execute.
//!
//! The timelock always administers itself. Any extra admin handed out at
//! construction is meant to finish setup and then renounce, after which
//! role changes only happen through calls the timelock makes to itself.

pub mod error;
pub mod events;
pub mod operation;
pub mod roles;
pub mod timelock;

pub use error::{Result, TimelockError};
pub use events::TimelockEvent;
pub use operation::{hash_operation_batch, OperationState, ScheduledOperation};
pub use roles::Role;
pub use timelock::{TimelockCall, TimelockExecutor};

/// Default minimum delay before a scheduled operation becomes ready
pub const DEFAULT_MIN_DELAY: u64 = 3600;
