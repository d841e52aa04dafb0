//! Vote-Weight Token
//!
//! Balance ledger that also keeps, per delegate, an append-only history of
//! voting power so governance can ask "how many votes did X have at T".
//!
//! Voting power only counts once an account has chosen a delegate
//! (possibly itself). Until then its balance is inert for governance.

pub mod checkpoints;
pub mod error;
pub mod events;
pub mod token;

pub use checkpoints::{Checkpoint, Checkpoints};
pub use error::{Result, TokenError};
pub use events::TokenEvent;
pub use token::{VoteWeightToken, Votes};

/// Token unit used by the tutorial deployment (whole tokens, no decimals)
pub const INITIAL_SUPPLY: u64 = 100_000;
