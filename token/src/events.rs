use dao_core::Address;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenEvent {
    /// `from` is zero on mint, `to` is zero on burn
    Transfer {
        from: Address,
        to: Address,
        amount: u64,
    },
    DelegateChanged {
        delegator: Address,
        from_delegate: Option<Address>,
        to_delegate: Address,
    },
    DelegateVotesChanged {
        delegate: Address,
        previous_votes: u64,
        new_votes: u64,
    },
}
