//! Balance ledger with delegated voting checkpoints

use crate::checkpoints::{Checkpoint, Checkpoints};
use crate::error::{Result, TokenError};
use crate::events::TokenEvent;
use dao_core::{Address, Clock, EventSink};
use std::collections::HashMap;
use std::sync::Arc;

/// Read access to historical voting power, as consumed by governance
pub trait Votes {
    /// Current time on the token's clock
    fn clock(&self) -> u64;

    /// Current voting power of `account`
    fn get_votes(&self, account: &Address) -> u64;

    /// Voting power of `account` at the end of `timepoint`.
    /// Fails with `FutureLookup` unless `timepoint < clock()`.
    fn get_past_votes(&self, account: &Address, timepoint: u64) -> Result<u64>;

    /// Total supply at the end of `timepoint`, same finality rule
    fn get_past_total_supply(&self, timepoint: u64) -> Result<u64>;
}

pub struct VoteWeightToken {
    name: String,
    symbol: String,
    owner: Address,
    balances: HashMap<Address, u64>,
    delegates: HashMap<Address, Address>,
    checkpoints: HashMap<Address, Checkpoints>,
    total_supply: Checkpoints,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink<TokenEvent>>,
}

impl VoteWeightToken {
    /// Create an empty token. `owner` is the only account allowed to mint.
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        owner: Address,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink<TokenEvent>>,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            owner,
            balances: HashMap::new(),
            delegates: HashMap::new(),
            checkpoints: HashMap::new(),
            total_supply: Checkpoints::new(),
            clock,
            events,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn total_supply(&self) -> u64 {
        self.total_supply.latest()
    }

    pub fn balance_of(&self, account: &Address) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// `None` while the account has never delegated
    pub fn delegates(&self, account: &Address) -> Option<Address> {
        self.delegates.get(account).copied()
    }

    pub fn num_checkpoints(&self, account: &Address) -> usize {
        self.checkpoints.get(account).map(|c| c.len()).unwrap_or(0)
    }

    pub fn checkpoint(&self, account: &Address, pos: usize) -> Option<Checkpoint> {
        self.checkpoints.get(account).and_then(|c| c.get(pos))
    }

    /// Assign the caller's voting power to `to`
    pub fn delegate(&mut self, caller: &Address, to: &Address) -> Result<()> {
        if to.is_zero() {
            return Err(TokenError::InvalidDelegate(*to));
        }

        let previous = self.delegates.insert(*caller, *to);
        self.events.emit(TokenEvent::DelegateChanged {
            delegator: *caller,
            from_delegate: previous,
            to_delegate: *to,
        });

        let weight = self.balance_of(caller);
        self.move_voting_power(previous.as_ref(), Some(to), weight);

        tracing::info!(
            delegator = %caller,
            delegate = %to,
            weight,
            "votes_delegated"
        );
        Ok(())
    }

    pub fn transfer(&mut self, caller: &Address, to: &Address, amount: u64) -> Result<()> {
        if to.is_zero() {
            return Err(TokenError::InvalidReceiver(*to));
        }
        self.update(Some(caller), Some(to), amount)
    }

    pub fn mint(&mut self, caller: &Address, to: &Address, amount: u64) -> Result<()> {
        if *caller != self.owner {
            return Err(TokenError::Unauthorized(*caller));
        }
        if to.is_zero() {
            return Err(TokenError::InvalidReceiver(*to));
        }
        self.update(None, Some(to), amount)
    }

    /// Burn `amount` of the caller's own tokens
    pub fn burn(&mut self, caller: &Address, amount: u64) -> Result<()> {
        self.update(Some(caller), None, amount)
    }

    /// Move `amount` between balances (`None` is the mint/burn side) and
    /// carry the voting power along with it.
    fn update(&mut self, from: Option<&Address>, to: Option<&Address>, amount: u64) -> Result<()> {
        let supply = self.total_supply();

        // Validate everything up front so a rejected call changes nothing
        match from {
            Some(sender) => {
                let available = self.balance_of(sender);
                if available < amount {
                    return Err(TokenError::InsufficientBalance {
                        requested: amount,
                        available,
                    });
                }
            }
            None => {
                supply.checked_add(amount).ok_or(TokenError::Overflow { supply, amount })?;
            }
        }

        if let Some(sender) = from {
            *self.balances.entry(*sender).or_insert(0) -= amount;
        }
        if let Some(recipient) = to {
            *self.balances.entry(*recipient).or_insert(0) += amount;
        }

        let now = self.clock.now();
        match (from, to) {
            (None, Some(_)) => {
                self.total_supply.push(now, supply + amount);
            }
            (Some(_), None) => {
                self.total_supply.push(now, supply - amount);
            }
            _ => {}
        }

        self.events.emit(TokenEvent::Transfer {
            from: from.copied().unwrap_or(Address::ZERO),
            to: to.copied().unwrap_or(Address::ZERO),
            amount,
        });

        let src = from.and_then(|a| self.delegates(a));
        let dst = to.and_then(|a| self.delegates(a));
        self.move_voting_power(src.as_ref(), dst.as_ref(), amount);
        Ok(())
    }

    fn move_voting_power(&mut self, src: Option<&Address>, dst: Option<&Address>, amount: u64) {
        if amount == 0 || src == dst {
            return;
        }
        let now = self.clock.now();

        if let Some(src) = src {
            let series = self.checkpoints.entry(*src).or_default();
            let previous = series.latest();
            series.push(now, previous - amount);
            self.events.emit(TokenEvent::DelegateVotesChanged {
                delegate: *src,
                previous_votes: previous,
                new_votes: previous - amount,
            });
        }

        if let Some(dst) = dst {
            let series = self.checkpoints.entry(*dst).or_default();
            let previous = series.latest();
            series.push(now, previous + amount);
            self.events.emit(TokenEvent::DelegateVotesChanged {
                delegate: *dst,
                previous_votes: previous,
                new_votes: previous + amount,
            });
        }
    }

    fn check_finalized(&self, timepoint: u64) -> Result<()> {
        let current = self.clock.now();
        if timepoint >= current {
            return Err(TokenError::FutureLookup {
                requested: timepoint,
                current,
            });
        }
        Ok(())
    }
}

impl Votes for VoteWeightToken {
    fn clock(&self) -> u64 {
        self.clock.now()
    }

    fn get_votes(&self, account: &Address) -> u64 {
        self.checkpoints.get(account).map(|c| c.latest()).unwrap_or(0)
    }

    fn get_past_votes(&self, account: &Address, timepoint: u64) -> Result<u64> {
        self.check_finalized(timepoint)?;
        Ok(self
            .checkpoints
            .get(account)
            .map(|c| c.upper_lookup(timepoint))
            .unwrap_or(0))
    }

    fn get_past_total_supply(&self, timepoint: u64) -> Result<u64> {
        self.check_finalized(timepoint)?;
        Ok(self.total_supply.upper_lookup(timepoint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dao_core::{EventLog, ManualClock};

    struct Fixture {
        clock: Arc<ManualClock>,
        events: Arc<EventLog<TokenEvent>>,
        token: VoteWeightToken,
        owner: Address,
    }

    fn setup() -> Fixture {
        let clock = Arc::new(ManualClock::new(1));
        let events = Arc::new(EventLog::new());
        let owner = Address::derive("deployer");
        let mut token = VoteWeightToken::new(
            "GovernanceToken",
            "GT",
            owner,
            clock.clone(),
            events.clone(),
        );
        token.mint(&owner, &owner, 100_000).unwrap();
        Fixture {
            clock,
            events,
            token,
            owner,
        }
    }

    #[test]
    fn test_undelegated_balance_has_no_votes() {
        let f = setup();
        assert_eq!(f.token.balance_of(&f.owner), 100_000);
        assert_eq!(f.token.get_votes(&f.owner), 0);
        assert_eq!(f.token.delegates(&f.owner), None);
    }

    #[test]
    fn test_self_delegation_activates_balance() {
        let mut f = setup();
        let balance = f.token.balance_of(&f.owner);
        f.token.delegate(&f.owner, &f.owner).unwrap();
        assert_eq!(f.token.get_votes(&f.owner), balance);
        assert_eq!(f.token.delegates(&f.owner), Some(f.owner));
        assert_eq!(f.token.num_checkpoints(&f.owner), 1);
    }

    #[test]
    fn test_delegate_to_zero_rejected() {
        let mut f = setup();
        let err = f.token.delegate(&f.owner, &Address::ZERO).unwrap_err();
        assert_eq!(err, TokenError::InvalidDelegate(Address::ZERO));
        assert_eq!(f.token.delegates(&f.owner), None);
    }

    #[test]
    fn test_redelegation_moves_power() {
        let mut f = setup();
        let alice = Address::derive("alice");
        f.token.delegate(&f.owner, &f.owner).unwrap();
        f.clock.advance(1);
        f.token.delegate(&f.owner, &alice).unwrap();

        assert_eq!(f.token.get_votes(&f.owner), 0);
        assert_eq!(f.token.get_votes(&alice), 100_000);
        // One checkpoint for activation, one for moving away
        assert_eq!(f.token.num_checkpoints(&f.owner), 2);
    }

    #[test]
    fn test_transfer_moves_delegated_power() {
        let mut f = setup();
        let bob = Address::derive("bob");
        f.token.delegate(&f.owner, &f.owner).unwrap();
        f.token.delegate(&bob, &bob).unwrap();
        f.clock.advance(1);

        f.token.transfer(&f.owner, &bob, 30_000).unwrap();
        assert_eq!(f.token.get_votes(&f.owner), 70_000);
        assert_eq!(f.token.get_votes(&bob), 30_000);
        assert_eq!(f.token.total_supply(), 100_000);
    }

    #[test]
    fn test_transfer_to_undelegated_drops_power() {
        let mut f = setup();
        let carol = Address::derive("carol");
        f.token.delegate(&f.owner, &f.owner).unwrap();
        f.token.transfer(&f.owner, &carol, 1_000).unwrap();
        assert_eq!(f.token.get_votes(&f.owner), 99_000);
        assert_eq!(f.token.get_votes(&carol), 0);
    }

    #[test]
    fn test_insufficient_balance_changes_nothing() {
        let mut f = setup();
        let bob = Address::derive("bob");
        let err = f.token.transfer(&bob, &f.owner, 1).unwrap_err();
        assert_eq!(
            err,
            TokenError::InsufficientBalance {
                requested: 1,
                available: 0
            }
        );
        assert_eq!(f.token.balance_of(&f.owner), 100_000);
    }

    #[test]
    fn test_mint_requires_owner() {
        let mut f = setup();
        let mallory = Address::derive("mallory");
        assert_eq!(
            f.token.mint(&mallory, &mallory, 5).unwrap_err(),
            TokenError::Unauthorized(mallory)
        );
        assert_eq!(
            f.token.mint(&f.owner, &Address::ZERO, 5).unwrap_err(),
            TokenError::InvalidReceiver(Address::ZERO)
        );
    }

    #[test]
    fn test_mint_overflow() {
        let mut f = setup();
        let err = f.token.mint(&f.owner, &f.owner, u64::MAX).unwrap_err();
        assert!(matches!(err, TokenError::Overflow { .. }));
        assert_eq!(f.token.total_supply(), 100_000);
    }

    #[test]
    fn test_burn_reduces_supply_and_votes() {
        let mut f = setup();
        f.token.delegate(&f.owner, &f.owner).unwrap();
        f.clock.advance(1);
        f.token.burn(&f.owner, 40_000).unwrap();
        assert_eq!(f.token.total_supply(), 60_000);
        assert_eq!(f.token.get_votes(&f.owner), 60_000);
    }

    #[test]
    fn test_past_votes_history() {
        let mut f = setup();
        let bob = Address::derive("bob");
        f.token.delegate(&f.owner, &f.owner).unwrap(); // t=1
        f.clock.set(5);
        f.token.transfer(&f.owner, &bob, 10_000).unwrap(); // t=5
        f.clock.set(10);

        assert_eq!(f.token.get_past_votes(&f.owner, 0).unwrap(), 0);
        assert_eq!(f.token.get_past_votes(&f.owner, 1).unwrap(), 100_000);
        assert_eq!(f.token.get_past_votes(&f.owner, 4).unwrap(), 100_000);
        assert_eq!(f.token.get_past_votes(&f.owner, 5).unwrap(), 90_000);
        assert_eq!(f.token.get_past_votes(&f.owner, 9).unwrap(), 90_000);
    }

    #[test]
    fn test_future_lookup_rejected() {
        let f = setup();
        let now = f.clock.now();
        assert_eq!(
            f.token.get_past_votes(&f.owner, now).unwrap_err(),
            TokenError::FutureLookup {
                requested: now,
                current: now
            }
        );
        assert!(f.token.get_past_total_supply(now + 1).is_err());
        f.clock.advance(1);
        assert_eq!(f.token.get_past_total_supply(now).unwrap(), 100_000);
    }

    #[test]
    fn test_events_emitted() {
        let mut f = setup();
        f.token.delegate(&f.owner, &f.owner).unwrap();
        let events = f.events.events();
        assert_eq!(
            events[0],
            TokenEvent::Transfer {
                from: Address::ZERO,
                to: f.owner,
                amount: 100_000
            }
        );
        assert!(events.contains(&TokenEvent::DelegateVotesChanged {
            delegate: f.owner,
            previous_votes: 0,
            new_votes: 100_000
        }));
    }
}
