//! Serialized access to a deployed DAO
//!
//! Token, governor and timelock live behind one mutex, so every state
//! transition runs to completion before the next one starts. The governed
//! resource keeps its own read/write lock and can be read without it.

use crate::deploy::DaoAddresses;
use dao_core::{Address, Clock, Hash32};
use dao_governance::{
    GovernanceEngine, GovernanceError, Proposal, ProposalState, ProposalVotes, Receipt, VoteType,
};
use dao_resource::{ResourceError, SharedResource};
use dao_timelock::{OperationState, Role, TimelockError, TimelockExecutor};
use dao_token::{TokenError, VoteWeightToken, Votes};
use parking_lot::Mutex;
use std::sync::Arc;

struct DaoState {
    token: VoteWeightToken,
    engine: GovernanceEngine,
    timelock: TimelockExecutor,
}

pub struct Dao {
    addresses: DaoAddresses,
    state: Mutex<DaoState>,
    resource: SharedResource,
    clock: Arc<dyn Clock>,
}

impl Dao {
    pub(crate) fn new(
        addresses: DaoAddresses,
        token: VoteWeightToken,
        engine: GovernanceEngine,
        timelock: TimelockExecutor,
        resource: SharedResource,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            addresses,
            state: Mutex::new(DaoState {
                token,
                engine,
                timelock,
            }),
            resource,
            clock,
        }
    }

    pub fn addresses(&self) -> DaoAddresses {
        self.addresses
    }

    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    // ----- token -----

    pub fn total_supply(&self) -> u64 {
        self.state.lock().token.total_supply()
    }

    pub fn balance_of(&self, account: &Address) -> u64 {
        self.state.lock().token.balance_of(account)
    }

    pub fn delegates(&self, account: &Address) -> Option<Address> {
        self.state.lock().token.delegates(account)
    }

    pub fn get_votes(&self, account: &Address) -> u64 {
        self.state.lock().token.get_votes(account)
    }

    pub fn get_past_votes(&self, account: &Address, timepoint: u64) -> Result<u64, TokenError> {
        self.state.lock().token.get_past_votes(account, timepoint)
    }

    pub fn get_past_total_supply(&self, timepoint: u64) -> Result<u64, TokenError> {
        self.state.lock().token.get_past_total_supply(timepoint)
    }

    pub fn delegate(&self, caller: &Address, to: &Address) -> Result<(), TokenError> {
        self.state.lock().token.delegate(caller, to)
    }

    pub fn transfer(&self, caller: &Address, to: &Address, amount: u64) -> Result<(), TokenError> {
        self.state.lock().token.transfer(caller, to, amount)
    }

    pub fn mint(&self, caller: &Address, to: &Address, amount: u64) -> Result<(), TokenError> {
        self.state.lock().token.mint(caller, to, amount)
    }

    pub fn burn(&self, caller: &Address, amount: u64) -> Result<(), TokenError> {
        self.state.lock().token.burn(caller, amount)
    }

    // ----- governor -----

    pub fn propose(
        &self,
        proposer: &Address,
        targets: Vec<Address>,
        values: Vec<u64>,
        calldatas: Vec<Vec<u8>>,
        description: &str,
    ) -> Result<Hash32, GovernanceError> {
        let mut guard = self.state.lock();
        let DaoState { token, engine, .. } = &mut *guard;
        engine.propose(&*token, proposer, targets, values, calldatas, description)
    }

    pub fn cast_vote(
        &self,
        voter: &Address,
        id: &Hash32,
        support: VoteType,
    ) -> Result<u64, GovernanceError> {
        self.cast_vote_with_reason(voter, id, support, "")
    }

    pub fn cast_vote_with_reason(
        &self,
        voter: &Address,
        id: &Hash32,
        support: VoteType,
        reason: &str,
    ) -> Result<u64, GovernanceError> {
        let mut guard = self.state.lock();
        let DaoState { token, engine, .. } = &mut *guard;
        engine.cast_vote_with_reason(&*token, voter, id, support, reason)
    }

    pub fn state(&self, id: &Hash32) -> Result<ProposalState, GovernanceError> {
        let guard = self.state.lock();
        guard.engine.state(&guard.token, &guard.timelock, id)
    }

    pub fn queue(&self, id: &Hash32) -> Result<u64, GovernanceError> {
        let mut guard = self.state.lock();
        let DaoState {
            token,
            engine,
            timelock,
        } = &mut *guard;
        engine.queue(&*token, timelock, id)
    }

    pub fn execute(&self, caller: &Address, id: &Hash32) -> Result<(), GovernanceError> {
        let mut guard = self.state.lock();
        let DaoState {
            token,
            engine,
            timelock,
        } = &mut *guard;
        engine.execute(&*token, timelock, caller, id)
    }

    pub fn cancel(&self, caller: &Address, id: &Hash32) -> Result<(), GovernanceError> {
        let mut guard = self.state.lock();
        let DaoState { token, engine, .. } = &mut *guard;
        engine.cancel(&*token, caller, id)
    }

    pub fn proposal(&self, id: &Hash32) -> Result<Proposal, GovernanceError> {
        self.state.lock().engine.proposal(id).cloned()
    }

    pub fn proposals(&self, offset: usize, limit: usize) -> Vec<Proposal> {
        self.state.lock().engine.proposals(offset, limit)
    }

    pub fn proposal_votes(&self, id: &Hash32) -> Result<ProposalVotes, GovernanceError> {
        self.state.lock().engine.proposal_votes(id)
    }

    pub fn has_voted(&self, id: &Hash32, account: &Address) -> bool {
        self.state.lock().engine.has_voted(id, account)
    }

    pub fn receipt(&self, id: &Hash32, account: &Address) -> Option<Receipt> {
        self.state.lock().engine.receipt(id, account).cloned()
    }

    pub fn quorum(&self, timepoint: u64) -> Result<u64, GovernanceError> {
        let guard = self.state.lock();
        guard.engine.quorum(&guard.token, timepoint)
    }

    // ----- timelock -----

    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        self.state.lock().timelock.has_role(role, account)
    }

    pub fn grant_role(&self, caller: &Address, role: Role, account: &Address) -> Result<(), TimelockError> {
        self.state.lock().timelock.grant_role(caller, role, account)
    }

    pub fn revoke_role(&self, caller: &Address, role: Role, account: &Address) -> Result<(), TimelockError> {
        self.state.lock().timelock.revoke_role(caller, role, account)
    }

    pub fn min_delay(&self) -> u64 {
        self.state.lock().timelock.min_delay()
    }

    pub fn operation_state(&self, id: &Hash32) -> OperationState {
        self.state.lock().timelock.operation_state(id)
    }

    /// Run a timelock operation directly, bypassing the governor
    pub fn execute_operation(&self, caller: &Address, id: &Hash32) -> Result<(), TimelockError> {
        self.state.lock().timelock.execute(caller, id)
    }

    // ----- resource -----

    pub fn get_value(&self) -> String {
        self.resource.get_value()
    }

    pub fn resource_owner(&self) -> Address {
        self.resource.owner()
    }

    pub fn set_value(&self, caller: &Address, value: impl Into<String>) -> Result<(), ResourceError> {
        self.resource.set_value(caller, value)
    }
}
