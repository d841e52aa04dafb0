//! Proposal lifecycle state machine
//!
//! ```text
//! Pending -> Active -> Succeeded -> Queued -> Executed
//!                   \-> Defeated
//! Pending/Active -> Canceled
//! ```
//!
//! Pending, Active, Succeeded and Defeated are derived from the clock and the
//! tallies each time `state` is asked. Queued, Executed and Canceled are
//! recorded by the corresponding calls. A queued proposal whose timelock
//! operation has already run reports Executed.

use crate::config;
use crate::error::{GovernanceError, Result};
use crate::events::GovernorEvent;
use crate::proposal::{hash_proposal, Proposal, ProposalState};
use crate::quorum::{QuorumFraction, QuorumPolicy};
use crate::storage::{InMemoryProposalStore, ProposalStore};
use crate::voting::{ProposalVotes, Receipt, SimpleCounting, VoteCounting, VoteType};
use dao_core::{Address, Clock, EventSink, Hash32};
use dao_timelock::{TimelockError, TimelockExecutor};
use dao_token::Votes;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernorSettings {
    /// Ticks between proposal and vote start, at least one
    pub voting_delay: u64,
    pub voting_period: u64,
    pub proposal_threshold: u64,
    /// Quorum as a percentage of the snapshot total supply
    pub quorum_percentage: u64,
}

impl Default for GovernorSettings {
    fn default() -> Self {
        Self {
            voting_delay: config::VOTING_DELAY,
            voting_period: config::VOTING_PERIOD,
            proposal_threshold: config::PROPOSAL_THRESHOLD,
            quorum_percentage: config::QUORUM_PERCENTAGE,
        }
    }
}

impl GovernorSettings {
    pub fn validate(&self) -> Result<()> {
        // Weights are read at vote_start - 1, which must already be past
        // when the first vote can be cast
        if self.voting_delay == 0 {
            return Err(GovernanceError::InvalidSettings(
                "voting delay must be at least one tick".to_string(),
            ));
        }
        if self.voting_period == 0 {
            return Err(GovernanceError::InvalidSettings(
                "voting period must be at least one tick".to_string(),
            ));
        }
        if self.quorum_percentage > config::QUORUM_DENOMINATOR {
            return Err(GovernanceError::InvalidSettings(format!(
                "quorum percentage {} exceeds {}",
                self.quorum_percentage,
                config::QUORUM_DENOMINATOR
            )));
        }
        Ok(())
    }
}

pub struct GovernanceEngine<S: ProposalStore = InMemoryProposalStore> {
    address: Address,
    name: String,
    settings: GovernorSettings,
    cancellers: HashSet<Address>,
    store: S,
    counting: Box<dyn VoteCounting>,
    quorum: Box<dyn QuorumPolicy>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink<GovernorEvent>>,
}

impl GovernanceEngine<InMemoryProposalStore> {
    pub fn new(
        address: Address,
        name: impl Into<String>,
        settings: GovernorSettings,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink<GovernorEvent>>,
    ) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            address,
            name: name.into(),
            settings,
            cancellers: HashSet::new(),
            store: InMemoryProposalStore::new(),
            counting: Box::new(SimpleCounting),
            quorum: Box::new(QuorumFraction::new(settings.quorum_percentage)),
            clock,
            events,
        })
    }
}

impl<S: ProposalStore> GovernanceEngine<S> {
    /// Replace the proposal store
    pub fn with_store<T: ProposalStore>(self, store: T) -> GovernanceEngine<T> {
        GovernanceEngine {
            address: self.address,
            name: self.name,
            settings: self.settings,
            cancellers: self.cancellers,
            store,
            counting: self.counting,
            quorum: self.quorum,
            clock: self.clock,
            events: self.events,
        }
    }

    pub fn with_counting(mut self, counting: impl VoteCounting + 'static) -> Self {
        self.counting = Box::new(counting);
        self
    }

    pub fn with_quorum(mut self, quorum: impl QuorumPolicy + 'static) -> Self {
        self.quorum = Box::new(quorum);
        self
    }

    /// Accounts besides the proposer allowed to cancel proposals
    pub fn with_cancellers(mut self, cancellers: impl IntoIterator<Item = Address>) -> Self {
        self.cancellers.extend(cancellers);
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &GovernorSettings {
        &self.settings
    }

    pub fn voting_delay(&self) -> u64 {
        self.settings.voting_delay
    }

    pub fn voting_period(&self) -> u64 {
        self.settings.voting_period
    }

    pub fn proposal_threshold(&self) -> u64 {
        self.settings.proposal_threshold
    }

    pub fn counting_mode(&self) -> &'static str {
        self.counting.counting_mode()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn proposal(&self, id: &Hash32) -> Result<&Proposal> {
        self.store
            .get_proposal(id)
            .ok_or(GovernanceError::ProposalNotFound(*id))
    }

    pub fn proposals(&self, offset: usize, limit: usize) -> Vec<Proposal> {
        self.store.list_proposals(offset, limit)
    }

    pub fn proposal_votes(&self, id: &Hash32) -> Result<ProposalVotes> {
        Ok(self.proposal(id)?.votes)
    }

    pub fn proposal_snapshot(&self, id: &Hash32) -> Result<u64> {
        Ok(self.proposal(id)?.snapshot())
    }

    pub fn proposal_deadline(&self, id: &Hash32) -> Result<u64> {
        Ok(self.proposal(id)?.vote_end)
    }

    pub fn proposal_eta(&self, id: &Hash32) -> Result<Option<u64>> {
        Ok(self.proposal(id)?.eta)
    }

    pub fn proposal_proposer(&self, id: &Hash32) -> Result<Address> {
        Ok(self.proposal(id)?.proposer)
    }

    pub fn has_voted(&self, id: &Hash32, account: &Address) -> bool {
        self.store.get_receipt(id, account).is_some()
    }

    pub fn receipt(&self, id: &Hash32, account: &Address) -> Option<&Receipt> {
        self.store.get_receipt(id, account)
    }

    /// Quorum for a snapshot timepoint, from the total supply at that point
    pub fn quorum(&self, votes: &dyn Votes, timepoint: u64) -> Result<u64> {
        let supply = votes.get_past_total_supply(timepoint)?;
        Ok(self.quorum.quorum(supply))
    }

    pub fn state(
        &self,
        votes: &dyn Votes,
        timelock: &TimelockExecutor,
        id: &Hash32,
    ) -> Result<ProposalState> {
        let proposal = self.proposal(id)?;
        match (self.state_of(votes, proposal)?, proposal.operation_id) {
            (ProposalState::Queued, Some(op)) if timelock.is_operation_done(&op) => {
                Ok(ProposalState::Executed)
            }
            (state, _) => Ok(state),
        }
    }

    fn state_of(&self, votes: &dyn Votes, proposal: &Proposal) -> Result<ProposalState> {
        if proposal.executed {
            return Ok(ProposalState::Executed);
        }
        if proposal.canceled {
            return Ok(ProposalState::Canceled);
        }

        let now = self.clock.now();
        if now < proposal.vote_start {
            return Ok(ProposalState::Pending);
        }
        if now < proposal.vote_end {
            return Ok(ProposalState::Active);
        }
        if proposal.eta.is_some() {
            return Ok(ProposalState::Queued);
        }

        let quorum = self.quorum(votes, proposal.snapshot())?;
        if self.counting.quorum_reached(&proposal.votes, quorum)
            && self.counting.vote_succeeded(&proposal.votes)
        {
            Ok(ProposalState::Succeeded)
        } else {
            Ok(ProposalState::Defeated)
        }
    }

    /// Create a proposal for the given call bundle
    pub fn propose(
        &mut self,
        votes: &dyn Votes,
        proposer: &Address,
        targets: Vec<Address>,
        values: Vec<u64>,
        calldatas: Vec<Vec<u8>>,
        description: &str,
    ) -> Result<Hash32> {
        if targets.len() != values.len() || targets.len() != calldatas.len() {
            return Err(GovernanceError::InvalidProposalLength {
                targets: targets.len(),
                values: values.len(),
                calldatas: calldatas.len(),
            });
        }
        if targets.is_empty() {
            return Err(GovernanceError::EmptyProposal);
        }

        let power = votes.get_votes(proposer);
        let threshold = self.settings.proposal_threshold;
        if power < threshold {
            return Err(GovernanceError::InsufficientProposerPower {
                proposer: *proposer,
                power,
                threshold,
            });
        }

        let description_hash = Hash32::digest(description.as_bytes());
        let id = hash_proposal(&targets, &values, &calldatas, &description_hash);
        if self.store.get_proposal(&id).is_some() {
            return Err(GovernanceError::DuplicateProposal(id));
        }

        let now = self.clock.now();
        let vote_start = now.saturating_add(self.settings.voting_delay);
        let vote_end = vote_start.saturating_add(self.settings.voting_period);

        self.events.emit(GovernorEvent::ProposalCreated {
            id,
            proposer: *proposer,
            targets: targets.clone(),
            values: values.clone(),
            description: description.to_string(),
            vote_start,
            vote_end,
        });

        self.store.put_proposal(Proposal {
            id,
            proposer: *proposer,
            targets,
            values,
            calldatas,
            description: description.to_string(),
            description_hash,
            created_at: now,
            vote_start,
            vote_end,
            votes: ProposalVotes::default(),
            operation_id: None,
            eta: None,
            executed: false,
            canceled: false,
        });

        tracing::info!(
            proposal_id = %id.short(),
            proposer = %proposer,
            vote_start,
            vote_end,
            "proposal_created"
        );
        Ok(id)
    }

    /// Vote with the voter's power at the proposal snapshot. Returns the weight counted.
    pub fn cast_vote(
        &mut self,
        votes: &dyn Votes,
        voter: &Address,
        id: &Hash32,
        support: VoteType,
    ) -> Result<u64> {
        self.cast_vote_with_reason(votes, voter, id, support, "")
    }

    pub fn cast_vote_with_reason(
        &mut self,
        votes: &dyn Votes,
        voter: &Address,
        id: &Hash32,
        support: VoteType,
        reason: &str,
    ) -> Result<u64> {
        let proposal = self.proposal(id)?;
        let state = self.state_of(votes, proposal)?;
        if state != ProposalState::Active {
            return Err(GovernanceError::VotingClosed { id: *id, state });
        }
        if self.has_voted(id, voter) {
            return Err(GovernanceError::AlreadyVoted {
                id: *id,
                voter: *voter,
            });
        }

        let weight = votes.get_past_votes(voter, proposal.snapshot())?;

        let mut tally = proposal.votes;
        if !self.counting.count_vote(&mut tally, support, weight) {
            return Err(GovernanceError::Overflow(*id));
        }

        let now = self.clock.now();
        if let Some(proposal) = self.store.get_proposal_mut(id) {
            proposal.votes = tally;
        }
        self.store.put_receipt(
            id,
            *voter,
            Receipt {
                support,
                weight,
                reason: reason.to_string(),
                timestamp: now,
            },
        );

        self.events.emit(GovernorEvent::VoteCast {
            voter: *voter,
            id: *id,
            support,
            weight,
            reason: reason.to_string(),
        });
        tracing::info!(
            proposal_id = %id.short(),
            voter = %voter,
            support = ?support,
            weight,
            "vote_cast"
        );
        Ok(weight)
    }

    /// Salt tying the timelock operation to this governor and description
    fn timelock_salt(&self, description_hash: &Hash32) -> Hash32 {
        let mut hasher = Sha256::new();
        hasher.update(self.address.as_bytes());
        hasher.update(description_hash.as_bytes());
        Hash32::new(hasher.finalize().into())
    }

    /// Hand a succeeded proposal to the timelock. Returns the ETA.
    pub fn queue(
        &mut self,
        votes: &dyn Votes,
        timelock: &mut TimelockExecutor,
        id: &Hash32,
    ) -> Result<u64> {
        let proposal = self.proposal(id)?;
        let state = self.state_of(votes, proposal)?;
        if state != ProposalState::Succeeded {
            return Err(GovernanceError::UnexpectedState {
                id: *id,
                current: state,
                expected: ProposalState::Succeeded,
            });
        }

        let salt = self.timelock_salt(&proposal.description_hash);
        let calls = proposal.calls();
        let delay = timelock.min_delay();
        let operation_id = timelock.schedule(&self.address, calls, None, salt, delay)?;
        let eta = timelock
            .timestamp(&operation_id)
            .ok_or(TimelockError::UnknownOperation(operation_id))?;

        if let Some(proposal) = self.store.get_proposal_mut(id) {
            proposal.operation_id = Some(operation_id);
            proposal.eta = Some(eta);
        }

        self.events.emit(GovernorEvent::ProposalStateChanged {
            id: *id,
            state: ProposalState::Queued,
        });
        tracing::info!(
            proposal_id = %id.short(),
            operation = %operation_id.short(),
            eta,
            "proposal_queued"
        );
        Ok(eta)
    }

    /// Release a queued proposal through the timelock once its delay has
    /// passed. The timelock checks `caller` for the Executor role.
    pub fn execute(
        &mut self,
        votes: &dyn Votes,
        timelock: &mut TimelockExecutor,
        caller: &Address,
        id: &Hash32,
    ) -> Result<()> {
        let proposal = self.proposal(id)?;
        let state = self.state_of(votes, proposal)?;
        match state {
            ProposalState::Queued => {}
            ProposalState::Executed => return Err(GovernanceError::AlreadyExecuted(*id)),
            current => {
                return Err(GovernanceError::UnexpectedState {
                    id: *id,
                    current,
                    expected: ProposalState::Queued,
                })
            }
        }
        let operation_id = proposal
            .operation_id
            .ok_or(TimelockError::UnknownOperation(Hash32::ZERO))?;

        match timelock.execute(caller, &operation_id) {
            Ok(()) => {}
            Err(TimelockError::NotReady { ready_at, now, .. }) => {
                return Err(GovernanceError::TimelockNotReady {
                    id: *id,
                    ready_at,
                    now,
                })
            }
            Err(TimelockError::AlreadyExecuted(_)) => {
                return Err(GovernanceError::AlreadyExecuted(*id))
            }
            Err(e) => return Err(e.into()),
        }

        if let Some(proposal) = self.store.get_proposal_mut(id) {
            proposal.executed = true;
        }
        self.events.emit(GovernorEvent::ProposalStateChanged {
            id: *id,
            state: ProposalState::Executed,
        });
        tracing::info!(proposal_id = %id.short(), executor = %caller, "proposal_executed");
        Ok(())
    }

    /// Withdraw a proposal before voting ends.
    ///
    /// Allowed for the proposer and configured cancellers while Pending or
    /// Active. Canceling twice is a no-op; any other settled state fails.
    pub fn cancel(&mut self, votes: &dyn Votes, caller: &Address, id: &Hash32) -> Result<()> {
        let proposal = self.proposal(id)?;
        if *caller != proposal.proposer && !self.cancellers.contains(caller) {
            return Err(GovernanceError::Unauthorized(*caller));
        }

        match self.state_of(votes, proposal)? {
            ProposalState::Canceled => return Ok(()),
            ProposalState::Pending | ProposalState::Active => {}
            state => return Err(GovernanceError::AlreadyFinalized { id: *id, state }),
        }

        if let Some(proposal) = self.store.get_proposal_mut(id) {
            proposal.canceled = true;
        }
        self.events.emit(GovernorEvent::ProposalStateChanged {
            id: *id,
            state: ProposalState::Canceled,
        });
        tracing::info!(proposal_id = %id.short(), canceller = %caller, "proposal_canceled");
        Ok(())
    }
}
