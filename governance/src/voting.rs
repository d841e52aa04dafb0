//! Vote records and counting strategies

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VoteType {
    Against,
    For,
    Abstain,
}

/// One account's vote on one proposal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Receipt {
    pub support: VoteType,
    pub weight: u64,
    pub reason: String,
    pub timestamp: u64,
}

/// Running tallies of a proposal
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProposalVotes {
    pub against_votes: u64,
    pub for_votes: u64,
    pub abstain_votes: u64,
}

impl ProposalVotes {
    /// Participation counted towards quorum by simple counting
    pub fn total(&self) -> u128 {
        self.against_votes as u128 + self.for_votes as u128 + self.abstain_votes as u128
    }
}

/// How votes accumulate and what it takes to pass
pub trait VoteCounting: Send + Sync {
    /// Description of the counting rules for external tooling
    fn counting_mode(&self) -> &'static str;

    /// Add `weight` to the tally. Returns `false` on overflow, leaving the
    /// tally untouched.
    fn count_vote(&self, tally: &mut ProposalVotes, support: VoteType, weight: u64) -> bool;

    fn quorum_reached(&self, tally: &ProposalVotes, quorum: u64) -> bool;

    fn vote_succeeded(&self, tally: &ProposalVotes) -> bool;
}

/// For / Against / Abstain. All three count toward quorum; a proposal
/// passes with strictly more For than Against.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleCounting;

impl VoteCounting for SimpleCounting {
    fn counting_mode(&self) -> &'static str {
        "support=bravo&quorum=for,against,abstain"
    }

    fn count_vote(&self, tally: &mut ProposalVotes, support: VoteType, weight: u64) -> bool {
        let slot = match support {
            VoteType::Against => &mut tally.against_votes,
            VoteType::For => &mut tally.for_votes,
            VoteType::Abstain => &mut tally.abstain_votes,
        };
        match slot.checked_add(weight) {
            Some(sum) => {
                *slot = sum;
                true
            }
            None => false,
        }
    }

    fn quorum_reached(&self, tally: &ProposalVotes, quorum: u64) -> bool {
        tally.total() >= quorum as u128
    }

    fn vote_succeeded(&self, tally: &ProposalVotes) -> bool {
        tally.for_votes > tally.against_votes
    }
}
