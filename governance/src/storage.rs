use crate::error::{GovernanceError, Result};
use crate::proposal::Proposal;
use crate::voting::Receipt;
use dao_core::{Address, Hash32};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Abstraction for proposal persistence.
/// Swap this out for a database-backed store.
pub trait ProposalStore: Send + Sync {
    // Proposals
    fn put_proposal(&mut self, p: Proposal);
    fn get_proposal(&self, id: &Hash32) -> Option<&Proposal>;
    fn get_proposal_mut(&mut self, id: &Hash32) -> Option<&mut Proposal>;
    /// Proposals in creation order
    fn list_proposals(&self, offset: usize, limit: usize) -> Vec<Proposal>;
    fn proposal_count(&self) -> usize;

    // Votes
    fn put_receipt(&mut self, id: &Hash32, voter: Address, receipt: Receipt);
    fn get_receipt(&self, id: &Hash32, voter: &Address) -> Option<&Receipt>;
    fn list_receipts(&self, id: &Hash32) -> Vec<(Address, Receipt)>;
}

/// Simple in-memory store (good for testing and initial wiring).
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryProposalStore {
    order: Vec<Hash32>,
    proposals: HashMap<Hash32, Proposal>,
    receipts: HashMap<Hash32, HashMap<Address, Receipt>>,
}

impl InMemoryProposalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the whole store for an on-disk snapshot
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| GovernanceError::Storage(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| GovernanceError::Storage(e.to_string()))
    }
}

impl ProposalStore for InMemoryProposalStore {
    fn put_proposal(&mut self, p: Proposal) {
        if !self.proposals.contains_key(&p.id) {
            self.order.push(p.id);
        }
        self.proposals.insert(p.id, p);
    }

    fn get_proposal(&self, id: &Hash32) -> Option<&Proposal> {
        self.proposals.get(id)
    }

    fn get_proposal_mut(&mut self, id: &Hash32) -> Option<&mut Proposal> {
        self.proposals.get_mut(id)
    }

    fn list_proposals(&self, offset: usize, limit: usize) -> Vec<Proposal> {
        self.order
            .iter()
            .skip(offset)
            .take(limit)
            .filter_map(|id| self.proposals.get(id).cloned())
            .collect()
    }

    fn proposal_count(&self) -> usize {
        self.order.len()
    }

    fn put_receipt(&mut self, id: &Hash32, voter: Address, receipt: Receipt) {
        self.receipts.entry(*id).or_default().insert(voter, receipt);
    }

    fn get_receipt(&self, id: &Hash32, voter: &Address) -> Option<&Receipt> {
        self.receipts.get(id).and_then(|votes| votes.get(voter))
    }

    fn list_receipts(&self, id: &Hash32) -> Vec<(Address, Receipt)> {
        let mut receipts: Vec<_> = self
            .receipts
            .get(id)
            .map(|votes| votes.iter().map(|(a, r)| (*a, r.clone())).collect())
            .unwrap_or_default();
        receipts.sort_by_key(|(a, _)| *a);
        receipts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voting::{ProposalVotes, VoteType};

    fn proposal(label: &str, created_at: u64) -> Proposal {
        Proposal {
            id: Hash32::digest(label.as_bytes()),
            proposer: Address::derive("alice"),
            targets: vec![Address::derive("box")],
            values: vec![0],
            calldatas: vec![vec![]],
            description: label.to_string(),
            description_hash: Hash32::digest(label.as_bytes()),
            created_at,
            vote_start: created_at + 1,
            vote_end: created_at + 6,
            votes: ProposalVotes::default(),
            operation_id: None,
            eta: None,
            executed: false,
            canceled: false,
        }
    }

    #[test]
    fn test_list_in_creation_order() {
        let mut store = InMemoryProposalStore::new();
        store.put_proposal(proposal("b", 1));
        store.put_proposal(proposal("a", 2));
        store.put_proposal(proposal("c", 3));

        let listed: Vec<String> = store
            .list_proposals(1, 10)
            .into_iter()
            .map(|p| p.description)
            .collect();
        assert_eq!(listed, vec!["a".to_string(), "c".to_string()]);
        assert_eq!(store.proposal_count(), 3);
    }

    #[test]
    fn test_receipts() {
        let mut store = InMemoryProposalStore::new();
        let p = proposal("a", 1);
        let id = p.id;
        store.put_proposal(p);
        let voter = Address::derive("bob");
        store.put_receipt(
            &id,
            voter,
            Receipt {
                support: VoteType::For,
                weight: 10,
                reason: String::new(),
                timestamp: 2,
            },
        );
        assert_eq!(store.get_receipt(&id, &voter).unwrap().weight, 10);
        assert!(store.get_receipt(&id, &Address::derive("carol")).is_none());
        assert_eq!(store.list_receipts(&id).len(), 1);
    }

    #[test]
    fn test_json_snapshot() {
        let mut store = InMemoryProposalStore::new();
        let p = proposal("a", 1);
        let id = p.id;
        store.put_proposal(p);
        store.put_receipt(
            &id,
            Address::derive("bob"),
            Receipt {
                support: VoteType::Abstain,
                weight: 3,
                reason: "meh".to_string(),
                timestamp: 2,
            },
        );

        let json = store.to_json().unwrap();
        let restored = InMemoryProposalStore::from_json(&json).unwrap();
        assert_eq!(restored, store);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            InMemoryProposalStore::from_json("{"),
            Err(GovernanceError::Storage(_))
        ));
    }
}
