//! Quorum policies

use crate::config::QUORUM_DENOMINATOR;

/// Minimum participation given the total supply at the proposal snapshot
pub trait QuorumPolicy: Send + Sync {
    fn quorum(&self, past_total_supply: u64) -> u64;
}

impl<F> QuorumPolicy for F
where
    F: Fn(u64) -> u64 + Send + Sync,
{
    fn quorum(&self, past_total_supply: u64) -> u64 {
        self(past_total_supply)
    }
}

/// `numerator / 100` of the snapshot supply, rounded down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuorumFraction {
    numerator: u64,
}

impl QuorumFraction {
    pub fn new(numerator: u64) -> Self {
        Self { numerator }
    }

    pub fn numerator(&self) -> u64 {
        self.numerator
    }
}

impl QuorumPolicy for QuorumFraction {
    fn quorum(&self, past_total_supply: u64) -> u64 {
        let quorum = past_total_supply as u128 * self.numerator as u128 / QUORUM_DENOMINATOR as u128;
        quorum.min(u64::MAX as u128) as u64
    }
}
