//! Logical time sources
//!
//! Governance never schedules callbacks. Every state that depends on time
//! (vote windows, timelock readiness, checkpoint lookups) is evaluated
//! against `Clock::now()` at call time, so whatever advances the clock
//! drives the lifecycle.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonically non-decreasing time source (block height or seconds)
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Manually advanced tick source for tests and simulations
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    /// Advance by `ticks` and return the new time
    pub fn advance(&self, ticks: u64) -> u64 {
        self.now.fetch_add(ticks, Ordering::SeqCst) + ticks
    }

    /// Jump to `time`. Going backwards is ignored.
    pub fn set(&self, time: u64) {
        self.now.fetch_max(time, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Wall-clock seconds since the Unix epoch
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        Utc::now().timestamp().max(0) as u64
    }
}
