//! Append-only checkpoint series
//!
//! Keys are strictly increasing. Several writes within the same tick
//! collapse into the last entry, so a lookup "as of T" always sees the
//! value at the end of tick T.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub key: u64,
    pub value: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoints {
    entries: Vec<Checkpoint>,
}

impl Checkpoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` at `key`, returning the previous latest value.
    ///
    /// A key older than the last entry is clamped onto the last entry.
    pub fn push(&mut self, key: u64, value: u64) -> u64 {
        let previous = self.latest();
        match self.entries.last_mut() {
            Some(last) if last.key >= key => {
                if last.key > key {
                    tracing::warn!(last_key = last.key, key, "checkpoint_key_regressed");
                }
                last.value = value;
            }
            _ => self.entries.push(Checkpoint { key, value }),
        }
        previous
    }

    /// Value of the last entry, zero when empty
    pub fn latest(&self) -> u64 {
        self.entries.last().map(|c| c.value).unwrap_or(0)
    }

    /// Value of the last entry with `entry.key <= key`, zero if none
    pub fn upper_lookup(&self, key: u64) -> u64 {
        let idx = self.entries.partition_point(|c| c.key <= key);
        if idx == 0 {
            0
        } else {
            self.entries[idx - 1].value
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, pos: usize) -> Option<Checkpoint> {
        self.entries.get(pos).copied()
    }
}
