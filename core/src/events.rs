//! Event emission
//!
//! Components emit their own event enums into an injected `EventSink`.
//! The sink is generic over the event type so a single log can collect
//! every component's events once they convert into a common enum.

use parking_lot::Mutex;
use std::fmt::Debug;

pub trait EventSink<E>: Send + Sync {
    fn emit(&self, event: E);
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl<E> EventSink<E> for NoopSink {
    fn emit(&self, _event: E) {}
}

/// In-memory, append-only event log
#[derive(Debug)]
pub struct EventLog<E> {
    events: Mutex<Vec<E>>,
}

impl<E> Default for EventLog<E> {
    fn default() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }
}

impl<E: Clone> EventLog<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<E> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Remove and return everything recorded so far
    pub fn drain(&self) -> Vec<E> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl<E, T> EventSink<T> for EventLog<E>
where
    E: Send,
    T: Into<E> + Debug,
{
    fn emit(&self, event: T) {
        tracing::debug!(event = ?event, "event_emitted");
        self.events.lock().push(event.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Wrapped {
        Number(u32),
    }

    impl From<u32> for Wrapped {
        fn from(n: u32) -> Self {
            Wrapped::Number(n)
        }
    }

    #[test]
    fn test_log_converts_and_drains() {
        let log: EventLog<Wrapped> = EventLog::new();
        log.emit(1u32);
        log.emit(2u32);
        assert_eq!(log.len(), 2);
        assert_eq!(log.drain(), vec![Wrapped::Number(1), Wrapped::Number(2)]);
        assert!(log.is_empty());
    }
}
