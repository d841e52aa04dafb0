//! DAO Core Library
//!
//! Shared primitives for the governance components: account identities,
//! content hashes, the logical clock, the call-data codec used to carry
//! call bundles through the timelock, and the event sink seam.

pub mod address;
pub mod call;
pub mod clock;
pub mod events;

// Re-export main types
pub use address::{Address, AddressParseError, Hash32};
pub use call::{decode_call, encode_call, Call, CallError, CallTarget, Effect};
pub use clock::{Clock, ManualClock, SystemClock};
pub use events::{EventLog, EventSink, NoopSink};
