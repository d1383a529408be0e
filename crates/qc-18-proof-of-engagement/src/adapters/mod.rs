//! # Adapters Layer (Outer Hexagon)
//!
//! In-memory implementations of the driven ports:
//!
//! - `host`: contract host running the native contract suite
//! - `keeper`: module state
//! - `event_sink`: transaction event log

pub mod event_sink;
pub mod host;
pub mod keeper;

pub use event_sink::InMemoryEventSink;
pub use host::InMemoryContractHost;
pub use keeper::InMemoryKeeper;
