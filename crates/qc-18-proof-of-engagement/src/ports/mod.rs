//! # Ports Layer
//!
//! Trait definitions between the Proof-of-Engagement domain and the outside
//! world.
//!
//! - **Driving Ports (Inbound)**: `BootstrapApi`, `ValidatorLifecycleApi`
//! - **Driven Ports (Outbound)**: `ContractHost`, `PrivilegeGranter`,
//!   `PoeKeeper`, `EventSink`

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
