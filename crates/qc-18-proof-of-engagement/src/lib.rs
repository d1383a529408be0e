//! # QC-18 Proof of Engagement - Contract Suite Orchestration
//!
//! **Subsystem ID:** 18
//!
//! ## Purpose
//!
//! Bootstraps the Proof-of-Engagement contract suite at genesis and routes the
//! validator lifecycle (`CreateValidator`, `UpdateValidator`) to the
//! contracts that own validator state. The module itself keeps only the
//! role to address registry, the system admin and the initial engagement
//! grants.
//!
//! ## Contract Suite
//!
//! | Role | Label | Pinned | Privileged |
//! |------|-------|--------|------------|
//! | Engagement group | `engagement` | yes | no |
//! | Oversight circle | `oversight_committee` | yes | no |
//! | Oversight proposals | `oversight_committee gov proposals` | yes | no |
//! | Staking group | `stakers` | no | yes |
//! | Mixer | `poe` | yes | no |
//! | Valset | `valset` | no | yes |
//! | Distribution | `rewards_distribution` | no | no |
//!
//! The engagement group lists the oversight proposals contract as a
//! privileged caller before that contract exists. Its address is predicted
//! from the host's code and instance sequences and checked once it is
//! instantiated (`domain/services.rs` - `contract_address()`).
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Registry entries are write-once and unique | `domain/registry.rs` - `set()` |
//! | Predicted proposals address matches | `service/bootstrap.rs` - step 5 |
//! | Descriptions checked before any contract call | `service/lifecycle.rs` |
//! | Failed contract calls leave no state behind | `adapters/host/mod.rs` - `transact()` |
//!
//! ## Outbound Dependencies
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | `ContractHost` | Store, instantiate, execute, query and pin contracts |
//! | `PrivilegeGranter` | Privileged contract status |
//! | `PoeKeeper` | Module state |
//! | `EventSink` | Transaction events |
//!
//! ## Usage Example
//!
//! ```ignore
//! use qc_18_proof_of_engagement::prelude::*;
//!
//! let service = create_test_service();
//! let registry = service
//!     .init_genesis(&genesis, &native_code_bundle())
//!     .await?;
//!
//! service.create_validator(msg).await?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod contracts;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{ContractRole, Description, ValidatorRecord, ValidatorState};
    pub use crate::domain::genesis::{EngagementMember, GenesisConfiguration};
    pub use crate::domain::messages::{MsgCreateValidator, MsgUpdateValidator};
    pub use crate::domain::registry::ContractAddressRegistry;

    // Value objects
    pub use crate::domain::value_objects::{
        AccessPermission, Address, CodeId, Coin, Decimal, InstanceId, PubKeyType, PublicKey,
        Uint128,
    };

    // Domain services
    pub use crate::domain::services::{contract_address, geometric_mean, ratio_from_percentage};

    // Invariants
    pub use crate::domain::invariants::{BootstrapCheckResult, BootstrapViolation};

    // Ports
    pub use crate::ports::inbound::{BootstrapApi, ValidatorLifecycleApi};
    pub use crate::ports::outbound::{
        ContractHost, ContractInfo, EventSink, HostSequences, PoeKeeper, PrivilegeGranter,
    };

    // Contracts
    pub use crate::contracts::bundle::ContractCodeBundle;

    // Events
    pub use crate::events::{attribute_keys, event_types, subsystem_ids, PoeEvent};

    // Errors
    pub use crate::errors::{ContractError, HostError, PoeError, PoeResult};

    // Config
    pub use crate::config::{ConsensusParams, InitialEngagementParams, PoeConfig};

    // Adapters
    pub use crate::adapters::host::contracts::native_code_bundle;
    pub use crate::adapters::{InMemoryContractHost, InMemoryEventSink, InMemoryKeeper};

    // Service
    pub use crate::service::{create_test_service, PoeDependencies, PoeService, ServiceStats};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID.
pub const SUBSYSTEM_ID: u8 = 18;

/// Subsystem name.
pub const SUBSYSTEM_NAME: &str = "Proof of Engagement";

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsystem_id() {
        assert_eq!(SUBSYSTEM_ID, events::subsystem_ids::PROOF_OF_ENGAGEMENT);
    }

    #[test]
    fn test_prelude_exports() {
        use prelude::*;
        let _ = PoeConfig::default();
        let _ = Address::ZERO;
        assert_eq!(ContractRole::ALL.len(), 7);
    }
}
