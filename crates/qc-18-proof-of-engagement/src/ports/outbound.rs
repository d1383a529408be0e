//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the Proof-of-Engagement subsystem depends on:
//! - the contract host that stores, instantiates and runs contracts
//! - the privilege registry of the host
//! - the module keeper holding the contract address registry
//! - the event sink of the enclosing transaction

use crate::domain::entities::ContractRole;
use crate::domain::registry::ContractAddressRegistry;
use crate::domain::services::contract_address;
use crate::domain::value_objects::{AccessPermission, Address, CodeId, Coin, InstanceId};
use crate::errors::{HostError, PoeResult};
use crate::events::PoeEvent;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// =============================================================================
// CONTRACT HOST
// =============================================================================

/// Next values of the host's code and instance counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSequences {
    /// Code id the next `create` will assign.
    pub next_code_id: CodeId,
    /// Instance id the next `instantiate` will assign.
    pub next_instance_id: InstanceId,
}

/// Host metadata about a contract instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
    /// Code the instance runs.
    pub code_id: CodeId,
    /// Account that instantiated it.
    pub creator: Address,
    /// Migration admin.
    pub admin: Option<Address>,
    /// Human readable label.
    pub label: String,
}

/// Contract execution engine.
///
/// Every call is atomic: a failing call leaves no state behind, including
/// state written by nested sub-messages.
#[async_trait]
pub trait ContractHost: Send + Sync {
    /// Stores contract code and returns its id.
    async fn create(
        &self,
        creator: Address,
        code: &[u8],
        permission: AccessPermission,
    ) -> Result<CodeId, HostError>;

    /// Instantiates stored code. `funds` move from `creator` to the new
    /// contract as part of the same call.
    ///
    /// Returns the new address and the contract's response data.
    async fn instantiate(
        &self,
        code_id: CodeId,
        creator: Address,
        admin: Option<Address>,
        init_msg: &[u8],
        funds: &[Coin],
        label: &str,
    ) -> Result<(Address, Vec<u8>), HostError>;

    /// Executes a contract message on behalf of `sender`.
    async fn execute(
        &self,
        contract: Address,
        sender: Address,
        msg: &[u8],
        funds: &[Coin],
    ) -> Result<Vec<u8>, HostError>;

    /// Runs a read-only query.
    async fn query(&self, contract: Address, msg: &[u8]) -> Result<Vec<u8>, HostError>;

    /// Pins code in the host cache.
    async fn pin_code(&self, code_id: CodeId) -> Result<(), HostError>;

    /// Returns true if the code is pinned.
    async fn is_pinned(&self, code_id: CodeId) -> Result<bool, HostError>;

    /// Looks up instance metadata.
    async fn contract_info(&self, contract: Address) -> Result<ContractInfo, HostError>;

    /// Current sequence counters.
    async fn sequences(&self) -> Result<HostSequences, HostError>;

    /// Address the host will assign to `instance_id` of `code_id`.
    fn predict_address(&self, code_id: CodeId, instance_id: InstanceId) -> Address {
        contract_address(code_id, instance_id)
    }
}

/// Host-level privileged contract status.
///
/// Grants are one-way. There is no revocation.
#[async_trait]
pub trait PrivilegeGranter: Send + Sync {
    /// Grants privileged status.
    async fn set_privileged(&self, contract: Address) -> Result<(), HostError>;

    /// Returns true if the contract is privileged.
    async fn is_privileged(&self, contract: Address) -> Result<bool, HostError>;

    /// All privileged contracts, in grant order.
    async fn privileged_contracts(&self) -> Result<Vec<Address>, HostError>;
}

// =============================================================================
// MODULE KEEPER
// =============================================================================

/// Module state kept outside the contracts.
///
/// Implementations use interior mutability; the host serializes callers.
pub trait PoeKeeper: Send + Sync {
    /// Registers a contract address. Write-once per role.
    ///
    /// # Errors
    ///
    /// Registry errors (`RegistryEntryExists`, `DuplicateContractAddress`).
    fn set_contract_address(&self, role: ContractRole, address: Address) -> PoeResult<()>;

    /// Looks up a contract address.
    ///
    /// # Errors
    ///
    /// `ContractNotFound` if the role was never registered.
    fn contract_address(&self, role: ContractRole) -> PoeResult<Address>;

    /// Snapshot of the whole registry.
    fn registry(&self) -> ContractAddressRegistry;

    /// Stores the system admin resolved at bootstrap.
    fn set_system_admin(&self, admin: Address);

    /// The system admin.
    ///
    /// # Errors
    ///
    /// `NotBootstrapped` before bootstrap stored it.
    fn system_admin(&self) -> PoeResult<Address>;

    /// Records engagement points granted to a new validator.
    fn set_initial_engagement_points(&self, operator: Address, points: u64);

    /// Engagement points granted to a validator at creation, if any.
    fn initial_engagement_points(&self, operator: &Address) -> Option<u64>;
}

// =============================================================================
// EVENTS
// =============================================================================

/// Receives the events emitted by a handler.
pub trait EventSink: Send + Sync {
    /// Appends events to the current transaction's event log.
    fn emit(&self, events: Vec<PoeEvent>);
}
