//! # Driving Ports (API - Inbound)
//!
//! Entry points exposed to genesis processing and transaction delivery.

use crate::contracts::bundle::ContractCodeBundle;
use crate::domain::entities::{ValidatorRecord, ValidatorState};
use crate::domain::genesis::GenesisConfiguration;
use crate::domain::invariants::BootstrapCheckResult;
use crate::domain::messages::{MsgCreateValidator, MsgUpdateValidator};
use crate::domain::registry::ContractAddressRegistry;
use crate::domain::value_objects::Address;
use crate::errors::PoeResult;
use async_trait::async_trait;

/// Genesis-time operations.
#[async_trait]
pub trait BootstrapApi: Send + Sync {
    /// Stores, instantiates and wires the contract suite.
    ///
    /// Runs once. Any error is fatal and leaves no recoverable state.
    async fn bootstrap(
        &self,
        genesis: &GenesisConfiguration,
        codes: &ContractCodeBundle,
    ) -> PoeResult<ContractAddressRegistry>;

    /// Checks the post-bootstrap expectations without changing state.
    async fn verify_bootstrap(
        &self,
        genesis: &GenesisConfiguration,
    ) -> PoeResult<BootstrapCheckResult>;

    /// Full genesis: validate, bootstrap, seed the oversight community and
    /// deliver the genesis validator transactions.
    async fn init_genesis(
        &self,
        genesis: &GenesisConfiguration,
        codes: &ContractCodeBundle,
    ) -> PoeResult<ContractAddressRegistry>;
}

/// Validator transactions and queries.
#[async_trait]
pub trait ValidatorLifecycleApi: Send + Sync {
    /// Registers a validator, bonds its self-stake and grants initial
    /// engagement points.
    async fn create_validator(&self, msg: MsgCreateValidator) -> PoeResult<()>;

    /// Merges a description delta into the validator's metadata.
    async fn update_validator(&self, msg: MsgUpdateValidator) -> PoeResult<()>;

    /// Assembles the validator record from the contracts.
    async fn validator(&self, operator: Address) -> PoeResult<Option<ValidatorRecord>>;

    /// Lifecycle state of an operator.
    async fn validator_state(&self, operator: Address) -> PoeResult<ValidatorState> {
        Ok(match self.validator(operator).await? {
            Some(record) => record.state(),
            None => ValidatorState::Unregistered,
        })
    }
}
