//! # Proof-of-Engagement Service
//!
//! Wires the contract host, the module keeper and the event sink into the
//! two driving ports:
//!
//! - `BootstrapApi`: genesis bootstrap of the contract suite, post-bootstrap
//!   verification and full genesis processing
//! - `ValidatorLifecycleApi`: `CreateValidator` / `UpdateValidator`
//!
//! The service holds no contract state of its own. Contract addresses live in
//! the keeper, everything else in the contracts.

mod bootstrap;
mod genesis;
mod lifecycle;
mod verify;

use crate::adapters::{InMemoryContractHost, InMemoryEventSink, InMemoryKeeper};
use crate::config::PoeConfig;
use crate::contracts::bundle::ContractCodeBundle;
use crate::domain::entities::{ContractRole, ValidatorRecord};
use crate::domain::genesis::GenesisConfiguration;
use crate::domain::invariants::BootstrapCheckResult;
use crate::domain::messages::{MsgCreateValidator, MsgUpdateValidator};
use crate::domain::registry::ContractAddressRegistry;
use crate::domain::value_objects::Address;
use crate::errors::PoeResult;
use crate::ports::inbound::{BootstrapApi, ValidatorLifecycleApi};
use crate::ports::outbound::{ContractHost, EventSink, PoeKeeper, PrivilegeGranter};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Statistics of the Proof-of-Engagement service.
#[derive(Debug, Default, Clone)]
pub struct ServiceStats {
    /// Successful `CreateValidator` transactions.
    pub validators_created: u64,
    /// Successful `UpdateValidator` transactions.
    pub validators_updated: u64,
    /// Rejected validator transactions.
    pub rejected_transactions: u64,
}

/// Dependencies of `PoeService`.
pub struct PoeDependencies<H, K, E> {
    /// Contract host (also grants privileges).
    pub host: Arc<H>,
    /// Module keeper.
    pub keeper: Arc<K>,
    /// Event sink of the current transaction.
    pub events: Arc<E>,
    /// Module configuration.
    pub config: PoeConfig,
}

/// The Proof-of-Engagement service.
pub struct PoeService<H, K, E>
where
    H: ContractHost + PrivilegeGranter,
    K: PoeKeeper,
    E: EventSink,
{
    host: Arc<H>,
    keeper: Arc<K>,
    events: Arc<E>,
    config: PoeConfig,
    stats: Arc<RwLock<ServiceStats>>,
}

impl<H, K, E> PoeService<H, K, E>
where
    H: ContractHost + PrivilegeGranter,
    K: PoeKeeper,
    E: EventSink,
{
    /// Creates the service.
    pub fn new(deps: PoeDependencies<H, K, E>) -> Self {
        Self {
            host: deps.host,
            keeper: deps.keeper,
            events: deps.events,
            config: deps.config,
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        }
    }

    /// Current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// Module configuration.
    pub fn config(&self) -> &PoeConfig {
        &self.config
    }

    /// The contract host.
    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    /// The module keeper.
    pub fn keeper(&self) -> &Arc<K> {
        &self.keeper
    }

    /// The event sink.
    pub fn events(&self) -> &Arc<E> {
        &self.events
    }

    fn contract(&self, role: ContractRole) -> PoeResult<Address> {
        self.keeper.contract_address(role)
    }
}

/// Service over the in-memory adapters with default configuration.
pub fn create_test_service() -> PoeService<InMemoryContractHost, InMemoryKeeper, InMemoryEventSink>
{
    PoeService::new(PoeDependencies {
        host: Arc::new(InMemoryContractHost::with_native_contracts()),
        keeper: Arc::new(InMemoryKeeper::new()),
        events: Arc::new(InMemoryEventSink::new()),
        config: PoeConfig::default(),
    })
}

// =============================================================================
// PORT IMPLEMENTATIONS
// =============================================================================

#[async_trait]
impl<H, K, E> BootstrapApi for PoeService<H, K, E>
where
    H: ContractHost + PrivilegeGranter,
    K: PoeKeeper,
    E: EventSink,
{
    async fn bootstrap(
        &self,
        genesis: &GenesisConfiguration,
        codes: &ContractCodeBundle,
    ) -> PoeResult<ContractAddressRegistry> {
        self.bootstrap_contracts(genesis, codes).await
    }

    async fn verify_bootstrap(
        &self,
        genesis: &GenesisConfiguration,
    ) -> PoeResult<BootstrapCheckResult> {
        self.check_bootstrap(genesis).await
    }

    async fn init_genesis(
        &self,
        genesis: &GenesisConfiguration,
        codes: &ContractCodeBundle,
    ) -> PoeResult<ContractAddressRegistry> {
        self.process_genesis(genesis, codes).await
    }
}

#[async_trait]
impl<H, K, E> ValidatorLifecycleApi for PoeService<H, K, E>
where
    H: ContractHost + PrivilegeGranter,
    K: PoeKeeper,
    E: EventSink,
{
    async fn create_validator(&self, msg: MsgCreateValidator) -> PoeResult<()> {
        self.handle_create_validator(msg).await
    }

    async fn update_validator(&self, msg: MsgUpdateValidator) -> PoeResult<()> {
        self.handle_update_validator(msg).await
    }

    async fn validator(&self, operator: Address) -> PoeResult<Option<ValidatorRecord>> {
        self.query_validator(operator).await
    }
}
