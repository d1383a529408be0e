//! # In-Memory Contract Host
//!
//! `ContractHost` and `PrivilegeGranter` over native Rust contracts.
//!
//! Code blobs are resolved to native contract factories by checksum. Every
//! public call runs against a snapshot of the host state that is committed
//! only if the call, including all sub-messages it triggers, succeeds.

pub mod contracts;
pub mod native;

use crate::contracts::bundle::ContractCodeBundle;
use crate::domain::services::contract_address;
use crate::domain::value_objects::{AccessPermission, Address, CodeId, Coin, InstanceId, Uint128};
use crate::errors::{ContractError, HostError};
use crate::ports::outbound::{ContractHost, ContractInfo, HostSequences, PrivilegeGranter};
use async_trait::async_trait;
use native::{ContractResult, Deps, Env, NativeContract, NativeFactory, Querier, Reply, Response, SubMsg};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Deepest allowed sub-message nesting.
pub const MAX_DEPTH: usize = 10;

#[derive(Clone)]
struct StoredCode {
    checksum: String,
    factory: NativeFactory,
    creator: Address,
    permission: AccessPermission,
}

#[derive(Clone)]
struct ContractInstance {
    info: ContractInfo,
    contract: Box<dyn NativeContract>,
}

#[derive(Clone)]
struct HostState {
    factories: BTreeMap<String, NativeFactory>,
    codes: BTreeMap<CodeId, StoredCode>,
    contracts: BTreeMap<Address, ContractInstance>,
    balances: BTreeMap<(Address, String), Uint128>,
    pinned: BTreeSet<CodeId>,
    privileged: Vec<Address>,
    next_code_id: CodeId,
    next_instance_id: InstanceId,
    instantiations: u64,
    deny_privileges: bool,
    sequence_gap_after: Option<u64>,
}

impl HostState {
    fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
            codes: BTreeMap::new(),
            contracts: BTreeMap::new(),
            balances: BTreeMap::new(),
            pinned: BTreeSet::new(),
            privileged: Vec::new(),
            next_code_id: 1,
            next_instance_id: 1,
            instantiations: 0,
            deny_privileges: false,
            sequence_gap_after: None,
        }
    }

    fn balance(&self, address: Address, denom: &str) -> Uint128 {
        self.balances
            .get(&(address, denom.to_string()))
            .copied()
            .unwrap_or_default()
    }

    fn transfer(&mut self, from: Address, to: Address, funds: &[Coin]) -> Result<(), HostError> {
        for coin in funds.iter().filter(|c| !c.amount.is_zero()) {
            let available = self.balance(from, &coin.denom);
            let remaining = available
                .checked_sub(coin.amount)
                .map_err(|_| HostError::InsufficientFunds {
                    address: from,
                    required: coin.clone(),
                    available,
                })?;
            self.balances.insert((from, coin.denom.clone()), remaining);
            let credited = self.balance(to, &coin.denom) + coin.amount;
            self.balances.insert((to, coin.denom.clone()), credited);
        }
        Ok(())
    }

    fn ensure_depth(depth: usize) -> Result<(), HostError> {
        if depth > MAX_DEPTH {
            return Err(HostError::DepthExceeded {
                depth,
                max: MAX_DEPTH,
            });
        }
        Ok(())
    }

    fn store(
        &mut self,
        creator: Address,
        code: &[u8],
        permission: AccessPermission,
    ) -> Result<CodeId, HostError> {
        let checksum = ContractCodeBundle::checksum(code);
        let factory = *self
            .factories
            .get(&checksum)
            .ok_or_else(|| HostError::UnknownCode(checksum.clone()))?;
        let code_id = self.next_code_id;
        self.next_code_id += 1;
        self.codes.insert(
            code_id,
            StoredCode {
                checksum,
                factory,
                creator,
                permission,
            },
        );
        Ok(code_id)
    }

    fn next_address(&mut self, code_id: CodeId) -> Address {
        let address = contract_address(code_id, self.next_instance_id);
        self.next_instance_id += 1;
        self.instantiations += 1;
        if self.sequence_gap_after == Some(self.instantiations) {
            self.next_instance_id += 1;
        }
        address
    }

    #[allow(clippy::too_many_arguments)]
    fn instantiate_in(
        &mut self,
        depth: usize,
        code_id: CodeId,
        creator: Address,
        admin: Option<Address>,
        msg: &[u8],
        funds: &[Coin],
        label: &str,
    ) -> Result<(Address, Vec<u8>), HostError> {
        Self::ensure_depth(depth)?;
        let code = self
            .codes
            .get(&code_id)
            .ok_or(HostError::CodeNotFound(code_id))?;
        if !code.permission.allows(&creator) {
            return Err(HostError::InstantiateNotPermitted { code_id, creator });
        }
        let mut contract = (code.factory)();

        let address = self.next_address(code_id);
        self.transfer(creator, address, funds)?;
        let env = Env {
            contract: address,
            sender: creator,
            funds: funds.to_vec(),
        };
        let response = contract.instantiate(Deps::new(&*self), &env, msg)?;
        debug!(%address, code_id, label, "contract instantiated");

        self.contracts.insert(
            address,
            ContractInstance {
                info: ContractInfo {
                    code_id,
                    creator,
                    admin,
                    label: label.to_string(),
                },
                contract,
            },
        );
        let data = self.dispatch(depth, address, response)?;
        Ok((address, data))
    }

    fn execute_in(
        &mut self,
        depth: usize,
        contract: Address,
        sender: Address,
        msg: &[u8],
        funds: &[Coin],
    ) -> Result<Vec<u8>, HostError> {
        Self::ensure_depth(depth)?;
        if !self.contracts.contains_key(&contract) {
            return Err(HostError::ContractNotFound(contract));
        }
        self.transfer(sender, contract, funds)?;
        let env = Env {
            contract,
            sender,
            funds: funds.to_vec(),
        };
        let response = self.with_instance(contract, |instance, deps| {
            instance.execute(deps, &env, msg)
        })?;
        self.dispatch(depth, contract, response)
    }

    /// Runs `f` on an instance taken out of the map, so the call may query
    /// every other contract while it mutates itself.
    fn with_instance<F>(&mut self, contract: Address, f: F) -> Result<Response, HostError>
    where
        F: FnOnce(&mut Box<dyn NativeContract>, Deps<'_>) -> ContractResult<Response>,
    {
        let mut instance = self
            .contracts
            .remove(&contract)
            .ok_or(HostError::ContractNotFound(contract))?;
        let result = f(&mut instance.contract, Deps::new(&*self));
        self.contracts.insert(contract, instance);
        Ok(result?)
    }

    fn dispatch(
        &mut self,
        depth: usize,
        contract: Address,
        response: Response,
    ) -> Result<Vec<u8>, HostError> {
        for msg in response.messages {
            match msg {
                SubMsg::Execute {
                    contract: target,
                    msg,
                    funds,
                } => {
                    self.execute_in(depth + 1, target, contract, &msg, &funds)?;
                }
                SubMsg::Instantiate {
                    code_id,
                    msg,
                    funds,
                    label,
                    admin,
                    reply_id,
                } => {
                    let (address, data) =
                        self.instantiate_in(depth + 1, code_id, contract, admin, &msg, &funds, &label)?;
                    let env = Env {
                        contract,
                        sender: contract,
                        funds: vec![],
                    };
                    let reply = Reply {
                        id: reply_id,
                        contract_address: address,
                        data,
                    };
                    let response =
                        self.with_instance(contract, |instance, deps| instance.reply(deps, &env, reply))?;
                    self.dispatch(depth + 1, contract, response)?;
                }
            }
        }
        Ok(response.data.unwrap_or_default())
    }
}

impl Querier for HostState {
    fn query_raw(&self, contract: Address, msg: &[u8]) -> ContractResult<Vec<u8>> {
        let instance = self
            .contracts
            .get(&contract)
            .ok_or_else(|| ContractError::NotFound(format!("contract {contract}")))?;
        instance.contract.query(Deps::new(self), msg)
    }
}

/// In-memory contract host.
pub struct InMemoryContractHost {
    state: Mutex<HostState>,
}

impl InMemoryContractHost {
    /// Host without any known code.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HostState::new()),
        }
    }

    /// Host that resolves the native code bundle.
    #[must_use]
    pub fn with_native_contracts() -> Self {
        let host = Self::new();
        for (code, factory) in contracts::native_factories() {
            host.register_native(&code, factory);
        }
        host
    }

    /// Maps a code blob to a native contract factory.
    pub fn register_native(&self, code: &[u8], factory: NativeFactory) {
        self.state
            .lock()
            .factories
            .insert(ContractCodeBundle::checksum(code), factory);
    }

    /// Credits an account.
    pub fn fund(&self, address: Address, coin: &Coin) {
        let mut state = self.state.lock();
        let balance = state.balance(address, &coin.denom) + coin.amount;
        state.balances.insert((address, coin.denom.clone()), balance);
    }

    /// Balance of an account or contract.
    #[must_use]
    pub fn balance(&self, address: Address, denom: &str) -> Uint128 {
        self.state.lock().balance(address, denom)
    }

    /// Makes every later privilege grant fail.
    pub fn deny_privileges(&self) {
        self.state.lock().deny_privileges = true;
    }

    /// Skips one extra instance id after the `n`-th instantiation.
    #[must_use]
    pub fn with_sequence_gap_after(self, n: u64) -> Self {
        self.state.lock().sequence_gap_after = Some(n);
        self
    }

    /// Checksum of stored code.
    #[must_use]
    pub fn code_checksum(&self, code_id: CodeId) -> Option<String> {
        self.state.lock().codes.get(&code_id).map(|c| c.checksum.clone())
    }

    /// Account that stored the code.
    #[must_use]
    pub fn code_creator(&self, code_id: CodeId) -> Option<Address> {
        self.state.lock().codes.get(&code_id).map(|c| c.creator)
    }

    fn transact<T>(
        &self,
        f: impl FnOnce(&mut HostState) -> Result<T, HostError>,
    ) -> Result<T, HostError> {
        let mut state = self.state.lock();
        let mut scratch = state.clone();
        let out = f(&mut scratch)?;
        *state = scratch;
        Ok(out)
    }
}

impl Default for InMemoryContractHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContractHost for InMemoryContractHost {
    async fn create(
        &self,
        creator: Address,
        code: &[u8],
        permission: AccessPermission,
    ) -> Result<CodeId, HostError> {
        self.transact(|state| state.store(creator, code, permission))
    }

    async fn instantiate(
        &self,
        code_id: CodeId,
        creator: Address,
        admin: Option<Address>,
        init_msg: &[u8],
        funds: &[Coin],
        label: &str,
    ) -> Result<(Address, Vec<u8>), HostError> {
        self.transact(|state| {
            state.instantiate_in(0, code_id, creator, admin, init_msg, funds, label)
        })
    }

    async fn execute(
        &self,
        contract: Address,
        sender: Address,
        msg: &[u8],
        funds: &[Coin],
    ) -> Result<Vec<u8>, HostError> {
        self.transact(|state| state.execute_in(0, contract, sender, msg, funds))
    }

    async fn query(&self, contract: Address, msg: &[u8]) -> Result<Vec<u8>, HostError> {
        let state = self.state.lock();
        if !state.contracts.contains_key(&contract) {
            return Err(HostError::ContractNotFound(contract));
        }
        Ok(state.query_raw(contract, msg)?)
    }

    async fn pin_code(&self, code_id: CodeId) -> Result<(), HostError> {
        let mut state = self.state.lock();
        if !state.codes.contains_key(&code_id) {
            return Err(HostError::CodeNotFound(code_id));
        }
        state.pinned.insert(code_id);
        Ok(())
    }

    async fn is_pinned(&self, code_id: CodeId) -> Result<bool, HostError> {
        Ok(self.state.lock().pinned.contains(&code_id))
    }

    async fn contract_info(&self, contract: Address) -> Result<ContractInfo, HostError> {
        self.state
            .lock()
            .contracts
            .get(&contract)
            .map(|c| c.info.clone())
            .ok_or(HostError::ContractNotFound(contract))
    }

    async fn sequences(&self) -> Result<HostSequences, HostError> {
        let state = self.state.lock();
        Ok(HostSequences {
            next_code_id: state.next_code_id,
            next_instance_id: state.next_instance_id,
        })
    }
}

#[async_trait]
impl PrivilegeGranter for InMemoryContractHost {
    async fn set_privileged(&self, contract: Address) -> Result<(), HostError> {
        let mut state = self.state.lock();
        if !state.contracts.contains_key(&contract) {
            return Err(HostError::ContractNotFound(contract));
        }
        if state.deny_privileges {
            return Err(HostError::PrivilegeRejected(contract));
        }
        if state.privileged.contains(&contract) {
            return Err(HostError::AlreadyPrivileged(contract));
        }
        state.privileged.push(contract);
        Ok(())
    }

    async fn is_privileged(&self, contract: Address) -> Result<bool, HostError> {
        Ok(self.state.lock().privileged.contains(&contract))
    }

    async fn privileged_contracts(&self) -> Result<Vec<Address>, HostError> {
        Ok(self.state.lock().privileged.clone())
    }
}

// =============================================================================
// TESTS
// =============================================================================
