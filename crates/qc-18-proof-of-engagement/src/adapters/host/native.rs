//! Native contract interface of the in-memory host.
//!
//! Contracts are plain Rust state machines. They receive JSON messages,
//! may query other contracts through `Deps`, and return a `Response` whose
//! sub-messages the host dispatches after the call.

use crate::domain::value_objects::{Address, CodeId, Coin, Uint128};
use crate::errors::ContractError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Result type of native contract entry points.
pub type ContractResult<T> = Result<T, ContractError>;

/// Call context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Env {
    /// Address of the called contract.
    pub contract: Address,
    /// Caller (account or contract).
    pub sender: Address,
    /// Funds already moved to the contract by the host.
    pub funds: Vec<Coin>,
}

impl Env {
    /// Requires exactly one coin of `denom` and returns its amount.
    ///
    /// # Errors
    ///
    /// `InvalidFunds` for missing, extra or foreign coins.
    pub fn must_pay(&self, denom: &str) -> ContractResult<Uint128> {
        match self.funds.as_slice() {
            [coin] if coin.denom == denom && !coin.amount.is_zero() => Ok(coin.amount),
            [] => Err(ContractError::InvalidFunds(format!("no {denom} attached"))),
            _ => Err(ContractError::InvalidFunds(format!(
                "expected a single {denom} coin"
            ))),
        }
    }

    /// Requires that no funds were attached.
    ///
    /// # Errors
    ///
    /// `InvalidFunds` if any coin was sent.
    pub fn nonpayable(&self) -> ContractResult<()> {
        if self.funds.iter().any(|c| !c.amount.is_zero()) {
            return Err(ContractError::InvalidFunds("call is not payable".into()));
        }
        Ok(())
    }
}

/// Messages a contract asks the host to dispatch after it returns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubMsg {
    /// Execute another contract with this contract as sender.
    Execute {
        /// Target contract.
        contract: Address,
        /// JSON message.
        msg: Vec<u8>,
        /// Funds sent from this contract.
        funds: Vec<Coin>,
    },
    /// Instantiate a contract with this contract as creator. The host
    /// calls `reply` with the new address.
    Instantiate {
        /// Code to instantiate.
        code_id: CodeId,
        /// JSON instantiate message.
        msg: Vec<u8>,
        /// Funds sent from this contract.
        funds: Vec<Coin>,
        /// Instance label.
        label: String,
        /// Migration admin.
        admin: Option<Address>,
        /// Id passed back in the reply.
        reply_id: u64,
    },
}

/// Result of a sub-message instantiation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    /// Id given in the sub-message.
    pub id: u64,
    /// Address of the new contract.
    pub contract_address: Address,
    /// Response data of the new contract.
    pub data: Vec<u8>,
}

/// Contract response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Response {
    /// Sub-messages, dispatched in order.
    pub messages: Vec<SubMsg>,
    /// Data returned to the caller.
    pub data: Option<Vec<u8>>,
}

impl Response {
    /// Empty response.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sub-message.
    #[must_use]
    pub fn add_message(mut self, msg: SubMsg) -> Self {
        self.messages.push(msg);
        self
    }

    /// Sets the response data.
    #[must_use]
    pub fn set_data(mut self, data: Vec<u8>) -> Self {
        self.data = Some(data);
        self
    }
}

/// Read-only access to other contracts.
pub trait Querier {
    /// Runs a raw JSON query against `contract`.
    ///
    /// # Errors
    ///
    /// Errors of the queried contract, or `NotFound` for unknown addresses.
    fn query_raw(&self, contract: Address, msg: &[u8]) -> ContractResult<Vec<u8>>;
}

/// Dependencies available to contract entry points.
#[derive(Clone, Copy)]
pub struct Deps<'a> {
    querier: &'a dyn Querier,
}

impl<'a> Deps<'a> {
    /// Wraps a querier.
    pub fn new(querier: &'a dyn Querier) -> Self {
        Self { querier }
    }

    /// Runs a typed query.
    ///
    /// # Errors
    ///
    /// Errors of the queried contract or decoding errors.
    pub fn query<Q: Serialize, R: DeserializeOwned>(
        &self,
        contract: Address,
        msg: &Q,
    ) -> ContractResult<R> {
        let bytes = self.querier.query_raw(contract, &to_json(msg)?)?;
        from_json(&bytes)
    }
}

/// A contract instance.
pub trait NativeContract: Send + Sync {
    /// Initializes state.
    ///
    /// # Errors
    ///
    /// Any contract error aborts the instantiation.
    fn instantiate(&mut self, deps: Deps<'_>, env: &Env, msg: &[u8]) -> ContractResult<Response>;

    /// Handles an execute message.
    ///
    /// # Errors
    ///
    /// Any contract error aborts the call.
    fn execute(&mut self, deps: Deps<'_>, env: &Env, msg: &[u8]) -> ContractResult<Response>;

    /// Answers a query.
    ///
    /// # Errors
    ///
    /// Unknown queries or failed lookups.
    fn query(&self, deps: Deps<'_>, msg: &[u8]) -> ContractResult<Vec<u8>>;

    /// Receives the result of an instantiate sub-message.
    ///
    /// # Errors
    ///
    /// Contracts that never instantiate reject every reply.
    fn reply(&mut self, _deps: Deps<'_>, _env: &Env, reply: Reply) -> ContractResult<Response> {
        Err(ContractError::Rule(format!("unexpected reply {}", reply.id)))
    }

    /// Clones the instance for snapshots.
    fn clone_box(&self) -> Box<dyn NativeContract>;
}

impl Clone for Box<dyn NativeContract> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Creates an empty contract instance.
pub type NativeFactory = fn() -> Box<dyn NativeContract>;

/// Encodes a JSON payload.
///
/// # Errors
///
/// `InvalidMessage` if serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> ContractResult<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// Decodes a JSON payload.
///
/// # Errors
///
/// `InvalidMessage` on malformed input.
pub fn from_json<T: DeserializeOwned>(bytes: &[u8]) -> ContractResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(funds: Vec<Coin>) -> Env {
        Env {
            contract: Address::new([1u8; 20]),
            sender: Address::new([2u8; 20]),
            funds,
        }
    }

    #[test]
    fn test_must_pay() {
        assert_eq!(
            env(vec![Coin::new(5, "utgd")]).must_pay("utgd").unwrap(),
            Uint128::new(5)
        );
        assert!(env(vec![]).must_pay("utgd").is_err());
        assert!(env(vec![Coin::new(5, "uatom")]).must_pay("utgd").is_err());
        assert!(env(vec![Coin::new(5, "utgd"), Coin::new(1, "uatom")])
            .must_pay("utgd")
            .is_err());
    }

    #[test]
    fn test_nonpayable() {
        assert!(env(vec![]).nonpayable().is_ok());
        assert!(env(vec![Coin::new(0, "utgd")]).nonpayable().is_ok());
        assert!(env(vec![Coin::new(1, "utgd")]).nonpayable().is_err());
    }

    #[test]
    fn test_response_builder() {
        let resp = Response::new()
            .add_message(SubMsg::Execute {
                contract: Address::ZERO,
                msg: b"{}".to_vec(),
                funds: vec![],
            })
            .set_data(b"1".to_vec());
        assert_eq!(resp.messages.len(), 1);
        assert_eq!(resp.data.as_deref(), Some(&b"1"[..]));
    }
}
