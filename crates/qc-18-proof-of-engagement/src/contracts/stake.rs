//! tg4-stake: validator group weighted by bonded tokens.

use super::{execute, query, Tg4Group};
use crate::domain::value_objects::{Address, Coin, Uint128};
use crate::errors::HostError;
use crate::ports::outbound::ContractHost;
use serde::{Deserialize, Serialize};

/// Instantiate message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeInitMsg {
    /// Group admin.
    pub admin: Option<Address>,
    /// Bonding denomination.
    pub denom: String,
    /// Minimum stake to count as a member.
    pub min_bond: Uint128,
    /// Tokens per point.
    pub tokens_per_point: Uint128,
    /// Unbonding period in seconds.
    pub unbonding_period: u64,
    /// Mature claims returned automatically per block.
    pub auto_return_limit: u64,
    /// Pre-authorized hook registrations.
    pub preauths_hooks: u64,
    /// Pre-authorized slashers.
    pub preauths_slashing: u64,
}

/// Execute messages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeExecuteMsg {
    /// Bonds the attached funds for the sender.
    Bond {},
}

/// Contract-specific queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeQueryMsg {
    /// Bonded amount of an account.
    Staked {
        /// Account.
        address: Address,
    },
    /// Instantiation parameters.
    Configuration {},
}

/// Response to `Staked`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakedResponse {
    /// Bonded amount.
    pub stake: Coin,
}

/// Response to `Configuration`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeConfigResponse {
    /// Bonding denomination.
    pub denom: String,
    /// Tokens per point.
    pub tokens_per_point: Uint128,
    /// Minimum stake.
    pub min_bond: Uint128,
    /// Unbonding period in seconds.
    pub unbonding_period: u64,
    /// Auto-return limit.
    pub auto_return_limit: u64,
}

/// Typed access to a stake contract.
pub struct StakeContract<'a, H: ?Sized> {
    address: Address,
    host: &'a H,
}

impl<'a, H: ContractHost + ?Sized> StakeContract<'a, H> {
    /// Binds the adapter to a contract.
    pub fn new(address: Address, host: &'a H) -> Self {
        Self { address, host }
    }

    /// Contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Shared group queries.
    pub fn group(&self) -> Tg4Group<'a, H> {
        Tg4Group::new(self.address, self.host)
    }

    /// Bonds `amount` from `staker`.
    ///
    /// # Errors
    ///
    /// Host errors, including insufficient funds and wrong denomination.
    pub async fn bond(&self, staker: Address, amount: Coin) -> Result<(), HostError> {
        execute(self.host, self.address, staker, &StakeExecuteMsg::Bond {}, &[amount]).await?;
        Ok(())
    }

    /// Bonded amount of `address`.
    ///
    /// # Errors
    ///
    /// Host or decoding errors.
    pub async fn staked(&self, address: Address) -> Result<Coin, HostError> {
        let resp: StakedResponse =
            query(self.host, self.address, &StakeQueryMsg::Staked { address }).await?;
        Ok(resp.stake)
    }

    /// Instantiation parameters.
    ///
    /// # Errors
    ///
    /// Host or decoding errors.
    pub async fn configuration(&self) -> Result<StakeConfigResponse, HostError> {
        query(self.host, self.address, &StakeQueryMsg::Configuration {}).await
    }
}
