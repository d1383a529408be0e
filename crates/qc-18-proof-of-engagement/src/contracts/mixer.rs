//! tg4-mixer: combines engagement and stake weights.

use super::{query, Tg4Group};
use crate::domain::value_objects::Address;
use crate::errors::HostError;
use crate::ports::outbound::ContractHost;
use serde::{Deserialize, Serialize};

/// Mixing function.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixerFunction {
    /// `floor(sqrt(left * right))`.
    GeometricMean {},
}

/// Instantiate message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixerInitMsg {
    /// First input group.
    pub left_group: Address,
    /// Second input group.
    pub right_group: Address,
    /// Mixing function.
    pub function_type: MixerFunction,
}

/// Contract-specific queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixerQueryMsg {
    /// Input groups and function.
    Groups {},
}

/// Response to `Groups`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupsResponse {
    /// First input group.
    pub left: Address,
    /// Second input group.
    pub right: Address,
    /// Mixing function.
    pub function_type: MixerFunction,
}

/// Typed access to a mixer contract.
pub struct MixerContract<'a, H: ?Sized> {
    address: Address,
    host: &'a H,
}

impl<'a, H: ContractHost + ?Sized> MixerContract<'a, H> {
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

    /// Input groups and function.
    ///
    /// # Errors
    ///
    /// Host or decoding errors.
    pub async fn groups(&self) -> Result<GroupsResponse, HostError> {
        query(self.host, self.address, &MixerQueryMsg::Groups {}).await
    }
}
