//! tg4-engagement: engagement points group.
//!
//! The same code also backs the reward distribution contract the valset
//! instantiates for itself.

use super::tg4::Member;
use super::{execute, query, Tg4Group};
use crate::domain::value_objects::Address;
use crate::errors::HostError;
use crate::ports::outbound::ContractHost;
use serde::{Deserialize, Serialize};

/// Instantiate message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementInitMsg {
    /// Group admin, allowed to change members.
    pub admin: Option<Address>,
    /// Initial members.
    pub members: Vec<Member>,
    /// Pre-authorized hook registrations.
    pub preauths_hooks: u64,
    /// Pre-authorized slashers.
    pub preauths_slashing: u64,
    /// Reward token denomination.
    pub token: String,
    /// Points half-life in seconds.
    pub halflife: Option<u64>,
    /// Contracts allowed to grant points besides the admin.
    #[serde(default)]
    pub privileged_callers: Vec<Address>,
}

/// Execute messages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementExecuteMsg {
    /// Admin only. Replaces points of `add`, deletes `remove`.
    UpdateMembers {
        /// Members to add or overwrite.
        add: Vec<Member>,
        /// Members to remove.
        remove: Vec<Address>,
    },
    /// Admin or privileged caller. Adds points to a member.
    AddPoints {
        /// Member account.
        addr: Address,
        /// Points to add.
        points: u64,
    },
}

/// Contract-specific queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementQueryMsg {
    /// Instantiation parameters.
    Configuration {},
}

/// Response to `Configuration`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementConfigResponse {
    /// Reward token denomination.
    pub token: String,
    /// Half-life in seconds.
    pub halflife: Option<u64>,
    /// Remaining hook pre-authorizations.
    pub preauths_hooks: u64,
    /// Remaining slashing pre-authorizations.
    pub preauths_slashing: u64,
    /// Contracts allowed to grant points.
    pub privileged_callers: Vec<Address>,
}

/// Typed access to an engagement contract.
pub struct EngagementContract<'a, H: ?Sized> {
    address: Address,
    host: &'a H,
}

impl<'a, H: ContractHost + ?Sized> EngagementContract<'a, H> {
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

    /// Sets `members` as `sender` (must be the admin).
    ///
    /// # Errors
    ///
    /// Host errors, including contract rejection.
    pub async fn update_members(
        &self,
        sender: Address,
        add: Vec<Member>,
        remove: Vec<Address>,
    ) -> Result<(), HostError> {
        let msg = EngagementExecuteMsg::UpdateMembers { add, remove };
        execute(self.host, self.address, sender, &msg, &[]).await?;
        Ok(())
    }

    /// Adds points to `addr` as `sender`.
    ///
    /// # Errors
    ///
    /// Host errors, including contract rejection.
    pub async fn add_points(
        &self,
        sender: Address,
        addr: Address,
        points: u64,
    ) -> Result<(), HostError> {
        let msg = EngagementExecuteMsg::AddPoints { addr, points };
        execute(self.host, self.address, sender, &msg, &[]).await?;
        Ok(())
    }

    /// Instantiation parameters.
    ///
    /// # Errors
    ///
    /// Host or decoding errors.
    pub async fn configuration(&self) -> Result<EngagementConfigResponse, HostError> {
        query(self.host, self.address, &EngagementQueryMsg::Configuration {}).await
    }
}
