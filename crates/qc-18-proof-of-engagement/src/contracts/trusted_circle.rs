//! tgrade-trusted-circle: the oversight community.
//!
//! Voting members must hold a paid-up escrow. The instantiator's attached
//! funds form the circle's founding escrow.

use super::tg4::{MemberListResponse, MemberResponse};
use super::{execute, query};
use crate::domain::value_objects::{Address, Coin, Decimal, Uint128};
use crate::errors::HostError;
use crate::ports::outbound::ContractHost;
use serde::{Deserialize, Serialize};

/// Instantiate message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedCircleInitMsg {
    /// Circle name.
    pub name: String,
    /// Escrow each voting member must deposit.
    pub escrow_amount: Uint128,
    /// Voting period in days.
    pub voting_period: u32,
    /// Quorum ratio.
    pub quorum: Decimal,
    /// Threshold ratio.
    pub threshold: Decimal,
    /// Close votes early once decided.
    pub allow_end_early: bool,
    /// Initial non-voting members.
    pub initial_members: Vec<Address>,
    /// Deny-list contract.
    pub deny_list: Option<Address>,
    /// Freeze the circle configuration.
    pub edit_trusted_circle_disabled: bool,
}

/// Execute messages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustedCircleExecuteMsg {
    /// Admin only. Admits members who become voters once their escrow is
    /// paid.
    AddVotingMembers {
        /// New voting members.
        voters: Vec<Address>,
    },
    /// Pays (part of) the sender's escrow with the attached funds.
    DepositEscrow {},
    /// Changes the voting rules unless editing is disabled.
    UpdateConfig {
        /// New quorum ratio.
        quorum: Option<Decimal>,
        /// New threshold ratio.
        threshold: Option<Decimal>,
    },
}

/// Queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustedCircleQueryMsg {
    /// Circle parameters.
    Configuration {},
    /// Voting weight of one member.
    Voter {
        /// Member account.
        addr: Address,
    },
    /// All voting members.
    ListVoters {},
    /// All non-voting members.
    ListNonVotingMembers {},
    /// Escrow status of a member.
    Escrow {
        /// Member account.
        addr: Address,
    },
}

/// Response to `Configuration`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedCircleConfigResponse {
    /// Circle name.
    pub name: String,
    /// Escrow per voting member.
    pub escrow_amount: Coin,
    /// Voting period in days.
    pub voting_period: u32,
    /// Quorum ratio.
    pub quorum: Decimal,
    /// Threshold ratio.
    pub threshold: Decimal,
    /// Close votes early once decided.
    pub allow_end_early: bool,
    /// Deny-list contract.
    pub deny_list: Option<Address>,
    /// Configuration frozen.
    pub edit_trusted_circle_disabled: bool,
}

/// Escrow state of a member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscrowStatus {
    /// Admitted, escrow not yet complete.
    Pending,
    /// Escrow paid, voting.
    Voting,
}

/// Response to `Escrow`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowResponse {
    /// Amount deposited.
    pub paid: Uint128,
    /// Current status.
    pub status: EscrowStatus,
}

/// Typed access to a trusted circle contract.
pub struct TrustedCircleContract<'a, H: ?Sized> {
    address: Address,
    host: &'a H,
}

impl<'a, H: ContractHost + ?Sized> TrustedCircleContract<'a, H> {
    /// Binds the adapter to a contract.
    pub fn new(address: Address, host: &'a H) -> Self {
        Self { address, host }
    }

    /// Contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Admits voting members as `sender` (must be the admin).
    ///
    /// # Errors
    ///
    /// Host errors, including contract rejection.
    pub async fn add_voting_members(
        &self,
        sender: Address,
        voters: Vec<Address>,
    ) -> Result<(), HostError> {
        let msg = TrustedCircleExecuteMsg::AddVotingMembers { voters };
        execute(self.host, self.address, sender, &msg, &[]).await?;
        Ok(())
    }

    /// Deposits escrow for `sender`.
    ///
    /// # Errors
    ///
    /// Host errors, including insufficient funds.
    pub async fn deposit_escrow(&self, sender: Address, amount: Coin) -> Result<(), HostError> {
        let msg = TrustedCircleExecuteMsg::DepositEscrow {};
        execute(self.host, self.address, sender, &msg, &[amount]).await?;
        Ok(())
    }

    /// All voting members.
    ///
    /// # Errors
    ///
    /// Host or decoding errors.
    pub async fn list_voters(&self) -> Result<MemberListResponse, HostError> {
        query(self.host, self.address, &TrustedCircleQueryMsg::ListVoters {}).await
    }

    /// All non-voting members.
    ///
    /// # Errors
    ///
    /// Host or decoding errors.
    pub async fn list_non_voting_members(&self) -> Result<MemberListResponse, HostError> {
        query(
            self.host,
            self.address,
            &TrustedCircleQueryMsg::ListNonVotingMembers {},
        )
        .await
    }

    /// Voting weight of `addr`.
    ///
    /// # Errors
    ///
    /// Host or decoding errors.
    pub async fn voter(&self, addr: Address) -> Result<Option<u64>, HostError> {
        let resp: MemberResponse =
            query(self.host, self.address, &TrustedCircleQueryMsg::Voter { addr }).await?;
        Ok(resp.points)
    }

    /// Escrow status of `addr`, None if not a member.
    ///
    /// # Errors
    ///
    /// Host or decoding errors.
    pub async fn escrow(&self, addr: Address) -> Result<Option<EscrowResponse>, HostError> {
        query(self.host, self.address, &TrustedCircleQueryMsg::Escrow { addr }).await
    }

    /// Circle parameters.
    ///
    /// # Errors
    ///
    /// Host or decoding errors.
    pub async fn configuration(&self) -> Result<TrustedCircleConfigResponse, HostError> {
        query(self.host, self.address, &TrustedCircleQueryMsg::Configuration {}).await
    }
}
