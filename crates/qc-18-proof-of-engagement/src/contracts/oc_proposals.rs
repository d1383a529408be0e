//! tgrade-oc-proposals: governance proposals of the oversight community.
//!
//! Voters are the oversight circle's voting members. Passed proposals are
//! executed against the engagement contract with the proposals contract as
//! sender, which is why the engagement contract must know this address
//! before it exists.

use super::{execute, query};
use crate::domain::value_objects::{Address, Decimal};
use crate::errors::HostError;
use crate::ports::outbound::ContractHost;
use serde::{Deserialize, Serialize};

/// Voting rules shared with the oversight circle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingRules {
    /// Voting period in days.
    pub voting_period: u32,
    /// Quorum ratio.
    pub quorum: Decimal,
    /// Threshold ratio.
    pub threshold: Decimal,
    /// Close votes early once decided.
    pub allow_end_early: bool,
}

/// Instantiate message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcProposalsInitMsg {
    /// Oversight circle providing the voters.
    pub group_contract: Address,
    /// Engagement contract that proposals act on.
    pub engagement_contract: Address,
    /// Voting rules.
    pub rules: VotingRules,
}

/// Proposal actions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcProposal {
    /// Grants engagement points to a member.
    GrantEngagement {
        /// Member account.
        member: Address,
        /// Points to grant.
        points: u64,
    },
}

/// Ballot options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vote {
    /// In favor.
    Yes,
    /// Against.
    No,
    /// Counts toward quorum only.
    Abstain,
}

/// Execute messages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcProposalsExecuteMsg {
    /// Opens a proposal. The proposer votes yes.
    Propose {
        /// Title.
        title: String,
        /// Free-form description.
        description: String,
        /// Action.
        proposal: OcProposal,
    },
    /// Casts a vote.
    Vote {
        /// Proposal id.
        proposal_id: u64,
        /// Ballot.
        vote: Vote,
    },
    /// Executes a passed proposal.
    Execute {
        /// Proposal id.
        proposal_id: u64,
    },
}

/// Queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcProposalsQueryMsg {
    /// Voting rules.
    Rules {},
    /// A single proposal.
    Proposal {
        /// Proposal id.
        proposal_id: u64,
    },
    /// Wiring of the contract.
    Configuration {},
}

/// Proposal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    /// Accepting votes.
    Open,
    /// Quorum and threshold met.
    Passed,
    /// Every voter voted and the threshold was missed.
    Rejected,
    /// Action applied.
    Executed,
}

/// Response to `Proposal`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalResponse {
    /// Proposal id.
    pub id: u64,
    /// Title.
    pub title: String,
    /// Proposer.
    pub proposer: Address,
    /// Action.
    pub proposal: OcProposal,
    /// Current state.
    pub status: ProposalStatus,
    /// Yes weight.
    pub yes: u64,
    /// No weight.
    pub no: u64,
    /// Abstain weight.
    pub abstain: u64,
    /// Total voting weight when opened.
    pub total_weight: u64,
}

/// Response to `Configuration`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcProposalsConfigResponse {
    /// Oversight circle.
    pub group_contract: Address,
    /// Engagement contract.
    pub engagement_contract: Address,
}

/// Typed access to an oversight proposals contract.
pub struct OcProposalsContract<'a, H: ?Sized> {
    address: Address,
    host: &'a H,
}

impl<'a, H: ContractHost + ?Sized> OcProposalsContract<'a, H> {
    /// Binds the adapter to a contract.
    pub fn new(address: Address, host: &'a H) -> Self {
        Self { address, host }
    }

    /// Contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Opens a proposal and returns its id.
    ///
    /// # Errors
    ///
    /// Host errors, including contract rejection for non-voters.
    pub async fn propose(
        &self,
        sender: Address,
        title: impl Into<String>,
        proposal: OcProposal,
    ) -> Result<u64, HostError> {
        let msg = OcProposalsExecuteMsg::Propose {
            title: title.into(),
            description: String::new(),
            proposal,
        };
        let data = execute(self.host, self.address, sender, &msg, &[]).await?;
        super::from_binary(&data)
    }

    /// Casts a vote.
    ///
    /// # Errors
    ///
    /// Host errors, including contract rejection.
    pub async fn vote(&self, sender: Address, proposal_id: u64, vote: Vote) -> Result<(), HostError> {
        let msg = OcProposalsExecuteMsg::Vote { proposal_id, vote };
        execute(self.host, self.address, sender, &msg, &[]).await?;
        Ok(())
    }

    /// Executes a passed proposal.
    ///
    /// # Errors
    ///
    /// Host errors, including contract rejection.
    pub async fn execute(&self, sender: Address, proposal_id: u64) -> Result<(), HostError> {
        let msg = OcProposalsExecuteMsg::Execute { proposal_id };
        execute(self.host, self.address, sender, &msg, &[]).await?;
        Ok(())
    }

    /// A single proposal.
    ///
    /// # Errors
    ///
    /// Host or decoding errors.
    pub async fn proposal(&self, proposal_id: u64) -> Result<ProposalResponse, HostError> {
        query(
            self.host,
            self.address,
            &OcProposalsQueryMsg::Proposal { proposal_id },
        )
        .await
    }

    /// Voting rules.
    ///
    /// # Errors
    ///
    /// Host or decoding errors.
    pub async fn rules(&self) -> Result<VotingRules, HostError> {
        query(self.host, self.address, &OcProposalsQueryMsg::Rules {}).await
    }

    /// Wiring of the contract.
    ///
    /// # Errors
    ///
    /// Host or decoding errors.
    pub async fn configuration(&self) -> Result<OcProposalsConfigResponse, HostError> {
        query(self.host, self.address, &OcProposalsQueryMsg::Configuration {}).await
    }
}
