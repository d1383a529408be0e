use super::{ensure_ratio, total_points};
use crate::adapters::host::native::{
    from_json, to_json, ContractResult, Deps, Env, NativeContract, Response, SubMsg,
};
use crate::contracts::engagement::{
    EngagementConfigResponse, EngagementExecuteMsg, EngagementQueryMsg,
};
use crate::contracts::oc_proposals::{
    OcProposal, OcProposalsConfigResponse, OcProposalsExecuteMsg, OcProposalsInitMsg,
    OcProposalsQueryMsg, ProposalResponse, ProposalStatus, Vote, VotingRules,
};
use crate::contracts::tg4::{MemberListResponse, MemberResponse};
use crate::contracts::trusted_circle::{TrustedCircleConfigResponse, TrustedCircleQueryMsg};
use crate::domain::value_objects::{Address, Decimal};
use crate::errors::ContractError;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
struct Proposal {
    title: String,
    proposer: Address,
    proposal: OcProposal,
    status: ProposalStatus,
    votes: BTreeMap<Address, (Vote, u64)>,
    total_weight: u64,
}

impl Proposal {
    fn tally(&self, vote: Vote) -> u64 {
        total_points(
            self.votes
                .values()
                .filter(|(v, _)| *v == vote)
                .map(|(_, weight)| *weight),
        )
    }

    fn to_response(&self, id: u64) -> ProposalResponse {
        ProposalResponse {
            id,
            title: self.title.clone(),
            proposer: self.proposer,
            proposal: self.proposal.clone(),
            status: self.status,
            yes: self.tally(Vote::Yes),
            no: self.tally(Vote::No),
            abstain: self.tally(Vote::Abstain),
            total_weight: self.total_weight,
        }
    }

    /// Decides an open proposal from the votes cast so far. There is no
    /// block clock, so a proposal passes as soon as quorum and threshold
    /// hold and is rejected once everyone voted without passing.
    fn update_status(&mut self, rules: &VotingRules) {
        if self.status != ProposalStatus::Open || self.total_weight == 0 {
            return;
        }
        let yes = self.tally(Vote::Yes);
        let no = self.tally(Vote::No);
        let voted = total_points(self.votes.values().map(|(_, weight)| *weight));

        let quorum_met = Decimal::from_ratio(voted, self.total_weight) >= rules.quorum;
        let threshold_met =
            yes > 0 && Decimal::from_ratio(yes, yes.saturating_add(no)) >= rules.threshold;
        if quorum_met && threshold_met {
            self.status = ProposalStatus::Passed;
        } else if voted >= self.total_weight {
            self.status = ProposalStatus::Rejected;
        }
    }
}

/// Oversight governance proposals.
///
/// Voting weight comes from the trusted circle. Passed engagement grants are
/// sent to the engagement contract with this contract as sender, so the
/// engagement contract must list this address as a privileged caller.
#[derive(Clone, Debug, Default)]
pub struct OcProposalsNative {
    group_contract: Option<Address>,
    engagement_contract: Option<Address>,
    rules: Option<VotingRules>,
    proposals: BTreeMap<u64, Proposal>,
    next_id: u64,
}

impl OcProposalsNative {
    /// Empty instance for the host factory.
    pub fn boxed() -> Box<dyn NativeContract> {
        Box::<Self>::default()
    }

    fn config(&self) -> ContractResult<(Address, Address, &VotingRules)> {
        match (self.group_contract, self.engagement_contract, self.rules.as_ref()) {
            (Some(group), Some(engagement), Some(rules)) => Ok((group, engagement, rules)),
            _ => Err(ContractError::Rule("proposals contract is not instantiated".into())),
        }
    }

    fn voter_weight(deps: Deps<'_>, group: Address, voter: Address) -> ContractResult<u64> {
        let resp: MemberResponse =
            deps.query(group, &TrustedCircleQueryMsg::Voter { addr: voter })?;
        resp.points
            .filter(|p| *p > 0)
            .ok_or_else(|| ContractError::Unauthorized(format!("{voter} is not a voting member")))
    }

    fn proposal_mut(&mut self, id: u64) -> ContractResult<&mut Proposal> {
        self.proposals
            .get_mut(&id)
            .ok_or_else(|| ContractError::NotFound(format!("proposal {id}")))
    }
}

impl NativeContract for OcProposalsNative {
    fn instantiate(&mut self, deps: Deps<'_>, _env: &Env, msg: &[u8]) -> ContractResult<Response> {
        let msg: OcProposalsInitMsg = from_json(msg)?;
        if msg.rules.voting_period == 0 {
            return Err(ContractError::InvalidMessage("voting period must be positive".into()));
        }
        ensure_ratio("quorum", msg.rules.quorum)?;
        ensure_ratio("threshold", msg.rules.threshold)?;

        let _: TrustedCircleConfigResponse =
            deps.query(msg.group_contract, &TrustedCircleQueryMsg::Configuration {})?;
        let _: EngagementConfigResponse =
            deps.query(msg.engagement_contract, &EngagementQueryMsg::Configuration {})?;

        self.group_contract = Some(msg.group_contract);
        self.engagement_contract = Some(msg.engagement_contract);
        self.rules = Some(msg.rules);
        self.next_id = 1;
        Ok(Response::new())
    }

    fn execute(&mut self, deps: Deps<'_>, env: &Env, msg: &[u8]) -> ContractResult<Response> {
        env.nonpayable()?;
        let msg: OcProposalsExecuteMsg = from_json(msg)?;
        let (group, engagement, rules) = self.config()?;
        let rules = rules.clone();

        match msg {
            OcProposalsExecuteMsg::Propose {
                title,
                description: _,
                proposal,
            } => {
                if title.is_empty() {
                    return Err(ContractError::InvalidMessage("empty proposal title".into()));
                }
                let weight = Self::voter_weight(deps, group, env.sender)?;
                let voters: MemberListResponse =
                    deps.query(group, &TrustedCircleQueryMsg::ListVoters {})?;
                let mut proposal = Proposal {
                    title,
                    proposer: env.sender,
                    proposal,
                    status: ProposalStatus::Open,
                    votes: BTreeMap::from([(env.sender, (Vote::Yes, weight))]),
                    total_weight: total_points(voters.members.iter().map(|m| m.points)),
                };
                proposal.update_status(&rules);

                let id = self.next_id;
                self.next_id += 1;
                self.proposals.insert(id, proposal);
                Ok(Response::new().set_data(to_json(&id)?))
            }
            OcProposalsExecuteMsg::Vote { proposal_id, vote } => {
                let weight = Self::voter_weight(deps, group, env.sender)?;
                let proposal = self.proposal_mut(proposal_id)?;
                if proposal.status != ProposalStatus::Open {
                    return Err(ContractError::Rule(format!("proposal {proposal_id} is closed")));
                }
                if proposal.votes.contains_key(&env.sender) {
                    return Err(ContractError::AlreadyExists(format!(
                        "vote of {} on proposal {proposal_id}",
                        env.sender
                    )));
                }
                proposal.votes.insert(env.sender, (vote, weight));
                proposal.update_status(&rules);
                Ok(Response::new())
            }
            OcProposalsExecuteMsg::Execute { proposal_id } => {
                let proposal = self.proposal_mut(proposal_id)?;
                if proposal.status != ProposalStatus::Passed {
                    return Err(ContractError::Rule(format!(
                        "proposal {proposal_id} has not passed"
                    )));
                }
                proposal.status = ProposalStatus::Executed;
                let msg = match &proposal.proposal {
                    OcProposal::GrantEngagement { member, points } => {
                        EngagementExecuteMsg::AddPoints {
                            addr: *member,
                            points: *points,
                        }
                    }
                };
                Ok(Response::new().add_message(SubMsg::Execute {
                    contract: engagement,
                    msg: to_json(&msg)?,
                    funds: vec![],
                }))
            }
        }
    }

    fn query(&self, _deps: Deps<'_>, msg: &[u8]) -> ContractResult<Vec<u8>> {
        let msg: OcProposalsQueryMsg = from_json(msg)?;
        let (group, engagement, rules) = self.config()?;
        match msg {
            OcProposalsQueryMsg::Rules {} => to_json(rules),
            OcProposalsQueryMsg::Proposal { proposal_id } => {
                let proposal = self
                    .proposals
                    .get(&proposal_id)
                    .ok_or_else(|| ContractError::NotFound(format!("proposal {proposal_id}")))?;
                to_json(&proposal.to_response(proposal_id))
            }
            OcProposalsQueryMsg::Configuration {} => to_json(&OcProposalsConfigResponse {
                group_contract: group,
                engagement_contract: engagement,
            }),
        }
    }

    fn clone_box(&self) -> Box<dyn NativeContract> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal(total_weight: u64) -> Proposal {
        Proposal {
            title: "grant".into(),
            proposer: Address::new([1u8; 20]),
            proposal: OcProposal::GrantEngagement {
                member: Address::new([9u8; 20]),
                points: 10,
            },
            status: ProposalStatus::Open,
            votes: BTreeMap::new(),
            total_weight,
        }
    }

    fn rules() -> VotingRules {
        VotingRules {
            voting_period: 1,
            quorum: Decimal::percent(50),
            threshold: Decimal::percent(66),
            allow_end_early: true,
        }
    }

    #[test]
    fn test_passes_on_quorum_and_threshold() {
        let mut p = proposal(3);
        p.votes.insert(Address::new([1u8; 20]), (Vote::Yes, 1));
        p.update_status(&rules());
        assert_eq!(p.status, ProposalStatus::Open);

        p.votes.insert(Address::new([2u8; 20]), (Vote::Yes, 1));
        p.update_status(&rules());
        assert_eq!(p.status, ProposalStatus::Passed);
    }

    #[test]
    fn test_rejected_once_everyone_voted() {
        let mut p = proposal(3);
        p.votes.insert(Address::new([1u8; 20]), (Vote::Yes, 1));
        p.votes.insert(Address::new([2u8; 20]), (Vote::No, 1));
        p.update_status(&rules());
        assert_eq!(p.status, ProposalStatus::Open);

        p.votes.insert(Address::new([3u8; 20]), (Vote::Abstain, 1));
        p.update_status(&rules());
        assert_eq!(p.status, ProposalStatus::Rejected);
    }

    #[test]
    fn test_tallies_in_response() {
        let mut p = proposal(3);
        p.votes.insert(Address::new([1u8; 20]), (Vote::Yes, 1));
        p.votes.insert(Address::new([2u8; 20]), (Vote::Abstain, 1));
        let resp = p.to_response(7);
        assert_eq!((resp.id, resp.yes, resp.no, resp.abstain), (7, 1, 0, 1));
    }
}
