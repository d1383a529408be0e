//! # Governance Flow
//!
//! The oversight community votes engagement points to an account. The
//! proposals contract was only a predicted address when the engagement
//! group listed it as privileged caller; executing a passed proposal proves
//! the forward reference held.

use super::fixtures::*;
use qc_18_proof_of_engagement::contracts::engagement::EngagementContract;
use qc_18_proof_of_engagement::contracts::mixer::MixerContract;
use qc_18_proof_of_engagement::contracts::oc_proposals::{
    OcProposal, OcProposalsContract, ProposalStatus, Vote,
};
use qc_18_proof_of_engagement::contracts::trusted_circle::{EscrowStatus, TrustedCircleContract};
use qc_18_proof_of_engagement::prelude::*;

fn proposals(chain: &TestChain) -> OcProposalsContract<'_, InMemoryContractHost> {
    OcProposalsContract::new(chain.contract(ContractRole::OversightProposals), chain.host())
}

#[tokio::test]
async fn test_oversight_voters_hold_escrow() {
    let chain = TestChain::started(0, 3).await;
    let circle = TrustedCircleContract::new(chain.contract(ContractRole::OversightCircle), chain.host());

    for member in &chain.oc_members {
        assert_eq!(circle.voter(*member).await.unwrap(), Some(1));
        let escrow = circle.escrow(*member).await.unwrap().unwrap();
        assert_eq!(escrow.paid, Uint128::new(ESCROW));
        assert_eq!(escrow.status, EscrowStatus::Voting);
    }
    assert_eq!(circle.voter(chain.admin).await.unwrap(), None);

    let config = circle.configuration().await.unwrap();
    assert_eq!(config.escrow_amount, Coin::new(ESCROW, DENOM));
    assert_eq!(config.quorum, Decimal::percent(50));
    assert_eq!(config.threshold, Decimal::percent(66));

    let rules = proposals(&chain).rules().await.unwrap();
    assert_eq!((rules.quorum, rules.threshold), (config.quorum, config.threshold));
}

#[tokio::test]
async fn test_mixer_weights_follow_engagement_and_stake() {
    let chain = TestChain::started(3, 0).await;
    let mixer = MixerContract::new(chain.contract(ContractRole::Mixer), chain.host()).group();

    let mut weights = Vec::new();
    for validator in &chain.validators {
        weights.push(mixer.member(validator.operator).await.unwrap().unwrap());
    }
    assert_eq!(weights, vec![316, 438, 547]);
    assert_eq!(mixer.total_points().await.unwrap(), 316 + 438 + 547);
}

#[tokio::test]
async fn test_validators_and_oversight_voters_stay_apart() {
    let chain = TestChain::started(3, 3).await;
    let circle = TrustedCircleContract::new(chain.contract(ContractRole::OversightCircle), chain.host());

    let mut voters: Vec<_> = circle
        .list_voters()
        .await
        .unwrap()
        .members
        .into_iter()
        .map(|m| m.addr)
        .collect();
    voters.sort();
    let mut expected = chain.oc_members.clone();
    expected.sort();
    assert_eq!(voters, expected);
    for validator in &chain.validators {
        assert_eq!(circle.voter(validator.operator).await.unwrap(), None);
    }

    let mixer = MixerContract::new(chain.contract(ContractRole::Mixer), chain.host()).group();
    let mut weights = Vec::new();
    for validator in &chain.validators {
        let weight = mixer.member(validator.operator).await.unwrap().unwrap();
        assert_eq!(weight, validator.mixed_weight());
        weights.push(weight);
    }
    assert_eq!(weights, vec![316, 438, 547]);
    for member in &chain.oc_members {
        assert_eq!(mixer.member(*member).await.unwrap(), None);
    }
}

#[tokio::test]
async fn test_passed_proposal_grants_engagement() {
    let chain = TestChain::started(1, 3).await;
    let contract = proposals(&chain);
    let beneficiary = random_address();
    let [first, second, third] = [chain.oc_members[0], chain.oc_members[1], chain.oc_members[2]];

    let id = contract
        .propose(
            first,
            "reward tooling work",
            OcProposal::GrantEngagement {
                member: beneficiary,
                points: 500,
            },
        )
        .await
        .unwrap();

    // one of three voted: below quorum
    let proposal = contract.proposal(id).await.unwrap();
    assert_eq!(proposal.status, ProposalStatus::Open);
    assert_eq!((proposal.yes, proposal.total_weight), (1, 3));
    assert!(contract.execute(third, id).await.is_err());

    contract.vote(second, id, Vote::Yes).await.unwrap();
    assert_eq!(
        contract.proposal(id).await.unwrap().status,
        ProposalStatus::Passed
    );

    contract.execute(third, id).await.unwrap();
    assert_eq!(
        contract.proposal(id).await.unwrap().status,
        ProposalStatus::Executed
    );

    let engagement = EngagementContract::new(chain.contract(ContractRole::EngagementGroup), chain.host());
    assert_eq!(engagement.group().member(beneficiary).await.unwrap(), Some(500));
}

#[tokio::test]
async fn test_rejected_proposal_cannot_execute() {
    let chain = TestChain::started(0, 3).await;
    let contract = proposals(&chain);
    let members = &chain.oc_members;

    let id = contract
        .propose(
            members[0],
            "contested grant",
            OcProposal::GrantEngagement {
                member: random_address(),
                points: 10,
            },
        )
        .await
        .unwrap();
    contract.vote(members[1], id, Vote::No).await.unwrap();
    contract.vote(members[2], id, Vote::No).await.unwrap();

    let proposal = contract.proposal(id).await.unwrap();
    assert_eq!(proposal.status, ProposalStatus::Rejected);
    assert_eq!((proposal.yes, proposal.no), (1, 2));

    let err = contract.execute(members[0], id).await.unwrap_err();
    assert!(matches!(err, HostError::Contract(_)));
}

#[tokio::test]
async fn test_outsiders_cannot_propose_or_vote_twice() {
    let chain = TestChain::started(0, 3).await;
    let contract = proposals(&chain);
    let grant = OcProposal::GrantEngagement {
        member: random_address(),
        points: 1,
    };

    let err = contract
        .propose(random_address(), "outsider", grant.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, HostError::Contract(_)));

    let id = contract
        .propose(chain.oc_members[0], "insider", grant)
        .await
        .unwrap();
    let err = contract
        .vote(chain.oc_members[0], id, Vote::Yes)
        .await
        .unwrap_err();
    assert!(matches!(err, HostError::Contract(_)));
}

#[tokio::test]
async fn test_engagement_rejects_unprivileged_grants() {
    let chain = TestChain::started(0, 0).await;
    let engagement = EngagementContract::new(chain.contract(ContractRole::EngagementGroup), chain.host());

    let err = engagement
        .add_points(random_address(), random_address(), 10)
        .await
        .unwrap_err();
    assert!(matches!(err, HostError::Contract(_)));
}
