//! # Genesis Flow
//!
//! Full `init_genesis` against the in-memory host: contract wiring, escrow,
//! oversight community and genesis validators.

use super::fixtures::*;
use qc_18_proof_of_engagement::contracts::engagement::EngagementContract;
use qc_18_proof_of_engagement::contracts::mixer::{MixerContract, MixerFunction};
use qc_18_proof_of_engagement::contracts::oc_proposals::OcProposalsContract;
use qc_18_proof_of_engagement::contracts::stake::StakeContract;
use qc_18_proof_of_engagement::contracts::trusted_circle::TrustedCircleContract;
use qc_18_proof_of_engagement::contracts::valset::ValsetContract;
use qc_18_proof_of_engagement::contracts::Tg4Group;
use qc_18_proof_of_engagement::prelude::*;

#[tokio::test]
async fn test_genesis_wires_contract_suite() {
    let chain = TestChain::started(3, 3).await;
    let host = chain.host();

    let registry = chain.service.keeper().registry();
    assert_eq!(registry.len(), ContractRole::ALL.len());

    let engagement = chain.contract(ContractRole::EngagementGroup);
    let circle = chain.contract(ContractRole::OversightCircle);
    let proposals = chain.contract(ContractRole::OversightProposals);
    let stake = chain.contract(ContractRole::Staking);
    let mixer = chain.contract(ContractRole::Mixer);

    // forward reference resolved
    let config = EngagementContract::new(engagement, host)
        .configuration()
        .await
        .unwrap();
    assert_eq!(config.privileged_callers, vec![proposals]);
    assert_eq!(config.token, DENOM);

    let wiring = OcProposalsContract::new(proposals, host)
        .configuration()
        .await
        .unwrap();
    assert_eq!(wiring.group_contract, circle);
    assert_eq!(wiring.engagement_contract, engagement);

    let groups = MixerContract::new(mixer, host).groups().await.unwrap();
    assert_eq!((groups.left, groups.right), (engagement, stake));
    assert_eq!(groups.function_type, MixerFunction::GeometricMean {});

    let valset = ValsetContract::new(chain.contract(ContractRole::Valset), host)
        .configuration()
        .await
        .unwrap();
    assert_eq!(valset.membership, mixer);
    assert_eq!(
        valset.distribution_contract,
        chain.contract(ContractRole::Distribution)
    );

    let result = chain.service.verify_bootstrap(&chain.genesis).await.unwrap();
    assert!(result.is_valid(), "{:?}", result.violations());
}

#[tokio::test]
async fn test_first_proposals_address_is_predictable() {
    let chain = TestChain::started(1, 0).await;
    // engagement and circle take code and instance ids 1 and 2
    assert_eq!(
        chain.contract(ContractRole::OversightProposals),
        contract_address(3, 3)
    );
}

#[tokio::test]
async fn test_admin_and_codes() {
    let chain = TestChain::started(1, 0).await;
    let host = chain.host();

    for role in [ContractRole::EngagementGroup, ContractRole::Staking] {
        let admin = Tg4Group::new(chain.contract(role), host).admin().await.unwrap();
        assert_eq!(admin, Some(chain.admin), "{role}");
    }

    for role in ContractRole::ALL {
        let info = host.contract_info(chain.contract(role)).await.unwrap();
        if role == ContractRole::Distribution {
            assert_eq!(info.creator, chain.contract(ContractRole::Valset));
        } else {
            assert_eq!(info.creator, chain.admin, "{role}");
            assert_eq!(info.admin, Some(chain.admin), "{role}");
        }
    }

    let stake_config = StakeContract::new(chain.contract(ContractRole::Staking), host)
        .configuration()
        .await
        .unwrap();
    assert_eq!(stake_config.denom, DENOM);
    assert_eq!(stake_config.tokens_per_point, Uint128::new(TOKENS_PER_POINT));
}

#[tokio::test]
async fn test_oversight_community_seeded() {
    let chain = TestChain::started(0, 3).await;
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
    assert!(circle.list_non_voting_members().await.unwrap().members.is_empty());

    // member escrow plus the instantiation deposit
    assert_eq!(
        chain.balance(chain.contract(ContractRole::OversightCircle)),
        4 * ESCROW
    );
    assert_eq!(chain.balance(chain.contract(ContractRole::OversightProposals)), ESCROW);
    assert_eq!(chain.balance(chain.admin), 0);
    for member in &chain.oc_members {
        assert_eq!(chain.balance(*member), 0);
    }
}

#[tokio::test]
async fn test_genesis_validators_active() {
    let chain = TestChain::started(3, 0).await;
    let active = ValsetContract::new(chain.contract(ContractRole::Valset), chain.host())
        .list_active_validators()
        .await
        .unwrap();

    let powers: Vec<_> = active.iter().map(|v| v.power).collect();
    assert_eq!(powers, vec![547, 438, 316]);

    let mut expected: Vec<_> = chain
        .validators
        .iter()
        .map(|v| (v.operator, v.mixed_weight()))
        .collect();
    expected.sort_by(|a, b| b.1.cmp(&a.1));
    let got: Vec<_> = active.iter().map(|v| (v.operator, v.power)).collect();
    assert_eq!(got, expected);

    for validator in &chain.validators {
        assert_eq!(chain.balance(validator.operator), 0);
        // genesis engagement is kept, no initial grant
        assert_eq!(
            chain
                .service
                .keeper()
                .initial_engagement_points(&validator.operator),
            None
        );
    }
    assert_eq!(chain.service.stats().await.validators_created, 3);
}

#[tokio::test]
async fn test_genesis_aborts_on_unfunded_validator() {
    let chain = TestChain::new(2, 0);
    let mut genesis = chain.genesis.clone();
    genesis.gen_txs[1].value = Coin::new(chain.validators[1].bond() * 2, DENOM);

    let err = chain
        .service
        .init_genesis(&genesis, &native_code_bundle())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PoeError::ContractHost {
            step: "self delegation validator",
            source: HostError::InsufficientFunds { .. },
        }
    ));
}

#[tokio::test]
async fn test_genesis_document_roundtrip_drives_bootstrap() {
    let chain = TestChain::new(2, 1);
    let bytes = chain.genesis.to_json().unwrap();
    let decoded = GenesisConfiguration::from_json(&bytes).unwrap();
    assert_eq!(decoded, chain.genesis);

    chain
        .service
        .init_genesis(&decoded, &native_code_bundle())
        .await
        .unwrap();
    assert!(chain.service.keeper().registry().ensure_complete().is_ok());
}
