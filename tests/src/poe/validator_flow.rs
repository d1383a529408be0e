//! # Validator Lifecycle Flow
//!
//! Runtime `CreateValidator` and `UpdateValidator` on a started chain.

use super::fixtures::*;
use qc_18_proof_of_engagement::contracts::valset::ValsetContract;
use qc_18_proof_of_engagement::prelude::*;

fn new_validator(chain: &TestChain, bond: u128) -> MsgCreateValidator {
    let operator = random_address();
    chain.fund(operator, bond);
    MsgCreateValidator {
        delegator_address: operator,
        pubkey: random_ed25519(),
        description: Description {
            moniker: "newcomer".into(),
            identity: "keybase:newcomer".into(),
            website: "https://newcomer.example".into(),
            security_contact: "sec@newcomer.example".into(),
            details: "joined after genesis".into(),
        },
        value: Coin::new(bond, DENOM),
    }
}

#[tokio::test]
async fn test_new_validator_joins_active_set() {
    let chain = TestChain::started(3, 0).await;
    let msg = new_validator(&chain, TOKENS_PER_POINT);
    let operator = msg.delegator_address;

    chain.service.create_validator(msg.clone()).await.unwrap();

    let record = chain.service.validator(operator).await.unwrap().unwrap();
    assert_eq!(record.pubkey, msg.pubkey);
    assert_eq!(record.description, msg.description);
    assert_eq!(record.bonded, Coin::new(TOKENS_PER_POINT, DENOM));
    // default initial grant
    assert_eq!(record.engagement_points, Some(100));
    assert_eq!(
        chain.service.keeper().initial_engagement_points(&operator),
        Some(100)
    );

    let active = ValsetContract::new(chain.contract(ContractRole::Valset), chain.host())
        .list_active_validators()
        .await
        .unwrap();
    assert_eq!(active.len(), 4);
    let last = active.last().unwrap();
    // sqrt(100 engagement * 1 stake point)
    assert_eq!((last.operator, last.power), (operator, 10));
}

#[tokio::test]
async fn test_create_validator_events() {
    let chain = TestChain::started(1, 0).await;
    let msg = new_validator(&chain, 2 * TOKENS_PER_POINT);
    let operator = msg.delegator_address;
    chain.service.create_validator(msg.clone()).await.unwrap();

    // genesis validator events come first
    let events = chain.service.events().events();
    let tail = &events[events.len() - 2..];
    assert_eq!(tail[0].kind(), event_types::MESSAGE);
    assert_eq!(
        tail[0].attribute(attribute_keys::SENDER),
        Some(operator.to_string())
    );
    assert_eq!(tail[1].kind(), event_types::CREATE_VALIDATOR);
    assert_eq!(
        tail[1].attribute(attribute_keys::MONIKER).as_deref(),
        Some("newcomer")
    );
    assert_eq!(
        tail[1].attribute(attribute_keys::PUBKEY),
        Some(msg.pubkey.to_hex())
    );
    assert_eq!(
        tail[1].attribute(attribute_keys::AMOUNT).as_deref(),
        Some("2000000")
    );
}

#[tokio::test]
async fn test_below_min_self_bond_gets_no_initial_points() {
    let chain = TestChain::new(1, 0);
    let mut config = PoeConfig::default();
    config.initial_engagement.min_self_bond = Uint128::new(10 * TOKENS_PER_POINT);
    let service = PoeService::new(PoeDependencies {
        host: std::sync::Arc::new(InMemoryContractHost::with_native_contracts()),
        keeper: std::sync::Arc::new(InMemoryKeeper::new()),
        events: std::sync::Arc::new(InMemoryEventSink::new()),
        config,
    });
    service.host().fund(chain.admin, &Coin::new(2 * ESCROW, DENOM));
    let mut genesis = chain.genesis.clone();
    genesis.gen_txs.clear();
    service
        .init_genesis(&genesis, &native_code_bundle())
        .await
        .unwrap();

    let operator = random_address();
    service
        .host()
        .fund(operator, &Coin::new(TOKENS_PER_POINT, DENOM));
    service
        .create_validator(MsgCreateValidator {
            delegator_address: operator,
            pubkey: random_ed25519(),
            description: Description::with_moniker("small"),
            value: Coin::new(TOKENS_PER_POINT, DENOM),
        })
        .await
        .unwrap();

    let record = service.validator(operator).await.unwrap().unwrap();
    assert_eq!(record.engagement_points, None);
    assert_eq!(service.keeper().initial_engagement_points(&operator), None);
}

#[tokio::test]
async fn test_overdrawn_bond_rejected() {
    let chain = TestChain::started(1, 0).await;
    let operator = random_address();
    chain.fund(operator, TOKENS_PER_POINT);

    // bond exceeds balance
    let err = chain
        .service
        .create_validator(MsgCreateValidator {
            delegator_address: operator,
            pubkey: random_ed25519(),
            description: Description::with_moniker("overdrawn"),
            value: Coin::new(5 * TOKENS_PER_POINT, DENOM),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PoeError::ContractHost {
            step: "self delegation validator",
            ..
        }
    ));
    assert!(!err.is_fatal());
    assert_eq!(chain.balance(operator), TOKENS_PER_POINT);
}

#[tokio::test]
async fn test_duplicate_pubkey_rejected() {
    let chain = TestChain::started(2, 0).await;
    let mut msg = new_validator(&chain, TOKENS_PER_POINT);
    msg.pubkey = chain.validators[0].pubkey.clone();

    let err = chain.service.create_validator(msg).await.unwrap_err();
    assert!(err.is_contract_rejection());
}

#[tokio::test]
async fn test_update_validator_partial_delta() {
    let chain = TestChain::started(1, 0).await;
    let msg = new_validator(&chain, TOKENS_PER_POINT);
    let operator = msg.delegator_address;
    chain.service.create_validator(msg.clone()).await.unwrap();

    chain
        .service
        .update_validator(MsgUpdateValidator {
            delegator_address: operator,
            description: Description {
                details: "moved datacenter".into(),
                ..Description::default()
            },
        })
        .await
        .unwrap();

    let record = chain.service.validator(operator).await.unwrap().unwrap();
    assert_eq!(record.description.details, "moved datacenter");
    assert_eq!(record.description.moniker, "newcomer");
    assert_eq!(record.description.website, msg.description.website);

    let events = chain.service.events().events();
    let last = events.last().unwrap();
    assert_eq!(last.kind(), event_types::UPDATE_VALIDATOR);
    assert_eq!(
        last.attribute(attribute_keys::MONIKER).as_deref(),
        Some("newcomer")
    );
}

#[tokio::test]
async fn test_update_rejects_oversized_delta_without_change() {
    let chain = TestChain::started(1, 0).await;
    let operator = chain.validators[0].operator;
    let before = chain.service.validator(operator).await.unwrap().unwrap();

    let err = chain
        .service
        .update_validator(MsgUpdateValidator {
            delegator_address: operator,
            description: Description::with_moniker("m".repeat(71)),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PoeError::DescriptionTooLong {
            field: "moniker",
            ..
        }
    ));

    let after = chain.service.validator(operator).await.unwrap().unwrap();
    assert_eq!(before, after);
    assert_eq!(chain.service.stats().await.rejected_transactions, 1);
}

#[tokio::test]
async fn test_update_unknown_operator() {
    let chain = TestChain::started(1, 0).await;
    let stranger = random_address();
    let err = chain
        .service
        .update_validator(MsgUpdateValidator {
            delegator_address: stranger,
            description: Description::with_moniker("nobody"),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, PoeError::UnknownOperator(addr) if addr == stranger));
    assert_eq!(
        chain.service.validator_state(stranger).await.unwrap(),
        ValidatorState::Unregistered
    );
}
