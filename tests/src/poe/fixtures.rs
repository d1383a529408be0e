//! # Test Chain Fixtures
//!
//! A devnet genesis with weighted validators and a funded oversight
//! community, wired to the in-memory contract host.

use qc_18_proof_of_engagement::prelude::*;
use rand::Rng;
use tracing_subscriber::EnvFilter;

/// Service type used by every flow.
pub type PoeTestService = PoeService<InMemoryContractHost, InMemoryKeeper, InMemoryEventSink>;

/// Bond denomination.
pub const DENOM: &str = "utgd";

/// Escrow per oversight community member.
pub const ESCROW: u128 = 1_000_000;

/// Stake tokens per staking point.
pub const TOKENS_PER_POINT: u128 = 1_000_000;

/// Installs a test-writer subscriber once. `RUST_LOG` overrides the level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

pub fn random_address() -> Address {
    Address::new(rand::thread_rng().gen())
}

pub fn random_ed25519() -> PublicKey {
    PublicKey::ed25519(rand::thread_rng().gen())
}

/// A validator created by a genesis transaction.
#[derive(Clone, Debug)]
pub struct GenesisValidator {
    pub operator: Address,
    pub pubkey: PublicKey,
    pub power: u64,
    pub engagement: u64,
}

impl GenesisValidator {
    /// Self-bond worth `power` staking points.
    pub fn bond(&self) -> u128 {
        u128::from(self.power) * TOKENS_PER_POINT
    }

    pub fn create_msg(&self) -> MsgCreateValidator {
        MsgCreateValidator {
            delegator_address: self.operator,
            pubkey: self.pubkey.clone(),
            description: Description::with_moniker(format!("moniker-{}", self.power)),
            value: Coin::new(self.bond(), DENOM),
        }
    }

    /// Mixed weight of engagement and staking points.
    pub fn mixed_weight(&self) -> u64 {
        geometric_mean(self.engagement, self.power)
    }
}

/// A funded chain ready for `init_genesis`.
pub struct TestChain {
    pub service: PoeTestService,
    pub genesis: GenesisConfiguration,
    pub admin: Address,
    pub validators: Vec<GenesisValidator>,
    pub oc_members: Vec<Address>,
}

impl TestChain {
    /// Validator `i` gets power `i * 75 + 100` and `i * 100 + 1000`
    /// engagement points.
    pub fn new(validators: u64, oc_members: usize) -> Self {
        init_tracing();
        let admin = random_address();
        let service = create_test_service();

        let validators: Vec<_> = (0..validators)
            .map(|i| GenesisValidator {
                operator: random_address(),
                pubkey: random_ed25519(),
                power: i * 75 + 100,
                engagement: i * 100 + 1000,
            })
            .collect();
        let oc_members: Vec<_> = (0..oc_members).map(|_| random_address()).collect();

        let mut genesis = GenesisConfiguration::devnet(admin);
        genesis.engagement = validators
            .iter()
            .map(|v| EngagementMember {
                address: v.operator,
                points: v.engagement,
            })
            .collect();
        genesis.gen_txs = validators.iter().map(GenesisValidator::create_msg).collect();
        genesis.oversight_community_members = oc_members.clone();

        let chain = Self {
            service,
            genesis,
            admin,
            validators,
            oc_members,
        };
        // circle and proposals instantiations each take one escrow
        chain.fund(admin, 2 * ESCROW);
        for member in &chain.oc_members {
            chain.fund(*member, ESCROW);
        }
        for validator in &chain.validators {
            chain.fund(validator.operator, validator.bond());
        }
        chain
    }

    /// Builds the chain and runs the full genesis.
    pub async fn started(validators: u64, oc_members: usize) -> Self {
        let chain = Self::new(validators, oc_members);
        chain
            .init_genesis()
            .await
            .expect("genesis must succeed");
        chain
    }

    pub async fn init_genesis(&self) -> PoeResult<ContractAddressRegistry> {
        self.service
            .init_genesis(&self.genesis, &native_code_bundle())
            .await
    }

    pub fn fund(&self, address: Address, amount: u128) {
        self.service.host().fund(address, &Coin::new(amount, DENOM));
    }

    pub fn balance(&self, address: Address) -> u128 {
        self.service.host().balance(address, DENOM).u128()
    }

    pub fn host(&self) -> &InMemoryContractHost {
        self.service.host()
    }

    pub fn contract(&self, role: ContractRole) -> Address {
        self.service
            .keeper()
            .contract_address(role)
            .expect("contract registered at genesis")
    }
}
