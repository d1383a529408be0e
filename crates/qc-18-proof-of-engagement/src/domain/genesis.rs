//! # Genesis Configuration
//!
//! Read-only input to the bootstrap. Decoded from the module's genesis JSON
//! document and validated before any contract is created.

use crate::domain::messages::MsgCreateValidator;
use crate::domain::services::ratio_from_percentage;
use crate::domain::value_objects::{Address, Coin, Decimal, Uint128};
use crate::errors::{PoeError, PoeResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

/// Default bond denomination.
pub const DEFAULT_BOND_DENOM: &str = "utgd";

// =============================================================================
// CONFIGURATION DOCUMENT
// =============================================================================

/// Module genesis state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenesisConfiguration {
    /// Admin of the engagement and staking contracts and creator of all
    /// bootstrap contracts. Kept as text: resolving it is the first
    /// bootstrap step.
    pub system_admin_address: String,
    /// Staking token denomination.
    pub bond_denom: String,
    /// Initial engagement group members.
    #[serde(default)]
    pub engagement: Vec<EngagementMember>,
    /// Engagement contract parameters.
    pub engagement_contract_config: EngagementContractConfig,
    /// Staking contract parameters.
    pub stake_contract_config: StakeContractConfig,
    /// Valset contract parameters.
    pub valset_contract_config: ValsetContractConfig,
    /// Oversight community parameters.
    pub oversight_committee_contract_config: OversightCommitteeContractConfig,
    /// Voting members seeded into the oversight circle.
    #[serde(default)]
    pub oversight_community_members: Vec<Address>,
    /// Genesis validator transactions.
    #[serde(default)]
    pub gen_txs: Vec<MsgCreateValidator>,
}

/// A weighted engagement group member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementMember {
    /// Member account.
    pub address: Address,
    /// Engagement points.
    pub points: u64,
}

/// Engagement contract parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementContractConfig {
    /// Points half-life.
    #[serde(with = "duration_format")]
    pub halflife: Duration,
}

/// Staking contract parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeContractConfig {
    /// Minimum bond to be counted as a member.
    pub min_bond: Uint128,
    /// Tokens per unit of weight.
    pub tokens_per_weight: Uint128,
    /// Unbonding period.
    #[serde(with = "duration_format")]
    pub unbonding_period: Duration,
    /// Max mature claims returned automatically per block.
    pub claim_autoreturn_limit: u32,
}

/// Valset contract parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValsetContractConfig {
    /// Minimum mixer weight to be eligible.
    pub min_weight: u64,
    /// Max active validators.
    pub max_validators: u32,
    /// Epoch length.
    #[serde(with = "duration_format")]
    pub epoch_length: Duration,
    /// Reward minted per epoch.
    pub epoch_reward: Coin,
    /// Weight to consensus power scaling.
    #[serde(default)]
    pub scaling: Option<u32>,
    /// Fee share as a percentage.
    pub fee_percentage: Decimal,
    /// Unjail automatically after the jail period.
    #[serde(default)]
    pub auto_unjail: bool,
    /// Share of rewards going to validators, as a percentage.
    pub validators_reward_ratio: Decimal,
}

/// Oversight community parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OversightCommitteeContractConfig {
    /// Circle name.
    pub name: String,
    /// Escrow each voting member deposits.
    pub escrow_amount: Coin,
    /// Voting period in days.
    pub voting_period: u32,
    /// Quorum percentage.
    pub quorum: Decimal,
    /// Threshold percentage.
    pub threshold: Decimal,
    /// Close the vote once the outcome is certain.
    #[serde(default)]
    pub allow_end_early: bool,
    /// Optional deny-list contract.
    #[serde(default)]
    pub deny_list_contract_address: Option<Address>,
}

impl GenesisConfiguration {
    /// Decodes a genesis document.
    ///
    /// # Errors
    ///
    /// `Serialization` on malformed JSON.
    pub fn from_json(bytes: &[u8]) -> PoeResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Encodes the genesis document.
    ///
    /// # Errors
    ///
    /// `Serialization` if encoding fails.
    pub fn to_json(&self) -> PoeResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Parses the system admin address.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the address is malformed.
    pub fn system_admin(&self) -> PoeResult<Address> {
        self.system_admin_address
            .parse()
            .map_err(|e| PoeError::InvalidConfig(format!("system admin: {e}")))
    }

    /// Validates the document.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` describing the first problem found.
    pub fn validate(&self) -> PoeResult<()> {
        self.system_admin()?;
        if self.bond_denom.is_empty() {
            return invalid("empty bond denom");
        }

        let mut seen = BTreeSet::new();
        for member in &self.engagement {
            if !seen.insert(member.address) {
                return invalid(format!("duplicate engagement member {}", member.address));
            }
        }

        let stake = &self.stake_contract_config;
        if stake.tokens_per_weight.is_zero() {
            return invalid("tokens per weight must be positive");
        }

        let valset = &self.valset_contract_config;
        if valset.max_validators == 0 {
            return invalid("max validators must be positive");
        }
        if valset.epoch_length.is_zero() {
            return invalid("epoch length must be positive");
        }
        if valset.epoch_reward.denom != self.bond_denom {
            return invalid(format!(
                "epoch reward denom {} does not match bond denom {}",
                valset.epoch_reward.denom, self.bond_denom
            ));
        }
        if valset.scaling == Some(0) {
            return invalid("scaling must be positive");
        }
        ratio_from_percentage(valset.fee_percentage)?;
        ratio_from_percentage(valset.validators_reward_ratio)?;

        let oc = &self.oversight_committee_contract_config;
        if oc.name.is_empty() {
            return invalid("empty oversight committee name");
        }
        if oc.escrow_amount.denom != self.bond_denom {
            return invalid(format!(
                "escrow denom {} does not match bond denom {}",
                oc.escrow_amount.denom, self.bond_denom
            ));
        }
        if oc.voting_period == 0 {
            return invalid("voting period must be positive");
        }
        ratio_from_percentage(oc.quorum)?;
        ratio_from_percentage(oc.threshold)?;

        let mut seen = BTreeSet::new();
        for member in &self.oversight_community_members {
            if !seen.insert(*member) {
                return invalid(format!("duplicate oversight community member {member}"));
            }
        }

        let mut seen = BTreeSet::new();
        for tx in &self.gen_txs {
            if !seen.insert(tx.delegator_address) {
                return invalid(format!("duplicate gentx operator {}", tx.delegator_address));
            }
            if tx.value.denom != self.bond_denom {
                return invalid(format!(
                    "gentx {} bonds {} instead of {}",
                    tx.delegator_address, tx.value.denom, self.bond_denom
                ));
            }
        }
        Ok(())
    }

    /// Single-node development defaults.
    #[must_use]
    pub fn devnet(system_admin: Address) -> Self {
        Self {
            system_admin_address: system_admin.to_hex(),
            bond_denom: DEFAULT_BOND_DENOM.to_string(),
            engagement: Vec::new(),
            engagement_contract_config: EngagementContractConfig {
                halflife: Duration::from_secs(180 * 24 * 60 * 60),
            },
            stake_contract_config: StakeContractConfig {
                min_bond: Uint128::one(),
                tokens_per_weight: Uint128::new(1_000_000),
                unbonding_period: Duration::from_secs(21 * 24 * 60 * 60),
                claim_autoreturn_limit: 20,
            },
            valset_contract_config: ValsetContractConfig {
                min_weight: 1,
                max_validators: 100,
                epoch_length: Duration::from_secs(60),
                epoch_reward: Coin::new(100_000, DEFAULT_BOND_DENOM),
                scaling: None,
                fee_percentage: Decimal::zero(),
                auto_unjail: false,
                validators_reward_ratio: Decimal::percent(5_000),
            },
            oversight_committee_contract_config: OversightCommitteeContractConfig {
                name: "Community Oversight Committee".to_string(),
                escrow_amount: Coin::new(1_000_000, DEFAULT_BOND_DENOM),
                voting_period: 1,
                quorum: Decimal::percent(5_000),
                threshold: Decimal::percent(6_600),
                allow_end_early: true,
                deny_list_contract_address: None,
            },
            oversight_community_members: Vec::new(),
            gen_txs: Vec::new(),
        }
    }
}

fn invalid<T>(msg: impl Into<String>) -> PoeResult<T> {
    Err(PoeError::InvalidConfig(msg.into()))
}

/// Serde helper encoding durations as `"<seconds>s"` strings.
///
/// Decoding also accepts fractional seconds (`"1.5s"`) and bare integers.
/// Contract payloads carry whole seconds only: the fraction is truncated
/// when the init messages are built, so `"1.5s"` reaches the contracts as
/// one second. Sub-second periods are not supported.
pub mod duration_format {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    /// Serialize as `"<secs>s"`, with a fraction only when present.
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let text = if duration.subsec_nanos() == 0 {
            format!("{}s", duration.as_secs())
        } else {
            format!("{}.{:09}s", duration.as_secs(), duration.subsec_nanos())
        };
        serializer.serialize_str(&text)
    }

    /// Deserialize from `"<secs>[.<frac>]s"` or an integer second count.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Seconds(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Seconds(secs) => Ok(Duration::from_secs(secs)),
            Raw::Text(text) => parse(&text).map_err(de::Error::custom),
        }
    }

    fn parse(text: &str) -> Result<Duration, String> {
        let body = text
            .strip_suffix('s')
            .ok_or_else(|| format!("duration {text:?} must end in 's'"))?;
        let (secs, frac) = body.split_once('.').unwrap_or((body, ""));
        let secs: u64 = secs
            .parse()
            .map_err(|_| format!("invalid duration {text:?}"))?;
        if frac.len() > 9 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("invalid duration fraction {text:?}"));
        }
        let nanos = if frac.is_empty() {
            0
        } else {
            format!("{frac:0<9}")
                .parse::<u32>()
                .map_err(|_| format!("invalid duration fraction {text:?}"))?
        };
        Ok(Duration::new(secs, nanos))
    }
}

// =============================================================================
// TESTS
// =============================================================================
