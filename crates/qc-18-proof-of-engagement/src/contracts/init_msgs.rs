//! # Init-Message Builders
//!
//! Pure translation of the genesis configuration into instantiate
//! payloads. Identical input always yields identical bytes.

use super::engagement::EngagementInitMsg;
use super::mixer::{MixerFunction, MixerInitMsg};
use super::oc_proposals::{OcProposalsInitMsg, VotingRules};
use super::stake::StakeInitMsg;
use super::tg4::Member;
use super::trusted_circle::TrustedCircleInitMsg;
use super::valset::ValsetInitMsg;
use crate::domain::genesis::GenesisConfiguration;
use crate::domain::services::{duration_to_seconds, ratio_from_percentage};
use crate::domain::value_objects::{Address, CodeId, Coin};
use crate::errors::PoeResult;

/// Instance labels.
pub mod labels {
    /// Engagement group.
    pub const ENGAGEMENT: &str = "engagement";
    /// Oversight circle.
    pub const OVERSIGHT_COMMITTEE: &str = "oversight_committee";
    /// Oversight proposals.
    pub const OVERSIGHT_PROPOSALS: &str = "oversight_committee gov proposals";
    /// Staking group.
    pub const STAKERS: &str = "stakers";
    /// Mixer.
    pub const MIXER: &str = "poe";
    /// Validator set.
    pub const VALSET: &str = "valset";
}

/// Hook and slashing slots pre-authorized on the group contracts.
const PREAUTHS: u64 = 1;

/// Engagement group: weighted genesis members, one hook and one slashing
/// slot, and the proposals contract as privileged caller.
#[must_use]
pub fn engagement_init_msg(
    genesis: &GenesisConfiguration,
    admin: Address,
    proposals_contract: Address,
) -> EngagementInitMsg {
    let halflife = duration_to_seconds(genesis.engagement_contract_config.halflife);
    EngagementInitMsg {
        admin: Some(admin),
        members: genesis
            .engagement
            .iter()
            .map(|m| Member::new(m.address, m.points))
            .collect(),
        preauths_hooks: PREAUTHS,
        preauths_slashing: PREAUTHS,
        token: genesis.bond_denom.clone(),
        halflife: (halflife > 0).then_some(halflife),
        privileged_callers: vec![proposals_contract],
    }
}

/// Voting rules shared by the oversight circle and its proposals contract.
///
/// # Errors
///
/// `InvalidConfig` for percentages outside `[0, 100]`.
pub fn voting_rules(genesis: &GenesisConfiguration) -> PoeResult<VotingRules> {
    let cfg = &genesis.oversight_committee_contract_config;
    Ok(VotingRules {
        voting_period: cfg.voting_period,
        quorum: ratio_from_percentage(cfg.quorum)?,
        threshold: ratio_from_percentage(cfg.threshold)?,
        allow_end_early: cfg.allow_end_early,
    })
}

/// Oversight circle: no non-voting members, configuration frozen.
///
/// # Errors
///
/// `InvalidConfig` for percentages outside `[0, 100]`.
pub fn trusted_circle_init_msg(genesis: &GenesisConfiguration) -> PoeResult<TrustedCircleInitMsg> {
    let cfg = &genesis.oversight_committee_contract_config;
    let rules = voting_rules(genesis)?;
    Ok(TrustedCircleInitMsg {
        name: cfg.name.clone(),
        escrow_amount: cfg.escrow_amount.amount,
        voting_period: rules.voting_period,
        quorum: rules.quorum,
        threshold: rules.threshold,
        allow_end_early: rules.allow_end_early,
        initial_members: Vec::new(),
        deny_list: cfg.deny_list_contract_address,
        edit_trusted_circle_disabled: true,
    })
}

/// Oversight proposals over the circle and the engagement group.
///
/// # Errors
///
/// `InvalidConfig` for percentages outside `[0, 100]`.
pub fn oc_proposals_init_msg(
    genesis: &GenesisConfiguration,
    circle: Address,
    engagement: Address,
) -> PoeResult<OcProposalsInitMsg> {
    Ok(OcProposalsInitMsg {
        group_contract: circle,
        engagement_contract: engagement,
        rules: voting_rules(genesis)?,
    })
}

/// Funds attached to the circle and proposals instantiations.
#[must_use]
pub fn escrow_deposit(genesis: &GenesisConfiguration) -> Vec<Coin> {
    let escrow = &genesis.oversight_committee_contract_config.escrow_amount;
    if escrow.amount.is_zero() {
        Vec::new()
    } else {
        vec![escrow.clone()]
    }
}

/// Staking group.
#[must_use]
pub fn stake_init_msg(genesis: &GenesisConfiguration, admin: Address) -> StakeInitMsg {
    let cfg = &genesis.stake_contract_config;
    StakeInitMsg {
        admin: Some(admin),
        denom: genesis.bond_denom.clone(),
        min_bond: cfg.min_bond,
        tokens_per_point: cfg.tokens_per_weight,
        unbonding_period: duration_to_seconds(cfg.unbonding_period),
        auto_return_limit: u64::from(cfg.claim_autoreturn_limit),
        preauths_hooks: PREAUTHS,
        preauths_slashing: PREAUTHS,
    }
}

/// Mixer over engagement (left) and stake (right).
#[must_use]
pub fn mixer_init_msg(engagement: Address, stake: Address) -> MixerInitMsg {
    MixerInitMsg {
        left_group: engagement,
        right_group: stake,
        function_type: MixerFunction::GeometricMean {},
    }
}

/// Validator set over the mixer. Rewards are distributed by a contract
/// built from the engagement code.
///
/// # Errors
///
/// `InvalidConfig` for percentages outside `[0, 100]`.
pub fn valset_init_msg(
    genesis: &GenesisConfiguration,
    mixer: Address,
    engagement_code_id: CodeId,
) -> PoeResult<ValsetInitMsg> {
    let cfg = &genesis.valset_contract_config;
    Ok(ValsetInitMsg {
        membership: mixer,
        min_points: cfg.min_weight,
        max_validators: cfg.max_validators,
        epoch_length: duration_to_seconds(cfg.epoch_length),
        epoch_reward: cfg.epoch_reward.clone(),
        initial_keys: Vec::new(),
        scaling: cfg.scaling,
        fee_percentage: ratio_from_percentage(cfg.fee_percentage)?,
        auto_unjail: cfg.auto_unjail,
        validators_reward_ratio: ratio_from_percentage(cfg.validators_reward_ratio)?,
        rewards_code_id: engagement_code_id,
    })
}
