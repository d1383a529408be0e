//! Native implementations of the six Proof-of-Engagement contracts.
//!
//! They keep the message interfaces of `crate::contracts` and enough
//! behavior to exercise bootstrap, validator onboarding and oversight
//! governance end to end. Reward distribution, slashing, unbonding and
//! epoch processing are not modeled.

mod engagement;
mod mixer;
mod oc_proposals;
mod stake;
mod trusted_circle;
mod valset;

pub use engagement::EngagementNative;
pub use mixer::MixerNative;
pub use oc_proposals::OcProposalsNative;
pub use stake::StakeNative;
pub use trusted_circle::TrustedCircleNative;
pub use valset::ValsetNative;

use super::native::{ContractResult, Deps, NativeFactory};
use crate::contracts::bundle::ContractCodeBundle;
use crate::contracts::tg4::{Member, MemberListResponse, Tg4QueryMsg, MAX_LIMIT};
use crate::domain::value_objects::{Address, Decimal};
use crate::errors::ContractError;

/// Release version of the native contract set.
pub const NATIVE_CONTRACTS_VERSION: &str = "v0.5.0-native";

fn code_blob(name: &str) -> Vec<u8> {
    format!("poe-native/{name}@{NATIVE_CONTRACTS_VERSION}").into_bytes()
}

/// Code bundle whose blobs the in-memory host resolves to the native
/// contracts.
#[must_use]
pub fn native_code_bundle() -> ContractCodeBundle {
    ContractCodeBundle {
        engagement: code_blob("tg4_engagement"),
        trusted_circle: code_blob("tgrade_trusted_circle"),
        oc_proposals: code_blob("tgrade_oc_proposals"),
        stake: code_blob("tg4_stake"),
        mixer: code_blob("tg4_mixer"),
        valset: code_blob("tgrade_valset"),
        version: NATIVE_CONTRACTS_VERSION.to_string(),
    }
}

/// Code blobs paired with their factories.
#[must_use]
pub fn native_factories() -> Vec<(Vec<u8>, NativeFactory)> {
    let bundle = native_code_bundle();
    vec![
        (bundle.engagement, EngagementNative::boxed as NativeFactory),
        (bundle.trusted_circle, TrustedCircleNative::boxed as NativeFactory),
        (bundle.oc_proposals, OcProposalsNative::boxed as NativeFactory),
        (bundle.stake, StakeNative::boxed as NativeFactory),
        (bundle.mixer, MixerNative::boxed as NativeFactory),
        (bundle.valset, ValsetNative::boxed as NativeFactory),
    ]
}

/// Reads every member of a group contract through the querier.
fn list_all_members(deps: Deps<'_>, group: Address) -> ContractResult<Vec<Member>> {
    let mut all = Vec::new();
    let mut start_after = None;
    loop {
        let msg = Tg4QueryMsg::ListMembers {
            start_after,
            limit: Some(MAX_LIMIT),
        };
        let page: MemberListResponse = deps.query(group, &msg)?;
        let full = page.members.len() == MAX_LIMIT as usize;
        start_after = page.members.last().map(|m| m.addr);
        all.extend(page.members);
        if !full || start_after.is_none() {
            break;
        }
    }
    Ok(all)
}

/// Sum of member points, saturating at `u64::MAX`.
fn total_points(points: impl IntoIterator<Item = u64>) -> u64 {
    points.into_iter().fold(0, u64::saturating_add)
}

/// Rejects ratios above one.
fn ensure_ratio(name: &str, value: Decimal) -> ContractResult<()> {
    if value > Decimal::one() {
        return Err(ContractError::InvalidMessage(format!(
            "{name} must be within [0, 1], got {value}"
        )));
    }
    Ok(())
}
