use super::total_points;
use crate::adapters::host::native::{
    from_json, to_json, ContractResult, Deps, Env, NativeContract, Response,
};
use crate::contracts::engagement::{
    EngagementConfigResponse, EngagementExecuteMsg, EngagementInitMsg, EngagementQueryMsg,
};
use crate::contracts::tg4::{
    paginate, AdminResponse, Member, MemberListResponse, MemberResponse, Tg4QueryMsg,
    TotalPointsResponse,
};
use crate::domain::value_objects::Address;
use crate::errors::ContractError;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Deserialize)]
#[serde(untagged)]
enum QueryMsg {
    Group(Tg4QueryMsg),
    Own(EngagementQueryMsg),
}

/// Engagement points group.
#[derive(Clone, Debug, Default)]
pub struct EngagementNative {
    admin: Option<Address>,
    members: BTreeMap<Address, u64>,
    token: String,
    halflife: Option<u64>,
    preauths_hooks: u64,
    preauths_slashing: u64,
    privileged_callers: Vec<Address>,
}

impl EngagementNative {
    /// Empty instance for the host factory.
    pub fn boxed() -> Box<dyn NativeContract> {
        Box::<Self>::default()
    }

    fn ensure_admin(&self, sender: &Address) -> ContractResult<()> {
        if self.admin.as_ref() == Some(sender) {
            Ok(())
        } else {
            Err(ContractError::Unauthorized(format!("{sender} is not the group admin")))
        }
    }
}

impl NativeContract for EngagementNative {
    fn instantiate(&mut self, _deps: Deps<'_>, env: &Env, msg: &[u8]) -> ContractResult<Response> {
        env.nonpayable()?;
        let msg: EngagementInitMsg = from_json(msg)?;
        if msg.token.is_empty() {
            return Err(ContractError::InvalidMessage("empty token denom".into()));
        }
        for Member { addr, points } in msg.members {
            if self.members.insert(addr, points).is_some() {
                return Err(ContractError::AlreadyExists(format!("member {addr}")));
            }
        }
        self.admin = msg.admin;
        self.token = msg.token;
        self.halflife = msg.halflife;
        self.preauths_hooks = msg.preauths_hooks;
        self.preauths_slashing = msg.preauths_slashing;
        self.privileged_callers = msg.privileged_callers;
        Ok(Response::new())
    }

    fn execute(&mut self, _deps: Deps<'_>, env: &Env, msg: &[u8]) -> ContractResult<Response> {
        env.nonpayable()?;
        let msg: EngagementExecuteMsg = from_json(msg)?;
        match msg {
            EngagementExecuteMsg::UpdateMembers { add, remove } => {
                self.ensure_admin(&env.sender)?;
                for addr in remove {
                    self.members.remove(&addr);
                }
                for Member { addr, points } in add {
                    self.members.insert(addr, points);
                }
            }
            EngagementExecuteMsg::AddPoints { addr, points } => {
                if !self.privileged_callers.contains(&env.sender) {
                    self.ensure_admin(&env.sender)?;
                }
                let entry = self.members.entry(addr).or_default();
                *entry = entry
                    .checked_add(points)
                    .ok_or_else(|| ContractError::Rule("points overflow".into()))?;
            }
        }
        Ok(Response::new())
    }

    fn query(&self, _deps: Deps<'_>, msg: &[u8]) -> ContractResult<Vec<u8>> {
        let msg: QueryMsg = from_json(msg)?;
        match msg {
            QueryMsg::Group(Tg4QueryMsg::Admin {}) => to_json(&AdminResponse { admin: self.admin }),
            QueryMsg::Group(Tg4QueryMsg::Member { addr }) => to_json(&MemberResponse {
                points: self.members.get(&addr).copied(),
            }),
            QueryMsg::Group(Tg4QueryMsg::ListMembers { start_after, limit }) => {
                let members = self.members.iter().map(|(addr, points)| Member::new(*addr, *points));
                to_json(&MemberListResponse {
                    members: paginate(members, start_after, limit),
                })
            }
            QueryMsg::Group(Tg4QueryMsg::TotalPoints {}) => to_json(&TotalPointsResponse {
                points: total_points(self.members.values().copied()),
            }),
            QueryMsg::Own(EngagementQueryMsg::Configuration {}) => to_json(&EngagementConfigResponse {
                token: self.token.clone(),
                halflife: self.halflife,
                preauths_hooks: self.preauths_hooks,
                preauths_slashing: self.preauths_slashing,
                privileged_callers: self.privileged_callers.clone(),
            }),
        }
    }

    fn clone_box(&self) -> Box<dyn NativeContract> {
        Box::new(self.clone())
    }
}
