use super::{list_all_members, total_points};
use crate::adapters::host::native::{
    from_json, to_json, ContractResult, Deps, Env, NativeContract, Response,
};
use crate::contracts::mixer::{GroupsResponse, MixerFunction, MixerInitMsg, MixerQueryMsg};
use crate::contracts::tg4::{
    paginate, AdminResponse, Member, MemberListResponse, MemberResponse, Tg4QueryMsg,
    TotalPointsResponse,
};
use crate::domain::services::geometric_mean;
use crate::domain::value_objects::Address;
use crate::errors::ContractError;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum QueryMsg {
    Group(Tg4QueryMsg),
    Own(MixerQueryMsg),
}

/// Mixed group over two source groups. Members present in both groups get
/// the geometric mean of their two weights; the mixer holds no state of its
/// own and reads both groups on every query.
#[derive(Clone, Debug)]
pub struct MixerNative {
    groups: Option<(Address, Address)>,
    function_type: MixerFunction,
}

impl Default for MixerNative {
    fn default() -> Self {
        Self {
            groups: None,
            function_type: MixerFunction::GeometricMean {},
        }
    }
}

impl MixerNative {
    /// Empty instance for the host factory.
    pub fn boxed() -> Box<dyn NativeContract> {
        Box::<Self>::default()
    }

    fn groups(&self) -> ContractResult<(Address, Address)> {
        self.groups
            .ok_or_else(|| ContractError::Rule("mixer is not instantiated".into()))
    }

    fn mixed_points(&self, deps: Deps<'_>, addr: Address) -> ContractResult<Option<u64>> {
        let (left, right) = self.groups()?;
        let left: MemberResponse = deps.query(left, &Tg4QueryMsg::Member { addr })?;
        let Some(left) = left.points else {
            return Ok(None);
        };
        let right: MemberResponse = deps.query(right, &Tg4QueryMsg::Member { addr })?;
        Ok(right.points.map(|right| self.mix(left, right)))
    }

    fn mix(&self, left: u64, right: u64) -> u64 {
        match self.function_type {
            MixerFunction::GeometricMean {} => geometric_mean(left, right),
        }
    }

    fn all_members(&self, deps: Deps<'_>) -> ContractResult<Vec<Member>> {
        let (left, _) = self.groups()?;
        let mut mixed = Vec::new();
        for member in list_all_members(deps, left)? {
            if let Some(points) = self.mixed_points(deps, member.addr)? {
                mixed.push(Member::new(member.addr, points));
            }
        }
        Ok(mixed)
    }
}

impl NativeContract for MixerNative {
    fn instantiate(&mut self, deps: Deps<'_>, env: &Env, msg: &[u8]) -> ContractResult<Response> {
        env.nonpayable()?;
        let msg: MixerInitMsg = from_json(msg)?;
        if msg.left_group == msg.right_group {
            return Err(ContractError::InvalidMessage(
                "mixer groups must be distinct".into(),
            ));
        }
        for group in [msg.left_group, msg.right_group] {
            let _: TotalPointsResponse = deps.query(group, &Tg4QueryMsg::TotalPoints {})?;
        }
        self.groups = Some((msg.left_group, msg.right_group));
        self.function_type = msg.function_type;
        Ok(Response::new())
    }

    fn execute(&mut self, _deps: Deps<'_>, _env: &Env, _msg: &[u8]) -> ContractResult<Response> {
        Err(ContractError::Rule("mixer accepts no execute messages".into()))
    }

    fn query(&self, deps: Deps<'_>, msg: &[u8]) -> ContractResult<Vec<u8>> {
        let msg: QueryMsg = from_json(msg)?;
        match msg {
            QueryMsg::Group(Tg4QueryMsg::Admin {}) => to_json(&AdminResponse { admin: None }),
            QueryMsg::Group(Tg4QueryMsg::Member { addr }) => to_json(&MemberResponse {
                points: self.mixed_points(deps, addr)?,
            }),
            QueryMsg::Group(Tg4QueryMsg::ListMembers { start_after, limit }) => {
                to_json(&MemberListResponse {
                    members: paginate(self.all_members(deps)?, start_after, limit),
                })
            }
            QueryMsg::Group(Tg4QueryMsg::TotalPoints {}) => to_json(&TotalPointsResponse {
                points: total_points(self.all_members(deps)?.iter().map(|m| m.points)),
            }),
            QueryMsg::Own(MixerQueryMsg::Groups {}) => {
                let (left, right) = self.groups()?;
                to_json(&GroupsResponse {
                    left,
                    right,
                    function_type: self.function_type.clone(),
                })
            }
        }
    }

    fn clone_box(&self) -> Box<dyn NativeContract> {
        Box::new(self.clone())
    }
}
