use super::total_points;
use crate::adapters::host::native::{
    from_json, to_json, ContractResult, Deps, Env, NativeContract, Response,
};
use crate::contracts::stake::{
    StakeConfigResponse, StakeExecuteMsg, StakeInitMsg, StakeQueryMsg, StakedResponse,
};
use crate::contracts::tg4::{
    paginate, AdminResponse, Member, MemberListResponse, MemberResponse, Tg4QueryMsg,
    TotalPointsResponse,
};
use crate::domain::value_objects::{Address, Coin, Uint128};
use crate::errors::ContractError;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Deserialize)]
#[serde(untagged)]
enum QueryMsg {
    Group(Tg4QueryMsg),
    Own(StakeQueryMsg),
}

/// Bonded-token group. A staker's points are `stake / tokens_per_point`
/// once the stake reaches `min_bond`.
#[derive(Clone, Debug, Default)]
pub struct StakeNative {
    admin: Option<Address>,
    denom: String,
    min_bond: Uint128,
    tokens_per_point: Uint128,
    unbonding_period: u64,
    auto_return_limit: u64,
    stakes: BTreeMap<Address, Uint128>,
}

impl StakeNative {
    /// Empty instance for the host factory.
    pub fn boxed() -> Box<dyn NativeContract> {
        Box::<Self>::default()
    }

    fn points(&self, stake: Uint128) -> Option<u64> {
        if stake < self.min_bond || stake.is_zero() {
            return None;
        }
        u64::try_from(stake.u128() / self.tokens_per_point.u128()).ok()
    }

    fn members(&self) -> impl Iterator<Item = Member> + '_ {
        self.stakes
            .iter()
            .filter_map(|(addr, stake)| self.points(*stake).map(|p| Member::new(*addr, p)))
    }
}

impl NativeContract for StakeNative {
    fn instantiate(&mut self, _deps: Deps<'_>, env: &Env, msg: &[u8]) -> ContractResult<Response> {
        env.nonpayable()?;
        let msg: StakeInitMsg = from_json(msg)?;
        if msg.denom.is_empty() {
            return Err(ContractError::InvalidMessage("empty stake denom".into()));
        }
        if msg.tokens_per_point.is_zero() {
            return Err(ContractError::InvalidMessage(
                "tokens_per_point must be positive".into(),
            ));
        }
        self.admin = msg.admin;
        self.denom = msg.denom;
        self.min_bond = msg.min_bond;
        self.tokens_per_point = msg.tokens_per_point;
        self.unbonding_period = msg.unbonding_period;
        self.auto_return_limit = msg.auto_return_limit;
        Ok(Response::new())
    }

    fn execute(&mut self, _deps: Deps<'_>, env: &Env, msg: &[u8]) -> ContractResult<Response> {
        let msg: StakeExecuteMsg = from_json(msg)?;
        match msg {
            StakeExecuteMsg::Bond {} => {
                let amount = env.must_pay(&self.denom)?;
                let stake = self.stakes.entry(env.sender).or_default();
                *stake = stake
                    .checked_add(amount)
                    .map_err(|e| ContractError::Rule(e.to_string()))?;
            }
        }
        Ok(Response::new())
    }

    fn query(&self, _deps: Deps<'_>, msg: &[u8]) -> ContractResult<Vec<u8>> {
        let msg: QueryMsg = from_json(msg)?;
        match msg {
            QueryMsg::Group(Tg4QueryMsg::Admin {}) => to_json(&AdminResponse { admin: self.admin }),
            QueryMsg::Group(Tg4QueryMsg::Member { addr }) => to_json(&MemberResponse {
                points: self.stakes.get(&addr).and_then(|s| self.points(*s)),
            }),
            QueryMsg::Group(Tg4QueryMsg::ListMembers { start_after, limit }) => {
                to_json(&MemberListResponse {
                    members: paginate(self.members(), start_after, limit),
                })
            }
            QueryMsg::Group(Tg4QueryMsg::TotalPoints {}) => to_json(&TotalPointsResponse {
                points: total_points(self.members().map(|m| m.points)),
            }),
            QueryMsg::Own(StakeQueryMsg::Staked { address }) => to_json(&StakedResponse {
                stake: Coin {
                    denom: self.denom.clone(),
                    amount: self.stakes.get(&address).copied().unwrap_or_default(),
                },
            }),
            QueryMsg::Own(StakeQueryMsg::Configuration {}) => to_json(&StakeConfigResponse {
                denom: self.denom.clone(),
                tokens_per_point: self.tokens_per_point,
                min_bond: self.min_bond,
                unbonding_period: self.unbonding_period,
                auto_return_limit: self.auto_return_limit,
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
    use crate::adapters::host::native::Querier;

    struct NoQuerier;

    impl Querier for NoQuerier {
        fn query_raw(&self, contract: Address, _msg: &[u8]) -> ContractResult<Vec<u8>> {
            Err(ContractError::NotFound(format!("contract {contract}")))
        }
    }

    fn instantiated() -> StakeNative {
        let mut contract = StakeNative::default();
        let msg = StakeInitMsg {
            admin: None,
            denom: "utgd".into(),
            min_bond: Uint128::new(2_000_000),
            tokens_per_point: Uint128::new(1_000_000),
            unbonding_period: 60,
            auto_return_limit: 20,
            preauths_hooks: 1,
            preauths_slashing: 1,
        };
        let env = Env {
            contract: Address::new([0xee; 20]),
            sender: Address::ZERO,
            funds: vec![],
        };
        contract
            .instantiate(Deps::new(&NoQuerier), &env, &to_json(&msg).unwrap())
            .unwrap();
        contract
    }

    fn bond(contract: &mut StakeNative, staker: Address, amount: u128) -> ContractResult<Response> {
        let env = Env {
            contract: Address::new([0xee; 20]),
            sender: staker,
            funds: vec![Coin::new(amount, "utgd")],
        };
        contract.execute(
            Deps::new(&NoQuerier),
            &env,
            &to_json(&StakeExecuteMsg::Bond {}).unwrap(),
        )
    }

    #[test]
    fn test_points_follow_min_bond() {
        let mut contract = instantiated();
        let staker = Address::new([1u8; 20]);

        bond(&mut contract, staker, 1_500_000).unwrap();
        assert_eq!(contract.points(contract.stakes[&staker]), None);

        bond(&mut contract, staker, 1_500_000).unwrap();
        assert_eq!(contract.points(contract.stakes[&staker]), Some(3));
        assert_eq!(contract.members().count(), 1);
    }

    #[test]
    fn test_bond_requires_stake_denom() {
        let mut contract = instantiated();
        let env = Env {
            contract: Address::new([0xee; 20]),
            sender: Address::new([1u8; 20]),
            funds: vec![Coin::new(5u128, "uatom")],
        };
        let err = contract
            .execute(
                Deps::new(&NoQuerier),
                &env,
                &to_json(&StakeExecuteMsg::Bond {}).unwrap(),
            )
            .unwrap_err();
        assert!(matches!(err, ContractError::InvalidFunds(_)));
    }
}
