use super::ensure_ratio;
use crate::adapters::host::native::{
    from_json, to_json, ContractResult, Deps, Env, NativeContract, Response,
};
use crate::contracts::tg4::{Member, MemberListResponse, MemberResponse};
use crate::contracts::trusted_circle::{
    EscrowResponse, EscrowStatus, TrustedCircleConfigResponse, TrustedCircleExecuteMsg,
    TrustedCircleInitMsg, TrustedCircleQueryMsg,
};
use crate::domain::value_objects::{Address, Coin, Decimal, Uint128};
use crate::errors::ContractError;
use std::collections::{BTreeMap, BTreeSet};

/// Voting weight of a member with a paid-up escrow.
const VOTER_POINTS: u64 = 1;

#[derive(Clone, Debug)]
struct Escrow {
    paid: Uint128,
    status: EscrowStatus,
}

/// Oversight community circle.
///
/// The instantiator becomes the circle admin and its attached funds are the
/// founding escrow. Voting members are admitted by the admin and start
/// voting once their own escrow is paid.
#[derive(Clone, Debug, Default)]
pub struct TrustedCircleNative {
    admin: Option<Address>,
    name: String,
    denom: String,
    escrow_amount: Uint128,
    founding_escrow: Uint128,
    voting_period: u32,
    quorum: Decimal,
    threshold: Decimal,
    allow_end_early: bool,
    deny_list: Option<Address>,
    edit_disabled: bool,
    escrows: BTreeMap<Address, Escrow>,
    non_voting: BTreeSet<Address>,
}

impl TrustedCircleNative {
    /// Empty instance for the host factory.
    pub fn boxed() -> Box<dyn NativeContract> {
        Box::<Self>::default()
    }

    fn ensure_admin(&self, sender: &Address) -> ContractResult<()> {
        if self.admin.as_ref() == Some(sender) {
            Ok(())
        } else {
            Err(ContractError::Unauthorized(format!("{sender} is not the circle admin")))
        }
    }

    fn voters(&self) -> impl Iterator<Item = Address> + '_ {
        self.escrows
            .iter()
            .filter(|(_, e)| e.status == EscrowStatus::Voting)
            .map(|(addr, _)| *addr)
    }
}

impl NativeContract for TrustedCircleNative {
    fn instantiate(&mut self, _deps: Deps<'_>, env: &Env, msg: &[u8]) -> ContractResult<Response> {
        let msg: TrustedCircleInitMsg = from_json(msg)?;
        if msg.name.is_empty() {
            return Err(ContractError::InvalidMessage("empty circle name".into()));
        }
        if msg.voting_period == 0 {
            return Err(ContractError::InvalidMessage("voting period must be positive".into()));
        }
        ensure_ratio("quorum", msg.quorum)?;
        ensure_ratio("threshold", msg.threshold)?;

        if !msg.escrow_amount.is_zero() {
            let [coin] = env.funds.as_slice() else {
                return Err(ContractError::InvalidFunds(
                    "founding escrow must be a single coin".into(),
                ));
            };
            if coin.amount != msg.escrow_amount {
                return Err(ContractError::InvalidFunds(format!(
                    "founding escrow must be {}, got {}",
                    msg.escrow_amount, coin.amount
                )));
            }
            self.denom = coin.denom.clone();
            self.founding_escrow = coin.amount;
        }

        self.admin = Some(env.sender);
        self.name = msg.name;
        self.escrow_amount = msg.escrow_amount;
        self.voting_period = msg.voting_period;
        self.quorum = msg.quorum;
        self.threshold = msg.threshold;
        self.allow_end_early = msg.allow_end_early;
        self.deny_list = msg.deny_list;
        self.edit_disabled = msg.edit_trusted_circle_disabled;
        self.non_voting = msg.initial_members.into_iter().collect();
        Ok(Response::new())
    }

    fn execute(&mut self, _deps: Deps<'_>, env: &Env, msg: &[u8]) -> ContractResult<Response> {
        let msg: TrustedCircleExecuteMsg = from_json(msg)?;
        match msg {
            TrustedCircleExecuteMsg::AddVotingMembers { voters } => {
                env.nonpayable()?;
                self.ensure_admin(&env.sender)?;
                for voter in voters {
                    if Some(voter) == self.deny_list {
                        return Err(ContractError::Rule(format!("{voter} is denied")));
                    }
                    if self.escrows.contains_key(&voter) {
                        return Err(ContractError::AlreadyExists(format!("voting member {voter}")));
                    }
                    let status = if self.escrow_amount.is_zero() {
                        EscrowStatus::Voting
                    } else {
                        EscrowStatus::Pending
                    };
                    self.non_voting.remove(&voter);
                    self.escrows.insert(
                        voter,
                        Escrow {
                            paid: Uint128::zero(),
                            status,
                        },
                    );
                }
            }
            TrustedCircleExecuteMsg::DepositEscrow {} => {
                let amount = env.must_pay(&self.denom)?;
                let escrow_amount = self.escrow_amount;
                let escrow = self
                    .escrows
                    .get_mut(&env.sender)
                    .ok_or_else(|| ContractError::NotFound(format!("voting member {}", env.sender)))?;
                escrow.paid += amount;
                if escrow.paid >= escrow_amount {
                    escrow.status = EscrowStatus::Voting;
                }
            }
            TrustedCircleExecuteMsg::UpdateConfig { quorum, threshold } => {
                env.nonpayable()?;
                if self.edit_disabled {
                    return Err(ContractError::Unauthorized(
                        "trusted circle editing is disabled".into(),
                    ));
                }
                self.ensure_admin(&env.sender)?;
                if let Some(quorum) = quorum {
                    ensure_ratio("quorum", quorum)?;
                    self.quorum = quorum;
                }
                if let Some(threshold) = threshold {
                    ensure_ratio("threshold", threshold)?;
                    self.threshold = threshold;
                }
            }
        }
        Ok(Response::new())
    }

    fn query(&self, _deps: Deps<'_>, msg: &[u8]) -> ContractResult<Vec<u8>> {
        let msg: TrustedCircleQueryMsg = from_json(msg)?;
        match msg {
            TrustedCircleQueryMsg::Configuration {} => to_json(&TrustedCircleConfigResponse {
                name: self.name.clone(),
                escrow_amount: Coin {
                    denom: self.denom.clone(),
                    amount: self.escrow_amount,
                },
                voting_period: self.voting_period,
                quorum: self.quorum,
                threshold: self.threshold,
                allow_end_early: self.allow_end_early,
                deny_list: self.deny_list,
                edit_trusted_circle_disabled: self.edit_disabled,
            }),
            TrustedCircleQueryMsg::Voter { addr } => {
                let voting = self
                    .escrows
                    .get(&addr)
                    .is_some_and(|e| e.status == EscrowStatus::Voting);
                to_json(&MemberResponse {
                    points: voting.then_some(VOTER_POINTS),
                })
            }
            TrustedCircleQueryMsg::ListVoters {} => to_json(&MemberListResponse {
                members: self.voters().map(|a| Member::new(a, VOTER_POINTS)).collect(),
            }),
            TrustedCircleQueryMsg::ListNonVotingMembers {} => to_json(&MemberListResponse {
                members: self.non_voting.iter().map(|a| Member::new(*a, 0)).collect(),
            }),
            TrustedCircleQueryMsg::Escrow { addr } => {
                let escrow = self.escrows.get(&addr).map(|e| EscrowResponse {
                    paid: e.paid,
                    status: e.status,
                });
                to_json(&escrow)
            }
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

    const ESCROW: u128 = 1_000_000;

    fn admin() -> Address {
        Address::new([1u8; 20])
    }

    fn env(sender: Address, funds: Vec<Coin>) -> Env {
        Env {
            contract: Address::new([0xee; 20]),
            sender,
            funds,
        }
    }

    fn init_msg(edit_disabled: bool) -> TrustedCircleInitMsg {
        TrustedCircleInitMsg {
            name: "oversight".into(),
            escrow_amount: Uint128::new(ESCROW),
            voting_period: 1,
            quorum: Decimal::percent(50),
            threshold: Decimal::percent(66),
            allow_end_early: true,
            initial_members: vec![],
            deny_list: None,
            edit_trusted_circle_disabled: edit_disabled,
        }
    }

    fn instantiated(edit_disabled: bool) -> TrustedCircleNative {
        let mut circle = TrustedCircleNative::default();
        circle
            .instantiate(
                Deps::new(&NoQuerier),
                &env(admin(), vec![Coin::new(ESCROW, "utgd")]),
                &to_json(&init_msg(edit_disabled)).unwrap(),
            )
            .unwrap();
        circle
    }

    fn run(
        circle: &mut TrustedCircleNative,
        sender: Address,
        funds: Vec<Coin>,
        msg: &TrustedCircleExecuteMsg,
    ) -> ContractResult<Response> {
        circle.execute(Deps::new(&NoQuerier), &env(sender, funds), &to_json(msg).unwrap())
    }

    #[test]
    fn test_founding_escrow_must_match() {
        let mut circle = TrustedCircleNative::default();
        let err = circle
            .instantiate(
                Deps::new(&NoQuerier),
                &env(admin(), vec![Coin::new(ESCROW - 1, "utgd")]),
                &to_json(&init_msg(false)).unwrap(),
            )
            .unwrap_err();
        assert!(matches!(err, ContractError::InvalidFunds(_)));

        let circle = instantiated(false);
        assert_eq!(circle.founding_escrow, Uint128::new(ESCROW));
        assert_eq!(circle.denom, "utgd");
    }

    #[test]
    fn test_member_votes_once_escrow_is_paid() {
        let mut circle = instantiated(false);
        let member = Address::new([2u8; 20]);
        let admit = TrustedCircleExecuteMsg::AddVotingMembers {
            voters: vec![member],
        };

        assert!(run(&mut circle, member, vec![], &admit).is_err());
        run(&mut circle, admin(), vec![], &admit).unwrap();
        assert_eq!(circle.voters().count(), 0);

        let deposit = TrustedCircleExecuteMsg::DepositEscrow {};
        run(&mut circle, member, vec![Coin::new(ESCROW / 2, "utgd")], &deposit).unwrap();
        assert_eq!(circle.escrows[&member].status, EscrowStatus::Pending);
        run(&mut circle, member, vec![Coin::new(ESCROW / 2, "utgd")], &deposit).unwrap();
        assert_eq!(circle.voters().collect::<Vec<_>>(), vec![member]);

        let again = run(&mut circle, admin(), vec![], &admit).unwrap_err();
        assert!(matches!(again, ContractError::AlreadyExists(_)));
    }

    #[test]
    fn test_config_edits_respect_freeze() {
        let update = TrustedCircleExecuteMsg::UpdateConfig {
            quorum: Some(Decimal::percent(60)),
            threshold: None,
        };

        let mut open = instantiated(false);
        run(&mut open, admin(), vec![], &update).unwrap();
        assert_eq!(open.quorum, Decimal::percent(60));

        let mut frozen = instantiated(true);
        let err = run(&mut frozen, admin(), vec![], &update).unwrap_err();
        assert!(matches!(err, ContractError::Unauthorized(_)));
        assert_eq!(frozen.quorum, Decimal::percent(50));
    }
}
