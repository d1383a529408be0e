use super::{ensure_ratio, list_all_members};
use crate::adapters::host::native::{
    from_json, to_json, ContractResult, Deps, Env, NativeContract, Reply, Response, SubMsg,
};
use crate::contracts::engagement::EngagementInitMsg;
use crate::contracts::tg4::{Tg4QueryMsg, TotalPointsResponse, DEFAULT_LIMIT, MAX_LIMIT};
use crate::contracts::valset::{
    ListActiveValidatorsResponse, ListValidatorsResponse, OperatorResponse, ValidatorInfo,
    ValidatorMetadata, ValidatorResponse, ValsetConfigResponse, ValsetExecuteMsg, ValsetInitMsg,
    ValsetQueryMsg,
};
use crate::domain::value_objects::{Address, PublicKey};
use crate::errors::ContractError;
use std::collections::BTreeMap;

/// Shortest accepted validator moniker.
pub const MIN_MONIKER_LENGTH: usize = 3;

const DISTRIBUTION_REPLY_ID: u64 = 1;
const DISTRIBUTION_LABEL: &str = "rewards_distribution";

#[derive(Clone, Debug)]
struct Operator {
    pubkey: PublicKey,
    metadata: ValidatorMetadata,
}

/// Validator set manager.
///
/// Operators register their consensus key here. The active set is read from
/// the membership group on demand. Instantiation spawns the reward
/// distribution contract from `rewards_code_id`.
#[derive(Clone, Debug, Default)]
pub struct ValsetNative {
    config: Option<ValsetInitMsg>,
    distribution: Option<Address>,
    operators: BTreeMap<Address, Operator>,
}

impl ValsetNative {
    /// Empty instance for the host factory.
    pub fn boxed() -> Box<dyn NativeContract> {
        Box::<Self>::default()
    }

    fn config(&self) -> ContractResult<&ValsetInitMsg> {
        self.config
            .as_ref()
            .ok_or_else(|| ContractError::Rule("valset is not instantiated".into()))
    }

    fn register(
        &mut self,
        operator: Address,
        pubkey: PublicKey,
        metadata: ValidatorMetadata,
    ) -> ContractResult<()> {
        validate_metadata(&metadata)?;
        if !pubkey.is_well_formed() {
            return Err(ContractError::InvalidMessage(format!(
                "malformed {} pubkey",
                pubkey.key_type.as_str()
            )));
        }
        if self.operators.contains_key(&operator) {
            return Err(ContractError::AlreadyExists(format!("operator {operator}")));
        }
        if self.operators.values().any(|o| o.pubkey == pubkey) {
            return Err(ContractError::AlreadyExists(format!(
                "pubkey {}",
                pubkey.to_hex()
            )));
        }
        self.operators.insert(operator, Operator { pubkey, metadata });
        Ok(())
    }

    fn active_validators(&self, deps: Deps<'_>) -> ContractResult<Vec<ValidatorInfo>> {
        let config = self.config()?;
        let scaling = u64::from(config.scaling.unwrap_or(1));
        let mut active: Vec<ValidatorInfo> = list_all_members(deps, config.membership)?
            .into_iter()
            .filter(|m| m.points > 0 && m.points >= config.min_points)
            .filter_map(|m| {
                self.operators.get(&m.addr).map(|op| ValidatorInfo {
                    operator: m.addr,
                    validator_pubkey: op.pubkey.clone(),
                    power: m.points.saturating_mul(scaling),
                })
            })
            .collect();
        active.sort_by(|a, b| b.power.cmp(&a.power).then(a.operator.cmp(&b.operator)));
        active.truncate(config.max_validators as usize);
        Ok(active)
    }
}

fn validate_metadata(metadata: &ValidatorMetadata) -> ContractResult<()> {
    if metadata.moniker.chars().count() < MIN_MONIKER_LENGTH {
        return Err(ContractError::InvalidMessage(format!(
            "moniker must have at least {MIN_MONIKER_LENGTH} characters"
        )));
    }
    Ok(())
}

impl NativeContract for ValsetNative {
    fn instantiate(&mut self, deps: Deps<'_>, env: &Env, msg: &[u8]) -> ContractResult<Response> {
        env.nonpayable()?;
        let mut msg: ValsetInitMsg = from_json(msg)?;
        if msg.max_validators == 0 {
            return Err(ContractError::InvalidMessage(
                "max_validators must be positive".into(),
            ));
        }
        if msg.epoch_length == 0 {
            return Err(ContractError::InvalidMessage("epoch_length must be positive".into()));
        }
        if msg.scaling == Some(0) {
            return Err(ContractError::InvalidMessage("scaling must be positive".into()));
        }
        ensure_ratio("fee_percentage", msg.fee_percentage)?;
        ensure_ratio("validators_reward_ratio", msg.validators_reward_ratio)?;
        let _: TotalPointsResponse = deps.query(msg.membership, &Tg4QueryMsg::TotalPoints {})?;

        for key in std::mem::take(&mut msg.initial_keys) {
            self.register(key.operator, key.validator_pubkey, key.metadata)?;
        }

        let distribution = EngagementInitMsg {
            admin: Some(env.contract),
            members: vec![],
            preauths_hooks: 0,
            preauths_slashing: 0,
            token: msg.epoch_reward.denom.clone(),
            halflife: None,
            privileged_callers: vec![],
        };
        let spawn = SubMsg::Instantiate {
            code_id: msg.rewards_code_id,
            msg: to_json(&distribution)?,
            funds: vec![],
            label: DISTRIBUTION_LABEL.to_string(),
            admin: Some(env.contract),
            reply_id: DISTRIBUTION_REPLY_ID,
        };
        self.config = Some(msg);
        Ok(Response::new().add_message(spawn))
    }

    fn execute(&mut self, _deps: Deps<'_>, env: &Env, msg: &[u8]) -> ContractResult<Response> {
        env.nonpayable()?;
        self.config()?;
        let msg: ValsetExecuteMsg = from_json(msg)?;
        match msg {
            ValsetExecuteMsg::RegisterValidatorKey { pubkey, metadata } => {
                self.register(env.sender, pubkey, metadata)?;
            }
            ValsetExecuteMsg::UpdateMetadata(metadata) => {
                validate_metadata(&metadata)?;
                let operator = self.operators.get_mut(&env.sender).ok_or_else(|| {
                    ContractError::NotFound(format!("operator {}", env.sender))
                })?;
                operator.metadata = metadata;
            }
        }
        Ok(Response::new())
    }

    fn query(&self, deps: Deps<'_>, msg: &[u8]) -> ContractResult<Vec<u8>> {
        let msg: ValsetQueryMsg = from_json(msg)?;
        match msg {
            ValsetQueryMsg::Configuration {} => {
                let config = self.config()?;
                let distribution_contract = self.distribution.ok_or_else(|| {
                    ContractError::NotFound("reward distribution contract".into())
                })?;
                to_json(&ValsetConfigResponse {
                    membership: config.membership,
                    min_points: config.min_points,
                    max_validators: config.max_validators,
                    epoch_length: config.epoch_length,
                    epoch_reward: config.epoch_reward.clone(),
                    scaling: config.scaling,
                    fee_percentage: config.fee_percentage,
                    auto_unjail: config.auto_unjail,
                    validators_reward_ratio: config.validators_reward_ratio,
                    distribution_contract,
                })
            }
            ValsetQueryMsg::Validator { operator } => to_json(&ValidatorResponse {
                validator: self.operators.get(&operator).map(|op| OperatorResponse {
                    operator,
                    pubkey: op.pubkey.clone(),
                    metadata: op.metadata.clone(),
                }),
            }),
            ValsetQueryMsg::ListValidators { start_after, limit } => {
                let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
                let validators = self
                    .operators
                    .iter()
                    .filter(|(addr, _)| start_after.map_or(true, |after| **addr > after))
                    .take(limit)
                    .map(|(addr, op)| OperatorResponse {
                        operator: *addr,
                        pubkey: op.pubkey.clone(),
                        metadata: op.metadata.clone(),
                    })
                    .collect();
                to_json(&ListValidatorsResponse { validators })
            }
            ValsetQueryMsg::ListActiveValidators {} => to_json(&ListActiveValidatorsResponse {
                validators: self.active_validators(deps)?,
            }),
        }
    }

    fn reply(&mut self, _deps: Deps<'_>, _env: &Env, reply: Reply) -> ContractResult<Response> {
        if reply.id != DISTRIBUTION_REPLY_ID {
            return Err(ContractError::Rule(format!("unexpected reply {}", reply.id)));
        }
        if self.distribution.is_some() {
            return Err(ContractError::AlreadyExists(
                "reward distribution contract".into(),
            ));
        }
        self.distribution = Some(reply.contract_address);
        Ok(Response::new())
    }

    fn clone_box(&self) -> Box<dyn NativeContract> {
        Box::new(self.clone())
    }
}
