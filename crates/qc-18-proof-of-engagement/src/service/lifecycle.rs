//! Validator lifecycle: `CreateValidator` and `UpdateValidator`.
//!
//! All checks that need no contract state run before the first contract
//! call. Contract failures are wrapped with the step that issued the call and
//! leave undoing to the enclosing transaction.

use super::PoeService;
use crate::contracts::engagement::EngagementContract;
use crate::contracts::stake::StakeContract;
use crate::contracts::tg4::Member;
use crate::contracts::valset::ValsetContract;
use crate::domain::entities::{ContractRole, Description, ValidatorRecord};
use crate::domain::messages::{MsgCreateValidator, MsgUpdateValidator};
use crate::domain::value_objects::{Address, Coin};
use crate::errors::{PoeError, PoeResult};
use crate::events::PoeEvent;
use crate::ports::outbound::{ContractHost, EventSink, PoeKeeper, PrivilegeGranter};
use tracing::{debug, info, instrument, warn};

impl<H, K, E> PoeService<H, K, E>
where
    H: ContractHost + PrivilegeGranter,
    K: PoeKeeper,
    E: EventSink,
{
    #[instrument(skip(self, msg), fields(operator = %msg.delegator_address))]
    pub(super) async fn handle_create_validator(&self, msg: MsgCreateValidator) -> PoeResult<()> {
        match self.create_validator_inner(msg).await {
            Ok(()) => {
                self.stats.write().await.validators_created += 1;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "create validator rejected");
                self.stats.write().await.rejected_transactions += 1;
                Err(err)
            }
        }
    }

    #[instrument(skip(self, msg), fields(operator = %msg.delegator_address))]
    pub(super) async fn handle_update_validator(&self, msg: MsgUpdateValidator) -> PoeResult<()> {
        match self.update_validator_inner(msg).await {
            Ok(()) => {
                self.stats.write().await.validators_updated += 1;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "update validator rejected");
                self.stats.write().await.rejected_transactions += 1;
                Err(err)
            }
        }
    }

    async fn create_validator_inner(&self, msg: MsgCreateValidator) -> PoeResult<()> {
        let MsgCreateValidator {
            delegator_address: operator,
            pubkey,
            description,
            value,
        } = msg;

        if !self.config.consensus.allows(pubkey.key_type) {
            return Err(PoeError::PubKeyTypeNotSupported {
                got: pubkey.key_type.as_str().to_string(),
                allowed: self.config.allowed_pubkey_types(),
            });
        }
        description.ensure_length()?;

        let valset = self.contract(ContractRole::Valset)?;
        ValsetContract::new(valset, &*self.host)
            .register_validator(operator, pubkey.clone(), &description)
            .await
            .map_err(PoeError::host("register validator"))?;

        let staking = self.contract(ContractRole::Staking)?;
        StakeContract::new(staking, &*self.host)
            .bond(operator, value.clone())
            .await
            .map_err(PoeError::host("self delegation validator"))?;

        self.set_initial_engagement_points(operator, &value).await?;

        info!(moniker = %description.moniker, amount = %value.amount, "validator created");
        self.events.emit(vec![
            PoeEvent::message(operator),
            PoeEvent::ValidatorCreated {
                operator,
                moniker: description.moniker,
                pubkey_hex: pubkey.to_hex(),
                amount: value.amount,
            },
        ]);
        Ok(())
    }

    async fn update_validator_inner(&self, msg: MsgUpdateValidator) -> PoeResult<()> {
        let operator = msg.delegator_address;
        msg.description.ensure_length()?;

        let valset = self.contract(ContractRole::Valset)?;
        let contract = ValsetContract::new(valset, &*self.host);
        let current = contract
            .validator(operator)
            .await
            .map_err(PoeError::host("query current description"))?
            .ok_or(PoeError::UnknownOperator(operator))?;

        let description = Description::from(current.metadata).updated(&msg.description)?;
        contract
            .update_validator(operator, &description)
            .await
            .map_err(PoeError::host("update validator"))?;

        info!(moniker = %description.moniker, "validator updated");
        self.events.emit(vec![
            PoeEvent::message(operator),
            PoeEvent::ValidatorUpdated {
                operator,
                moniker: description.moniker,
            },
        ]);
        Ok(())
    }

    /// Grants the configured engagement points to a new validator with a
    /// sufficient self-bond, unless it already holds points.
    async fn set_initial_engagement_points(
        &self,
        operator: Address,
        bond: &Coin,
    ) -> PoeResult<()> {
        let params = &self.config.initial_engagement;
        if params.points == 0 || bond.amount.is_zero() || bond.amount < params.min_self_bond {
            debug!(amount = %bond.amount, "no initial engagement points");
            return Ok(());
        }

        let engagement = self.contract(ContractRole::EngagementGroup)?;
        let contract = EngagementContract::new(engagement, &*self.host);
        let existing = contract
            .group()
            .member(operator)
            .await
            .map_err(PoeError::host("query engagement points"))?;
        if existing.is_some() {
            debug!("operator already holds engagement points");
            return Ok(());
        }

        let admin = self.keeper.system_admin()?;
        contract
            .update_members(admin, vec![Member::new(operator, params.points)], vec![])
            .await
            .map_err(PoeError::host("set initial engagement points"))?;
        self.keeper
            .set_initial_engagement_points(operator, params.points);
        debug!(points = params.points, "initial engagement points granted");
        Ok(())
    }

    pub(super) async fn query_validator(
        &self,
        operator: Address,
    ) -> PoeResult<Option<ValidatorRecord>> {
        let valset = self.contract(ContractRole::Valset)?;
        let Some(registered) = ValsetContract::new(valset, &*self.host)
            .validator(operator)
            .await
            .map_err(PoeError::host("query validator"))?
        else {
            return Ok(None);
        };

        let staking = self.contract(ContractRole::Staking)?;
        let bonded = StakeContract::new(staking, &*self.host)
            .staked(operator)
            .await
            .map_err(PoeError::host("query self delegation"))?;

        let engagement = self.contract(ContractRole::EngagementGroup)?;
        let engagement_points = EngagementContract::new(engagement, &*self.host)
            .group()
            .member(operator)
            .await
            .map_err(PoeError::host("query engagement points"))?;

        Ok(Some(ValidatorRecord {
            operator,
            pubkey: registered.pubkey,
            description: registered.metadata.into(),
            bonded,
            engagement_points,
        }))
    }
}
