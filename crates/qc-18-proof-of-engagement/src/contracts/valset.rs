//! tgrade-valset: maps the mixer group onto the active validator set.
//!
//! On instantiation the valset creates its own reward distribution
//! contract from `rewards_code_id` and reports the address in its
//! configuration.

use super::{execute, query};
use crate::domain::entities::Description;
use crate::domain::value_objects::{Address, CodeId, Coin, Decimal, PublicKey};
use crate::errors::HostError;
use crate::ports::outbound::ContractHost;
use serde::{Deserialize, Serialize};

/// Validator metadata as stored by the valset.
///
/// Optional fields are absent rather than empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorMetadata {
    /// Display name.
    pub moniker: String,
    /// Identity signature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    /// Website.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Security contact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_contact: Option<String>,
    /// Details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl From<&Description> for ValidatorMetadata {
    fn from(desc: &Description) -> Self {
        Self {
            moniker: desc.moniker.clone(),
            identity: non_empty(&desc.identity),
            website: non_empty(&desc.website),
            security_contact: non_empty(&desc.security_contact),
            details: non_empty(&desc.details),
        }
    }
}

impl From<ValidatorMetadata> for Description {
    fn from(meta: ValidatorMetadata) -> Self {
        Self {
            moniker: meta.moniker,
            identity: meta.identity.unwrap_or_default(),
            website: meta.website.unwrap_or_default(),
            security_contact: meta.security_contact.unwrap_or_default(),
            details: meta.details.unwrap_or_default(),
        }
    }
}

/// A validator key registered at instantiation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorInitInfo {
    /// Operator account.
    pub operator: Address,
    /// Consensus key.
    pub validator_pubkey: PublicKey,
    /// Metadata.
    pub metadata: ValidatorMetadata,
}

/// Instantiate message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValsetInitMsg {
    /// Group providing validator weights (the mixer).
    pub membership: Address,
    /// Minimum weight to be eligible.
    pub min_points: u64,
    /// Max active validators.
    pub max_validators: u32,
    /// Epoch length in seconds.
    pub epoch_length: u64,
    /// Reward per epoch.
    pub epoch_reward: Coin,
    /// Validators known at instantiation.
    pub initial_keys: Vec<OperatorInitInfo>,
    /// Weight to power multiplier.
    pub scaling: Option<u32>,
    /// Fee share ratio.
    pub fee_percentage: Decimal,
    /// Unjail automatically.
    pub auto_unjail: bool,
    /// Validator reward share ratio.
    pub validators_reward_ratio: Decimal,
    /// Code used for the reward distribution contract.
    pub rewards_code_id: CodeId,
}

/// Execute messages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValsetExecuteMsg {
    /// Registers the sender as a validator operator.
    RegisterValidatorKey {
        /// Consensus key.
        pubkey: PublicKey,
        /// Metadata.
        metadata: ValidatorMetadata,
    },
    /// Replaces the sender's metadata.
    UpdateMetadata(ValidatorMetadata),
}

/// Queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValsetQueryMsg {
    /// Contract configuration.
    Configuration {},
    /// A single operator.
    Validator {
        /// Operator account.
        operator: Address,
    },
    /// Registered operators in address order.
    ListValidators {
        /// Exclusive lower bound.
        start_after: Option<Address>,
        /// Page size.
        limit: Option<u32>,
    },
    /// The current active set.
    ListActiveValidators {},
}

/// Response to `Configuration`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValsetConfigResponse {
    /// Membership group.
    pub membership: Address,
    /// Minimum weight.
    pub min_points: u64,
    /// Max active validators.
    pub max_validators: u32,
    /// Epoch length in seconds.
    pub epoch_length: u64,
    /// Reward per epoch.
    pub epoch_reward: Coin,
    /// Weight to power multiplier.
    pub scaling: Option<u32>,
    /// Fee share ratio.
    pub fee_percentage: Decimal,
    /// Unjail automatically.
    pub auto_unjail: bool,
    /// Validator reward share ratio.
    pub validators_reward_ratio: Decimal,
    /// Reward distribution contract created at instantiation.
    pub distribution_contract: Address,
}

/// A registered operator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorResponse {
    /// Operator account.
    pub operator: Address,
    /// Consensus key.
    pub pubkey: PublicKey,
    /// Metadata.
    pub metadata: ValidatorMetadata,
}

/// Response to `Validator`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorResponse {
    /// The operator, if registered.
    pub validator: Option<OperatorResponse>,
}

/// Response to `ListValidators`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListValidatorsResponse {
    /// Page of operators.
    pub validators: Vec<OperatorResponse>,
}

/// An active validator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorInfo {
    /// Operator account.
    pub operator: Address,
    /// Consensus key.
    pub validator_pubkey: PublicKey,
    /// Consensus power.
    pub power: u64,
}

/// Response to `ListActiveValidators`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListActiveValidatorsResponse {
    /// Active set, highest power first.
    pub validators: Vec<ValidatorInfo>,
}

/// Typed access to a valset contract.
pub struct ValsetContract<'a, H: ?Sized> {
    address: Address,
    host: &'a H,
}

impl<'a, H: ContractHost + ?Sized> ValsetContract<'a, H> {
    /// Binds the adapter to a contract.
    pub fn new(address: Address, host: &'a H) -> Self {
        Self { address, host }
    }

    /// Contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Registers `operator` with its consensus key and metadata.
    ///
    /// # Errors
    ///
    /// Host errors, including contract rejection.
    pub async fn register_validator(
        &self,
        operator: Address,
        pubkey: PublicKey,
        description: &Description,
    ) -> Result<(), HostError> {
        let msg = ValsetExecuteMsg::RegisterValidatorKey {
            pubkey,
            metadata: description.into(),
        };
        execute(self.host, self.address, operator, &msg, &[]).await?;
        Ok(())
    }

    /// Replaces the metadata of `operator`.
    ///
    /// # Errors
    ///
    /// Host errors, including contract rejection.
    pub async fn update_validator(
        &self,
        operator: Address,
        description: &Description,
    ) -> Result<(), HostError> {
        let msg = ValsetExecuteMsg::UpdateMetadata(description.into());
        execute(self.host, self.address, operator, &msg, &[]).await?;
        Ok(())
    }

    /// A single operator.
    ///
    /// # Errors
    ///
    /// Host or decoding errors.
    pub async fn validator(&self, operator: Address) -> Result<Option<OperatorResponse>, HostError> {
        let resp: ValidatorResponse =
            query(self.host, self.address, &ValsetQueryMsg::Validator { operator }).await?;
        Ok(resp.validator)
    }

    /// Registered operators.
    ///
    /// # Errors
    ///
    /// Host or decoding errors.
    pub async fn list_validators(
        &self,
        start_after: Option<Address>,
        limit: Option<u32>,
    ) -> Result<Vec<OperatorResponse>, HostError> {
        let resp: ListValidatorsResponse = query(
            self.host,
            self.address,
            &ValsetQueryMsg::ListValidators { start_after, limit },
        )
        .await?;
        Ok(resp.validators)
    }

    /// The current active set.
    ///
    /// # Errors
    ///
    /// Host or decoding errors.
    pub async fn list_active_validators(&self) -> Result<Vec<ValidatorInfo>, HostError> {
        let resp: ListActiveValidatorsResponse =
            query(self.host, self.address, &ValsetQueryMsg::ListActiveValidators {}).await?;
        Ok(resp.validators)
    }

    /// Contract configuration.
    ///
    /// # Errors
    ///
    /// Host or decoding errors.
    pub async fn configuration(&self) -> Result<ValsetConfigResponse, HostError> {
        query(self.host, self.address, &ValsetQueryMsg::Configuration {}).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_drops_empty_fields() {
        let desc = Description {
            moniker: "val".into(),
            website: "https://val.example".into(),
            ..Description::default()
        };
        let meta = ValidatorMetadata::from(&desc);
        assert_eq!(meta.identity, None);
        assert_eq!(meta.website.as_deref(), Some("https://val.example"));

        let json = serde_json::to_string(&meta).unwrap();
        assert!(!json.contains("identity"));
        assert_eq!(Description::from(meta), desc);
    }

    #[test]
    fn test_update_metadata_wire_format() {
        let msg = ValsetExecuteMsg::UpdateMetadata(ValidatorMetadata {
            moniker: "val".into(),
            ..ValidatorMetadata::default()
        });
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"update_metadata":{"moniker":"val"}}"#);
    }
}
