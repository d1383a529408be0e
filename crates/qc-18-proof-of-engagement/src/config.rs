//! # Module Configuration
//!
//! Runtime parameters of the Proof-of-Engagement module. Genesis contract
//! parameters live in `domain::genesis`.

use crate::domain::value_objects::{PubKeyType, Uint128};
use crate::errors::{PoeError, PoeResult};
use serde::{Deserialize, Serialize};

/// Consensus parameters consulted by the validator lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusParams {
    /// Accepted validator key types. `None` accepts every type.
    pub validator_pubkey_types: Option<Vec<PubKeyType>>,
}

impl ConsensusParams {
    /// Returns true if a validator may use keys of this type.
    #[must_use]
    pub fn allows(&self, key_type: PubKeyType) -> bool {
        self.validator_pubkey_types
            .as_ref()
            .map_or(true, |allowed| allowed.contains(&key_type))
    }
}

/// Engagement points granted to newly created validators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialEngagementParams {
    /// Points granted. Zero disables the grant.
    pub points: u64,
    /// Smallest self-bond that earns the grant.
    pub min_self_bond: Uint128,
}

impl Default for InitialEngagementParams {
    fn default() -> Self {
        Self {
            points: 100,
            min_self_bond: Uint128::one(),
        }
    }
}

/// Proof-of-Engagement module configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoeConfig {
    /// Consensus parameters.
    pub consensus: ConsensusParams,
    /// Initial engagement grant.
    pub initial_engagement: InitialEngagementParams,
}

impl PoeConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for an empty key type allow-list or a zero minimum
    /// self-bond.
    pub fn validate(&self) -> PoeResult<()> {
        if matches!(&self.consensus.validator_pubkey_types, Some(types) if types.is_empty()) {
            return Err(PoeError::InvalidConfig(
                "validator_pubkey_types must not be empty".into(),
            ));
        }
        if self.initial_engagement.min_self_bond.is_zero() {
            return Err(PoeError::InvalidConfig(
                "initial engagement min_self_bond must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Key type names accepted by consensus, for error reports.
    #[must_use]
    pub fn allowed_pubkey_types(&self) -> Vec<String> {
        self.consensus
            .validator_pubkey_types
            .iter()
            .flatten()
            .map(|t| t.as_str().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PoeConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.consensus.allows(PubKeyType::Secp256k1));
        assert_eq!(config.initial_engagement.points, 100);
    }

    #[test]
    fn test_pubkey_restriction() {
        let config = PoeConfig {
            consensus: ConsensusParams {
                validator_pubkey_types: Some(vec![PubKeyType::Ed25519]),
            },
            ..PoeConfig::default()
        };
        assert!(config.consensus.allows(PubKeyType::Ed25519));
        assert!(!config.consensus.allows(PubKeyType::Secp256k1));
        assert_eq!(config.allowed_pubkey_types(), vec!["ed25519".to_string()]);
    }

    #[test]
    fn test_empty_allow_list_rejected() {
        let config = PoeConfig {
            consensus: ConsensusParams {
                validator_pubkey_types: Some(vec![]),
            },
            ..PoeConfig::default()
        };
        assert!(matches!(config.validate(), Err(PoeError::InvalidConfig(_))));
    }
}
