//! # Domain Entities
//!
//! Contract roles, validator descriptions and validator records.

use crate::domain::value_objects::{Address, Coin, PublicKey};
use crate::errors::{PoeError, PoeResult};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// CONTRACT ROLES
// =============================================================================

/// The role a contract plays in the Proof-of-Engagement suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractRole {
    /// Engagement points group (tg4-engagement).
    EngagementGroup,
    /// Staking group (tg4-stake).
    Staking,
    /// Mixer combining engagement and staking weights (tg4-mixer).
    Mixer,
    /// Validator set (tgrade-valset).
    Valset,
    /// Oversight community trusted circle.
    OversightCircle,
    /// Oversight community proposals.
    OversightProposals,
    /// Validator reward distribution, instantiated by the valset.
    Distribution,
}

impl ContractRole {
    /// All roles in bootstrap registration order.
    pub const ALL: [Self; 7] = [
        Self::EngagementGroup,
        Self::OversightCircle,
        Self::OversightProposals,
        Self::Staking,
        Self::Mixer,
        Self::Valset,
        Self::Distribution,
    ];

    /// Stable name used in logs and events.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EngagementGroup => "engagement",
            Self::Staking => "staking",
            Self::Mixer => "mixer",
            Self::Valset => "valset",
            Self::OversightCircle => "oversight_circle",
            Self::OversightProposals => "oversight_proposals",
            Self::Distribution => "distribution",
        }
    }
}

impl fmt::Display for ContractRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// VALIDATOR DESCRIPTION
// =============================================================================

/// Length bounds of the description fields.
pub mod description_limits {
    /// Max moniker length.
    pub const MONIKER: usize = 70;
    /// Max identity length.
    pub const IDENTITY: usize = 3000;
    /// Max website length.
    pub const WEBSITE: usize = 140;
    /// Max security contact length.
    pub const SECURITY_CONTACT: usize = 140;
    /// Max details length.
    pub const DETAILS: usize = 280;
}

/// Human readable validator metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    /// Display name.
    pub moniker: String,
    /// Optional identity signature (e.g. keybase).
    #[serde(default)]
    pub identity: String,
    /// Optional website.
    #[serde(default)]
    pub website: String,
    /// Optional security contact.
    #[serde(default)]
    pub security_contact: String,
    /// Optional free-form details.
    #[serde(default)]
    pub details: String,
}

impl Description {
    /// Creates a description with only a moniker.
    #[must_use]
    pub fn with_moniker(moniker: impl Into<String>) -> Self {
        Self {
            moniker: moniker.into(),
            ..Self::default()
        }
    }

    /// Checks every field against its length bound.
    ///
    /// # Errors
    ///
    /// `DescriptionTooLong` naming the first offending field.
    pub fn ensure_length(&self) -> PoeResult<()> {
        use description_limits as limits;
        let fields = [
            ("moniker", &self.moniker, limits::MONIKER),
            ("identity", &self.identity, limits::IDENTITY),
            ("website", &self.website, limits::WEBSITE),
            ("security contact", &self.security_contact, limits::SECURITY_CONTACT),
            ("details", &self.details, limits::DETAILS),
        ];
        for (field, value, max) in fields {
            if value.len() > max {
                return Err(PoeError::DescriptionTooLong {
                    field,
                    length: value.len(),
                    max,
                });
            }
        }
        Ok(())
    }

    /// Overlays `delta` on `self`. Empty delta fields leave the current
    /// value in place.
    #[must_use]
    pub fn merge(&self, delta: &Self) -> Self {
        fn pick(current: &str, update: &str) -> String {
            if update.is_empty() {
                current.to_string()
            } else {
                update.to_string()
            }
        }

        Self {
            moniker: pick(&self.moniker, &delta.moniker),
            identity: pick(&self.identity, &delta.identity),
            website: pick(&self.website, &delta.website),
            security_contact: pick(&self.security_contact, &delta.security_contact),
            details: pick(&self.details, &delta.details),
        }
    }

    /// Merges `delta` and validates the result.
    ///
    /// # Errors
    ///
    /// `DescriptionTooLong` if the merged description violates a bound.
    pub fn updated(&self, delta: &Self) -> PoeResult<Self> {
        let merged = self.merge(delta);
        merged.ensure_length()?;
        Ok(merged)
    }
}

// =============================================================================
// VALIDATOR RECORD
// =============================================================================

/// Lifecycle state of an operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidatorState {
    /// No validator registered.
    Unregistered,
    /// Registered with the validator set.
    Active,
}

/// A validator as seen by the module.
///
/// Assembled from the valset, staking and engagement contracts. The
/// contracts own the state; this is a read model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorRecord {
    /// Operator (delegator) address.
    pub operator: Address,
    /// Consensus public key.
    pub pubkey: PublicKey,
    /// Metadata.
    pub description: Description,
    /// Self-bonded stake.
    pub bonded: Coin,
    /// Engagement points, if any were granted.
    pub engagement_points: Option<u64>,
}

impl ValidatorRecord {
    /// Registered records are always active.
    #[must_use]
    pub fn state(&self) -> ValidatorState {
        ValidatorState::Active
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn full_description() -> Description {
        Description {
            moniker: "validator-1".into(),
            identity: "keybase:abc".into(),
            website: "https://example.org".into(),
            security_contact: "sec@example.org".into(),
            details: "first validator".into(),
        }
    }

    #[test]
    fn test_merge_empty_delta_is_identity() {
        let current = full_description();
        assert_eq!(current.merge(&Description::default()), current);
    }

    #[test]
    fn test_merge_moniker_only() {
        let current = full_description();
        let merged = current.merge(&Description::with_moniker("renamed"));
        assert_eq!(merged.moniker, "renamed");
        assert_eq!(merged.identity, current.identity);
        assert_eq!(merged.website, current.website);
        assert_eq!(merged.security_contact, current.security_contact);
        assert_eq!(merged.details, current.details);
    }

    #[test]
    fn test_ensure_length_bounds() {
        let mut desc = Description::with_moniker("m".repeat(70));
        assert!(desc.ensure_length().is_ok());

        desc.moniker.push('x');
        let err = desc.ensure_length().unwrap_err();
        assert!(matches!(
            err,
            PoeError::DescriptionTooLong {
                field: "moniker",
                length: 71,
                max: 70
            }
        ));

        let desc = Description {
            details: "d".repeat(281),
            ..full_description()
        };
        assert!(matches!(
            desc.ensure_length(),
            Err(PoeError::DescriptionTooLong {
                field: "details",
                ..
            })
        ));
    }

    #[test]
    fn test_updated_rejects_merged_overflow() {
        let current = full_description();
        let delta = Description {
            website: "w".repeat(141),
            ..Description::default()
        };
        assert!(current.updated(&delta).is_err());
        assert_eq!(
            current.updated(&Description::with_moniker("ok")).unwrap().moniker,
            "ok"
        );
    }

    #[test]
    fn test_roles_are_distinct() {
        let mut names: Vec<_> = ContractRole::ALL.iter().map(ContractRole::as_str).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ContractRole::ALL.len());
    }
}
