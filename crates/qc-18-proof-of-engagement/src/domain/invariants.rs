//! # Domain Invariants
//!
//! Post-bootstrap expectations checked by `verify_bootstrap`:
//!
//! - every contract role is registered
//! - the engagement, circle, proposals and mixer codes are pinned
//! - staking and valset hold privileged status
//! - engagement and staking admins equal the system admin
//! - the valset's distribution contract is the registered one

use crate::domain::entities::ContractRole;
use crate::domain::value_objects::{Address, CodeId};
use std::fmt;

/// Roles whose code must be pinned after bootstrap.
pub const PINNED_ROLES: [ContractRole; 4] = [
    ContractRole::EngagementGroup,
    ContractRole::OversightCircle,
    ContractRole::OversightProposals,
    ContractRole::Mixer,
];

/// Roles that must hold privileged status after bootstrap.
pub const PRIVILEGED_ROLES: [ContractRole; 2] = [ContractRole::Staking, ContractRole::Valset];

/// Roles whose contract admin must be the system admin.
pub const ADMIN_ROLES: [ContractRole; 2] = [ContractRole::EngagementGroup, ContractRole::Staking];

/// A single failed post-bootstrap expectation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BootstrapViolation {
    /// Role has no registry entry.
    MissingRole(ContractRole),
    /// Code is not pinned.
    NotPinned {
        /// Role of the contract.
        role: ContractRole,
        /// Its code id.
        code_id: CodeId,
    },
    /// Contract lacks privileged status.
    NotPrivileged(ContractRole),
    /// Contract admin differs from the system admin.
    AdminMismatch {
        /// Role of the contract.
        role: ContractRole,
        /// Admin reported by the contract.
        actual: Option<Address>,
    },
    /// Valset reports a different distribution contract.
    DistributionMismatch {
        /// Registered address.
        registered: Address,
        /// Address reported by the valset.
        reported: Address,
    },
}

impl fmt::Display for BootstrapViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRole(role) => write!(f, "{role}: not registered"),
            Self::NotPinned { role, code_id } => write!(f, "{role}: code {code_id} not pinned"),
            Self::NotPrivileged(role) => write!(f, "{role}: not privileged"),
            Self::AdminMismatch { role, actual } => match actual {
                Some(admin) => write!(f, "{role}: admin is {admin}"),
                None => write!(f, "{role}: no admin"),
            },
            Self::DistributionMismatch {
                registered,
                reported,
            } => write!(
                f,
                "distribution: registered {registered}, valset reports {reported}"
            ),
        }
    }
}

/// Outcome of a verification pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BootstrapCheckResult {
    /// All expectations hold.
    Valid,
    /// One or more expectations failed.
    Invalid(Vec<BootstrapViolation>),
}

impl BootstrapCheckResult {
    /// Builds a result from collected violations.
    #[must_use]
    pub fn from_violations(violations: Vec<BootstrapViolation>) -> Self {
        if violations.is_empty() {
            Self::Valid
        } else {
            Self::Invalid(violations)
        }
    }

    /// Returns true if every expectation held.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Failed expectations.
    #[must_use]
    pub fn violations(&self) -> &[BootstrapViolation] {
        match self {
            Self::Valid => &[],
            Self::Invalid(v) => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_violations() {
        assert!(BootstrapCheckResult::from_violations(vec![]).is_valid());

        let result = BootstrapCheckResult::from_violations(vec![BootstrapViolation::NotPrivileged(
            ContractRole::Valset,
        )]);
        assert!(!result.is_valid());
        assert_eq!(result.violations().len(), 1);
        assert_eq!(result.violations()[0].to_string(), "valset: not privileged");
    }
}
