//! # Error Types
//!
//! Errors raised by the Proof-of-Engagement subsystem.
//!
//! Bootstrap-phase errors are fatal: genesis processing must abort. During
//! normal block processing the same errors reject the offending transaction
//! and the enclosing framework discards its state changes.

use crate::domain::entities::ContractRole;
use crate::domain::value_objects::{Address, CodeId, Coin, Uint128};
use thiserror::Error;

// =============================================================================
// MODULE ERRORS
// =============================================================================

/// Errors returned by the bootstrap orchestrator and validator lifecycle.
#[derive(Debug, Error)]
pub enum PoeError {
    /// Malformed genesis input.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Predicted contract address does not match the instantiated one.
    #[error(
        "contract integrity: predicted {role} address {predicted} but host assigned {actual}"
    )]
    ContractIntegrity {
        role: ContractRole,
        predicted: Address,
        actual: Address,
    },

    /// A contract host call failed.
    #[error("{step}: {source}")]
    ContractHost {
        step: &'static str,
        #[source]
        source: HostError,
    },

    /// A description field exceeds its length bound.
    #[error("invalid {field} length; got: {length}, max: {max}")]
    DescriptionTooLong {
        field: &'static str,
        length: usize,
        max: usize,
    },

    /// No validator is registered for this operator.
    #[error("unknown operator: {0}")]
    UnknownOperator(Address),

    /// Registry has no entry for the role.
    #[error("contract not found for role {0}")]
    ContractNotFound(ContractRole),

    /// Registry entries are write-once.
    #[error("contract address for role {role} already set to {existing}")]
    RegistryEntryExists { role: ContractRole, existing: Address },

    /// One address registered under two roles.
    #[error("address {address} already registered for role {existing_role}")]
    DuplicateContractAddress {
        address: Address,
        existing_role: ContractRole,
    },

    /// Bootstrap was already executed against this keeper.
    #[error("contracts already bootstrapped")]
    AlreadyBootstrapped,

    /// Module state read before bootstrap wrote it.
    #[error("module not bootstrapped: {0}")]
    NotBootstrapped(&'static str),

    /// Consensus parameters reject the key type.
    #[error("validator pubkey type is not supported; got: {got}, expected: {allowed:?}")]
    PubKeyTypeNotSupported { got: String, allowed: Vec<String> },

    /// Payload encoding/decoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl PoeError {
    /// Wraps a host failure with the name of the step that issued the call.
    pub(crate) fn host(step: &'static str) -> impl FnOnce(HostError) -> Self {
        move |source| Self::ContractHost { step, source }
    }

    /// Returns true for errors that signal a broken module invariant rather
    /// than a bad transaction.
    #[must_use]
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::ContractIntegrity { .. }
                | Self::ContractNotFound(_)
                | Self::RegistryEntryExists { .. }
                | Self::DuplicateContractAddress { .. }
                | Self::NotBootstrapped(_)
        )
    }

    /// Returns true if the error must abort genesis even outside bootstrap.
    ///
    /// Transaction-level errors (bad description, unknown operator, contract
    /// rejections) only reject the offending transaction.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.is_invariant_violation()
            || matches!(self, Self::InvalidConfig(_) | Self::AlreadyBootstrapped)
    }

    /// Returns true if this error was raised by contract code rather than
    /// by the orchestration layer.
    #[must_use]
    pub fn is_contract_rejection(&self) -> bool {
        matches!(
            self,
            Self::ContractHost {
                source: HostError::Contract(_),
                ..
            }
        )
    }
}

impl From<serde_json::Error> for PoeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for module operations.
pub type PoeResult<T> = Result<T, PoeError>;

// =============================================================================
// HOST ERRORS
// =============================================================================

/// Errors surfaced by the contract host port.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    /// Code bytes are not a known contract.
    #[error("unknown contract code with checksum {0}")]
    UnknownCode(String),

    /// No code stored under this id.
    #[error("code id {0} not found")]
    CodeNotFound(CodeId),

    /// No contract instance at this address.
    #[error("no contract at {0}")]
    ContractNotFound(Address),

    /// Instantiate permission denied.
    #[error("{creator} is not permitted to instantiate code id {code_id}")]
    InstantiateNotPermitted { code_id: CodeId, creator: Address },

    /// Not enough funds to attach to the call.
    #[error("insufficient funds: {address} holds {available}, needs {required}")]
    InsufficientFunds {
        address: Address,
        required: Coin,
        available: Uint128,
    },

    /// The contract itself rejected the call.
    #[error("contract error: {0}")]
    Contract(String),

    /// The host refused to grant the privileged status.
    #[error("privilege grant rejected for {0}")]
    PrivilegeRejected(Address),

    /// Contract already holds privileged status.
    #[error("contract {0} is already privileged")]
    AlreadyPrivileged(Address),

    /// A message or response could not be encoded or decoded.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Nested contract calls went too deep.
    #[error("sub-message depth exceeded: {depth} > {max}")]
    DepthExceeded { depth: usize, max: usize },
}

// =============================================================================
// CONTRACT ERRORS
// =============================================================================

/// Errors raised inside the native contract implementations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// Caller lacks the required role.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Malformed instantiate or execute message.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Attached funds do not satisfy the call.
    #[error("invalid funds: {0}")]
    InvalidFunds(String),

    /// Referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Entity already exists.
    #[error("{0} already exists")]
    AlreadyExists(String),

    /// Call would violate a contract-level rule.
    #[error("{0}")]
    Rule(String),
}

impl From<serde_json::Error> for ContractError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidMessage(err.to_string())
    }
}

impl From<serde_json::Error> for HostError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}

impl From<ContractError> for HostError {
    fn from(err: ContractError) -> Self {
        Self::Contract(err.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_error_wraps_step_name() {
        let err = PoeError::host("instantiate valset")(HostError::Contract(
            "invalid membership".to_string(),
        ));
        assert_eq!(
            err.to_string(),
            "instantiate valset: contract error: invalid membership"
        );
        assert!(err.is_contract_rejection());
        assert!(!err.is_invariant_violation());
    }

    #[test]
    fn test_description_error_display() {
        let err = PoeError::DescriptionTooLong {
            field: "moniker",
            length: 71,
            max: 70,
        };
        assert_eq!(err.to_string(), "invalid moniker length; got: 71, max: 70");
    }

    #[test]
    fn test_invariant_classification() {
        assert!(PoeError::ContractNotFound(ContractRole::Valset).is_invariant_violation());
        assert!(PoeError::ContractIntegrity {
            role: ContractRole::OversightProposals,
            predicted: Address::new([1u8; 20]),
            actual: Address::new([2u8; 20]),
        }
        .is_invariant_violation());
        assert!(!PoeError::UnknownOperator(Address::ZERO).is_invariant_violation());
    }

    #[test]
    fn test_fatal_classification() {
        assert!(PoeError::InvalidConfig("bad admin".into()).is_fatal());
        assert!(PoeError::AlreadyBootstrapped.is_fatal());
        assert!(!PoeError::DescriptionTooLong {
            field: "details",
            length: 281,
            max: 280,
        }
        .is_fatal());
    }

    #[test]
    fn test_serde_error_conversion() {
        let err: PoeError = serde_json::from_str::<u64>("nope").unwrap_err().into();
        assert!(matches!(err, PoeError::Serialization(_)));
    }
}
