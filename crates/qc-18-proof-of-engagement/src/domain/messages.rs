//! # Transaction Messages
//!
//! Module transactions handled by the validator lifecycle.

use crate::domain::entities::Description;
use crate::domain::value_objects::{Address, Coin, PublicKey};
use serde::{Deserialize, Serialize};

/// Registers a new validator and bonds its initial self-stake.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateValidator {
    /// Operator account, also the bonding account.
    pub delegator_address: Address,
    /// Consensus public key.
    pub pubkey: PublicKey,
    /// Validator metadata.
    pub description: Description,
    /// Initial self-bond.
    pub value: Coin,
}

/// Updates a validator's metadata.
///
/// Only the description is mutable through this message; empty fields keep
/// their current value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateValidator {
    /// Operator account.
    pub delegator_address: Address,
    /// Description delta.
    pub description: Description,
}
