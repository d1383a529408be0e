//! # Event Schema
//!
//! Events emitted by the validator lifecycle handlers.
//!
//! Every handler emits a `message` event (`module`, `sender`) followed by
//! its own event:
//!
//! | Event | Attributes |
//! |-------|------------|
//! | `create_validator` | `validator`, `moniker`, `pubkey`, `amount` |
//! | `update_validator` | `validator`, `moniker` |

use crate::domain::value_objects::{Address, Uint128};
use serde::{Deserialize, Serialize};

/// Module name reported in `message` events.
pub const MODULE_NAME: &str = "poe";

/// Event types.
pub mod event_types {
    /// Generic message event.
    pub const MESSAGE: &str = "message";
    /// Validator registered.
    pub const CREATE_VALIDATOR: &str = "create_validator";
    /// Validator metadata changed.
    pub const UPDATE_VALIDATOR: &str = "update_validator";
}

/// Attribute keys.
pub mod attribute_keys {
    /// Emitting module.
    pub const MODULE: &str = "module";
    /// Transaction signer.
    pub const SENDER: &str = "sender";
    /// Validator operator.
    pub const VALIDATOR: &str = "validator";
    /// Validator moniker.
    pub const MONIKER: &str = "moniker";
    /// Hex consensus public key.
    pub const PUBKEY: &str = "pubkey";
    /// Bonded amount.
    pub const AMOUNT: &str = "amount";
}

// =============================================================================
// EVENTS
// =============================================================================

/// Events emitted by the module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PoeEvent {
    /// Generic message event.
    Message {
        /// Emitting module.
        module: String,
        /// Transaction signer.
        sender: Address,
    },
    /// A validator was registered and bonded.
    ValidatorCreated {
        /// Operator address.
        operator: Address,
        /// Moniker.
        moniker: String,
        /// Hex encoded consensus key.
        pubkey_hex: String,
        /// Bonded amount.
        amount: Uint128,
    },
    /// A validator description changed.
    ValidatorUpdated {
        /// Operator address.
        operator: Address,
        /// Moniker after the update.
        moniker: String,
    },
}

impl PoeEvent {
    /// `message` event for a transaction signed by `sender`.
    #[must_use]
    pub fn message(sender: Address) -> Self {
        Self::Message {
            module: MODULE_NAME.to_string(),
            sender,
        }
    }

    /// Event type string.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message { .. } => event_types::MESSAGE,
            Self::ValidatorCreated { .. } => event_types::CREATE_VALIDATOR,
            Self::ValidatorUpdated { .. } => event_types::UPDATE_VALIDATOR,
        }
    }

    /// Key/value attributes in emission order.
    #[must_use]
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        use attribute_keys as key;
        match self {
            Self::Message { module, sender } => vec![
                (key::MODULE, module.clone()),
                (key::SENDER, sender.to_string()),
            ],
            Self::ValidatorCreated {
                operator,
                moniker,
                pubkey_hex,
                amount,
            } => vec![
                (key::VALIDATOR, operator.to_string()),
                (key::MONIKER, moniker.clone()),
                (key::PUBKEY, pubkey_hex.clone()),
                (key::AMOUNT, amount.to_string()),
            ],
            Self::ValidatorUpdated { operator, moniker } => vec![
                (key::VALIDATOR, operator.to_string()),
                (key::MONIKER, moniker.clone()),
            ],
        }
    }

    /// Looks up a single attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<String> {
        self.attributes()
            .into_iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }
}

// =============================================================================
// SUBSYSTEM IDS
// =============================================================================

/// Subsystem IDs.
pub mod subsystem_ids {
    /// Proof-of-Engagement (this subsystem).
    pub const PROOF_OF_ENGAGEMENT: u8 = 18;
}
