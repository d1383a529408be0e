//! # Contract Address Registry
//!
//! Role to address mapping, populated during bootstrap and read by every
//! later operation. Entries are write-once and an address is never shared
//! between roles.

use crate::domain::entities::ContractRole;
use crate::domain::value_objects::Address;
use crate::errors::{PoeError, PoeResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Write-once role to contract address mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddressRegistry {
    entries: BTreeMap<ContractRole, Address>,
}

impl ContractAddressRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `address` for `role`.
    ///
    /// # Errors
    ///
    /// - `RegistryEntryExists` if the role is already set
    /// - `DuplicateContractAddress` if another role holds the address
    pub fn set(&mut self, role: ContractRole, address: Address) -> PoeResult<()> {
        if let Some(existing) = self.entries.get(&role) {
            return Err(PoeError::RegistryEntryExists {
                role,
                existing: *existing,
            });
        }
        if let Some(existing_role) = self.role_of(&address) {
            return Err(PoeError::DuplicateContractAddress {
                address,
                existing_role,
            });
        }
        self.entries.insert(role, address);
        Ok(())
    }

    /// Looks up the address for `role`.
    ///
    /// # Errors
    ///
    /// `ContractNotFound` if the role has not been registered.
    pub fn get(&self, role: ContractRole) -> PoeResult<Address> {
        self.entries
            .get(&role)
            .copied()
            .ok_or(PoeError::ContractNotFound(role))
    }

    /// Reverse lookup.
    #[must_use]
    pub fn role_of(&self, address: &Address) -> Option<ContractRole> {
        self.entries
            .iter()
            .find_map(|(role, addr)| (addr == address).then_some(*role))
    }

    /// Roles without an entry.
    #[must_use]
    pub fn missing_roles(&self) -> Vec<ContractRole> {
        ContractRole::ALL
            .into_iter()
            .filter(|role| !self.entries.contains_key(role))
            .collect()
    }

    /// Fails on the first unregistered role.
    ///
    /// # Errors
    ///
    /// `ContractNotFound` naming the missing role.
    pub fn ensure_complete(&self) -> PoeResult<()> {
        match self.missing_roles().first() {
            Some(role) => Err(PoeError::ContractNotFound(*role)),
            None => Ok(()),
        }
    }

    /// Iterates entries in role order.
    pub fn iter(&self) -> impl Iterator<Item = (ContractRole, Address)> + '_ {
        self.entries.iter().map(|(role, addr)| (*role, *addr))
    }

    /// Number of registered roles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
