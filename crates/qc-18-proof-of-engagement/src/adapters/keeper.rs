//! # In-Memory Keeper
//!
//! Module state held outside the contracts: the contract address registry,
//! the system admin and the engagement points granted at validator creation.

use crate::domain::entities::ContractRole;
use crate::domain::registry::ContractAddressRegistry;
use crate::domain::value_objects::Address;
use crate::errors::{PoeError, PoeResult};
use crate::ports::outbound::PoeKeeper;
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory `PoeKeeper`.
#[derive(Debug, Default)]
pub struct InMemoryKeeper {
    registry: RwLock<ContractAddressRegistry>,
    system_admin: RwLock<Option<Address>>,
    initial_points: RwLock<HashMap<Address, u64>>,
}

impl InMemoryKeeper {
    /// Empty keeper.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PoeKeeper for InMemoryKeeper {
    fn set_contract_address(&self, role: ContractRole, address: Address) -> PoeResult<()> {
        self.registry.write().set(role, address)
    }

    fn contract_address(&self, role: ContractRole) -> PoeResult<Address> {
        self.registry.read().get(role)
    }

    fn registry(&self) -> ContractAddressRegistry {
        self.registry.read().clone()
    }

    fn set_system_admin(&self, admin: Address) {
        *self.system_admin.write() = Some(admin);
    }

    fn system_admin(&self) -> PoeResult<Address> {
        self.system_admin
            .read()
            .ok_or(PoeError::NotBootstrapped("system admin"))
    }

    fn set_initial_engagement_points(&self, operator: Address, points: u64) {
        self.initial_points.write().insert(operator, points);
    }

    fn initial_engagement_points(&self, operator: &Address) -> Option<u64> {
        self.initial_points.read().get(operator).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_write_once() {
        let keeper = InMemoryKeeper::new();
        let addr = Address::new([1u8; 20]);
        keeper
            .set_contract_address(ContractRole::Staking, addr)
            .unwrap();
        assert_eq!(keeper.contract_address(ContractRole::Staking).unwrap(), addr);
        assert!(keeper
            .set_contract_address(ContractRole::Staking, Address::new([2u8; 20]))
            .is_err());
        assert_eq!(keeper.registry().len(), 1);
    }

    #[test]
    fn test_system_admin_before_bootstrap() {
        let keeper = InMemoryKeeper::new();
        assert!(matches!(
            keeper.system_admin(),
            Err(PoeError::NotBootstrapped(_))
        ));
        keeper.set_system_admin(Address::new([7u8; 20]));
        assert_eq!(keeper.system_admin().unwrap(), Address::new([7u8; 20]));
    }
}
