//! Read-only post-bootstrap verification.

use super::PoeService;
use crate::contracts::valset::ValsetContract;
use crate::contracts::Tg4Group;
use crate::domain::entities::ContractRole;
use crate::domain::genesis::GenesisConfiguration;
use crate::domain::invariants::{
    BootstrapCheckResult, BootstrapViolation, ADMIN_ROLES, PINNED_ROLES, PRIVILEGED_ROLES,
};
use crate::errors::{PoeError, PoeResult};
use crate::ports::outbound::{ContractHost, EventSink, PoeKeeper, PrivilegeGranter};
use tracing::{instrument, warn};

impl<H, K, E> PoeService<H, K, E>
where
    H: ContractHost + PrivilegeGranter,
    K: PoeKeeper,
    E: EventSink,
{
    /// Collects every violated post-bootstrap expectation. Host failures
    /// abort the check.
    #[instrument(skip_all)]
    pub(super) async fn check_bootstrap(
        &self,
        genesis: &GenesisConfiguration,
    ) -> PoeResult<BootstrapCheckResult> {
        let admin = genesis.system_admin()?;
        let registry = self.keeper.registry();
        let mut violations: Vec<BootstrapViolation> = registry
            .missing_roles()
            .into_iter()
            .map(BootstrapViolation::MissingRole)
            .collect();

        for role in PINNED_ROLES {
            let Ok(address) = registry.get(role) else {
                continue;
            };
            let info = self
                .host
                .contract_info(address)
                .await
                .map_err(PoeError::host("verify pinned codes"))?;
            let pinned = self
                .host
                .is_pinned(info.code_id)
                .await
                .map_err(PoeError::host("verify pinned codes"))?;
            if !pinned {
                violations.push(BootstrapViolation::NotPinned {
                    role,
                    code_id: info.code_id,
                });
            }
        }

        let privileged = self
            .host
            .privileged_contracts()
            .await
            .map_err(PoeError::host("verify privileges"))?;
        for role in PRIVILEGED_ROLES {
            if let Ok(address) = registry.get(role) {
                if !privileged.contains(&address) {
                    violations.push(BootstrapViolation::NotPrivileged(role));
                }
            }
        }

        for role in ADMIN_ROLES {
            let Ok(address) = registry.get(role) else {
                continue;
            };
            let actual = Tg4Group::new(address, &*self.host)
                .admin()
                .await
                .map_err(PoeError::host("verify contract admins"))?;
            if actual != Some(admin) {
                violations.push(BootstrapViolation::AdminMismatch { role, actual });
            }
        }

        if let (Ok(valset), Ok(registered)) = (
            registry.get(ContractRole::Valset),
            registry.get(ContractRole::Distribution),
        ) {
            let reported = ValsetContract::new(valset, &*self.host)
                .configuration()
                .await
                .map_err(PoeError::host("verify distribution contract"))?
                .distribution_contract;
            if reported != registered {
                violations.push(BootstrapViolation::DistributionMismatch {
                    registered,
                    reported,
                });
            }
        }

        for violation in &violations {
            warn!(%violation, "bootstrap expectation violated");
        }
        Ok(BootstrapCheckResult::from_violations(violations))
    }
}
