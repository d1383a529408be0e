//! Full genesis processing.

use super::PoeService;
use crate::contracts::bundle::ContractCodeBundle;
use crate::contracts::trusted_circle::TrustedCircleContract;
use crate::domain::entities::ContractRole;
use crate::domain::genesis::GenesisConfiguration;
use crate::domain::registry::ContractAddressRegistry;
use crate::errors::{PoeError, PoeResult};
use crate::ports::outbound::{ContractHost, EventSink, PoeKeeper, PrivilegeGranter};
use tracing::{info, instrument};

impl<H, K, E> PoeService<H, K, E>
where
    H: ContractHost + PrivilegeGranter,
    K: PoeKeeper,
    E: EventSink,
{
    /// Bootstrap, oversight community seeding, then the genesis validator
    /// transactions. Every error is fatal.
    #[instrument(skip_all, fields(gen_txs = genesis.gen_txs.len()))]
    pub(super) async fn process_genesis(
        &self,
        genesis: &GenesisConfiguration,
        codes: &ContractCodeBundle,
    ) -> PoeResult<ContractAddressRegistry> {
        let registry = self.bootstrap_contracts(genesis, codes).await?;
        let admin = self.keeper.system_admin()?;

        let members = &genesis.oversight_community_members;
        if !members.is_empty() {
            let circle = TrustedCircleContract::new(
                registry.get(ContractRole::OversightCircle)?,
                &*self.host,
            );
            circle
                .add_voting_members(admin, members.clone())
                .await
                .map_err(PoeError::host("add oversight community members"))?;

            let escrow = &genesis.oversight_committee_contract_config.escrow_amount;
            if !escrow.amount.is_zero() {
                for member in members {
                    circle
                        .deposit_escrow(*member, escrow.clone())
                        .await
                        .map_err(PoeError::host("deposit oversight community escrow"))?;
                }
            }
            info!(members = members.len(), "oversight community seeded");
        }

        for tx in &genesis.gen_txs {
            self.handle_create_validator(tx.clone()).await?;
        }
        info!(validators = genesis.gen_txs.len(), "genesis validators created");
        Ok(registry)
    }
}
