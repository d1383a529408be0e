//! Genesis bootstrap of the contract suite.
//!
//! Ten strictly ordered steps, each fatal on error:
//!
//! | Step | Action |
//! |------|--------|
//! | 1 | resolve the system admin |
//! | 2 | predict the oversight proposals address |
//! | 3 | engagement group (pinned) |
//! | 4 | oversight circle with escrow (pinned) |
//! | 5 | oversight proposals with escrow (pinned), verify prediction |
//! | 6 | staking group, privileged |
//! | 7 | mixer (pinned) |
//! | 8 | valset |
//! | 9 | reward distribution reported by the valset |
//! | 10 | valset privileged |

use super::PoeService;
use crate::contracts::bundle::ContractCodeBundle;
use crate::contracts::init_msgs::{self, labels};
use crate::contracts::to_binary;
use crate::contracts::valset::ValsetContract;
use crate::domain::entities::ContractRole;
use crate::domain::genesis::GenesisConfiguration;
use crate::domain::registry::ContractAddressRegistry;
use crate::domain::value_objects::{AccessPermission, Address, CodeId, Coin};
use crate::errors::{PoeError, PoeResult};
use crate::ports::outbound::{ContractHost, EventSink, PoeKeeper, PrivilegeGranter};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Codes stored before the oversight proposals code, counted from the
/// start of the bootstrap.
const CODES_BEFORE_PROPOSALS: u64 = 2;

/// Instances created before the oversight proposals contract.
const INSTANCES_BEFORE_PROPOSALS: u64 = 2;

impl<H, K, E> PoeService<H, K, E>
where
    H: ContractHost + PrivilegeGranter,
    K: PoeKeeper,
    E: EventSink,
{
    #[instrument(skip_all, fields(version = %codes.version))]
    pub(super) async fn bootstrap_contracts(
        &self,
        genesis: &GenesisConfiguration,
        codes: &ContractCodeBundle,
    ) -> PoeResult<ContractAddressRegistry> {
        if !self.keeper.registry().is_empty() {
            return Err(PoeError::AlreadyBootstrapped);
        }
        genesis.validate()?;
        for (name, code) in codes.codes() {
            if code.is_empty() {
                return Err(PoeError::InvalidConfig(format!("empty contract code {name}")));
            }
            debug!(name, checksum = %ContractCodeBundle::checksum(code), "contract code");
        }

        // 1. system admin
        let admin = genesis.system_admin()?;
        self.keeper.set_system_admin(admin);
        info!(%admin, "bootstrapping contract suite");

        // 2. forward reference: engagement must know the proposals contract
        let sequences = self
            .host
            .sequences()
            .await
            .map_err(PoeError::host("read host sequences"))?;
        let predicted = self.host.predict_address(
            sequences.next_code_id + CODES_BEFORE_PROPOSALS,
            sequences.next_instance_id + INSTANCES_BEFORE_PROPOSALS,
        );
        debug!(%predicted, "predicted oversight proposals address");

        // 3. engagement
        let engagement_code = self
            .store_code(admin, &codes.engagement, "store engagement code")
            .await?;
        let msg = init_msgs::engagement_init_msg(genesis, admin, predicted);
        let engagement = self
            .instantiate(engagement_code, admin, &msg, &[], labels::ENGAGEMENT, "instantiate engagement")
            .await?;
        self.register(ContractRole::EngagementGroup, engagement, engagement_code)?;
        self.pin(engagement_code, "pin engagement code").await?;

        // 4. oversight circle
        let escrow = init_msgs::escrow_deposit(genesis);
        let circle_code = self
            .store_code(admin, &codes.trusted_circle, "store oversight committee code")
            .await?;
        let msg = init_msgs::trusted_circle_init_msg(genesis)?;
        let circle = self
            .instantiate(
                circle_code,
                admin,
                &msg,
                &escrow,
                labels::OVERSIGHT_COMMITTEE,
                "instantiate oversight committee",
            )
            .await?;
        self.register(ContractRole::OversightCircle, circle, circle_code)?;
        self.pin(circle_code, "pin oversight committee code").await?;

        // 5. oversight proposals
        let proposals_code = self
            .store_code(admin, &codes.oc_proposals, "store oversight proposals code")
            .await?;
        let msg = init_msgs::oc_proposals_init_msg(genesis, circle, engagement)?;
        let proposals = self
            .instantiate(
                proposals_code,
                admin,
                &msg,
                &escrow,
                labels::OVERSIGHT_PROPOSALS,
                "instantiate oversight proposals",
            )
            .await?;
        if proposals != predicted {
            return Err(PoeError::ContractIntegrity {
                role: ContractRole::OversightProposals,
                predicted,
                actual: proposals,
            });
        }
        self.register(ContractRole::OversightProposals, proposals, proposals_code)?;
        self.pin(proposals_code, "pin oversight proposals code").await?;

        // 6. staking
        let stake_code = self
            .store_code(admin, &codes.stake, "store stake code")
            .await?;
        let msg = init_msgs::stake_init_msg(genesis, admin);
        let stake = self
            .instantiate(stake_code, admin, &msg, &[], labels::STAKERS, "instantiate stake")
            .await?;
        self.register(ContractRole::Staking, stake, stake_code)?;
        self.grant_privilege(ContractRole::Staking, stake, "grant stake privileges")
            .await?;

        // 7. mixer
        let mixer_code = self
            .store_code(admin, &codes.mixer, "store mixer code")
            .await?;
        let msg = init_msgs::mixer_init_msg(engagement, stake);
        let mixer = self
            .instantiate(mixer_code, admin, &msg, &[], labels::MIXER, "instantiate mixer")
            .await?;
        self.register(ContractRole::Mixer, mixer, mixer_code)?;
        self.pin(mixer_code, "pin mixer code").await?;

        // 8. valset, rewards run on the engagement code
        let valset_code = self
            .store_code(admin, &codes.valset, "store valset code")
            .await?;
        let msg = init_msgs::valset_init_msg(genesis, mixer, engagement_code)?;
        let valset = self
            .instantiate(valset_code, admin, &msg, &[], labels::VALSET, "instantiate valset")
            .await?;
        self.register(ContractRole::Valset, valset, valset_code)?;

        // 9. distribution
        let config = ValsetContract::new(valset, &*self.host)
            .configuration()
            .await
            .map_err(PoeError::host("query valset config"))?;
        self.register(
            ContractRole::Distribution,
            config.distribution_contract,
            engagement_code,
        )?;

        // 10. valset privilege
        self.grant_privilege(ContractRole::Valset, valset, "grant valset privileges")
            .await?;

        let registry = self.keeper.registry();
        registry.ensure_complete()?;
        info!(contracts = registry.len(), "contract suite bootstrapped");
        Ok(registry)
    }

    async fn store_code(
        &self,
        creator: Address,
        code: &[u8],
        step: &'static str,
    ) -> PoeResult<CodeId> {
        self.host
            .create(creator, code, AccessPermission::Everybody)
            .await
            .map_err(PoeError::host(step))
    }

    async fn instantiate<M: Serialize + Sync>(
        &self,
        code_id: CodeId,
        admin: Address,
        msg: &M,
        funds: &[Coin],
        label: &str,
        step: &'static str,
    ) -> PoeResult<Address> {
        let msg = to_binary(msg).map_err(PoeError::host(step))?;
        let (address, _) = self
            .host
            .instantiate(code_id, admin, Some(admin), &msg, funds, label)
            .await
            .map_err(PoeError::host(step))?;
        Ok(address)
    }

    fn register(&self, role: ContractRole, address: Address, code_id: CodeId) -> PoeResult<()> {
        self.keeper.set_contract_address(role, address)?;
        info!(role = %role, %address, code_id, "contract registered");
        Ok(())
    }

    async fn pin(&self, code_id: CodeId, step: &'static str) -> PoeResult<()> {
        self.host
            .pin_code(code_id)
            .await
            .map_err(PoeError::host(step))
    }

    async fn grant_privilege(
        &self,
        role: ContractRole,
        address: Address,
        step: &'static str,
    ) -> PoeResult<()> {
        self.host
            .set_privileged(address)
            .await
            .map_err(PoeError::host(step))?;
        debug!(role = %role, %address, "privileges granted");
        Ok(())
    }
}
