//! # Contract Interfaces
//!
//! Message types of the six Proof-of-Engagement contracts, typed adapters
//! that issue them through the `ContractHost` port, and the builders that
//! translate genesis configuration into instantiate messages.
//!
//! | Contract | Module | Role |
//! |----------|--------|------|
//! | tg4-engagement | `engagement` | `EngagementGroup`, `Distribution` |
//! | tgrade-trusted-circle | `trusted_circle` | `OversightCircle` |
//! | tgrade-oc-proposals | `oc_proposals` | `OversightProposals` |
//! | tg4-stake | `stake` | `Staking` |
//! | tg4-mixer | `mixer` | `Mixer` |
//! | tgrade-valset | `valset` | `Valset` |

pub mod bundle;
pub mod engagement;
pub mod init_msgs;
pub mod mixer;
pub mod oc_proposals;
pub mod stake;
pub mod tg4;
pub mod trusted_circle;
pub mod valset;

use crate::domain::value_objects::{Address, Coin};
use crate::errors::HostError;
use crate::ports::outbound::ContractHost;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use tg4::{Member, MemberListResponse, Tg4QueryMsg};

/// Encodes a contract message.
///
/// # Errors
///
/// `HostError::Encoding` if serialization fails.
pub fn to_binary<T: Serialize>(msg: &T) -> Result<Vec<u8>, HostError> {
    Ok(serde_json::to_vec(msg)?)
}

/// Decodes a contract response.
///
/// # Errors
///
/// `HostError::Encoding` on malformed bytes.
pub fn from_binary<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, HostError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Runs a typed query.
pub(crate) async fn query<H, Q, R>(host: &H, contract: Address, msg: &Q) -> Result<R, HostError>
where
    H: ContractHost + ?Sized,
    Q: Serialize + Sync,
    R: DeserializeOwned,
{
    let bytes = host.query(contract, &to_binary(msg)?).await?;
    from_binary(&bytes)
}

/// Executes a typed message.
pub(crate) async fn execute<H, M>(
    host: &H,
    contract: Address,
    sender: Address,
    msg: &M,
    funds: &[Coin],
) -> Result<Vec<u8>, HostError>
where
    H: ContractHost + ?Sized,
    M: Serialize + Sync,
{
    host.execute(contract, sender, &to_binary(msg)?, funds).await
}

// =============================================================================
// SHARED GROUP ADAPTER
// =============================================================================

/// Read access to any weighted group contract.
pub struct Tg4Group<'a, H: ?Sized> {
    address: Address,
    host: &'a H,
}

impl<'a, H: ContractHost + ?Sized> Tg4Group<'a, H> {
    /// Binds the adapter to a contract.
    pub fn new(address: Address, host: &'a H) -> Self {
        Self { address, host }
    }

    /// Group admin.
    ///
    /// # Errors
    ///
    /// Host or decoding errors.
    pub async fn admin(&self) -> Result<Option<Address>, HostError> {
        let resp: tg4::AdminResponse = query(self.host, self.address, &Tg4QueryMsg::Admin {}).await?;
        Ok(resp.admin)
    }

    /// Points of `addr`, None if not a member.
    ///
    /// # Errors
    ///
    /// Host or decoding errors.
    pub async fn member(&self, addr: Address) -> Result<Option<u64>, HostError> {
        let resp: tg4::MemberResponse =
            query(self.host, self.address, &Tg4QueryMsg::Member { addr }).await?;
        Ok(resp.points)
    }

    /// All members, following pagination to the end.
    ///
    /// # Errors
    ///
    /// Host or decoding errors.
    pub async fn list_all_members(&self) -> Result<Vec<Member>, HostError> {
        let mut all = Vec::new();
        let mut start_after = None;
        loop {
            let msg = Tg4QueryMsg::ListMembers {
                start_after,
                limit: Some(tg4::MAX_LIMIT),
            };
            let page: MemberListResponse = query(self.host, self.address, &msg).await?;
            let Some(last) = page.members.last() else {
                break;
            };
            start_after = Some(last.addr);
            let full = page.members.len() == tg4::MAX_LIMIT as usize;
            all.extend(page.members);
            if !full {
                break;
            }
        }
        Ok(all)
    }

    /// Sum of all points.
    ///
    /// # Errors
    ///
    /// Host or decoding errors.
    pub async fn total_points(&self) -> Result<u64, HostError> {
        let resp: tg4::TotalPointsResponse =
            query(self.host, self.address, &Tg4QueryMsg::TotalPoints {}).await?;
        Ok(resp.points)
    }
}
