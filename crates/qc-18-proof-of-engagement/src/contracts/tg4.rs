//! Weighted group interface shared by the engagement, stake and mixer
//! contracts.

use crate::domain::value_objects::Address;
use serde::{Deserialize, Serialize};

/// A group member with its points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Member account.
    pub addr: Address,
    /// Points (weight).
    pub points: u64,
}

impl Member {
    /// Creates a member.
    #[must_use]
    pub fn new(addr: Address, points: u64) -> Self {
        Self { addr, points }
    }
}

/// Queries every group contract answers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tg4QueryMsg {
    /// Group admin.
    Admin {},
    /// Points of a single member.
    Member {
        /// Member account.
        addr: Address,
    },
    /// Members in address order.
    ListMembers {
        /// Exclusive lower bound.
        start_after: Option<Address>,
        /// Page size.
        limit: Option<u32>,
    },
    /// Sum of all points.
    TotalPoints {},
}

/// Response to `Admin`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminResponse {
    /// Admin, if any.
    pub admin: Option<Address>,
}

/// Response to `Member`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberResponse {
    /// Points, None if not a member.
    pub points: Option<u64>,
}

/// Response to `ListMembers`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberListResponse {
    /// Page of members.
    pub members: Vec<Member>,
}

/// Response to `TotalPoints`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalPointsResponse {
    /// Sum of points.
    pub points: u64,
}

/// Default page size for member listings.
pub const DEFAULT_LIMIT: u32 = 30;
/// Maximum page size.
pub const MAX_LIMIT: u32 = 100;

/// Applies `start_after` and `limit` to members sorted by address.
#[must_use]
pub fn paginate(
    members: impl IntoIterator<Item = Member>,
    start_after: Option<Address>,
    limit: Option<u32>,
) -> Vec<Member> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    members
        .into_iter()
        .filter(|m| start_after.map_or(true, |after| m.addr > after))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_wire_format() {
        let json = serde_json::to_string(&Tg4QueryMsg::TotalPoints {}).unwrap();
        assert_eq!(json, r#"{"total_points":{}}"#);
    }

    #[test]
    fn test_paginate() {
        let members: Vec<_> = (1..=5u8).map(|i| Member::new(Address::new([i; 20]), 1)).collect();
        let page = paginate(members.clone(), Some(Address::new([2u8; 20])), Some(2));
        assert_eq!(page, members[2..4].to_vec());
        assert_eq!(paginate(members, None, None).len(), 5);
    }
}
