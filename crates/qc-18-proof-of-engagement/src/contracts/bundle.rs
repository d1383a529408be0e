//! Contract code shipped with the module.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

/// The six contract codes stored at bootstrap and their release version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCodeBundle {
    /// tg4-engagement (also used for reward distribution).
    #[serde(with = "crate::domain::value_objects::hex_bytes")]
    pub engagement: Vec<u8>,
    /// tgrade-trusted-circle.
    #[serde(with = "crate::domain::value_objects::hex_bytes")]
    pub trusted_circle: Vec<u8>,
    /// tgrade-oc-proposals.
    #[serde(with = "crate::domain::value_objects::hex_bytes")]
    pub oc_proposals: Vec<u8>,
    /// tg4-stake.
    #[serde(with = "crate::domain::value_objects::hex_bytes")]
    pub stake: Vec<u8>,
    /// tg4-mixer.
    #[serde(with = "crate::domain::value_objects::hex_bytes")]
    pub mixer: Vec<u8>,
    /// tgrade-valset.
    #[serde(with = "crate::domain::value_objects::hex_bytes")]
    pub valset: Vec<u8>,
    /// Contract release version.
    pub version: String,
}

impl ContractCodeBundle {
    /// Code blobs with their names, in bootstrap store order.
    #[must_use]
    pub fn codes(&self) -> [(&'static str, &[u8]); 6] {
        [
            ("tg4_engagement", self.engagement.as_slice()),
            ("tgrade_trusted_circle", self.trusted_circle.as_slice()),
            ("tgrade_oc_proposals", self.oc_proposals.as_slice()),
            ("tg4_stake", self.stake.as_slice()),
            ("tg4_mixer", self.mixer.as_slice()),
            ("tgrade_valset", self.valset.as_slice()),
        ]
    }

    /// Hex keccak256 checksum of a code blob.
    #[must_use]
    pub fn checksum(code: &[u8]) -> String {
        hex::encode(Keccak256::digest(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::host::contracts::native_code_bundle;

    #[test]
    fn test_codes_in_store_order() {
        let bundle = native_code_bundle();
        let names: Vec<_> = bundle.codes().iter().map(|(name, _)| *name).collect();
        assert_eq!(names[0], "tg4_engagement");
        assert_eq!(names[2], "tgrade_oc_proposals");
        assert_eq!(names[5], "tgrade_valset");
    }

    #[test]
    fn test_checksums_distinct() {
        let bundle = native_code_bundle();
        let mut checksums: Vec<_> = bundle
            .codes()
            .iter()
            .map(|(_, code)| ContractCodeBundle::checksum(code))
            .collect();
        checksums.sort();
        checksums.dedup();
        assert_eq!(checksums.len(), 6);
        assert_eq!(checksums[0].len(), 64);
    }

    #[test]
    fn test_json_carries_hex_blobs() {
        let bundle = native_code_bundle();
        let json = serde_json::to_value(&bundle).unwrap();
        assert_eq!(json["engagement"], serde_json::json!(hex::encode(&bundle.engagement)));
        let decoded: ContractCodeBundle = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, bundle);
    }
}
