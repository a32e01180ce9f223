//! # Claim Payload Export
//!
//! The serializable form of a built tree that is handed to recipients
//! off-chain. Each [`ClaimPayload`] carries everything a claim needs:
//! the raw entry, the index and the sibling path.

use serde::{Deserialize, Serialize};

use airdrop_core::entry::decimal_u128;
use airdrop_core::{Address, ContextId, DigestAlgorithm, Hash32, WhitelistEntry};

use crate::proof::{verify_proof, Proof};

/// One recipient's claim payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimPayload {
    /// Leaf index.
    pub index: u64,
    /// Recipient address.
    pub recipient: Address,
    /// Allocation as a decimal string.
    #[serde(with = "decimal_u128")]
    pub allocation: u128,
    /// Leaf hash, for cross-checking.
    pub leaf: Hash32,
    /// Sibling path, leaf level first.
    pub proof: Vec<Hash32>,
}

impl ClaimPayload {
    /// The whitelist entry this payload claims.
    pub fn entry(&self) -> WhitelistEntry {
        WhitelistEntry::new(self.recipient, self.allocation)
    }

    /// The payload's proof.
    pub fn to_proof(&self) -> Proof {
        Proof::new(self.index, self.proof.clone())
    }
}

/// A built tree in distributable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeExport {
    /// Root commitment to publish.
    pub root: Hash32,
    /// Context the leaves are bound to.
    pub context_id: ContextId,
    /// Leaf and node hash.
    pub algorithm: DigestAlgorithm,
    /// Number of leaves.
    pub leaf_count: usize,
    /// Proof length.
    pub depth: usize,
    /// Sum of all allocations; the balance the engine must be funded with.
    #[serde(with = "decimal_u128")]
    pub total_allocation: u128,
    /// One payload per index, in index order.
    pub claims: Vec<ClaimPayload>,
}

impl TreeExport {
    /// The payload at `index`.
    pub fn claim_at(&self, index: u64) -> Option<&ClaimPayload> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.claims.get(i))
            .filter(|payload| payload.index == index)
    }

    /// All payloads for `recipient` (a recipient may appear more than once).
    pub fn claims_for(&self, recipient: &Address) -> Vec<&ClaimPayload> {
        self.claims
            .iter()
            .filter(|payload| &payload.recipient == recipient)
            .collect()
    }

    /// Indices whose payload does not verify against [`TreeExport::root`].
    ///
    /// Recomputes each leaf from the entry and context rather than trusting
    /// the stored `leaf` field.
    pub fn invalid_claims(&self) -> Vec<u64> {
        self.claims
            .iter()
            .filter(|payload| {
                let leaf = payload.entry().leaf(self.context_id, self.algorithm);
                leaf != payload.leaf
                    || !verify_proof(self.algorithm, &self.root, &leaf, &payload.to_proof())
            })
            .map(|payload| payload.index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MerkleTree;

    fn tree() -> MerkleTree {
        let entries = vec![
            WhitelistEntry::new(Address::from_bytes([0xaa; 20]), 1000),
            WhitelistEntry::new(Address::from_bytes([0xbb; 20]), 2000),
            WhitelistEntry::new(Address::from_bytes([0xcc; 20]), 3000),
            WhitelistEntry::new(Address::from_bytes([0xaa; 20]), 50),
        ];
        MerkleTree::build(entries, ContextId(1), DigestAlgorithm::Keccak256).unwrap()
    }

    #[test]
    fn export_matches_tree() {
        let tree = tree();
        let export = tree.export().unwrap();
        assert_eq!(export.root, tree.root());
        assert_eq!(export.leaf_count, 4);
        assert_eq!(export.depth, 2);
        assert_eq!(export.total_allocation, 6050);
        for (i, payload) in export.claims.iter().enumerate() {
            assert_eq!(payload.index, i as u64);
            assert_eq!(&payload.entry(), tree.item(i).unwrap());
            assert_eq!(payload.to_proof(), tree.proof(i).unwrap());
        }
        assert!(export.invalid_claims().is_empty());
    }

    #[test]
    fn lookups() {
        let export = tree().export().unwrap();
        assert_eq!(export.claim_at(2).unwrap().allocation, 3000);
        assert!(export.claim_at(4).is_none());
        let aa = export.claims_for(&Address::from_bytes([0xaa; 20]));
        assert_eq!(aa.len(), 2);
        assert_eq!(aa[1].index, 3);
    }

    #[test]
    fn tampered_payload_is_reported() {
        let mut export = tree().export().unwrap();
        export.claims[1].allocation = 2001;
        assert_eq!(export.invalid_claims(), vec![1]);
    }

    #[test]
    fn json_shape() {
        let export = tree().export().unwrap();
        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["context_id"], 1);
        assert_eq!(json["algorithm"], "keccak256");
        assert_eq!(json["total_allocation"], "6050");
        assert_eq!(json["claims"][0]["allocation"], "1000");
        assert_eq!(
            json["claims"][0]["recipient"],
            "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
        );
        let back: TreeExport = serde_json::from_value(json).unwrap();
        assert_eq!(back, export);
    }
}
