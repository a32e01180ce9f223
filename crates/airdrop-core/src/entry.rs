//! # Whitelist Entries and Leaves
//!
//! A [`WhitelistEntry`] is one `(recipient, allocation)` pair. Its leaf is
//!
//! ```text
//! leaf = H(recipient(20) || uint256(allocation)(32) || uint256(context)(32))
//! ```
//!
//! ## Security Invariant
//!
//! The [`ContextId`] is bound into every leaf. Two entries with the same
//! recipient and allocation produce different leaves under different
//! contexts, so a proof issued for one chain fails on every other chain.
//!
//! The preimage of a leaf is always 84 bytes and the preimage of an interior
//! node is always 64 bytes, so an interior node can never be presented as a
//! leaf.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::digest::{DigestAlgorithm, Hash32};
use crate::packed::PackedEncoder;

/// Length of the packed leaf preimage in bytes.
pub const LEAF_PREIMAGE_LEN: usize = 20 + 32 + 32;

/// Identifies the execution context a claim is verified in (a chain ID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(pub u64);

impl ContextId {
    /// The raw identifier.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ContextId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// One recipient and the amount they may claim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WhitelistEntry {
    /// Who receives the funds.
    #[serde(alias = "userWallet")]
    pub recipient: Address,
    /// How much they receive, in the smallest currency unit.
    #[serde(with = "decimal_u128", alias = "claimAmount")]
    pub allocation: u128,
}

impl WhitelistEntry {
    /// Create an entry.
    pub fn new(recipient: Address, allocation: u128) -> Self {
        Self {
            recipient,
            allocation,
        }
    }

    /// The packed leaf preimage for `context`.
    pub fn packed(&self, context: ContextId) -> Vec<u8> {
        PackedEncoder::with_capacity(LEAF_PREIMAGE_LEN)
            .address(&self.recipient)
            .uint256(self.allocation)
            .uint256(u128::from(context.0))
            .finish()
    }

    /// The leaf committed to by the tree and recomputed at claim time.
    pub fn leaf(&self, context: ContextId, algorithm: DigestAlgorithm) -> Hash32 {
        algorithm.digest(&self.packed(context))
    }
}

/// Serde adapter for `u128` amounts.
///
/// Serializes as a decimal string so values above 2^53 survive JavaScript
/// tooling. Deserializes from either a string or an integer.
pub mod decimal_u128 {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    use crate::error::CoreError;

    /// Serialize as a decimal string.
    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    /// Deserialize from a decimal string or a non-negative integer.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }

    /// Parse a decimal amount string.
    pub fn parse(s: &str) -> Result<u128, CoreError> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidAllocation(s.to_string()));
        }
        trimmed
            .parse::<u128>()
            .map_err(|_| CoreError::InvalidAllocation(s.to_string()))
    }

    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = u128;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or decimal string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
            Ok(u128::from(v))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<u128, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
            u128::try_from(v).map_err(|_| E::custom(format!("negative allocation: {v}")))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
            parse(v).map_err(E::custom)
        }
    }
}
