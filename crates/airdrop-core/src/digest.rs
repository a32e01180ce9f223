//! # 256-bit Digests
//!
//! Defines [`Hash32`], the fixed-width value used for leaves, interior nodes
//! and roots, and [`DigestAlgorithm`], the hash primitive that produces it.
//!
//! Keccak-256 is the default because it matches the EVM `keccak256` builtin
//! and therefore on-chain EVM verifiers. SHA-256
//! is available for hosts that standardise on it. The algorithm is part of
//! the distribution's configuration: a tree built with one algorithm never
//! verifies under the other.
//!
//! ## Node Hashing
//!
//! Interior nodes are `H(left || right)` in positional order. Children are
//! never sorted, so the side of each sibling is fixed by the leaf index.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha256;
use sha3::{Digest, Keccak256};

use crate::address::strip_hex_prefix;
use crate::error::CoreError;

/// A 32-byte digest: a leaf, an interior node, or a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash32([u8; 32]);

impl Hash32 {
    /// The all-zero value. Used to pad odd tree levels; never a valid root.
    pub const ZERO: Hash32 = Hash32([0u8; 32]);

    /// Wrap raw bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Consume into raw bytes.
    pub fn into_bytes(self) -> [u8; 32] {
        self.0
    }

    /// Whether every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Lowercase `0x`-prefixed hex (66 chars).
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse 64 hex chars, with or without a `0x` / `0X` prefix.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let cleaned = strip_hex_prefix(s);
        if cleaned.len() != 64 {
            return Err(CoreError::InvalidHash {
                value: s.to_string(),
                reason: format!("expected 64 hex chars, got {}", cleaned.len()),
            });
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(cleaned, &mut bytes).map_err(|e| CoreError::InvalidHash {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Hash32 {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 32]> for Hash32 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Hash32 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash32 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// The hash primitive used for leaves and interior nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// Keccak-256 (EVM `keccak256`).
    #[default]
    Keccak256,
    /// SHA-256 (FIPS 180-4).
    Sha256,
}

impl DigestAlgorithm {
    /// Hash an arbitrary byte string.
    pub fn digest(&self, data: &[u8]) -> Hash32 {
        match self {
            Self::Keccak256 => Hash32(Keccak256::digest(data).into()),
            Self::Sha256 => Hash32(Sha256::digest(data).into()),
        }
    }

    /// Hash two children in positional order: `H(left || right)`.
    pub fn hash_pair(&self, left: &Hash32, right: &Hash32) -> Hash32 {
        match self {
            Self::Keccak256 => Hash32(
                Keccak256::new()
                    .chain_update(left.0)
                    .chain_update(right.0)
                    .finalize()
                    .into(),
            ),
            Self::Sha256 => Hash32(
                Sha256::new()
                    .chain_update(left.0)
                    .chain_update(right.0)
                    .finalize()
                    .into(),
            ),
        }
    }

    /// The canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keccak256 => "keccak256",
            Self::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keccak256" | "keccak" => Ok(Self::Keccak256),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            other => Err(CoreError::UnknownAlgorithm(other.to_string())),
        }
    }
}
