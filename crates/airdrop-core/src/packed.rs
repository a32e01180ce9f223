//! # Packed Encoding
//!
//! Deterministic concatenation of typed values, byte-compatible with
//! Solidity `abi.encodePacked`:
//!
//! - `address` contributes its 20 raw bytes.
//! - `uint256` contributes 32 big-endian bytes, left-padded with zeros.
//!
//! No length prefixes or separators are written. Field order and field types
//! are fixed by the caller, so the same sequence of calls always yields the
//! same bytes.

use crate::address::Address;

/// Builder for a packed byte string.
#[derive(Debug, Clone, Default)]
pub struct PackedEncoder {
    buf: Vec<u8>,
}

impl PackedEncoder {
    /// Start an empty encoding.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Start an empty encoding with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Append an `address` (20 bytes).
    pub fn address(mut self, address: &Address) -> Self {
        self.buf.extend_from_slice(address.as_bytes());
        self
    }

    /// Append a `uint256` holding a 128-bit value.
    pub fn uint256(mut self, value: u128) -> Self {
        self.buf.extend_from_slice(&uint256_be(value));
        self
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Finish and return the bytes.
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Encode a value as a 32-byte big-endian `uint256`.
pub fn uint256_be(value: u128) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uint256_is_left_padded_big_endian() {
        let word = uint256_be(1000);
        assert_eq!(&word[..30], &[0u8; 30]);
        assert_eq!(word[30], 0x03);
        assert_eq!(word[31], 0xe8);
    }

    #[test]
    fn uint256_max_u128_fills_low_half() {
        let word = uint256_be(u128::MAX);
        assert_eq!(&word[..16], &[0u8; 16]);
        assert_eq!(&word[16..], &[0xff; 16]);
    }

    #[test]
    fn address_then_uints_is_84_bytes() {
        let addr = Address::from_bytes([0xaa; 20]);
        let bytes = PackedEncoder::with_capacity(84)
            .address(&addr)
            .uint256(1000)
            .uint256(1)
            .finish();
        assert_eq!(bytes.len(), 84);
        assert_eq!(&bytes[..20], &[0xaa; 20]);
        assert_eq!(&bytes[20..52], &uint256_be(1000));
        assert_eq!(&bytes[52..], &uint256_be(1));
    }

    #[test]
    fn field_order_matters() {
        let a = PackedEncoder::new().uint256(1).uint256(2).finish();
        let b = PackedEncoder::new().uint256(2).uint256(1).finish();
        assert_ne!(a, b);
    }

    #[test]
    fn len_tracks_writes() {
        let enc = PackedEncoder::new();
        assert!(enc.is_empty());
        let enc = enc.address(&Address::from_bytes([1; 20]));
        assert_eq!(enc.len(), 20);
        let enc = enc.uint256(7);
        assert_eq!(enc.len(), 52);
    }
}
