//! # Commitment Scheme
//!
//! SHA-256 commitments binding a bettor's hidden choice and secret nonce to
//! a specific market and deposit. The digest input layout is fixed so that
//! callers can compute a valid commitment off-band, before ever touching the
//! engine, and reveal it later.

use crate::{engine::AccountId, error::Result, market::Side};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// A 32-byte SHA-256 commitment digest.
///
/// Displayed and serialized as lowercase hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CommitHash([u8; 32]);

impl CommitHash {
    /// Wrap raw digest bytes
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw digest bytes
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse a 64-character hex string
    pub fn from_hex(s: &str) -> Result<Self> {
        let decoded = hex::decode(s)?;
        let bytes: [u8; 32] = decoded
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl Serialize for CommitHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for CommitHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(de::Error::custom)
    }
}

/// Compute the commitment for a bet.
///
/// The digest input is the concatenation of:
///
/// ```text
/// market_id      u64, big-endian                  8 bytes
/// bettor         u32 big-endian length prefix,    4 + n bytes
///                then the identity's UTF-8 bytes
/// choice         side tag (A = 1, B = 2)          1 byte
/// nonce          u64, big-endian                  8 bytes
/// amount         u64, big-endian                  8 bytes
/// ```
///
/// The length prefix keeps identities from aliasing each other's field
/// boundaries. Reveal verification recomputes this digest from the stored
/// record's market id, bettor, and amount plus the supplied choice and
/// nonce, and compares it against the stored hash.
pub fn commitment_hash(
    market_id: u64,
    bettor: &AccountId,
    choice: Side,
    nonce: u64,
    amount: u64,
) -> CommitHash {
    let identity = bettor.as_str().as_bytes();

    let mut hasher = Sha256::new();
    hasher.update(market_id.to_be_bytes());
    hasher.update((identity.len() as u32).to_be_bytes());
    hasher.update(identity);
    hasher.update([choice.tag()]);
    hasher.update(nonce.to_be_bytes());
    hasher.update(amount.to_be_bytes());
    CommitHash(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_hash() -> CommitHash {
        commitment_hash(7, &AccountId::new("alice"), Side::A, 12345, 1_000)
    }

    #[test]
    fn test_commitment_is_deterministic() {
        assert_eq!(base_hash(), base_hash());
    }

    #[test]
    fn test_commitment_binds_every_input() {
        let base = base_hash();
        let variants = [
            commitment_hash(8, &AccountId::new("alice"), Side::A, 12345, 1_000),
            commitment_hash(7, &AccountId::new("alicf"), Side::A, 12345, 1_000),
            commitment_hash(7, &AccountId::new("alice"), Side::B, 12345, 1_000),
            commitment_hash(7, &AccountId::new("alice"), Side::A, 12344, 1_000),
            commitment_hash(7, &AccountId::new("alice"), Side::A, 12345, 1_001),
        ];
        for variant in variants {
            assert_ne!(base, variant);
        }
    }

    #[test]
    fn test_identity_length_prefix_prevents_aliasing() {
        // Without the prefix, bettor "ab" with trailing input bytes could
        // collide with bettor "a" followed by a shifted tail.
        let one = commitment_hash(7, &AccountId::new("ab"), Side::A, 0, 0);
        let two = commitment_hash(7, &AccountId::new("a"), Side::A, 0, 0);
        assert_ne!(one, two);
    }

    #[test]
    fn test_hex_round_trip() {
        let hash = base_hash();
        let encoded = hash.to_string();
        assert_eq!(encoded.len(), 64);
        assert_eq!(CommitHash::from_hex(&encoded).unwrap(), hash);
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(CommitHash::from_hex("abcd").is_err());
        assert!(CommitHash::from_hex(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let hash = base_hash();
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{hash}\""));
        let back: CommitHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }
}
