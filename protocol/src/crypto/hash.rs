//! # Hashing Utilities
//!
//! The ledger hashes everything with SHA3-256 (the FIPS 202 variant, not
//! the original Keccak submission). Transaction hashes, address checksums,
//! mosaic ids, metadata keys and the aggregate transactions hash all come
//! from the helpers in this file.
//!
//! ## MerkleHashBuilder
//!
//! An aggregate commits to its inner transactions through a binary Merkle
//! tree of SHA3-256 leaves. The reduction duplicates the last node of an
//! odd level, a single leaf is its own root, and an empty tree hashes to
//! all zeros. Foreign tooling recomputes this value, so the shape is fixed.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Sha3_256};

use crate::config::HASH_LENGTH;

/// A 256-bit digest. Displayed as upper-case hex, which is how the REST
/// API and explorers print hashes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash256([u8; HASH_LENGTH]);

impl Hash256 {
    pub fn new(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    /// The all-zero hash. Used as the transactions hash of an empty aggregate.
    pub fn zero() -> Self {
        Self([0u8; HASH_LENGTH])
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }

    /// Parses 64 hex characters (either case).
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut out = [0u8; HASH_LENGTH];
        hex::decode_to_slice(s, &mut out)?;
        Ok(Self(out))
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({})", self.to_hex())
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// SHA3-256 of a single byte slice.
pub fn sha3_256(data: &[u8]) -> [u8; HASH_LENGTH] {
    sha3_256_multi(&[data])
}

/// SHA3-256 over several slices fed in order, without concatenating them.
pub fn sha3_256_multi(parts: &[&[u8]]) -> [u8; HASH_LENGTH] {
    let mut hasher = Sha3_256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; HASH_LENGTH];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// Incrementally collects leaf hashes and reduces them to a Merkle root.
#[derive(Debug, Default, Clone)]
pub struct MerkleHashBuilder {
    hashes: Vec<Hash256>,
}

impl MerkleHashBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a leaf. Order matters.
    pub fn update(&mut self, leaf: Hash256) {
        self.hashes.push(leaf);
    }

    /// Consumes the builder and returns the root.
    pub fn final_hash(self) -> Hash256 {
        let mut level = self.hashes;
        if level.is_empty() {
            return Hash256::zero();
        }

        while level.len() > 1 {
            level = level
                .chunks(2)
                .map(|pair| {
                    let left = pair[0].as_bytes();
                    // Odd level: pair the last node with itself.
                    let right = pair.get(1).unwrap_or(&pair[0]).as_bytes();
                    Hash256::new(sha3_256_multi(&[left.as_slice(), right.as_slice()]))
                })
                .collect();
        }

        level[0]
    }
}
