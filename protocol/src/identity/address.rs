//! # Ledger Addresses
//!
//! An address is 24 raw bytes derived from a public key:
//!
//! ```text
//! public_key (32 bytes)
//!     -> SHA3-256            -> 32 bytes
//!     -> RIPEMD-160          -> 20 bytes
//!     -> network_byte || ripemd                      (21 bytes)
//!     -> || SHA3-256(network_byte || ripemd)[0..3]   (24 bytes)
//! ```
//!
//! The text form is RFC 4648 base32 of the 24 bytes plus one zero byte,
//! with the trailing character dropped. That yields 39 characters whose
//! first letter identifies the network (`N` mainnet, `T` testnet).

use data_encoding::BASE32;
use ripemd::{Digest, Ripemd160};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::{Network, ADDRESS_ENCODED_LENGTH, ADDRESS_LENGTH};
use crate::crypto::hash::sha3_256;
use crate::crypto::keys::PublicKey;

/// Length of the version part (network byte + RIPEMD-160 digest).
const VERSION_LENGTH: usize = 21;

/// Checksum bytes appended to the version part.
const CHECKSUM_LENGTH: usize = ADDRESS_LENGTH - VERSION_LENGTH;

/// Errors from parsing an encoded address.
#[derive(Debug, Error)]
pub enum AddressError {
    /// Wrong number of characters after removing separators.
    #[error("invalid address length: expected {expected} characters, got {got}")]
    InvalidLength {
        /// Expected character count.
        expected: usize,
        /// Actual character count.
        got: usize,
    },

    /// Characters outside the base32 alphabet.
    #[error("invalid address encoding: {0}")]
    InvalidEncoding(String),

    /// The trailing three bytes do not match the recomputed checksum.
    #[error("address checksum mismatch")]
    ChecksumMismatch,
}

/// A 24-byte ledger address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// Wraps raw bytes without validation.
    pub fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Derives the address `public_key` owns on `network`.
    pub fn from_public_key(network: Network, public_key: &PublicKey) -> Self {
        let key_hash = sha3_256(public_key.as_bytes());
        let ripemd = Ripemd160::digest(key_hash);

        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[0] = network.identifier();
        bytes[1..VERSION_LENGTH].copy_from_slice(&ripemd);

        let checksum = sha3_256(&bytes[..VERSION_LENGTH]);
        bytes[VERSION_LENGTH..].copy_from_slice(&checksum[..CHECKSUM_LENGTH]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// The network named by the first byte, if it is one we know.
    pub fn network(&self) -> Option<Network> {
        Network::from_identifier(self.0[0])
    }

    /// Base32 text form (39 characters).
    pub fn encode(&self) -> String {
        let mut padded = [0u8; ADDRESS_LENGTH + 1];
        padded[..ADDRESS_LENGTH].copy_from_slice(&self.0);
        let mut encoded = BASE32.encode(&padded);
        encoded.truncate(ADDRESS_ENCODED_LENGTH);
        encoded
    }

    fn has_valid_checksum(bytes: &[u8; ADDRESS_LENGTH]) -> bool {
        let checksum = sha3_256(&bytes[..VERSION_LENGTH]);
        bytes[VERSION_LENGTH..] == checksum[..CHECKSUM_LENGTH]
    }
}

impl FromStr for Address {
    type Err = AddressError;

    /// Accepts the plain 39-character form and the dash-separated "pretty"
    /// form wallets display. Lower case is tolerated.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-')
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if cleaned.len() != ADDRESS_ENCODED_LENGTH {
            return Err(AddressError::InvalidLength {
                expected: ADDRESS_ENCODED_LENGTH,
                got: cleaned.len(),
            });
        }

        // Restore the dropped character; it only ever carries zero bits.
        let decoded = BASE32
            .decode(format!("{}A", cleaned).as_bytes())
            .map_err(|e| AddressError::InvalidEncoding(e.to_string()))?;

        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(&decoded[..ADDRESS_LENGTH]);

        if !Self::has_valid_checksum(&bytes) {
            return Err(AddressError::ChecksumMismatch);
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.encode())
    }
}
