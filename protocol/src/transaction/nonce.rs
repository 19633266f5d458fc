//! Mosaic nonces and the mosaic ids derived from them.
//!
//! The network assigns a new mosaic the id
//! `SHA3-256(nonce_le || owner_address)[0..8]` read little-endian, with the
//! namespace bit cleared. The owner picks the nonce, so the id is known
//! before the definition is announced.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::NAMESPACE_FLAG;
use crate::crypto::hash::sha3_256_multi;
use crate::identity::Address;

use super::types::MosaicId;

/// The 32-bit value that makes a mosaic id unique per owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MosaicNonce(pub u32);

impl MosaicNonce {
    pub fn value(self) -> u32 {
        self.0
    }

    pub fn to_le_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }
}

impl From<u32> for MosaicNonce {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for MosaicNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Time-derived nonces.
///
/// Returns the current Unix time in whole seconds. Two calls within the same
/// second return the same value, and so would define the same mosaic id for
/// the same owner. Callers defining several mosaics at once should pass
/// explicit nonces instead.
pub struct NonceGenerator;

impl NonceGenerator {
    pub fn generate() -> u32 {
        Self::from_timestamp(chrono::Utc::now().timestamp())
    }

    /// Truncates a Unix timestamp to the 32-bit nonce space.
    pub fn from_timestamp(seconds: i64) -> u32 {
        seconds as u32
    }
}

/// The id the network will assign to a mosaic defined by `owner` with `nonce`.
pub fn generate_mosaic_id(owner: &Address, nonce: MosaicNonce) -> MosaicId {
    let digest = sha3_256_multi(&[nonce.to_le_bytes().as_slice(), owner.as_bytes().as_slice()]);
    let mut low = [0u8; 8];
    low.copy_from_slice(&digest[..8]);
    MosaicId(u64::from_le_bytes(low) & !NAMESPACE_FLAG)
}
