//! Scoped metadata keys.
//!
//! Metadata entries are keyed by a 64-bit integer. Wallets and the CLI let
//! users type a string instead and map it with SHA3-256, taking the first
//! eight digest bytes little-endian. Other tools compute the same mapping,
//! so it must not change.

use crate::crypto::hash::sha3_256;

pub struct KeyGenerator;

impl KeyGenerator {
    /// Maps a human-readable key onto the 64-bit key space.
    pub fn generate_uint64_key(input: &str) -> u64 {
        let digest = sha3_256(input.as_bytes());
        let mut low = [0u8; 8];
        low.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_reference_vector() {
        assert_eq!(KeyGenerator::generate_uint64_key("header"), 0xAD6D8491D21180E5);
        assert_eq!(
            KeyGenerator::generate_uint64_key("header"),
            12_496_790_302_852_481_253
        );
    }

    #[test]
    fn metadata_key_vector() {
        assert_eq!(
            KeyGenerator::generate_uint64_key("metadata key"),
            0xAEF250A4AF2CCAC2
        );
    }

    #[test]
    fn deterministic_and_input_sensitive() {
        let a = KeyGenerator::generate_uint64_key("rating");
        assert_eq!(a, KeyGenerator::generate_uint64_key("rating"));
        assert_ne!(a, KeyGenerator::generate_uint64_key("Rating"));
    }
}
