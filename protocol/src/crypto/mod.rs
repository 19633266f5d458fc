//! # Cryptographic Primitives
//!
//! Everything security-related the transaction core touches:
//!
//! - **Ed25519** for transaction signatures.
//! - **SHA3-256** for transaction hashes, the aggregate Merkle commitment,
//!   address checksums and derived 64-bit keys.
//! - **AES-256-GCM** for sealing private keys at rest.
//!
//! Thin, typed wrappers around audited crates. Nothing here is hand-rolled.

pub mod encryption;
pub mod hash;
pub mod keys;

pub use encryption::{open, seal};
pub use hash::{sha3_256, sha3_256_multi, Hash256, MerkleHashBuilder};
pub use keys::{KeyError, KeyPair, PublicKey, Signature};
