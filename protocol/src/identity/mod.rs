//! # Identity Module
//!
//! Who signs and who receives.
//!
//! 1. **Address**: the 24-byte account identifier derived from a public
//!    key, and its 39-character base32 text form.
//! 2. **KeyStore**: password-protected private keys on disk. The core never
//!    persists key material itself; callers load a [`crate::crypto::KeyPair`]
//!    from here and hand it to the submitter.

pub mod address;
pub mod keystore;

pub use address::{Address, AddressError};
pub use keystore::{EncryptedKeyRecord, KeyStore, KeyStoreError};
