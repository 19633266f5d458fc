//! # Key Management
//!
//! Ed25519 key pairs for transaction signers.
//!
//! The ledger uses plain RFC 8032 Ed25519 (SHA-512 internally), so a
//! 32-byte private key from any wallet loads directly into a [`KeyPair`].
//! Private key bytes are never logged and never leave this module except
//! through [`KeyPair::private_key_bytes`], which the keystore uses to seal
//! them.

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH,
};
use rand::rngs::OsRng;
use std::fmt;
use thiserror::Error;

use crate::config::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};

/// Errors that can occur while parsing key material.
///
/// Deliberately terse about the cause; key parsing errors end up in logs.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid private key: expected {SECRET_KEY_LENGTH} bytes of hex")]
    InvalidPrivateKey,

    #[error("invalid public key: expected {PUBLIC_KEY_LENGTH} bytes of hex")]
    InvalidPublicKey,

    #[error("invalid signature: expected {SIGNATURE_LENGTH} bytes of hex")]
    InvalidSignature,
}

/// A signer's key pair.
///
/// Owned by the caller. Intentionally not `Serialize`: persisting a private
/// key goes through [`crate::identity::keystore::KeyStore`] or not at all.
pub struct KeyPair {
    signing_key: SigningKey,
}

/// The public half of a key pair. Appears in every transaction header.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LENGTH]);

/// A detached Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_LENGTH]);

// ---------------------------------------------------------------------------
// KeyPair
// ---------------------------------------------------------------------------

impl KeyPair {
    /// Generates a fresh key pair from the OS RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Loads a key pair from raw private key bytes. The public key is
    /// re-derived.
    pub fn from_private_key_bytes(bytes: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(bytes),
        }
    }

    /// Loads a key pair from a 64-character hex private key, the format
    /// wallets export.
    pub fn from_private_key_hex(hex_str: &str) -> Result<Self, KeyError> {
        let mut bytes = [0u8; SECRET_KEY_LENGTH];
        hex::decode_to_slice(hex_str.trim(), &mut bytes).map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self::from_private_key_bytes(&bytes))
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Signs `message`. Deterministic for a given key and message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.signing_key.sign(message).to_bytes())
    }

    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.public_key().verify(message, signature)
    }

    /// Raw private key bytes. Handle with care.
    pub fn private_key_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.signing_key.to_bytes()
    }
}

impl Clone for KeyPair {
    fn clone(&self) -> Self {
        Self::from_private_key_bytes(&self.signing_key.to_bytes())
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the private key, not even a prefix.
        write!(f, "KeyPair(pub={})", self.public_key())
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for KeyPair {}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

impl PublicKey {
    pub fn new(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let mut bytes = [0u8; PUBLIC_KEY_LENGTH];
        hex::decode_to_slice(s.trim(), &mut bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    /// Returns `true` if `signature` is valid for `message` under this key.
    /// Bytes that are not a curve point simply fail verification.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        let dalek_sig = DalekSignature::from_bytes(&signature.0);
        verifying_key.verify(message, &dalek_sig).is_ok()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

impl Signature {
    pub fn new(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// The placeholder written into unsigned transactions.
    pub fn zero() -> Self {
        Self([0u8; SIGNATURE_LENGTH])
    }

    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        hex::decode_to_slice(s.trim(), &mut bytes).map_err(|_| KeyError::InvalidSignature)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}..)", &self.to_hex()[..16])
    }
}
