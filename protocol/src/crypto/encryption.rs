//! # AES-256-GCM Sealing
//!
//! Authenticated encryption for private keys at rest.
//!
//! ## Wire format
//!
//! [`seal`] returns `nonce || ciphertext || tag` as one `Vec<u8>`; [`open`]
//! expects the same layout. Nonces are 96 random bits per call. A key is
//! derived fresh (new salt) for every sealed file, so the birthday bound on
//! random nonces is not a practical concern here.
//!
//! The associated data binds a ciphertext to its context (the keystore uses
//! the entry name). Opening under a different context fails exactly like a
//! wrong key.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use thiserror::Error;

/// AES-256 key length in bytes.
pub const AES_KEY_LENGTH: usize = 32;

/// GCM nonce length in bytes.
pub const AES_NONCE_LENGTH: usize = 12;

/// GCM authentication tag length in bytes.
pub const AES_TAG_LENGTH: usize = 16;

/// Encryption failures. The decrypt case does not say whether the key, the
/// data or the associated data was wrong.
#[derive(Debug, Error)]
pub enum EncryptionError {
    #[error("encryption failed")]
    EncryptFailed,

    #[error("decryption failed -- wrong key or corrupted ciphertext")]
    DecryptFailed,

    #[error("sealed data too short: must be at least {} bytes", AES_NONCE_LENGTH + AES_TAG_LENGTH)]
    CiphertextTooShort,
}

/// Encrypts `plaintext` under `key`, authenticating `aad` alongside it.
pub fn seal(
    key: &[u8; AES_KEY_LENGTH],
    plaintext: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, EncryptionError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| EncryptionError::EncryptFailed)?;

    let mut nonce_bytes = [0u8; AES_NONCE_LENGTH];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(
            nonce,
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|_| EncryptionError::EncryptFailed)?;

    let mut out = Vec::with_capacity(AES_NONCE_LENGTH + ciphertext.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Reverses [`seal`]. `aad` must match what was sealed.
pub fn open(
    key: &[u8; AES_KEY_LENGTH],
    sealed: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, EncryptionError> {
    if sealed.len() < AES_NONCE_LENGTH + AES_TAG_LENGTH {
        return Err(EncryptionError::CiphertextTooShort);
    }

    let (nonce_bytes, ciphertext) = sealed.split_at(AES_NONCE_LENGTH);
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| EncryptionError::DecryptFailed)?;

    cipher
        .decrypt(
            Nonce::from_slice(nonce_bytes),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| EncryptionError::DecryptFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> [u8; AES_KEY_LENGTH] {
        let mut key = [0u8; AES_KEY_LENGTH];
        for (i, byte) in key.iter_mut().enumerate() {
            *byte = i as u8;
        }
        key
    }

    #[test]
    fn seal_open_roundtrip() {
        let key = test_key();
        let sealed = seal(&key, b"private key bytes", b"signer").unwrap();
        assert_eq!(sealed.len(), AES_NONCE_LENGTH + 17 + AES_TAG_LENGTH);
        assert_eq!(open(&key, &sealed, b"signer").unwrap(), b"private key bytes");
    }

    #[test]
    fn wrong_key_fails() {
        let key = test_key();
        let sealed = seal(&key, b"secret", b"").unwrap();
        let mut wrong = test_key();
        wrong[0] ^= 0xFF;
        assert!(matches!(
            open(&wrong, &sealed, b""),
            Err(EncryptionError::DecryptFailed)
        ));
    }

    #[test]
    fn wrong_aad_fails() {
        let key = test_key();
        let sealed = seal(&key, b"secret", b"alice").unwrap();
        assert!(open(&key, &sealed, b"bob").is_err());
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let key = test_key();
        let mut sealed = seal(&key, b"secret", b"").unwrap();
        sealed[AES_NONCE_LENGTH] ^= 0x01;
        assert!(open(&key, &sealed, b"").is_err());
    }

    #[test]
    fn nonces_are_fresh() {
        let key = test_key();
        let a = seal(&key, b"m", b"").unwrap();
        let b = seal(&key, b"m", b"").unwrap();
        assert_ne!(&a[..AES_NONCE_LENGTH], &b[..AES_NONCE_LENGTH]);
    }

    #[test]
    fn short_input_rejected() {
        assert!(matches!(
            open(&test_key(), &[0u8; 4], b""),
            Err(EncryptionError::CiphertextTooShort)
        ));
    }
}
