//! # Encrypted Key Storage
//!
//! Password-protected private keys on disk, one JSON file per named key:
//!
//! ```text
//! <directory>/<name>.json
//! {
//!   "version": 1,
//!   "kdf": "argon2id",
//!   "salt": "<32 hex chars>",
//!   "ciphertext": "<hex of nonce || AES-256-GCM(private key) || tag>"
//! }
//! ```
//!
//! The encryption key is derived with Argon2id from the password and a
//! fresh random salt on every save. The key name is bound in as associated
//! data, so renaming a file on disk makes it undecryptable.

use argon2::Argon2;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::crypto::encryption::{self, AES_KEY_LENGTH};
use crate::crypto::keys::KeyPair;

/// Key file format version. Bump on incompatible layout changes.
pub const FILE_FORMAT_VERSION: u8 = 1;

/// The only key derivation function this store writes or reads.
pub const KDF_NAME: &str = "argon2id";

/// Random salt length for key derivation.
const SALT_SIZE: usize = 16;

/// File extension for key records.
const KEY_FILE_EXTENSION: &str = "json";

/// Errors from saving or loading a key.
#[derive(Debug, Error)]
pub enum KeyStoreError {
    /// Reading or writing the key file failed.
    #[error("key file I/O failed for {path}: {source}")]
    Io {
        /// File that could not be accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Names must be non-empty and free of path separators.
    #[error("invalid key name: {0:?}")]
    InvalidName(String),

    /// The file is not a key record this store understands.
    #[error("malformed key file: {0}")]
    Malformed(String),

    /// The record was written by a newer (or older) format.
    #[error("unsupported key file version {found} (expected {FILE_FORMAT_VERSION})")]
    UnsupportedVersion {
        /// Version found in the file.
        found: u8,
    },

    /// The record names a KDF other than Argon2id.
    #[error("unsupported key derivation function: {0}")]
    UnsupportedKdf(String),

    /// Argon2 rejected its parameters.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Sealing the private key failed.
    #[error("encryption failed")]
    Encrypt,

    /// Wrong password, wrong name, or a tampered file.
    #[error("decryption failed -- wrong password or corrupted key file")]
    Decrypt,
}

/// The on-disk JSON record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedKeyRecord {
    pub version: u8,
    pub kdf: String,
    pub salt: String,
    pub ciphertext: String,
}

/// A directory of password-protected private keys.
pub struct KeyStore {
    directory: PathBuf,
    password: String,
}

impl KeyStore {
    pub fn new(directory: impl Into<PathBuf>, password: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            password: password.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File path for a key name.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, KeyStoreError> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(KeyStoreError::InvalidName(name.to_string()));
        }
        Ok(self
            .directory
            .join(format!("{}.{}", name, KEY_FILE_EXTENSION)))
    }

    /// Returns `true` if a record for `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.path_for(name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Seals `key_pair`'s private key and writes it under `name`,
    /// replacing any existing record. Creates the directory if needed.
    pub fn save(&self, name: &str, key_pair: &KeyPair) -> Result<PathBuf, KeyStoreError> {
        let path = self.path_for(name)?;
        std::fs::create_dir_all(&self.directory).map_err(|source| KeyStoreError::Io {
            path: self.directory.clone(),
            source,
        })?;

        let mut salt = [0u8; SALT_SIZE];
        OsRng.fill_bytes(&mut salt);
        let key = derive_key(&self.password, &salt)?;

        let sealed = encryption::seal(&key, &key_pair.private_key_bytes(), name.as_bytes())
            .map_err(|_| KeyStoreError::Encrypt)?;

        let record = EncryptedKeyRecord {
            version: FILE_FORMAT_VERSION,
            kdf: KDF_NAME.to_string(),
            salt: hex::encode(salt),
            ciphertext: hex::encode(sealed),
        };
        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| KeyStoreError::Malformed(e.to_string()))?;

        std::fs::write(&path, json).map_err(|source| KeyStoreError::Io {
            path: path.clone(),
            source,
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600)).map_err(
                |source| KeyStoreError::Io {
                    path: path.clone(),
                    source,
                },
            )?;
        }

        debug!(path = %path.display(), public_key = %key_pair.public_key(), "key saved");
        Ok(path)
    }

    /// Loads and decrypts the key pair stored under `name`.
    pub fn load(&self, name: &str) -> Result<KeyPair, KeyStoreError> {
        let path = self.path_for(name)?;
        let json = std::fs::read_to_string(&path).map_err(|source| KeyStoreError::Io {
            path: path.clone(),
            source,
        })?;
        let record: EncryptedKeyRecord =
            serde_json::from_str(&json).map_err(|e| KeyStoreError::Malformed(e.to_string()))?;

        if record.version != FILE_FORMAT_VERSION {
            return Err(KeyStoreError::UnsupportedVersion {
                found: record.version,
            });
        }
        if record.kdf != KDF_NAME {
            return Err(KeyStoreError::UnsupportedKdf(record.kdf));
        }

        let salt = hex::decode(&record.salt)
            .map_err(|e| KeyStoreError::Malformed(format!("salt: {}", e)))?;
        let sealed = hex::decode(&record.ciphertext)
            .map_err(|e| KeyStoreError::Malformed(format!("ciphertext: {}", e)))?;

        let key = derive_key(&self.password, &salt)?;
        let plaintext =
            encryption::open(&key, &sealed, name.as_bytes()).map_err(|_| KeyStoreError::Decrypt)?;

        let private_key: [u8; 32] = plaintext
            .as_slice()
            .try_into()
            .map_err(|_| KeyStoreError::Malformed("private key length".to_string()))?;

        let key_pair = KeyPair::from_private_key_bytes(&private_key);
        debug!(path = %path.display(), public_key = %key_pair.public_key(), "key loaded");
        Ok(key_pair)
    }
}

impl fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyStore")
            .field("directory", &self.directory)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Argon2id with the crate's default (OWASP-recommended) parameters.
fn derive_key(password: &str, salt: &[u8]) -> Result<[u8; AES_KEY_LENGTH], KeyStoreError> {
    let mut key = [0u8; AES_KEY_LENGTH];
    Argon2::default()
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|e| KeyStoreError::KeyDerivation(e.to_string()))?;
    Ok(key)
}
