//! # Protocol Configuration & Constants
//!
//! Every magic number the transaction core depends on lives here. The wire
//! constants are dictated by the target ledger; change them and the node
//! will reject every transaction we build.
//!
//! The runtime-selectable parts (which network, which generation hash seed,
//! which explorer) are expressed as small value types so that private
//! deployments can swap them without code changes.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::hash::Hash256;

// ---------------------------------------------------------------------------
// Network Identifiers
// ---------------------------------------------------------------------------

/// Mainnet identifier byte. Also the first byte of every mainnet address.
pub const NETWORK_IDENTIFIER_MAINNET: u8 = 0x68;

/// Testnet identifier byte.
pub const NETWORK_IDENTIFIER_TESTNET: u8 = 0x98;

/// Mainnet generation hash seed. Mixed into every signature so a mainnet
/// transaction can never be replayed on another network.
///
/// `57F7DA205008026C776CB6AED843393F04CD458E0AA2D9F1D5F31A402072B2D6`.
pub const GENERATION_HASH_SEED_MAINNET: [u8; HASH_LENGTH] = [
    0x57, 0xF7, 0xDA, 0x20, 0x50, 0x08, 0x02, 0x6C,
    0x77, 0x6C, 0xB6, 0xAE, 0xD8, 0x43, 0x39, 0x3F,
    0x04, 0xCD, 0x45, 0x8E, 0x0A, 0xA2, 0xD9, 0xF1,
    0xD5, 0xF3, 0x1A, 0x40, 0x20, 0x72, 0xB2, 0xD6,
];

/// Testnet generation hash seed. Testnet is reset from time to time; when
/// that happens, override it via [`NetworkProfile::with_generation_hash_seed`].
///
/// `49D6E1CE276A85B70EAFE52349AACCA389302E7A9754BCF1221E79494FC665A4`.
pub const GENERATION_HASH_SEED_TESTNET: [u8; HASH_LENGTH] = [
    0x49, 0xD6, 0xE1, 0xCE, 0x27, 0x6A, 0x85, 0xB7,
    0x0E, 0xAF, 0xE5, 0x23, 0x49, 0xAA, 0xCC, 0xA3,
    0x89, 0x30, 0x2E, 0x7A, 0x97, 0x54, 0xBC, 0xF1,
    0x22, 0x1E, 0x79, 0x49, 0x4F, 0xC6, 0x65, 0xA4,
];

/// Public block explorer for mainnet transactions. The hash is appended.
pub const EXPLORER_URL_MAINNET: &str = "https://symbol.fyi/transactions/";

/// Public block explorer for testnet transactions.
pub const EXPLORER_URL_TESTNET: &str = "https://testnet.symbol.fyi/transactions/";

// ---------------------------------------------------------------------------
// Wire Layout
// ---------------------------------------------------------------------------

/// Public key length in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 signature length in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// SHA3-256 output length.
pub const HASH_LENGTH: usize = 32;

/// Raw (decoded) address length: network byte, RIPEMD-160 digest, checksum.
pub const ADDRESS_LENGTH: usize = 24;

/// Encoded address length in base32 characters.
pub const ADDRESS_ENCODED_LENGTH: usize = 39;

/// Size of an outer (top-level) transaction header.
pub const TRANSACTION_HEADER_SIZE: usize = 128;

/// Size of an embedded transaction header.
pub const EMBEDDED_TRANSACTION_HEADER_SIZE: usize = 48;

/// Offset of the first signed byte (the version byte) in an outer
/// transaction. Everything before it is size, reserved, signature, signer
/// and reserved again.
pub const SIGNING_PAYLOAD_OFFSET: usize = 108;

/// For aggregates only `version..transactions_hash` is signed: the 4-byte
/// version/network/type prefix, fee, deadline and the 32-byte hash.
pub const AGGREGATE_HASHED_SIZE: usize = 52;

/// Embedded transactions inside an aggregate are zero-padded to this.
pub const AGGREGATE_ALIGNMENT: usize = 8;

/// Marker byte prepended to every text message and metadata value so that
/// explorers and wallets render it as plain text.
pub const PLAIN_TEXT_MARKER: u8 = 0x00;

/// Top bit of a 64-bit id marks a namespace id; mosaic ids keep it clear.
pub const NAMESPACE_FLAG: u64 = 1 << 63;

// ---------------------------------------------------------------------------
// Transaction Defaults
// ---------------------------------------------------------------------------

/// Default fee ceiling in atomic units of the currency mosaic (2 XYM).
pub const DEFAULT_MAX_FEE: u64 = 2_000_000;

/// Default deadline window in hours. The network refuses deadlines more
/// than 6 hours ahead, so stay well under that.
pub const DEFAULT_EXPIRATION_HOURS: u32 = 2;

// ---------------------------------------------------------------------------
// REST Interface
// ---------------------------------------------------------------------------

/// Resource returning the network-wide properties document.
pub const NETWORK_PROPERTIES_PATH: &str = "/network/properties";

/// Resource accepting signed transactions.
pub const TRANSACTIONS_PATH: &str = "/transactions";

/// Status returned when the node has queued a transaction for processing.
/// This is acceptance, not inclusion.
pub const ANNOUNCE_ACCEPTED_STATUS: u16 = 202;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Configuration mistakes detected before any network I/O.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The network name is neither `mainnet` nor `testnet`.
    #[error("unknown network name: {0}")]
    UnknownNetwork(String),
}

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// The two public networks the core can sign for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    /// The identifier byte written into every transaction header and
    /// address.
    pub fn identifier(self) -> u8 {
        match self {
            Self::Mainnet => NETWORK_IDENTIFIER_MAINNET,
            Self::Testnet => NETWORK_IDENTIFIER_TESTNET,
        }
    }

    /// Reverse of [`Network::identifier`].
    pub fn from_identifier(byte: u8) -> Option<Self> {
        match byte {
            NETWORK_IDENTIFIER_MAINNET => Some(Self::Mainnet),
            NETWORK_IDENTIFIER_TESTNET => Some(Self::Testnet),
            _ => None,
        }
    }

    /// Lower-case name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }

    /// The published generation hash seed for this network.
    pub fn default_generation_hash_seed(self) -> Hash256 {
        match self {
            Self::Mainnet => Hash256::new(GENERATION_HASH_SEED_MAINNET),
            Self::Testnet => Hash256::new(GENERATION_HASH_SEED_TESTNET),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            other => Err(ConfigurationError::UnknownNetwork(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// NetworkProfile
// ---------------------------------------------------------------------------

/// Everything the signer needs to know about the target network.
///
/// The generation hash seed defaults to the published one but can be
/// replaced, typically with the `network.generationHashSeed` value a node
/// reports for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkProfile {
    network: Network,
    generation_hash_seed: Hash256,
}

impl NetworkProfile {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            generation_hash_seed: network.default_generation_hash_seed(),
        }
    }

    /// Overrides the generation hash seed.
    pub fn with_generation_hash_seed(mut self, seed: Hash256) -> Self {
        self.generation_hash_seed = seed;
        self
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn identifier(&self) -> u8 {
        self.network.identifier()
    }

    pub fn generation_hash_seed(&self) -> &Hash256 {
        &self.generation_hash_seed
    }
}

// ---------------------------------------------------------------------------
// ExplorerTable
// ---------------------------------------------------------------------------

/// Per-network block explorer URL prefixes.
///
/// Purely informational: used to print a link after a successful announce.
/// Injected at construction so private networks can point at their own
/// explorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerTable {
    urls: HashMap<Network, String>,
}

impl ExplorerTable {
    /// A table with no entries. Links are omitted for unlisted networks.
    pub fn empty() -> Self {
        Self {
            urls: HashMap::new(),
        }
    }

    /// Sets (or replaces) the URL prefix for `network`.
    pub fn with(mut self, network: Network, url_prefix: impl Into<String>) -> Self {
        self.urls.insert(network, url_prefix.into());
        self
    }

    pub fn url_prefix(&self, network: Network) -> Option<&str> {
        self.urls.get(&network).map(String::as_str)
    }

    /// Full explorer link for a transaction hash, if the network is listed.
    pub fn transaction_url(&self, network: Network, hash: &Hash256) -> Option<String> {
        self.url_prefix(network)
            .map(|prefix| format!("{}{}", prefix, hash))
    }
}

impl Default for ExplorerTable {
    fn default() -> Self {
        Self::empty()
            .with(Network::Mainnet, EXPLORER_URL_MAINNET)
            .with(Network::Testnet, EXPLORER_URL_TESTNET)
    }
}
