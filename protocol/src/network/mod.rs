//! # Network Module
//!
//! Talking to a node's REST interface.
//!
//! ## Architecture
//!
//! ```text
//! transport.rs   NodeTransport trait, HttpTransport over reqwest
//! properties.rs  NetworkPropertiesClient (epoch adjustment, currency id, seed)
//! submitter.rs   TransactionSubmitter (sign, announce, interpret 202)
//! error.rs       TransportError, NetworkQueryError, AnnounceError
//! ```
//!
//! ## Design Decisions
//!
//! - Every call is a single awaited round trip. No retries, no backoff and
//!   no timeout beyond the HTTP client's defaults.
//! - Calls are `async`. A caller that needs blocking behaviour drives them
//!   to completion with its runtime's `block_on`.
//! - The transport is a trait object shared through `Arc`, so one
//!   connection pool serves both the properties client and the submitter,
//!   and tests can substitute a scripted node.

pub mod error;
pub mod properties;
pub mod submitter;
pub mod transport;

pub use error::{AnnounceError, NetworkQueryError, TransportError};
pub use properties::{NetworkProperties, NetworkPropertiesClient};
pub use submitter::TransactionSubmitter;
pub use transport::{HttpTransport, NodeTransport, TransportResponse};
