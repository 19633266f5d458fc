//! Error types for node communication.
//!
//! Each operation that talks to a node has its own error so callers can
//! tell a failed query from a rejected announce. Both wrap
//! [`TransportError`] for failures below HTTP status level.

use thiserror::Error;

use crate::crypto::keys::PublicKey;
use crate::transaction::codec::EncodeError;

/// The request never produced an HTTP response.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The node URL could not be combined with the resource path.
    #[error("invalid node url: {0}")]
    InvalidUrl(String),

    /// Connection, TLS or I/O failure.
    #[error("request to {url} failed: {reason}")]
    Request {
        /// Full URL that was requested.
        url: String,
        /// Transport-level cause.
        reason: String,
    },
}

/// Errors from reading `/network/properties`.
#[derive(Debug, Error)]
pub enum NetworkQueryError {
    /// The node answered with a non-2xx status.
    #[error("network properties query failed with status {status}")]
    Status {
        /// HTTP status returned.
        status: u16,
    },

    /// The body is not a JSON document.
    #[error("network properties response is not valid JSON: {0}")]
    MalformedBody(String),

    /// A required field is missing or cannot be parsed.
    #[error("malformed field {field}: {reason}")]
    MalformedField {
        /// Dotted path of the field, e.g. `network.epochAdjustment`.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors from announcing a signed transaction.
#[derive(Debug, Error)]
pub enum AnnounceError {
    /// The node did not answer with the "accepted" status.
    #[error("announce rejected with status {status}: {body}")]
    Rejected {
        /// HTTP status returned.
        status: u16,
        /// Response body, usually a JSON error document.
        body: String,
    },

    /// The key pair does not match the transaction's signer field. The
    /// signature would never verify, so nothing was sent.
    #[error("signer mismatch: transaction names {expected}, key pair is {got}")]
    SignerMismatch {
        /// Signer recorded in the transaction.
        expected: PublicKey,
        /// Public key of the supplied key pair.
        got: PublicKey,
    },

    /// The transaction could not be encoded. Nothing was sent.
    #[error("cannot encode transaction: {0}")]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
