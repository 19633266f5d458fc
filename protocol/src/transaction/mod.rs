//! # Transaction Module
//!
//! Construction, encoding and signing of ledger transactions: transfers,
//! aggregate transfers, mosaic definitions, mosaic supply changes and mosaic
//! metadata assignments.
//!
//! ## Architecture
//!
//! ```text
//! types.rs     Value types (MosaicId, Message, MosaicFlags, Deadline, ...)
//! nonce.rs     NonceGenerator and mosaic id derivation
//! metadata.rs  KeyGenerator for 64-bit scoped metadata keys
//! model.rs     Typed Transaction / EmbeddedTransaction records
//! codec.rs     Little-endian wire encoding, padding, aggregate hashing
//! builder.rs   TransactionBuilder, one create_* per transaction kind
//! signing.rs   sign_transaction, canonical hash, announce payload
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build**: [`TransactionBuilder`] returns an unsigned [`Transaction`].
//! 2. **Sign**: [`sign_transaction`] produces an immutable
//!    [`SignedTransaction`] with its canonical hash.
//! 3. **Announce**: [`crate::network::TransactionSubmitter`] sends it to a
//!    node. Acceptance only means the node queued it.
//!
//! ## Design Decisions
//!
//! - One body struct per kind instead of a loosely typed field map. A
//!   missing field is a compile error, not a malformed payload.
//! - Amounts are `u64` atomic units. No floating point.
//! - Records are built fresh for each announce and discarded after signing.
//! - Length fields that would overflow their wire width fail with
//!   [`EncodeError`] rather than wrapping.

pub mod builder;
pub mod codec;
pub mod metadata;
pub mod model;
pub mod nonce;
pub mod signing;
pub mod types;

pub use builder::TransactionBuilder;
pub use codec::EncodeError;
pub use metadata::KeyGenerator;
pub use model::{
    AggregateBody, EmbeddedBody, EmbeddedTransaction, MosaicDefinitionBody, MosaicMetadataBody,
    MosaicSupplyChangeBody, Transaction, TransactionBody, TransferBody,
};
pub use nonce::{generate_mosaic_id, MosaicNonce, NonceGenerator};
pub use signing::{sign_transaction, verify_signed_transaction, SignedTransaction};
pub use types::{
    Amount, BlockDuration, Deadline, Message, Mosaic, MosaicFlags, MosaicId,
    MosaicSupplyChangeAction, TransactionType,
};
