// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Symbol Protocol: Transaction Core
//!
//! Builds, signs and announces transactions to a Symbol ledger node over its
//! REST interface.
//!
//! ## Architecture
//!
//! - **config**: Protocol constants, network selection, explorer links.
//! - **crypto**: Ed25519 keys, SHA3-256 hashing, AES-256-GCM sealing.
//! - **identity**: Addresses and the encrypted key store.
//! - **transaction**: Typed records, wire codec, builder, signing.
//! - **network**: Node transport, network properties, sign-and-announce.
//!
//! ## Typical flow
//!
//! 1. [`network::NetworkPropertiesClient::fetch`] once for the epoch
//!    adjustment and currency mosaic id.
//! 2. [`transaction::TransactionBuilder::new`] bound to those parameters.
//! 3. One `create_*` call for an unsigned [`transaction::Transaction`].
//! 4. [`network::TransactionSubmitter::sign_and_announce`] with the signer's
//!    [`crypto::KeyPair`].
//!
//! ## Design Philosophy
//!
//! 1. Byte-exact encoding. Every layout has a test against known bytes.
//! 2. No I/O outside `network`. Building and signing are pure.
//! 3. Errors are typed per concern and never swallowed.
//! 4. The library only emits `tracing` events; binaries decide where they go.

pub mod config;
pub mod crypto;
pub mod identity;
pub mod network;
pub mod transaction;
