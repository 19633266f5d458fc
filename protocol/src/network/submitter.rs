//! Sign-and-announce.
//!
//! The node answers `PUT /transactions` synchronously with `202 Accepted`
//! once the transaction is queued. That is all this module guarantees.
//! An accepted transaction can still fail later (fee too low, stale
//! deadline, wrong currency id, an unwrapped metadata transaction) and the
//! caller has to look the returned hash up to confirm inclusion.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{NetworkProfile, ANNOUNCE_ACCEPTED_STATUS, TRANSACTIONS_PATH};
use crate::crypto::hash::Hash256;
use crate::crypto::keys::KeyPair;
use crate::transaction::model::Transaction;
use crate::transaction::signing::{sign_transaction, SignedTransaction};

use super::error::AnnounceError;
use super::transport::{NodeTransport, TransportResponse};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Signs transactions for one network and announces them to a node.
#[derive(Clone)]
pub struct TransactionSubmitter {
    transport: Arc<dyn NodeTransport>,
    profile: NetworkProfile,
}

impl TransactionSubmitter {
    pub fn new(transport: Arc<dyn NodeTransport>, profile: NetworkProfile) -> Self {
        Self { transport, profile }
    }

    pub fn profile(&self) -> &NetworkProfile {
        &self.profile
    }

    /// Signs `tx` with `key_pair`, announces it, and returns its hash once
    /// the node has accepted it for processing.
    ///
    /// Fails without sending anything if `key_pair` is not the transaction's
    /// signer or if `tx` cannot be encoded.
    pub async fn sign_and_announce(
        &self,
        tx: &Transaction,
        key_pair: &KeyPair,
    ) -> Result<Hash256, AnnounceError> {
        let public_key = key_pair.public_key();
        if public_key != tx.signer {
            return Err(AnnounceError::SignerMismatch {
                expected: tx.signer,
                got: public_key,
            });
        }

        let signed = sign_transaction(&self.profile, tx, key_pair)?;
        self.announce(&signed).await?;
        Ok(*signed.hash())
    }

    /// Announces an already signed transaction and returns the node's
    /// response, whose status is always the accepted status.
    pub async fn announce(
        &self,
        signed: &SignedTransaction,
    ) -> Result<TransportResponse, AnnounceError> {
        let response = self
            .transport
            .put(TRANSACTIONS_PATH, signed.to_announce_json(), JSON_CONTENT_TYPE)
            .await?;

        if response.status != ANNOUNCE_ACCEPTED_STATUS {
            warn!(
                hash = %signed.hash(),
                status = response.status,
                body = %response.body,
                "announce rejected"
            );
            return Err(AnnounceError::Rejected {
                status: response.status,
                body: response.body,
            });
        }

        info!(
            hash = %signed.hash(),
            tx_type = %signed.transaction_type(),
            bytes = signed.payload().len(),
            "transaction accepted for processing"
        );
        Ok(response)
    }
}
