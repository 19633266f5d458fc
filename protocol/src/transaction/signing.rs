//! Transaction signing and the canonical transaction hash.
//!
//! ## Signing flow
//!
//! 1. Encode the transaction with a zeroed signature slot.
//! 2. Take the signing payload (see [`codec::signing_payload`]).
//! 3. Sign `generation_hash_seed || payload` with Ed25519.
//! 4. Write the signature into the slot.
//! 5. Hash `signature || signer || generation_hash_seed || payload` with
//!    SHA3-256. That hash is the transaction's identifier on the network.
//!
//! Prefixing the generation hash seed scopes a signature to one network: a
//! testnet transaction replayed on mainnet fails verification.

use crate::config::NetworkProfile;
use crate::crypto::hash::{sha3_256_multi, Hash256};
use crate::crypto::keys::{KeyPair, PublicKey, Signature};

use super::codec::{self, EncodeError};
use super::model::Transaction;
use super::types::TransactionType;

/// A signed, encoded transaction. Produced once; never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    payload: Vec<u8>,
    signature: Signature,
    signer: PublicKey,
    hash: Hash256,
    transaction_type: TransactionType,
}

impl SignedTransaction {
    /// Full wire bytes, signature included.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn signer(&self) -> &PublicKey {
        &self.signer
    }

    /// Canonical transaction hash.
    pub fn hash(&self) -> &Hash256 {
        &self.hash
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn is_aggregate(&self) -> bool {
        self.transaction_type == TransactionType::AggregateComplete
    }

    /// Upper-case hex of [`SignedTransaction::payload`].
    pub fn payload_hex(&self) -> String {
        hex::encode_upper(&self.payload)
    }

    /// The JSON document the node's announce endpoint expects:
    /// `{"payload":"<hex>"}`.
    pub fn to_announce_json(&self) -> String {
        serde_json::json!({ "payload": self.payload_hex() }).to_string()
    }
}

/// Signs `tx` with `key_pair` for the network described by `profile`.
///
/// The header's signer field comes from `tx`. If it does not match
/// `key_pair` the signature is still produced but will not verify.
/// Fails only when `tx` has a length that does not fit the wire format.
pub fn sign_transaction(
    profile: &NetworkProfile,
    tx: &Transaction,
    key_pair: &KeyPair,
) -> Result<SignedTransaction, EncodeError> {
    let seed = profile.generation_hash_seed();
    let mut payload = codec::serialize_unsigned(tx)?;
    let is_aggregate = tx.is_aggregate();

    let signing_data = codec::signing_payload(&payload, is_aggregate);
    let mut message = Vec::with_capacity(seed.as_bytes().len() + signing_data.len());
    message.extend_from_slice(seed.as_bytes());
    message.extend_from_slice(signing_data);
    let signature = key_pair.sign(&message);

    let hash = transaction_hash(&signature, &tx.signer, seed, signing_data);
    codec::attach_signature(&mut payload, &signature);

    Ok(SignedTransaction {
        payload,
        signature,
        signer: tx.signer,
        hash,
        transaction_type: tx.transaction_type(),
    })
}

/// SHA3-256 over `signature || signer || seed || signing payload`.
pub fn transaction_hash(
    signature: &Signature,
    signer: &PublicKey,
    generation_hash_seed: &Hash256,
    signing_payload: &[u8],
) -> Hash256 {
    Hash256::new(sha3_256_multi(&[
        signature.as_bytes().as_slice(),
        signer.as_bytes().as_slice(),
        generation_hash_seed.as_bytes().as_slice(),
        signing_payload,
    ]))
}

/// Checks a signed transaction's signature against its signer and `profile`.
pub fn verify_signed_transaction(profile: &NetworkProfile, signed: &SignedTransaction) -> bool {
    let signing_data = codec::signing_payload(&signed.payload, signed.is_aggregate());
    let mut message = Vec::with_capacity(32 + signing_data.len());
    message.extend_from_slice(profile.generation_hash_seed().as_bytes());
    message.extend_from_slice(signing_data);
    signed.signer.verify(&message, &signed.signature)
}
