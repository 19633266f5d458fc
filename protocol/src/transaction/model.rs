//! Strongly typed transaction records.
//!
//! One body struct per transaction kind, shared between the top-level
//! [`Transaction`] and the [`EmbeddedTransaction`] that lives inside an
//! aggregate. A top-level record carries the fee and deadline; an embedded
//! one does not, since the enclosing aggregate pays and expires for all of
//! its children.
//!
//! There is deliberately no top-level metadata variant: the network accepts
//! a bare metadata transaction at announce time but never applies it, so
//! metadata can only be expressed as an [`EmbeddedBody::MosaicMetadata`]
//! inside an aggregate.

use crate::config::Network;
use crate::crypto::hash::Hash256;
use crate::crypto::keys::PublicKey;
use crate::identity::Address;

use super::codec::{self, EncodeError};
use super::nonce::MosaicNonce;
use super::types::{
    Amount, BlockDuration, Deadline, Message, Mosaic, MosaicFlags, MosaicId,
    MosaicSupplyChangeAction, TransactionType,
};

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

/// Moves mosaics and/or a message to `recipient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferBody {
    pub recipient: Address,
    /// Written in this order; never sorted.
    pub mosaics: Vec<Mosaic>,
    pub message: Message,
}

/// Creates a mosaic. `id` must be the id derived from the owner and `nonce`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicDefinitionBody {
    pub id: MosaicId,
    pub duration: BlockDuration,
    pub nonce: MosaicNonce,
    pub flags: MosaicFlags,
    pub divisibility: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicSupplyChangeBody {
    pub mosaic_id: MosaicId,
    pub delta: Amount,
    pub action: MosaicSupplyChangeAction,
}

/// Attaches a value to a mosaic under a 64-bit scoped key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MosaicMetadataBody {
    /// Account that owns the metadata entry (the mosaic creator).
    pub target_address: Address,
    pub scoped_metadata_key: u64,
    pub target_mosaic_id: MosaicId,
    /// Change in stored value length relative to the previous value.
    pub value_size_delta: i16,
    pub value: Message,
}

/// Inner transactions plus the commitment over them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateBody {
    transactions_hash: Hash256,
    transactions: Vec<EmbeddedTransaction>,
}

impl AggregateBody {
    /// Wraps `transactions` in caller order and computes their hash.
    ///
    /// Fails if any inner record cannot be encoded.
    pub fn new(transactions: Vec<EmbeddedTransaction>) -> Result<Self, EncodeError> {
        Ok(Self {
            transactions_hash: codec::transactions_hash(&transactions)?,
            transactions,
        })
    }

    pub fn transactions_hash(&self) -> &Hash256 {
        &self.transactions_hash
    }

    pub fn transactions(&self) -> &[EmbeddedTransaction] {
        &self.transactions
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionBody {
    Transfer(TransferBody),
    AggregateComplete(AggregateBody),
    MosaicDefinition(MosaicDefinitionBody),
    MosaicSupplyChange(MosaicSupplyChangeBody),
}

/// An unsigned top-level transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub signer: PublicKey,
    pub network: Network,
    /// Fee ceiling. The network charges at most this much.
    pub fee: Amount,
    pub deadline: Deadline,
    pub body: TransactionBody,
}

impl Transaction {
    pub fn transaction_type(&self) -> TransactionType {
        match self.body {
            TransactionBody::Transfer(_) => TransactionType::Transfer,
            TransactionBody::AggregateComplete(_) => TransactionType::AggregateComplete,
            TransactionBody::MosaicDefinition(_) => TransactionType::MosaicDefinition,
            TransactionBody::MosaicSupplyChange(_) => TransactionType::MosaicSupplyChange,
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self.body, TransactionBody::AggregateComplete(_))
    }

    /// Inner transactions, if this is an aggregate.
    pub fn inner_transactions(&self) -> Option<&[EmbeddedTransaction]> {
        match &self.body {
            TransactionBody::AggregateComplete(aggregate) => Some(aggregate.transactions()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// EmbeddedTransaction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbeddedBody {
    Transfer(TransferBody),
    MosaicDefinition(MosaicDefinitionBody),
    MosaicSupplyChange(MosaicSupplyChangeBody),
    MosaicMetadata(MosaicMetadataBody),
}

/// A transaction inside an aggregate. No fee, no deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedTransaction {
    pub signer: PublicKey,
    pub network: Network,
    pub body: EmbeddedBody,
}

impl EmbeddedTransaction {
    pub fn transaction_type(&self) -> TransactionType {
        match self.body {
            EmbeddedBody::Transfer(_) => TransactionType::Transfer,
            EmbeddedBody::MosaicDefinition(_) => TransactionType::MosaicDefinition,
            EmbeddedBody::MosaicSupplyChange(_) => TransactionType::MosaicSupplyChange,
            EmbeddedBody::MosaicMetadata(_) => TransactionType::MosaicMetadata,
        }
    }
}
