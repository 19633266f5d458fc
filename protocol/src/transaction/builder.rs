//! Transaction construction.
//!
//! A [`TransactionBuilder`] is bound to one network's parameters (epoch
//! adjustment, fee ceiling, expiration window) and hands out unsigned
//! [`Transaction`] records. Every `create_*` call stamps a fresh deadline and
//! the configured fee ceiling.
//!
//! The builder performs no I/O and does not sign -- that happens in
//! [`super::signing`] and [`crate::network::TransactionSubmitter`]. The
//! aggregate and metadata builders encode their inner records up front and
//! fail with [`EncodeError`] when a length overflows its wire field; for
//! single records the same check happens at signing. Other field ranges are
//! left to the node.

use tracing::debug;

use crate::config::{ConfigurationError, ExplorerTable, Network};
use crate::crypto::hash::Hash256;
use crate::crypto::keys::PublicKey;
use crate::identity::Address;

use super::codec::{checked_i16, EncodeError};
use super::metadata::KeyGenerator;
use super::model::{
    AggregateBody, EmbeddedBody, EmbeddedTransaction, MosaicDefinitionBody, MosaicMetadataBody,
    MosaicSupplyChangeBody, Transaction, TransactionBody, TransferBody,
};
use super::nonce::{generate_mosaic_id, MosaicNonce, NonceGenerator};
use super::types::{
    Amount, BlockDuration, Deadline, Message, Mosaic, MosaicFlags, MosaicId,
    MosaicSupplyChangeAction,
};

/// Builds unsigned transactions for one network.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    network: Network,
    node_url: String,
    epoch_adjustment: u32,
    max_fee: Amount,
    expiration_hours: u32,
    explorer: ExplorerTable,
    fixed_time: Option<i64>,
}

impl TransactionBuilder {
    /// Fails with [`ConfigurationError::UnknownNetwork`] unless
    /// `network_name` is `mainnet` or `testnet`.
    pub fn new(
        network_name: &str,
        node_url: impl Into<String>,
        epoch_adjustment: u32,
        max_fee: Amount,
        expiration_hours: u32,
    ) -> Result<Self, ConfigurationError> {
        let network: Network = network_name.parse()?;
        Ok(Self {
            network,
            node_url: node_url.into(),
            epoch_adjustment,
            max_fee,
            expiration_hours,
            explorer: ExplorerTable::default(),
            fixed_time: None,
        })
    }

    /// Replaces the default explorer table.
    pub fn with_explorer_table(mut self, explorer: ExplorerTable) -> Self {
        self.explorer = explorer;
        self
    }

    /// Pins the clock (Unix seconds) used for deadlines. Yields reproducible
    /// payloads; leave unset in production.
    pub fn at_time(mut self, unix_seconds: i64) -> Self {
        self.fixed_time = Some(unix_seconds);
        self
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    pub fn epoch_adjustment(&self) -> u32 {
        self.epoch_adjustment
    }

    pub fn max_fee(&self) -> Amount {
        self.max_fee
    }

    pub fn expiration_hours(&self) -> u32 {
        self.expiration_hours
    }

    /// Explorer link for a transaction hash, if the network has an entry.
    pub fn explorer_url(&self, hash: &Hash256) -> Option<String> {
        self.explorer.transaction_url(self.network, hash)
    }

    /// A deadline `expiration_hours` from now.
    pub fn deadline(&self) -> Deadline {
        match self.fixed_time {
            Some(now) => Deadline::compute(now, self.expiration_hours, self.epoch_adjustment),
            None => Deadline::from_now(self.expiration_hours, self.epoch_adjustment),
        }
    }

    // -----------------------------------------------------------------------
    // Transfers
    // -----------------------------------------------------------------------

    /// A single transfer carrying `mosaics` and a plain-text `message`.
    pub fn create_transfer(
        &self,
        signer: &PublicKey,
        recipient: &Address,
        mosaics: &[Mosaic],
        message: &str,
    ) -> Transaction {
        let body = TransferBody {
            recipient: *recipient,
            mosaics: mosaics.to_vec(),
            message: Message::new(message),
        };
        self.finish(signer, TransactionBody::Transfer(body))
    }

    /// One embedded transfer per message, in the given order, wrapped in an
    /// aggregate. All inner transfers share signer, recipient and mosaics.
    ///
    /// An empty `messages` slice yields an aggregate with no inner
    /// transactions, which the node rejects.
    pub fn create_aggregate_transfer<S: AsRef<str>>(
        &self,
        signer: &PublicKey,
        recipient: &Address,
        mosaics: &[Mosaic],
        messages: &[S],
    ) -> Result<Transaction, EncodeError> {
        let inner = messages
            .iter()
            .map(|message| {
                self.embed(
                    signer,
                    EmbeddedBody::Transfer(TransferBody {
                        recipient: *recipient,
                        mosaics: mosaics.to_vec(),
                        message: Message::new(message.as_ref()),
                    }),
                )
            })
            .collect();
        self.aggregate(signer, inner)
    }

    // -----------------------------------------------------------------------
    // Mosaics
    // -----------------------------------------------------------------------

    /// Defines a new mosaic owned by `signer`, with a time-derived nonce.
    ///
    /// Two definitions built within the same second get the same nonce and
    /// therefore the same id. Use
    /// [`TransactionBuilder::create_mosaic_definition_with_nonce`] to avoid
    /// that.
    pub fn create_mosaic_definition(
        &self,
        signer: &PublicKey,
        flags: MosaicFlags,
        divisibility: u8,
        duration: BlockDuration,
    ) -> Transaction {
        let nonce = MosaicNonce(NonceGenerator::generate());
        self.create_mosaic_definition_with_nonce(signer, nonce, flags, divisibility, duration)
    }

    /// Defines a new mosaic with a caller-chosen nonce. The record's id is
    /// derived from the signer's address and `nonce`.
    pub fn create_mosaic_definition_with_nonce(
        &self,
        signer: &PublicKey,
        nonce: MosaicNonce,
        flags: MosaicFlags,
        divisibility: u8,
        duration: BlockDuration,
    ) -> Transaction {
        let owner = Address::from_public_key(self.network, signer);
        let body = MosaicDefinitionBody {
            id: generate_mosaic_id(&owner, nonce),
            duration,
            nonce,
            flags,
            divisibility,
        };
        self.finish(signer, TransactionBody::MosaicDefinition(body))
    }

    /// Increases the supply of `mosaic_id` by `delta` atomic units.
    ///
    /// `delta` is reinterpreted as an unsigned amount; a negative value wraps
    /// and the node will reject it.
    pub fn create_mosaic_supply_change(
        &self,
        signer: &PublicKey,
        mosaic_id: MosaicId,
        delta: i64,
    ) -> Transaction {
        let body = MosaicSupplyChangeBody {
            mosaic_id,
            delta: delta as Amount,
            action: MosaicSupplyChangeAction::Increase,
        };
        self.finish(signer, TransactionBody::MosaicSupplyChange(body))
    }

    /// Assigns `value` under `key` to a mosaic, wrapped in an aggregate.
    ///
    /// A bare metadata transaction is accepted at announce time but never
    /// applied by the network, so the result is always an aggregate with
    /// exactly one inner metadata transaction. `value_size_delta` is the
    /// full encoded value length, which is only correct for a first
    /// assignment. Values longer than 32766 bytes do not fit that delta and
    /// are refused.
    pub fn create_mosaic_metadata(
        &self,
        signer: &PublicKey,
        target_address: &Address,
        target_mosaic_id: MosaicId,
        key: &str,
        value: &str,
    ) -> Result<Transaction, EncodeError> {
        let value = Message::new(value);
        let body = MosaicMetadataBody {
            target_address: *target_address,
            scoped_metadata_key: KeyGenerator::generate_uint64_key(key),
            target_mosaic_id,
            value_size_delta: checked_i16("value_size_delta", value.encoded_len())?,
            value,
        };
        let inner = self.embed(signer, EmbeddedBody::MosaicMetadata(body));
        self.aggregate(signer, vec![inner])
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn embed(&self, signer: &PublicKey, body: EmbeddedBody) -> EmbeddedTransaction {
        EmbeddedTransaction {
            signer: *signer,
            network: self.network,
            body,
        }
    }

    fn aggregate(
        &self,
        signer: &PublicKey,
        inner: Vec<EmbeddedTransaction>,
    ) -> Result<Transaction, EncodeError> {
        let body = AggregateBody::new(inner)?;
        Ok(self.finish(signer, TransactionBody::AggregateComplete(body)))
    }

    fn finish(&self, signer: &PublicKey, body: TransactionBody) -> Transaction {
        let tx = Transaction {
            signer: *signer,
            network: self.network,
            fee: self.max_fee,
            deadline: self.deadline(),
            body,
        };
        debug!(
            tx_type = %tx.transaction_type(),
            network = %tx.network,
            fee = tx.fee,
            deadline = %tx.deadline,
            inner = tx.inner_transactions().map_or(0, <[_]>::len),
            "built transaction"
        );
        tx
    }
}
