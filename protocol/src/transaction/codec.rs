//! Binary encoding of transaction records.
//!
//! ## Layout
//!
//! All integers are little-endian.
//!
//! ```text
//! Transaction header (128 bytes)
//!   size u32 | reserved u32 | signature [64] | signer [32] | reserved u32
//!   version u8 | network u8 | type u16 | fee u64 | deadline u64
//!
//! Embedded header (48 bytes)
//!   size u32 | reserved u32 | signer [32] | reserved u32
//!   version u8 | network u8 | type u16
//! ```
//!
//! The body follows the header directly. Inside an aggregate each embedded
//! record is zero-padded to an 8-byte boundary; the `size` field always
//! holds the unpadded length.
//!
//! Length fields are narrow (`u8` mosaic count, `u16` message and value
//! sizes). A record whose lengths do not fit is refused with
//! [`EncodeError`] instead of being written with a wrapped size. Other field
//! ranges are left to the node.

use bytes::BufMut;
use thiserror::Error;

use crate::config::{
    Network, AGGREGATE_ALIGNMENT, AGGREGATE_HASHED_SIZE, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH,
    SIGNING_PAYLOAD_OFFSET,
};
use crate::crypto::hash::{sha3_256, Hash256, MerkleHashBuilder};
use crate::crypto::keys::{PublicKey, Signature};

use super::model::{
    AggregateBody, EmbeddedBody, EmbeddedTransaction, MosaicDefinitionBody, MosaicMetadataBody,
    MosaicSupplyChangeBody, Transaction, TransactionBody, TransferBody,
};
use super::types::TransactionType;

/// Offset of the signature inside an outer record.
pub const SIGNATURE_OFFSET: usize = 8;

/// A record that cannot be represented in the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// A length does not fit the width of its size field.
    #[error("{field} is {len}, exceeds the maximum of {max}")]
    FieldOverflow {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

pub(crate) fn checked_u8(field: &'static str, len: usize) -> Result<u8, EncodeError> {
    u8::try_from(len).map_err(|_| EncodeError::FieldOverflow {
        field,
        len,
        max: u8::MAX as usize,
    })
}

pub(crate) fn checked_u16(field: &'static str, len: usize) -> Result<u16, EncodeError> {
    u16::try_from(len).map_err(|_| EncodeError::FieldOverflow {
        field,
        len,
        max: u16::MAX as usize,
    })
}

pub(crate) fn checked_i16(field: &'static str, len: usize) -> Result<i16, EncodeError> {
    i16::try_from(len).map_err(|_| EncodeError::FieldOverflow {
        field,
        len,
        max: i16::MAX as usize,
    })
}

pub(crate) fn checked_u32(field: &'static str, len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::FieldOverflow {
        field,
        len,
        max: u32::MAX as usize,
    })
}

// ---------------------------------------------------------------------------
// Top-level records
// ---------------------------------------------------------------------------

/// Encodes `tx` with `signature` in the signature slot.
pub fn serialize(tx: &Transaction, signature: &Signature) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::with_capacity(256);
    buf.put_u32_le(0); // size, patched below
    buf.put_u32_le(0);
    buf.put_slice(signature.as_bytes());
    buf.put_slice(tx.signer.as_bytes());
    buf.put_u32_le(0);
    put_entity_header(&mut buf, tx.transaction_type(), tx.network);
    buf.put_u64_le(tx.fee);
    buf.put_u64_le(tx.deadline.millis());

    match &tx.body {
        TransactionBody::Transfer(body) => put_transfer(&mut buf, body)?,
        TransactionBody::AggregateComplete(body) => put_aggregate(&mut buf, body)?,
        TransactionBody::MosaicDefinition(body) => put_mosaic_definition(&mut buf, body),
        TransactionBody::MosaicSupplyChange(body) => put_mosaic_supply_change(&mut buf, body),
    }

    let size = checked_u32("size", buf.len())?;
    buf[..4].copy_from_slice(&size.to_le_bytes());
    Ok(buf)
}

/// Encodes `tx` with an all-zero signature, the form that gets signed.
pub fn serialize_unsigned(tx: &Transaction) -> Result<Vec<u8>, EncodeError> {
    serialize(tx, &Signature::zero())
}

/// Writes `signature` into already-encoded record bytes.
pub fn attach_signature(bytes: &mut [u8], signature: &Signature) {
    bytes[SIGNATURE_OFFSET..SIGNATURE_OFFSET + SIGNATURE_LENGTH]
        .copy_from_slice(signature.as_bytes());
}

/// The bytes covered by the signature and the transaction hash.
///
/// Everything from the version byte on, except for aggregates, where only
/// the header tail and the transactions hash are covered. The inner
/// transactions are bound through that hash.
pub fn signing_payload(bytes: &[u8], is_aggregate: bool) -> &[u8] {
    if is_aggregate {
        &bytes[SIGNING_PAYLOAD_OFFSET..SIGNING_PAYLOAD_OFFSET + AGGREGATE_HASHED_SIZE]
    } else {
        &bytes[SIGNING_PAYLOAD_OFFSET..]
    }
}

// ---------------------------------------------------------------------------
// Embedded records
// ---------------------------------------------------------------------------

/// Encodes an embedded transaction without trailing padding.
pub fn serialize_embedded(tx: &EmbeddedTransaction) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::with_capacity(128);
    put_embedded(&mut buf, tx)?;
    Ok(buf)
}

/// Commitment over an ordered list of embedded transactions: a Merkle root
/// of the SHA3-256 of each unpadded record.
pub fn transactions_hash(transactions: &[EmbeddedTransaction]) -> Result<Hash256, EncodeError> {
    let mut builder = MerkleHashBuilder::new();
    for tx in transactions {
        builder.update(Hash256::new(sha3_256(&serialize_embedded(tx)?)));
    }
    Ok(builder.final_hash())
}

/// Bytes needed to bring `size` up to the aggregate alignment.
pub fn padding_size(size: usize) -> usize {
    (AGGREGATE_ALIGNMENT - size % AGGREGATE_ALIGNMENT) % AGGREGATE_ALIGNMENT
}

fn put_embedded(buf: &mut Vec<u8>, tx: &EmbeddedTransaction) -> Result<(), EncodeError> {
    let start = buf.len();
    buf.put_u32_le(0); // size, patched below
    buf.put_u32_le(0);
    buf.put_slice(tx.signer.as_bytes());
    buf.put_u32_le(0);
    put_entity_header(buf, tx.transaction_type(), tx.network);

    match &tx.body {
        EmbeddedBody::Transfer(body) => put_transfer(buf, body)?,
        EmbeddedBody::MosaicDefinition(body) => put_mosaic_definition(buf, body),
        EmbeddedBody::MosaicSupplyChange(body) => put_mosaic_supply_change(buf, body),
        EmbeddedBody::MosaicMetadata(body) => put_mosaic_metadata(buf, body)?,
    }

    let size = checked_u32("size", buf.len() - start)?;
    buf[start..start + 4].copy_from_slice(&size.to_le_bytes());
    Ok(())
}

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

fn put_entity_header(buf: &mut Vec<u8>, kind: TransactionType, network: Network) {
    buf.put_u8(kind.version());
    buf.put_u8(network.identifier());
    buf.put_u16_le(kind.code());
}

fn put_transfer(buf: &mut Vec<u8>, body: &TransferBody) -> Result<(), EncodeError> {
    let message = body.message.encode();
    let message_size = checked_u16("message_size", message.len())?;
    let mosaics_count = checked_u8("mosaics_count", body.mosaics.len())?;

    buf.put_slice(body.recipient.as_bytes());
    buf.put_u16_le(message_size);
    buf.put_u8(mosaics_count);
    buf.put_u32_le(0);
    buf.put_u8(0);
    for mosaic in &body.mosaics {
        buf.put_u64_le(mosaic.mosaic_id.value());
        buf.put_u64_le(mosaic.amount);
    }
    buf.put_slice(&message);
    Ok(())
}

fn put_aggregate(buf: &mut Vec<u8>, body: &AggregateBody) -> Result<(), EncodeError> {
    let mut inner = Vec::new();
    for tx in body.transactions() {
        put_embedded(&mut inner, tx)?;
        let padding = padding_size(inner.len());
        inner.put_bytes(0, padding);
    }

    buf.put_slice(body.transactions_hash().as_bytes());
    buf.put_u32_le(checked_u32("payload_size", inner.len())?);
    buf.put_u32_le(0);
    buf.put_slice(&inner);
    // No cosignatures: every inner transaction shares the outer signer.
    Ok(())
}

fn put_mosaic_definition(buf: &mut Vec<u8>, body: &MosaicDefinitionBody) {
    buf.put_u64_le(body.id.value());
    buf.put_u64_le(body.duration);
    buf.put_u32_le(body.nonce.value());
    buf.put_u8(body.flags.bits());
    buf.put_u8(body.divisibility);
}

fn put_mosaic_supply_change(buf: &mut Vec<u8>, body: &MosaicSupplyChangeBody) {
    buf.put_u64_le(body.mosaic_id.value());
    buf.put_u64_le(body.delta);
    buf.put_u8(body.action.code());
}

fn put_mosaic_metadata(buf: &mut Vec<u8>, body: &MosaicMetadataBody) -> Result<(), EncodeError> {
    let value = body.value.encode();
    let value_size = checked_u16("value_size", value.len())?;

    buf.put_slice(body.target_address.as_bytes());
    buf.put_u64_le(body.scoped_metadata_key);
    buf.put_u64_le(body.target_mosaic_id.value());
    buf.put_i16_le(body.value_size_delta);
    buf.put_u16_le(value_size);
    buf.put_slice(&value);
    Ok(())
}

/// Signer public key stored in encoded record bytes.
pub fn signer_of(bytes: &[u8]) -> Option<PublicKey> {
    let start = SIGNATURE_OFFSET + SIGNATURE_LENGTH;
    let key: [u8; PUBLIC_KEY_LENGTH] = bytes.get(start..start + PUBLIC_KEY_LENGTH)?.try_into().ok()?;
    Some(PublicKey::new(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EMBEDDED_TRANSACTION_HEADER_SIZE, TRANSACTION_HEADER_SIZE};
    use crate::identity::Address;
    use crate::transaction::nonce::MosaicNonce;
    use crate::transaction::types::{
        Deadline, Message, Mosaic, MosaicFlags, MosaicId, MosaicSupplyChangeAction,
    };

    fn signer() -> PublicKey {
        PublicKey::from_hex("C5FB65CB902623D93DF2E682FFB13F99D50FAC24D5FF2A42F68C7CA1772FE8A0")
            .unwrap()
    }

    fn recipient() -> Address {
        "TA3HQR6NPMXK7W6EP3AO6X5S4OSHVBU3ZEWBTNQ".parse().unwrap()
    }

    fn transfer_body(text: &str) -> TransferBody {
        TransferBody {
            recipient: recipient(),
            mosaics: vec![Mosaic::new(0x3A8416DB2D53B6C8, 18_000_000)],
            message: Message::new(text),
        }
    }

    fn outer(body: TransactionBody) -> Transaction {
        Transaction {
            signer: signer(),
            network: Network::Testnet,
            fee: 2_000_000,
            deadline: Deadline::new(24_451_000_000),
            body,
        }
    }

    fn embedded(body: EmbeddedBody) -> EmbeddedTransaction {
        EmbeddedTransaction {
            signer: signer(),
            network: Network::Testnet,
            body,
        }
    }

    #[test]
    fn transfer_layout() {
        let tx = outer(TransactionBody::Transfer(transfer_body("hello symbol")));
        let bytes = serialize_unsigned(&tx).unwrap();

        // header + recipient/sizes/reserved + one mosaic + marker + text
        assert_eq!(bytes.len(), TRANSACTION_HEADER_SIZE + 32 + 16 + 13);
        assert_eq!(u32::from_le_bytes(bytes[0..4].try_into().unwrap()) as usize, bytes.len());
        assert_eq!(&bytes[8..72], &[0u8; 64][..]);
        assert_eq!(&bytes[72..104], signer().as_bytes());
        assert_eq!(bytes[108], 1); // version
        assert_eq!(bytes[109], 0x98); // testnet
        assert_eq!(&bytes[110..112], &0x4154u16.to_le_bytes());
        assert_eq!(&bytes[112..120], &2_000_000u64.to_le_bytes());
        assert_eq!(&bytes[120..128], &24_451_000_000u64.to_le_bytes());

        let body = &bytes[TRANSACTION_HEADER_SIZE..];
        assert_eq!(&body[..24], recipient().as_bytes());
        assert_eq!(u16::from_le_bytes([body[24], body[25]]), 13);
        assert_eq!(body[26], 1);
        assert_eq!(&body[27..32], &[0u8; 5]);
        assert_eq!(&body[32..40], &0x3A8416DB2D53B6C8u64.to_le_bytes());
        assert_eq!(&body[40..48], &18_000_000u64.to_le_bytes());
        assert_eq!(body[48], 0x00);
        assert_eq!(&body[49..], b"hello symbol");
    }

    #[test]
    fn mosaics_keep_caller_order() {
        let mut body = transfer_body("");
        body.mosaics = vec![Mosaic::new(0xFF, 1), Mosaic::new(0x01, 2)];
        let bytes = serialize_unsigned(&outer(TransactionBody::Transfer(body))).unwrap();
        let mosaics = &bytes[TRANSACTION_HEADER_SIZE + 32..];
        assert_eq!(&mosaics[0..8], &0xFFu64.to_le_bytes());
        assert_eq!(&mosaics[16..24], &0x01u64.to_le_bytes());
    }

    #[test]
    fn mosaic_definition_layout() {
        let tx = outer(TransactionBody::MosaicDefinition(MosaicDefinitionBody {
            id: MosaicId(0x1B31FC922AC3D3BB),
            duration: 1000,
            nonce: MosaicNonce(0),
            flags: MosaicFlags::TRANSFERABLE | MosaicFlags::SUPPLY_MUTABLE,
            divisibility: 6,
        }));
        let bytes = serialize_unsigned(&tx).unwrap();
        assert_eq!(bytes.len(), TRANSACTION_HEADER_SIZE + 22);
        assert_eq!(&bytes[110..112], &0x414Du16.to_le_bytes());

        let body = &bytes[TRANSACTION_HEADER_SIZE..];
        assert_eq!(&body[0..8], &0x1B31FC922AC3D3BBu64.to_le_bytes());
        assert_eq!(&body[8..16], &1000u64.to_le_bytes());
        assert_eq!(&body[16..20], &[0u8; 4]);
        assert_eq!(body[20], 0x03);
        assert_eq!(body[21], 6);
    }

    #[test]
    fn mosaic_supply_change_layout() {
        let tx = outer(TransactionBody::MosaicSupplyChange(MosaicSupplyChangeBody {
            mosaic_id: MosaicId(0x251208ED3D0ABC84),
            delta: 1000,
            action: MosaicSupplyChangeAction::Increase,
        }));
        let bytes = serialize_unsigned(&tx).unwrap();
        assert_eq!(bytes.len(), TRANSACTION_HEADER_SIZE + 17);
        assert_eq!(&bytes[110..112], &0x424Du16.to_le_bytes());
        assert_eq!(bytes[bytes.len() - 1], 1);
    }

    #[test]
    fn embedded_metadata_layout() {
        let tx = embedded(EmbeddedBody::MosaicMetadata(MosaicMetadataBody {
            target_address: recipient(),
            scoped_metadata_key: 0xAD6D8491D21180E5,
            target_mosaic_id: MosaicId(0x251208ED3D0ABC84),
            value_size_delta: 6,
            value: Message::new("value"),
        }));
        let bytes = serialize_embedded(&tx).unwrap();
        assert_eq!(bytes.len(), EMBEDDED_TRANSACTION_HEADER_SIZE + 24 + 8 + 8 + 2 + 2 + 6);
        assert_eq!(u32::from_le_bytes(bytes[0..4].try_into().unwrap()) as usize, bytes.len());
        assert_eq!(&bytes[8..40], signer().as_bytes());
        assert_eq!(bytes[44], 1);
        assert_eq!(bytes[45], 0x98);
        assert_eq!(&bytes[46..48], &0x4244u16.to_le_bytes());

        let body = &bytes[EMBEDDED_TRANSACTION_HEADER_SIZE..];
        assert_eq!(&body[32..40], &0x251208ED3D0ABC84u64.to_le_bytes());
        assert_eq!(i16::from_le_bytes([body[40], body[41]]), 6);
        assert_eq!(u16::from_le_bytes([body[42], body[43]]), 6);
        assert_eq!(&body[44..], b"\x00value");
    }

    #[test]
    fn aggregate_pads_inner_records() {
        let inner = vec![
            embedded(EmbeddedBody::Transfer(transfer_body("a"))),
            embedded(EmbeddedBody::Transfer(transfer_body("bc"))),
        ];
        let first_len = serialize_embedded(&inner[0]).unwrap().len();
        let second_len = serialize_embedded(&inner[1]).unwrap().len();
        assert_eq!(first_len, 48 + 32 + 16 + 2);

        let tx = outer(TransactionBody::AggregateComplete(AggregateBody::new(inner).unwrap()));
        let bytes = serialize_unsigned(&tx).unwrap();
        assert_eq!(bytes[108], 2); // aggregate version
        assert_eq!(&bytes[110..112], &0x4141u16.to_le_bytes());

        let payload_size = u32::from_le_bytes(bytes[160..164].try_into().unwrap()) as usize;
        let expected = first_len + padding_size(first_len) + second_len + padding_size(second_len);
        assert_eq!(payload_size, expected);
        assert_eq!(payload_size % 8, 0);
        assert_eq!(bytes.len(), TRANSACTION_HEADER_SIZE + 32 + 8 + payload_size);

        // Padding after the first record is zero and the second starts aligned.
        let first_start = TRANSACTION_HEADER_SIZE + 40;
        let second_start = first_start + first_len + padding_size(first_len);
        assert!(bytes[first_start + first_len..second_start].iter().all(|b| *b == 0));
        assert_eq!(
            u32::from_le_bytes(bytes[second_start..second_start + 4].try_into().unwrap()) as usize,
            second_len
        );
    }

    #[test]
    fn padding_sizes() {
        assert_eq!(padding_size(0), 0);
        assert_eq!(padding_size(8), 0);
        assert_eq!(padding_size(98), 6);
        assert_eq!(padding_size(99), 5);
        assert_eq!(padding_size(103), 1);
    }

    #[test]
    fn signing_payload_ranges() {
        let transfer =
            serialize_unsigned(&outer(TransactionBody::Transfer(transfer_body("x")))).unwrap();
        assert_eq!(signing_payload(&transfer, false), &transfer[108..]);

        let aggregate = serialize_unsigned(&outer(TransactionBody::AggregateComplete(
            AggregateBody::new(vec![embedded(EmbeddedBody::Transfer(transfer_body("x")))]).unwrap(),
        )))
        .unwrap();
        let payload = signing_payload(&aggregate, true);
        assert_eq!(payload.len(), 52);
        assert_eq!(&payload[20..], &aggregate[128..160]);
    }

    #[test]
    fn transactions_hash_is_order_sensitive() {
        let a = embedded(EmbeddedBody::Transfer(transfer_body("first")));
        let b = embedded(EmbeddedBody::Transfer(transfer_body("second")));
        let forward = transactions_hash(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(forward, transactions_hash(&[a.clone(), b.clone()]).unwrap());
        assert_ne!(forward, transactions_hash(&[b, a.clone()]).unwrap());

        // A single leaf is its own root.
        assert_eq!(
            transactions_hash(std::slice::from_ref(&a)).unwrap(),
            Hash256::new(sha3_256(&serialize_embedded(&a).unwrap()))
        );
    }

    #[test]
    fn attach_signature_and_signer_lookup() {
        let mut bytes =
            serialize_unsigned(&outer(TransactionBody::Transfer(transfer_body("x")))).unwrap();
        let signature = Signature::new([0xAB; 64]);
        attach_signature(&mut bytes, &signature);
        assert_eq!(&bytes[8..72], signature.as_bytes());
        assert_eq!(signer_of(&bytes), Some(signer()));
        assert_eq!(signer_of(&bytes[..50]), None);
    }

    #[test]
    fn oversized_message_is_refused() {
        let max = transfer_body(&"m".repeat(u16::MAX as usize - 1));
        let bytes = serialize_unsigned(&outer(TransactionBody::Transfer(max))).unwrap();
        let body = &bytes[TRANSACTION_HEADER_SIZE..];
        assert_eq!(u16::from_le_bytes([body[24], body[25]]), u16::MAX);

        let tx = outer(TransactionBody::Transfer(transfer_body(&"m".repeat(70_000))));
        assert_eq!(
            serialize_unsigned(&tx),
            Err(EncodeError::FieldOverflow {
                field: "message_size",
                len: 70_001,
                max: u16::MAX as usize,
            })
        );
    }

    #[test]
    fn too_many_mosaics_are_refused() {
        let mut body = transfer_body("");
        body.mosaics = (0..256u64).map(|id| Mosaic::new(id, 1)).collect();
        let err = serialize_unsigned(&outer(TransactionBody::Transfer(body.clone()))).unwrap_err();
        assert_eq!(
            err,
            EncodeError::FieldOverflow {
                field: "mosaics_count",
                len: 256,
                max: u8::MAX as usize,
            }
        );

        // The same limit applies inside an aggregate.
        let inner = embedded(EmbeddedBody::Transfer(body.clone()));
        assert!(transactions_hash(&[inner]).is_err());

        body.mosaics.truncate(255);
        let bytes = serialize_unsigned(&outer(TransactionBody::Transfer(body))).unwrap();
        assert_eq!(bytes[TRANSACTION_HEADER_SIZE + 26], 255);
    }

    #[test]
    fn oversized_metadata_value_is_refused() {
        let tx = embedded(EmbeddedBody::MosaicMetadata(MosaicMetadataBody {
            target_address: recipient(),
            scoped_metadata_key: 1,
            target_mosaic_id: MosaicId(2),
            value_size_delta: 0,
            value: Message::new("v".repeat(u16::MAX as usize)),
        }));
        assert!(matches!(
            serialize_embedded(&tx),
            Err(EncodeError::FieldOverflow { field: "value_size", len: 65_536, .. })
        ));
    }
}
