//! Core value types for ledger transactions.
//!
//! Small, `Copy`-friendly building blocks shared by the records in
//! [`super::model`]. Wire widths are fixed here; the codec only has to lay
//! the values out in order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use crate::config::PLAIN_TEXT_MARKER;

/// Atomic units of a mosaic.
pub type Amount = u64;

/// A duration measured in blocks. Zero means "never expires".
pub type BlockDuration = u64;

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// The transaction kinds this core can build, with their wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Transfer,
    AggregateComplete,
    MosaicDefinition,
    MosaicSupplyChange,
    MosaicMetadata,
}

impl TransactionType {
    /// The 16-bit type code in the header.
    pub fn code(self) -> u16 {
        match self {
            Self::Transfer => 0x4154,
            Self::AggregateComplete => 0x4141,
            Self::MosaicDefinition => 0x414D,
            Self::MosaicSupplyChange => 0x424D,
            Self::MosaicMetadata => 0x4244,
        }
    }

    /// The record layout version the network expects for this kind.
    pub fn version(self) -> u8 {
        match self {
            Self::AggregateComplete => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transfer => write!(f, "Transfer"),
            Self::AggregateComplete => write!(f, "AggregateComplete"),
            Self::MosaicDefinition => write!(f, "MosaicDefinition"),
            Self::MosaicSupplyChange => write!(f, "MosaicSupplyChange"),
            Self::MosaicMetadata => write!(f, "MosaicMetadata"),
        }
    }
}

// ---------------------------------------------------------------------------
// MosaicId / Mosaic
// ---------------------------------------------------------------------------

/// A 64-bit mosaic identifier. Shown as 16 upper-case hex digits, the way
/// explorers and the REST API print it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MosaicId(pub u64);

impl MosaicId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for MosaicId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for MosaicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016X}", self.0)
    }
}

impl fmt::Debug for MosaicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MosaicId({:016X})", self.0)
    }
}

impl FromStr for MosaicId {
    type Err = std::num::ParseIntError;

    /// Parses hex with or without a `0x` prefix. Stray `'` characters (the
    /// REST API quotes ids like `0x3A84'16DB'2D53'B6C8`) are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s.trim().chars().filter(|c| *c != '\'').collect();
        let digits = cleaned
            .strip_prefix("0x")
            .or_else(|| cleaned.strip_prefix("0X"))
            .unwrap_or(&cleaned);
        u64::from_str_radix(digits, 16).map(Self)
    }
}

/// An amount of one mosaic, as attached to a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mosaic {
    pub mosaic_id: MosaicId,
    pub amount: Amount,
}

impl Mosaic {
    pub fn new(mosaic_id: impl Into<MosaicId>, amount: Amount) -> Self {
        Self {
            mosaic_id: mosaic_id.into(),
            amount,
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A plain-text payload.
///
/// On the wire the UTF-8 text is always preceded by one `0x00` marker byte;
/// explorers and wallets only render messages that start with it. The same
/// encoding is used for metadata values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Message(String);

impl Message {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    /// Marker byte followed by the UTF-8 text.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(1 + self.0.len());
        bytes.push(PLAIN_TEXT_MARKER);
        bytes.extend_from_slice(self.0.as_bytes());
        bytes
    }

    /// Length of [`Message::encode`]'s output.
    pub fn encoded_len(&self) -> usize {
        1 + self.0.len()
    }

    /// Reverses [`Message::encode`]. `None` if the marker is missing or the
    /// rest is not UTF-8.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        match bytes.split_first() {
            Some((&PLAIN_TEXT_MARKER, rest)) => {
                std::str::from_utf8(rest).ok().map(|s| Self(s.to_string()))
            }
            _ => None,
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// MosaicFlags
// ---------------------------------------------------------------------------

/// Mosaic property bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MosaicFlags(u8);

impl MosaicFlags {
    pub const NONE: Self = Self(0x00);
    /// The creator may later change the total supply.
    pub const SUPPLY_MUTABLE: Self = Self(0x01);
    /// Holders other than the creator may transfer it.
    pub const TRANSFERABLE: Self = Self(0x02);
    /// Mosaic restrictions may be applied.
    pub const RESTRICTABLE: Self = Self(0x04);
    /// The creator may recall it from holders.
    pub const REVOKABLE: Self = Self(0x08);

    /// Builds the set from four independent switches.
    pub fn from_options(
        transferable: bool,
        supply_mutable: bool,
        restrictable: bool,
        revokable: bool,
    ) -> Self {
        [
            (transferable, Self::TRANSFERABLE),
            (supply_mutable, Self::SUPPLY_MUTABLE),
            (restrictable, Self::RESTRICTABLE),
            (revokable, Self::REVOKABLE),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .fold(Self::NONE, |acc, (_, flag)| acc | flag)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for MosaicFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

// ---------------------------------------------------------------------------
// MosaicSupplyChangeAction
// ---------------------------------------------------------------------------

/// Direction of a supply change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MosaicSupplyChangeAction {
    Decrease = 0,
    Increase = 1,
}

impl MosaicSupplyChangeAction {
    pub fn code(self) -> u8 {
        self as u8
    }
}

// ---------------------------------------------------------------------------
// Deadline
// ---------------------------------------------------------------------------

/// Latest network time, in milliseconds since the network epoch, at which
/// the transaction may still be included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Deadline(u64);

impl Deadline {
    pub fn new(millis: u64) -> Self {
        Self(millis)
    }

    /// `(now + expiration_hours - epoch_adjustment) * 1000`, all in seconds
    /// before the final scaling. Clamps at zero for clocks set before the
    /// network epoch.
    pub fn compute(now_seconds: i64, expiration_hours: u32, epoch_adjustment: u32) -> Self {
        let seconds = now_seconds + i64::from(expiration_hours) * 3600 - i64::from(epoch_adjustment);
        Self(seconds.max(0) as u64 * 1000)
    }

    /// [`Deadline::compute`] against the system clock.
    pub fn from_now(expiration_hours: u32, epoch_adjustment: u32) -> Self {
        Self::compute(
            chrono::Utc::now().timestamp(),
            expiration_hours,
            epoch_adjustment,
        )
    }

    pub fn millis(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPOCH_ADJUSTMENT: u32 = 1_637_848_847;

    #[test]
    fn type_codes_and_versions() {
        assert_eq!(TransactionType::Transfer.code(), 0x4154);
        assert_eq!(TransactionType::AggregateComplete.code(), 0x4141);
        assert_eq!(TransactionType::MosaicDefinition.code(), 0x414D);
        assert_eq!(TransactionType::MosaicSupplyChange.code(), 0x424D);
        assert_eq!(TransactionType::MosaicMetadata.code(), 0x4244);
        assert_eq!(TransactionType::AggregateComplete.version(), 2);
        assert_eq!(TransactionType::Transfer.version(), 1);
    }

    #[test]
    fn deadline_formula() {
        let now = 1_700_000_000;
        let deadline = Deadline::compute(now, 2, EPOCH_ADJUSTMENT);
        assert_eq!(
            deadline.millis(),
            (1_700_000_000 + 7200 - 1_637_848_847) * 1000
        );
    }

    #[test]
    fn deadline_increases_with_clock() {
        let earlier = Deadline::compute(1_700_000_000, 2, EPOCH_ADJUSTMENT);
        let later = Deadline::compute(1_700_000_001, 2, EPOCH_ADJUSTMENT);
        assert!(later > earlier);
        assert_eq!(later.millis() - earlier.millis(), 1000);
    }

    #[test]
    fn deadline_zero_hours_is_now() {
        let deadline = Deadline::compute(1_700_000_000, 0, EPOCH_ADJUSTMENT);
        assert_eq!(deadline.millis(), (1_700_000_000 - 1_637_848_847) * 1000);
    }

    #[test]
    fn deadline_clamps_before_epoch() {
        assert_eq!(Deadline::compute(0, 0, EPOCH_ADJUSTMENT).millis(), 0);
    }

    #[test]
    fn message_encoding_has_marker() {
        let message = Message::new("hello symbol");
        let encoded = message.encode();
        assert_eq!(encoded[0], 0x00);
        assert_eq!(&encoded[1..], b"hello symbol");
        assert_eq!(encoded.len(), message.encoded_len());
        assert_eq!(Message::decode(&encoded), Some(message));
    }

    #[test]
    fn message_encoding_multibyte_and_empty() {
        let message = Message::new("こんにちは");
        assert_eq!(message.encoded_len(), 1 + 15);
        assert_eq!(Message::decode(&message.encode()).unwrap().text(), "こんにちは");

        assert_eq!(Message::default().encode(), vec![0x00]);
    }

    #[test]
    fn message_decode_rejects_missing_marker() {
        assert_eq!(Message::decode(b"hello"), None);
        assert_eq!(Message::decode(&[]), None);
        assert_eq!(Message::decode(&[0x00, 0xFF]), None);
    }

    #[test]
    fn flags_from_options() {
        assert_eq!(MosaicFlags::from_options(false, false, false, false).bits(), 0);
        assert_eq!(MosaicFlags::from_options(true, false, false, false).bits(), 0x02);
        assert_eq!(MosaicFlags::from_options(false, true, false, false).bits(), 0x01);
        assert_eq!(MosaicFlags::from_options(false, false, true, false).bits(), 0x04);
        assert_eq!(MosaicFlags::from_options(false, false, false, true).bits(), 0x08);
        assert_eq!(MosaicFlags::from_options(true, true, true, true).bits(), 0x0F);
    }

    #[test]
    fn flags_are_independent() {
        let flags = MosaicFlags::from_options(true, false, false, true);
        assert!(flags.contains(MosaicFlags::TRANSFERABLE));
        assert!(flags.contains(MosaicFlags::REVOKABLE));
        assert!(!flags.contains(MosaicFlags::SUPPLY_MUTABLE));
        assert!(!flags.contains(MosaicFlags::RESTRICTABLE));
        assert!(MosaicFlags::NONE.is_empty());
    }

    #[test]
    fn mosaic_id_display_and_parse() {
        let id = MosaicId(0x3A8416DB2D53B6C8);
        assert_eq!(id.to_string(), "3A8416DB2D53B6C8");
        assert_eq!("3A8416DB2D53B6C8".parse::<MosaicId>().unwrap(), id);
        assert_eq!("0x3A84'16DB'2D53'B6C8".parse::<MosaicId>().unwrap(), id);
        assert!("not hex".parse::<MosaicId>().is_err());
    }

    #[test]
    fn supply_change_action_codes() {
        assert_eq!(MosaicSupplyChangeAction::Decrease.code(), 0);
        assert_eq!(MosaicSupplyChangeAction::Increase.code(), 1);
    }
}
