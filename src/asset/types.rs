//! Fungible Ledger Types
//!
//! Core data structures for the partitioned token ledger.

use crate::asset::constants::{MAX_DECIMALS, MAX_NAME_LENGTH, MAX_SYMBOL_LENGTH};
use crate::asset::error::AssetError;
use crate::crypto::Hash;
use crate::serializer::{Reader, ReaderError, Serializer, Writer};
use serde::de::Error as SerdeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Token quantity. `Amount::MAX` is the infinite-allowance sentinel and
/// is never decremented on spend.
pub type Amount = primitive_types::U256;

pub const PARTITION_SIZE: usize = 32;

// ===== Partition =====

/// Opaque 32-byte partition identifier.
///
/// The reserved zero value is the default partition for un-tranched
/// balances: always valid, never registered. Every other partition comes
/// into existence on first issuance into it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Partition([u8; PARTITION_SIZE]);

impl Partition {
    /// The default (un-tranched) partition
    pub const DEFAULT: Partition = Partition([0; PARTITION_SIZE]);

    pub const fn new(bytes: [u8; PARTITION_SIZE]) -> Self {
        Partition(bytes)
    }

    /// Build a partition id from a short ASCII label, zero-padded.
    /// Labels longer than 32 bytes are truncated.
    pub fn named(label: &str) -> Self {
        let mut bytes = [0u8; PARTITION_SIZE];
        let raw = label.as_bytes();
        let len = raw.len().min(PARTITION_SIZE);
        bytes[..len].copy_from_slice(&raw[..len]);
        Partition(bytes)
    }

    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }

    pub fn as_bytes(&self) -> &[u8; PARTITION_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Partition {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| "Invalid hex string")?;
        let bytes: [u8; PARTITION_SIZE] =
            bytes.try_into().map_err(|_| "Invalid partition")?;
        Ok(Partition::new(bytes))
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serializer for Partition {
    fn write(&self, writer: &mut Writer) {
        writer.write_bytes(&self.0);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Partition::new(reader.read_bytes_32()?))
    }

    fn size(&self) -> usize {
        PARTITION_SIZE
    }
}

impl Serialize for Partition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'a> Deserialize<'a> for Partition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        let hex = String::deserialize(deserializer)?;
        Partition::from_str(&hex).map_err(SerdeError::custom)
    }
}

// ===== Token Metadata =====

/// Token-level metadata and one-way capability flags
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssetMetadata {
    /// Token name
    pub name: String,
    /// Token symbol/ticker
    pub symbol: String,
    /// Decimal places (0-18)
    pub decimals: u8,
    /// Whether new tokens can still be issued; flips to false once,
    /// irreversibly
    pub issuable: bool,
    /// Whether controller overrides are still enabled; flips to false
    /// once, irreversibly
    pub controllable: bool,
}

impl AssetMetadata {
    /// Validate name/symbol/decimal limits
    pub fn validate(&self) -> Result<(), AssetError> {
        if self.name.len() > MAX_NAME_LENGTH {
            return Err(AssetError::NameTooLong);
        }
        if self.symbol.len() > MAX_SYMBOL_LENGTH {
            return Err(AssetError::SymbolTooLong);
        }
        if self.decimals > MAX_DECIMALS {
            return Err(AssetError::DecimalsTooHigh);
        }
        Ok(())
    }
}

impl Default for AssetMetadata {
    fn default() -> Self {
        Self {
            name: String::new(),
            symbol: String::new(),
            decimals: 18,
            issuable: true,
            controllable: true,
        }
    }
}

impl Serializer for AssetMetadata {
    fn write(&self, writer: &mut Writer) {
        self.name.write(writer);
        self.symbol.write(writer);
        self.decimals.write(writer);
        self.issuable.write(writer);
        self.controllable.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            name: reader.read()?,
            symbol: reader.read()?,
            decimals: reader.read()?,
            issuable: reader.read()?,
            controllable: reader.read()?,
        })
    }

    fn size(&self) -> usize {
        self.name.size() + self.symbol.size() + 1 + 1 + 1
    }
}

// ===== Document =====

/// Document record attached to the token (name-keyed)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Content hash of the document
    pub hash: Hash,
    /// Off-ledger location of the document
    pub uri: String,
    /// Timestamp (seconds) of the last update
    pub last_modified: u64,
}

impl Serializer for Document {
    fn write(&self, writer: &mut Writer) {
        self.hash.write(writer);
        self.uri.write(writer);
        self.last_modified.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            hash: reader.read()?,
            uri: reader.read()?,
            last_modified: reader.read()?,
        })
    }

    fn size(&self) -> usize {
        self.hash.size() + self.uri.size() + 8
    }
}

impl Serializer for Amount {
    fn write(&self, writer: &mut Writer) {
        writer.write_bytes(&self.to_big_endian());
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Amount::from_big_endian(&reader.read_bytes_32()?))
    }

    fn size(&self) -> usize {
        32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_partition_is_zero() {
        assert!(Partition::DEFAULT.is_default());
        assert_eq!(Partition::DEFAULT.as_bytes(), &[0u8; PARTITION_SIZE]);
        assert!(!Partition::named("SHARED").is_default());
    }

    #[test]
    fn test_named_partition_is_stable() {
        assert_eq!(Partition::named("SHARED"), Partition::named("SHARED"));
        assert_ne!(Partition::named("SHARED"), Partition::named("LOCKED"));
    }

    #[test]
    fn test_metadata_validation() {
        let mut metadata = AssetMetadata {
            name: "Security Token".to_string(),
            symbol: "SEC".to_string(),
            decimals: 18,
            issuable: true,
            controllable: true,
        };
        assert!(metadata.validate().is_ok());

        metadata.decimals = 19;
        assert_eq!(metadata.validate(), Err(AssetError::DecimalsTooHigh));
    }

    #[test]
    fn test_amount_serializer_roundtrip() {
        let amount = Amount::from(98_000_000u64) * Amount::from(10u64).pow(Amount::from(18u64));
        let bytes = Serializer::to_bytes(&amount);
        assert_eq!(bytes.len(), 32);
        assert_eq!(Amount::from_bytes(&bytes).unwrap(), amount);
    }

    #[test]
    fn test_document_roundtrip() {
        let doc = Document {
            hash: crate::crypto::hash(b"prospectus v1"),
            uri: "https://example.com/prospectus.pdf".to_string(),
            last_modified: 1_700_000_000,
        };
        assert_eq!(Document::from_bytes(&doc.to_bytes()).unwrap(), doc);
    }
}
