// Partitioned NFT Ledger - Core Types

use crate::asset::constants::{MAX_NAME_LENGTH, MAX_SYMBOL_LENGTH};
use crate::asset::types::Partition;
use crate::crypto::Address;
use crate::nft::error::NftError;
use crate::serializer::{Reader, ReaderError, Serializer, Writer};
use serde::{Deserialize, Serialize};

// ========================================
// Protocol Constants
// ========================================

/// Maximum token URI length (bytes)
pub const MAX_TOKEN_URI_LENGTH: usize = 512;

// ========================================
// Token Metadata
// ========================================

/// Ledger-level metadata and one-way capability flags
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NftMetadata {
    /// Token name
    pub name: String,
    /// Symbol/ticker
    pub symbol: String,
    /// Whether new tokens can still be issued; one-way flip
    pub issuable: bool,
    /// Whether controller overrides are enabled; one-way flip
    pub controllable: bool,
}

impl NftMetadata {
    pub fn validate(&self) -> Result<(), NftError> {
        if self.name.len() > MAX_NAME_LENGTH {
            return Err(NftError::NameTooLong);
        }
        if self.symbol.len() > MAX_SYMBOL_LENGTH {
            return Err(NftError::SymbolTooLong);
        }
        Ok(())
    }
}

impl Default for NftMetadata {
    fn default() -> Self {
        Self {
            name: String::new(),
            symbol: String::new(),
            issuable: true,
            controllable: true,
        }
    }
}

impl Serializer for NftMetadata {
    fn write(&self, writer: &mut Writer) {
        self.name.write(writer);
        self.symbol.write(writer);
        self.issuable.write(writer);
        self.controllable.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            name: reader.read()?,
            symbol: reader.read()?,
            issuable: reader.read()?,
            controllable: reader.read()?,
        })
    }

    fn size(&self) -> usize {
        self.name.size() + self.symbol.size() + 1 + 1
    }
}

// ========================================
// Token Record
// ========================================

/// One discrete token: its owner and the partition it was issued into.
/// The partition is fixed at issuance and changes only through the
/// explicit partition-change operation, never through transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionedNft {
    /// Token identifier (non-zero)
    pub token_id: u64,
    /// Current owner
    pub owner: Address,
    /// Partition the token belongs to
    pub partition: Partition,
    /// Optional metadata URI
    pub uri: Option<String>,
}

impl PartitionedNft {
    pub fn validate(&self) -> Result<(), NftError> {
        if self.token_id == 0 {
            return Err(NftError::InvalidTokenId);
        }
        if let Some(uri) = &self.uri {
            if uri.len() > MAX_TOKEN_URI_LENGTH {
                return Err(NftError::UriTooLong);
            }
        }
        Ok(())
    }
}

impl Serializer for PartitionedNft {
    fn write(&self, writer: &mut Writer) {
        self.token_id.write(writer);
        self.owner.write(writer);
        self.partition.write(writer);
        self.uri.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            token_id: reader.read()?,
            owner: reader.read()?,
            partition: reader.read()?,
            uri: reader.read()?,
        })
    }

    fn size(&self) -> usize {
        8 + self.owner.size() + self.partition.size() + self.uri.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_token_id_invalid() {
        let nft = PartitionedNft {
            token_id: 0,
            owner: Address::new([1; 20]),
            partition: Partition::DEFAULT,
            uri: None,
        };
        assert_eq!(nft.validate(), Err(NftError::InvalidTokenId));
    }

    #[test]
    fn test_token_roundtrip() {
        let nft = PartitionedNft {
            token_id: 7,
            owner: Address::new([1; 20]),
            partition: Partition::named("SERIES-A"),
            uri: Some("ipfs://meta/7".to_string()),
        };
        assert!(nft.validate().is_ok());
        assert_eq!(PartitionedNft::from_bytes(&nft.to_bytes()).unwrap(), nft);
    }
}
