use crate::crypto::{keccak256, Address};
use serde::{Deserialize, Serialize};

lazy_static::lazy_static! {
    /// keccak256 of the domain type layout; field order is part of the
    /// wire format and must never change
    pub static ref DOMAIN_TYPEHASH: [u8; 32] = keccak256(
        b"SigningDomain(string name,string version,uint256 chainId,address verifyingContract)"
    );
}

/// Domain separator inputs for typed-data signatures.
///
/// Binds every signature to one token deployment: same message signed
/// for a different token name, version, chain or contract identity
/// recovers a different (unauthorized) signer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningDomain {
    /// Token name
    pub name: String,
    /// Protocol version string
    pub version: String,
    /// Chain identifier
    pub chain_id: u64,
    /// The ledger's own identity
    pub verifying_contract: Address,
}

impl SigningDomain {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            chain_id,
            verifying_contract,
        }
    }

    /// Compute the 32-byte domain separator
    pub fn separator(&self) -> [u8; 32] {
        let mut data = Vec::with_capacity(5 * 32);
        data.extend_from_slice(&*DOMAIN_TYPEHASH);
        data.extend_from_slice(&keccak256(self.name.as_bytes()));
        data.extend_from_slice(&keccak256(self.version.as_bytes()));
        data.extend_from_slice(&u64_word(self.chain_id));
        data.extend_from_slice(&address_word(&self.verifying_contract));
        keccak256(&data)
    }
}

/// Left-pad a u64 into a 32-byte big-endian word
pub(crate) fn u64_word(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Left-pad a 20-byte address into a 32-byte word
pub(crate) fn address_word(address: &Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    word
}
