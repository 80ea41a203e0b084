use crate::serializer::{Reader, ReaderError, Serializer, Writer};
use serde::de::Error as SerdeError;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::{
    convert::TryInto,
    fmt::{Display, Error, Formatter},
    str::FromStr,
};

pub const ADDRESS_SIZE: usize = 20;

/// Account identifier: the low 20 bytes of the Keccak-256 digest of the
/// holder's uncompressed secp256k1 public key. The all-zero value is
/// reserved and never a valid transfer participant.
#[derive(Eq, PartialEq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct Address([u8; ADDRESS_SIZE]);

impl Address {
    pub const fn new(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Address(bytes)
    }

    pub const fn zero() -> Self {
        Address::new([0; ADDRESS_SIZE])
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; ADDRESS_SIZE]
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Derive the address of a secp256k1 verifying key
    pub fn from_verifying_key(key: &k256::ecdsa::VerifyingKey) -> Self {
        let encoded = key.to_encoded_point(false);
        // Skip the 0x04 uncompressed-point prefix
        let digest = keccak256(&encoded.as_bytes()[1..]);
        let mut bytes = [0u8; ADDRESS_SIZE];
        bytes.copy_from_slice(&digest[12..]);
        Address(bytes)
    }
}

/// Keccak-256 digest, the hash of the typed-data signing scheme
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&result);
    out
}

impl FromStr for Address {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| "Invalid hex string")?;
        let bytes: [u8; ADDRESS_SIZE] = bytes.try_into().map_err(|_| "Invalid address")?;
        Ok(Address::new(bytes))
    }
}

impl Serializer for Address {
    fn write(&self, writer: &mut Writer) {
        writer.write_bytes(&self.0);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Address::new(reader.read_bytes_20()?))
    }

    fn size(&self) -> usize {
        ADDRESS_SIZE
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", &self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'a> Deserialize<'a> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        let hex = String::deserialize(deserializer)?;
        Address::from_str(&hex).map_err(SerdeError::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_reserved() {
        assert!(Address::zero().is_zero());
        assert!(!Address::new([1; ADDRESS_SIZE]).is_zero());
    }

    #[test]
    fn test_hex_roundtrip() {
        let addr = Address::new([0xAB; ADDRESS_SIZE]);
        assert_eq!(Address::from_str(&addr.to_hex()).unwrap(), addr);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let key = k256::ecdsa::SigningKey::from_slice(&[7u8; 32]).unwrap();
        let a = Address::from_verifying_key(key.verifying_key());
        let b = Address::from_verifying_key(key.verifying_key());
        assert_eq!(a, b);
        assert!(!a.is_zero());
    }
}
