//! Compact binary serialization framework.
//!
//! Every wire payload in the ledger goes through the `Serializer` trait:
//! fixed-width big-endian integers, length-prefixed strings and byte
//! vectors, and a one-byte tag for `Option`. Decoding is strict: any
//! trailing truncation or out-of-range tag is a `ReaderError`, never a
//! silent default.

use thiserror::Error;

/// Error raised while decoding a binary payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReaderError {
    #[error("Not enough bytes in payload")]
    InvalidSize,

    #[error("Invalid value in payload")]
    InvalidValue,
}

/// Incremental reader over a borrowed byte slice
pub struct Reader<'a> {
    bytes: &'a [u8],
    total: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            total: bytes.len(),
        }
    }

    /// Read any `Serializer` type from the current position
    pub fn read<T: Serializer>(&mut self) -> Result<T, ReaderError> {
        T::read(self)
    }

    /// Read exactly `n` raw bytes
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], ReaderError> {
        if self.bytes.len() < n {
            return Err(ReaderError::InvalidSize);
        }
        let (taken, rest) = self.bytes.split_at(n);
        self.bytes = rest;
        Ok(taken)
    }

    /// Read a fixed 32-byte array
    pub fn read_bytes_32(&mut self) -> Result<[u8; 32], ReaderError> {
        let bytes = self.read_bytes(32)?;
        let mut out = [0u8; 32];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Read a fixed 20-byte array
    pub fn read_bytes_20(&mut self) -> Result<[u8; 20], ReaderError> {
        let bytes = self.read_bytes(20)?;
        let mut out = [0u8; 20];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.bytes.len()
    }

    /// Total size of the underlying payload
    pub fn total_size(&self) -> usize {
        self.total
    }
}

/// Incremental writer accumulating a byte vector
#[derive(Default)]
pub struct Writer {
    bytes: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Binary wire format for a type
pub trait Serializer: Sized {
    fn write(&self, writer: &mut Writer);

    fn read(reader: &mut Reader) -> Result<Self, ReaderError>;

    /// Exact encoded size in bytes
    fn size(&self) -> usize;

    fn to_bytes(&self) -> Vec<u8> {
        let mut writer = Writer::with_capacity(self.size());
        self.write(&mut writer);
        writer.bytes()
    }

    /// Decode a value consuming the whole payload; trailing bytes are an error
    fn from_bytes(bytes: &[u8]) -> Result<Self, ReaderError> {
        let mut reader = Reader::new(bytes);
        let value = Self::read(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(ReaderError::InvalidSize);
        }
        Ok(value)
    }
}

macro_rules! impl_serializer_for_int {
    ($t:ty, $n:expr) => {
        impl Serializer for $t {
            fn write(&self, writer: &mut Writer) {
                writer.write_bytes(&self.to_be_bytes());
            }

            fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
                let bytes = reader.read_bytes($n)?;
                let mut buf = [0u8; $n];
                buf.copy_from_slice(bytes);
                Ok(<$t>::from_be_bytes(buf))
            }

            fn size(&self) -> usize {
                $n
            }
        }
    };
}

impl_serializer_for_int!(u8, 1);
impl_serializer_for_int!(u16, 2);
impl_serializer_for_int!(u32, 4);
impl_serializer_for_int!(u64, 8);
impl_serializer_for_int!(u128, 16);

impl Serializer for bool {
    fn write(&self, writer: &mut Writer) {
        writer.write_u8(*self as u8);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        match reader.read::<u8>()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(ReaderError::InvalidValue),
        }
    }

    fn size(&self) -> usize {
        1
    }
}

impl Serializer for String {
    fn write(&self, writer: &mut Writer) {
        (self.len() as u16).write(writer);
        writer.write_bytes(self.as_bytes());
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let len: u16 = reader.read()?;
        let bytes = reader.read_bytes(len as usize)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| ReaderError::InvalidValue)
    }

    fn size(&self) -> usize {
        2 + self.len()
    }
}

impl<T: Serializer> Serializer for Option<T> {
    fn write(&self, writer: &mut Writer) {
        match self {
            Some(value) => {
                writer.write_u8(1);
                value.write(writer);
            }
            None => writer.write_u8(0),
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        match reader.read::<u8>()? {
            0 => Ok(None),
            1 => Ok(Some(reader.read()?)),
            _ => Err(ReaderError::InvalidValue),
        }
    }

    fn size(&self) -> usize {
        1 + self.as_ref().map(Serializer::size).unwrap_or(0)
    }
}

impl Serializer for Vec<u8> {
    fn write(&self, writer: &mut Writer) {
        (self.len() as u32).write(writer);
        writer.write_bytes(self);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let len: u32 = reader.read()?;
        Ok(reader.read_bytes(len as usize)?.to_vec())
    }

    fn size(&self) -> usize {
        4 + self.len()
    }
}

impl Serializer for [u8; 32] {
    fn write(&self, writer: &mut Writer) {
        writer.write_bytes(self);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_bytes_32()
    }

    fn size(&self) -> usize {
        32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_roundtrip() {
        let mut writer = Writer::new();
        42u64.write(&mut writer);
        7u8.write(&mut writer);
        0xBEEFu16.write(&mut writer);

        let bytes = writer.bytes();
        assert_eq!(bytes.len(), 8 + 1 + 2);

        let mut reader = Reader::new(&bytes);
        assert_eq!(reader.read::<u64>().unwrap(), 42);
        assert_eq!(reader.read::<u8>().unwrap(), 7);
        assert_eq!(reader.read::<u16>().unwrap(), 0xBEEF);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_string_roundtrip() {
        let value = "share class A".to_string();
        let bytes = value.to_bytes();
        assert_eq!(bytes.len(), value.size());
        assert_eq!(String::from_bytes(&bytes).unwrap(), value);
    }

    #[test]
    fn test_option_roundtrip() {
        let some: Option<u64> = Some(99);
        let none: Option<u64> = None;
        assert_eq!(Option::<u64>::from_bytes(&some.to_bytes()).unwrap(), some);
        assert_eq!(Option::<u64>::from_bytes(&none.to_bytes()).unwrap(), none);
    }

    #[test]
    fn test_truncated_payload_fails() {
        let bytes = 42u64.to_bytes();
        let mut reader = Reader::new(&bytes[..4]);
        assert_eq!(reader.read::<u64>(), Err(ReaderError::InvalidSize));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = 42u64.to_bytes();
        bytes.push(0);
        assert_eq!(u64::from_bytes(&bytes), Err(ReaderError::InvalidSize));
    }

    #[test]
    fn test_invalid_bool_rejected() {
        assert_eq!(bool::from_bytes(&[2]), Err(ReaderError::InvalidValue));
    }
}
