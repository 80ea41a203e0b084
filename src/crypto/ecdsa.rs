//! ECDSA (secp256k1) recoverable signatures.
//!
//! The signed-authorization protocol never receives a public key on the
//! wire: the signer is *recovered* from the 65-byte `(r, s, v)` signature
//! and the message digest, then checked against the role registry.
//!
//! Security notes:
//! - R and S must be in `[1, n-1]`
//! - S must be strictly below half the curve order (malleability)
//! - Recovery id must be one of 0, 1, 27, 28
//! - Comparisons use the `subtle` crate for constant time

use crate::crypto::{Address, CryptoError};
use crate::serializer::{Reader, ReaderError, Serializer, Writer};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

pub const SIGNATURE_SIZE: usize = 65;

/// secp256k1 curve order n
const SECP256K1_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// Half of the secp256k1 curve order (malleability boundary)
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// A recoverable secp256k1 signature in `(r, s, v)` form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoverableSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub v: u8,
}

impl RecoverableSignature {
    pub fn new(r: [u8; 32], s: [u8; 32], v: u8) -> Self {
        Self { r, s, v }
    }

    /// Recover the signer address from a 32-byte message digest.
    ///
    /// Validates scalar ranges and the low-S rule before touching the
    /// curve; a malformed signature never reaches point arithmetic.
    pub fn recover(&self, digest: &[u8; 32]) -> Result<Address, CryptoError> {
        if !is_valid_scalar(&self.r) || !is_valid_scalar(&self.s) {
            return Err(CryptoError::InvalidFormat);
        }
        if !is_low_s(&self.s) {
            return Err(CryptoError::MalleableSignature);
        }

        let recovery_id = parse_recovery_id(self.v)?;

        let mut sig_bytes = [0u8; 64];
        sig_bytes[..32].copy_from_slice(&self.r);
        sig_bytes[32..].copy_from_slice(&self.s);

        let sig = match Signature::from_slice(&sig_bytes) {
            Ok(s) => {
                sig_bytes.zeroize();
                s
            }
            Err(_) => {
                sig_bytes.zeroize();
                return Err(CryptoError::InvalidFormat);
            }
        };

        let key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
            .map_err(|_| CryptoError::RecoveryFailed)?;

        Ok(Address::from_verifying_key(&key))
    }
}

impl Serializer for RecoverableSignature {
    fn write(&self, writer: &mut Writer) {
        writer.write_bytes(&self.r);
        writer.write_bytes(&self.s);
        self.v.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            r: reader.read_bytes_32()?,
            s: reader.read_bytes_32()?,
            v: reader.read()?,
        })
    }

    fn size(&self) -> usize {
        SIGNATURE_SIZE
    }
}

/// Sign a 32-byte digest, producing a low-S recoverable signature.
///
/// This is the off-chain half of the authorization protocol: a
/// role-holder signs the typed-data digest and hands the resulting
/// payload to whoever executes the transfer.
pub fn sign_recoverable(digest: &[u8; 32], key: &SigningKey) -> RecoverableSignature {
    let (sig, recid) = key
        .sign_prehash_recoverable(digest)
        .expect("prehash signing cannot fail on a 32-byte digest");

    let sig_bytes = sig.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&sig_bytes[..32]);
    s.copy_from_slice(&sig_bytes[32..]);

    // Normalize S to the lower half and flip the recovery id if needed
    let (s, v) = if is_low_s(&s) {
        (s, recid.to_byte() + 27)
    } else {
        let inverted = invert_s(&s);
        let v = if recid.to_byte() == 0 { 28 } else { 27 };
        (inverted, v)
    };

    RecoverableSignature { r, s, v }
}

/// Check `s < n/2` in constant time (strict inequality)
fn is_low_s(s: &[u8; 32]) -> bool {
    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for i in 0..32 {
        let not_decided = !(less | greater);
        let byte_less = Choice::from((s[i] < SECP256K1_HALF_ORDER[i]) as u8);
        let byte_greater = Choice::from((s[i] > SECP256K1_HALF_ORDER[i]) as u8);

        less |= not_decided & byte_less;
        greater |= not_decided & byte_greater;
    }

    less.into()
}

/// Check a scalar is in `[1, n-1]` in constant time
fn is_valid_scalar(scalar: &[u8; 32]) -> bool {
    let mut is_zero = Choice::from(1u8);
    for byte in scalar {
        is_zero &= byte.ct_eq(&0u8);
    }

    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for i in 0..32 {
        let not_decided = !(less | greater);
        let byte_less = Choice::from((scalar[i] < SECP256K1_ORDER[i]) as u8);
        let byte_greater = Choice::from((scalar[i] > SECP256K1_ORDER[i]) as u8);

        less |= not_decided & byte_less;
        greater |= not_decided & byte_greater;
    }

    (!is_zero & less).into()
}

fn parse_recovery_id(v: u8) -> Result<RecoveryId, CryptoError> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(CryptoError::InvalidRecoveryId(v)),
    };

    RecoveryId::try_from(id).map_err(|_| CryptoError::InvalidRecoveryId(v))
}

/// Compute `n - s` for malleability handling
fn invert_s(s: &[u8; 32]) -> [u8; 32] {
    let mut result = [0u8; 32];
    let mut borrow: i32 = 0;

    for i in (0..32).rev() {
        let diff = (SECP256K1_ORDER[i] as i32) - (s[i] as i32) - borrow;
        if diff < 0 {
            result[i] = (diff + 256) as u8;
            borrow = 1;
        } else {
            result[i] = diff as u8;
            borrow = 0;
        }
    }

    result
}
