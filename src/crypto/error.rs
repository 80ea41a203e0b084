use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("Invalid signature format")]
    InvalidFormat,

    #[error("Signature S value is malleable")]
    MalleableSignature,

    #[error("Invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    #[error("Public key recovery failed")]
    RecoveryFailed,

    #[error("Invalid hex string")]
    InvalidHex,
}
