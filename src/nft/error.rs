// Partitioned NFT Ledger - Error Codes
//
// Error Code Ranges:
// - 100-199: Token errors
// - 200-299: Permission errors
// - 300-399: Input validation errors
// - 500-599: State errors
// - 600-699: Receiver hook errors

use crate::auth::AuthError;
use thiserror::Error;

/// NFT operation result type
pub type NftResult<T> = Result<T, NftError>;

/// NFT ledger error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NftError {
    // ========================================
    // Token errors (100-199)
    // ========================================
    #[error("Token not found")]
    TokenNotFound,

    #[error("Token already exists")]
    TokenAlreadyExists,

    #[error("Invalid token id")]
    InvalidTokenId,

    // ========================================
    // Permission errors (200-299)
    // ========================================
    #[error("Not the token owner")]
    NotTokenOwner,

    #[error("Not authorized to operate on this holder")]
    NotAuthorized,

    #[error("Caller is not a controller")]
    NotController,

    #[error("Authorization data is invalid: recovered signer does not hold the required role")]
    UnauthorizedSigner,

    #[error("Caller does not hold the required role")]
    MissingRole,

    #[error("Self operation not allowed")]
    SelfOperation,

    #[error("Caller does not hold the admin role for this role")]
    NotRoleAdmin,

    // ========================================
    // Input validation errors (300-399)
    // ========================================
    #[error("Address cannot be zero")]
    ZeroAddress,

    #[error("Invalid or unknown partition")]
    InvalidPartition,

    #[error("Authorization data is malformed")]
    InvalidData,

    #[error("Signature deadline has passed")]
    ExpiredSignature,

    #[error("Signature is invalid")]
    InvalidSignature,

    #[error("URI too long")]
    UriTooLong,

    #[error("Token is already in this partition")]
    SamePartition,

    #[error("Self transfer not allowed")]
    SelfTransfer,

    #[error("Name too long")]
    NameTooLong,

    #[error("Symbol too long")]
    SymbolTooLong,

    // ========================================
    // State errors (500-599)
    // ========================================
    #[error("Issuance has been finalized")]
    IssuanceFinalized,

    #[error("Controller operations have been disabled")]
    ControllerDisabled,

    #[error("Transfers are paused")]
    Paused,

    #[error("Address is already a controller")]
    AlreadyController,

    #[error("Address is not a controller")]
    NotAController,

    #[error("Supply overflow")]
    SupplyOverflow,

    // ========================================
    // Receiver hook errors (600-699)
    // ========================================
    #[error("Receiver rejected the transfer: {0}")]
    ReceiverRejected(String),

    #[error("Receiver does not implement the acceptance hook")]
    ReceiverNotImplemented,

    #[error("Transfer blocked by policy hook: {0}")]
    TransferBlocked(String),
}

impl NftError {
    /// Convert error to numeric code
    pub fn code(&self) -> u64 {
        match self {
            Self::TokenNotFound => 100,
            Self::TokenAlreadyExists => 101,
            Self::InvalidTokenId => 102,
            Self::NotTokenOwner => 200,
            Self::NotAuthorized => 201,
            Self::NotController => 202,
            Self::UnauthorizedSigner => 203,
            Self::MissingRole => 204,
            Self::SelfOperation => 205,
            Self::NotRoleAdmin => 206,
            Self::ZeroAddress => 300,
            Self::InvalidPartition => 301,
            Self::InvalidData => 302,
            Self::ExpiredSignature => 303,
            Self::InvalidSignature => 304,
            Self::UriTooLong => 305,
            Self::SamePartition => 306,
            Self::SelfTransfer => 307,
            Self::NameTooLong => 308,
            Self::SymbolTooLong => 309,
            Self::IssuanceFinalized => 500,
            Self::ControllerDisabled => 501,
            Self::Paused => 502,
            Self::AlreadyController => 503,
            Self::NotAController => 504,
            Self::SupplyOverflow => 505,
            Self::ReceiverRejected(_) => 600,
            Self::ReceiverNotImplemented => 601,
            Self::TransferBlocked(_) => 602,
        }
    }
}

impl From<AuthError> for NftError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::MalformedPayload => Self::InvalidData,
            AuthError::ExpiredSignature => Self::ExpiredSignature,
            AuthError::InvalidSignature => Self::InvalidSignature,
            AuthError::UnauthorizedSigner => Self::UnauthorizedSigner,
        }
    }
}
