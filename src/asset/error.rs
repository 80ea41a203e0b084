//! Fungible Ledger Error Codes
//!
//! Range: 0x0100 - 0x01FF
//! Categories: validation 0x0100, balance 0x0110, authorization 0x0120,
//! state 0x0130, external 0x0140.

use crate::auth::AuthError;
use thiserror::Error;

// ===== Validation Errors (0x0100 - 0x010F) =====

pub const ASSET_ERROR_ZERO_AMOUNT: u64 = 0x0100;
pub const ASSET_ERROR_ZERO_ADDRESS: u64 = 0x0101;
pub const ASSET_ERROR_INVALID_PARTITION: u64 = 0x0102;
pub const ASSET_ERROR_SELF_OPERATION: u64 = 0x0103;
pub const ASSET_ERROR_INVALID_DATA: u64 = 0x0104;
pub const ASSET_ERROR_NAME_TOO_LONG: u64 = 0x0105;
pub const ASSET_ERROR_SYMBOL_TOO_LONG: u64 = 0x0106;
pub const ASSET_ERROR_DECIMALS_TOO_HIGH: u64 = 0x0107;
pub const ASSET_ERROR_URI_TOO_LONG: u64 = 0x0108;
pub const ASSET_ERROR_DOCUMENT_NAME_INVALID: u64 = 0x0109;
pub const ASSET_ERROR_DOCUMENT_NOT_FOUND: u64 = 0x010A;

// ===== Balance Errors (0x0110 - 0x011F) =====

pub const ASSET_ERROR_INSUFFICIENT_BALANCE: u64 = 0x0110;
pub const ASSET_ERROR_SUPPLY_OVERFLOW: u64 = 0x0111;

// ===== Authorization Errors (0x0120 - 0x012F) =====

pub const ASSET_ERROR_NOT_AUTHORIZED: u64 = 0x0120;
pub const ASSET_ERROR_INSUFFICIENT_ALLOWANCE: u64 = 0x0121;
pub const ASSET_ERROR_EXPIRED_SIGNATURE: u64 = 0x0122;
pub const ASSET_ERROR_INVALID_SIGNATURE: u64 = 0x0123;
pub const ASSET_ERROR_UNAUTHORIZED_SIGNER: u64 = 0x0124;
pub const ASSET_ERROR_MISSING_ROLE: u64 = 0x0125;
pub const ASSET_ERROR_NOT_ROLE_ADMIN: u64 = 0x0126;
pub const ASSET_ERROR_NOT_CONTROLLER: u64 = 0x0127;

// ===== State Errors (0x0130 - 0x013F) =====

pub const ASSET_ERROR_ISSUANCE_FINALIZED: u64 = 0x0130;
pub const ASSET_ERROR_CONTROLLER_DISABLED: u64 = 0x0131;
pub const ASSET_ERROR_PAUSED: u64 = 0x0132;
pub const ASSET_ERROR_ACCOUNT_PAUSED: u64 = 0x0133;
pub const ASSET_ERROR_PARTITION_PAUSED: u64 = 0x0134;
pub const ASSET_ERROR_ALREADY_CONTROLLER: u64 = 0x0135;
pub const ASSET_ERROR_NOT_A_CONTROLLER: u64 = 0x0136;

// ===== External-Call Errors (0x0140 - 0x014F) =====

pub const ASSET_ERROR_RECEIVER_REJECTED: u64 = 0x0140;
pub const ASSET_ERROR_RECEIVER_NOT_IMPLEMENTED: u64 = 0x0141;
pub const ASSET_ERROR_TRANSFER_BLOCKED: u64 = 0x0142;

/// Ledger operation result type
pub type AssetResult<T> = Result<T, AssetError>;

/// Fungible ledger error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    // Validation
    #[error("Amount cannot be zero")]
    ZeroAmount,

    #[error("Address cannot be zero")]
    ZeroAddress,

    #[error("Invalid or unknown partition")]
    InvalidPartition,

    #[error("Self operation not allowed")]
    SelfOperation,

    #[error("Authorization data is malformed")]
    InvalidData,

    #[error("Name too long")]
    NameTooLong,

    #[error("Symbol too long")]
    SymbolTooLong,

    #[error("Decimals too high")]
    DecimalsTooHigh,

    #[error("URI too long")]
    UriTooLong,

    #[error("Document name is empty or too long")]
    DocumentNameInvalid,

    #[error("Document not found")]
    DocumentNotFound,

    // Balance
    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Supply overflow")]
    SupplyOverflow,

    // Authorization
    #[error("Not authorized to operate on this holder")]
    NotAuthorized,

    #[error("Insufficient allowance")]
    InsufficientAllowance,

    #[error("Signature deadline has passed")]
    ExpiredSignature,

    #[error("Signature is invalid")]
    InvalidSignature,

    #[error("Authorization data is invalid: recovered signer does not hold the required role")]
    UnauthorizedSigner,

    #[error("Caller does not hold the required role")]
    MissingRole,

    #[error("Caller does not hold the admin role for this role")]
    NotRoleAdmin,

    #[error("Caller is not a controller")]
    NotController,

    // State
    #[error("Issuance has been finalized")]
    IssuanceFinalized,

    #[error("Controller operations have been disabled")]
    ControllerDisabled,

    #[error("Transfers are paused")]
    Paused,

    #[error("Account is paused")]
    AccountPaused,

    #[error("Partition is paused")]
    PartitionPaused,

    #[error("Address is already a controller")]
    AlreadyController,

    #[error("Address is not a controller")]
    NotAController,

    // External calls
    #[error("Receiver rejected the transfer: {0}")]
    ReceiverRejected(String),

    #[error("Receiver does not implement the acceptance hook")]
    ReceiverNotImplemented,

    #[error("Transfer blocked by policy hook: {0}")]
    TransferBlocked(String),
}

impl AssetError {
    /// Convert error to u64 error code
    pub fn code(&self) -> u64 {
        match self {
            Self::ZeroAmount => ASSET_ERROR_ZERO_AMOUNT,
            Self::ZeroAddress => ASSET_ERROR_ZERO_ADDRESS,
            Self::InvalidPartition => ASSET_ERROR_INVALID_PARTITION,
            Self::SelfOperation => ASSET_ERROR_SELF_OPERATION,
            Self::InvalidData => ASSET_ERROR_INVALID_DATA,
            Self::NameTooLong => ASSET_ERROR_NAME_TOO_LONG,
            Self::SymbolTooLong => ASSET_ERROR_SYMBOL_TOO_LONG,
            Self::DecimalsTooHigh => ASSET_ERROR_DECIMALS_TOO_HIGH,
            Self::UriTooLong => ASSET_ERROR_URI_TOO_LONG,
            Self::DocumentNameInvalid => ASSET_ERROR_DOCUMENT_NAME_INVALID,
            Self::DocumentNotFound => ASSET_ERROR_DOCUMENT_NOT_FOUND,
            Self::InsufficientBalance => ASSET_ERROR_INSUFFICIENT_BALANCE,
            Self::SupplyOverflow => ASSET_ERROR_SUPPLY_OVERFLOW,
            Self::NotAuthorized => ASSET_ERROR_NOT_AUTHORIZED,
            Self::InsufficientAllowance => ASSET_ERROR_INSUFFICIENT_ALLOWANCE,
            Self::ExpiredSignature => ASSET_ERROR_EXPIRED_SIGNATURE,
            Self::InvalidSignature => ASSET_ERROR_INVALID_SIGNATURE,
            Self::UnauthorizedSigner => ASSET_ERROR_UNAUTHORIZED_SIGNER,
            Self::MissingRole => ASSET_ERROR_MISSING_ROLE,
            Self::NotRoleAdmin => ASSET_ERROR_NOT_ROLE_ADMIN,
            Self::NotController => ASSET_ERROR_NOT_CONTROLLER,
            Self::IssuanceFinalized => ASSET_ERROR_ISSUANCE_FINALIZED,
            Self::ControllerDisabled => ASSET_ERROR_CONTROLLER_DISABLED,
            Self::Paused => ASSET_ERROR_PAUSED,
            Self::AccountPaused => ASSET_ERROR_ACCOUNT_PAUSED,
            Self::PartitionPaused => ASSET_ERROR_PARTITION_PAUSED,
            Self::AlreadyController => ASSET_ERROR_ALREADY_CONTROLLER,
            Self::NotAController => ASSET_ERROR_NOT_A_CONTROLLER,
            Self::ReceiverRejected(_) => ASSET_ERROR_RECEIVER_REJECTED,
            Self::ReceiverNotImplemented => ASSET_ERROR_RECEIVER_NOT_IMPLEMENTED,
            Self::TransferBlocked(_) => ASSET_ERROR_TRANSFER_BLOCKED,
        }
    }
}

impl From<AuthError> for AssetError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::MalformedPayload => Self::InvalidData,
            AuthError::ExpiredSignature => Self::ExpiredSignature,
            AuthError::InvalidSignature => Self::InvalidSignature,
            AuthError::UnauthorizedSigner => Self::UnauthorizedSigner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let errors = [
            AssetError::ZeroAmount,
            AssetError::ZeroAddress,
            AssetError::InvalidPartition,
            AssetError::SelfOperation,
            AssetError::InvalidData,
            AssetError::InsufficientBalance,
            AssetError::NotAuthorized,
            AssetError::InsufficientAllowance,
            AssetError::ExpiredSignature,
            AssetError::UnauthorizedSigner,
            AssetError::IssuanceFinalized,
            AssetError::ControllerDisabled,
            AssetError::ReceiverRejected(String::new()),
            AssetError::ReceiverNotImplemented,
        ];
        let mut codes: Vec<u64> = errors.iter().map(AssetError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
