//! Preflight Status Codes
//!
//! The read-only `can_transfer` family never aborts and never mutates
//! state; it maps every guard onto a fixed one-byte status code plus a
//! human-readable reason. The same enumeration is used by the fungible
//! and the non-fungible ledgers.

use serde::{Deserialize, Serialize};

/// Fixed status-code space for transfer preflight checks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TransferStatus {
    /// Transfer would fail for a generic/structural reason
    Failure = 0x50,
    /// Transfer would succeed
    Success = 0x51,
    /// Sender balance in the partition is insufficient
    InsufficientBalance = 0x52,
    /// Spender allowance is insufficient
    InsufficientAllowance = 0x53,
    /// Transfers are globally halted
    TransfersHalted = 0x54,
    /// The partition's funds are locked
    FundsLocked = 0x55,
    /// Sender is not a valid source
    InvalidSender = 0x56,
    /// Receiver is not a valid destination
    InvalidReceiver = 0x57,
    /// Caller is not an authorized operator
    InvalidOperator = 0x58,
    /// Informational: token-level restriction applies
    TokenInfo = 0x5F,
}

impl TransferStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, TransferStatus::Success)
    }

    /// Stable one-byte wire code
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

/// Outcome of a preflight check: status code plus reason text
pub type TransferCheck = (TransferStatus, &'static str);

/// Successful preflight result
pub const TRANSFER_OK: TransferCheck = (TransferStatus::Success, "transfer allowed");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(TransferStatus::Failure.code(), 0x50);
        assert_eq!(TransferStatus::Success.code(), 0x51);
        assert_eq!(TransferStatus::InsufficientBalance.code(), 0x52);
        assert_eq!(TransferStatus::InsufficientAllowance.code(), 0x53);
        assert_eq!(TransferStatus::TransfersHalted.code(), 0x54);
        assert_eq!(TransferStatus::FundsLocked.code(), 0x55);
        assert_eq!(TransferStatus::InvalidSender.code(), 0x56);
        assert_eq!(TransferStatus::InvalidReceiver.code(), 0x57);
        assert_eq!(TransferStatus::InvalidOperator.code(), 0x58);
        assert_eq!(TransferStatus::TokenInfo.code(), 0x5F);
    }

    #[test]
    fn test_only_success_is_success() {
        assert!(TransferStatus::Success.is_success());
        assert!(!TransferStatus::Failure.is_success());
        assert!(!TransferStatus::InvalidOperator.is_success());
    }
}
