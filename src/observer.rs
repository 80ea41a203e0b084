//! Transfer observers.
//!
//! An explicit before/after callback list invoked by the ledger facades
//! around every supply-moving operation (issuance, transfer,
//! redemption, controller overrides). A before-callback may veto the
//! operation; after-callbacks fire once the change set has been
//! committed. This replaces subclass-override extension points with a
//! composable observer list.

use crate::asset::types::Partition;
use crate::auth::AuthValue;
use crate::crypto::Address;

/// Which kind of supply movement is happening
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferKind {
    Issuance,
    Transfer,
    Redemption,
}

/// One supply-moving operation, as seen by observers.
///
/// Issuances carry the zero address as `from`; redemptions carry it as
/// `to`.
#[derive(Clone, Debug)]
pub struct TransferEvent {
    pub kind: TransferKind,
    pub partition: Partition,
    /// The caller driving the operation
    pub operator: Address,
    pub from: Address,
    pub to: Address,
    pub value: AuthValue,
}

/// Before/after hooks around ledger mutations
pub trait TransferObserver {
    /// Runs before any ledger write; returning an error vetoes the
    /// whole operation with no state change
    fn before_transfer(&self, event: &TransferEvent) -> Result<(), String> {
        let _ = event;
        Ok(())
    }

    /// Runs after the operation's change set has been committed
    fn after_transfer(&self, event: &TransferEvent) {
        let _ = event;
    }
}
