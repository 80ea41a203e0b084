//! Receiver-acceptance hook.
//!
//! Contract recipients get a say before tokens land in their account:
//! after all ledger writes for a transfer or issuance have been applied,
//! the ledger calls the recipient's hook and drops the whole operation
//! unless it acknowledges. Plain accounts (no code) are never consulted.

use crate::asset::types::Partition;
use crate::auth::AuthValue;
use crate::crypto::Address;

/// Result of calling the acceptance hook on a recipient
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookResult {
    /// Receiver acknowledged the transfer
    Accepted,
    /// Receiver rejected, optionally with a reason to surface to the caller
    Rejected(Option<String>),
    /// Receiver is a contract but does not implement the hook
    NotImplemented,
}

/// Registry resolving which addresses are contracts and dispatching the
/// acceptance hook to them
pub trait ReceiverRegistry {
    /// Whether the address has code behind it
    fn is_contract(&self, address: &Address) -> bool;

    /// Invoke the acceptance hook on a contract recipient
    #[allow(clippy::too_many_arguments)]
    fn on_received(
        &self,
        partition: &Partition,
        operator: &Address,
        from: &Address,
        to: &Address,
        value: AuthValue,
        data: &[u8],
        operator_data: &[u8],
    ) -> HookResult;
}

/// Default registry: every recipient is a plain account, the hook is
/// never invoked
#[derive(Clone, Copy, Debug, Default)]
pub struct NoReceivers;

impl ReceiverRegistry for NoReceivers {
    fn is_contract(&self, _address: &Address) -> bool {
        false
    }

    fn on_received(
        &self,
        _partition: &Partition,
        _operator: &Address,
        _from: &Address,
        _to: &Address,
        _value: AuthValue,
        _data: &[u8],
        _operator_data: &[u8],
    ) -> HookResult {
        HookResult::NotImplemented
    }
}
