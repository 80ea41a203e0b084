// Fungible Ledger Operations
// This module contains the core business logic for the partitioned token.
//
// The operations are designed to be runtime-agnostic:
// - Storage is abstracted via the `AssetStorage` trait
// - Caller identity and time come in through `RuntimeContext`
// - Receiver-acceptance hooks are dispatched through `ReceiverRegistry`
//
// Every mutating entry point is expected to run against an overlay
// (`AssetOverlay`) so that a failure at any step, including a hook
// rejection after the ledger writes, drops the whole change set.

mod admin;
mod controller;
mod issue;
mod operator;
mod preflight;
mod redeem;
mod transfer;
mod validation;

pub use admin::*;
pub use controller::*;
pub use issue::*;
pub use operator::*;
pub use preflight::*;
pub use redeem::*;
pub use transfer::*;
pub use validation::*;

use crate::asset::error::{AssetError, AssetResult};
use crate::asset::roles::RoleId;
use crate::asset::storage::AssetStorage;
use crate::asset::types::{Amount, Partition};
use crate::auth::AuthValue;
use crate::crypto::Address;
use crate::receiver::{HookResult, ReceiverRegistry};

// ========================================
// Ledger Primitives
// ========================================

/// Remove `amount` from `account`'s balance in `partition`.
/// Decrements both the partition balance and the account total.
pub(crate) fn debit<S: AssetStorage + ?Sized>(
    storage: &mut S,
    account: &Address,
    partition: &Partition,
    amount: Amount,
) -> AssetResult<()> {
    let balance = storage.partition_balance(account, partition);
    if balance < amount {
        return Err(AssetError::InsufficientBalance);
    }
    storage.set_partition_balance(account, partition, balance - amount);

    let total = storage
        .total_balance(account)
        .checked_sub(amount)
        .ok_or(AssetError::InsufficientBalance)?;
    storage.set_total_balance(account, total);
    Ok(())
}

/// Add `amount` to `account`'s balance in `partition`, recording
/// partition membership on first receipt. Membership is never retracted,
/// only added.
pub(crate) fn credit<S: AssetStorage + ?Sized>(
    storage: &mut S,
    account: &Address,
    partition: &Partition,
    amount: Amount,
) -> AssetResult<()> {
    if !storage.is_partition_member(account, partition) {
        storage.add_partition_member(account, partition);
    }

    let balance = storage
        .partition_balance(account, partition)
        .checked_add(amount)
        .ok_or(AssetError::SupplyOverflow)?;
    storage.set_partition_balance(account, partition, balance);

    let total = storage
        .total_balance(account)
        .checked_add(amount)
        .ok_or(AssetError::SupplyOverflow)?;
    storage.set_total_balance(account, total);
    Ok(())
}

/// Dispatch the receiver-acceptance hook for a contract recipient.
/// Plain accounts are never consulted.
#[allow(clippy::too_many_arguments)]
pub(crate) fn notify_receiver(
    receivers: &dyn ReceiverRegistry,
    partition: &Partition,
    operator: &Address,
    from: &Address,
    to: &Address,
    value: AuthValue,
    data: &[u8],
    operator_data: &[u8],
) -> AssetResult<()> {
    if !receivers.is_contract(to) {
        return Ok(());
    }

    match receivers.on_received(partition, operator, from, to, value, data, operator_data) {
        HookResult::Accepted => Ok(()),
        HookResult::Rejected(reason) => Err(AssetError::ReceiverRejected(
            reason.unwrap_or_else(|| "no reason given".to_string()),
        )),
        HookResult::NotImplemented => Err(AssetError::ReceiverNotImplemented),
    }
}

/// Require `account` to hold `role`
pub fn require_role<S: AssetStorage + ?Sized>(
    storage: &S,
    role: &RoleId,
    account: &Address,
) -> AssetResult<()> {
    if storage.has_role(role, account) {
        Ok(())
    } else {
        Err(AssetError::MissingRole)
    }
}
