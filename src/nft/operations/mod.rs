// Partitioned NFT Ledger - Operations
//
// Same shape as the fungible operations: free functions over the
// storage trait plus `RuntimeContext`, run against an overlay by the
// facade so every entry point is all-or-nothing.

mod admin;
mod controller;
mod issue;
mod operator;
mod partition;
mod preflight;
mod query;
mod redeem;
mod transfer;

pub use admin::*;
pub use controller::*;
pub use issue::*;
pub use operator::*;
pub use partition::*;
pub use preflight::*;
pub use query::*;
pub use redeem::*;
pub use transfer::*;

use crate::asset::roles::RoleId;
use crate::asset::types::Partition;
use crate::auth::AuthValue;
use crate::crypto::Address;
use crate::nft::error::{NftError, NftResult};
use crate::nft::storage::NftStorage;
use crate::receiver::{HookResult, ReceiverRegistry};

/// Require `account` to hold `role`
pub fn require_role<S: NftStorage + ?Sized>(
    storage: &S,
    role: &RoleId,
    account: &Address,
) -> NftResult<()> {
    if storage.has_role(role, account) {
        Ok(())
    } else {
        Err(NftError::MissingRole)
    }
}

/// Dispatch the receiver-acceptance hook for a contract recipient
#[allow(clippy::too_many_arguments)]
pub(crate) fn notify_receiver(
    receivers: &dyn ReceiverRegistry,
    partition: &Partition,
    operator: &Address,
    from: &Address,
    to: &Address,
    token_id: u64,
    data: &[u8],
    operator_data: &[u8],
) -> NftResult<()> {
    if !receivers.is_contract(to) {
        return Ok(());
    }

    match receivers.on_received(
        partition,
        operator,
        from,
        to,
        AuthValue::Token(token_id),
        data,
        operator_data,
    ) {
        HookResult::Accepted => Ok(()),
        HookResult::Rejected(reason) => Err(NftError::ReceiverRejected(
            reason.unwrap_or_else(|| "no reason given".to_string()),
        )),
        HookResult::NotImplemented => Err(NftError::ReceiverNotImplemented),
    }
}

/// Add one token to `owner`'s count ledger and enumeration index for
/// `partition`, recording partition membership on first receipt
pub(crate) fn credit_token<S: NftStorage + ?Sized>(
    storage: &mut S,
    owner: &Address,
    partition: &Partition,
    token_id: u64,
) -> NftResult<()> {
    if !storage.is_partition_member(owner, partition) {
        storage.add_partition_member(owner, partition);
    }

    let balance = storage
        .balance_of(owner)
        .checked_add(1)
        .ok_or(NftError::SupplyOverflow)?;
    storage.set_balance(owner, balance);

    let partition_balance = storage
        .partition_balance(owner, partition)
        .checked_add(1)
        .ok_or(NftError::SupplyOverflow)?;
    storage.set_partition_balance(owner, partition, partition_balance);

    let mut owned = storage.tokens_of(owner);
    owned.push(token_id);
    storage.set_owned_tokens(owner, owned);
    Ok(())
}

/// Remove one token from `owner`'s count ledger and enumeration index
pub(crate) fn debit_token<S: NftStorage + ?Sized>(
    storage: &mut S,
    owner: &Address,
    partition: &Partition,
    token_id: u64,
) -> NftResult<()> {
    let balance = storage
        .balance_of(owner)
        .checked_sub(1)
        .ok_or(NftError::TokenNotFound)?;
    storage.set_balance(owner, balance);

    let partition_balance = storage
        .partition_balance(owner, partition)
        .checked_sub(1)
        .ok_or(NftError::TokenNotFound)?;
    storage.set_partition_balance(owner, partition, partition_balance);

    let mut owned = storage.tokens_of(owner);
    owned.retain(|id| *id != token_id);
    storage.set_owned_tokens(owner, owned);
    Ok(())
}
