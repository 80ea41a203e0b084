// Issuance operations.
//
// Issuance is the only path that creates supply and the only path that
// registers new partitions. It is gated on the issuer role and on the
// token's one-way `issuable` flag.

use super::validation::{validate_address, validate_amount};
use super::{credit, notify_receiver, require_role};
use crate::asset::error::{AssetError, AssetResult};
use crate::asset::roles::{DEFAULT_ADMIN_ROLE, ISSUER_ROLE};
use crate::asset::storage::AssetStorage;
use crate::asset::types::{Amount, Partition};
use crate::auth::AuthValue;
use crate::context::RuntimeContext;
use crate::crypto::Address;
use crate::receiver::ReceiverRegistry;

/// Issue `amount` into the default partition
pub fn issue<S: AssetStorage + ?Sized>(
    storage: &mut S,
    receivers: &dyn ReceiverRegistry,
    ctx: &RuntimeContext,
    to: &Address,
    amount: Amount,
    data: &[u8],
) -> AssetResult<()> {
    issue_by_partition(storage, receivers, ctx, &Partition::DEFAULT, to, amount, data)
}

/// Issue `amount` into `partition`, registering the partition on its
/// first appearance.
///
/// The receiver-acceptance hook runs after all ledger writes; issuance
/// is only observable if acceptance succeeds.
pub fn issue_by_partition<S: AssetStorage + ?Sized>(
    storage: &mut S,
    receivers: &dyn ReceiverRegistry,
    ctx: &RuntimeContext,
    partition: &Partition,
    to: &Address,
    amount: Amount,
    data: &[u8],
) -> AssetResult<()> {
    require_role(storage, &ISSUER_ROLE, &ctx.caller)?;
    if !storage.metadata().issuable {
        return Err(AssetError::IssuanceFinalized);
    }
    validate_amount(amount)?;
    validate_address(to)?;

    // The default partition is implicitly valid and never registered
    if !partition.is_default() {
        storage.register_partition(partition);
    }

    credit(storage, to, partition, amount)?;

    let partition_supply = storage
        .partition_supply(partition)
        .checked_add(amount)
        .ok_or(AssetError::SupplyOverflow)?;
    storage.set_partition_supply(partition, partition_supply);

    let total_supply = storage
        .total_supply()
        .checked_add(amount)
        .ok_or(AssetError::SupplyOverflow)?;
    storage.set_total_supply(total_supply);

    notify_receiver(
        receivers,
        partition,
        &ctx.caller,
        &Address::zero(),
        to,
        AuthValue::Amount(amount),
        data,
        &[],
    )
}

/// Irreversibly close issuance. Admin-gated, idempotent once flipped.
pub fn finalize_issuance<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
) -> AssetResult<()> {
    require_role(storage, &DEFAULT_ADMIN_ROLE, &ctx.caller)?;
    let mut metadata = storage.metadata();
    metadata.issuable = false;
    storage.set_metadata(&metadata);
    Ok(())
}
