// Explicit partition change.
//
// The one path that moves a token between partitions. Reserved for
// controllers and for owners holding the transfer-agent role; ordinary
// transfers always keep the token's partition.

use crate::asset::roles::TRANSFER_AGENT_ROLE;
use crate::asset::types::Partition;
use crate::context::RuntimeContext;
use crate::nft::error::{NftError, NftResult};
use crate::nft::storage::NftStorage;

/// Move `token_id` into `new_partition`
pub fn change_partition<S: NftStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    token_id: u64,
    new_partition: &Partition,
) -> NftResult<()> {
    let mut token = storage.token(token_id).ok_or(NftError::TokenNotFound)?;

    if !new_partition.is_default() && !storage.is_registered_partition(new_partition) {
        return Err(NftError::InvalidPartition);
    }
    if token.partition == *new_partition {
        return Err(NftError::SamePartition);
    }

    let is_controller = storage.metadata().controllable && storage.is_controller(&ctx.caller);
    let is_owner_agent = ctx.caller == token.owner
        && storage.has_role(&TRANSFER_AGENT_ROLE, &ctx.caller);
    if !is_controller && !is_owner_agent {
        return Err(NftError::NotAuthorized);
    }

    let owner = token.owner;
    let old_partition = token.partition;

    token.partition = *new_partition;
    storage.set_token(&token);

    // Re-home the count ledger and supply counters
    let old_balance = storage
        .partition_balance(&owner, &old_partition)
        .checked_sub(1)
        .ok_or(NftError::TokenNotFound)?;
    storage.set_partition_balance(&owner, &old_partition, old_balance);

    let new_balance = storage
        .partition_balance(&owner, new_partition)
        .checked_add(1)
        .ok_or(NftError::SupplyOverflow)?;
    storage.set_partition_balance(&owner, new_partition, new_balance);

    let old_supply = storage
        .partition_supply(&old_partition)
        .checked_sub(1)
        .ok_or(NftError::TokenNotFound)?;
    storage.set_partition_supply(&old_partition, old_supply);

    let new_supply = storage
        .partition_supply(new_partition)
        .checked_add(1)
        .ok_or(NftError::SupplyOverflow)?;
    storage.set_partition_supply(new_partition, new_supply);

    // Plain operators may move tokens but never re-tranche them, so
    // the operator lattice is deliberately not consulted here
    if !storage.is_partition_member(&owner, new_partition) {
        storage.add_partition_member(&owner, new_partition);
    }
    Ok(())
}
