// NFT operator management.
//
// Same holder-initiated semantics as the fungible ledger: independent
// global and partition-scoped flags, self-authorization rejected, batch
// revocation sweeping both dimensions.

use crate::asset::types::Partition;
use crate::context::RuntimeContext;
use crate::crypto::Address;
use crate::nft::error::{NftError, NftResult};
use crate::nft::storage::NftStorage;

pub fn authorize_operator<S: NftStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    operator: &Address,
) -> NftResult<()> {
    if operator.is_zero() {
        return Err(NftError::ZeroAddress);
    }
    if *operator == ctx.caller {
        return Err(NftError::SelfOperation);
    }
    storage.set_operator(&ctx.caller, operator, true);
    Ok(())
}

pub fn revoke_operator<S: NftStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    operator: &Address,
) -> NftResult<()> {
    storage.set_operator(&ctx.caller, operator, false);
    Ok(())
}

pub fn authorize_operator_by_partition<S: NftStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    partition: &Partition,
    operator: &Address,
) -> NftResult<()> {
    if operator.is_zero() {
        return Err(NftError::ZeroAddress);
    }
    if *operator == ctx.caller {
        return Err(NftError::SelfOperation);
    }
    if !partition.is_default() && !storage.is_registered_partition(partition) {
        return Err(NftError::InvalidPartition);
    }
    storage.set_operator_for_partition(&ctx.caller, partition, operator, true);
    Ok(())
}

pub fn revoke_operator_by_partition<S: NftStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    partition: &Partition,
    operator: &Address,
) -> NftResult<()> {
    storage.set_operator_for_partition(&ctx.caller, partition, operator, false);
    Ok(())
}

/// Batch sweep of the global flag and every partition-scoped flag
pub fn revoke_operators<S: NftStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    operators: &[Address],
) -> NftResult<()> {
    let partitions = storage.partitions_of(&ctx.caller);
    for operator in operators {
        storage.set_operator(&ctx.caller, operator, false);
        storage.set_operator_for_partition(&ctx.caller, &Partition::DEFAULT, operator, false);
        for partition in &partitions {
            storage.set_operator_for_partition(&ctx.caller, partition, operator, false);
        }
    }
    Ok(())
}
