// Role administration and pause gates.

use super::validation::{validate_address, validate_partition};
use super::require_role;
use crate::asset::error::{AssetError, AssetResult};
use crate::asset::roles::{RoleId, PAUSER_ROLE};
use crate::asset::storage::AssetStorage;
use crate::asset::types::Partition;
use crate::context::RuntimeContext;
use crate::crypto::Address;

fn require_role_admin<S: AssetStorage + ?Sized>(
    storage: &S,
    ctx: &RuntimeContext,
    role: &RoleId,
) -> AssetResult<()> {
    let admin = storage.role_admin(role);
    if storage.has_role(&admin, &ctx.caller) {
        Ok(())
    } else {
        Err(AssetError::NotRoleAdmin)
    }
}

/// Grant `role` to `account`. Caller must hold the role's admin role.
pub fn grant_role<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    role: &RoleId,
    account: &Address,
) -> AssetResult<()> {
    validate_address(account)?;
    require_role_admin(storage, ctx, role)?;
    storage.set_role(role, account, true);
    Ok(())
}

/// Revoke `role` from `account`. Caller must hold the role's admin role.
pub fn revoke_role<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    role: &RoleId,
    account: &Address,
) -> AssetResult<()> {
    require_role_admin(storage, ctx, role)?;
    storage.set_role(role, account, false);
    Ok(())
}

/// Reassign which role administers `role`
pub fn set_role_admin<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    role: &RoleId,
    new_admin: RoleId,
) -> AssetResult<()> {
    require_role_admin(storage, ctx, role)?;
    storage.set_role_admin(role, new_admin);
    Ok(())
}

/// Flip the global pause gate. Pauser-gated.
pub fn set_paused<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    paused: bool,
) -> AssetResult<()> {
    require_role(storage, &PAUSER_ROLE, &ctx.caller)?;
    storage.set_paused(paused);
    Ok(())
}

/// Flip the pause gate for one account. Pauser-gated.
pub fn set_account_paused<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    account: &Address,
    paused: bool,
) -> AssetResult<()> {
    require_role(storage, &PAUSER_ROLE, &ctx.caller)?;
    validate_address(account)?;
    storage.set_account_paused(account, paused);
    Ok(())
}

/// Flip the pause gate for one partition. Pauser-gated.
pub fn set_partition_paused<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    partition: &Partition,
    paused: bool,
) -> AssetResult<()> {
    require_role(storage, &PAUSER_ROLE, &ctx.caller)?;
    validate_partition(storage, partition)?;
    storage.set_partition_paused(partition, paused);
    Ok(())
}
