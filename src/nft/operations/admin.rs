// NFT role administration and pause gate.

use super::require_role;
use crate::asset::roles::{RoleId, PAUSER_ROLE};
use crate::context::RuntimeContext;
use crate::crypto::Address;
use crate::nft::error::{NftError, NftResult};
use crate::nft::storage::NftStorage;

fn require_role_admin<S: NftStorage + ?Sized>(
    storage: &S,
    ctx: &RuntimeContext,
    role: &RoleId,
) -> NftResult<()> {
    let admin = storage.role_admin(role);
    if storage.has_role(&admin, &ctx.caller) {
        Ok(())
    } else {
        Err(NftError::NotRoleAdmin)
    }
}

pub fn grant_role<S: NftStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    role: &RoleId,
    account: &Address,
) -> NftResult<()> {
    if account.is_zero() {
        return Err(NftError::ZeroAddress);
    }
    require_role_admin(storage, ctx, role)?;
    storage.set_role(role, account, true);
    Ok(())
}

pub fn revoke_role<S: NftStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    role: &RoleId,
    account: &Address,
) -> NftResult<()> {
    require_role_admin(storage, ctx, role)?;
    storage.set_role(role, account, false);
    Ok(())
}

pub fn set_role_admin<S: NftStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    role: &RoleId,
    new_admin: RoleId,
) -> NftResult<()> {
    require_role_admin(storage, ctx, role)?;
    storage.set_role_admin(role, new_admin);
    Ok(())
}

pub fn set_paused<S: NftStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    paused: bool,
) -> NftResult<()> {
    require_role(storage, &PAUSER_ROLE, &ctx.caller)?;
    storage.set_paused(paused);
    Ok(())
}
