// NFT controller override: force-transfer and force-redeem.

use super::redeem::burn_token;
use super::{credit_token, debit_token, notify_receiver, require_role};
use crate::asset::roles::DEFAULT_ADMIN_ROLE;
use crate::context::RuntimeContext;
use crate::crypto::Address;
use crate::nft::error::{NftError, NftResult};
use crate::nft::storage::NftStorage;
use crate::receiver::ReceiverRegistry;

fn require_controller<S: NftStorage + ?Sized>(
    storage: &S,
    ctx: &RuntimeContext,
) -> NftResult<()> {
    if !storage.metadata().controllable {
        return Err(NftError::ControllerDisabled);
    }
    if !storage.is_controller(&ctx.caller) {
        return Err(NftError::NotController);
    }
    Ok(())
}

/// Force-move `token_id` to `to`, bypassing operator checks and the
/// pause gate
pub fn controller_transfer_token<S: NftStorage + ?Sized>(
    storage: &mut S,
    receivers: &dyn ReceiverRegistry,
    ctx: &RuntimeContext,
    token_id: u64,
    to: &Address,
    data: &[u8],
    operator_data: &[u8],
) -> NftResult<()> {
    require_controller(storage, ctx)?;
    if to.is_zero() {
        return Err(NftError::ZeroAddress);
    }

    let mut token = storage.token(token_id).ok_or(NftError::TokenNotFound)?;
    if token.owner == *to {
        return Err(NftError::SelfTransfer);
    }

    let from = token.owner;
    let partition = token.partition;

    token.owner = *to;
    storage.set_token(&token);

    debit_token(storage, &from, &partition, token_id)?;
    credit_token(storage, to, &partition, token_id)?;

    notify_receiver(
        receivers,
        &partition,
        &ctx.caller,
        &from,
        to,
        token_id,
        data,
        operator_data,
    )
}

/// Force-redeem `token_id`
pub fn controller_redeem_token<S: NftStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    token_id: u64,
    _data: &[u8],
    _operator_data: &[u8],
) -> NftResult<()> {
    require_controller(storage, ctx)?;
    burn_token(storage, token_id)
}

/// Irreversibly disable controller operations. Admin-gated.
pub fn finalize_controllable<S: NftStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
) -> NftResult<()> {
    require_role(storage, &DEFAULT_ADMIN_ROLE, &ctx.caller)?;
    let mut metadata = storage.metadata();
    metadata.controllable = false;
    storage.set_metadata(&metadata);
    Ok(())
}

/// Add an address to the controller set. Admin-gated.
pub fn add_controller<S: NftStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    controller: &Address,
) -> NftResult<()> {
    require_role(storage, &DEFAULT_ADMIN_ROLE, &ctx.caller)?;
    if controller.is_zero() {
        return Err(NftError::ZeroAddress);
    }
    if storage.is_controller(controller) {
        return Err(NftError::AlreadyController);
    }

    let mut controllers = storage.controllers();
    controllers.push(*controller);
    storage.set_controllers(controllers);
    Ok(())
}

/// Remove an address from the controller set (swap-and-pop). Admin-gated.
pub fn remove_controller<S: NftStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    controller: &Address,
) -> NftResult<()> {
    require_role(storage, &DEFAULT_ADMIN_ROLE, &ctx.caller)?;

    let mut controllers = storage.controllers();
    let index = controllers
        .iter()
        .position(|existing| existing == controller)
        .ok_or(NftError::NotAController)?;
    controllers.swap_remove(index);
    storage.set_controllers(controllers);
    Ok(())
}
