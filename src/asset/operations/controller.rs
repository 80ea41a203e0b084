// Controller operations: regulatory force-transfer and force-redeem.
//
// Callers must be in the contract-wide controller set. Controllers
// bypass allowance, operator and pause checks entirely; only balance
// sufficiency binds them. The whole capability can be switched off
// once, irreversibly.

use super::redeem::burn;
use super::transfer::move_partition;
use super::validation::{validate_address, validate_amount, validate_partition};
use super::require_role;
use crate::asset::error::{AssetError, AssetResult};
use crate::asset::roles::DEFAULT_ADMIN_ROLE;
use crate::asset::storage::AssetStorage;
use crate::asset::types::{Amount, Partition};
use crate::context::RuntimeContext;
use crate::crypto::Address;
use crate::receiver::ReceiverRegistry;

fn require_controller<S: AssetStorage + ?Sized>(
    storage: &S,
    ctx: &RuntimeContext,
) -> AssetResult<()> {
    if !storage.metadata().controllable {
        return Err(AssetError::ControllerDisabled);
    }
    if !storage.is_controller(&ctx.caller) {
        return Err(AssetError::NotController);
    }
    Ok(())
}

/// Force-move `from`'s balance in any partition (default included)
#[allow(clippy::too_many_arguments)]
pub fn controller_transfer<S: AssetStorage + ?Sized>(
    storage: &mut S,
    receivers: &dyn ReceiverRegistry,
    ctx: &RuntimeContext,
    partition: &Partition,
    from: &Address,
    to: &Address,
    amount: Amount,
    data: &[u8],
    operator_data: &[u8],
) -> AssetResult<()> {
    require_controller(storage, ctx)?;
    validate_amount(amount)?;
    validate_address(to)?;
    validate_partition(storage, partition)?;

    move_partition(
        storage,
        receivers,
        &ctx.caller,
        from,
        to,
        partition,
        amount,
        data,
        operator_data,
    )
}

/// Force-redeem `from`'s balance in any partition
pub fn controller_redeem<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    partition: &Partition,
    from: &Address,
    amount: Amount,
    _data: &[u8],
    _operator_data: &[u8],
) -> AssetResult<()> {
    require_controller(storage, ctx)?;
    validate_amount(amount)?;
    validate_partition(storage, partition)?;

    burn(storage, from, partition, amount)
}

/// Irreversibly disable controller operations. Admin-gated.
pub fn finalize_controllable<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
) -> AssetResult<()> {
    require_role(storage, &DEFAULT_ADMIN_ROLE, &ctx.caller)?;
    let mut metadata = storage.metadata();
    metadata.controllable = false;
    storage.set_metadata(&metadata);
    Ok(())
}

/// Add an address to the controller set. Admin-gated.
pub fn add_controller<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    controller: &Address,
) -> AssetResult<()> {
    require_role(storage, &DEFAULT_ADMIN_ROLE, &ctx.caller)?;
    validate_address(controller)?;
    if storage.is_controller(controller) {
        return Err(AssetError::AlreadyController);
    }

    let mut controllers = storage.controllers();
    controllers.push(*controller);
    storage.set_controllers(controllers);
    Ok(())
}

/// Remove an address from the controller set with swap-and-pop: the
/// last controller takes the removed slot, which changes iteration
/// order. Admin-gated.
pub fn remove_controller<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    controller: &Address,
) -> AssetResult<()> {
    require_role(storage, &DEFAULT_ADMIN_ROLE, &ctx.caller)?;

    let mut controllers = storage.controllers();
    let index = controllers
        .iter()
        .position(|existing| existing == controller)
        .ok_or(AssetError::NotAController)?;
    controllers.swap_remove(index);
    storage.set_controllers(controllers);
    Ok(())
}
