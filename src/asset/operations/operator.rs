// Operator authorization and allowance management.
//
// Operator flags are holder-initiated and two-dimensional: a global
// flag covering every partition and independent partition-scoped flags.
// Revoking one never touches the other. Self-authorization is rejected.

use super::validation::{validate_address, validate_amount, validate_partition};
use crate::asset::error::{AssetError, AssetResult};
use crate::asset::storage::AssetStorage;
use crate::asset::types::{Amount, Partition};
use crate::context::RuntimeContext;
use crate::crypto::Address;

/// Grant `operator` the right to move any of the caller's partitions
pub fn authorize_operator<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    operator: &Address,
) -> AssetResult<()> {
    validate_address(operator)?;
    if *operator == ctx.caller {
        return Err(AssetError::SelfOperation);
    }
    storage.set_operator(&ctx.caller, operator, true);
    Ok(())
}

/// Revoke the caller's global operator flag for `operator`.
/// Partition-scoped flags are untouched.
pub fn revoke_operator<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    operator: &Address,
) -> AssetResult<()> {
    storage.set_operator(&ctx.caller, operator, false);
    Ok(())
}

/// Grant `operator` the right to move one partition of the caller
pub fn authorize_operator_by_partition<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    partition: &Partition,
    operator: &Address,
) -> AssetResult<()> {
    validate_address(operator)?;
    if *operator == ctx.caller {
        return Err(AssetError::SelfOperation);
    }
    validate_partition(storage, partition)?;
    storage.set_operator_for_partition(&ctx.caller, partition, operator, true);
    Ok(())
}

/// Revoke one partition-scoped operator flag. The global flag is
/// untouched.
pub fn revoke_operator_by_partition<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    partition: &Partition,
    operator: &Address,
) -> AssetResult<()> {
    storage.set_operator_for_partition(&ctx.caller, partition, operator, false);
    Ok(())
}

/// Batch sweep: clear the global flag and every partition-scoped flag
/// (default partition plus all partitions the caller is a member of)
/// for each listed address
pub fn revoke_operators<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    operators: &[Address],
) -> AssetResult<()> {
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

/// Set the default-partition allowance for `spender`
pub fn approve<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    spender: &Address,
    amount: Amount,
) -> AssetResult<()> {
    approve_by_partition(storage, ctx, &Partition::DEFAULT, spender, amount)
}

/// Set a partition-scoped allowance for `spender`.
/// `Amount::MAX` grants infinite allowance.
pub fn approve_by_partition<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    partition: &Partition,
    spender: &Address,
    amount: Amount,
) -> AssetResult<()> {
    validate_address(spender)?;
    validate_partition(storage, partition)?;
    storage.set_allowance(&ctx.caller, partition, spender, amount);
    Ok(())
}

/// Raise an allowance by `delta`, saturating at the infinite sentinel
pub fn increase_allowance<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    partition: &Partition,
    spender: &Address,
    delta: Amount,
) -> AssetResult<()> {
    validate_address(spender)?;
    validate_partition(storage, partition)?;
    validate_amount(delta)?;

    let current = storage.allowance(&ctx.caller, partition, spender);
    storage.set_allowance(&ctx.caller, partition, spender, current.saturating_add(delta));
    Ok(())
}

/// Lower an allowance by `delta`; going below zero is an error
pub fn decrease_allowance<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    partition: &Partition,
    spender: &Address,
    delta: Amount,
) -> AssetResult<()> {
    validate_address(spender)?;
    validate_partition(storage, partition)?;
    validate_amount(delta)?;

    let current = storage.allowance(&ctx.caller, partition, spender);
    if current < delta {
        return Err(AssetError::InsufficientAllowance);
    }
    storage.set_allowance(&ctx.caller, partition, spender, current - delta);
    Ok(())
}

/// Consume `amount` of the (owner, partition, spender) allowance.
/// The infinite sentinel is never decremented.
pub(crate) fn spend_allowance<S: AssetStorage + ?Sized>(
    storage: &mut S,
    owner: &Address,
    partition: &Partition,
    spender: &Address,
    amount: Amount,
) -> AssetResult<()> {
    let current = storage.allowance(owner, partition, spender);
    if current == Amount::MAX {
        return Ok(());
    }
    if current < amount {
        return Err(AssetError::InsufficientAllowance);
    }
    storage.set_allowance(owner, partition, spender, current - amount);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::issue::issue_by_partition;
    use super::*;
    use crate::access::{can_operate, OperatorRegistry, RoleRegistry};
    use crate::asset::roles::ISSUER_ROLE;
    use crate::asset::storage::MemoryAssetStorage;
    use crate::receiver::NoReceivers;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    fn ctx(caller: Address) -> RuntimeContext {
        RuntimeContext::new(caller, 100, 1_000)
    }

    fn setup() -> (MemoryAssetStorage, Address, Partition) {
        let mut storage = MemoryAssetStorage::new();
        let issuer = addr(0xAA);
        let alice = addr(1);
        let shared = Partition::named("SHARED");
        storage.set_role(&ISSUER_ROLE, &issuer, true);
        issue_by_partition(
            &mut storage,
            &NoReceivers,
            &ctx(issuer),
            &shared,
            &alice,
            Amount::from(100u64),
            &[],
        )
        .unwrap();
        (storage, alice, shared)
    }

    #[test]
    fn test_self_authorization_rejected() {
        let (mut storage, alice, shared) = setup();

        assert_eq!(
            authorize_operator(&mut storage, &ctx(alice), &alice),
            Err(AssetError::SelfOperation)
        );
        assert_eq!(
            authorize_operator_by_partition(&mut storage, &ctx(alice), &shared, &alice),
            Err(AssetError::SelfOperation)
        );
    }

    #[test]
    fn test_global_and_partition_flags_are_independent() {
        let (mut storage, alice, shared) = setup();
        let operator = addr(3);

        authorize_operator(&mut storage, &ctx(alice), &operator).unwrap();
        authorize_operator_by_partition(&mut storage, &ctx(alice), &shared, &operator).unwrap();

        // Revoking the global flag keeps the partition flag
        revoke_operator(&mut storage, &ctx(alice), &operator).unwrap();
        assert!(!storage.is_operator(&alice, &operator));
        assert!(storage.is_operator_for_partition(&alice, &shared, &operator));

        // And vice versa
        authorize_operator(&mut storage, &ctx(alice), &operator).unwrap();
        revoke_operator_by_partition(&mut storage, &ctx(alice), &shared, &operator).unwrap();
        assert!(storage.is_operator(&alice, &operator));
        assert!(!storage.is_operator_for_partition(&alice, &shared, &operator));
    }

    #[test]
    fn test_batch_revoke_sweeps_both_dimensions() {
        let (mut storage, alice, shared) = setup();
        let one = addr(3);
        let two = addr(4);

        authorize_operator(&mut storage, &ctx(alice), &one).unwrap();
        authorize_operator_by_partition(&mut storage, &ctx(alice), &shared, &one).unwrap();
        authorize_operator_by_partition(&mut storage, &ctx(alice), &shared, &two).unwrap();

        revoke_operators(&mut storage, &ctx(alice), &[one, two]).unwrap();

        assert!(!storage.is_operator(&alice, &one));
        assert!(!storage.is_operator_for_partition(&alice, &shared, &one));
        assert!(!storage.is_operator_for_partition(&alice, &shared, &two));
    }

    #[test]
    fn test_can_operate_lattice() {
        let (mut storage, alice, shared) = setup();
        let operator = addr(3);
        let controller = addr(7);
        let stranger = addr(9);

        // Holder
        assert!(can_operate(&storage, &alice, &alice, &shared));
        // Stranger
        assert!(!can_operate(&storage, &stranger, &alice, &shared));
        // Global operator
        authorize_operator(&mut storage, &ctx(alice), &operator).unwrap();
        assert!(can_operate(&storage, &operator, &alice, &shared));
        // Controller
        storage.set_controllers(vec![controller]);
        assert!(can_operate(&storage, &controller, &alice, &shared));
    }

    #[test]
    fn test_allowance_adjustments() {
        let (mut storage, alice, shared) = setup();
        let spender = addr(4);

        approve_by_partition(&mut storage, &ctx(alice), &shared, &spender, Amount::from(50u64))
            .unwrap();
        increase_allowance(&mut storage, &ctx(alice), &shared, &spender, Amount::from(30u64))
            .unwrap();
        assert_eq!(storage.allowance(&alice, &shared, &spender), Amount::from(80u64));

        decrease_allowance(&mut storage, &ctx(alice), &shared, &spender, Amount::from(20u64))
            .unwrap();
        assert_eq!(storage.allowance(&alice, &shared, &spender), Amount::from(60u64));

        assert_eq!(
            decrease_allowance(&mut storage, &ctx(alice), &shared, &spender, Amount::from(61u64)),
            Err(AssetError::InsufficientAllowance)
        );
    }

    #[test]
    fn test_spend_allowance_infinite_sentinel() {
        let (mut storage, alice, shared) = setup();
        let spender = addr(4);

        approve_by_partition(&mut storage, &ctx(alice), &shared, &spender, Amount::MAX).unwrap();
        spend_allowance(&mut storage, &alice, &shared, &spender, Amount::from(1_000u64)).unwrap();
        assert_eq!(storage.allowance(&alice, &shared, &spender), Amount::MAX);
    }

    #[test]
    fn test_approve_unknown_partition_rejected() {
        let (mut storage, alice, _) = setup();
        let spender = addr(4);
        assert_eq!(
            approve_by_partition(
                &mut storage,
                &ctx(alice),
                &Partition::named("UNKNOWN"),
                &spender,
                Amount::from(1u64)
            ),
            Err(AssetError::InvalidPartition)
        );
    }
}
