// Redemption (burn) operations.
//
// Symmetric to issuance: the ledger is debited and both supply counters
// shrink. Authorization: the holder themselves, an operator/controller,
// or the bearer of a redeemer-role signature. A signature attached by
// the holder is still verified and consumed.

use super::validation::{validate_amount, validate_partition};
use super::debit;
use crate::access::{can_operate, consume_role_nonce};
use crate::asset::error::{AssetError, AssetResult};
use crate::asset::roles::REDEEMER_ROLE;
use crate::asset::storage::AssetStorage;
use crate::asset::types::{Amount, Partition};
use crate::auth::{verify_authorization, AuthKind, AuthValue, SigningDomain};
use crate::context::RuntimeContext;
use crate::crypto::Address;

/// Debit `from` and shrink the supply counters
pub(crate) fn burn<S: AssetStorage + ?Sized>(
    storage: &mut S,
    from: &Address,
    partition: &Partition,
    amount: Amount,
) -> AssetResult<()> {
    debit(storage, from, partition, amount)?;

    let partition_supply = storage
        .partition_supply(partition)
        .checked_sub(amount)
        .ok_or(AssetError::InsufficientBalance)?;
    storage.set_partition_supply(partition, partition_supply);

    let total_supply = storage
        .total_supply()
        .checked_sub(amount)
        .ok_or(AssetError::InsufficientBalance)?;
    storage.set_total_supply(total_supply);
    Ok(())
}

/// Verify and consume a redeemer authorization over `(from, amount,
/// partition)`
fn consume_redeemer_authorization<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    domain: &SigningDomain,
    from: &Address,
    partition: &Partition,
    amount: Amount,
    data: &[u8],
) -> AssetResult<()> {
    let verified = verify_authorization(
        storage,
        domain,
        &REDEEMER_ROLE,
        AuthKind::Redemption,
        from,
        &Address::zero(),
        AuthValue::Amount(amount),
        partition,
        data,
        ctx.timestamp,
    )?;
    consume_role_nonce(storage, &verified.role);
    Ok(())
}

/// Redeem the caller's own default-partition balance. Non-empty `data`
/// must carry a valid redeemer authorization, which is consumed.
pub fn redeem<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    domain: &SigningDomain,
    amount: Amount,
    data: &[u8],
) -> AssetResult<()> {
    validate_amount(amount)?;

    if !data.is_empty() {
        consume_redeemer_authorization(
            storage,
            ctx,
            domain,
            &ctx.caller,
            &Partition::DEFAULT,
            amount,
            data,
        )?;
    }

    burn(storage, &ctx.caller, &Partition::DEFAULT, amount)
}

/// Redeem `from`'s default-partition balance as a third party: an
/// operator/controller passes directly, anyone else must bear a
/// redeemer authorization.
pub fn redeem_from<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    domain: &SigningDomain,
    from: &Address,
    amount: Amount,
    data: &[u8],
) -> AssetResult<()> {
    validate_amount(amount)?;

    if !can_operate(storage, &ctx.caller, from, &Partition::DEFAULT) {
        if data.is_empty() {
            return Err(AssetError::NotAuthorized);
        }
        consume_redeemer_authorization(
            storage,
            ctx,
            domain,
            from,
            &Partition::DEFAULT,
            amount,
            data,
        )?;
    }

    burn(storage, from, &Partition::DEFAULT, amount)
}

/// Redeem the caller's own balance in a named partition
pub fn redeem_by_partition<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    domain: &SigningDomain,
    partition: &Partition,
    amount: Amount,
    data: &[u8],
) -> AssetResult<()> {
    validate_amount(amount)?;
    if partition.is_default() {
        return Err(AssetError::InvalidPartition);
    }
    validate_partition(storage, partition)?;

    if !data.is_empty() {
        consume_redeemer_authorization(storage, ctx, domain, &ctx.caller, partition, amount, data)?;
    }

    burn(storage, &ctx.caller, partition, amount)
}

/// Redeem `from`'s balance in a named partition as an operator, a
/// controller, or the bearer of a redeemer authorization
#[allow(clippy::too_many_arguments)]
pub fn operator_redeem_by_partition<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    domain: &SigningDomain,
    partition: &Partition,
    from: &Address,
    amount: Amount,
    data: &[u8],
    _operator_data: &[u8],
) -> AssetResult<()> {
    validate_amount(amount)?;
    if partition.is_default() {
        return Err(AssetError::InvalidPartition);
    }
    validate_partition(storage, partition)?;

    if !can_operate(storage, &ctx.caller, from, partition) {
        if data.is_empty() {
            return Err(AssetError::NotAuthorized);
        }
        consume_redeemer_authorization(storage, ctx, domain, from, partition, amount, data)?;
    }

    burn(storage, from, partition, amount)
}

#[cfg(test)]
mod tests {
    use super::super::issue::{issue, issue_by_partition};
    use super::*;
    use crate::access::{OperatorRegistry, RoleRegistry};
    use crate::asset::roles::ISSUER_ROLE;
    use crate::asset::storage::MemoryAssetStorage;
    use crate::auth::build_authorization;
    use crate::receiver::NoReceivers;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    fn ctx(caller: Address) -> RuntimeContext {
        RuntimeContext::new(caller, 100, 1_000)
    }

    fn domain() -> SigningDomain {
        SigningDomain::new("Token", "1", 1, addr(0xEE))
    }

    fn setup() -> (MemoryAssetStorage, Address, Partition) {
        let mut storage = MemoryAssetStorage::new();
        let issuer = addr(0xAA);
        let alice = addr(1);
        let shared = Partition::named("SHARED");
        storage.set_role(&ISSUER_ROLE, &issuer, true);

        issue(
            &mut storage,
            &NoReceivers,
            &ctx(issuer),
            &alice,
            Amount::from(1_000u64),
            &[],
        )
        .unwrap();
        issue_by_partition(
            &mut storage,
            &NoReceivers,
            &ctx(issuer),
            &shared,
            &alice,
            Amount::from(500u64),
            &[],
        )
        .unwrap();

        (storage, alice, shared)
    }

    #[test]
    fn test_holder_redeems_own_balance() {
        let (mut storage, alice, _) = setup();

        redeem(&mut storage, &ctx(alice), &domain(), Amount::from(100u64), &[]).unwrap();

        assert_eq!(
            storage.partition_balance(&alice, &Partition::DEFAULT),
            Amount::from(900u64)
        );
        assert_eq!(
            storage.partition_supply(&Partition::DEFAULT),
            Amount::from(900u64)
        );
        assert_eq!(storage.total_supply(), Amount::from(1_400u64));
    }

    #[test]
    fn test_redeem_zero_amount_rejected() {
        let (mut storage, alice, _) = setup();
        let result = redeem(&mut storage, &ctx(alice), &domain(), Amount::zero(), &[]);
        assert_eq!(result, Err(AssetError::ZeroAmount));
    }

    #[test]
    fn test_redeem_insufficient_balance_rejected() {
        let (mut storage, alice, _) = setup();
        let result = redeem(
            &mut storage,
            &ctx(alice),
            &domain(),
            Amount::from(1_001u64),
            &[],
        );
        assert_eq!(result, Err(AssetError::InsufficientBalance));
    }

    #[test]
    fn test_membership_survives_draining_partition() {
        let (mut storage, alice, shared) = setup();

        redeem_by_partition(
            &mut storage,
            &ctx(alice),
            &domain(),
            &shared,
            Amount::from(500u64),
            &[],
        )
        .unwrap();

        assert_eq!(storage.partition_balance(&alice, &shared), Amount::zero());
        // Draining a partition never retracts membership
        assert!(storage.is_partition_member(&alice, &shared));
        assert!(storage.partitions_of(&alice).contains(&shared));
    }

    #[test]
    fn test_signed_redemption_consumed_once() {
        let (mut storage, alice, _) = setup();

        let redeemer_key = k256::ecdsa::SigningKey::from_slice(&[0x77; 32]).unwrap();
        let redeemer = Address::from_verifying_key(redeemer_key.verifying_key());
        storage.set_role(&REDEEMER_ROLE, &redeemer, true);

        // Signature bound to nonce 0
        let data = build_authorization(
            &redeemer_key,
            &domain(),
            AuthKind::Redemption,
            &alice,
            &Address::zero(),
            AuthValue::Amount(Amount::from(100u64)),
            &Partition::DEFAULT,
            0,
            2_000,
        );

        redeem(&mut storage, &ctx(alice), &domain(), Amount::from(100u64), &data).unwrap();
        assert_eq!(storage.role_nonce(&REDEEMER_ROLE), 1);

        // Reusing the identical signature bytes fails: the role nonce is
        // now 1
        let result = redeem(&mut storage, &ctx(alice), &domain(), Amount::from(100u64), &data);
        assert_eq!(result, Err(AssetError::UnauthorizedSigner));
        assert_eq!(
            storage.partition_balance(&alice, &Partition::DEFAULT),
            Amount::from(900u64)
        );
    }

    #[test]
    fn test_redeem_from_requires_authorization() {
        let (mut storage, alice, _) = setup();
        let mallory = addr(9);

        let result = redeem_from(
            &mut storage,
            &ctx(mallory),
            &domain(),
            &alice,
            Amount::from(10u64),
            &[],
        );
        assert_eq!(result, Err(AssetError::NotAuthorized));
    }

    #[test]
    fn test_operator_redeems_holder_balance() {
        let (mut storage, alice, shared) = setup();
        let operator = addr(3);
        storage.set_operator(&alice, &operator, true);

        operator_redeem_by_partition(
            &mut storage,
            &ctx(operator),
            &domain(),
            &shared,
            &alice,
            Amount::from(50u64),
            &[],
            &[],
        )
        .unwrap();

        assert_eq!(storage.partition_balance(&alice, &shared), Amount::from(450u64));
        assert_eq!(storage.partition_supply(&shared), Amount::from(450u64));
    }

    #[test]
    fn test_bearer_redeems_with_redeemer_signature() {
        let (mut storage, alice, shared) = setup();
        let bearer = addr(9);

        let redeemer_key = k256::ecdsa::SigningKey::from_slice(&[0x77; 32]).unwrap();
        let redeemer = Address::from_verifying_key(redeemer_key.verifying_key());
        storage.set_role(&REDEEMER_ROLE, &redeemer, true);

        let data = build_authorization(
            &redeemer_key,
            &domain(),
            AuthKind::Redemption,
            &alice,
            &Address::zero(),
            AuthValue::Amount(Amount::from(50u64)),
            &shared,
            0,
            2_000,
        );

        operator_redeem_by_partition(
            &mut storage,
            &ctx(bearer),
            &domain(),
            &shared,
            &alice,
            Amount::from(50u64),
            &data,
            &[],
        )
        .unwrap();
        assert_eq!(storage.partition_balance(&alice, &shared), Amount::from(450u64));
    }

    #[test]
    fn test_redeem_by_partition_rejects_default() {
        let (mut storage, alice, _) = setup();
        let result = redeem_by_partition(
            &mut storage,
            &ctx(alice),
            &domain(),
            &Partition::DEFAULT,
            Amount::from(1u64),
            &[],
        );
        assert_eq!(result, Err(AssetError::InvalidPartition));
    }
}
