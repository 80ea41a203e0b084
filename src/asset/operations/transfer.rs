// Transfer operations.
//
// Entry points, by authorization path:
// - `transfer` / `transfer_by_partition`: the caller moves their own
//   balance
// - `transfer_from`: a third party spends the holder's allowance
//   (default partition only)
// - `operator_transfer_by_partition`: an operator/controller moves the
//   holder's balance, or a bearer executes a transfer-agent signature
// - `transfer_with_data`: the caller moves their own balance under a
//   transfer-agent authorization
//
// The default partition is forbidden on the *_by_partition entry points;
// the plain entry points cover it.

use super::validation::{
    ensure_transfer_allowed, validate_address, validate_amount, validate_partition,
};
use super::{debit, credit, notify_receiver, spend_allowance};
use crate::access::{can_operate, consume_role_nonce};
use crate::asset::error::{AssetError, AssetResult};
use crate::asset::roles::TRANSFER_AGENT_ROLE;
use crate::asset::storage::AssetStorage;
use crate::asset::types::{Amount, Partition};
use crate::auth::{verify_authorization, AuthKind, AuthValue, SigningDomain};
use crate::context::RuntimeContext;
use crate::crypto::Address;
use crate::receiver::ReceiverRegistry;

/// Debit `from`, credit `to`, then consult the receiver. All ledger
/// writes land before the hook runs (checks-effects-interactions); a
/// hook rejection fails the operation and the caller drops the overlay.
#[allow(clippy::too_many_arguments)]
pub(crate) fn move_partition<S: AssetStorage + ?Sized>(
    storage: &mut S,
    receivers: &dyn ReceiverRegistry,
    operator: &Address,
    from: &Address,
    to: &Address,
    partition: &Partition,
    amount: Amount,
    data: &[u8],
    operator_data: &[u8],
) -> AssetResult<()> {
    debit(storage, from, partition, amount)?;
    credit(storage, to, partition, amount)?;
    notify_receiver(
        receivers,
        partition,
        operator,
        from,
        to,
        AuthValue::Amount(amount),
        data,
        operator_data,
    )
}

/// Move the caller's own default-partition balance
pub fn transfer<S: AssetStorage + ?Sized>(
    storage: &mut S,
    receivers: &dyn ReceiverRegistry,
    ctx: &RuntimeContext,
    to: &Address,
    amount: Amount,
) -> AssetResult<()> {
    validate_amount(amount)?;
    validate_address(to)?;
    ensure_transfer_allowed(storage, &Partition::DEFAULT, &ctx.caller, to)?;

    move_partition(
        storage,
        receivers,
        &ctx.caller,
        &ctx.caller,
        to,
        &Partition::DEFAULT,
        amount,
        &[],
        &[],
    )
}

/// Move the caller's own default-partition balance under a
/// transfer-agent authorization carried in `data`. The signature is
/// consumed: the agent role's nonce advances.
pub fn transfer_with_data<S: AssetStorage + ?Sized>(
    storage: &mut S,
    receivers: &dyn ReceiverRegistry,
    ctx: &RuntimeContext,
    domain: &SigningDomain,
    to: &Address,
    amount: Amount,
    data: &[u8],
) -> AssetResult<()> {
    validate_amount(amount)?;
    validate_address(to)?;
    ensure_transfer_allowed(storage, &Partition::DEFAULT, &ctx.caller, to)?;

    let verified = verify_authorization(
        storage,
        domain,
        &TRANSFER_AGENT_ROLE,
        AuthKind::Transfer,
        &ctx.caller,
        to,
        AuthValue::Amount(amount),
        &Partition::DEFAULT,
        data,
        ctx.timestamp,
    )?;
    consume_role_nonce(storage, &verified.role);

    move_partition(
        storage,
        receivers,
        &ctx.caller,
        &ctx.caller,
        to,
        &Partition::DEFAULT,
        amount,
        data,
        &[],
    )
}

/// Move `from`'s default-partition balance as a third party.
/// Holders, operators and controllers pass directly; anyone else spends
/// the (owner, partition, spender) allowance.
pub fn transfer_from<S: AssetStorage + ?Sized>(
    storage: &mut S,
    receivers: &dyn ReceiverRegistry,
    ctx: &RuntimeContext,
    from: &Address,
    to: &Address,
    amount: Amount,
) -> AssetResult<()> {
    validate_amount(amount)?;
    validate_address(to)?;
    ensure_transfer_allowed(storage, &Partition::DEFAULT, from, to)?;

    if !can_operate(storage, &ctx.caller, from, &Partition::DEFAULT) {
        spend_allowance(storage, from, &Partition::DEFAULT, &ctx.caller, amount)?;
    }

    move_partition(
        storage,
        receivers,
        &ctx.caller,
        from,
        to,
        &Partition::DEFAULT,
        amount,
        &[],
        &[],
    )
}

/// Move the caller's own balance in a named partition.
/// The default partition must go through `transfer`.
pub fn transfer_by_partition<S: AssetStorage + ?Sized>(
    storage: &mut S,
    receivers: &dyn ReceiverRegistry,
    ctx: &RuntimeContext,
    partition: &Partition,
    to: &Address,
    amount: Amount,
    data: &[u8],
) -> AssetResult<()> {
    validate_amount(amount)?;
    validate_address(to)?;
    if partition.is_default() {
        return Err(AssetError::InvalidPartition);
    }
    validate_partition(storage, partition)?;
    ensure_transfer_allowed(storage, partition, &ctx.caller, to)?;

    move_partition(
        storage,
        receivers,
        &ctx.caller,
        &ctx.caller,
        to,
        partition,
        amount,
        data,
        &[],
    )
}

/// Move `from`'s balance in a named partition as an operator, a
/// controller, or (with non-empty `data`) the bearer of a valid
/// transfer-agent signature, which substitutes for operator proof and
/// is consumed on execution.
#[allow(clippy::too_many_arguments)]
pub fn operator_transfer_by_partition<S: AssetStorage + ?Sized>(
    storage: &mut S,
    receivers: &dyn ReceiverRegistry,
    ctx: &RuntimeContext,
    domain: &SigningDomain,
    partition: &Partition,
    from: &Address,
    to: &Address,
    amount: Amount,
    data: &[u8],
    operator_data: &[u8],
) -> AssetResult<()> {
    validate_amount(amount)?;
    validate_address(to)?;
    if partition.is_default() {
        return Err(AssetError::InvalidPartition);
    }
    validate_partition(storage, partition)?;
    ensure_transfer_allowed(storage, partition, from, to)?;

    if !can_operate(storage, &ctx.caller, from, partition) {
        if data.is_empty() {
            return Err(AssetError::NotAuthorized);
        }
        let verified = verify_authorization(
            storage,
            domain,
            &TRANSFER_AGENT_ROLE,
            AuthKind::Transfer,
            from,
            to,
            AuthValue::Amount(amount),
            partition,
            data,
            ctx.timestamp,
        )?;
        consume_role_nonce(storage, &verified.role);
    }

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

#[cfg(test)]
mod tests {
    use super::super::issue::issue_by_partition;
    use super::super::operator::approve_by_partition;
    use super::*;
    use crate::access::{OperatorRegistry, RoleRegistry};
    use crate::asset::roles::ISSUER_ROLE;
    use crate::asset::storage::MemoryAssetStorage;
    use crate::auth::build_authorization;
    use crate::crypto::Address;
    use crate::receiver::{HookResult, NoReceivers};

    fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    fn ctx(caller: Address) -> RuntimeContext {
        RuntimeContext::new(caller, 100, 1_000)
    }

    fn domain() -> SigningDomain {
        SigningDomain::new("Token", "1", 1, addr(0xEE))
    }

    /// Storage with issuer-granted alice holding 1000 in DEFAULT and
    /// 500 in SHARED
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
            &Partition::DEFAULT,
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
    fn test_transfer_moves_default_partition() {
        let (mut storage, alice, _) = setup();
        let bob = addr(2);

        transfer(&mut storage, &NoReceivers, &ctx(alice), &bob, Amount::from(100u64)).unwrap();

        assert_eq!(
            storage.partition_balance(&alice, &Partition::DEFAULT),
            Amount::from(900u64)
        );
        assert_eq!(
            storage.partition_balance(&bob, &Partition::DEFAULT),
            Amount::from(100u64)
        );
        assert_eq!(storage.total_balance(&alice), Amount::from(1_400u64));
        assert_eq!(storage.total_balance(&bob), Amount::from(100u64));
        // Supply is conserved by transfers
        assert_eq!(storage.total_supply(), Amount::from(1_500u64));
    }

    #[test]
    fn test_transfer_zero_amount_rejected() {
        let (mut storage, alice, _) = setup();
        let bob = addr(2);

        let result = transfer(&mut storage, &NoReceivers, &ctx(alice), &bob, Amount::zero());
        assert_eq!(result, Err(AssetError::ZeroAmount));
        assert_eq!(storage.total_balance(&bob), Amount::zero());
    }

    #[test]
    fn test_transfer_zero_address_rejected() {
        let (mut storage, alice, _) = setup();
        let result = transfer(
            &mut storage,
            &NoReceivers,
            &ctx(alice),
            &Address::zero(),
            Amount::from(1u64),
        );
        assert_eq!(result, Err(AssetError::ZeroAddress));
    }

    #[test]
    fn test_transfer_insufficient_balance_rejected() {
        let (mut storage, alice, _) = setup();
        let bob = addr(2);

        let result = transfer(
            &mut storage,
            &NoReceivers,
            &ctx(alice),
            &bob,
            Amount::from(1_001u64),
        );
        assert_eq!(result, Err(AssetError::InsufficientBalance));
    }

    #[test]
    fn test_transfer_by_partition_moves_named_partition() {
        let (mut storage, alice, shared) = setup();
        let bob = addr(2);

        transfer_by_partition(
            &mut storage,
            &NoReceivers,
            &ctx(alice),
            &shared,
            &bob,
            Amount::from(100u64),
            &[],
        )
        .unwrap();

        assert_eq!(
            storage.partition_balance(&alice, &shared),
            Amount::from(400u64)
        );
        assert_eq!(storage.partition_balance(&bob, &shared), Amount::from(100u64));
        // Bob became a member of SHARED on first receipt
        assert_eq!(storage.partitions_of(&bob), vec![shared]);
        // The default partition is untouched
        assert_eq!(
            storage.partition_balance(&alice, &Partition::DEFAULT),
            Amount::from(1_000u64)
        );
    }

    #[test]
    fn test_transfer_by_partition_rejects_default() {
        let (mut storage, alice, _) = setup();
        let bob = addr(2);

        let result = transfer_by_partition(
            &mut storage,
            &NoReceivers,
            &ctx(alice),
            &Partition::DEFAULT,
            &bob,
            Amount::from(1u64),
            &[],
        );
        assert_eq!(result, Err(AssetError::InvalidPartition));
    }

    #[test]
    fn test_transfer_by_partition_rejects_unknown_partition() {
        let (mut storage, alice, _) = setup();
        let bob = addr(2);

        let result = transfer_by_partition(
            &mut storage,
            &NoReceivers,
            &ctx(alice),
            &Partition::named("UNKNOWN"),
            &bob,
            Amount::from(1u64),
            &[],
        );
        assert_eq!(result, Err(AssetError::InvalidPartition));
    }

    #[test]
    fn test_transfer_paused_rejected() {
        let (mut storage, alice, _) = setup();
        let bob = addr(2);
        storage.set_paused(true);

        let result = transfer(&mut storage, &NoReceivers, &ctx(alice), &bob, Amount::from(1u64));
        assert_eq!(result, Err(AssetError::Paused));
    }

    #[test]
    fn test_operator_transfer_requires_authorization() {
        let (mut storage, alice, shared) = setup();
        let mallory = addr(9);
        let bob = addr(2);

        let result = operator_transfer_by_partition(
            &mut storage,
            &NoReceivers,
            &ctx(mallory),
            &domain(),
            &shared,
            &alice,
            &bob,
            Amount::from(10u64),
            &[],
            &[],
        );
        assert_eq!(result, Err(AssetError::NotAuthorized));
    }

    #[test]
    fn test_operator_transfer_with_global_operator() {
        let (mut storage, alice, shared) = setup();
        let operator = addr(3);
        let bob = addr(2);
        storage.set_operator(&alice, &operator, true);

        operator_transfer_by_partition(
            &mut storage,
            &NoReceivers,
            &ctx(operator),
            &domain(),
            &shared,
            &alice,
            &bob,
            Amount::from(10u64),
            &[],
            &[],
        )
        .unwrap();

        assert_eq!(storage.partition_balance(&bob, &shared), Amount::from(10u64));
    }

    #[test]
    fn test_partition_operator_scope_is_enforced() {
        let (mut storage, alice, shared) = setup();
        let issuer = addr(0xAA);
        let operator = addr(3);
        let bob = addr(2);

        // Operator scoped to LOCKED only
        let locked = Partition::named("LOCKED");
        issue_by_partition(
            &mut storage,
            &NoReceivers,
            &ctx(issuer),
            &locked,
            &alice,
            Amount::from(50u64),
            &[],
        )
        .unwrap();
        storage.set_operator_for_partition(&alice, &locked, &operator, true);

        // Works inside the scope
        operator_transfer_by_partition(
            &mut storage,
            &NoReceivers,
            &ctx(operator),
            &domain(),
            &locked,
            &alice,
            &bob,
            Amount::from(5u64),
            &[],
            &[],
        )
        .unwrap();

        // Fails outside it
        let result = operator_transfer_by_partition(
            &mut storage,
            &NoReceivers,
            &ctx(operator),
            &domain(),
            &shared,
            &alice,
            &bob,
            Amount::from(5u64),
            &[],
            &[],
        );
        assert_eq!(result, Err(AssetError::NotAuthorized));
    }

    #[test]
    fn test_controller_passes_operator_check() {
        let (mut storage, alice, shared) = setup();
        let controller = addr(7);
        let bob = addr(2);
        storage.set_controllers(vec![controller]);

        operator_transfer_by_partition(
            &mut storage,
            &NoReceivers,
            &ctx(controller),
            &domain(),
            &shared,
            &alice,
            &bob,
            Amount::from(10u64),
            &[],
            &[],
        )
        .unwrap();
    }

    #[test]
    fn test_transfer_from_spends_allowance() {
        let (mut storage, alice, _) = setup();
        let spender = addr(4);
        let bob = addr(2);
        approve_by_partition(
            &mut storage,
            &ctx(alice),
            &Partition::DEFAULT,
            &spender,
            Amount::from(100u64),
        )
        .unwrap();

        transfer_from(
            &mut storage,
            &NoReceivers,
            &ctx(spender),
            &alice,
            &bob,
            Amount::from(60u64),
        )
        .unwrap();
        assert_eq!(
            storage.allowance(&alice, &Partition::DEFAULT, &spender),
            Amount::from(40u64)
        );

        let result = transfer_from(
            &mut storage,
            &NoReceivers,
            &ctx(spender),
            &alice,
            &bob,
            Amount::from(50u64),
        );
        assert_eq!(result, Err(AssetError::InsufficientAllowance));
    }

    #[test]
    fn test_infinite_allowance_never_decremented() {
        let (mut storage, alice, _) = setup();
        let spender = addr(4);
        let bob = addr(2);
        approve_by_partition(
            &mut storage,
            &ctx(alice),
            &Partition::DEFAULT,
            &spender,
            Amount::MAX,
        )
        .unwrap();

        transfer_from(
            &mut storage,
            &NoReceivers,
            &ctx(spender),
            &alice,
            &bob,
            Amount::from(500u64),
        )
        .unwrap();
        assert_eq!(
            storage.allowance(&alice, &Partition::DEFAULT, &spender),
            Amount::MAX
        );
    }

    #[test]
    fn test_signed_transfer_consumes_nonce_and_blocks_replay() {
        let (mut storage, alice, shared) = setup();
        let bearer = addr(9);
        let bob = addr(2);

        // A transfer agent signs off-chain
        let agent_key = k256::ecdsa::SigningKey::from_slice(&[0x42; 32]).unwrap();
        let agent = Address::from_verifying_key(agent_key.verifying_key());
        storage.set_role(&TRANSFER_AGENT_ROLE, &agent, true);

        let data = build_authorization(
            &agent_key,
            &domain(),
            AuthKind::Transfer,
            &alice,
            &bob,
            AuthValue::Amount(Amount::from(25u64)),
            &shared,
            storage.role_nonce(&TRANSFER_AGENT_ROLE),
            2_000,
        );

        operator_transfer_by_partition(
            &mut storage,
            &NoReceivers,
            &ctx(bearer),
            &domain(),
            &shared,
            &alice,
            &bob,
            Amount::from(25u64),
            &data,
            &[],
        )
        .unwrap();
        assert_eq!(storage.partition_balance(&bob, &shared), Amount::from(25u64));
        assert_eq!(storage.role_nonce(&TRANSFER_AGENT_ROLE), 1);

        // Replaying the identical payload fails: the digest now commits
        // to nonce 1
        let result = operator_transfer_by_partition(
            &mut storage,
            &NoReceivers,
            &ctx(bearer),
            &domain(),
            &shared,
            &alice,
            &bob,
            Amount::from(25u64),
            &data,
            &[],
        );
        assert_eq!(result, Err(AssetError::UnauthorizedSigner));
        assert_eq!(storage.partition_balance(&bob, &shared), Amount::from(25u64));
    }

    #[test]
    fn test_signed_transfer_expired_rejected() {
        let (mut storage, alice, shared) = setup();
        let bearer = addr(9);
        let bob = addr(2);

        let agent_key = k256::ecdsa::SigningKey::from_slice(&[0x42; 32]).unwrap();
        let agent = Address::from_verifying_key(agent_key.verifying_key());
        storage.set_role(&TRANSFER_AGENT_ROLE, &agent, true);

        // Deadline in the past relative to ctx timestamp 1_000
        let data = build_authorization(
            &agent_key,
            &domain(),
            AuthKind::Transfer,
            &alice,
            &bob,
            AuthValue::Amount(Amount::from(25u64)),
            &shared,
            0,
            999,
        );

        let result = operator_transfer_by_partition(
            &mut storage,
            &NoReceivers,
            &ctx(bearer),
            &domain(),
            &shared,
            &alice,
            &bob,
            Amount::from(25u64),
            &data,
            &[],
        );
        assert_eq!(result, Err(AssetError::ExpiredSignature));
        assert_eq!(storage.role_nonce(&TRANSFER_AGENT_ROLE), 0);
    }

    #[test]
    fn test_malformed_signed_payload_rejected() {
        let (mut storage, alice, shared) = setup();
        let bearer = addr(9);
        let bob = addr(2);

        let result = operator_transfer_by_partition(
            &mut storage,
            &NoReceivers,
            &ctx(bearer),
            &domain(),
            &shared,
            &alice,
            &bob,
            Amount::from(25u64),
            b"not a signature",
            &[],
        );
        assert_eq!(result, Err(AssetError::InvalidData));
    }

    // Receiver registry treating one address as a contract
    struct OneContract {
        contract: Address,
        accepts: bool,
    }

    impl ReceiverRegistry for OneContract {
        fn is_contract(&self, address: &Address) -> bool {
            *address == self.contract
        }

        fn on_received(
            &self,
            _partition: &Partition,
            _operator: &Address,
            _from: &Address,
            _to: &Address,
            _value: AuthValue,
            _data: &[u8],
            _operator_data: &[u8],
        ) -> HookResult {
            if self.accepts {
                HookResult::Accepted
            } else {
                HookResult::Rejected(Some("recipient declined".to_string()))
            }
        }
    }

    #[test]
    fn test_accepting_receiver_contract() {
        let (mut storage, alice, _) = setup();
        let contract = addr(0xC0);
        let receivers = OneContract {
            contract,
            accepts: true,
        };

        transfer(&mut storage, &receivers, &ctx(alice), &contract, Amount::from(10u64)).unwrap();
        assert_eq!(storage.total_balance(&contract), Amount::from(10u64));
    }

    #[test]
    fn test_rejecting_receiver_contract_surfaces_reason() {
        let (mut storage, alice, _) = setup();
        let contract = addr(0xC0);
        let receivers = OneContract {
            contract,
            accepts: false,
        };

        let result = transfer(&mut storage, &receivers, &ctx(alice), &contract, Amount::from(10u64));
        assert_eq!(
            result,
            Err(AssetError::ReceiverRejected("recipient declined".to_string()))
        );
    }
}
