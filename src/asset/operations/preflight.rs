// Read-only transfer preflight.
//
// Mirrors every guard of the mutating entry points but converts each
// one into a status code plus reason instead of an error, and never
// touches state. In particular, a signed payload is validated without
// consuming the role nonce, so a preflight never burns a live
// signature. Receiver-acceptance hooks are not invoked; a contract
// recipient's verdict is only known at execution time.

use crate::access::can_operate;
use crate::asset::status::{TransferCheck, TransferStatus, TRANSFER_OK};
use crate::asset::roles::TRANSFER_AGENT_ROLE;
use crate::asset::storage::AssetStorage;
use crate::asset::types::{Amount, Partition};
use crate::auth::{verify_authorization, AuthError, AuthKind, AuthValue, SigningDomain};
use crate::context::RuntimeContext;
use crate::crypto::Address;

fn check_common<S: AssetStorage + ?Sized>(
    storage: &S,
    partition: &Partition,
    from: &Address,
    to: &Address,
    amount: Amount,
) -> Option<TransferCheck> {
    if amount.is_zero() {
        return Some((TransferStatus::Failure, "zero amount"));
    }
    if to.is_zero() {
        return Some((TransferStatus::InvalidReceiver, "zero address recipient"));
    }
    if from.is_zero() {
        return Some((TransferStatus::InvalidSender, "zero address sender"));
    }
    if !partition.is_default() && !storage.is_registered_partition(partition) {
        return Some((TransferStatus::Failure, "unknown partition"));
    }
    if storage.is_paused() {
        return Some((TransferStatus::TransfersHalted, "transfers paused"));
    }
    if storage.is_account_paused(from) {
        return Some((TransferStatus::InvalidSender, "sender account paused"));
    }
    if storage.is_account_paused(to) {
        return Some((TransferStatus::InvalidReceiver, "recipient account paused"));
    }
    if storage.is_partition_paused(partition) {
        return Some((TransferStatus::FundsLocked, "partition paused"));
    }
    if storage.partition_balance(from, partition) < amount {
        return Some((
            TransferStatus::InsufficientBalance,
            "insufficient partition balance",
        ));
    }
    None
}

fn auth_failure_reason(error: AuthError) -> &'static str {
    match error {
        AuthError::MalformedPayload => "malformed authorization data",
        AuthError::ExpiredSignature => "authorization expired",
        AuthError::InvalidSignature => "invalid signature",
        AuthError::UnauthorizedSigner => "signer does not hold the required role",
    }
}

/// Would `transfer(to, amount)` by `ctx.caller` succeed?
pub fn can_transfer<S: AssetStorage + ?Sized>(
    storage: &S,
    ctx: &RuntimeContext,
    to: &Address,
    amount: Amount,
) -> TransferCheck {
    if let Some(check) = check_common(storage, &Partition::DEFAULT, &ctx.caller, to, amount) {
        return check;
    }
    TRANSFER_OK
}

/// Would `transfer_from(from, to, amount)` by `ctx.caller` succeed?
pub fn can_transfer_from<S: AssetStorage + ?Sized>(
    storage: &S,
    ctx: &RuntimeContext,
    from: &Address,
    to: &Address,
    amount: Amount,
) -> TransferCheck {
    if let Some(check) = check_common(storage, &Partition::DEFAULT, from, to, amount) {
        return check;
    }
    if !can_operate(storage, &ctx.caller, from, &Partition::DEFAULT) {
        let allowance = storage.allowance(from, &Partition::DEFAULT, &ctx.caller);
        if allowance != Amount::MAX && allowance < amount {
            return (
                TransferStatus::InsufficientAllowance,
                "insufficient allowance",
            );
        }
    }
    TRANSFER_OK
}

/// Would `operator_transfer_by_partition(partition, from, to, amount,
/// data, ..)` by `ctx.caller` succeed? A signed payload in `data` is
/// validated against the current nonce without consuming it.
#[allow(clippy::too_many_arguments)]
pub fn can_transfer_by_partition<S: AssetStorage + ?Sized>(
    storage: &S,
    ctx: &RuntimeContext,
    domain: &SigningDomain,
    partition: &Partition,
    from: &Address,
    to: &Address,
    amount: Amount,
    data: &[u8],
) -> TransferCheck {
    if partition.is_default() {
        return (TransferStatus::Failure, "default partition not allowed here");
    }
    if let Some(check) = check_common(storage, partition, from, to, amount) {
        return check;
    }
    if !can_operate(storage, &ctx.caller, from, partition) {
        if data.is_empty() {
            return (
                TransferStatus::InvalidOperator,
                "caller may not operate on holder",
            );
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
        );
        if let Err(error) = verified {
            return (TransferStatus::InvalidOperator, auth_failure_reason(error));
        }
    }
    TRANSFER_OK
}
