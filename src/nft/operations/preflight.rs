// NFT read-only transfer preflight.
//
// Same status-code space as the fungible ledger; never mutates state
// and never consumes a signature nonce.

use crate::access::can_operate;
use crate::asset::roles::TRANSFER_AGENT_ROLE;
use crate::asset::status::{TransferCheck, TransferStatus, TRANSFER_OK};
use crate::auth::{verify_authorization, AuthError, AuthKind, AuthValue, SigningDomain};
use crate::context::RuntimeContext;
use crate::crypto::Address;
use crate::nft::storage::NftStorage;

fn auth_failure_reason(error: AuthError) -> &'static str {
    match error {
        AuthError::MalformedPayload => "malformed authorization data",
        AuthError::ExpiredSignature => "authorization expired",
        AuthError::InvalidSignature => "invalid signature",
        AuthError::UnauthorizedSigner => "signer does not hold the required role",
    }
}

/// Would `transfer_token(token_id, to, data, ..)` by `ctx.caller`
/// succeed?
pub fn can_transfer_token<S: NftStorage + ?Sized>(
    storage: &S,
    ctx: &RuntimeContext,
    domain: &SigningDomain,
    token_id: u64,
    to: &Address,
    data: &[u8],
) -> TransferCheck {
    if to.is_zero() {
        return (TransferStatus::InvalidReceiver, "zero address recipient");
    }

    let token = match storage.token(token_id) {
        Some(token) => token,
        None => return (TransferStatus::Failure, "token not found"),
    };
    if token.owner == *to {
        return (TransferStatus::InvalidReceiver, "self transfer");
    }
    if storage.is_paused() {
        return (TransferStatus::TransfersHalted, "transfers paused");
    }

    if !can_operate(storage, &ctx.caller, &token.owner, &token.partition) {
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
            &token.owner,
            to,
            AuthValue::Token(token_id),
            &token.partition,
            data,
            ctx.timestamp,
        );
        if let Err(error) = verified {
            return (TransferStatus::InvalidOperator, auth_failure_reason(error));
        }
    }
    TRANSFER_OK
}
