// NFT transfer.
//
// Authorization follows the same lattice as the fungible ledger: the
// owner, a global operator, an operator scoped to the token's
// partition, or a controller. A non-operator bearer may instead present
// a transfer-agent signature over the token id, which is consumed.
//
// State is written before the receiver hook runs
// (checks-effects-interactions); a rejection drops the overlay.

use super::{credit_token, debit_token, notify_receiver};
use crate::access::{can_operate, consume_role_nonce};
use crate::asset::roles::TRANSFER_AGENT_ROLE;
use crate::auth::{verify_authorization, AuthKind, AuthValue, SigningDomain};
use crate::context::RuntimeContext;
use crate::crypto::Address;
use crate::nft::error::{NftError, NftResult};
use crate::nft::storage::NftStorage;
use crate::receiver::ReceiverRegistry;

/// Transfer `token_id` to `to`.
///
/// With non-empty `data` and no operator rights, `data` must carry a
/// valid transfer-agent authorization for exactly this move.
#[allow(clippy::too_many_arguments)]
pub fn transfer_token<S: NftStorage + ?Sized>(
    storage: &mut S,
    receivers: &dyn ReceiverRegistry,
    ctx: &RuntimeContext,
    domain: &SigningDomain,
    token_id: u64,
    to: &Address,
    data: &[u8],
    operator_data: &[u8],
) -> NftResult<()> {
    if to.is_zero() {
        return Err(NftError::ZeroAddress);
    }

    let mut token = storage.token(token_id).ok_or(NftError::TokenNotFound)?;
    if token.owner == *to {
        return Err(NftError::SelfTransfer);
    }
    if storage.is_paused() {
        return Err(NftError::Paused);
    }

    if !can_operate(storage, &ctx.caller, &token.owner, &token.partition) {
        if data.is_empty() {
            return Err(NftError::NotAuthorized);
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
        )?;
        consume_role_nonce(storage, &verified.role);
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
