// NFT redemption.
//
// Redemption removes the ownership record entirely and shrinks both
// supply counters. Authorization: the owner, an operator/controller,
// or the bearer of a redeemer-role signature (consumed on execution).

use super::debit_token;
use crate::access::{can_operate, consume_role_nonce};
use crate::asset::roles::REDEEMER_ROLE;
use crate::auth::{verify_authorization, AuthKind, AuthValue, SigningDomain};
use crate::context::RuntimeContext;
use crate::crypto::Address;
use crate::nft::error::{NftError, NftResult};
use crate::nft::storage::NftStorage;

/// Redeem (burn) `token_id`
pub fn redeem_token<S: NftStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    domain: &SigningDomain,
    token_id: u64,
    data: &[u8],
) -> NftResult<()> {
    let token = storage.token(token_id).ok_or(NftError::TokenNotFound)?;

    if data.is_empty() {
        if !can_operate(storage, &ctx.caller, &token.owner, &token.partition) {
            return Err(NftError::NotAuthorized);
        }
    } else {
        // Presented signatures are always verified and consumed, even
        // when the caller is already authorized
        let verified = verify_authorization(
            storage,
            domain,
            &REDEEMER_ROLE,
            AuthKind::Redemption,
            &token.owner,
            &Address::zero(),
            AuthValue::Token(token_id),
            &token.partition,
            data,
            ctx.timestamp,
        )?;
        consume_role_nonce(storage, &verified.role);
    }

    burn_token(storage, token_id)
}

/// Remove the ownership record and shrink the supply counters
pub(crate) fn burn_token<S: NftStorage + ?Sized>(
    storage: &mut S,
    token_id: u64,
) -> NftResult<()> {
    let token = storage.token(token_id).ok_or(NftError::TokenNotFound)?;

    debit_token(storage, &token.owner, &token.partition, token_id)?;
    storage.remove_token(token_id);

    let partition_supply = storage
        .partition_supply(&token.partition)
        .checked_sub(1)
        .ok_or(NftError::TokenNotFound)?;
    storage.set_partition_supply(&token.partition, partition_supply);

    let total_supply = storage
        .total_supply()
        .checked_sub(1)
        .ok_or(NftError::TokenNotFound)?;
    storage.set_total_supply(total_supply);
    Ok(())
}
