// NFT issuance.
//
// A token's partition is fixed here; ordinary transfers never change
// it. Issuance is the only path that registers new partitions.

use super::{credit_token, notify_receiver, require_role};
use crate::asset::roles::{DEFAULT_ADMIN_ROLE, ISSUER_ROLE};
use crate::asset::types::Partition;
use crate::context::RuntimeContext;
use crate::crypto::Address;
use crate::nft::error::{NftError, NftResult};
use crate::nft::storage::NftStorage;
use crate::nft::types::PartitionedNft;
use crate::receiver::ReceiverRegistry;

/// Parameters for issuing one token
#[derive(Clone, Debug)]
pub struct IssueTokenParams {
    pub token_id: u64,
    pub partition: Partition,
    pub to: Address,
    pub uri: Option<String>,
}

/// Issue a token into `params.partition` for `params.to`.
///
/// The receiver-acceptance hook runs after all ledger writes; issuance
/// is only observable if acceptance succeeds.
pub fn issue_token<S: NftStorage + ?Sized>(
    storage: &mut S,
    receivers: &dyn ReceiverRegistry,
    ctx: &RuntimeContext,
    params: IssueTokenParams,
    data: &[u8],
) -> NftResult<()> {
    require_role(storage, &ISSUER_ROLE, &ctx.caller)?;
    if !storage.metadata().issuable {
        return Err(NftError::IssuanceFinalized);
    }
    if params.to.is_zero() {
        return Err(NftError::ZeroAddress);
    }
    if storage.token_exists(params.token_id) {
        return Err(NftError::TokenAlreadyExists);
    }

    let token = PartitionedNft {
        token_id: params.token_id,
        owner: params.to,
        partition: params.partition,
        uri: params.uri,
    };
    token.validate()?;

    if !params.partition.is_default() {
        storage.register_partition(&params.partition);
    }

    storage.set_token(&token);
    credit_token(storage, &params.to, &params.partition, params.token_id)?;

    let partition_supply = storage
        .partition_supply(&params.partition)
        .checked_add(1)
        .ok_or(NftError::SupplyOverflow)?;
    storage.set_partition_supply(&params.partition, partition_supply);

    let total_supply = storage
        .total_supply()
        .checked_add(1)
        .ok_or(NftError::SupplyOverflow)?;
    storage.set_total_supply(total_supply);

    notify_receiver(
        receivers,
        &params.partition,
        &ctx.caller,
        &Address::zero(),
        &params.to,
        params.token_id,
        data,
        &[],
    )
}

/// Irreversibly close issuance. Admin-gated.
pub fn finalize_issuance<S: NftStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
) -> NftResult<()> {
    require_role(storage, &DEFAULT_ADMIN_ROLE, &ctx.caller)?;
    let mut metadata = storage.metadata();
    metadata.issuable = false;
    storage.set_metadata(&metadata);
    Ok(())
}
