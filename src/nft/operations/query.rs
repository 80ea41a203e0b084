// NFT read-only queries.

use crate::asset::types::Partition;
use crate::crypto::Address;
use crate::nft::error::{NftError, NftResult};
use crate::nft::storage::NftStorage;

/// Current owner of `token_id`
pub fn owner_of<S: NftStorage + ?Sized>(storage: &S, token_id: u64) -> NftResult<Address> {
    storage
        .token(token_id)
        .map(|token| token.owner)
        .ok_or(NftError::TokenNotFound)
}

/// Partition `token_id` belongs to
pub fn partition_of<S: NftStorage + ?Sized>(
    storage: &S,
    token_id: u64,
) -> NftResult<Partition> {
    storage
        .token(token_id)
        .map(|token| token.partition)
        .ok_or(NftError::TokenNotFound)
}

/// All token ids held by `owner`, in acquisition order
pub fn tokens_of<S: NftStorage + ?Sized>(storage: &S, owner: &Address) -> Vec<u64> {
    storage.tokens_of(owner)
}

/// Token ids held by `owner` within one partition
pub fn tokens_of_partition<S: NftStorage + ?Sized>(
    storage: &S,
    owner: &Address,
    partition: &Partition,
) -> Vec<u64> {
    storage
        .tokens_of(owner)
        .into_iter()
        .filter(|token_id| {
            storage
                .token(*token_id)
                .map(|token| token.partition == *partition)
                .unwrap_or(false)
        })
        .collect()
}
