// Input validation shared by all entry points.

use crate::asset::error::{AssetError, AssetResult};
use crate::asset::storage::AssetStorage;
use crate::asset::types::{Amount, Partition};
use crate::crypto::Address;

/// Zero-amount transfers are rejected everywhere: an error, not a no-op
pub fn validate_amount(amount: Amount) -> AssetResult<()> {
    if amount.is_zero() {
        return Err(AssetError::ZeroAmount);
    }
    Ok(())
}

/// The zero address is never a valid participant
pub fn validate_address(address: &Address) -> AssetResult<()> {
    if address.is_zero() {
        return Err(AssetError::ZeroAddress);
    }
    Ok(())
}

/// A partition is valid if it is the default partition or has been
/// registered by a prior issuance
pub fn validate_partition<S: AssetStorage + ?Sized>(
    storage: &S,
    partition: &Partition,
) -> AssetResult<()> {
    if partition.is_default() || storage.is_registered_partition(partition) {
        Ok(())
    } else {
        Err(AssetError::InvalidPartition)
    }
}

/// Consult the pause gates before any transfer
pub fn ensure_transfer_allowed<S: AssetStorage + ?Sized>(
    storage: &S,
    partition: &Partition,
    from: &Address,
    to: &Address,
) -> AssetResult<()> {
    if storage.is_paused() {
        return Err(AssetError::Paused);
    }
    if storage.is_account_paused(from) || storage.is_account_paused(to) {
        return Err(AssetError::AccountPaused);
    }
    if storage.is_partition_paused(partition) {
        return Err(AssetError::PartitionPaused);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::storage::MemoryAssetStorage;

    #[test]
    fn test_zero_amount_rejected() {
        assert_eq!(validate_amount(Amount::zero()), Err(AssetError::ZeroAmount));
        assert!(validate_amount(Amount::from(1u64)).is_ok());
    }

    #[test]
    fn test_zero_address_rejected() {
        assert_eq!(
            validate_address(&Address::zero()),
            Err(AssetError::ZeroAddress)
        );
        assert!(validate_address(&Address::new([1; 20])).is_ok());
    }

    #[test]
    fn test_default_partition_always_valid() {
        let storage = MemoryAssetStorage::new();
        assert!(validate_partition(&storage, &Partition::DEFAULT).is_ok());
        assert_eq!(
            validate_partition(&storage, &Partition::named("UNKNOWN")),
            Err(AssetError::InvalidPartition)
        );
    }

    #[test]
    fn test_registered_partition_valid() {
        let mut storage = MemoryAssetStorage::new();
        let shared = Partition::named("SHARED");
        storage.register_partition(&shared);
        assert!(validate_partition(&storage, &shared).is_ok());
    }

    #[test]
    fn test_pause_gates() {
        let mut storage = MemoryAssetStorage::new();
        let alice = Address::new([1; 20]);
        let bob = Address::new([2; 20]);
        let shared = Partition::named("SHARED");

        assert!(ensure_transfer_allowed(&storage, &shared, &alice, &bob).is_ok());

        storage.set_paused(true);
        assert_eq!(
            ensure_transfer_allowed(&storage, &shared, &alice, &bob),
            Err(AssetError::Paused)
        );
        storage.set_paused(false);

        storage.set_account_paused(&bob, true);
        assert_eq!(
            ensure_transfer_allowed(&storage, &shared, &alice, &bob),
            Err(AssetError::AccountPaused)
        );
        storage.set_account_paused(&bob, false);

        storage.set_partition_paused(&shared, true);
        assert_eq!(
            ensure_transfer_allowed(&storage, &shared, &alice, &bob),
            Err(AssetError::PartitionPaused)
        );
    }
}
