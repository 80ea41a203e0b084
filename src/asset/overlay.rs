//! Fungible Ledger Overlay
//!
//! An overlay accumulates every write of one mutating entry point on top
//! of a read-only base store. On success the change set is applied to
//! the base; on failure it is dropped, leaving the base untouched. This
//! is what makes each entry point all-or-nothing, including the case
//! where the receiver-acceptance hook rejects after the ledger writes
//! have already landed in the overlay.

use crate::access::{OperatorRegistry, RoleRegistry};
use crate::asset::roles::RoleId;
use crate::asset::storage::AssetStorage;
use crate::asset::types::{Amount, AssetMetadata, Document, Partition};
use crate::crypto::Address;
use std::collections::HashMap;

/// Key types for overlay storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetKey {
    Metadata,
    TotalSupply,
    PartitionSupply(Partition),
    TotalBalance(Address),
    PartitionBalance(Address, Partition),
    /// The whole ordered partition registry
    Partitions,
    /// The whole ordered membership set of one account
    Memberships(Address),
    Allowance {
        owner: Address,
        partition: Partition,
        spender: Address,
    },
    Operator {
        holder: Address,
        operator: Address,
    },
    PartitionOperator {
        holder: Address,
        partition: Partition,
        operator: Address,
    },
    Controllers,
    RoleGrant {
        role: RoleId,
        account: Address,
    },
    RoleAdmin(RoleId),
    RoleNonce(RoleId),
    Paused,
    AccountPaused(Address),
    PartitionPaused(Partition),
    Document(String),
    DocumentNames,
}

/// Value types for overlay storage
#[derive(Debug, Clone)]
pub enum AssetValue {
    Metadata(AssetMetadata),
    Amount(Amount),
    Partitions(Vec<Partition>),
    Flag(bool),
    Addresses(Vec<Address>),
    Role(RoleId),
    Nonce(u64),
    Document(Document),
    Names(Vec<String>),
    /// Tombstone marking a key as deleted
    Deleted,
}

/// Overlay over a base store
pub struct AssetOverlay<'a, S: AssetStorage> {
    base: &'a S,
    changes: HashMap<AssetKey, AssetValue>,
}

impl<'a, S: AssetStorage> AssetOverlay<'a, S> {
    pub fn new(base: &'a S) -> Self {
        Self {
            base,
            changes: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Consume the overlay, yielding the accumulated change set
    pub fn into_changes(self) -> HashMap<AssetKey, AssetValue> {
        self.changes
    }

    fn set(&mut self, key: AssetKey, value: AssetValue) {
        self.changes.insert(key, value);
    }
}

/// Apply a committed change set to a base store.
///
/// Keys are independent, so application order does not matter.
pub fn apply<S: AssetStorage>(base: &mut S, changes: HashMap<AssetKey, AssetValue>) {
    for (key, value) in changes {
        match (key, value) {
            (AssetKey::Metadata, AssetValue::Metadata(metadata)) => base.set_metadata(&metadata),
            (AssetKey::TotalSupply, AssetValue::Amount(amount)) => base.set_total_supply(amount),
            (AssetKey::PartitionSupply(partition), AssetValue::Amount(amount)) => {
                base.set_partition_supply(&partition, amount)
            }
            (AssetKey::TotalBalance(account), AssetValue::Amount(amount)) => {
                base.set_total_balance(&account, amount)
            }
            (AssetKey::PartitionBalance(account, partition), AssetValue::Amount(amount)) => {
                base.set_partition_balance(&account, &partition, amount)
            }
            (AssetKey::Partitions, AssetValue::Partitions(partitions)) => {
                for partition in partitions {
                    base.register_partition(&partition);
                }
            }
            (AssetKey::Memberships(account), AssetValue::Partitions(partitions)) => {
                for partition in partitions {
                    base.add_partition_member(&account, &partition);
                }
            }
            (
                AssetKey::Allowance {
                    owner,
                    partition,
                    spender,
                },
                AssetValue::Amount(amount),
            ) => base.set_allowance(&owner, &partition, &spender, amount),
            (AssetKey::Operator { holder, operator }, AssetValue::Flag(authorized)) => {
                base.set_operator(&holder, &operator, authorized)
            }
            (
                AssetKey::PartitionOperator {
                    holder,
                    partition,
                    operator,
                },
                AssetValue::Flag(authorized),
            ) => base.set_operator_for_partition(&holder, &partition, &operator, authorized),
            (AssetKey::Controllers, AssetValue::Addresses(controllers)) => {
                base.set_controllers(controllers)
            }
            (AssetKey::RoleGrant { role, account }, AssetValue::Flag(granted)) => {
                base.set_role(&role, &account, granted)
            }
            (AssetKey::RoleAdmin(role), AssetValue::Role(admin)) => {
                base.set_role_admin(&role, admin)
            }
            (AssetKey::RoleNonce(role), AssetValue::Nonce(nonce)) => {
                base.set_role_nonce(&role, nonce)
            }
            (AssetKey::Paused, AssetValue::Flag(paused)) => base.set_paused(paused),
            (AssetKey::AccountPaused(account), AssetValue::Flag(paused)) => {
                base.set_account_paused(&account, paused)
            }
            (AssetKey::PartitionPaused(partition), AssetValue::Flag(paused)) => {
                base.set_partition_paused(&partition, paused)
            }
            (AssetKey::Document(name), AssetValue::Document(document)) => {
                base.set_document(&name, &document)
            }
            (AssetKey::Document(name), AssetValue::Deleted) => {
                base.remove_document(&name);
            }
            // DocumentNames is derived by the base store itself
            (AssetKey::DocumentNames, _) => {}
            // Key/value pairs are produced only by the overlay setters
            // below; a mismatched pair cannot be constructed
            _ => {}
        }
    }
}

impl<S: AssetStorage> OperatorRegistry for AssetOverlay<'_, S> {
    fn is_operator(&self, holder: &Address, operator: &Address) -> bool {
        match self.changes.get(&AssetKey::Operator {
            holder: *holder,
            operator: *operator,
        }) {
            Some(AssetValue::Flag(authorized)) => *authorized,
            _ => self.base.is_operator(holder, operator),
        }
    }

    fn set_operator(&mut self, holder: &Address, operator: &Address, authorized: bool) {
        self.set(
            AssetKey::Operator {
                holder: *holder,
                operator: *operator,
            },
            AssetValue::Flag(authorized),
        );
    }

    fn is_operator_for_partition(
        &self,
        holder: &Address,
        partition: &Partition,
        operator: &Address,
    ) -> bool {
        match self.changes.get(&AssetKey::PartitionOperator {
            holder: *holder,
            partition: *partition,
            operator: *operator,
        }) {
            Some(AssetValue::Flag(authorized)) => *authorized,
            _ => self
                .base
                .is_operator_for_partition(holder, partition, operator),
        }
    }

    fn set_operator_for_partition(
        &mut self,
        holder: &Address,
        partition: &Partition,
        operator: &Address,
        authorized: bool,
    ) {
        self.set(
            AssetKey::PartitionOperator {
                holder: *holder,
                partition: *partition,
                operator: *operator,
            },
            AssetValue::Flag(authorized),
        );
    }

    fn is_controller(&self, account: &Address) -> bool {
        match self.changes.get(&AssetKey::Controllers) {
            Some(AssetValue::Addresses(controllers)) => controllers.contains(account),
            _ => self.base.is_controller(account),
        }
    }

    fn controllers(&self) -> Vec<Address> {
        match self.changes.get(&AssetKey::Controllers) {
            Some(AssetValue::Addresses(controllers)) => controllers.clone(),
            _ => self.base.controllers(),
        }
    }

    fn set_controllers(&mut self, controllers: Vec<Address>) {
        self.set(AssetKey::Controllers, AssetValue::Addresses(controllers));
    }
}

impl<S: AssetStorage> RoleRegistry for AssetOverlay<'_, S> {
    fn has_role(&self, role: &RoleId, account: &Address) -> bool {
        match self.changes.get(&AssetKey::RoleGrant {
            role: *role,
            account: *account,
        }) {
            Some(AssetValue::Flag(granted)) => *granted,
            _ => self.base.has_role(role, account),
        }
    }

    fn set_role(&mut self, role: &RoleId, account: &Address, granted: bool) {
        self.set(
            AssetKey::RoleGrant {
                role: *role,
                account: *account,
            },
            AssetValue::Flag(granted),
        );
    }

    fn role_admin(&self, role: &RoleId) -> RoleId {
        match self.changes.get(&AssetKey::RoleAdmin(*role)) {
            Some(AssetValue::Role(admin)) => *admin,
            _ => self.base.role_admin(role),
        }
    }

    fn set_role_admin(&mut self, role: &RoleId, admin: RoleId) {
        self.set(AssetKey::RoleAdmin(*role), AssetValue::Role(admin));
    }

    fn role_nonce(&self, role: &RoleId) -> u64 {
        match self.changes.get(&AssetKey::RoleNonce(*role)) {
            Some(AssetValue::Nonce(nonce)) => *nonce,
            _ => self.base.role_nonce(role),
        }
    }

    fn set_role_nonce(&mut self, role: &RoleId, nonce: u64) {
        self.set(AssetKey::RoleNonce(*role), AssetValue::Nonce(nonce));
    }
}

impl<S: AssetStorage> AssetStorage for AssetOverlay<'_, S> {
    fn metadata(&self) -> AssetMetadata {
        match self.changes.get(&AssetKey::Metadata) {
            Some(AssetValue::Metadata(metadata)) => metadata.clone(),
            _ => self.base.metadata(),
        }
    }

    fn set_metadata(&mut self, metadata: &AssetMetadata) {
        self.set(AssetKey::Metadata, AssetValue::Metadata(metadata.clone()));
    }

    fn total_balance(&self, account: &Address) -> Amount {
        match self.changes.get(&AssetKey::TotalBalance(*account)) {
            Some(AssetValue::Amount(amount)) => *amount,
            _ => self.base.total_balance(account),
        }
    }

    fn set_total_balance(&mut self, account: &Address, amount: Amount) {
        self.set(AssetKey::TotalBalance(*account), AssetValue::Amount(amount));
    }

    fn partition_balance(&self, account: &Address, partition: &Partition) -> Amount {
        match self
            .changes
            .get(&AssetKey::PartitionBalance(*account, *partition))
        {
            Some(AssetValue::Amount(amount)) => *amount,
            _ => self.base.partition_balance(account, partition),
        }
    }

    fn set_partition_balance(&mut self, account: &Address, partition: &Partition, amount: Amount) {
        self.set(
            AssetKey::PartitionBalance(*account, *partition),
            AssetValue::Amount(amount),
        );
    }

    fn total_supply(&self) -> Amount {
        match self.changes.get(&AssetKey::TotalSupply) {
            Some(AssetValue::Amount(amount)) => *amount,
            _ => self.base.total_supply(),
        }
    }

    fn set_total_supply(&mut self, supply: Amount) {
        self.set(AssetKey::TotalSupply, AssetValue::Amount(supply));
    }

    fn partition_supply(&self, partition: &Partition) -> Amount {
        match self.changes.get(&AssetKey::PartitionSupply(*partition)) {
            Some(AssetValue::Amount(amount)) => *amount,
            _ => self.base.partition_supply(partition),
        }
    }

    fn set_partition_supply(&mut self, partition: &Partition, supply: Amount) {
        self.set(
            AssetKey::PartitionSupply(*partition),
            AssetValue::Amount(supply),
        );
    }

    fn partitions(&self) -> Vec<Partition> {
        match self.changes.get(&AssetKey::Partitions) {
            Some(AssetValue::Partitions(partitions)) => partitions.clone(),
            _ => self.base.partitions(),
        }
    }

    fn is_registered_partition(&self, partition: &Partition) -> bool {
        match self.changes.get(&AssetKey::Partitions) {
            Some(AssetValue::Partitions(partitions)) => partitions.contains(partition),
            _ => self.base.is_registered_partition(partition),
        }
    }

    fn register_partition(&mut self, partition: &Partition) {
        let mut partitions = self.partitions();
        if !partitions.contains(partition) {
            partitions.push(*partition);
        }
        self.set(AssetKey::Partitions, AssetValue::Partitions(partitions));
    }

    fn partitions_of(&self, account: &Address) -> Vec<Partition> {
        match self.changes.get(&AssetKey::Memberships(*account)) {
            Some(AssetValue::Partitions(partitions)) => partitions.clone(),
            _ => self.base.partitions_of(account),
        }
    }

    fn is_partition_member(&self, account: &Address, partition: &Partition) -> bool {
        match self.changes.get(&AssetKey::Memberships(*account)) {
            Some(AssetValue::Partitions(partitions)) => partitions.contains(partition),
            _ => self.base.is_partition_member(account, partition),
        }
    }

    fn add_partition_member(&mut self, account: &Address, partition: &Partition) {
        let mut partitions = self.partitions_of(account);
        if !partitions.contains(partition) {
            partitions.push(*partition);
        }
        self.set(
            AssetKey::Memberships(*account),
            AssetValue::Partitions(partitions),
        );
    }

    fn allowance(&self, owner: &Address, partition: &Partition, spender: &Address) -> Amount {
        match self.changes.get(&AssetKey::Allowance {
            owner: *owner,
            partition: *partition,
            spender: *spender,
        }) {
            Some(AssetValue::Amount(amount)) => *amount,
            _ => self.base.allowance(owner, partition, spender),
        }
    }

    fn set_allowance(
        &mut self,
        owner: &Address,
        partition: &Partition,
        spender: &Address,
        amount: Amount,
    ) {
        self.set(
            AssetKey::Allowance {
                owner: *owner,
                partition: *partition,
                spender: *spender,
            },
            AssetValue::Amount(amount),
        );
    }

    fn is_paused(&self) -> bool {
        match self.changes.get(&AssetKey::Paused) {
            Some(AssetValue::Flag(paused)) => *paused,
            _ => self.base.is_paused(),
        }
    }

    fn set_paused(&mut self, paused: bool) {
        self.set(AssetKey::Paused, AssetValue::Flag(paused));
    }

    fn is_account_paused(&self, account: &Address) -> bool {
        match self.changes.get(&AssetKey::AccountPaused(*account)) {
            Some(AssetValue::Flag(paused)) => *paused,
            _ => self.base.is_account_paused(account),
        }
    }

    fn set_account_paused(&mut self, account: &Address, paused: bool) {
        self.set(AssetKey::AccountPaused(*account), AssetValue::Flag(paused));
    }

    fn is_partition_paused(&self, partition: &Partition) -> bool {
        match self.changes.get(&AssetKey::PartitionPaused(*partition)) {
            Some(AssetValue::Flag(paused)) => *paused,
            _ => self.base.is_partition_paused(partition),
        }
    }

    fn set_partition_paused(&mut self, partition: &Partition, paused: bool) {
        self.set(
            AssetKey::PartitionPaused(*partition),
            AssetValue::Flag(paused),
        );
    }

    fn document(&self, name: &str) -> Option<Document> {
        match self.changes.get(&AssetKey::Document(name.to_string())) {
            Some(AssetValue::Document(document)) => Some(document.clone()),
            Some(AssetValue::Deleted) => None,
            _ => self.base.document(name),
        }
    }

    fn set_document(&mut self, name: &str, document: &Document) {
        self.set(
            AssetKey::Document(name.to_string()),
            AssetValue::Document(document.clone()),
        );
    }

    fn remove_document(&mut self, name: &str) -> bool {
        if self.document(name).is_none() {
            return false;
        }
        self.set(AssetKey::Document(name.to_string()), AssetValue::Deleted);
        true
    }

    fn document_names(&self) -> Vec<String> {
        // Base names, minus tombstones, plus names added in this overlay
        let mut names: Vec<String> = self
            .base
            .document_names()
            .into_iter()
            .filter(|name| {
                !matches!(
                    self.changes.get(&AssetKey::Document(name.clone())),
                    Some(AssetValue::Deleted)
                )
            })
            .collect();
        for (key, value) in &self.changes {
            if let (AssetKey::Document(name), AssetValue::Document(_)) = (key, value) {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::storage::MemoryAssetStorage;

    #[test]
    fn test_reads_fall_through_to_base() {
        let mut base = MemoryAssetStorage::new();
        let alice = Address::new([1; 20]);
        base.set_total_balance(&alice, Amount::from(100u64));

        let overlay = AssetOverlay::new(&base);
        assert_eq!(overlay.total_balance(&alice), Amount::from(100u64));
        assert!(overlay.is_empty());
    }

    #[test]
    fn test_writes_stay_in_overlay_until_applied() {
        let mut base = MemoryAssetStorage::new();
        let alice = Address::new([1; 20]);
        base.set_total_balance(&alice, Amount::from(100u64));

        let mut overlay = AssetOverlay::new(&base);
        overlay.set_total_balance(&alice, Amount::from(40u64));
        assert_eq!(overlay.total_balance(&alice), Amount::from(40u64));
        assert_eq!(base.total_balance(&alice), Amount::from(100u64));

        let changes = overlay.into_changes();
        apply(&mut base, changes);
        assert_eq!(base.total_balance(&alice), Amount::from(40u64));
    }

    #[test]
    fn test_dropped_overlay_changes_nothing() {
        let mut base = MemoryAssetStorage::new();
        let alice = Address::new([1; 20]);
        base.set_total_balance(&alice, Amount::from(100u64));

        {
            let mut overlay = AssetOverlay::new(&base);
            overlay.set_total_balance(&alice, Amount::zero());
            overlay.register_partition(&Partition::named("SHARED"));
            // dropped without apply
        }

        assert_eq!(base.total_balance(&alice), Amount::from(100u64));
        assert!(base.partitions().is_empty());
    }

    #[test]
    fn test_partition_registration_merges_with_base() {
        let mut base = MemoryAssetStorage::new();
        let a = Partition::named("A");
        let b = Partition::named("B");
        base.register_partition(&a);

        let mut overlay = AssetOverlay::new(&base);
        overlay.register_partition(&b);
        assert!(overlay.is_registered_partition(&a));
        assert!(overlay.is_registered_partition(&b));
        assert_eq!(overlay.partitions(), vec![a, b]);

        let changes = overlay.into_changes();
        apply(&mut base, changes);
        assert_eq!(base.partitions(), vec![a, b]);
    }

    #[test]
    fn test_document_tombstone() {
        let mut base = MemoryAssetStorage::new();
        let doc = Document {
            hash: crate::crypto::hash(b"doc"),
            uri: "ipfs://doc".to_string(),
            last_modified: 1,
        };
        base.set_document("charter", &doc);

        let mut overlay = AssetOverlay::new(&base);
        assert!(overlay.remove_document("charter"));
        assert!(overlay.document("charter").is_none());
        assert!(overlay.document_names().is_empty());
        assert!(base.document("charter").is_some());

        let changes = overlay.into_changes();
        apply(&mut base, changes);
        assert!(base.document("charter").is_none());
    }
}
