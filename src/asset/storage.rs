//! Fungible Ledger Storage
//!
//! Abstract storage interface for ledger operations plus the in-memory
//! reference backend. Runtime integrations provide their own backends;
//! operations only ever see the trait.
//!
//! Ordering guarantees the backend must provide:
//! - the partition registry and each account's membership set keep
//!   insertion order and answer membership in O(1)
//! - the controller list keeps its order under swap-and-pop removal
//!   (the last element takes the removed element's position)

use crate::access::{OperatorRegistry, RoleRegistry};
use crate::asset::roles::{RoleId, DEFAULT_ADMIN_ROLE};
use crate::asset::types::{Amount, AssetMetadata, Document, Partition};
use crate::crypto::Address;
use indexmap::IndexSet;
use std::collections::{HashMap, HashSet};

/// Abstract storage interface for the fungible ledger
pub trait AssetStorage: OperatorRegistry + RoleRegistry {
    // Token metadata
    fn metadata(&self) -> AssetMetadata;
    fn set_metadata(&mut self, metadata: &AssetMetadata);

    // Balances
    fn total_balance(&self, account: &Address) -> Amount;
    fn set_total_balance(&mut self, account: &Address, amount: Amount);
    fn partition_balance(&self, account: &Address, partition: &Partition) -> Amount;
    fn set_partition_balance(&mut self, account: &Address, partition: &Partition, amount: Amount);

    // Supplies
    fn total_supply(&self) -> Amount;
    fn set_total_supply(&mut self, supply: Amount);
    fn partition_supply(&self, partition: &Partition) -> Amount;
    fn set_partition_supply(&mut self, partition: &Partition, supply: Amount);

    // Partition registry (non-default partitions, insertion ordered)
    fn partitions(&self) -> Vec<Partition>;
    fn is_registered_partition(&self, partition: &Partition) -> bool;
    fn register_partition(&mut self, partition: &Partition);

    // Per-account partition membership (insertion ordered, never retracted)
    fn partitions_of(&self, account: &Address) -> Vec<Partition>;
    fn is_partition_member(&self, account: &Address, partition: &Partition) -> bool;
    fn add_partition_member(&mut self, account: &Address, partition: &Partition);

    // Allowances, keyed (owner, partition, spender)
    fn allowance(&self, owner: &Address, partition: &Partition, spender: &Address) -> Amount;
    fn set_allowance(
        &mut self,
        owner: &Address,
        partition: &Partition,
        spender: &Address,
        amount: Amount,
    );

    // Pause gates
    fn is_paused(&self) -> bool;
    fn set_paused(&mut self, paused: bool);
    fn is_account_paused(&self, account: &Address) -> bool;
    fn set_account_paused(&mut self, account: &Address, paused: bool);
    fn is_partition_paused(&self, partition: &Partition) -> bool;
    fn set_partition_paused(&mut self, partition: &Partition, paused: bool);

    // Document registry
    fn document(&self, name: &str) -> Option<Document>;
    fn set_document(&mut self, name: &str, document: &Document);
    fn remove_document(&mut self, name: &str) -> bool;
    fn document_names(&self) -> Vec<String>;
}

/// In-memory reference backend
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetStorage {
    metadata: AssetMetadata,

    total_balances: HashMap<Address, Amount>,
    partition_balances: HashMap<(Address, Partition), Amount>,

    total_supply: Amount,
    partition_supplies: HashMap<Partition, Amount>,

    partitions: IndexSet<Partition>,
    memberships: HashMap<Address, IndexSet<Partition>>,

    allowances: HashMap<(Address, Partition, Address), Amount>,

    operators: HashSet<(Address, Address)>,
    partition_operators: HashSet<(Address, Partition, Address)>,

    controllers: Vec<Address>,
    controller_index: HashMap<Address, usize>,

    roles: HashSet<(RoleId, Address)>,
    role_admins: HashMap<RoleId, RoleId>,
    role_nonces: HashMap<RoleId, u64>,

    paused: bool,
    paused_accounts: HashSet<Address>,
    paused_partitions: HashSet<Partition>,

    documents: HashMap<String, Document>,
    document_names: Vec<String>,
}

impl MemoryAssetStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OperatorRegistry for MemoryAssetStorage {
    fn is_operator(&self, holder: &Address, operator: &Address) -> bool {
        self.operators.contains(&(*holder, *operator))
    }

    fn set_operator(&mut self, holder: &Address, operator: &Address, authorized: bool) {
        if authorized {
            self.operators.insert((*holder, *operator));
        } else {
            self.operators.remove(&(*holder, *operator));
        }
    }

    fn is_operator_for_partition(
        &self,
        holder: &Address,
        partition: &Partition,
        operator: &Address,
    ) -> bool {
        self.partition_operators
            .contains(&(*holder, *partition, *operator))
    }

    fn set_operator_for_partition(
        &mut self,
        holder: &Address,
        partition: &Partition,
        operator: &Address,
        authorized: bool,
    ) {
        if authorized {
            self.partition_operators
                .insert((*holder, *partition, *operator));
        } else {
            self.partition_operators
                .remove(&(*holder, *partition, *operator));
        }
    }

    fn is_controller(&self, account: &Address) -> bool {
        // Position index keeps the lookup O(1); the guard against stale
        // entries is re-checking the stored address at that position
        match self.controller_index.get(account) {
            Some(index) => self.controllers.get(*index) == Some(account),
            None => false,
        }
    }

    fn controllers(&self) -> Vec<Address> {
        self.controllers.clone()
    }

    fn set_controllers(&mut self, controllers: Vec<Address>) {
        self.controller_index = controllers
            .iter()
            .enumerate()
            .map(|(index, controller)| (*controller, index))
            .collect();
        self.controllers = controllers;
    }
}

impl RoleRegistry for MemoryAssetStorage {
    fn has_role(&self, role: &RoleId, account: &Address) -> bool {
        self.roles.contains(&(*role, *account))
    }

    fn set_role(&mut self, role: &RoleId, account: &Address, granted: bool) {
        if granted {
            self.roles.insert((*role, *account));
        } else {
            self.roles.remove(&(*role, *account));
        }
    }

    fn role_admin(&self, role: &RoleId) -> RoleId {
        *self.role_admins.get(role).unwrap_or(&DEFAULT_ADMIN_ROLE)
    }

    fn set_role_admin(&mut self, role: &RoleId, admin: RoleId) {
        self.role_admins.insert(*role, admin);
    }

    fn role_nonce(&self, role: &RoleId) -> u64 {
        *self.role_nonces.get(role).unwrap_or(&0)
    }

    fn set_role_nonce(&mut self, role: &RoleId, nonce: u64) {
        self.role_nonces.insert(*role, nonce);
    }
}

impl AssetStorage for MemoryAssetStorage {
    fn metadata(&self) -> AssetMetadata {
        self.metadata.clone()
    }

    fn set_metadata(&mut self, metadata: &AssetMetadata) {
        self.metadata = metadata.clone();
    }

    fn total_balance(&self, account: &Address) -> Amount {
        *self.total_balances.get(account).unwrap_or(&Amount::zero())
    }

    fn set_total_balance(&mut self, account: &Address, amount: Amount) {
        self.total_balances.insert(*account, amount);
    }

    fn partition_balance(&self, account: &Address, partition: &Partition) -> Amount {
        *self
            .partition_balances
            .get(&(*account, *partition))
            .unwrap_or(&Amount::zero())
    }

    fn set_partition_balance(&mut self, account: &Address, partition: &Partition, amount: Amount) {
        self.partition_balances.insert((*account, *partition), amount);
    }

    fn total_supply(&self) -> Amount {
        self.total_supply
    }

    fn set_total_supply(&mut self, supply: Amount) {
        self.total_supply = supply;
    }

    fn partition_supply(&self, partition: &Partition) -> Amount {
        *self
            .partition_supplies
            .get(partition)
            .unwrap_or(&Amount::zero())
    }

    fn set_partition_supply(&mut self, partition: &Partition, supply: Amount) {
        self.partition_supplies.insert(*partition, supply);
    }

    fn partitions(&self) -> Vec<Partition> {
        self.partitions.iter().copied().collect()
    }

    fn is_registered_partition(&self, partition: &Partition) -> bool {
        self.partitions.contains(partition)
    }

    fn register_partition(&mut self, partition: &Partition) {
        self.partitions.insert(*partition);
    }

    fn partitions_of(&self, account: &Address) -> Vec<Partition> {
        self.memberships
            .get(account)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    fn is_partition_member(&self, account: &Address, partition: &Partition) -> bool {
        self.memberships
            .get(account)
            .map(|set| set.contains(partition))
            .unwrap_or(false)
    }

    fn add_partition_member(&mut self, account: &Address, partition: &Partition) {
        self.memberships
            .entry(*account)
            .or_default()
            .insert(*partition);
    }

    fn allowance(&self, owner: &Address, partition: &Partition, spender: &Address) -> Amount {
        *self
            .allowances
            .get(&(*owner, *partition, *spender))
            .unwrap_or(&Amount::zero())
    }

    fn set_allowance(
        &mut self,
        owner: &Address,
        partition: &Partition,
        spender: &Address,
        amount: Amount,
    ) {
        self.allowances.insert((*owner, *partition, *spender), amount);
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    fn is_account_paused(&self, account: &Address) -> bool {
        self.paused_accounts.contains(account)
    }

    fn set_account_paused(&mut self, account: &Address, paused: bool) {
        if paused {
            self.paused_accounts.insert(*account);
        } else {
            self.paused_accounts.remove(account);
        }
    }

    fn is_partition_paused(&self, partition: &Partition) -> bool {
        self.paused_partitions.contains(partition)
    }

    fn set_partition_paused(&mut self, partition: &Partition, paused: bool) {
        if paused {
            self.paused_partitions.insert(*partition);
        } else {
            self.paused_partitions.remove(partition);
        }
    }

    fn document(&self, name: &str) -> Option<Document> {
        self.documents.get(name).cloned()
    }

    fn set_document(&mut self, name: &str, document: &Document) {
        if !self.documents.contains_key(name) {
            self.document_names.push(name.to_string());
        }
        self.documents.insert(name.to_string(), document.clone());
    }

    fn remove_document(&mut self, name: &str) -> bool {
        if self.documents.remove(name).is_some() {
            self.document_names.retain(|existing| existing != name);
            true
        } else {
            false
        }
    }

    fn document_names(&self) -> Vec<String> {
        self.document_names.clone()
    }
}
