// Partitioned NFT Ledger - Storage
//
// Abstract storage interface plus the in-memory reference backend.
// Ownership is tracked per discrete token id; balances are token counts
// per owner and per (owner, partition).

use crate::access::{OperatorRegistry, RoleRegistry};
use crate::asset::roles::{RoleId, DEFAULT_ADMIN_ROLE};
use crate::asset::types::Partition;
use crate::crypto::Address;
use crate::nft::types::{NftMetadata, PartitionedNft};
use indexmap::IndexSet;
use std::collections::{HashMap, HashSet};

/// Abstract storage interface for the NFT ledger
pub trait NftStorage: OperatorRegistry + RoleRegistry {
    // Ledger metadata
    fn metadata(&self) -> NftMetadata;
    fn set_metadata(&mut self, metadata: &NftMetadata);

    // Token records
    fn token(&self, token_id: u64) -> Option<PartitionedNft>;
    fn set_token(&mut self, token: &PartitionedNft);
    fn remove_token(&mut self, token_id: u64);
    fn token_exists(&self, token_id: u64) -> bool;

    // Token-count balances
    fn balance_of(&self, owner: &Address) -> u64;
    fn set_balance(&mut self, owner: &Address, count: u64);
    fn partition_balance(&self, owner: &Address, partition: &Partition) -> u64;
    fn set_partition_balance(&mut self, owner: &Address, partition: &Partition, count: u64);

    // Supplies (token counts)
    fn total_supply(&self) -> u64;
    fn set_total_supply(&mut self, supply: u64);
    fn partition_supply(&self, partition: &Partition) -> u64;
    fn set_partition_supply(&mut self, partition: &Partition, supply: u64);

    // Per-owner token enumeration (insertion ordered)
    fn tokens_of(&self, owner: &Address) -> Vec<u64>;
    fn set_owned_tokens(&mut self, owner: &Address, tokens: Vec<u64>);

    // Partition registry and membership (same semantics as the fungible
    // ledger: insertion ordered, membership never retracted)
    fn partitions(&self) -> Vec<Partition>;
    fn is_registered_partition(&self, partition: &Partition) -> bool;
    fn register_partition(&mut self, partition: &Partition);
    fn partitions_of(&self, account: &Address) -> Vec<Partition>;
    fn is_partition_member(&self, account: &Address, partition: &Partition) -> bool;
    fn add_partition_member(&mut self, account: &Address, partition: &Partition);

    // Pause gate
    fn is_paused(&self) -> bool;
    fn set_paused(&mut self, paused: bool);
}

/// In-memory reference backend
#[derive(Clone, Debug, Default)]
pub struct MemoryNftStorage {
    metadata: NftMetadata,

    tokens: HashMap<u64, PartitionedNft>,
    balances: HashMap<Address, u64>,
    partition_balances: HashMap<(Address, Partition), u64>,

    total_supply: u64,
    partition_supplies: HashMap<Partition, u64>,

    owned_tokens: HashMap<Address, Vec<u64>>,

    partitions: IndexSet<Partition>,
    memberships: HashMap<Address, IndexSet<Partition>>,

    operators: HashSet<(Address, Address)>,
    partition_operators: HashSet<(Address, Partition, Address)>,

    controllers: Vec<Address>,
    controller_index: HashMap<Address, usize>,

    roles: HashSet<(RoleId, Address)>,
    role_admins: HashMap<RoleId, RoleId>,
    role_nonces: HashMap<RoleId, u64>,

    paused: bool,
}

impl MemoryNftStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OperatorRegistry for MemoryNftStorage {
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

impl RoleRegistry for MemoryNftStorage {
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

impl NftStorage for MemoryNftStorage {
    fn metadata(&self) -> NftMetadata {
        self.metadata.clone()
    }

    fn set_metadata(&mut self, metadata: &NftMetadata) {
        self.metadata = metadata.clone();
    }

    fn token(&self, token_id: u64) -> Option<PartitionedNft> {
        self.tokens.get(&token_id).cloned()
    }

    fn set_token(&mut self, token: &PartitionedNft) {
        self.tokens.insert(token.token_id, token.clone());
    }

    fn remove_token(&mut self, token_id: u64) {
        self.tokens.remove(&token_id);
    }

    fn token_exists(&self, token_id: u64) -> bool {
        self.tokens.contains_key(&token_id)
    }

    fn balance_of(&self, owner: &Address) -> u64 {
        *self.balances.get(owner).unwrap_or(&0)
    }

    fn set_balance(&mut self, owner: &Address, count: u64) {
        self.balances.insert(*owner, count);
    }

    fn partition_balance(&self, owner: &Address, partition: &Partition) -> u64 {
        *self
            .partition_balances
            .get(&(*owner, *partition))
            .unwrap_or(&0)
    }

    fn set_partition_balance(&mut self, owner: &Address, partition: &Partition, count: u64) {
        self.partition_balances.insert((*owner, *partition), count);
    }

    fn total_supply(&self) -> u64 {
        self.total_supply
    }

    fn set_total_supply(&mut self, supply: u64) {
        self.total_supply = supply;
    }

    fn partition_supply(&self, partition: &Partition) -> u64 {
        *self.partition_supplies.get(partition).unwrap_or(&0)
    }

    fn set_partition_supply(&mut self, partition: &Partition, supply: u64) {
        self.partition_supplies.insert(*partition, supply);
    }

    fn tokens_of(&self, owner: &Address) -> Vec<u64> {
        self.owned_tokens.get(owner).cloned().unwrap_or_default()
    }

    fn set_owned_tokens(&mut self, owner: &Address, tokens: Vec<u64>) {
        self.owned_tokens.insert(*owner, tokens);
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

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}
