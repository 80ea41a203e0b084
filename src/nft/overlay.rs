// Partitioned NFT Ledger - Overlay
//
// Same commit-or-drop transaction mechanism as the fungible ledger's
// overlay, over the NFT storage surface.

use crate::access::{OperatorRegistry, RoleRegistry};
use crate::asset::roles::RoleId;
use crate::asset::types::Partition;
use crate::crypto::Address;
use crate::nft::storage::NftStorage;
use crate::nft::types::{NftMetadata, PartitionedNft};
use std::collections::HashMap;

/// Key types for overlay storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NftKey {
    Metadata,
    Token(u64),
    Balance(Address),
    PartitionBalance(Address, Partition),
    TotalSupply,
    PartitionSupply(Partition),
    OwnedTokens(Address),
    Partitions,
    Memberships(Address),
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
}

/// Value types for overlay storage
#[derive(Debug, Clone)]
pub enum NftValue {
    Metadata(NftMetadata),
    Token(PartitionedNft),
    Count(u64),
    TokenIds(Vec<u64>),
    Partitions(Vec<Partition>),
    Addresses(Vec<Address>),
    Flag(bool),
    Role(RoleId),
    /// Tombstone marking a token as removed
    Deleted,
}

/// Overlay over a base store
pub struct NftOverlay<'a, S: NftStorage> {
    base: &'a S,
    changes: HashMap<NftKey, NftValue>,
}

impl<'a, S: NftStorage> NftOverlay<'a, S> {
    pub fn new(base: &'a S) -> Self {
        Self {
            base,
            changes: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn into_changes(self) -> HashMap<NftKey, NftValue> {
        self.changes
    }

    fn set(&mut self, key: NftKey, value: NftValue) {
        self.changes.insert(key, value);
    }
}

/// Apply a committed change set to a base store
pub fn apply<S: NftStorage>(base: &mut S, changes: HashMap<NftKey, NftValue>) {
    for (key, value) in changes {
        match (key, value) {
            (NftKey::Metadata, NftValue::Metadata(metadata)) => base.set_metadata(&metadata),
            (NftKey::Token(_), NftValue::Token(token)) => base.set_token(&token),
            (NftKey::Token(token_id), NftValue::Deleted) => base.remove_token(token_id),
            (NftKey::Balance(owner), NftValue::Count(count)) => base.set_balance(&owner, count),
            (NftKey::PartitionBalance(owner, partition), NftValue::Count(count)) => {
                base.set_partition_balance(&owner, &partition, count)
            }
            (NftKey::TotalSupply, NftValue::Count(supply)) => base.set_total_supply(supply),
            (NftKey::PartitionSupply(partition), NftValue::Count(supply)) => {
                base.set_partition_supply(&partition, supply)
            }
            (NftKey::OwnedTokens(owner), NftValue::TokenIds(tokens)) => {
                base.set_owned_tokens(&owner, tokens)
            }
            (NftKey::Partitions, NftValue::Partitions(partitions)) => {
                for partition in partitions {
                    base.register_partition(&partition);
                }
            }
            (NftKey::Memberships(account), NftValue::Partitions(partitions)) => {
                for partition in partitions {
                    base.add_partition_member(&account, &partition);
                }
            }
            (NftKey::Operator { holder, operator }, NftValue::Flag(authorized)) => {
                base.set_operator(&holder, &operator, authorized)
            }
            (
                NftKey::PartitionOperator {
                    holder,
                    partition,
                    operator,
                },
                NftValue::Flag(authorized),
            ) => base.set_operator_for_partition(&holder, &partition, &operator, authorized),
            (NftKey::Controllers, NftValue::Addresses(controllers)) => {
                base.set_controllers(controllers)
            }
            (NftKey::RoleGrant { role, account }, NftValue::Flag(granted)) => {
                base.set_role(&role, &account, granted)
            }
            (NftKey::RoleAdmin(role), NftValue::Role(admin)) => base.set_role_admin(&role, admin),
            (NftKey::RoleNonce(role), NftValue::Count(nonce)) => base.set_role_nonce(&role, nonce),
            (NftKey::Paused, NftValue::Flag(paused)) => base.set_paused(paused),
            // Key/value pairs are produced only by the overlay setters;
            // a mismatched pair cannot be constructed
            _ => {}
        }
    }
}

impl<S: NftStorage> OperatorRegistry for NftOverlay<'_, S> {
    fn is_operator(&self, holder: &Address, operator: &Address) -> bool {
        match self.changes.get(&NftKey::Operator {
            holder: *holder,
            operator: *operator,
        }) {
            Some(NftValue::Flag(authorized)) => *authorized,
            _ => self.base.is_operator(holder, operator),
        }
    }

    fn set_operator(&mut self, holder: &Address, operator: &Address, authorized: bool) {
        self.set(
            NftKey::Operator {
                holder: *holder,
                operator: *operator,
            },
            NftValue::Flag(authorized),
        );
    }

    fn is_operator_for_partition(
        &self,
        holder: &Address,
        partition: &Partition,
        operator: &Address,
    ) -> bool {
        match self.changes.get(&NftKey::PartitionOperator {
            holder: *holder,
            partition: *partition,
            operator: *operator,
        }) {
            Some(NftValue::Flag(authorized)) => *authorized,
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
            NftKey::PartitionOperator {
                holder: *holder,
                partition: *partition,
                operator: *operator,
            },
            NftValue::Flag(authorized),
        );
    }

    fn is_controller(&self, account: &Address) -> bool {
        match self.changes.get(&NftKey::Controllers) {
            Some(NftValue::Addresses(controllers)) => controllers.contains(account),
            _ => self.base.is_controller(account),
        }
    }

    fn controllers(&self) -> Vec<Address> {
        match self.changes.get(&NftKey::Controllers) {
            Some(NftValue::Addresses(controllers)) => controllers.clone(),
            _ => self.base.controllers(),
        }
    }

    fn set_controllers(&mut self, controllers: Vec<Address>) {
        self.set(NftKey::Controllers, NftValue::Addresses(controllers));
    }
}

impl<S: NftStorage> RoleRegistry for NftOverlay<'_, S> {
    fn has_role(&self, role: &RoleId, account: &Address) -> bool {
        match self.changes.get(&NftKey::RoleGrant {
            role: *role,
            account: *account,
        }) {
            Some(NftValue::Flag(granted)) => *granted,
            _ => self.base.has_role(role, account),
        }
    }

    fn set_role(&mut self, role: &RoleId, account: &Address, granted: bool) {
        self.set(
            NftKey::RoleGrant {
                role: *role,
                account: *account,
            },
            NftValue::Flag(granted),
        );
    }

    fn role_admin(&self, role: &RoleId) -> RoleId {
        match self.changes.get(&NftKey::RoleAdmin(*role)) {
            Some(NftValue::Role(admin)) => *admin,
            _ => self.base.role_admin(role),
        }
    }

    fn set_role_admin(&mut self, role: &RoleId, admin: RoleId) {
        self.set(NftKey::RoleAdmin(*role), NftValue::Role(admin));
    }

    fn role_nonce(&self, role: &RoleId) -> u64 {
        match self.changes.get(&NftKey::RoleNonce(*role)) {
            Some(NftValue::Count(nonce)) => *nonce,
            _ => self.base.role_nonce(role),
        }
    }

    fn set_role_nonce(&mut self, role: &RoleId, nonce: u64) {
        self.set(NftKey::RoleNonce(*role), NftValue::Count(nonce));
    }
}

impl<S: NftStorage> NftStorage for NftOverlay<'_, S> {
    fn metadata(&self) -> NftMetadata {
        match self.changes.get(&NftKey::Metadata) {
            Some(NftValue::Metadata(metadata)) => metadata.clone(),
            _ => self.base.metadata(),
        }
    }

    fn set_metadata(&mut self, metadata: &NftMetadata) {
        self.set(NftKey::Metadata, NftValue::Metadata(metadata.clone()));
    }

    fn token(&self, token_id: u64) -> Option<PartitionedNft> {
        match self.changes.get(&NftKey::Token(token_id)) {
            Some(NftValue::Token(token)) => Some(token.clone()),
            Some(NftValue::Deleted) => None,
            _ => self.base.token(token_id),
        }
    }

    fn set_token(&mut self, token: &PartitionedNft) {
        self.set(NftKey::Token(token.token_id), NftValue::Token(token.clone()));
    }

    fn remove_token(&mut self, token_id: u64) {
        self.set(NftKey::Token(token_id), NftValue::Deleted);
    }

    fn token_exists(&self, token_id: u64) -> bool {
        self.token(token_id).is_some()
    }

    fn balance_of(&self, owner: &Address) -> u64 {
        match self.changes.get(&NftKey::Balance(*owner)) {
            Some(NftValue::Count(count)) => *count,
            _ => self.base.balance_of(owner),
        }
    }

    fn set_balance(&mut self, owner: &Address, count: u64) {
        self.set(NftKey::Balance(*owner), NftValue::Count(count));
    }

    fn partition_balance(&self, owner: &Address, partition: &Partition) -> u64 {
        match self
            .changes
            .get(&NftKey::PartitionBalance(*owner, *partition))
        {
            Some(NftValue::Count(count)) => *count,
            _ => self.base.partition_balance(owner, partition),
        }
    }

    fn set_partition_balance(&mut self, owner: &Address, partition: &Partition, count: u64) {
        self.set(
            NftKey::PartitionBalance(*owner, *partition),
            NftValue::Count(count),
        );
    }

    fn total_supply(&self) -> u64 {
        match self.changes.get(&NftKey::TotalSupply) {
            Some(NftValue::Count(supply)) => *supply,
            _ => self.base.total_supply(),
        }
    }

    fn set_total_supply(&mut self, supply: u64) {
        self.set(NftKey::TotalSupply, NftValue::Count(supply));
    }

    fn partition_supply(&self, partition: &Partition) -> u64 {
        match self.changes.get(&NftKey::PartitionSupply(*partition)) {
            Some(NftValue::Count(supply)) => *supply,
            _ => self.base.partition_supply(partition),
        }
    }

    fn set_partition_supply(&mut self, partition: &Partition, supply: u64) {
        self.set(NftKey::PartitionSupply(*partition), NftValue::Count(supply));
    }

    fn tokens_of(&self, owner: &Address) -> Vec<u64> {
        match self.changes.get(&NftKey::OwnedTokens(*owner)) {
            Some(NftValue::TokenIds(tokens)) => tokens.clone(),
            _ => self.base.tokens_of(owner),
        }
    }

    fn set_owned_tokens(&mut self, owner: &Address, tokens: Vec<u64>) {
        self.set(NftKey::OwnedTokens(*owner), NftValue::TokenIds(tokens));
    }

    fn partitions(&self) -> Vec<Partition> {
        match self.changes.get(&NftKey::Partitions) {
            Some(NftValue::Partitions(partitions)) => partitions.clone(),
            _ => self.base.partitions(),
        }
    }

    fn is_registered_partition(&self, partition: &Partition) -> bool {
        match self.changes.get(&NftKey::Partitions) {
            Some(NftValue::Partitions(partitions)) => partitions.contains(partition),
            _ => self.base.is_registered_partition(partition),
        }
    }

    fn register_partition(&mut self, partition: &Partition) {
        let mut partitions = self.partitions();
        if !partitions.contains(partition) {
            partitions.push(*partition);
        }
        self.set(NftKey::Partitions, NftValue::Partitions(partitions));
    }

    fn partitions_of(&self, account: &Address) -> Vec<Partition> {
        match self.changes.get(&NftKey::Memberships(*account)) {
            Some(NftValue::Partitions(partitions)) => partitions.clone(),
            _ => self.base.partitions_of(account),
        }
    }

    fn is_partition_member(&self, account: &Address, partition: &Partition) -> bool {
        match self.changes.get(&NftKey::Memberships(*account)) {
            Some(NftValue::Partitions(partitions)) => partitions.contains(partition),
            _ => self.base.is_partition_member(account, partition),
        }
    }

    fn add_partition_member(&mut self, account: &Address, partition: &Partition) {
        let mut partitions = self.partitions_of(account);
        if !partitions.contains(partition) {
            partitions.push(*partition);
        }
        self.set(
            NftKey::Memberships(*account),
            NftValue::Partitions(partitions),
        );
    }

    fn is_paused(&self) -> bool {
        match self.changes.get(&NftKey::Paused) {
            Some(NftValue::Flag(paused)) => *paused,
            _ => self.base.is_paused(),
        }
    }

    fn set_paused(&mut self, paused: bool) {
        self.set(NftKey::Paused, NftValue::Flag(paused));
    }
}
