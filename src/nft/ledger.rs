// Partitioned NFT Ledger Facade
//
// `NftLedger` mirrors `TokenLedger` for the non-fungible variant: it
// owns the in-memory store, the signing domain and the receiver
// registry, and runs every mutating call through an overlay so each
// entry point is all-or-nothing.

use crate::access::{OperatorRegistry, RoleRegistry};
use crate::asset::constants::SIGNING_DOMAIN_VERSION;
use crate::asset::roles::{RoleId, DEFAULT_ADMIN_ROLE};
use crate::asset::status::TransferCheck;
use crate::asset::types::Partition;
use crate::auth::{AuthValue, SigningDomain};
use crate::context::RuntimeContext;
use crate::crypto::Address;
use crate::nft::error::{NftError, NftResult};
use crate::nft::operations as ops;
use crate::nft::operations::IssueTokenParams;
use crate::nft::overlay::{self, NftOverlay};
use crate::nft::storage::{MemoryNftStorage, NftStorage};
use crate::nft::types::{NftMetadata, PartitionedNft};
use crate::observer::{TransferEvent, TransferKind, TransferObserver};
use crate::receiver::{NoReceivers, ReceiverRegistry};
use log::debug;

/// Construction parameters for an NFT ledger
#[derive(Clone, Debug)]
pub struct NftLedgerConfig {
    pub name: String,
    pub symbol: String,
    pub chain_id: u64,
    pub ledger_address: Address,
}

/// The partitioned non-fungible token ledger
pub struct NftLedger {
    store: MemoryNftStorage,
    domain: SigningDomain,
    receivers: Box<dyn ReceiverRegistry>,
    observers: Vec<Box<dyn TransferObserver>>,
}

impl NftLedger {
    pub fn new(config: NftLedgerConfig, admin: Address) -> NftResult<Self> {
        if admin.is_zero() {
            return Err(NftError::ZeroAddress);
        }

        let metadata = NftMetadata {
            name: config.name.clone(),
            symbol: config.symbol,
            issuable: true,
            controllable: true,
        };
        metadata.validate()?;

        let mut store = MemoryNftStorage::new();
        store.set_metadata(&metadata);
        store.set_role(&DEFAULT_ADMIN_ROLE, &admin, true);

        let domain = SigningDomain::new(
            config.name,
            SIGNING_DOMAIN_VERSION,
            config.chain_id,
            config.ledger_address,
        );

        Ok(Self {
            store,
            domain,
            receivers: Box::new(NoReceivers),
            observers: Vec::new(),
        })
    }

    pub fn with_receivers(mut self, receivers: Box<dyn ReceiverRegistry>) -> Self {
        self.receivers = receivers;
        self
    }

    /// Attach a before/after transfer observer
    pub fn add_observer(&mut self, observer: Box<dyn TransferObserver>) {
        self.observers.push(observer);
    }

    pub fn domain(&self) -> &SigningDomain {
        &self.domain
    }

    fn commit<T>(
        store: &mut MemoryNftStorage,
        f: impl FnOnce(&mut NftOverlay<'_, MemoryNftStorage>) -> NftResult<T>,
    ) -> NftResult<T> {
        let mut staged = NftOverlay::new(&*store);
        let result = f(&mut staged)?;
        let changes = staged.into_changes();
        overlay::apply(store, changes);
        Ok(result)
    }

    /// Run a supply-moving operation with observer hooks around it
    fn guarded<T>(
        store: &mut MemoryNftStorage,
        observers: &[Box<dyn TransferObserver>],
        event: &TransferEvent,
        f: impl FnOnce(&mut NftOverlay<'_, MemoryNftStorage>) -> NftResult<T>,
    ) -> NftResult<T> {
        for observer in observers {
            observer
                .before_transfer(event)
                .map_err(NftError::TransferBlocked)?;
        }
        let result = Self::commit(store, f)?;
        for observer in observers {
            observer.after_transfer(event);
        }
        Ok(result)
    }

    /// Event describing an operation on one token; `from` falls back to
    /// the zero address when the token does not exist (the operation
    /// itself will then fail before any observer effect matters)
    fn token_event(
        &self,
        kind: TransferKind,
        token_id: u64,
        operator: Address,
        to: Address,
    ) -> TransferEvent {
        let (from, partition) = match self.store.token(token_id) {
            Some(token) => (token.owner, token.partition),
            None => (Address::zero(), Partition::DEFAULT),
        };
        TransferEvent {
            kind,
            partition,
            operator,
            from,
            to,
            value: AuthValue::Token(token_id),
        }
    }

    // ========================================
    // Mutations
    // ========================================

    pub fn issue_token(
        &mut self,
        ctx: &RuntimeContext,
        params: IssueTokenParams,
        data: &[u8],
    ) -> NftResult<()> {
        let token_id = params.token_id;
        let event = TransferEvent {
            kind: TransferKind::Issuance,
            partition: params.partition,
            operator: ctx.caller,
            from: Address::zero(),
            to: params.to,
            value: AuthValue::Token(token_id),
        };
        Self::guarded(&mut self.store, &self.observers, &event, |staged| {
            ops::issue_token(staged, self.receivers.as_ref(), ctx, params, data)
        })?;
        debug!("issued token {}", token_id);
        Ok(())
    }

    pub fn finalize_issuance(&mut self, ctx: &RuntimeContext) -> NftResult<()> {
        Self::commit(&mut self.store, |staged| ops::finalize_issuance(staged, ctx))
    }

    pub fn transfer_token(
        &mut self,
        ctx: &RuntimeContext,
        token_id: u64,
        to: &Address,
        data: &[u8],
        operator_data: &[u8],
    ) -> NftResult<()> {
        let event = self.token_event(TransferKind::Transfer, token_id, ctx.caller, *to);
        Self::guarded(&mut self.store, &self.observers, &event, |staged| {
            ops::transfer_token(
                staged,
                self.receivers.as_ref(),
                ctx,
                &self.domain,
                token_id,
                to,
                data,
                operator_data,
            )
        })
    }

    pub fn redeem_token(
        &mut self,
        ctx: &RuntimeContext,
        token_id: u64,
        data: &[u8],
    ) -> NftResult<()> {
        let event =
            self.token_event(TransferKind::Redemption, token_id, ctx.caller, Address::zero());
        Self::guarded(&mut self.store, &self.observers, &event, |staged| {
            ops::redeem_token(staged, ctx, &self.domain, token_id, data)
        })?;
        debug!("redeemed token {}", token_id);
        Ok(())
    }

    pub fn change_partition(
        &mut self,
        ctx: &RuntimeContext,
        token_id: u64,
        new_partition: &Partition,
    ) -> NftResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::change_partition(staged, ctx, token_id, new_partition)
        })?;
        debug!("token {} moved to partition {}", token_id, new_partition);
        Ok(())
    }

    pub fn controller_transfer_token(
        &mut self,
        ctx: &RuntimeContext,
        token_id: u64,
        to: &Address,
        data: &[u8],
        operator_data: &[u8],
    ) -> NftResult<()> {
        let event = self.token_event(TransferKind::Transfer, token_id, ctx.caller, *to);
        Self::guarded(&mut self.store, &self.observers, &event, |staged| {
            ops::controller_transfer_token(
                staged,
                self.receivers.as_ref(),
                ctx,
                token_id,
                to,
                data,
                operator_data,
            )
        })
    }

    pub fn controller_redeem_token(
        &mut self,
        ctx: &RuntimeContext,
        token_id: u64,
        data: &[u8],
        operator_data: &[u8],
    ) -> NftResult<()> {
        let event =
            self.token_event(TransferKind::Redemption, token_id, ctx.caller, Address::zero());
        Self::guarded(&mut self.store, &self.observers, &event, |staged| {
            ops::controller_redeem_token(staged, ctx, token_id, data, operator_data)
        })
    }

    pub fn finalize_controllable(&mut self, ctx: &RuntimeContext) -> NftResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::finalize_controllable(staged, ctx)
        })
    }

    pub fn add_controller(
        &mut self,
        ctx: &RuntimeContext,
        controller: &Address,
    ) -> NftResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::add_controller(staged, ctx, controller)
        })
    }

    pub fn remove_controller(
        &mut self,
        ctx: &RuntimeContext,
        controller: &Address,
    ) -> NftResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::remove_controller(staged, ctx, controller)
        })
    }

    pub fn authorize_operator(
        &mut self,
        ctx: &RuntimeContext,
        operator: &Address,
    ) -> NftResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::authorize_operator(staged, ctx, operator)
        })
    }

    pub fn revoke_operator(
        &mut self,
        ctx: &RuntimeContext,
        operator: &Address,
    ) -> NftResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::revoke_operator(staged, ctx, operator)
        })
    }

    pub fn authorize_operator_by_partition(
        &mut self,
        ctx: &RuntimeContext,
        partition: &Partition,
        operator: &Address,
    ) -> NftResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::authorize_operator_by_partition(staged, ctx, partition, operator)
        })
    }

    pub fn revoke_operator_by_partition(
        &mut self,
        ctx: &RuntimeContext,
        partition: &Partition,
        operator: &Address,
    ) -> NftResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::revoke_operator_by_partition(staged, ctx, partition, operator)
        })
    }

    pub fn revoke_operators(
        &mut self,
        ctx: &RuntimeContext,
        operators: &[Address],
    ) -> NftResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::revoke_operators(staged, ctx, operators)
        })
    }

    pub fn grant_role(
        &mut self,
        ctx: &RuntimeContext,
        role: &RoleId,
        account: &Address,
    ) -> NftResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::grant_role(staged, ctx, role, account)
        })
    }

    pub fn revoke_role(
        &mut self,
        ctx: &RuntimeContext,
        role: &RoleId,
        account: &Address,
    ) -> NftResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::revoke_role(staged, ctx, role, account)
        })
    }

    pub fn set_role_admin(
        &mut self,
        ctx: &RuntimeContext,
        role: &RoleId,
        new_admin: RoleId,
    ) -> NftResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::set_role_admin(staged, ctx, role, new_admin)
        })
    }

    pub fn set_paused(&mut self, ctx: &RuntimeContext, paused: bool) -> NftResult<()> {
        Self::commit(&mut self.store, |staged| ops::set_paused(staged, ctx, paused))
    }

    // ========================================
    // Preflight
    // ========================================

    pub fn can_transfer_token(
        &self,
        ctx: &RuntimeContext,
        token_id: u64,
        to: &Address,
        data: &[u8],
    ) -> TransferCheck {
        ops::can_transfer_token(&self.store, ctx, &self.domain, token_id, to, data)
    }

    // ========================================
    // Query Surface
    // ========================================

    pub fn metadata(&self) -> NftMetadata {
        self.store.metadata()
    }

    pub fn is_issuable(&self) -> bool {
        self.store.metadata().issuable
    }

    pub fn is_controllable(&self) -> bool {
        self.store.metadata().controllable
    }

    pub fn token(&self, token_id: u64) -> Option<PartitionedNft> {
        self.store.token(token_id)
    }

    pub fn owner_of(&self, token_id: u64) -> NftResult<Address> {
        ops::owner_of(&self.store, token_id)
    }

    pub fn partition_of(&self, token_id: u64) -> NftResult<Partition> {
        ops::partition_of(&self.store, token_id)
    }

    pub fn balance_of(&self, owner: &Address) -> u64 {
        self.store.balance_of(owner)
    }

    pub fn balance_of_by_partition(&self, owner: &Address, partition: &Partition) -> u64 {
        self.store.partition_balance(owner, partition)
    }

    pub fn tokens_of(&self, owner: &Address) -> Vec<u64> {
        ops::tokens_of(&self.store, owner)
    }

    pub fn tokens_of_partition(&self, owner: &Address, partition: &Partition) -> Vec<u64> {
        ops::tokens_of_partition(&self.store, owner, partition)
    }

    pub fn total_supply(&self) -> u64 {
        self.store.total_supply()
    }

    pub fn total_supply_by_partition(&self, partition: &Partition) -> u64 {
        self.store.partition_supply(partition)
    }

    pub fn partitions(&self) -> Vec<Partition> {
        self.store.partitions()
    }

    pub fn partitions_of(&self, account: &Address) -> Vec<Partition> {
        self.store.partitions_of(account)
    }

    pub fn is_operator(&self, holder: &Address, operator: &Address) -> bool {
        self.store.is_operator(holder, operator)
    }

    pub fn is_operator_for_partition(
        &self,
        holder: &Address,
        partition: &Partition,
        operator: &Address,
    ) -> bool {
        self.store.is_operator_for_partition(holder, partition, operator)
    }

    pub fn controllers(&self) -> Vec<Address> {
        self.store.controllers()
    }

    pub fn is_controller(&self, account: &Address) -> bool {
        self.store.is_controller(account)
    }

    pub fn has_role(&self, role: &RoleId, account: &Address) -> bool {
        self.store.has_role(role, account)
    }

    pub fn role_nonce(&self, role: &RoleId) -> u64 {
        self.store.role_nonce(role)
    }

    pub fn is_paused(&self) -> bool {
        self.store.is_paused()
    }
}
