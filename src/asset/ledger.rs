//! Token Ledger Facade
//!
//! `TokenLedger` owns the in-memory store, the signing domain and the
//! receiver registry, and exposes the transactional public API. Every
//! mutating call runs its operation against an overlay and applies the
//! change set only on success; a failure at any step (a guard, a
//! malformed signature, a rejecting receiver) leaves the store exactly
//! as it was.
//!
//! Calls are serialized by `&mut self`: the execution model is one call
//! at a time, run to completion, as on the ledger's original substrate.
//! Embedders that share a ledger across threads must wrap it in their
//! own single-writer lock.

use crate::access::{OperatorRegistry, RoleRegistry};
use crate::asset::constants::SIGNING_DOMAIN_VERSION;
use crate::asset::documents;
use crate::asset::error::{AssetError, AssetResult};
use crate::asset::operations as ops;
use crate::asset::overlay::{self, AssetOverlay};
use crate::asset::roles::{RoleId, DEFAULT_ADMIN_ROLE};
use crate::asset::status::TransferCheck;
use crate::asset::storage::{AssetStorage, MemoryAssetStorage};
use crate::asset::types::{Amount, AssetMetadata, Document, Partition};
use crate::auth::{AuthValue, SigningDomain};
use crate::context::RuntimeContext;
use crate::crypto::{Address, Hash};
use crate::observer::{TransferEvent, TransferKind, TransferObserver};
use crate::receiver::{NoReceivers, ReceiverRegistry};
use log::debug;

/// Construction parameters for a token ledger
#[derive(Clone, Debug)]
pub struct LedgerConfig {
    /// Token name
    pub name: String,
    /// Token symbol/ticker
    pub symbol: String,
    /// Decimal places (0-18)
    pub decimals: u8,
    /// Chain identifier baked into the signing domain
    pub chain_id: u64,
    /// The ledger's own identity for the signing domain
    pub ledger_address: Address,
    /// Supply credited to the admin's default partition at construction
    pub initial_supply: Amount,
}

/// The partitioned fungible token ledger
pub struct TokenLedger {
    store: MemoryAssetStorage,
    domain: SigningDomain,
    receivers: Box<dyn ReceiverRegistry>,
    observers: Vec<Box<dyn TransferObserver>>,
}

impl TokenLedger {
    /// Create a ledger, grant the admin role and credit the initial
    /// supply to the admin's default partition
    pub fn new(config: LedgerConfig, admin: Address) -> AssetResult<Self> {
        if admin.is_zero() {
            return Err(AssetError::ZeroAddress);
        }

        let metadata = AssetMetadata {
            name: config.name.clone(),
            symbol: config.symbol,
            decimals: config.decimals,
            issuable: true,
            controllable: true,
        };
        metadata.validate()?;

        let mut store = MemoryAssetStorage::new();
        store.set_metadata(&metadata);
        store.set_role(&DEFAULT_ADMIN_ROLE, &admin, true);

        // Construction-time bootstrap of the initial supply; no hook
        // runs here, the admin is a known plain account
        if !config.initial_supply.is_zero() {
            store.add_partition_member(&admin, &Partition::DEFAULT);
            store.set_partition_balance(&admin, &Partition::DEFAULT, config.initial_supply);
            store.set_total_balance(&admin, config.initial_supply);
            store.set_partition_supply(&Partition::DEFAULT, config.initial_supply);
            store.set_total_supply(config.initial_supply);
        }

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

    /// Replace the receiver registry (contract-recipient dispatch)
    pub fn with_receivers(mut self, receivers: Box<dyn ReceiverRegistry>) -> Self {
        self.receivers = receivers;
        self
    }

    /// Attach a before/after transfer observer
    pub fn add_observer(&mut self, observer: Box<dyn TransferObserver>) {
        self.observers.push(observer);
    }

    /// The ledger's typed-data signing domain
    pub fn domain(&self) -> &SigningDomain {
        &self.domain
    }

    /// Run one mutating operation transactionally
    fn commit<T>(
        store: &mut MemoryAssetStorage,
        f: impl FnOnce(&mut AssetOverlay<'_, MemoryAssetStorage>) -> AssetResult<T>,
    ) -> AssetResult<T> {
        let mut staged = AssetOverlay::new(&*store);
        let result = f(&mut staged)?;
        let changes = staged.into_changes();
        overlay::apply(store, changes);
        Ok(result)
    }

    /// Run a supply-moving operation with observer hooks around it:
    /// a before-veto aborts with no writes, after-callbacks fire once
    /// the change set has been committed
    fn guarded<T>(
        store: &mut MemoryAssetStorage,
        observers: &[Box<dyn TransferObserver>],
        event: &TransferEvent,
        f: impl FnOnce(&mut AssetOverlay<'_, MemoryAssetStorage>) -> AssetResult<T>,
    ) -> AssetResult<T> {
        for observer in observers {
            observer
                .before_transfer(event)
                .map_err(AssetError::TransferBlocked)?;
        }
        let result = Self::commit(store, f)?;
        for observer in observers {
            observer.after_transfer(event);
        }
        Ok(result)
    }

    // ========================================
    // Issuance
    // ========================================

    pub fn issue(
        &mut self,
        ctx: &RuntimeContext,
        to: &Address,
        amount: Amount,
        data: &[u8],
    ) -> AssetResult<()> {
        self.issue_by_partition(ctx, &Partition::DEFAULT, to, amount, data)
    }

    pub fn issue_by_partition(
        &mut self,
        ctx: &RuntimeContext,
        partition: &Partition,
        to: &Address,
        amount: Amount,
        data: &[u8],
    ) -> AssetResult<()> {
        let event = TransferEvent {
            kind: TransferKind::Issuance,
            partition: *partition,
            operator: ctx.caller,
            from: Address::zero(),
            to: *to,
            value: AuthValue::Amount(amount),
        };
        Self::guarded(&mut self.store, &self.observers, &event, |staged| {
            ops::issue_by_partition(
                staged,
                self.receivers.as_ref(),
                ctx,
                partition,
                to,
                amount,
                data,
            )
        })?;
        debug!("issued {} to {} in partition {}", amount, to, partition);
        Ok(())
    }

    pub fn finalize_issuance(&mut self, ctx: &RuntimeContext) -> AssetResult<()> {
        Self::commit(&mut self.store, |staged| ops::finalize_issuance(staged, ctx))?;
        debug!("issuance finalized by {}", ctx.caller);
        Ok(())
    }

    // ========================================
    // Transfers
    // ========================================

    pub fn transfer(
        &mut self,
        ctx: &RuntimeContext,
        to: &Address,
        amount: Amount,
    ) -> AssetResult<()> {
        let event = Self::transfer_event(&Partition::DEFAULT, &ctx.caller, &ctx.caller, to, amount);
        Self::guarded(&mut self.store, &self.observers, &event, |staged| {
            ops::transfer(staged, self.receivers.as_ref(), ctx, to, amount)
        })
    }

    pub fn transfer_with_data(
        &mut self,
        ctx: &RuntimeContext,
        to: &Address,
        amount: Amount,
        data: &[u8],
    ) -> AssetResult<()> {
        let event = Self::transfer_event(&Partition::DEFAULT, &ctx.caller, &ctx.caller, to, amount);
        Self::guarded(&mut self.store, &self.observers, &event, |staged| {
            ops::transfer_with_data(
                staged,
                self.receivers.as_ref(),
                ctx,
                &self.domain,
                to,
                amount,
                data,
            )
        })
    }

    pub fn transfer_from(
        &mut self,
        ctx: &RuntimeContext,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> AssetResult<()> {
        let event = Self::transfer_event(&Partition::DEFAULT, &ctx.caller, from, to, amount);
        Self::guarded(&mut self.store, &self.observers, &event, |staged| {
            ops::transfer_from(staged, self.receivers.as_ref(), ctx, from, to, amount)
        })
    }

    pub fn transfer_by_partition(
        &mut self,
        ctx: &RuntimeContext,
        partition: &Partition,
        to: &Address,
        amount: Amount,
        data: &[u8],
    ) -> AssetResult<()> {
        let event = Self::transfer_event(partition, &ctx.caller, &ctx.caller, to, amount);
        Self::guarded(&mut self.store, &self.observers, &event, |staged| {
            ops::transfer_by_partition(
                staged,
                self.receivers.as_ref(),
                ctx,
                partition,
                to,
                amount,
                data,
            )
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn operator_transfer_by_partition(
        &mut self,
        ctx: &RuntimeContext,
        partition: &Partition,
        from: &Address,
        to: &Address,
        amount: Amount,
        data: &[u8],
        operator_data: &[u8],
    ) -> AssetResult<()> {
        let event = Self::transfer_event(partition, &ctx.caller, from, to, amount);
        Self::guarded(&mut self.store, &self.observers, &event, |staged| {
            ops::operator_transfer_by_partition(
                staged,
                self.receivers.as_ref(),
                ctx,
                &self.domain,
                partition,
                from,
                to,
                amount,
                data,
                operator_data,
            )
        })
    }

    fn transfer_event(
        partition: &Partition,
        operator: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> TransferEvent {
        TransferEvent {
            kind: TransferKind::Transfer,
            partition: *partition,
            operator: *operator,
            from: *from,
            to: *to,
            value: AuthValue::Amount(amount),
        }
    }

    // ========================================
    // Redemption
    // ========================================

    pub fn redeem(
        &mut self,
        ctx: &RuntimeContext,
        amount: Amount,
        data: &[u8],
    ) -> AssetResult<()> {
        let event = Self::redemption_event(&Partition::DEFAULT, &ctx.caller, &ctx.caller, amount);
        Self::guarded(&mut self.store, &self.observers, &event, |staged| {
            ops::redeem(staged, ctx, &self.domain, amount, data)
        })?;
        debug!("redeemed {} from {}", amount, ctx.caller);
        Ok(())
    }

    pub fn redeem_from(
        &mut self,
        ctx: &RuntimeContext,
        from: &Address,
        amount: Amount,
        data: &[u8],
    ) -> AssetResult<()> {
        let event = Self::redemption_event(&Partition::DEFAULT, &ctx.caller, from, amount);
        Self::guarded(&mut self.store, &self.observers, &event, |staged| {
            ops::redeem_from(staged, ctx, &self.domain, from, amount, data)
        })?;
        debug!("redeemed {} from {}", amount, from);
        Ok(())
    }

    pub fn redeem_by_partition(
        &mut self,
        ctx: &RuntimeContext,
        partition: &Partition,
        amount: Amount,
        data: &[u8],
    ) -> AssetResult<()> {
        let event = Self::redemption_event(partition, &ctx.caller, &ctx.caller, amount);
        Self::guarded(&mut self.store, &self.observers, &event, |staged| {
            ops::redeem_by_partition(staged, ctx, &self.domain, partition, amount, data)
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn operator_redeem_by_partition(
        &mut self,
        ctx: &RuntimeContext,
        partition: &Partition,
        from: &Address,
        amount: Amount,
        data: &[u8],
        operator_data: &[u8],
    ) -> AssetResult<()> {
        let event = Self::redemption_event(partition, &ctx.caller, from, amount);
        Self::guarded(&mut self.store, &self.observers, &event, |staged| {
            ops::operator_redeem_by_partition(
                staged,
                ctx,
                &self.domain,
                partition,
                from,
                amount,
                data,
                operator_data,
            )
        })
    }

    fn redemption_event(
        partition: &Partition,
        operator: &Address,
        from: &Address,
        amount: Amount,
    ) -> TransferEvent {
        TransferEvent {
            kind: TransferKind::Redemption,
            partition: *partition,
            operator: *operator,
            from: *from,
            to: Address::zero(),
            value: AuthValue::Amount(amount),
        }
    }

    // ========================================
    // Controller Override
    // ========================================

    #[allow(clippy::too_many_arguments)]
    pub fn controller_transfer(
        &mut self,
        ctx: &RuntimeContext,
        partition: &Partition,
        from: &Address,
        to: &Address,
        amount: Amount,
        data: &[u8],
        operator_data: &[u8],
    ) -> AssetResult<()> {
        let event = Self::transfer_event(partition, &ctx.caller, from, to, amount);
        Self::guarded(&mut self.store, &self.observers, &event, |staged| {
            ops::controller_transfer(
                staged,
                self.receivers.as_ref(),
                ctx,
                partition,
                from,
                to,
                amount,
                data,
                operator_data,
            )
        })?;
        debug!(
            "controller {} force-moved {} from {} to {}",
            ctx.caller, amount, from, to
        );
        Ok(())
    }

    pub fn controller_redeem(
        &mut self,
        ctx: &RuntimeContext,
        partition: &Partition,
        from: &Address,
        amount: Amount,
        data: &[u8],
        operator_data: &[u8],
    ) -> AssetResult<()> {
        let event = Self::redemption_event(partition, &ctx.caller, from, amount);
        Self::guarded(&mut self.store, &self.observers, &event, |staged| {
            ops::controller_redeem(staged, ctx, partition, from, amount, data, operator_data)
        })?;
        debug!(
            "controller {} force-redeemed {} from {}",
            ctx.caller, amount, from
        );
        Ok(())
    }

    pub fn finalize_controllable(&mut self, ctx: &RuntimeContext) -> AssetResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::finalize_controllable(staged, ctx)
        })
    }

    pub fn add_controller(
        &mut self,
        ctx: &RuntimeContext,
        controller: &Address,
    ) -> AssetResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::add_controller(staged, ctx, controller)
        })
    }

    pub fn remove_controller(
        &mut self,
        ctx: &RuntimeContext,
        controller: &Address,
    ) -> AssetResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::remove_controller(staged, ctx, controller)
        })
    }

    // ========================================
    // Operators & Allowances
    // ========================================

    pub fn authorize_operator(
        &mut self,
        ctx: &RuntimeContext,
        operator: &Address,
    ) -> AssetResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::authorize_operator(staged, ctx, operator)
        })
    }

    pub fn revoke_operator(
        &mut self,
        ctx: &RuntimeContext,
        operator: &Address,
    ) -> AssetResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::revoke_operator(staged, ctx, operator)
        })
    }

    pub fn authorize_operator_by_partition(
        &mut self,
        ctx: &RuntimeContext,
        partition: &Partition,
        operator: &Address,
    ) -> AssetResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::authorize_operator_by_partition(staged, ctx, partition, operator)
        })
    }

    pub fn revoke_operator_by_partition(
        &mut self,
        ctx: &RuntimeContext,
        partition: &Partition,
        operator: &Address,
    ) -> AssetResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::revoke_operator_by_partition(staged, ctx, partition, operator)
        })
    }

    pub fn revoke_operators(
        &mut self,
        ctx: &RuntimeContext,
        operators: &[Address],
    ) -> AssetResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::revoke_operators(staged, ctx, operators)
        })
    }

    pub fn approve(
        &mut self,
        ctx: &RuntimeContext,
        spender: &Address,
        amount: Amount,
    ) -> AssetResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::approve(staged, ctx, spender, amount)
        })
    }

    pub fn approve_by_partition(
        &mut self,
        ctx: &RuntimeContext,
        partition: &Partition,
        spender: &Address,
        amount: Amount,
    ) -> AssetResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::approve_by_partition(staged, ctx, partition, spender, amount)
        })
    }

    pub fn increase_allowance(
        &mut self,
        ctx: &RuntimeContext,
        partition: &Partition,
        spender: &Address,
        delta: Amount,
    ) -> AssetResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::increase_allowance(staged, ctx, partition, spender, delta)
        })
    }

    pub fn decrease_allowance(
        &mut self,
        ctx: &RuntimeContext,
        partition: &Partition,
        spender: &Address,
        delta: Amount,
    ) -> AssetResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::decrease_allowance(staged, ctx, partition, spender, delta)
        })
    }

    // ========================================
    // Roles & Pause
    // ========================================

    pub fn grant_role(
        &mut self,
        ctx: &RuntimeContext,
        role: &RoleId,
        account: &Address,
    ) -> AssetResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::grant_role(staged, ctx, role, account)
        })
    }

    pub fn revoke_role(
        &mut self,
        ctx: &RuntimeContext,
        role: &RoleId,
        account: &Address,
    ) -> AssetResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::revoke_role(staged, ctx, role, account)
        })
    }

    pub fn set_role_admin(
        &mut self,
        ctx: &RuntimeContext,
        role: &RoleId,
        new_admin: RoleId,
    ) -> AssetResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::set_role_admin(staged, ctx, role, new_admin)
        })
    }

    pub fn set_paused(&mut self, ctx: &RuntimeContext, paused: bool) -> AssetResult<()> {
        Self::commit(&mut self.store, |staged| ops::set_paused(staged, ctx, paused))
    }

    pub fn set_account_paused(
        &mut self,
        ctx: &RuntimeContext,
        account: &Address,
        paused: bool,
    ) -> AssetResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::set_account_paused(staged, ctx, account, paused)
        })
    }

    pub fn set_partition_paused(
        &mut self,
        ctx: &RuntimeContext,
        partition: &Partition,
        paused: bool,
    ) -> AssetResult<()> {
        Self::commit(&mut self.store, |staged| {
            ops::set_partition_paused(staged, ctx, partition, paused)
        })
    }

    // ========================================
    // Documents
    // ========================================

    pub fn set_document(
        &mut self,
        ctx: &RuntimeContext,
        name: &str,
        hash: Hash,
        uri: &str,
    ) -> AssetResult<()> {
        Self::commit(&mut self.store, |staged| {
            documents::set_document(staged, ctx, name, hash, uri)
        })
    }

    pub fn remove_document(&mut self, ctx: &RuntimeContext, name: &str) -> AssetResult<()> {
        Self::commit(&mut self.store, |staged| {
            documents::remove_document(staged, ctx, name)
        })
    }

    pub fn get_document(&self, name: &str) -> AssetResult<Document> {
        documents::get_document(&self.store, name)
    }

    pub fn all_documents(&self) -> Vec<String> {
        documents::all_documents(&self.store)
    }

    // ========================================
    // Preflight
    // ========================================

    pub fn can_transfer(
        &self,
        ctx: &RuntimeContext,
        to: &Address,
        amount: Amount,
    ) -> TransferCheck {
        ops::can_transfer(&self.store, ctx, to, amount)
    }

    pub fn can_transfer_from(
        &self,
        ctx: &RuntimeContext,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> TransferCheck {
        ops::can_transfer_from(&self.store, ctx, from, to, amount)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn can_transfer_by_partition(
        &self,
        ctx: &RuntimeContext,
        partition: &Partition,
        from: &Address,
        to: &Address,
        amount: Amount,
        data: &[u8],
    ) -> TransferCheck {
        ops::can_transfer_by_partition(
            &self.store,
            ctx,
            &self.domain,
            partition,
            from,
            to,
            amount,
            data,
        )
    }

    // ========================================
    // Query Surface
    // ========================================

    pub fn metadata(&self) -> AssetMetadata {
        self.store.metadata()
    }

    pub fn is_issuable(&self) -> bool {
        self.store.metadata().issuable
    }

    pub fn is_controllable(&self) -> bool {
        self.store.metadata().controllable
    }

    pub fn total_supply(&self) -> Amount {
        self.store.total_supply()
    }

    pub fn total_supply_by_partition(&self, partition: &Partition) -> Amount {
        self.store.partition_supply(partition)
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.store.total_balance(account)
    }

    pub fn balance_of_by_partition(&self, account: &Address, partition: &Partition) -> Amount {
        self.store.partition_balance(account, partition)
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

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.store.allowance(owner, &Partition::DEFAULT, spender)
    }

    pub fn allowance_by_partition(
        &self,
        owner: &Address,
        partition: &Partition,
        spender: &Address,
    ) -> Amount {
        self.store.allowance(owner, partition, spender)
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

    pub fn is_account_paused(&self, account: &Address) -> bool {
        self.store.is_account_paused(account)
    }

    pub fn is_partition_paused(&self, partition: &Partition) -> bool {
        self.store.is_partition_paused(partition)
    }
}
