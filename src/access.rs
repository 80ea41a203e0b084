//! Shared access-control surface.
//!
//! Both the fungible and the non-fungible ledgers answer the same
//! question before moving anything: may this caller act on this holder's
//! balance in this partition? The lattice is, in order: the holder
//! themselves, a global operator, a partition-scoped operator, or a
//! member of the contract-wide controller set. Controllers additionally
//! bypass allowances entirely.

use crate::asset::roles::RoleId;
use crate::asset::types::Partition;
use crate::crypto::Address;

/// Operator relations and the controller set
pub trait OperatorRegistry {
    /// Global operator flag for (holder, operator)
    fn is_operator(&self, holder: &Address, operator: &Address) -> bool;
    fn set_operator(&mut self, holder: &Address, operator: &Address, authorized: bool);

    /// Partition-scoped operator flag for (holder, partition, operator)
    fn is_operator_for_partition(
        &self,
        holder: &Address,
        partition: &Partition,
        operator: &Address,
    ) -> bool;
    fn set_operator_for_partition(
        &mut self,
        holder: &Address,
        partition: &Partition,
        operator: &Address,
        authorized: bool,
    );

    /// Controller membership, O(1) via the position index
    fn is_controller(&self, account: &Address) -> bool;

    /// Controller list in its current iteration order
    fn controllers(&self) -> Vec<Address>;
    fn set_controllers(&mut self, controllers: Vec<Address>);
}

/// Role grants, per-role admin roles and per-role signature nonces
pub trait RoleRegistry {
    fn has_role(&self, role: &RoleId, account: &Address) -> bool;
    fn set_role(&mut self, role: &RoleId, account: &Address, granted: bool);

    /// The role empowered to grant/revoke `role`
    fn role_admin(&self, role: &RoleId) -> RoleId;
    fn set_role_admin(&mut self, role: &RoleId, admin: RoleId);

    /// Monotonic replay-protection counter, keyed by role (not signer)
    fn role_nonce(&self, role: &RoleId) -> u64;
    fn set_role_nonce(&mut self, role: &RoleId, nonce: u64);
}

/// Resolve whether `operator` may move `holder`'s balance in `partition`
pub fn can_operate<R: OperatorRegistry + ?Sized>(
    registry: &R,
    operator: &Address,
    holder: &Address,
    partition: &Partition,
) -> bool {
    operator == holder
        || registry.is_operator(holder, operator)
        || registry.is_operator_for_partition(holder, partition, operator)
        || registry.is_controller(operator)
}

/// Consume one signature slot for `role`: bump the role nonce.
///
/// Must be called exactly once per successfully executed signed action,
/// and never from a read-only preflight.
pub fn consume_role_nonce<R: RoleRegistry + ?Sized>(registry: &mut R, role: &RoleId) {
    let nonce = registry.role_nonce(role);
    registry.set_role_nonce(role, nonce + 1);
}
