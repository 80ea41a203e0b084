//! Partitioned security-token ledger.
//!
//! A reference implementation of a tranched token ledger: balances
//! subdivided into named partitions, role-gated issuance and
//! redemption, an operator/controller authorization lattice, and
//! off-chain typed-data authorizations with per-role replay protection.
//! Ships a fungible ledger (`asset`) and a non-fungible counterpart
//! (`nft`) sharing the authorization and signature machinery.

pub mod access;
pub mod asset;
pub mod auth;
pub mod context;
pub mod crypto;
pub mod nft;
pub mod observer;
pub mod receiver;
pub mod serializer;

pub use access::{can_operate, consume_role_nonce};
pub use context::RuntimeContext;
