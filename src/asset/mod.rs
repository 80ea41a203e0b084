//! Partitioned Fungible Token Ledger
//!
//! This module implements the fungible half of the security-token
//! ledger: balances subdivided into named partitions, role-gated
//! issuance and redemption, operator/controller authorization,
//! signed-authorization transfers and a document registry.
//!
//! # Features
//!
//! - Per-(account, partition) balances with conservation invariants
//! - Implicit default partition for un-tranched balances
//! - Global and partition-scoped operators, ERC20-style allowances
//! - Controller force-transfer/redeem with one-way disable
//! - Typed-data signed transfers and redemptions with per-role nonces
//! - Pause gates (global, per-account, per-partition)
//! - Name-keyed document registry

pub mod constants;
pub mod documents;
pub mod error;
pub mod ledger;
pub mod operations;
pub mod overlay;
pub mod roles;
pub mod status;
pub mod storage;
pub mod types;

pub use constants::*;
pub use error::*;
pub use ledger::*;
pub use roles::*;
pub use status::*;
pub use storage::*;
pub use types::*;
