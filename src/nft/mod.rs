// Partitioned NFT Ledger
//
// The non-fungible counterpart of the fungible ledger: ownership is
// tracked per discrete token id, balances are token counts, and a
// token's partition is fixed at issuance. The authorization lattice and
// the signed-authorization protocol are shared with the fungible
// variant (`access`, `auth`), parameterized over token identity instead
// of quantity.
//
// Module Structure:
// - error: Error codes and types
// - types: Core data structures (NftMetadata, PartitionedNft)
// - storage: Storage trait and in-memory backend
// - overlay: Commit-or-drop transaction layer
// - operations: Core operation logic (issue, transfer, redeem, ...)
// - ledger: Facade wiring storage, domain and receiver registry

mod error;
mod ledger;
mod overlay;
mod storage;
mod types;

pub mod operations;

pub use operations::IssueTokenParams;

pub use error::*;
pub use ledger::*;
pub use overlay::*;
pub use storage::*;
pub use types::*;
