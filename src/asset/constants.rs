//! Fungible Ledger Constants
//!
//! Defines limits and protocol identifiers.

// ===== Token Limits =====

/// Maximum length of token name (bytes)
pub const MAX_NAME_LENGTH: usize = 64;

/// Maximum length of token symbol/ticker (bytes)
pub const MAX_SYMBOL_LENGTH: usize = 12;

/// Maximum decimals for a token
pub const MAX_DECIMALS: u8 = 18;

// ===== Document Limits =====

/// Maximum document name length (bytes)
pub const MAX_DOCUMENT_NAME_LENGTH: usize = 64;

/// Maximum document URI length (bytes)
pub const MAX_DOCUMENT_URI_LENGTH: usize = 512;

// ===== Signed-Authorization Protocol =====

/// Version string baked into every signing domain
pub const SIGNING_DOMAIN_VERSION: &str = "1";
