//! Ledger Role System
//!
//! Role-based access control for issuance, redemption, signed transfers,
//! pausing and the document registry. Each role carries an admin role
//! (the role allowed to grant and revoke it) and a monotonic signature
//! nonce shared by all of its holders.

/// Role identifier (32 bytes for flexibility)
pub type RoleId = [u8; 32];

/// Create a RoleId from a string name (hash of the name)
pub fn role_id_from_name(name: &str) -> RoleId {
    use blake3::Hasher;
    let mut hasher = Hasher::new();
    hasher.update(b"LEDGER_ROLE:");
    hasher.update(name.as_bytes());
    let result = hasher.finalize();
    let mut id = [0u8; 32];
    id.copy_from_slice(result.as_bytes());
    id
}

// Predefined roles

/// Default admin role - can manage all other roles
pub const DEFAULT_ADMIN_ROLE: RoleId = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Issuer role - can issue new tokens while issuance is open
pub const ISSUER_ROLE: RoleId = [
    0x49, 0x53, 0x53, 0x55, 0x45, 0x52, 0x5f, 0x52, // ISSUER_R
    0x4f, 0x4c, 0x45, 0x00, 0x00, 0x00, 0x00, 0x00, // OLE
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
];

/// Redeemer role - signatures of this role authorize redemptions
pub const REDEEMER_ROLE: RoleId = [
    0x52, 0x45, 0x44, 0x45, 0x45, 0x4d, 0x45, 0x52, // REDEEMER
    0x5f, 0x52, 0x4f, 0x4c, 0x45, 0x00, 0x00, 0x00, // _ROLE
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02,
];

/// Transfer-agent role - signatures of this role authorize transfers
pub const TRANSFER_AGENT_ROLE: RoleId = [
    0x54, 0x52, 0x41, 0x4e, 0x53, 0x46, 0x45, 0x52, // TRANSFER
    0x5f, 0x41, 0x47, 0x45, 0x4e, 0x54, 0x5f, 0x52, // _AGENT_R
    0x4f, 0x4c, 0x45, 0x00, 0x00, 0x00, 0x00, 0x00, // OLE
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03,
];

/// Pauser role - can pause/unpause transfers
pub const PAUSER_ROLE: RoleId = [
    0x50, 0x41, 0x55, 0x53, 0x45, 0x52, 0x5f, 0x52, // PAUSER_R
    0x4f, 0x4c, 0x45, 0x00, 0x00, 0x00, 0x00, 0x00, // OLE
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x04,
];

/// Document role - can attach and remove documents
pub const DOCUMENT_ROLE: RoleId = [
    0x44, 0x4f, 0x43, 0x55, 0x4d, 0x45, 0x4e, 0x54, // DOCUMENT
    0x5f, 0x52, 0x4f, 0x4c, 0x45, 0x00, 0x00, 0x00, // _ROLE
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05,
];

/// Check if a role is a predefined role
pub fn is_predefined_role(role: &RoleId) -> bool {
    *role == DEFAULT_ADMIN_ROLE
        || *role == ISSUER_ROLE
        || *role == REDEEMER_ROLE
        || *role == TRANSFER_AGENT_ROLE
        || *role == PAUSER_ROLE
        || *role == DOCUMENT_ROLE
}

/// Get the name of a predefined role
pub fn predefined_role_name(role: &RoleId) -> Option<&'static str> {
    if *role == DEFAULT_ADMIN_ROLE {
        Some("DEFAULT_ADMIN")
    } else if *role == ISSUER_ROLE {
        Some("ISSUER")
    } else if *role == REDEEMER_ROLE {
        Some("REDEEMER")
    } else if *role == TRANSFER_AGENT_ROLE {
        Some("TRANSFER_AGENT")
    } else if *role == PAUSER_ROLE {
        Some("PAUSER")
    } else if *role == DOCUMENT_ROLE {
        Some("DOCUMENT")
    } else {
        None
    }
}
