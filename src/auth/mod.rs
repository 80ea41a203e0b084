//! Signed-authorization protocol.
//!
//! A role-holder (transfer agent, redeemer) pre-authorizes one specific
//! transfer or redemption off-chain by signing a domain-separated,
//! typed-data digest. Any bearer of the resulting payload can later
//! execute the action; the signature substitutes for allowance and
//! operator proof.
//!
//! Replay protection is nonce-per-role: the digest commits to the
//! *current* value of the role's counter, and the executing call bumps
//! the counter, which invalidates the consumed signature and every other
//! in-flight signature for that role built against the same nonce.

mod domain;
mod message;
mod signed;

pub use domain::*;
pub use message::*;
pub use signed::*;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Malformed authorization payload")]
    MalformedPayload,

    #[error("Signature deadline has passed")]
    ExpiredSignature,

    #[error("Signature is invalid")]
    InvalidSignature,

    #[error("Recovered signer does not hold the required role")]
    UnauthorizedSigner,
}
