mod address;
mod ecdsa;
mod hash;

pub mod error;

pub use address::*;
pub use ecdsa::*;
pub use error::CryptoError;
pub use hash::*;
