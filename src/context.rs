use crate::crypto::Address;

/// Runtime context for a single ledger call: who is calling and when.
///
/// The ledger itself has no clock; deadline checks use the timestamp the
/// execution environment stamps on the call.
#[derive(Clone, Debug)]
pub struct RuntimeContext {
    /// Current caller (transaction signer)
    pub caller: Address,
    /// Current block height
    pub block_height: u64,
    /// Current time in seconds
    pub timestamp: u64,
}

impl RuntimeContext {
    pub fn new(caller: Address, block_height: u64, timestamp: u64) -> Self {
        Self {
            caller,
            block_height,
            timestamp,
        }
    }
}
