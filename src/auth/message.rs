use super::domain::{address_word, u64_word, SigningDomain};
use crate::asset::types::{Amount, Partition};
use crate::crypto::{keccak256, Address};
use serde::{Deserialize, Serialize};

lazy_static::lazy_static! {
    static ref TRANSFER_TYPEHASH: [u8; 32] = keccak256(
        b"TransferAuthorization(address from,address to,uint256 value,bytes32 partition,uint256 nonce,uint256 deadline)"
    );
    static ref REDEMPTION_TYPEHASH: [u8; 32] = keccak256(
        b"RedemptionAuthorization(address from,address to,uint256 value,bytes32 partition,uint256 nonce,uint256 deadline)"
    );
    static ref TOKEN_TRANSFER_TYPEHASH: [u8; 32] = keccak256(
        b"TokenTransferAuthorization(address from,address to,uint256 tokenId,bytes32 partition,uint256 nonce,uint256 deadline)"
    );
    static ref TOKEN_REDEMPTION_TYPEHASH: [u8; 32] = keccak256(
        b"TokenRedemptionAuthorization(address from,address to,uint256 tokenId,bytes32 partition,uint256 nonce,uint256 deadline)"
    );
}

/// What the signature authorizes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthKind {
    Transfer,
    Redemption,
}

/// The moved quantity: a fungible amount or a discrete token identity.
///
/// The two variants hash under distinct type strings, so a fungible
/// transfer authorization can never be replayed against the NFT ledger
/// or vice versa, even with an identical numeric value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthValue {
    Amount(Amount),
    Token(u64),
}

impl AuthValue {
    fn word(&self) -> [u8; 32] {
        match self {
            AuthValue::Amount(amount) => amount.to_big_endian(),
            AuthValue::Token(token_id) => u64_word(*token_id),
        }
    }
}

/// The typed struct a role-holder signs
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationMessage {
    pub kind: AuthKind,
    pub from: Address,
    pub to: Address,
    pub value: AuthValue,
    pub partition: Partition,
    /// Current value of the role's replay counter
    pub nonce: u64,
    /// Last timestamp (seconds) at which the signature is valid
    pub deadline: u64,
}

impl AuthorizationMessage {
    fn typehash(&self) -> &'static [u8; 32] {
        match (self.kind, self.value) {
            (AuthKind::Transfer, AuthValue::Amount(_)) => &TRANSFER_TYPEHASH,
            (AuthKind::Redemption, AuthValue::Amount(_)) => &REDEMPTION_TYPEHASH,
            (AuthKind::Transfer, AuthValue::Token(_)) => &TOKEN_TRANSFER_TYPEHASH,
            (AuthKind::Redemption, AuthValue::Token(_)) => &TOKEN_REDEMPTION_TYPEHASH,
        }
    }

    /// Hash of the typed struct alone
    pub fn struct_hash(&self) -> [u8; 32] {
        let mut data = Vec::with_capacity(7 * 32);
        data.extend_from_slice(self.typehash());
        data.extend_from_slice(&address_word(&self.from));
        data.extend_from_slice(&address_word(&self.to));
        data.extend_from_slice(&self.value.word());
        data.extend_from_slice(self.partition.as_bytes());
        data.extend_from_slice(&u64_word(self.nonce));
        data.extend_from_slice(&u64_word(self.deadline));
        keccak256(&data)
    }

    /// Final digest to sign/recover: `keccak256(0x19 0x01 || separator || struct_hash)`
    pub fn digest(&self, domain: &SigningDomain) -> [u8; 32] {
        let mut data = Vec::with_capacity(2 + 2 * 32);
        data.extend_from_slice(&[0x19, 0x01]);
        data.extend_from_slice(&domain.separator());
        data.extend_from_slice(&self.struct_hash());
        keccak256(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> AuthorizationMessage {
        AuthorizationMessage {
            kind: AuthKind::Transfer,
            from: Address::new([1; 20]),
            to: Address::new([2; 20]),
            value: AuthValue::Amount(Amount::from(100u64)),
            partition: Partition::DEFAULT,
            nonce: 0,
            deadline: 1_000,
        }
    }

    #[test]
    fn test_digest_commits_to_nonce() {
        let domain = SigningDomain::new("Token", "1", 1, Address::new([9; 20]));
        let mut msg = message();
        let original = msg.digest(&domain);

        msg.nonce = 1;
        assert_ne!(original, msg.digest(&domain));
    }

    #[test]
    fn test_amount_and_token_never_collide() {
        let domain = SigningDomain::new("Token", "1", 1, Address::new([9; 20]));
        let amount_msg = message();

        let mut token_msg = amount_msg.clone();
        token_msg.value = AuthValue::Token(100);

        // Same numeric value, different quantity kind
        assert_ne!(amount_msg.digest(&domain), token_msg.digest(&domain));
    }

    #[test]
    fn test_transfer_and_redemption_never_collide() {
        let domain = SigningDomain::new("Token", "1", 1, Address::new([9; 20]));
        let transfer = message();

        let mut redemption = transfer.clone();
        redemption.kind = AuthKind::Redemption;

        assert_ne!(transfer.digest(&domain), redemption.digest(&domain));
    }
}
