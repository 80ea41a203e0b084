use super::{AuthError, AuthKind, AuthValue, AuthorizationMessage, SigningDomain};
use crate::access::RoleRegistry;
use crate::asset::roles::RoleId;
use crate::asset::types::Partition;
use crate::crypto::{Address, RecoverableSignature};
use crate::serializer::{Reader, ReaderError, Serializer, Writer};
use serde::{Deserialize, Serialize};

/// The opaque `data` payload attached to signed entry points:
/// a recoverable signature plus its deadline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedAuthorization {
    pub signature: RecoverableSignature,
    /// Last timestamp (seconds) at which the signature is valid
    pub deadline: u64,
}

impl Serializer for SignedAuthorization {
    fn write(&self, writer: &mut Writer) {
        self.signature.write(writer);
        self.deadline.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            signature: reader.read()?,
            deadline: reader.read()?,
        })
    }

    fn size(&self) -> usize {
        self.signature.size() + 8
    }
}

/// Outcome of a successful verification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerifiedAuthorization {
    /// Signer recovered from the payload
    pub signer: Address,
    /// The role whose nonce the executing caller must consume
    pub role: RoleId,
}

/// Verify a signed authorization payload without consuming the nonce.
///
/// Steps, in order: decode the payload, check the deadline, rebuild the
/// typed digest against the role's *current* nonce, recover the signer,
/// and check the signer holds `role`. The caller consumes the nonce via
/// [`crate::access::consume_role_nonce`] if and only if the authorized
/// action actually executes; read-only preflights must not burn a
/// signature on a speculative check.
#[allow(clippy::too_many_arguments)]
pub fn verify_authorization<R: RoleRegistry + ?Sized>(
    roles: &R,
    domain: &SigningDomain,
    role: &RoleId,
    kind: AuthKind,
    from: &Address,
    to: &Address,
    value: AuthValue,
    partition: &Partition,
    data: &[u8],
    now: u64,
) -> Result<VerifiedAuthorization, AuthError> {
    let payload =
        SignedAuthorization::from_bytes(data).map_err(|_| AuthError::MalformedPayload)?;

    if payload.deadline < now {
        return Err(AuthError::ExpiredSignature);
    }

    let message = AuthorizationMessage {
        kind,
        from: *from,
        to: *to,
        value,
        partition: *partition,
        nonce: roles.role_nonce(role),
        deadline: payload.deadline,
    };

    let digest = message.digest(domain);
    let signer = payload
        .signature
        .recover(&digest)
        .map_err(|_| AuthError::InvalidSignature)?;

    if !roles.has_role(role, &signer) {
        return Err(AuthError::UnauthorizedSigner);
    }

    Ok(VerifiedAuthorization {
        signer,
        role: *role,
    })
}

/// Build a signed authorization payload (the off-chain side).
///
/// `nonce` must be the current value of the role's counter at execution
/// time; a payload built against any other value will not verify.
#[allow(clippy::too_many_arguments)]
pub fn build_authorization(
    key: &k256::ecdsa::SigningKey,
    domain: &SigningDomain,
    kind: AuthKind,
    from: &Address,
    to: &Address,
    value: AuthValue,
    partition: &Partition,
    nonce: u64,
    deadline: u64,
) -> Vec<u8> {
    let message = AuthorizationMessage {
        kind,
        from: *from,
        to: *to,
        value,
        partition: *partition,
        nonce,
        deadline,
    };

    let digest = message.digest(domain);
    let signature = crate::crypto::sign_recoverable(&digest, key);

    SignedAuthorization {
        signature,
        deadline,
    }
    .to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::consume_role_nonce;
    use crate::asset::roles::TRANSFER_AGENT_ROLE;
    use crate::asset::types::Amount;
    use std::collections::HashMap;

    struct MockRoles {
        grants: HashMap<(RoleId, Address), bool>,
        nonces: HashMap<RoleId, u64>,
    }

    impl MockRoles {
        fn new() -> Self {
            Self {
                grants: HashMap::new(),
                nonces: HashMap::new(),
            }
        }

        fn grant(&mut self, role: RoleId, account: Address) {
            self.grants.insert((role, account), true);
        }
    }

    impl RoleRegistry for MockRoles {
        fn has_role(&self, role: &RoleId, account: &Address) -> bool {
            *self.grants.get(&(*role, *account)).unwrap_or(&false)
        }

        fn set_role(&mut self, role: &RoleId, account: &Address, granted: bool) {
            self.grants.insert((*role, *account), granted);
        }

        fn role_admin(&self, _role: &RoleId) -> RoleId {
            [0; 32]
        }

        fn set_role_admin(&mut self, _role: &RoleId, _admin: RoleId) {}

        fn role_nonce(&self, role: &RoleId) -> u64 {
            *self.nonces.get(role).unwrap_or(&0)
        }

        fn set_role_nonce(&mut self, role: &RoleId, nonce: u64) {
            self.nonces.insert(*role, nonce);
        }
    }

    fn setup() -> (MockRoles, k256::ecdsa::SigningKey, SigningDomain) {
        let key = k256::ecdsa::SigningKey::random(&mut rand::thread_rng());
        let signer = Address::from_verifying_key(key.verifying_key());

        let mut roles = MockRoles::new();
        roles.grant(TRANSFER_AGENT_ROLE, signer);

        let domain = SigningDomain::new("Token", "1", 1, Address::new([9; 20]));
        (roles, key, domain)
    }

    fn verify(
        roles: &MockRoles,
        domain: &SigningDomain,
        data: &[u8],
        now: u64,
    ) -> Result<VerifiedAuthorization, AuthError> {
        verify_authorization(
            roles,
            domain,
            &TRANSFER_AGENT_ROLE,
            AuthKind::Transfer,
            &Address::new([1; 20]),
            &Address::new([2; 20]),
            AuthValue::Amount(Amount::from(50u64)),
            &Partition::DEFAULT,
            data,
            now,
        )
    }

    #[test]
    fn test_valid_authorization_verifies() {
        let (roles, key, domain) = setup();
        let data = build_authorization(
            &key,
            &domain,
            AuthKind::Transfer,
            &Address::new([1; 20]),
            &Address::new([2; 20]),
            AuthValue::Amount(Amount::from(50u64)),
            &Partition::DEFAULT,
            0,
            1_000,
        );

        let verified = verify(&roles, &domain, &data, 500).unwrap();
        assert_eq!(
            verified.signer,
            Address::from_verifying_key(key.verifying_key())
        );
    }

    #[test]
    fn test_verification_does_not_consume_nonce() {
        let (roles, key, domain) = setup();
        let data = build_authorization(
            &key,
            &domain,
            AuthKind::Transfer,
            &Address::new([1; 20]),
            &Address::new([2; 20]),
            AuthValue::Amount(Amount::from(50u64)),
            &Partition::DEFAULT,
            0,
            1_000,
        );

        // Verifying twice is fine; nothing was consumed
        assert!(verify(&roles, &domain, &data, 500).is_ok());
        assert!(verify(&roles, &domain, &data, 500).is_ok());
        assert_eq!(roles.role_nonce(&TRANSFER_AGENT_ROLE), 0);
    }

    #[test]
    fn test_consumed_nonce_invalidates_signature() {
        let (mut roles, key, domain) = setup();
        let data = build_authorization(
            &key,
            &domain,
            AuthKind::Transfer,
            &Address::new([1; 20]),
            &Address::new([2; 20]),
            AuthValue::Amount(Amount::from(50u64)),
            &Partition::DEFAULT,
            0,
            1_000,
        );

        assert!(verify(&roles, &domain, &data, 500).is_ok());
        consume_role_nonce(&mut roles, &TRANSFER_AGENT_ROLE);

        // The digest now commits to nonce 1; the old payload recovers a
        // different key which holds no role
        assert_eq!(
            verify(&roles, &domain, &data, 500),
            Err(AuthError::UnauthorizedSigner)
        );
    }

    #[test]
    fn test_expired_signature_rejected() {
        let (roles, key, domain) = setup();
        let data = build_authorization(
            &key,
            &domain,
            AuthKind::Transfer,
            &Address::new([1; 20]),
            &Address::new([2; 20]),
            AuthValue::Amount(Amount::from(50u64)),
            &Partition::DEFAULT,
            0,
            1_000,
        );

        assert_eq!(
            verify(&roles, &domain, &data, 1_001),
            Err(AuthError::ExpiredSignature)
        );
        // Deadline itself is still valid
        assert!(verify(&roles, &domain, &data, 1_000).is_ok());
    }

    #[test]
    fn test_malformed_payload_rejected() {
        let (roles, _, domain) = setup();
        assert_eq!(
            verify(&roles, &domain, b"junk", 0),
            Err(AuthError::MalformedPayload)
        );
        assert_eq!(
            verify(&roles, &domain, &[], 0),
            Err(AuthError::MalformedPayload)
        );
    }

    #[test]
    fn test_signer_without_role_rejected() {
        let (roles, _, domain) = setup();
        let stranger = k256::ecdsa::SigningKey::random(&mut rand::thread_rng());
        let data = build_authorization(
            &stranger,
            &domain,
            AuthKind::Transfer,
            &Address::new([1; 20]),
            &Address::new([2; 20]),
            AuthValue::Amount(Amount::from(50u64)),
            &Partition::DEFAULT,
            0,
            1_000,
        );

        assert_eq!(
            verify(&roles, &domain, &data, 500),
            Err(AuthError::UnauthorizedSigner)
        );
    }
}
