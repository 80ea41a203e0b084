// End-to-end scenarios for the NFT ledger facade.

use tranche_ledger::asset::{Partition, ISSUER_ROLE, TRANSFER_AGENT_ROLE};
use tranche_ledger::auth::{build_authorization, AuthKind, AuthValue};
use tranche_ledger::crypto::Address;
use tranche_ledger::nft::{IssueTokenParams, NftError, NftLedger, NftLedgerConfig};
use tranche_ledger::receiver::{HookResult, ReceiverRegistry};
use tranche_ledger::RuntimeContext;

fn addr(byte: u8) -> Address {
    Address::new([byte; 20])
}

fn ctx(caller: Address) -> RuntimeContext {
    RuntimeContext::new(caller, 100, 1_000)
}

fn new_ledger(admin: Address) -> NftLedger {
    NftLedger::new(
        NftLedgerConfig {
            name: "Acme Bonds".to_string(),
            symbol: "ABND".to_string(),
            chain_id: 1,
            ledger_address: addr(0xEF),
        },
        admin,
    )
    .unwrap()
}

fn issue(ledger: &mut NftLedger, issuer: Address, token_id: u64, partition: Partition, to: Address) {
    ledger
        .issue_token(
            &ctx(issuer),
            IssueTokenParams {
                token_id,
                partition,
                to,
                uri: None,
            },
            &[],
        )
        .unwrap();
}

#[test]
fn scenario_issue_transfer_redeem_lifecycle() {
    let admin = addr(0xAD);
    let alice = addr(1);
    let bob = addr(2);
    let series_a = Partition::named("SERIES-A");

    let mut ledger = new_ledger(admin);
    ledger.grant_role(&ctx(admin), &ISSUER_ROLE, &admin).unwrap();
    issue(&mut ledger, admin, 1, series_a, alice);
    issue(&mut ledger, admin, 2, series_a, alice);

    assert_eq!(ledger.balance_of(&alice), 2);
    assert_eq!(ledger.tokens_of(&alice), vec![1, 2]);
    assert_eq!(ledger.total_supply(), 2);
    assert_eq!(ledger.owner_of(1).unwrap(), alice);
    assert_eq!(ledger.partition_of(1).unwrap(), series_a);

    // Transfer keeps the partition
    ledger
        .transfer_token(&ctx(alice), 1, &bob, &[], &[])
        .unwrap();
    assert_eq!(ledger.owner_of(1).unwrap(), bob);
    assert_eq!(ledger.partition_of(1).unwrap(), series_a);
    assert_eq!(ledger.tokens_of_partition(&bob, &series_a), vec![1]);

    // Redemption removes the ownership record entirely
    ledger.redeem_token(&ctx(bob), 1, &[]).unwrap();
    assert_eq!(ledger.owner_of(1), Err(NftError::TokenNotFound));
    assert_eq!(ledger.total_supply(), 1);
    assert_eq!(ledger.total_supply_by_partition(&series_a), 1);
}

#[test]
fn scenario_signed_token_transfer() {
    let admin = addr(0xAD);
    let alice = addr(1);
    let bob = addr(2);
    let bearer = addr(9);
    let series_a = Partition::named("SERIES-A");

    let mut ledger = new_ledger(admin);
    ledger.grant_role(&ctx(admin), &ISSUER_ROLE, &admin).unwrap();
    issue(&mut ledger, admin, 7, series_a, alice);

    let agent_key = k256::ecdsa::SigningKey::from_slice(&[0x42; 32]).unwrap();
    let agent = Address::from_verifying_key(agent_key.verifying_key());
    ledger
        .grant_role(&ctx(admin), &TRANSFER_AGENT_ROLE, &agent)
        .unwrap();

    let data = build_authorization(
        &agent_key,
        ledger.domain(),
        AuthKind::Transfer,
        &alice,
        &bob,
        AuthValue::Token(7),
        &series_a,
        ledger.role_nonce(&TRANSFER_AGENT_ROLE),
        2_000,
    );

    // A bearer with no operator rights executes the signed transfer
    ledger
        .transfer_token(&ctx(bearer), 7, &bob, &data, &[])
        .unwrap();
    assert_eq!(ledger.owner_of(7).unwrap(), bob);
    assert_eq!(ledger.role_nonce(&TRANSFER_AGENT_ROLE), 1);
}

#[test]
fn scenario_change_partition_is_explicit_only() {
    let admin = addr(0xAD);
    let alice = addr(1);
    let bob = addr(2);
    let controller = addr(7);
    let series_a = Partition::named("SERIES-A");
    let series_b = Partition::named("SERIES-B");

    let mut ledger = new_ledger(admin);
    ledger.grant_role(&ctx(admin), &ISSUER_ROLE, &admin).unwrap();
    issue(&mut ledger, admin, 1, series_a, alice);
    issue(&mut ledger, admin, 2, series_b, bob);
    ledger.add_controller(&ctx(admin), &controller).unwrap();

    // Many transfers later the partition is unchanged
    ledger.transfer_token(&ctx(alice), 1, &bob, &[], &[]).unwrap();
    ledger.transfer_token(&ctx(bob), 1, &alice, &[], &[]).unwrap();
    assert_eq!(ledger.partition_of(1).unwrap(), series_a);

    // Only the explicit operation moves it
    ledger.change_partition(&ctx(controller), 1, &series_b).unwrap();
    assert_eq!(ledger.partition_of(1).unwrap(), series_b);
    assert_eq!(ledger.total_supply_by_partition(&series_a), 0);
    assert_eq!(ledger.total_supply_by_partition(&series_b), 2);
}

struct RejectingContract {
    contract: Address,
}

impl ReceiverRegistry for RejectingContract {
    fn is_contract(&self, address: &Address) -> bool {
        *address == self.contract
    }

    fn on_received(
        &self,
        _partition: &Partition,
        _operator: &Address,
        _from: &Address,
        _to: &Address,
        _value: AuthValue,
        _data: &[u8],
        _operator_data: &[u8],
    ) -> HookResult {
        HookResult::Rejected(None)
    }
}

#[test]
fn scenario_rejecting_receiver_rolls_back_token_state() {
    let admin = addr(0xAD);
    let alice = addr(1);
    let contract = addr(0xC0);
    let series_a = Partition::named("SERIES-A");

    let mut ledger =
        new_ledger(admin).with_receivers(Box::new(RejectingContract { contract }));
    ledger.grant_role(&ctx(admin), &ISSUER_ROLE, &admin).unwrap();
    issue(&mut ledger, admin, 1, series_a, alice);

    let result = ledger.transfer_token(&ctx(alice), 1, &contract, &[], &[]);
    assert!(matches!(result, Err(NftError::ReceiverRejected(_))));

    // Ownership and counts are exactly as before the call
    assert_eq!(ledger.owner_of(1).unwrap(), alice);
    assert_eq!(ledger.balance_of(&alice), 1);
    assert_eq!(ledger.balance_of(&contract), 0);
}

#[test]
fn scenario_operator_flow() {
    let admin = addr(0xAD);
    let alice = addr(1);
    let bob = addr(2);
    let operator = addr(3);
    let series_a = Partition::named("SERIES-A");

    let mut ledger = new_ledger(admin);
    ledger.grant_role(&ctx(admin), &ISSUER_ROLE, &admin).unwrap();
    issue(&mut ledger, admin, 1, series_a, alice);

    // Self-authorization rejected
    assert_eq!(
        ledger.authorize_operator(&ctx(alice), &alice),
        Err(NftError::SelfOperation)
    );

    ledger.authorize_operator(&ctx(alice), &operator).unwrap();
    assert!(ledger.is_operator(&alice, &operator));

    ledger
        .transfer_token(&ctx(operator), 1, &bob, &[], &[])
        .unwrap();
    assert_eq!(ledger.owner_of(1).unwrap(), bob);

    ledger.revoke_operators(&ctx(alice), &[operator]).unwrap();
    assert!(!ledger.is_operator(&alice, &operator));
}
