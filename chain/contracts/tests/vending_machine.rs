//! End-to-end contract behaviour through the chain runtime
//!
//! One deployment per test (reserve of 2 ether), three funded accounts.

use types::ids::Address;
use types::numeric::Wei;
use vending_machine::chain::Chain;
use vending_machine::errors::{ChainError, VendingError};
use vending_machine::events::{ContractEvent, PeanutsPurchased};

struct Fixture {
    chain: Chain,
    owner: Address,
    address1: Address,
    address2: Address,
}

fn deploy() -> Fixture {
    let owner = Address::from_seed("owner");
    let address1 = Address::from_seed("address1");
    let address2 = Address::from_seed("address2");

    let mut chain = Chain::new(Address::from_seed("vending-machine"));
    for account in [owner, address1, address2] {
        chain.fund(account, Wei::from_ether(100)).unwrap();
    }
    chain.deploy(owner, Wei::from_ether(2)).unwrap();

    Fixture {
        chain,
        owner,
        address1,
        address2,
    }
}

fn ether(s: &str) -> Wei {
    Wei::from_ether_str(s).unwrap()
}

// ─── getReserveAmount ───

#[test]
fn test_reserve_amount_is_deployment_value() {
    let f = deploy();
    assert_eq!(f.chain.machine().unwrap().reserve_amount(), Wei::from_ether(2));
    assert_eq!(f.chain.machine().unwrap().owner(), f.owner);
}

// ─── deposit ───

#[test]
fn test_deposit_below_minimum_reverts_with_message() {
    let mut f = deploy();
    let err = f.chain.deposit(f.address1, ether("0.01")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "You must have at least 0.1 ether to initiate transaction"
    );
    assert_eq!(
        f.chain.machine().unwrap().consumer_deposit_of(&f.address1),
        Wei::ZERO
    );
}

#[test]
fn test_deposit_minimum_amount() {
    let mut f = deploy();
    f.chain.deposit(f.address1, ether("0.1")).unwrap();
    assert_eq!(
        f.chain.machine().unwrap().consumer_deposit_of(&f.address1),
        ether("0.1")
    );
}

#[test]
fn test_multiple_users_deposit_independently() {
    let mut f = deploy();
    f.chain.deposit(f.address1, ether("0.8")).unwrap();
    f.chain.deposit(f.address2, ether("1")).unwrap();

    let machine = f.chain.machine().unwrap();
    assert_eq!(machine.consumer_deposit_of(&f.address1), ether("0.8"));
    assert_eq!(machine.consumer_deposit_of(&f.address2), ether("1"));
}

#[test]
fn test_odd_deposit_amounts() {
    let mut f = deploy();
    f.chain.deposit(f.address1, ether("0.22")).unwrap();
    f.chain.deposit(f.address2, ether("0.3")).unwrap();

    let machine = f.chain.machine().unwrap();
    assert_eq!(machine.consumer_deposit_of(&f.address1), ether("0.22"));
    assert_eq!(machine.consumer_deposit_of(&f.address2), ether("0.3"));
}

// ─── purchase ───

#[test]
fn test_buy_peanuts() {
    let mut f = deploy();
    f.chain.restock(f.owner, 10).unwrap();
    f.chain.deposit(f.address1, ether("0.8")).unwrap();

    let event = f.chain.purchase(f.address1, 2).unwrap();

    assert_eq!(
        event,
        ContractEvent::PeanutsPurchased(PeanutsPurchased {
            account: f.address1,
            count: 2,
            cost: ether("0.2"),
            remaining_stock: 8,
        })
    );
    let machine = f.chain.machine().unwrap();
    assert_eq!(machine.purchased_count_of(&f.address1), 2);
    assert_eq!(machine.consumer_deposit_of(&f.address1), ether("0.6"));
}

#[test]
fn test_buy_without_stock_reverts() {
    let mut f = deploy();
    f.chain.deposit(f.address1, ether("0.8")).unwrap();
    let result = f.chain.purchase(f.address1, 1);
    assert_eq!(
        result,
        Err(ChainError::Contract(VendingError::InsufficientStock {
            requested: 1,
            available: 0
        }))
    );
}

#[test]
fn test_buy_beyond_balance_reverts() {
    let mut f = deploy();
    f.chain.restock(f.owner, 10).unwrap();
    f.chain.deposit(f.address1, ether("0.5")).unwrap();
    let result = f.chain.purchase(f.address1, 6);
    assert!(matches!(
        result,
        Err(ChainError::Contract(VendingError::InsufficientFunds { .. }))
    ));
    assert_eq!(f.chain.machine().unwrap().inventory_balance(), 10);
}

// ─── withdrawal ───

#[test]
fn test_withdraw_leftover_after_purchase() {
    let mut f = deploy();
    f.chain.restock(f.owner, 10).unwrap();
    f.chain.deposit(f.address1, ether("0.8")).unwrap();
    f.chain.purchase(f.address1, 2).unwrap();
    let wallet_before = f.chain.balance_of(&f.address1);

    f.chain.withdraw(f.address1).unwrap();

    assert_eq!(
        f.chain.machine().unwrap().consumer_deposit_of(&f.address1),
        Wei::ZERO
    );
    assert_eq!(
        f.chain.balance_of(&f.address1),
        wallet_before.checked_add(ether("0.6")).unwrap()
    );

    // Second withdrawal moves nothing.
    f.chain.withdraw(f.address1).unwrap();
    assert_eq!(
        f.chain.balance_of(&f.address1),
        wallet_before.checked_add(ether("0.6")).unwrap()
    );
}

#[test]
fn test_deposit_buy_eight_and_withdraw() {
    let mut f = deploy();
    f.chain.restock(f.owner, 10).unwrap();
    f.chain.deposit(f.address1, ether("1")).unwrap();
    f.chain.purchase(f.address1, 8).unwrap();

    let machine = f.chain.machine().unwrap();
    assert_eq!(machine.purchased_count_of(&f.address1), 8);
    assert_eq!(machine.consumer_deposit_of(&f.address1), ether("0.2"));

    f.chain.withdraw(f.address1).unwrap();
    assert_eq!(
        f.chain.machine().unwrap().consumer_deposit_of(&f.address1),
        Wei::ZERO
    );
}

// ─── restockPeanuts ───

#[test]
fn test_owner_restocks() {
    let mut f = deploy();
    let initial = f.chain.machine().unwrap().inventory_balance();
    f.chain.restock(f.owner, 10).unwrap();
    assert_eq!(f.chain.machine().unwrap().inventory_balance(), initial + 10);
}

#[test]
fn test_non_owner_restock_reverts_with_message() {
    let mut f = deploy();
    let err = f.chain.restock(f.address1, 20).unwrap_err();
    assert_eq!(err.to_string(), "Ownable: caller is not the owner");
    assert_eq!(f.chain.machine().unwrap().inventory_balance(), 0);
}

// ─── hasNotBeenHacked ───

#[test]
fn test_not_compromised_after_normal_use() {
    let mut f = deploy();
    assert!(f.chain.has_not_been_compromised().unwrap());

    f.chain.restock(f.owner, 10).unwrap();
    f.chain.deposit(f.address1, ether("0.8")).unwrap();
    f.chain.deposit(f.address2, ether("1")).unwrap();
    f.chain.purchase(f.address1, 2).unwrap();
    f.chain.withdraw(f.address1).unwrap();

    assert!(f.chain.has_not_been_compromised().unwrap());
}

#[test]
fn test_event_log_records_successful_calls_only() {
    let mut f = deploy();
    f.chain.restock(f.owner, 5).unwrap();
    let _ = f.chain.restock(f.address1, 5);
    f.chain.deposit(f.address1, ether("0.5")).unwrap();
    let _ = f.chain.deposit(f.address1, ether("0.05"));

    let events = f.chain.machine().unwrap().events();
    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], ContractEvent::Deployed(_)));
    assert!(matches!(events[1], ContractEvent::Restocked(_)));
    assert!(matches!(events[2], ContractEvent::Deposited(_)));
}
