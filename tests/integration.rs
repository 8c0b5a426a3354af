use std::{path::Path, str::from_utf8};

use cute_teller::{
    bin_utils::{
        Teller,
        csv_printer::{AccountRow, print_accounts},
    },
    store::{AccountStore, json_file::JsonFileStorage},
    transfer::TransferEngine,
};
use rust_decimal::Decimal;

const SESSION: &str = include_str!("session.txt");

fn run_teller(path: &Path, script: &str) -> String {
    let mut store = AccountStore::new(JsonFileStorage::new(path));
    store.load().unwrap();
    let mut output = Vec::new();
    let teller = Teller {
        input: script.as_bytes(),
        output: &mut output,
        engine: TransferEngine::default(),
    };
    teller.run(&mut store).unwrap();
    String::from_utf8(output).unwrap()
}

fn reload(path: &Path) -> AccountStore<JsonFileStorage> {
    let mut store = AccountStore::new(JsonFileStorage::new(path));
    store.load().unwrap();
    store
}

#[test]
fn register_login_and_transfer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("accounts.json");

    let output = run_teller(&path, SESSION);

    assert!(output.contains("Account 111111111111 created with opening balance 100."));
    // unparsable opening balance falls back to zero
    assert!(output.contains("Account 222222222222 created with opening balance 0."));
    assert!(output.contains("Account number must be exactly 12 digits, got `12345`"));
    assert!(output.contains("Welcome, Nino Beridze!"));
    assert!(output.contains("Invalid amount!"));
    assert!(output.contains("Amount must be positive, got 0"));
    assert!(output.contains("Transferred 20 to 222222222222 (fee: 0.5)"));
    assert!(output.contains("Current balance: 79.5"));
    assert!(output.contains("You have logged out."));
    assert!(output.ends_with("Goodbye!\n"));

    let store = reload(&path);
    assert_eq!(store.len(), 2);
    assert_eq!(
        store.find_by_number("111111111111").unwrap().balance(),
        Decimal::new(795, 1)
    );
    assert_eq!(
        store.find_by_number("222222222222").unwrap().balance(),
        Decimal::from(20)
    );

    let mut report = Vec::new();
    print_accounts(&mut report, store.accounts().map(AccountRow::from)).unwrap();
    assert_eq!(
        from_utf8(&report).unwrap(),
        "account_number,fullname,balance\n111111111111,Nino Beridze,79.5\n222222222222,Levan,20\n"
    );
}

#[test]
fn failed_login_then_close_account() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("accounts.json");
    run_teller(&path, "2\n111111111111\nNino\npass1\n40\n3\n");

    let output = run_teller(
        &path,
        "1\n999999999999\n1\n111111111111\nwrong\n1\n111111111111\npass1\n4\n999999999999\n5\n\n",
    );

    assert!(output.contains("Account not found!"));
    assert!(output.contains("Wrong credential for account 111111111111"));
    assert!(output.contains("Recipient account not found!"));
    assert!(output.contains("Account closed. Logging out..."));
    assert!(reload(&path).is_empty());
}

#[test]
fn insufficient_funds_transfer_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("accounts.json");
    run_teller(
        &path,
        "2\n111111111111\nNino\npass1\n10\n2\n222222222222\nLevan\npass2\n10\n",
    );

    let output = run_teller(&path, "1\n111111111111\npass1\n4\n222222222222\n20\n");

    assert!(output.contains("Insufficient funds: requested 20.5, available 10"));
    let store = reload(&path);
    assert_eq!(store.total_balance(), Decimal::from(20));
}

#[test]
fn malformed_snapshot_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("accounts.json");
    std::fs::write(&path, r#"{"accounts": "oops"}"#).unwrap();

    let mut store = AccountStore::new(JsonFileStorage::new(&path));
    assert!(store.load().is_err());
    assert!(store.is_empty());

    let mut output = Vec::new();
    Teller {
        input: "2\n111111111111\nNino\npass1\n1\n".as_bytes(),
        output: &mut output,
        engine: TransferEngine::default(),
    }
    .run(&mut store)
    .unwrap();
    assert_eq!(reload(&path).len(), 1);
}

#[test]
fn scientific_notation_amounts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("accounts.json");
    run_teller(&path, "2\n111111111111\nNino\npass1\n1e2\n");

    let output = run_teller(&path, "1\n111111111111\npass1\n2\n2.5e1\n3\n5e-1\n");

    assert!(output.contains("Current balance: 125"));
    assert!(output.contains("Remaining balance: 124.5"));
    assert_eq!(
        reload(&path).find_by_number("111111111111").unwrap().balance(),
        Decimal::new(1245, 1)
    );
}
