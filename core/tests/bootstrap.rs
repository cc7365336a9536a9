//! Schema, seeding, account opening and config loading.

use ledger_core::{
    config::{Isolation, StoreConfig},
    store::{demo_accounts, AccountRow, LedgerStore},
    LedgerError, Money,
};
use uuid::Uuid;

fn store() -> LedgerStore {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = LedgerStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

#[test]
fn migrations_are_idempotent() {
    let store = store();
    store.migrate().expect("second migration run");
    assert!(store.accounts().unwrap().is_empty());
    assert_eq!(store.transfer_count().unwrap(), 0);
}

#[test]
fn demo_seed_matches_starting_state() {
    let mut store = store();
    store.seed_demo_accounts().expect("seed");

    let accounts = store.accounts().unwrap();
    assert_eq!(accounts, demo_accounts());
    assert_eq!(accounts[0].owner_name, "Alice");
    assert_eq!(accounts[0].balance.to_string(), "1000.00");
    assert_eq!(accounts[1].balance.to_string(), "500.00");

    // Seeding again starts fresh rather than duplicating.
    store.seed_demo_accounts().expect("re-seed");
    assert_eq!(store.accounts().unwrap().len(), 2);
}

#[test]
fn open_accounts_is_all_or_nothing() {
    let mut store = store();
    store
        .insert_account(&AccountRow::new("2001", "Dana", Money::from_minor_units(100)))
        .unwrap();

    let batch = [
        AccountRow::new("2002", "Eve", Money::from_minor_units(200)),
        AccountRow::new("2001", "Dana again", Money::from_minor_units(300)),
    ];
    let err = store.open_accounts(&batch).expect_err("duplicate key");
    assert!(matches!(err, LedgerError::Database(_)), "got {err:?}");

    assert!(store.account("2002").unwrap().is_none(), "partial batch was committed");
    assert_eq!(store.accounts().unwrap().len(), 1);

    let opened = store
        .open_accounts(&[
            AccountRow::new("2003", "Finn", Money::ZERO),
            AccountRow::new("2002", "Eve", Money::from_minor_units(200)),
        ])
        .unwrap();
    assert_eq!(opened, 2);
    let numbers: Vec<_> = store
        .accounts()
        .unwrap()
        .into_iter()
        .map(|a| a.account_number)
        .collect();
    assert_eq!(numbers, ["2001", "2002", "2003"]);
    assert_eq!(store.total_balance().unwrap(), Money::from_minor_units(300));
}

#[test]
fn negative_opening_balances_are_rejected() {
    let mut store = store();
    let overdrawn = AccountRow::new("2101", "Ivy", Money::from_minor_units(-1));

    let err = store.insert_account(&overdrawn).expect_err("negative balance");
    match &err {
        LedgerError::InvalidAccount { account, .. } => assert_eq!(account, "2101"),
        other => panic!("expected InvalidAccount, got {other:?}"),
    }

    let batch = [
        AccountRow::new("2102", "Jo", Money::from_minor_units(500)),
        overdrawn,
    ];
    let err = store.open_accounts(&batch).expect_err("negative balance in batch");
    assert!(matches!(err, LedgerError::InvalidAccount { .. }), "got {err:?}");
    assert!(store.accounts().unwrap().is_empty(), "batch was partly opened");
}

#[test]
fn unknown_account_lookups_are_none() {
    let store = store();
    assert!(store.account("missing").unwrap().is_none());
    assert!(store.balance("missing").unwrap().is_none());
    assert_eq!(store.total_balance().unwrap(), Money::ZERO);
}

#[test]
fn config_loads_from_json_file() {
    let path = std::env::temp_dir().join(format!("ledger-config-{}.json", Uuid::new_v4()));
    std::fs::write(
        &path,
        r#"{ "path": "bank.db", "isolation": "exclusive", "busy_timeout_ms": 42 }"#,
    )
    .unwrap();

    let config = StoreConfig::load(&path.to_string_lossy()).expect("load config");
    let _ = std::fs::remove_file(&path);

    assert_eq!(config.path, "bank.db");
    assert_eq!(config.isolation, Isolation::Exclusive);
    assert_eq!(config.busy_timeout_ms, 42);
}

#[test]
fn config_load_reports_missing_file() {
    let err = StoreConfig::load("/definitely/not/here.json").expect_err("missing file");
    assert!(err.to_string().contains("Cannot read"), "got {err}");
}

#[test]
fn reopen_of_memory_store_is_isolated() {
    let mut store = store();
    store.seed_demo_accounts().unwrap();

    let other = store.reopen().expect("reopen");
    other.migrate().unwrap();
    assert!(other.accounts().unwrap().is_empty());
    assert_eq!(other.config(), store.config());
}
