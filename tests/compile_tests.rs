// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE currencies(id INTEGER PRIMARY KEY, name_short TEXT, symbol TEXT, is_default INTEGER);
        CREATE TABLE accounts(id INTEGER PRIMARY KEY, type INTEGER, currency_id INTEGER, name TEXT,
            starting_balance REAL, balance REAL, is_in_balance INTEGER, show_order INTEGER, is_archived INTEGER);
        CREATE TABLE categories(id INTEGER PRIMARY KEY, type INTEGER, name TEXT, color INTEGER, parent_category_id INTEGER);
        CREATE TABLE transactions(id INTEGER PRIMARY KEY, type INTEGER, timestamp INTEGER, currency_id INTEGER,
            account_id INTEGER, destination_id INTEGER, amount REAL, destination_amount REAL, comment TEXT, is_scheduled INTEGER);
        "#,
    )
    .unwrap();
    ledgerlens::db::ensure_derived_schema(&conn).unwrap();
    conn.execute(
        "INSERT INTO currencies(id,name_short,symbol,is_default) VALUES (1,'UAH','₴',1)",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO categories(id,type,name,color,parent_category_id) VALUES (10,1,'Groceries',0,NULL)",
        [],
    )
    .unwrap();
    conn
}

fn add_account(conn: &Connection, id: i64, starting_balance: f64) {
    conn.execute(
        "INSERT INTO accounts(id,type,currency_id,name,starting_balance,balance,is_in_balance,show_order,is_archived)
         VALUES (?1,0,1,?2,?3,?3,1,?1,0)",
        params![id, format!("Account {}", id), starting_balance],
    )
    .unwrap();
}

fn add_tx(
    conn: &Connection,
    id: i64,
    tx_type: i64,
    timestamp: i64,
    account_id: i64,
    destination_id: Option<i64>,
    amount: f64,
    destination_amount: f64,
) {
    conn.execute(
        "INSERT INTO transactions(id,type,timestamp,currency_id,account_id,destination_id,amount,destination_amount,comment,is_scheduled)
         VALUES (?1,?2,?3,1,?4,?5,?6,?7,NULL,0)",
        params![id, tx_type, timestamp, account_id, destination_id, amount, destination_amount],
    )
    .unwrap();
}

fn ts(y: i32, m: u32, d: u32, h: u32) -> i64 {
    chrono::NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp()
}

#[test]
fn expense_replay_emits_rounded_balance() {
    let mut conn = setup();
    add_account(&conn, 1, 500.0);
    add_tx(&conn, 1, 0, ts(2024, 3, 10, 12), 1, Some(10), 100.0, 0.0);

    assert!(ledgerlens::compile::run(&mut conn).unwrap());

    let history = ledgerlens::store::balance_history_by_account(&conn).unwrap();
    let entries = &history[&1];
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, ts(2024, 3, 10, 12));
    assert_eq!(entries[0].1, Decimal::from(400));
}

#[test]
fn cross_currency_transfer_emits_two_rows() {
    let mut conn = setup();
    add_account(&conn, 1, 500.0);
    add_account(&conn, 2, 0.0);
    add_tx(&conn, 1, 2, ts(2024, 3, 10, 9), 1, Some(2), 50.0, 48.0);

    ledgerlens::compile::run(&mut conn).unwrap();

    let history = ledgerlens::store::balance_history_by_account(&conn).unwrap();
    assert_eq!(history[&1], vec![(ts(2024, 3, 10, 9), Decimal::from(450))]);
    assert_eq!(history[&2], vec![(ts(2024, 3, 10, 9), Decimal::from(48))]);

    let tx_ids: Vec<i64> = {
        let mut stmt = conn
            .prepare("SELECT transaction_id FROM balance_history ORDER BY id")
            .unwrap();
        let rows = stmt.query_map([], |r| r.get(0)).unwrap();
        rows.map(|r| r.unwrap()).collect()
    };
    assert_eq!(tx_ids, vec![1, 1]);
}

#[test]
fn replay_conserves_account_totals() {
    let mut conn = setup();
    add_account(&conn, 1, 1000.0);
    add_account(&conn, 2, 200.0);
    // expenses 120.50 + 30, income 75.25, transfer 100 -> account 2
    add_tx(&conn, 1, 0, ts(2024, 1, 5, 10), 1, Some(10), 120.50, 0.0);
    add_tx(&conn, 2, 1, ts(2024, 1, 6, 10), 1, None, 75.25, 75.25);
    add_tx(&conn, 3, 2, ts(2024, 1, 7, 10), 1, Some(2), 100.0, 100.0);
    add_tx(&conn, 4, 0, ts(2024, 1, 8, 10), 1, Some(10), 30.0, 0.0);

    ledgerlens::compile::run(&mut conn).unwrap();

    let history = ledgerlens::store::balance_history_by_account(&conn).unwrap();
    // 1000 - 120.50 + 75.25 - 100 - 30 = 824.75
    assert_eq!(history[&1].last().unwrap().1, Decimal::new(82475, 2));
    // 200 + 100 = 300
    assert_eq!(history[&2].last().unwrap().1, Decimal::from(300));
}

#[test]
fn recompilation_is_gated_and_idempotent() {
    let mut conn = setup();
    add_account(&conn, 1, 500.0);
    add_tx(&conn, 1, 0, ts(2024, 3, 10, 12), 1, Some(10), 100.0, 0.0);

    assert!(ledgerlens::compile::run(&mut conn).unwrap());
    let count = |conn: &Connection| -> i64 {
        conn.query_row("SELECT COUNT(*) FROM balance_history", [], |r| r.get(0))
            .unwrap()
    };
    let first = count(&conn);

    // Same version: a no-op
    assert!(!ledgerlens::compile::run(&mut conn).unwrap());
    assert_eq!(count(&conn), first);

    // Forced rerun replaces, never appends
    ledgerlens::compile::invalidate(&conn).unwrap();
    assert!(ledgerlens::compile::run(&mut conn).unwrap());
    assert_eq!(count(&conn), first);
}

#[test]
fn daily_cashflow_groups_per_account_per_day() {
    let mut conn = setup();
    add_account(&conn, 1, 500.0);
    add_account(&conn, 2, 0.0);
    add_tx(&conn, 1, 0, ts(2024, 3, 10, 9), 1, Some(10), 100.0, 0.0);
    add_tx(&conn, 2, 1, ts(2024, 3, 10, 15), 1, None, 200.0, 200.0);
    add_tx(&conn, 3, 2, ts(2024, 3, 12, 9), 1, Some(2), 50.0, 48.0);

    ledgerlens::compile::run(&mut conn).unwrap();

    let rows =
        ledgerlens::store::load_daily_cashflows(&conn, ts(2024, 3, 1, 0), ts(2024, 4, 1, 0))
            .unwrap();
    assert_eq!(rows.len(), 3);

    // Account 1 on the 10th: income in, expense out, one merged row
    assert_eq!(rows[0].account_id, 1);
    assert_eq!(rows[0].timestamp, ts(2024, 3, 10, 0));
    assert_eq!(rows[0].inflow, Decimal::from(200));
    assert_eq!(rows[0].outflow, Decimal::from(100));

    // Transfer on the 12th: outflow on source, inflow on destination
    assert_eq!(rows[1].account_id, 1);
    assert_eq!(rows[1].outflow, Decimal::from(50));
    assert_eq!(rows[2].account_id, 2);
    assert_eq!(rows[2].inflow, Decimal::from(48));
}

#[test]
fn dangling_account_reference_rolls_back_whole_run() {
    let mut conn = setup();
    add_account(&conn, 1, 500.0);
    add_tx(&conn, 1, 0, ts(2024, 3, 10, 9), 1, Some(10), 100.0, 0.0);
    // references account 99 which does not exist
    add_tx(&conn, 2, 0, ts(2024, 3, 11, 9), 99, Some(10), 10.0, 0.0);

    assert!(ledgerlens::compile::run(&mut conn).is_err());

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM balance_history", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
    assert_eq!(ledgerlens::db::compile_version(&conn).unwrap(), None);
}

#[test]
fn scheduled_transactions_are_ignored() {
    let mut conn = setup();
    add_account(&conn, 1, 500.0);
    conn.execute(
        "INSERT INTO transactions(id,type,timestamp,currency_id,account_id,destination_id,amount,destination_amount,comment,is_scheduled)
         VALUES (1,0,?1,1,1,10,100.0,0.0,NULL,1)",
        params![ts(2024, 3, 10, 9)],
    )
    .unwrap();

    ledgerlens::compile::run(&mut conn).unwrap();

    let history = ledgerlens::store::balance_history_by_account(&conn).unwrap();
    assert!(history.is_empty());
}
