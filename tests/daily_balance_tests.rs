// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Local, NaiveDate};
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

fn ts(y: i32, m: u32, d: u32, h: u32) -> i64 {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp()
}

#[test]
fn rollup_covers_every_day_since_first_transaction() {
    let mut conn = setup();
    conn.execute(
        "INSERT INTO accounts(id,type,currency_id,name,starting_balance,balance,is_in_balance,show_order,is_archived)
         VALUES (1,0,1,'Main',500.0,400.0,1,1,0)",
        [],
    )
    .unwrap();
    // Tracking-only account must not count toward the total
    conn.execute(
        "INSERT INTO accounts(id,type,currency_id,name,starting_balance,balance,is_in_balance,show_order,is_archived)
         VALUES (2,4,1,'Credit tracker',9999.0,9999.0,0,2,0)",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(id,type,timestamp,currency_id,account_id,destination_id,amount,destination_amount,comment,is_scheduled)
         VALUES (1,0,?1,1,1,10,100.0,0.0,NULL,0)",
        params![ts(2026, 6, 10, 12)],
    )
    .unwrap();

    ledgerlens::compile::run(&mut conn).unwrap();

    let rows = ledgerlens::store::load_daily_balances(&conn, 0, i64::MAX).unwrap();
    let start = NaiveDate::from_ymd_opt(2026, 6, 11).unwrap();
    let today = Local::now().date_naive();
    let expected_days = (today - start).num_days() + 1;
    assert_eq!(rows.len() as i64, expected_days);

    // First row is the day after the earliest transaction, already at 400
    assert_eq!(
        rows[0].timestamp,
        start.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp()
    );
    for row in &rows {
        assert_eq!(row.balance, Decimal::from(400));
    }
}

#[test]
fn rollup_uses_starting_balance_before_history() {
    let mut conn = setup();
    conn.execute(
        "INSERT INTO accounts(id,type,currency_id,name,starting_balance,balance,is_in_balance,show_order,is_archived)
         VALUES (1,0,1,'Main',500.0,400.0,1,1,0)",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO accounts(id,type,currency_id,name,starting_balance,balance,is_in_balance,show_order,is_archived)
         VALUES (2,0,1,'Untouched',250.0,250.0,1,2,0)",
        [],
    )
    .unwrap();
    // Only account 1 ever transacts
    conn.execute(
        "INSERT INTO transactions(id,type,timestamp,currency_id,account_id,destination_id,amount,destination_amount,comment,is_scheduled)
         VALUES (1,0,?1,1,1,10,100.0,0.0,NULL,0)",
        params![ts(2026, 7, 1, 12)],
    )
    .unwrap();

    ledgerlens::compile::run(&mut conn).unwrap();

    let rows = ledgerlens::store::load_daily_balances(&conn, 0, i64::MAX).unwrap();
    // 400 replayed + 250 starting balance with no history
    for row in &rows {
        assert_eq!(row.balance, Decimal::from(650));
    }
}

#[test]
fn daily_balances_report_respects_timeframe() {
    let mut conn = setup();
    conn.execute(
        "INSERT INTO accounts(id,type,currency_id,name,starting_balance,balance,is_in_balance,show_order,is_archived)
         VALUES (1,0,1,'Main',500.0,500.0,1,1,0)",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(id,type,timestamp,currency_id,account_id,destination_id,amount,destination_amount,comment,is_scheduled)
         VALUES (1,0,?1,1,1,10,100.0,0.0,NULL,0)",
        params![ts(2026, 6, 10, 12)],
    )
    .unwrap();

    ledgerlens::compile::run(&mut conn).unwrap();

    let june = ledgerlens::reports::savings::daily_balances(&conn, 2026, Some(6)).unwrap();
    // June 11 through June 30 inclusive
    assert_eq!(june.len(), 20);
    assert_eq!(june[0].timestamp, ts(2026, 6, 11, 0));
    assert_eq!(june.last().unwrap().timestamp, ts(2026, 6, 30, 0));
}
