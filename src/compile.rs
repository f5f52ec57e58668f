// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! One-time ledger compilation: replays the transaction ledger into
//! per-account balance history, per-account-per-day cash flow, and the
//! daily total-balance roll-up. Gated by a persisted version marker and
//! executed in a single transaction, so a failed run leaves no partial
//! derived state and is safe to rerun.

use anyhow::Result;
use chrono::{Days, Local};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use crate::db;
use crate::errors::DataError;
use crate::models::{BalanceHistoryEntry, Transaction, TransactionType};
use crate::store;
use crate::timeframe::{day_floor, day_start_of, ts_to_datetime};

pub const COMPILE_VERSION: &str = "2";

/// Run the compiler if the snapshot has not been compiled at the current
/// version. Returns whether a compilation actually happened.
pub fn run(conn: &mut Connection) -> Result<bool> {
    if db::compile_version(conn)?.as_deref() == Some(COMPILE_VERSION) {
        return Ok(false);
    }
    let tx = conn.transaction()?;
    rebuild(&tx)?;
    db::set_compile_version(&tx, COMPILE_VERSION)?;
    tx.commit()?;
    Ok(true)
}

/// Drop the version marker so the next [`run`] recompiles.
pub fn invalidate(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM compile_state WHERE key='version'", [])?;
    Ok(())
}

fn rebuild(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM balance_history", [])?;
    conn.execute("DELETE FROM daily_account_cashflow", [])?;
    conn.execute("DELETE FROM daily_balance_history", [])?;

    let accounts = store::accounts_by_id(conn)?;
    let transactions = store::load_transactions(conn, None, None)?;

    let mut balances: HashMap<i64, Decimal> = accounts
        .iter()
        .map(|(id, a)| (*id, a.starting_balance))
        .collect();

    let mut history: HashMap<i64, Vec<(i64, Decimal)>> = HashMap::new();
    let mut insert = conn.prepare(
        "INSERT INTO balance_history(account_id, transaction_id, timestamp, balance)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    let mut emit = |entry: BalanceHistoryEntry| -> Result<()> {
        insert.execute(params![
            entry.account_id,
            entry.transaction_id,
            entry.timestamp,
            entry.balance.to_string()
        ])?;
        history
            .entry(entry.account_id)
            .or_default()
            .push((entry.timestamp, entry.balance));
        Ok(())
    };

    for t in &transactions {
        let source = balances
            .get_mut(&t.account_id)
            .ok_or(DataError::MissingAccount(t.account_id))?;
        match t.tx_type {
            TransactionType::Expense => {
                *source = (*source - t.amount).round_dp(2);
                let balance = *source;
                emit(entry(t, t.account_id, balance))?;
            }
            TransactionType::Income => {
                *source = (*source + t.destination_amount).round_dp(2);
                let balance = *source;
                emit(entry(t, t.account_id, balance))?;
            }
            TransactionType::Transfer => {
                *source = (*source - t.amount).round_dp(2);
                let source_balance = *source;
                let dest_id = t
                    .destination_id
                    .ok_or(DataError::MissingTransferDestination(t.id))?;
                let dest = balances
                    .get_mut(&dest_id)
                    .ok_or(DataError::MissingAccount(dest_id))?;
                *dest = (*dest + t.destination_amount).round_dp(2);
                let dest_balance = *dest;
                emit(entry(t, t.account_id, source_balance))?;
                emit(entry(t, dest_id, dest_balance))?;
            }
        }
    }
    drop(emit);
    drop(insert);

    write_daily_cashflows(conn, &transactions)?;
    write_daily_balances(conn, &transactions, &history)?;
    Ok(())
}

fn entry(t: &Transaction, account_id: i64, balance: Decimal) -> BalanceHistoryEntry {
    BalanceHistoryEntry {
        account_id,
        transaction_id: t.id,
        timestamp: t.timestamp,
        balance,
    }
}

/// Group same-day transactions per account into inflow/outflow. Income and
/// transfer-in count as inflow; expense and transfer-out as outflow. Days
/// where both sides stay zero are skipped.
fn write_daily_cashflows(conn: &Connection, transactions: &[Transaction]) -> Result<()> {
    let mut flows: BTreeMap<(i64, i64), (Decimal, Decimal)> = BTreeMap::new();
    for t in transactions {
        let day = day_floor(t.timestamp)?;
        match t.tx_type {
            TransactionType::Expense => {
                flows.entry((day, t.account_id)).or_default().1 += t.amount;
            }
            TransactionType::Income => {
                flows.entry((day, t.account_id)).or_default().0 += t.destination_amount;
            }
            TransactionType::Transfer => {
                flows.entry((day, t.account_id)).or_default().1 += t.amount;
                let dest_id = t
                    .destination_id
                    .ok_or(DataError::MissingTransferDestination(t.id))?;
                flows.entry((day, dest_id)).or_default().0 += t.destination_amount;
            }
        }
    }

    let mut insert = conn.prepare(
        "INSERT INTO daily_account_cashflow(timestamp, account_id, inflow, outflow)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for ((day, account_id), (inflow, outflow)) in flows {
        if inflow.is_zero() && outflow.is_zero() {
            continue;
        }
        insert.execute(params![
            day,
            account_id,
            inflow.round_dp(2).to_string(),
            outflow.round_dp(2).to_string()
        ])?;
    }
    Ok(())
}

/// One row per calendar day from the day after the earliest transaction
/// through today: the sum over in-balance accounts of the latest replayed
/// balance at-or-before that day's midnight, the starting balance before
/// any history exists.
fn write_daily_balances(
    conn: &Connection,
    transactions: &[Transaction],
    history: &HashMap<i64, Vec<(i64, Decimal)>>,
) -> Result<()> {
    let Some(first) = transactions.first() else {
        return Ok(());
    };
    let in_balance: Vec<_> = store::load_accounts(conn, true)?
        .into_iter()
        .filter(|a| a.is_in_balance)
        .collect();

    let start = ts_to_datetime(first.timestamp)?
        .date()
        .checked_add_days(Days::new(1))
        .ok_or_else(|| anyhow::anyhow!("Date overflow after {}", first.timestamp))?;
    let today = Local::now().date_naive();

    let mut insert = conn
        .prepare("INSERT INTO daily_balance_history(timestamp, balance) VALUES (?1, ?2)")?;
    let mut day = start;
    while day <= today {
        let ts = day_start_of(day)?;
        let mut total = Decimal::ZERO;
        for account in &in_balance {
            total += match history.get(&account.id) {
                Some(entries) => {
                    let idx = entries.partition_point(|(t, _)| *t <= ts);
                    if idx == 0 {
                        account.starting_balance
                    } else {
                        entries[idx - 1].1
                    }
                }
                None => account.starting_balance,
            };
        }
        insert.execute(params![ts, total.round_dp(2).to_string()])?;
        day = day
            .checked_add_days(Days::new(1))
            .ok_or_else(|| anyhow::anyhow!("Date overflow after {}", day))?;
    }
    Ok(())
}
