// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed row loaders over the ledger snapshot and the derived-fact tables.
//! Every query maps into a named struct; no positional tuples escape this
//! module.

use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::errors::DataError;
use crate::models::{
    Account, AccountType, Category, CategoryType, Currency, DailyAccountCashflow, DailyBalance,
    Transaction, TransactionType,
};
use crate::rates::RateMatrix;

fn dec(v: f64, what: &str) -> Result<Decimal> {
    Decimal::try_from(v).with_context(|| format!("Invalid {} value '{}'", what, v))
}

fn parse_dec(s: &str, what: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid stored {} '{}'", what, s))
}

pub fn load_currencies(conn: &Connection) -> Result<Vec<Currency>> {
    let mut stmt = conn.prepare("SELECT id, name_short, symbol, is_default FROM currencies")?;
    let rows = stmt.query_map([], |r| {
        Ok(Currency {
            id: r.get(0)?,
            name_short: r.get(1)?,
            symbol: r.get::<_, Option<String>>(2)?.unwrap_or_default(),
            is_default: r.get(3)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn currencies_by_id(conn: &Connection) -> Result<HashMap<i64, Currency>> {
    Ok(load_currencies(conn)?
        .into_iter()
        .map(|c| (c.id, c))
        .collect())
}

pub fn load_accounts(conn: &Connection, with_archived: bool) -> Result<Vec<Account>> {
    let mut sql = String::from(
        "SELECT id, type, currency_id, name, starting_balance, balance,
                is_in_balance, show_order, is_archived
         FROM accounts",
    );
    if !with_archived {
        sql.push_str(" WHERE is_archived = 0");
    }
    sql.push_str(" ORDER BY show_order");

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let type_code: i64 = r.get(1)?;
        let starting: Option<f64> = r.get(4)?;
        let balance: Option<f64> = r.get(5)?;
        out.push(Account {
            id: r.get(0)?,
            account_type: AccountType::from_code(type_code)?,
            currency_id: r.get(2)?,
            name: r.get(3)?,
            starting_balance: dec(starting.unwrap_or(0.0), "starting_balance")?,
            balance: dec(balance.unwrap_or(0.0), "balance")?,
            is_in_balance: r.get(6)?,
            show_order: r.get::<_, Option<i64>>(7)?.unwrap_or(0),
            is_archived: r.get(8)?,
        });
    }
    Ok(out)
}

pub fn accounts_by_id(conn: &Connection) -> Result<HashMap<i64, Account>> {
    Ok(load_accounts(conn, true)?
        .into_iter()
        .map(|a| (a.id, a))
        .collect())
}

pub fn load_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt =
        conn.prepare("SELECT id, type, name, color, parent_category_id FROM categories")?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let type_code: i64 = r.get(1)?;
        out.push(Category {
            id: r.get(0)?,
            category_type: CategoryType::from_code(type_code)?,
            name: r.get(2)?,
            color: r.get::<_, Option<i64>>(3)?.unwrap_or(0),
            parent_category_id: r.get(4)?,
        });
    }
    Ok(out)
}

/// Id-indexed category dictionary. Parent links stay as id references and
/// are rejected when they form a cycle, so read-time resolution can never
/// loop.
pub fn categories_by_id(conn: &Connection) -> Result<HashMap<i64, Category>> {
    let categories: HashMap<i64, Category> = load_categories(conn)?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    validate_ancestry(&categories)?;
    Ok(categories)
}

fn validate_ancestry(categories: &HashMap<i64, Category>) -> Result<(), DataError> {
    for cat in categories.values() {
        let mut hops = 0usize;
        let mut cursor = cat.parent_category_id;
        while let Some(parent_id) = cursor {
            if parent_id == cat.id || hops > categories.len() {
                return Err(DataError::CategoryCycle(cat.id));
            }
            hops += 1;
            cursor = categories
                .get(&parent_id)
                .and_then(|p| p.parent_category_id);
        }
    }
    Ok(())
}

fn transactions_sql(range: Option<(i64, i64)>, tx_type: Option<TransactionType>) -> String {
    let mut sql = String::from(
        "SELECT id, type, timestamp, currency_id, account_id, destination_id,
                amount, destination_amount, comment, is_scheduled
         FROM transactions WHERE is_scheduled = 0",
    );
    if range.is_some() {
        sql.push_str(" AND timestamp >= ?1 AND timestamp < ?2");
    }
    if let Some(t) = tx_type {
        let code = match t {
            TransactionType::Expense => 0,
            TransactionType::Income => 1,
            TransactionType::Transfer => 2,
        };
        sql.push_str(&format!(" AND type = {}", code));
    }
    // Stable replay order: ties broken by id
    sql.push_str(" ORDER BY timestamp ASC, id ASC");
    sql
}

/// Non-scheduled transactions in replay order, without currency
/// normalization (`homogenized_amount` left empty). The compiler uses this;
/// reports go through [`load_homogenized`].
pub fn load_transactions(
    conn: &Connection,
    range: Option<(i64, i64)>,
    tx_type: Option<TransactionType>,
) -> Result<Vec<Transaction>> {
    let sql = transactions_sql(range, tx_type);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = match range {
        Some((from, to)) => stmt.query(params![from, to])?,
        None => stmt.query([])?,
    };
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let type_code: i64 = r.get(1)?;
        let amount: f64 = r.get(6)?;
        let destination_amount: Option<f64> = r.get(7)?;
        out.push(Transaction {
            id: r.get(0)?,
            tx_type: TransactionType::from_code(type_code)?,
            timestamp: r.get(2)?,
            currency_id: r.get(3)?,
            account_id: r.get(4)?,
            destination_id: r.get(5)?,
            amount: dec(amount, "amount")?,
            destination_amount: dec(destination_amount.unwrap_or(0.0), "destination_amount")?,
            homogenized_amount: None,
            comment: r.get(8)?,
            is_scheduled: r.get(9)?,
        });
    }
    Ok(out)
}

/// Transactions with `homogenized_amount` populated from the rate matrix.
/// The per-transaction currency wins; rows without one inherit their
/// account's currency.
pub fn load_homogenized(
    conn: &Connection,
    matrix: &RateMatrix,
    range: Option<(i64, i64)>,
    tx_type: Option<TransactionType>,
) -> Result<Vec<Transaction>> {
    let currencies = currencies_by_id(conn)?;
    let accounts = accounts_by_id(conn)?;
    let mut txs = load_transactions(conn, range, tx_type)?;
    for t in &mut txs {
        let currency_id = match t.currency_id {
            Some(id) => id,
            None => {
                accounts
                    .get(&t.account_id)
                    .ok_or(DataError::MissingAccount(t.account_id))?
                    .currency_id
            }
        };
        let currency = currencies
            .get(&currency_id)
            .ok_or(DataError::MissingCurrency(currency_id))?;
        let factor = dec(matrix.to_base(&currency.name_short)?, "exchange rate")?;
        t.homogenized_amount = Some((t.amount * factor).round_dp(2));
    }
    Ok(txs)
}

/// Per-account balance history as (timestamp, balance) vectors, ascending.
/// Replay writes rows in timestamp order, so insertion order is already
/// sorted; the query re-states it for safety against manual edits.
pub fn balance_history_by_account(conn: &Connection) -> Result<HashMap<i64, Vec<(i64, Decimal)>>> {
    let mut stmt = conn.prepare(
        "SELECT account_id, timestamp, balance FROM balance_history
         ORDER BY account_id, timestamp, id",
    )?;
    let mut rows = stmt.query([])?;
    let mut out: HashMap<i64, Vec<(i64, Decimal)>> = HashMap::new();
    while let Some(r) = rows.next()? {
        let account_id: i64 = r.get(0)?;
        let timestamp: i64 = r.get(1)?;
        let balance: String = r.get(2)?;
        out.entry(account_id)
            .or_default()
            .push((timestamp, parse_dec(&balance, "balance")?));
    }
    Ok(out)
}

pub fn load_daily_balances(conn: &Connection, from: i64, to: i64) -> Result<Vec<DailyBalance>> {
    let mut stmt = conn.prepare(
        "SELECT timestamp, balance FROM daily_balance_history
         WHERE timestamp >= ?1 AND timestamp < ?2 ORDER BY timestamp",
    )?;
    let mut rows = stmt.query(params![from, to])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let balance: String = r.get(1)?;
        out.push(DailyBalance {
            timestamp: r.get(0)?,
            balance: parse_dec(&balance, "balance")?,
        });
    }
    Ok(out)
}

pub fn load_daily_cashflows(
    conn: &Connection,
    from: i64,
    to: i64,
) -> Result<Vec<DailyAccountCashflow>> {
    let mut stmt = conn.prepare(
        "SELECT timestamp, account_id, inflow, outflow FROM daily_account_cashflow
         WHERE timestamp >= ?1 AND timestamp < ?2 ORDER BY timestamp, account_id",
    )?;
    let mut rows = stmt.query(params![from, to])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let inflow: String = r.get(2)?;
        let outflow: String = r.get(3)?;
        out.push(DailyAccountCashflow {
            timestamp: r.get(0)?,
            account_id: r.get(1)?,
            inflow: parse_dec(&inflow, "inflow")?,
            outflow: parse_dec(&outflow, "outflow")?,
        });
    }
    Ok(out)
}
