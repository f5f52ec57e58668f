// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Datelike;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::errors::DataError;
use crate::models::TransactionType;
use crate::rates::RateMatrix;
use crate::store;
use crate::timeframe::{timeframe_bounds, ts_to_datetime};

#[derive(Debug, Default, Serialize)]
pub struct Totals {
    pub sum_expenses: Decimal,
    pub sum_income: Decimal,
}

/// Homogenized expense total and destination-amount income total for the
/// timeframe, scheduled transactions excluded.
pub fn totals(
    conn: &Connection,
    matrix: &RateMatrix,
    year: i32,
    month: Option<u32>,
) -> Result<Totals> {
    let (from, to) = timeframe_bounds(year, month)?;
    let txs = store::load_homogenized(conn, matrix, Some((from, to)), None)?;
    let mut out = Totals::default();
    for t in &txs {
        match t.tx_type {
            TransactionType::Expense => out.sum_expenses += t.homogenized(),
            TransactionType::Income => out.sum_income += t.destination_amount,
            TransactionType::Transfer => {}
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, Serialize)]
pub struct CashflowMonth {
    pub year: i32,
    pub month: u32,
    pub expense: Decimal,
    pub income: Decimal,
}

impl CashflowMonth {
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }
}

/// Per-month expense/income sums within the timeframe, merged into one
/// record per active month, chronological.
pub fn cashflow(
    conn: &Connection,
    matrix: &RateMatrix,
    year: i32,
    month: Option<u32>,
) -> Result<Vec<CashflowMonth>> {
    let (from, to) = timeframe_bounds(year, month)?;
    let txs = store::load_homogenized(conn, matrix, Some((from, to)), None)?;
    let mut months: BTreeMap<(i32, u32), CashflowMonth> = BTreeMap::new();
    for t in &txs {
        let date = ts_to_datetime(t.timestamp)?.date();
        let key = (date.year(), date.month());
        let entry = months.entry(key).or_insert_with(|| CashflowMonth {
            year: key.0,
            month: key.1,
            expense: Decimal::ZERO,
            income: Decimal::ZERO,
        });
        match t.tx_type {
            TransactionType::Expense => entry.expense += t.homogenized(),
            TransactionType::Income => entry.income += t.destination_amount,
            TransactionType::Transfer => {}
        }
    }
    Ok(months.into_values().collect())
}

#[derive(Debug, Serialize)]
pub struct AccountCashflow {
    pub account_id: i64,
    pub account: String,
    pub inflow: Decimal,
    pub outflow: Decimal,
}

/// Inflow/outflow per account over the timeframe, summed from the compiled
/// per-day cash-flow facts.
pub fn account_cashflows(
    conn: &Connection,
    year: i32,
    month: Option<u32>,
) -> Result<Vec<AccountCashflow>> {
    let (from, to) = timeframe_bounds(year, month)?;
    let accounts = store::accounts_by_id(conn)?;
    let rows = store::load_daily_cashflows(conn, from, to)?;
    let mut sums: BTreeMap<i64, (Decimal, Decimal)> = BTreeMap::new();
    for row in &rows {
        let entry = sums.entry(row.account_id).or_default();
        entry.0 += row.inflow;
        entry.1 += row.outflow;
    }
    let mut out = Vec::with_capacity(sums.len());
    for (account_id, (inflow, outflow)) in sums {
        let account = accounts
            .get(&account_id)
            .ok_or(DataError::MissingAccount(account_id))?;
        out.push(AccountCashflow {
            account_id,
            account: account.name.clone(),
            inflow,
            outflow,
        });
    }
    Ok(out)
}
