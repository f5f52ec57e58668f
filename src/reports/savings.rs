// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::DataError;
use crate::models::{AccountType, DailyBalance};
use crate::store;
use crate::timeframe::{period_separators, timeframe_bounds};

#[derive(Debug, Serialize)]
pub struct SavingsPoint {
    pub label: String,
    pub timestamp: i64,
    pub total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct SavingsReport {
    pub points: Vec<SavingsPoint>,
    /// Net change between the first and last separator.
    pub change: Decimal,
}

/// Balance of the savings accounts (savings type, in the given currency)
/// at each period separator of the year, summed into a "Total" series.
/// An account contributes its latest replayed balance at-or-before each
/// separator, zero before any history exists.
pub fn savings(conn: &Connection, year: i32, savings_currency: &str) -> Result<SavingsReport> {
    let currencies = store::currencies_by_id(conn)?;
    let accounts: Vec<_> = store::load_accounts(conn, false)?
        .into_iter()
        .filter(|a| a.account_type == AccountType::Savings)
        .collect();
    let mut savings_accounts = Vec::new();
    for account in accounts {
        let currency = currencies
            .get(&account.currency_id)
            .ok_or(DataError::MissingCurrency(account.currency_id))?;
        if currency.name_short == savings_currency {
            savings_accounts.push(account);
        }
    }

    let history = store::balance_history_by_account(conn)?;
    let empty: Vec<(i64, Decimal)> = Vec::new();

    let mut points = Vec::new();
    for sep in period_separators(year, None)? {
        let mut total = Decimal::ZERO;
        for account in &savings_accounts {
            let entries = history.get(&account.id).unwrap_or(&empty);
            let idx = entries.partition_point(|(ts, _)| *ts <= sep.timestamp);
            if idx > 0 {
                total += entries[idx - 1].1;
            }
        }
        points.push(SavingsPoint {
            label: sep.label,
            timestamp: sep.timestamp,
            total,
        });
    }

    let change = match (points.first(), points.last()) {
        (Some(first), Some(last)) => last.total - first.total,
        _ => Decimal::ZERO,
    };
    Ok(SavingsReport { points, change })
}

/// Compiled total-balance roll-up rows within the timeframe.
pub fn daily_balances(
    conn: &Connection,
    year: i32,
    month: Option<u32>,
) -> Result<Vec<DailyBalance>> {
    let (from, to) = timeframe_bounds(year, month)?;
    store::load_daily_balances(conn, from, to)
}
