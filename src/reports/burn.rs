// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{Datelike, Local};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::TransactionType;
use crate::rates::RateMatrix;
use crate::store;
use crate::timeframe::{days_in_month, timeframe_bounds, ts_to_datetime};

/// One burn-rate entry: a calendar day when a month was requested, a whole
/// month otherwise. `adjusted_total` excludes single transactions at or
/// above the outlier threshold; `days` divides month totals into per-day
/// averages (today's day-of-month while the month is still open).
#[derive(Debug, Clone, Serialize)]
pub struct BurnRatePeriod {
    pub year: i32,
    pub month: u32,
    pub day: Option<u32>,
    pub raw_total: Decimal,
    pub adjusted_total: Decimal,
    pub days: u32,
}

impl BurnRatePeriod {
    pub fn label(&self) -> String {
        match self.day {
            Some(day) => format!("{}", day),
            None => format!("{}-{:02}", self.year, self.month),
        }
    }

    pub fn raw_per_day(&self) -> Decimal {
        self.raw_total / Decimal::from(self.days.max(1))
    }

    pub fn adjusted_per_day(&self) -> Decimal {
        self.adjusted_total / Decimal::from(self.days.max(1))
    }
}

/// Expense totals per day (month given) or per month (year only). Every
/// period in the requested range is present, zero-valued when silent.
pub fn burn_rate(
    conn: &Connection,
    matrix: &RateMatrix,
    threshold: Decimal,
    year: i32,
    month: Option<u32>,
) -> Result<Vec<BurnRatePeriod>> {
    let (from, to) = timeframe_bounds(year, month)?;
    let txs = store::load_homogenized(
        conn,
        matrix,
        Some((from, to)),
        Some(TransactionType::Expense),
    )?;

    // (raw, adjusted) keyed by day-of-month or by month
    let mut sums: HashMap<u32, (Decimal, Decimal)> = HashMap::new();
    for t in &txs {
        let date = ts_to_datetime(t.timestamp)?.date();
        let key = match month {
            Some(_) => date.day(),
            None => date.month(),
        };
        let amount = t.homogenized();
        let entry = sums.entry(key).or_default();
        entry.0 += amount;
        if amount.abs() < threshold {
            entry.1 += amount;
        }
    }

    let today = Local::now().date_naive();
    let mut out = Vec::new();
    match month {
        Some(m) => {
            for day in 1..=days_in_month(year, m)? {
                let (raw_total, adjusted_total) = sums.get(&day).copied().unwrap_or_default();
                out.push(BurnRatePeriod {
                    year,
                    month: m,
                    day: Some(day),
                    raw_total,
                    adjusted_total,
                    days: 1,
                });
            }
        }
        None => {
            for m in 1..=12 {
                let (raw_total, adjusted_total) = sums.get(&m).copied().unwrap_or_default();
                let not_over = today.year() == year && today.month() == m;
                let days = if not_over {
                    today.day()
                } else {
                    days_in_month(year, m)?
                };
                out.push(BurnRatePeriod {
                    year,
                    month: m,
                    day: None,
                    raw_total,
                    adjusted_total,
                    days,
                });
            }
        }
    }
    Ok(out)
}
