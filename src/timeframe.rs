// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// A labeled timestamp boundary segmenting a time series. Consumers rely on
/// vector order, not on sorting labels.
#[derive(Debug, Clone, Serialize)]
pub struct Separator {
    pub label: String,
    pub timestamp: i64,
}

fn day_start(year: i32, month: u32, day: u32) -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| anyhow!("Invalid date {:04}-{:02}-{:02}", year, month, day))
}

fn to_ts(dt: NaiveDateTime) -> i64 {
    dt.and_utc().timestamp()
}

/// Half-open `[from, to)` interval covering the whole year, or the whole
/// calendar month when one is given. December rolls into next January.
pub fn timeframe_bounds(year: i32, month: Option<u32>) -> Result<(i64, i64)> {
    let (from, to) = match month {
        Some(12) => (day_start(year, 12, 1)?, day_start(year + 1, 1, 1)?),
        Some(m) => (day_start(year, m, 1)?, day_start(year, m + 1, 1)?),
        None => (day_start(year, 1, 1)?, day_start(year + 1, 1, 1)?),
    };
    Ok((to_ts(from), to_ts(to)))
}

pub fn days_in_month(year: i32, month: u32) -> Result<u32> {
    let days = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
        _ => return Err(anyhow!("Invalid month number {}", month)),
    };
    Ok(days)
}

/// Ordered separators for sub-period breakdowns: one per day of the month
/// (zero-padded day labels) when a month is given, else one per month-start
/// ("Jan 01" style) plus a terminal "Dec 31" separator at next-year's start.
/// Future boundaries are cut off at the current wall-clock time.
pub fn period_separators(year: i32, month: Option<u32>) -> Result<Vec<Separator>> {
    let now = Local::now().naive_local();
    let mut separators = Vec::new();
    match month {
        Some(m) => {
            for day in 1..=days_in_month(year, m)? {
                let d = day_start(year, m, day)?;
                if d > now {
                    break;
                }
                separators.push(Separator {
                    label: format!("{:02}", day),
                    timestamp: to_ts(d),
                });
            }
        }
        None => {
            for m in 1..=12 {
                let d = day_start(year, m, 1)?;
                if d > now {
                    break;
                }
                separators.push(Separator {
                    label: d.format("%b %d").to_string(),
                    timestamp: to_ts(d),
                });
            }
            separators.push(Separator {
                label: "Dec 31".to_string(),
                timestamp: to_ts(day_start(year + 1, 1, 1)?),
            });
        }
    }
    Ok(separators)
}

pub fn ts_to_datetime(ts: i64) -> Result<NaiveDateTime> {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| anyhow!("Timestamp {} out of range", ts))
}

/// Midnight timestamp of the calendar day containing `ts`.
pub fn day_floor(ts: i64) -> Result<i64> {
    let date = ts_to_datetime(ts)?.date();
    day_start_of(date)
}

pub fn day_start_of(date: NaiveDate) -> Result<i64> {
    date.and_hms_opt(0, 0, 0)
        .map(to_ts)
        .ok_or_else(|| anyhow!("Invalid date {}", date))
}
