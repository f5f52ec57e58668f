// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;

use ledgerlens::timeframe::{days_in_month, period_separators, timeframe_bounds};

fn midnight(y: i32, m: u32, d: u32) -> i64 {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp()
}

#[test]
fn year_bounds_are_half_open() {
    let (from, to) = timeframe_bounds(2024, None).unwrap();
    assert_eq!(from, midnight(2024, 1, 1));
    assert_eq!(to, midnight(2025, 1, 1));
}

#[test]
fn month_bounds_cover_one_calendar_month() {
    let (from, to) = timeframe_bounds(2024, Some(5)).unwrap();
    assert_eq!(from, midnight(2024, 5, 1));
    assert_eq!(to, midnight(2024, 6, 1));
}

#[test]
fn december_rolls_into_next_january() {
    let (from, to) = timeframe_bounds(2024, Some(12)).unwrap();
    assert_eq!(from, midnight(2024, 12, 1));
    assert_eq!(to, midnight(2025, 1, 1));
}

#[test]
fn invalid_month_is_rejected() {
    assert!(timeframe_bounds(2024, Some(13)).is_err());
    assert!(timeframe_bounds(2024, Some(0)).is_err());
}

#[test]
fn leap_february_has_29_days() {
    assert_eq!(days_in_month(2024, 2).unwrap(), 29);
    assert_eq!(days_in_month(2023, 2).unwrap(), 28);
    assert_eq!(days_in_month(2024, 4).unwrap(), 30);
}

#[test]
fn month_separators_label_each_day_in_order() {
    let seps = period_separators(2024, Some(3)).unwrap();
    assert_eq!(seps.len(), 31);
    assert_eq!(seps[0].label, "01");
    assert_eq!(seps[30].label, "31");
    assert_eq!(seps[0].timestamp, midnight(2024, 3, 1));
    for pair in seps.windows(2) {
        assert!(pair[0].timestamp < pair[1].timestamp);
    }
}

#[test]
fn year_separators_end_with_terminal_boundary() {
    let seps = period_separators(2024, None).unwrap();
    assert_eq!(seps.len(), 13);
    assert_eq!(seps[0].label, "Jan 01");
    assert_eq!(seps[11].label, "Dec 01");
    assert_eq!(seps[12].label, "Dec 31");
    // Terminal separator sits at next-year's start
    assert_eq!(seps[12].timestamp, midnight(2025, 1, 1));
    for pair in seps.windows(2) {
        assert!(pair[0].timestamp < pair[1].timestamp);
    }
}
