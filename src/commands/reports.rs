// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::config::Config;
use crate::rates;
use crate::reports::{burn, categories, expenses, flow, savings};
use crate::utils::{fmt_money, fmt_ts_date, maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("totals", sub)) => totals(conn, cfg, sub)?,
        Some(("cashflow", sub)) => cashflow(conn, cfg, sub)?,
        Some(("burn-rate", sub)) => burn_rate(conn, cfg, sub)?,
        Some(("subcategories", sub)) => subcategory_amounts(conn, cfg, sub)?,
        Some(("categories", sub)) => category_amounts(conn, cfg, sub)?,
        Some(("biggest", sub)) => biggest_expenses(conn, cfg, sub)?,
        Some(("savings", sub)) => savings_series(conn, cfg, sub)?,
        Some(("daily-balances", sub)) => daily_balances(conn, sub)?,
        Some(("account-cashflow", sub)) => account_cashflows(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn year_month(sub: &clap::ArgMatches) -> (i32, Option<u32>) {
    (
        *sub.get_one::<i32>("year").unwrap(),
        sub.get_one::<u32>("month").copied(),
    )
}

fn json_flags(sub: &clap::ArgMatches) -> (bool, bool) {
    (sub.get_flag("json"), sub.get_flag("jsonl"))
}

fn totals(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = year_month(sub);
    let (json_flag, jsonl_flag) = json_flags(sub);
    let matrix = rates::exchange_rates(conn, cfg)?;
    let data = flow::totals(conn, matrix, year, month)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = vec![vec![fmt_money(&data.sum_expenses), fmt_money(&data.sum_income)]];
        println!("{}", pretty_table(&["Expenses", "Income"], rows));
    }
    Ok(())
}

fn cashflow(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = year_month(sub);
    let (json_flag, jsonl_flag) = json_flags(sub);
    let matrix = rates::exchange_rates(conn, cfg)?;
    let data = flow::cashflow(conn, matrix, year, month)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| vec![r.label(), fmt_money(&r.expense), fmt_money(&r.income)])
            .collect();
        println!("{}", pretty_table(&["Month", "Expense", "Income"], rows));
    }
    Ok(())
}

fn burn_rate(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = year_month(sub);
    let (json_flag, jsonl_flag) = json_flags(sub);
    let threshold = match sub.get_one::<String>("threshold") {
        Some(raw) => raw.parse::<Decimal>()?,
        None => cfg.burn_threshold,
    };
    let matrix = rates::exchange_rates(conn, cfg)?;
    let data = burn::burn_rate(conn, matrix, threshold, year, month)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.label(),
                    fmt_money(&r.raw_total),
                    fmt_money(&r.adjusted_total),
                    fmt_money(&r.raw_per_day()),
                    fmt_money(&r.adjusted_per_day()),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Period", "Raw", "Adjusted", "Raw/day", "Adjusted/day"], rows)
        );
    }
    Ok(())
}

fn print_category_amounts(data: &[categories::CategoryAmount]) {
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|r| vec![r.category.name.clone(), fmt_money(&r.amount)])
        .collect();
    println!("{}", pretty_table(&["Category", "Amount"], rows));
}

fn subcategory_amounts(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = year_month(sub);
    let (json_flag, jsonl_flag) = json_flags(sub);
    let matrix = rates::exchange_rates(conn, cfg)?;
    let data = categories::subcategory_amounts(conn, matrix, year, month)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        print_category_amounts(&data);
    }
    Ok(())
}

fn category_amounts(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = year_month(sub);
    let (json_flag, jsonl_flag) = json_flags(sub);
    let matrix = rates::exchange_rates(conn, cfg)?;
    let data = categories::category_amounts(conn, matrix, year, month)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        print_category_amounts(&data);
    }
    Ok(())
}

fn biggest_expenses(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = year_month(sub);
    let (json_flag, jsonl_flag) = json_flags(sub);
    let limit = sub
        .get_one::<usize>("limit")
        .copied()
        .unwrap_or(cfg.biggest_limit);
    let matrix = rates::exchange_rates(conn, cfg)?;
    let data = expenses::biggest_expenses(conn, matrix, year, month, limit)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let mut rows = Vec::with_capacity(data.len());
        for r in &data {
            let category = match &r.parent_category {
                Some(parent) => format!("{} / {}", parent, r.category),
                None => r.category.clone(),
            };
            rows.push(vec![
                fmt_ts_date(r.timestamp)?,
                r.account.clone(),
                category,
                fmt_money(&r.amount),
                r.note.clone().unwrap_or_default(),
            ]);
        }
        println!(
            "{}",
            pretty_table(&["Date", "Account", "Category", "Amount", "Note"], rows)
        );
    }
    Ok(())
}

fn savings_series(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let year = *sub.get_one::<i32>("year").unwrap();
    let (json_flag, jsonl_flag) = json_flags(sub);
    let data = savings::savings(conn, year, &cfg.savings_currency)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .points
            .iter()
            .map(|p| vec![p.label.clone(), fmt_money(&p.total)])
            .collect();
        println!("{}", pretty_table(&["Period", "Total"], rows));
        println!("Change: {}", fmt_money(&data.change));
    }
    Ok(())
}

fn daily_balances(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = year_month(sub);
    let (json_flag, jsonl_flag) = json_flags(sub);
    let data = savings::daily_balances(conn, year, month)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let mut rows = Vec::with_capacity(data.len());
        for r in &data {
            rows.push(vec![fmt_ts_date(r.timestamp)?, fmt_money(&r.balance)]);
        }
        println!("{}", pretty_table(&["Date", "Balance"], rows));
    }
    Ok(())
}

fn account_cashflows(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = year_month(sub);
    let (json_flag, jsonl_flag) = json_flags(sub);
    let data = flow::account_cashflows(conn, year, month)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.account.clone(),
                    fmt_money(&r.inflow),
                    fmt_money(&r.outflow),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Account", "Inflow", "Outflow"], rows));
    }
    Ok(())
}
