// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};
use std::path::PathBuf;

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn timeframe_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("year")
            .short('y')
            .long("year")
            .required(true)
            .value_parser(value_parser!(i32))
            .help("Report year"),
    )
    .arg(
        Arg::new("month")
            .short('m')
            .long("month")
            .value_parser(value_parser!(u32))
            .help("Report month (1-12); omit for the whole year"),
    )
}

pub fn build_cli() -> Command {
    let totals = json_flags(timeframe_args(
        Command::new("totals").about("Expense and income totals for a timeframe"),
    ));
    let cashflow = json_flags(timeframe_args(
        Command::new("cashflow").about("Per-month expense/income cash flow"),
    ));
    let burn_rate = json_flags(timeframe_args(
        Command::new("burn-rate")
            .about("Expense rate per day (month) or per month (year), with outlier-adjusted totals")
            .arg(
                Arg::new("threshold")
                    .long("threshold")
                    .value_parser(value_parser!(String))
                    .help("Outlier cutoff in base currency (default 4000)"),
            ),
    ));
    let subcategories = json_flags(timeframe_args(
        Command::new("subcategories").about("Expense sums by leaf category"),
    ));
    let categories = json_flags(timeframe_args(
        Command::new("categories").about("Expense sums rolled up to parent categories"),
    ));
    let biggest = json_flags(timeframe_args(
        Command::new("biggest")
            .about("Largest expenses in a timeframe")
            .arg(
                Arg::new("limit")
                    .long("limit")
                    .value_parser(value_parser!(usize))
                    .help("Row cap (default 30)"),
            ),
    ));
    let savings = json_flags(
        Command::new("savings")
            .about("Savings-account balance series across a year")
            .arg(
                Arg::new("year")
                    .short('y')
                    .long("year")
                    .required(true)
                    .value_parser(value_parser!(i32))
                    .help("Report year"),
            ),
    );
    let daily_balances = json_flags(timeframe_args(
        Command::new("daily-balances").about("Compiled total-balance history"),
    ));
    let account_cashflow = json_flags(timeframe_args(
        Command::new("account-cashflow").about("Inflow/outflow per account"),
    ));

    Command::new("ledgerlens")
        .about("Balance-replay and cash-flow reporting over personal-finance ledger snapshots")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Ledger snapshot path (default: newest *.bak in the data dir)"),
        )
        .subcommand(
            Command::new("compile")
                .about("Compile derived balance/cash-flow facts from the ledger")
                .arg(
                    Arg::new("force")
                        .long("force")
                        .action(ArgAction::SetTrue)
                        .help("Recompile even when the snapshot is already compiled"),
                ),
        )
        .subcommand(json_flags(
            Command::new("accounts").about("List accounts").arg(
                Arg::new("archived")
                    .long("archived")
                    .action(ArgAction::SetTrue)
                    .help("Include archived accounts"),
            ),
        ))
        .subcommand(json_flags(Command::new("categories").about("List categories")))
        .subcommand(json_flags(Command::new("currencies").about("List currencies")))
        .subcommand(json_flags(
            Command::new("rates").about("Show the exchange-rate matrix"),
        ))
        .subcommand(
            Command::new("report")
                .about("Derived reports for a year or month")
                .subcommand(totals)
                .subcommand(cashflow)
                .subcommand(burn_rate)
                .subcommand(subcategories)
                .subcommand(categories)
                .subcommand(biggest)
                .subcommand(savings)
                .subcommand(daily_balances)
                .subcommand(account_cashflow),
        )
}
