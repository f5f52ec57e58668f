// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

use crate::models::AccountType;
use crate::store;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

#[derive(Serialize)]
pub struct AccountRow {
    pub name: String,
    pub account_type: String,
    pub currency: String,
    pub balance: String,
    pub in_balance: bool,
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");
    let with_archived = m.get_flag("archived");

    let currencies = store::currencies_by_id(conn)?;
    let accounts = store::load_accounts(conn, with_archived)?;
    let data: Vec<AccountRow> = accounts
        .iter()
        .map(|a| AccountRow {
            name: a.name.clone(),
            account_type: match a.account_type {
                AccountType::Routine => "routine".to_string(),
                AccountType::Savings => "savings".to_string(),
                AccountType::System => "system".to_string(),
            },
            currency: currencies
                .get(&a.currency_id)
                .map(|c| c.name_short.clone())
                .unwrap_or_default(),
            balance: fmt_money(&a.balance),
            in_balance: a.is_in_balance,
        })
        .collect();

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.name.clone(),
                    r.account_type.clone(),
                    r.currency.clone(),
                    r.balance.clone(),
                    if r.in_balance { "yes" } else { "no" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Account", "Type", "CCY", "Balance", "In balance"], rows)
        );
    }
    Ok(())
}
