// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

use crate::config::Config;
use crate::rates;
use crate::store;
use crate::utils::{maybe_print_json, pretty_table};

#[derive(Serialize)]
pub struct CurrencyRow {
    pub name: String,
    pub symbol: String,
    pub is_default: bool,
}

pub fn currencies(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");

    let data: Vec<CurrencyRow> = store::load_currencies(conn)?
        .into_iter()
        .map(|c| CurrencyRow {
            name: c.name_short,
            symbol: c.symbol,
            is_default: c.is_default,
        })
        .collect();

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.name.clone(),
                    r.symbol.clone(),
                    if r.is_default { "yes" } else { "" }.to_string(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Currency", "Symbol", "Default"], rows));
    }
    Ok(())
}

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");

    let matrix = rates::exchange_rates(conn, cfg)?;
    if maybe_print_json(json_flag, jsonl_flag, matrix)? {
        return Ok(());
    }

    let names = matrix.currencies();
    let mut headers = vec![""];
    headers.extend(names.iter().copied());
    let mut rows = Vec::new();
    for from in &names {
        let mut row = vec![from.to_string()];
        for to in &names {
            row.push(format!("{:.4}", matrix.rate(from, to)?));
        }
        rows.push(row);
    }
    println!("{}", pretty_table(&headers, rows));
    Ok(())
}
