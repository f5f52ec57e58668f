// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

use crate::models::CategoryType;
use crate::store;
use crate::utils::{maybe_print_json, pretty_table};

#[derive(Serialize)]
pub struct CategoryRow {
    pub name: String,
    pub category_type: String,
    pub parent: String,
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");

    let by_id = store::categories_by_id(conn)?;
    let mut categories = store::load_categories(conn)?;
    categories.sort_by(|a, b| a.name.cmp(&b.name));

    let data: Vec<CategoryRow> = categories
        .iter()
        .map(|c| CategoryRow {
            name: c.name.clone(),
            category_type: match c.category_type {
                CategoryType::Income => "income".to_string(),
                CategoryType::Expense => "expense".to_string(),
            },
            parent: c
                .parent_category_id
                .and_then(|id| by_id.get(&id))
                .map(|p| p.name.clone())
                .unwrap_or_default(),
        })
        .collect();

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| vec![r.name.clone(), r.category_type.clone(), r.parent.clone()])
            .collect();
        println!("{}", pretty_table(&["Category", "Type", "Parent"], rows));
    }
    Ok(())
}
