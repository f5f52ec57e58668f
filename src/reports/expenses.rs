// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::DataError;
use crate::models::TransactionType;
use crate::rates::RateMatrix;
use crate::store;
use crate::timeframe::timeframe_bounds;

/// A top expense enriched with resolved account and (up to two-level)
/// category names.
#[derive(Debug, Serialize)]
pub struct ExpenseDetail {
    pub id: i64,
    pub timestamp: i64,
    pub account: String,
    pub category: String,
    pub parent_category: Option<String>,
    pub amount: Decimal,
    pub note: Option<String>,
}

/// Top-`limit` non-scheduled expenses by homogenized amount, descending.
pub fn biggest_expenses(
    conn: &Connection,
    matrix: &RateMatrix,
    year: i32,
    month: Option<u32>,
    limit: usize,
) -> Result<Vec<ExpenseDetail>> {
    let (from, to) = timeframe_bounds(year, month)?;
    let accounts = store::accounts_by_id(conn)?;
    let categories = store::categories_by_id(conn)?;
    let mut txs = store::load_homogenized(
        conn,
        matrix,
        Some((from, to)),
        Some(TransactionType::Expense),
    )?;
    txs.sort_by(|a, b| b.homogenized().cmp(&a.homogenized()));
    txs.truncate(limit);

    let mut out = Vec::with_capacity(txs.len());
    for t in &txs {
        let account = accounts
            .get(&t.account_id)
            .ok_or(DataError::MissingAccount(t.account_id))?;
        let category_id = t
            .destination_id
            .ok_or(DataError::UncategorizedExpense(t.id))?;
        let category = categories
            .get(&category_id)
            .ok_or(DataError::MissingCategory(category_id))?;
        let parent_category = match category.parent_category_id {
            Some(parent_id) => Some(
                categories
                    .get(&parent_id)
                    .ok_or(DataError::MissingCategory(parent_id))?
                    .name
                    .clone(),
            ),
            None => None,
        };
        out.push(ExpenseDetail {
            id: t.id,
            timestamp: t.timestamp,
            account: account.name.clone(),
            category: category.name.clone(),
            parent_category,
            amount: t.homogenized(),
            note: t.comment.clone(),
        });
    }
    Ok(out)
}
