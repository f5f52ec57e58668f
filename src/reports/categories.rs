// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::errors::DataError;
use crate::models::{Category, CategoryType, TransactionType};
use crate::rates::RateMatrix;
use crate::store;
use crate::timeframe::timeframe_bounds;

#[derive(Debug, Clone, Serialize)]
pub struct CategoryAmount {
    pub category: Category,
    pub amount: Decimal,
}

/// Homogenized expense sums grouped by leaf (sub)category, descending.
/// A transaction pointing at a missing or non-expense category is a
/// data-integrity error, not a silent skip.
pub fn subcategory_amounts(
    conn: &Connection,
    matrix: &RateMatrix,
    year: i32,
    month: Option<u32>,
) -> Result<Vec<CategoryAmount>> {
    let (from, to) = timeframe_bounds(year, month)?;
    let categories = store::categories_by_id(conn)?;
    let txs = store::load_homogenized(
        conn,
        matrix,
        Some((from, to)),
        Some(TransactionType::Expense),
    )?;

    let mut sums: BTreeMap<i64, Decimal> = BTreeMap::new();
    for t in &txs {
        let category_id = t
            .destination_id
            .ok_or(DataError::UncategorizedExpense(t.id))?;
        let category = categories
            .get(&category_id)
            .ok_or(DataError::MissingCategory(category_id))?;
        if category.category_type != CategoryType::Expense {
            continue;
        }
        *sums.entry(category_id).or_default() += t.homogenized();
    }

    let mut out: Vec<CategoryAmount> = sums
        .into_iter()
        .map(|(id, amount)| CategoryAmount {
            category: categories[&id].clone(),
            amount,
        })
        .collect();
    out.sort_by(|a, b| b.amount.cmp(&a.amount));
    Ok(out)
}

/// Fold each subcategory's total into its parent: merge into an existing
/// parent entry or create one from the dictionary, then drop the child.
/// Root categories pass through unchanged, so the fold is idempotent for
/// entries without a parent.
pub fn merge_into_parents(
    amounts: Vec<CategoryAmount>,
    categories: &HashMap<i64, Category>,
) -> Result<Vec<CategoryAmount>> {
    let mut by_id: BTreeMap<i64, CategoryAmount> = amounts
        .into_iter()
        .map(|ca| (ca.category.id, ca))
        .collect();

    let ids: Vec<i64> = by_id.keys().copied().collect();
    for id in ids {
        let Some(parent_id) = by_id.get(&id).and_then(|ca| ca.category.parent_category_id) else {
            continue;
        };
        let Some(child) = by_id.remove(&id) else {
            continue;
        };
        match by_id.get_mut(&parent_id) {
            Some(parent) => parent.amount += child.amount,
            None => {
                let category = categories
                    .get(&parent_id)
                    .ok_or(DataError::MissingCategory(parent_id))?
                    .clone();
                by_id.insert(
                    parent_id,
                    CategoryAmount {
                        category,
                        amount: child.amount,
                    },
                );
            }
        }
    }

    let mut out: Vec<CategoryAmount> = by_id.into_values().collect();
    out.sort_by(|a, b| b.amount.cmp(&a.amount));
    Ok(out)
}

/// Subcategory sums rolled up to parent categories, descending.
pub fn category_amounts(
    conn: &Connection,
    matrix: &RateMatrix,
    year: i32,
    month: Option<u32>,
) -> Result<Vec<CategoryAmount>> {
    let sub = subcategory_amounts(conn, matrix, year, month)?;
    let categories = store::categories_by_id(conn)?;
    merge_into_parents(sub, &categories)
}
