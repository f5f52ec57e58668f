// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DataError;

/// Account type codes as stored in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    Routine,
    Savings,
    System,
}

impl AccountType {
    pub fn from_code(code: i64) -> Result<Self, DataError> {
        match code {
            0 => Ok(AccountType::Routine),
            1 => Ok(AccountType::Savings),
            4 => Ok(AccountType::System),
            _ => Err(DataError::UnknownCode {
                table: "accounts",
                field: "type",
                code,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    Expense,
    Income,
    Transfer,
}

impl TransactionType {
    pub fn from_code(code: i64) -> Result<Self, DataError> {
        match code {
            0 => Ok(TransactionType::Expense),
            1 => Ok(TransactionType::Income),
            2 => Ok(TransactionType::Transfer),
            _ => Err(DataError::UnknownCode {
                table: "transactions",
                field: "type",
                code,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryType {
    Income,
    Expense,
}

impl CategoryType {
    pub fn from_code(code: i64) -> Result<Self, DataError> {
        match code {
            0 => Ok(CategoryType::Income),
            1 => Ok(CategoryType::Expense),
            _ => Err(DataError::UnknownCode {
                table: "categories",
                field: "type",
                code,
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    pub id: i64,
    pub name_short: String,
    pub symbol: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub account_type: AccountType,
    pub currency_id: i64,
    pub name: String,
    pub starting_balance: Decimal,
    pub balance: Decimal,
    pub is_in_balance: bool,
    pub show_order: i64,
    pub is_archived: bool,
}

/// `parent_category_id` is a reference resolved by id lookup at read time,
/// never an embedded copy. One level of nesting in practice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub category_type: CategoryType,
    pub name: String,
    pub color: i64,
    pub parent_category_id: Option<i64>,
}

/// A ledger transaction. `destination_id` is a category id for
/// expense/income rows and an account id for transfers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub tx_type: TransactionType,
    pub timestamp: i64,
    pub currency_id: Option<i64>,
    pub account_id: i64,
    pub destination_id: Option<i64>,
    pub amount: Decimal,
    pub destination_amount: Decimal,
    /// Amount converted to the base currency; populated by the homogenizing
    /// loader, `None` on raw loads.
    pub homogenized_amount: Option<Decimal>,
    pub comment: Option<String>,
    pub is_scheduled: bool,
}

impl Transaction {
    /// The base-currency amount, falling back to the raw amount when no
    /// normalization was applied (single-currency ledgers).
    pub fn homogenized(&self) -> Decimal {
        self.homogenized_amount.unwrap_or(self.amount)
    }
}

/// One row per account affected by a transaction; two rows for transfers.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceHistoryEntry {
    pub account_id: i64,
    pub transaction_id: i64,
    pub timestamp: i64,
    pub balance: Decimal,
}

/// Total balance across in-balance accounts at one day's midnight.
#[derive(Debug, Clone, Serialize)]
pub struct DailyBalance {
    pub timestamp: i64,
    pub balance: Decimal,
}

/// Aggregated inflow/outflow for one account on one day. Only written when
/// at least one side is nonzero.
#[derive(Debug, Clone, Serialize)]
pub struct DailyAccountCashflow {
    pub timestamp: i64,
    pub account_id: i64,
    pub inflow: Decimal,
    pub outflow: Decimal,
}
