// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Data-integrity failures in the ledger snapshot. These surface through
/// `anyhow` instead of being silently swallowed; a dangling reference makes
/// the affected report fail rather than produce a wrong number.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Unknown account id {0} referenced by ledger data")]
    MissingAccount(i64),

    #[error("Unknown category id {0} referenced by ledger data")]
    MissingCategory(i64),

    #[error("Unknown currency id {0} referenced by ledger data")]
    MissingCurrency(i64),

    #[error("No exchange rate known for currency '{0}'")]
    UnknownCurrency(String),

    #[error("Transfer transaction {0} has no destination account")]
    MissingTransferDestination(i64),

    #[error("Expense transaction {0} has no category reference")]
    UncategorizedExpense(i64),

    #[error("Category {0} is its own ancestor")]
    CategoryCycle(i64),

    #[error("Invalid {field} code {code} in table {table}")]
    UnknownCode {
        table: &'static str,
        field: &'static str,
        code: i64,
    },

    #[error("No currency is flagged as default in the snapshot")]
    NoDefaultCurrency,
}
