// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Newest snapshot file in the data dir. The ledger app names backups so
/// that lexicographic order equals chronological order.
pub fn snapshot_path(cfg: &Config) -> Result<PathBuf> {
    let entries = fs::read_dir(&cfg.data_dir)
        .with_context(|| format!("Read data dir {}", cfg.data_dir.display()))?;
    let mut newest: Option<PathBuf> = None;
    for entry in entries {
        let path = entry?.path();
        if path.extension().is_some_and(|e| e == "bak")
            && newest.as_ref().is_none_or(|n| &path > n)
        {
            newest = Some(path);
        }
    }
    newest.ok_or_else(|| {
        anyhow!(
            "No ledger snapshot (*.bak) found in {}",
            cfg.data_dir.display()
        )
    })
}

pub fn open_snapshot(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Open ledger snapshot at {}", path.display()))?;
    ensure_derived_schema(&conn)?;
    Ok(conn)
}

/// Create the derived-fact tables the compiler owns. The ledger tables
/// (accounts, categories, currencies, transactions) come from the snapshot
/// and are never created or altered here.
pub fn ensure_derived_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS balance_history(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        account_id INTEGER NOT NULL,
        transaction_id INTEGER NOT NULL,
        timestamp INTEGER NOT NULL,
        balance TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_balance_history_account_ts
        ON balance_history(account_id, timestamp);

    CREATE TABLE IF NOT EXISTS daily_balance_history(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp INTEGER NOT NULL,
        balance TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_daily_balance_ts
        ON daily_balance_history(timestamp);

    CREATE TABLE IF NOT EXISTS daily_account_cashflow(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp INTEGER NOT NULL,
        account_id INTEGER NOT NULL,
        inflow TEXT NOT NULL,
        outflow TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_daily_cashflow_ts
        ON daily_account_cashflow(timestamp, account_id);

    CREATE TABLE IF NOT EXISTS compile_state(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
    "#,
    )?;
    Ok(())
}

pub fn compile_version(conn: &Connection) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM compile_state WHERE key='version'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_compile_version(conn: &Connection, version: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO compile_state(key, value) VALUES('version', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![version],
    )?;
    Ok(())
}
