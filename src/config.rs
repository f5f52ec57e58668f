// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use rust_decimal::Decimal;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_BURN_THRESHOLD: &str = "4000";
pub const DEFAULT_SAVINGS_CURRENCY: &str = "USD";
pub const DEFAULT_BIGGEST_LIMIT: usize = 30;
pub const DEFAULT_RATES_URL: &str = "https://api.privatbank.ua/p24api/exchange_rates";

/// Process-wide settings, defaults overridable via `LEDGERLENS_*` env vars.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory scanned for ledger snapshot (`*.bak`) files.
    pub data_dir: PathBuf,
    /// Exchange-rate endpoint; the fetch appends `?json&date=DD.MM.YYYY`.
    pub rates_url: String,
    /// Outlier cutoff for the adjusted burn-rate series, in base currency.
    pub burn_threshold: Decimal,
    /// Currency the savings report filters accounts by.
    pub savings_currency: String,
    /// Default row cap for the biggest-expenses report.
    pub biggest_limit: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        let data_dir = match env::var("LEDGERLENS_DATA_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => ProjectDirs::from("com.ledgerlens", "Ledgerlens", "ledgerlens")
                .context("Could not determine platform-specific data dir")?
                .data_dir()
                .to_path_buf(),
        };
        let threshold_raw = env::var("LEDGERLENS_BURN_THRESHOLD")
            .unwrap_or_else(|_| DEFAULT_BURN_THRESHOLD.to_string());
        let burn_threshold = threshold_raw
            .parse::<Decimal>()
            .with_context(|| format!("Invalid LEDGERLENS_BURN_THRESHOLD '{}'", threshold_raw))?;
        Ok(Config {
            data_dir,
            rates_url: env::var("LEDGERLENS_RATES_URL")
                .unwrap_or_else(|_| DEFAULT_RATES_URL.to_string()),
            burn_threshold,
            savings_currency: env::var("LEDGERLENS_SAVINGS_CURRENCY")
                .unwrap_or_else(|_| DEFAULT_SAVINGS_CURRENCY.to_string()),
            biggest_limit: DEFAULT_BIGGEST_LIMIT,
        })
    }
}
