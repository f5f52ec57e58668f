// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::Local;
use once_cell::sync::OnceCell;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::Config;
use crate::errors::DataError;
use crate::models::Currency;
use crate::store;
use crate::utils::http_client;

/// Static rate table substituted when the live fetch fails. The matrix is
/// never left partially populated: either fully live or fully fallback.
pub const FALLBACK_USD: f64 = 41.2;
pub const FALLBACK_EUR: f64 = 45.5;

#[derive(Debug, Deserialize)]
struct RateResponse {
    #[serde(rename = "exchangeRate")]
    exchange_rate: Vec<RatePair>,
}

#[derive(Debug, Deserialize)]
struct RatePair {
    currency: String,
    #[serde(rename = "saleRateNB")]
    sale_rate_nb: f64,
}

/// All-pairs conversion table over the snapshot's currencies.
/// `rate(a, b)` multiplied by an amount in `a` yields the amount in `b`.
#[derive(Debug, Clone, Serialize)]
pub struct RateMatrix {
    base: String,
    matrix: HashMap<String, HashMap<String, f64>>,
}

impl RateMatrix {
    /// Build the full matrix from per-currency rates against the base
    /// (base itself maps to 1): `matrix[a][b] = rate(a) / rate(b)`.
    pub fn from_rates(base: &str, rates: &HashMap<String, f64>) -> Self {
        let mut matrix = HashMap::new();
        for (a, rate_a) in rates {
            let row: HashMap<String, f64> = rates
                .iter()
                .map(|(b, rate_b)| (b.clone(), rate_a / rate_b))
                .collect();
            matrix.insert(a.clone(), row);
        }
        RateMatrix {
            base: base.to_string(),
            matrix,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn rate(&self, from: &str, to: &str) -> Result<f64, DataError> {
        self.matrix
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .ok_or_else(|| {
                let missing = if self.matrix.contains_key(from) { to } else { from };
                DataError::UnknownCurrency(missing.to_string())
            })
    }

    /// Conversion factor from `from` into the base currency.
    pub fn to_base(&self, from: &str) -> Result<f64, DataError> {
        self.rate(from, &self.base)
    }

    pub fn currencies(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.matrix.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

static EXCHANGE_RATES: OnceCell<RateMatrix> = OnceCell::new();

/// Process-wide memoized matrix. Concurrent first callers share one fetch;
/// afterwards this is a pure read.
pub fn exchange_rates(conn: &Connection, cfg: &Config) -> Result<&'static RateMatrix> {
    EXCHANGE_RATES.get_or_try_init(|| build_matrix(conn, cfg))
}

fn build_matrix(conn: &Connection, cfg: &Config) -> Result<RateMatrix> {
    let currencies = store::load_currencies(conn)?;
    let base = currencies
        .iter()
        .find(|c| c.is_default)
        .map(|c| c.name_short.clone())
        .ok_or(DataError::NoDefaultCurrency)?;
    let rates = match fetch_sale_rates(cfg, &currencies) {
        Ok(rates) => rates,
        Err(err) => {
            eprintln!("Exchange-rate fetch failed ({err:#}); using fallback table");
            fallback_rates(&base)
        }
    };
    Ok(RateMatrix::from_rates(&base, &rates))
}

/// Sale rates against the base currency for today, one entry per snapshot
/// currency. A currency missing from the provider response fails the whole
/// fetch so the caller can fall back wholesale.
fn fetch_sale_rates(cfg: &Config, currencies: &[Currency]) -> Result<HashMap<String, f64>> {
    let date = Local::now().format("%d.%m.%Y");
    let url = format!("{}?json&date={}", cfg.rates_url, date);
    let resp = http_client()?
        .get(&url)
        .send()
        .with_context(|| format!("GET {}", url))?
        .error_for_status()?;
    let body: RateResponse = resp.json().context("Decode exchange-rate response")?;

    let mut rates = HashMap::new();
    for curr in currencies {
        if curr.is_default {
            rates.insert(curr.name_short.clone(), 1.0);
            continue;
        }
        let pair = body
            .exchange_rate
            .iter()
            .find(|p| p.currency == curr.name_short)
            .ok_or_else(|| DataError::UnknownCurrency(curr.name_short.clone()))?;
        rates.insert(curr.name_short.clone(), pair.sale_rate_nb);
    }
    Ok(rates)
}

fn fallback_rates(base: &str) -> HashMap<String, f64> {
    let mut rates = HashMap::from([
        ("USD".to_string(), FALLBACK_USD),
        ("EUR".to_string(), FALLBACK_EUR),
    ]);
    rates.insert(base.to_string(), 1.0);
    rates
}
