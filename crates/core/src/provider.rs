//! Exchange-rate provider seam.
//!
//! Fetching rates over the network is the caller's business. The engine only
//! defines what a provider returns and how a fetched table is applied: a
//! successful fetch replaces matching rates, a failed one changes nothing.

use crate::currency::{RateTable, LOCAL_CURRENCY};
use crate::error::RateError;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Source of current exchange rates.
pub trait RateProvider {
    /// Fetch a rate table relative to the local currency.
    fn fetch(&self) -> Result<RateTable, RateError>;
}

/// Quote response in "1 local unit = x foreign units" form, as served by
/// ECB-backed APIs queried with the local currency as base.
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(default)]
    base: Option<String>,
    rates: IndexMap<String, f64>,
}

/// Quotes a response must carry to be usable.
const REQUIRED_QUOTES: [&str; 2] = ["EUR", "USD"];

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

impl RateTable {
    /// Decode an inverse-quote response (`{"rates": {"EUR": 0.026, ...}}`)
    /// into "local units per foreign unit", rounded to 4 decimals. Both EUR
    /// and USD quotes are required.
    pub fn from_quote_json(json: &str) -> Result<Self, RateError> {
        let response: QuoteResponse = serde_json::from_str(json)?;
        if let Some(base) = &response.base {
            if !base.eq_ignore_ascii_case(LOCAL_CURRENCY) {
                return Err(RateError::Malformed(format!(
                    "quotes are based on {base}, expected {LOCAL_CURRENCY}"
                )));
            }
        }
        if response.rates.is_empty() {
            return Err(RateError::Malformed("response carries no rates".to_string()));
        }
        for code in REQUIRED_QUOTES {
            if !response.rates.keys().any(|key| key.eq_ignore_ascii_case(code)) {
                return Err(RateError::Malformed(format!("response has no {code} quote")));
            }
        }

        let mut table = RateTable::new();
        for (code, quote) in &response.rates {
            if !quote.is_finite() || *quote <= 0.0 {
                return Err(RateError::InvalidRate {
                    currency: code.clone(),
                    rate: *quote,
                });
            }
            table.insert(code, round4(1.0 / quote))?;
        }
        Ok(table)
    }

    /// Apply a provider's rates. On failure the table is left untouched and
    /// the error is returned for the caller to surface.
    pub fn refresh_from(&mut self, provider: &dyn RateProvider) -> Result<usize, RateError> {
        match provider.fetch() {
            Ok(fetched) => {
                self.merge_from(&fetched);
                tracing::info!(rates = fetched.len(), "exchange rates refreshed");
                Ok(fetched.len())
            }
            Err(err) => {
                tracing::warn!(%err, "exchange rate refresh failed, keeping previous rates");
                Err(err)
            }
        }
    }
}

/// Provider reading a saved quote response from disk.
#[derive(Debug, Clone)]
pub struct JsonFileRateProvider {
    path: PathBuf,
}

impl JsonFileRateProvider {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonFileRateProvider {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl RateProvider for JsonFileRateProvider {
    fn fetch(&self) -> Result<RateTable, RateError> {
        let json = std::fs::read_to_string(&self.path).map_err(|e| {
            RateError::Unavailable(format!("{}: {e}", self.path.display()))
        })?;
        RateTable::from_quote_json(&json)
    }
}
