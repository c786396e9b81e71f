//! Currency codes, exchange-rate tables and cost conversion.
//!
//! Rates are expressed as "units of local currency per 1 foreign unit"; the
//! local currency (TRY) is always present with rate 1.

use crate::error::{ConversionError, RateError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};

/// Code of the local currency all rates are quoted in.
pub const LOCAL_CURRENCY: &str = "TRY";

/// Default EUR rate of the reference deployment.
pub const DEFAULT_EUR_RATE: f64 = 38.50;

/// Default USD rate of the reference deployment.
pub const DEFAULT_USD_RATE: f64 = 36.20;

/// Upper-case currency code; empty means "not detected".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    #[must_use]
    pub fn new(code: &str) -> Self {
        CurrencyCode(code.trim().to_uppercase())
    }

    /// The "not detected" code.
    #[must_use]
    pub fn none() -> Self {
        CurrencyCode(String::new())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display symbol for known currencies.
    #[must_use]
    pub fn symbol(&self) -> Option<&'static str> {
        match self.0.as_str() {
            "EUR" => Some("€"),
            "USD" => Some("$"),
            "TRY" => Some("₺"),
            "GBP" => Some("£"),
            _ => None,
        }
    }

    /// Prefix shown in front of amounts: the symbol when known, otherwise
    /// the code itself; empty when no currency was detected.
    #[must_use]
    pub fn display_prefix(&self) -> &str {
        self.symbol().unwrap_or(self.0.as_str())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(code: &str) -> Self {
        CurrencyCode::new(code)
    }
}

impl Borrow<str> for CurrencyCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Anything that can answer "how many local units is one unit of `code`".
///
/// Implemented for the validated [`RateTable`] and for plain maps, so raw
/// caller-supplied rates (which may contain zeros) go through the same
/// conversion path.
pub trait RateSource {
    fn rate(&self, code: &str) -> Option<f64>;
}

impl<K, S> RateSource for HashMap<K, f64, S>
where
    K: Borrow<str> + Hash + Eq,
    S: BuildHasher,
{
    fn rate(&self, code: &str) -> Option<f64> {
        self.get(code).copied()
    }
}

impl<K, S> RateSource for IndexMap<K, f64, S>
where
    K: Borrow<str> + Hash + Eq,
    S: BuildHasher,
{
    fn rate(&self, code: &str) -> Option<f64> {
        self.get(code).copied()
    }
}

/// Validated exchange-rate table. Every rate is finite and > 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RateTable {
    rates: IndexMap<CurrencyCode, f64>,
}

impl RateTable {
    /// A table holding only the local currency.
    #[must_use]
    pub fn new() -> Self {
        let mut rates = IndexMap::new();
        rates.insert(CurrencyCode::new(LOCAL_CURRENCY), 1.0);
        RateTable { rates }
    }

    /// Local currency plus the reference EUR and USD rates.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table
            .rates
            .insert(CurrencyCode::new("EUR"), DEFAULT_EUR_RATE);
        table
            .rates
            .insert(CurrencyCode::new("USD"), DEFAULT_USD_RATE);
        table
    }

    /// Build a table from `(code, rate)` pairs.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, RateError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut table = Self::new();
        for (code, rate) in pairs {
            table.insert(code, rate)?;
        }
        Ok(table)
    }

    /// Insert or replace a rate.
    ///
    /// The local currency is pinned to 1 and cannot be overridden.
    pub fn insert(&mut self, code: &str, rate: f64) -> Result<(), RateError> {
        let code = CurrencyCode::new(code);
        if !rate.is_finite() || rate <= 0.0 {
            return Err(RateError::InvalidRate {
                currency: code.to_string(),
                rate,
            });
        }
        if code.as_str() == LOCAL_CURRENCY {
            return Ok(());
        }
        self.rates.insert(code, rate);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CurrencyCode, f64)> {
        self.rates.iter().map(|(code, rate)| (code, *rate))
    }

    /// Copy every rate of `other` into this table.
    pub fn merge_from(&mut self, other: &RateTable) {
        for (code, rate) in other.iter() {
            self.rates.insert(code.clone(), rate);
        }
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl RateSource for RateTable {
    fn rate(&self, code: &str) -> Option<f64> {
        self.get(code)
    }
}

/// Convert `amount` from `cost_currency` into `sale_currency`.
///
/// Empty or identical currencies return the amount unchanged, as does a
/// zero sale rate; missing rates count as 1.
pub fn convert(
    amount: f64,
    cost_currency: &str,
    sale_currency: &str,
    rates: &impl RateSource,
) -> f64 {
    match try_convert(amount, cost_currency, sale_currency, rates) {
        Ok(converted) => converted,
        Err(err) => {
            tracing::debug!(%err, amount, "conversion degraded to identity");
            amount
        }
    }
}

/// Like [`convert`] but reports a zero sale rate instead of hiding it.
#[allow(clippy::float_cmp)]
pub fn try_convert(
    amount: f64,
    cost_currency: &str,
    sale_currency: &str,
    rates: &impl RateSource,
) -> Result<f64, ConversionError> {
    if cost_currency.is_empty() || cost_currency == sale_currency {
        return Ok(amount);
    }
    let local = amount * rates.rate(cost_currency).unwrap_or(1.0);
    let sale_rate = rates.rate(sale_currency).unwrap_or(1.0);
    if sale_rate == 0.0 {
        return Err(ConversionError::DegenerateRate {
            currency: sale_currency.to_string(),
        });
    }
    Ok(local / sale_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rates() -> RateTable {
        RateTable::from_pairs([("EUR", 38.5), ("USD", 36.2)]).unwrap()
    }

    #[test]
    fn test_same_currency_is_identity() {
        let mut skewed = HashMap::new();
        skewed.insert("EUR", 2.0);
        assert_eq!(convert(100.0, "EUR", "EUR", &skewed), 100.0);
        assert_eq!(convert(100.0, "EUR", "EUR", &sample_rates()), 100.0);
    }

    #[test]
    fn test_empty_cost_currency_is_identity() {
        assert_eq!(convert(42.0, "", "USD", &sample_rates()), 42.0);
    }

    #[test]
    fn test_cross_conversion_goes_through_local() {
        let result = convert(100.0, "EUR", "USD", &sample_rates());
        assert!((result - 100.0 * 38.5 / 36.2).abs() < 1e-9);
        assert!((result - 106.35).abs() < 0.01);
    }

    #[test]
    fn test_local_to_foreign() {
        let result = convert(3850.0, "TRY", "EUR", &sample_rates());
        assert!((result - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_sale_rate_falls_back() {
        let mut raw = HashMap::new();
        raw.insert("EUR".to_string(), 38.5);
        raw.insert("USD".to_string(), 0.0);
        assert_eq!(convert(100.0, "EUR", "USD", &raw), 100.0);
        assert_eq!(
            try_convert(100.0, "EUR", "USD", &raw),
            Err(ConversionError::DegenerateRate {
                currency: "USD".to_string()
            })
        );
    }

    #[test]
    fn test_missing_rates_count_as_one() {
        let rates = RateTable::new();
        assert_eq!(convert(10.0, "GBP", "EUR", &rates), 10.0);
    }

    #[test]
    fn test_rate_table_rejects_non_positive() {
        let mut table = RateTable::new();
        assert!(table.insert("EUR", 0.0).is_err());
        assert!(table.insert("EUR", -1.0).is_err());
        assert!(table.insert("EUR", f64::NAN).is_err());
        assert_eq!(table.get("EUR"), None);
        assert_eq!(table.get("TRY"), Some(1.0));
    }

    #[test]
    fn test_local_rate_is_pinned() {
        let mut table = RateTable::with_defaults();
        table.insert("try", 5.0).unwrap();
        assert_eq!(table.get("TRY"), Some(1.0));
        assert_eq!(table.get("EUR"), Some(DEFAULT_EUR_RATE));
        assert_eq!(table.get("USD"), Some(DEFAULT_USD_RATE));
    }

    #[test]
    fn test_symbols_and_prefix() {
        assert_eq!(CurrencyCode::new("eur").symbol(), Some("€"));
        assert_eq!(CurrencyCode::new("GBP").display_prefix(), "£");
        assert_eq!(CurrencyCode::new("CHF").display_prefix(), "CHF");
        assert_eq!(CurrencyCode::none().display_prefix(), "");
    }
}
