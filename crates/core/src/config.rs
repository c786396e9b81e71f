//! Merge configuration.
//!
//! Loaded from YAML; every field is optional:
//!
//! ```yaml
//! discount_pct: 10
//! rates:
//!   EUR: 38.50
//!   USD: 36.20
//! show_header_info: true
//! parallel: false
//! output_dir: ./out
//! ```

use crate::currency::{RateTable, DEFAULT_EUR_RATE, DEFAULT_USD_RATE};
use crate::error::ConfigError;
use crate::merge::MergeOptions;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Discount applied to total sales, in percent.
    pub discount_pct: f64,
    /// Local units per 1 foreign unit, by currency code. Entries read from a
    /// file are laid over the EUR/USD defaults.
    #[serde(deserialize_with = "rates_over_defaults")]
    pub rates: IndexMap<String, f64>,
    pub show_header_info: bool,
    pub parallel: bool,
    /// Where the report is written; defaults to the first input's directory.
    pub output_dir: Option<PathBuf>,
}

fn default_rates() -> IndexMap<String, f64> {
    let mut rates = IndexMap::new();
    rates.insert("EUR".to_string(), DEFAULT_EUR_RATE);
    rates.insert("USD".to_string(), DEFAULT_USD_RATE);
    rates
}

fn rates_over_defaults<'de, D>(deserializer: D) -> Result<IndexMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = IndexMap::<String, f64>::deserialize(deserializer)?;
    let mut rates = default_rates();
    for (code, rate) in overrides {
        rates.insert(code.trim().to_uppercase(), rate);
    }
    Ok(rates)
}

impl Default for MergeConfig {
    fn default() -> Self {
        MergeConfig {
            discount_pct: 0.0,
            rates: default_rates(),
            show_header_info: true,
            parallel: false,
            output_dir: None,
        }
    }
}

impl MergeConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: MergeConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&yaml)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Reject out-of-range discounts and non-positive rates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.discount_pct) {
            return Err(ConfigError::Invalid(format!(
                "discount_pct must be between 0 and 100, got {}",
                self.discount_pct
            )));
        }
        for (code, rate) in &self.rates {
            if !rate.is_finite() || *rate <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "rate for {code} must be positive, got {rate}"
                )));
            }
        }
        Ok(())
    }

    /// Set or replace one rate; the code is upper-cased.
    pub fn set_rate(&mut self, code: &str, rate: f64) {
        self.rates.insert(code.trim().to_uppercase(), rate);
    }

    /// Validated rate table built from the configured rates.
    pub fn rate_table(&self) -> Result<RateTable, ConfigError> {
        RateTable::from_pairs(self.rates.iter().map(|(code, rate)| (code.as_str(), *rate)))
            .map_err(|err| ConfigError::Invalid(err.to_string()))
    }

    #[must_use]
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            show_header_info: self.show_header_info,
            parallel: self.parallel,
            generated_at: None,
        }
    }
}

/// Parse a user-entered number, accepting `,` as the decimal separator.
#[must_use]
pub fn parse_decimal(text: &str) -> Option<f64> {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::convert;

    #[test]
    fn test_defaults() {
        let config = MergeConfig::default();
        assert_eq!(config.discount_pct, 0.0);
        assert_eq!(config.rates.get("EUR"), Some(&38.50));
        assert_eq!(config.rates.get("USD"), Some(&36.20));
        assert!(config.show_header_info);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = MergeConfig::from_yaml_str("discount_pct: 12.5\nparallel: true\n").unwrap();
        assert_eq!(config.discount_pct, 12.5);
        assert!(config.parallel);
        assert_eq!(config.rates.len(), 2);
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn test_rates_from_yaml() {
        let yaml = "rates:\n  EUR: 40.1\n  gbp: 45\n";
        let config = MergeConfig::from_yaml_str(yaml).unwrap();
        let table = config.rate_table().unwrap();
        assert_eq!(table.get("EUR"), Some(40.1));
        assert_eq!(table.get("GBP"), Some(45.0));
        assert_eq!(table.get("USD"), Some(36.20));
        assert_eq!(table.get("TRY"), Some(1.0));
    }

    #[test]
    fn test_yaml_rates_keep_eur_and_usd_defaults() {
        let config = MergeConfig::from_yaml_str("rates:\n  GBP: 45\n").unwrap();
        let table = config.rate_table().unwrap();
        assert_eq!(table.get("EUR"), Some(38.50));
        assert_eq!(table.get("USD"), Some(36.20));

        let converted = convert(100.0, "USD", "EUR", &table);
        assert!((converted - 100.0 * 36.2 / 38.5).abs() < 1e-9);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(matches!(
            MergeConfig::from_yaml_str("discount_pct: -1"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            MergeConfig::from_yaml_str("discount_pct: 101"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            MergeConfig::from_yaml_str("rates:\n  USD: 0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            MergeConfig::from_yaml_str("discount_pct: [1, 2]"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ordermerge.yaml");
        std::fs::write(&path, "show_header_info: false\noutput_dir: out\n").unwrap();
        let config = MergeConfig::load(&path).unwrap();
        assert!(!config.show_header_info);
        assert_eq!(config.output_dir, Some(PathBuf::from("out")));
        assert!(!config.merge_options().show_header_info);

        assert!(matches!(
            MergeConfig::load(&dir.path().join("missing.yaml")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("38,50"), Some(38.5));
        assert_eq!(parse_decimal(" 10 "), Some(10.0));
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("inf"), None);
    }

    #[test]
    fn test_set_rate_uppercases() {
        let mut config = MergeConfig::default();
        config.set_rate("eur", 41.0);
        assert_eq!(config.rates.get("EUR"), Some(&41.0));
    }
}
