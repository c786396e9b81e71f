//! Free-text cost cell parsing.
//!
//! Cost cells look like `21.500,00 TL`, `1,234.50 USD`, `€ 12` or a bare
//! number. The amount and the currency token are pulled apart and the
//! amount is normalized for both Turkish and Western separators.

use crate::currency::CurrencyCode;
use crate::error::CostError;
use ordermerge_sheet::CellValue;
use regex::Regex;
use std::sync::OnceLock;

/// A cost cell split into amount and currency.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCost {
    pub amount: f64,
    pub currency: CurrencyCode,
}

fn currency_strip_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\d.,\-\s]").expect("valid regex"))
}

fn number_strip_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\d.,\-]").expect("valid regex"))
}

/// Map a currency token to its code. Unknown tokens pass through upper-cased.
#[must_use]
pub fn normalize_currency_token(token: &str) -> CurrencyCode {
    let upper = token.trim().to_uppercase();
    let code = match upper.as_str() {
        "TL" | "TRY" | "₺" => "TRY",
        "USD" | "$" => "USD",
        "EUR" | "€" => "EUR",
        other => other,
    };
    CurrencyCode::new(code)
}

/// Rewrite locale-specific separators into a plain `f64` literal.
///
/// With both `.` and `,` present the later one is the decimal point. A lone
/// `,` followed by exactly three digits groups thousands; otherwise it is the
/// decimal point.
fn normalize_number(num: &str) -> String {
    match (num.rfind(','), num.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => num.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => num.replace(',', ""),
        (Some(comma), None) => {
            if num[comma + 1..].chars().count() == 3 {
                num.replace(',', "")
            } else {
                num.replace(',', ".")
            }
        }
        _ => num.to_string(),
    }
}

/// Parse a cost string, reporting why it carries no usable amount.
pub fn try_parse_cost_str(raw: &str) -> Result<ParsedCost, CostError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(CostError::Empty);
    }

    let token = currency_strip_regex().replace_all(text, "");
    let currency = if token.trim().is_empty() {
        CurrencyCode::none()
    } else {
        normalize_currency_token(&token)
    };

    let digits = number_strip_regex().replace_all(text, "");
    if digits.is_empty() {
        return Err(CostError::Malformed {
            currency: currency.to_string(),
        });
    }

    match normalize_number(&digits).parse::<f64>() {
        Ok(amount) => Ok(ParsedCost { amount, currency }),
        Err(_) => Err(CostError::Malformed {
            currency: currency.to_string(),
        }),
    }
}

/// Parse a cost cell, reporting why it carries no usable amount.
pub fn try_parse_cost(raw: &CellValue) -> Result<ParsedCost, CostError> {
    match raw.cached_or_self() {
        CellValue::Null => Err(CostError::Empty),
        CellValue::Int(i) => Ok(ParsedCost {
            amount: *i as f64,
            currency: CurrencyCode::none(),
        }),
        CellValue::Float(f) if f.is_finite() => Ok(ParsedCost {
            amount: *f,
            currency: CurrencyCode::none(),
        }),
        other => try_parse_cost_str(&other.as_text()),
    }
}

/// Parse a cost cell into `(amount, currency)`.
///
/// Never fails: empty input yields `(0.0, "")` and an unparsable amount
/// yields `0.0` with whatever currency token was found.
#[must_use]
pub fn parse_cost(raw: &CellValue) -> (f64, CurrencyCode) {
    match try_parse_cost(raw) {
        Ok(parsed) => (parsed.amount, parsed.currency),
        Err(CostError::Empty) => (0.0, CurrencyCode::none()),
        Err(CostError::Malformed { currency }) => {
            tracing::debug!(raw = %raw, "cost amount not numeric");
            (0.0, CurrencyCode::new(&currency))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> (f64, String) {
        let (amount, currency) = parse_cost(&CellValue::from(s));
        (amount, currency.to_string())
    }

    #[test]
    fn test_turkish_format() {
        assert_eq!(parse("21.500,00 TL"), (21500.0, "TRY".to_string()));
    }

    #[test]
    fn test_western_format() {
        assert_eq!(parse("1,234.50 USD"), (1234.5, "USD".to_string()));
    }

    #[test]
    fn test_empty_and_null() {
        assert_eq!(parse(""), (0.0, String::new()));
        assert_eq!(parse("   "), (0.0, String::new()));
        let (amount, currency) = parse_cost(&CellValue::Null);
        assert_eq!(amount, 0.0);
        assert!(currency.is_empty());
    }

    #[test]
    fn test_unknown_token_passes_through() {
        assert_eq!(parse("abc"), (0.0, "ABC".to_string()));
        assert_eq!(parse("12 chf"), (12.0, "CHF".to_string()));
    }

    #[test]
    fn test_symbols() {
        assert_eq!(parse("€ 12,5"), (12.5, "EUR".to_string()));
        assert_eq!(parse("$7"), (7.0, "USD".to_string()));
        assert_eq!(parse("150 ₺"), (150.0, "TRY".to_string()));
        assert_eq!(parse("99 try"), (99.0, "TRY".to_string()));
    }

    #[test]
    fn test_lone_comma_rules() {
        // three digits after the comma: thousands
        assert_eq!(parse("1,500 EUR"), (1500.0, "EUR".to_string()));
        // otherwise: decimal
        assert_eq!(parse("12,75 EUR"), (12.75, "EUR".to_string()));
        assert_eq!(parse("3,5"), (3.5, String::new()));
    }

    #[test]
    fn test_negative_amount() {
        assert_eq!(parse("-25.50 USD"), (-25.5, "USD".to_string()));
    }

    #[test]
    fn test_numeric_cells() {
        assert_eq!(parse_cost(&CellValue::Float(42.5)).0, 42.5);
        assert_eq!(parse_cost(&CellValue::Int(7)).0, 7.0);
        assert!(parse_cost(&CellValue::Int(7)).1.is_empty());
    }

    #[test]
    fn test_malformed_is_reported() {
        assert_eq!(
            try_parse_cost_str("1.2.3,4,5 EUR"),
            Err(CostError::Malformed {
                currency: "EUR".to_string()
            })
        );
        assert_eq!(try_parse_cost_str(""), Err(CostError::Empty));
        // degrading wrapper keeps the currency
        assert_eq!(parse("1-2 USD"), (0.0, "USD".to_string()));
    }
}
