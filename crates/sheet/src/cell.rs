use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a formula stored in a cell.
///
/// `cached` holds the value the formula evaluated to when it was written, so
/// readers that do not recalculate still see a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaCell {
    pub source: String,
    pub cached: Option<Box<CellValue>>,
}

/// Represents a cell value in a grid or sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Formula(FormulaCell),
}

impl CellValue {
    /// Create a formula cell value.
    #[must_use]
    pub fn formula<S: Into<String>>(source: S) -> Self {
        CellValue::Formula(FormulaCell {
            source: source.into(),
            cached: None,
        })
    }

    /// Create a formula cell value carrying its computed result.
    #[must_use]
    pub fn formula_with_result<S: Into<String>>(source: S, result: CellValue) -> Self {
        CellValue::Formula(FormulaCell {
            source: source.into(),
            cached: Some(Box::new(result)),
        })
    }

    /// Return the cached value for formulas, or self for non-formulas.
    #[must_use]
    pub fn cached_or_self(&self) -> &CellValue {
        match self {
            CellValue::Formula(formula) => formula.cached.as_deref().unwrap_or(self),
            _ => self,
        }
    }

    /// Formula source text, if this is a formula cell.
    #[must_use]
    pub fn formula_source(&self) -> Option<&str> {
        match self {
            CellValue::Formula(formula) => Some(&formula.source),
            _ => None,
        }
    }

    /// Check if the value is null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.cached_or_self(), CellValue::Null)
    }

    /// Try to get the value as a float
    ///
    /// Strings are trimmed before parsing.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self.cached_or_self() {
            CellValue::Float(f) => Some(*f),
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::String(s) => s.trim().parse().ok(),
            CellValue::Null => None,
            CellValue::Formula(_) => None,
        }
    }

    /// The displayed text of the value, trimmed. Null is the empty string.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self.cached_or_self() {
            CellValue::Null => String::new(),
            CellValue::String(s) => s.trim().to_string(),
            other => other.to_string().trim().to_string(),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Null
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cached_or_self() {
            CellValue::Null => write!(f, ""),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(fl) => write!(f, "{fl}"),
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Formula(formula) => write!(f, "{}", formula.source),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Int(i64::from(i))
    }
}

impl From<usize> for CellValue {
    fn from(i: usize) -> Self {
        i64::try_from(i).map_or(CellValue::Float(i as f64), CellValue::Int)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_text_trims() {
        assert_eq!(CellValue::from("  NO ").as_text(), "NO");
        assert_eq!(CellValue::Int(12).as_text(), "12");
        assert_eq!(CellValue::Float(2.5).as_text(), "2.5");
        assert_eq!(CellValue::Null.as_text(), "");
    }

    #[test]
    fn test_as_float_coercion() {
        assert_eq!(CellValue::from(" 4 ").as_float(), Some(4.0));
        assert_eq!(CellValue::Int(3).as_float(), Some(3.0));
        assert_eq!(CellValue::from("pcs").as_float(), None);
        assert_eq!(CellValue::Null.as_float(), None);
    }

    #[test]
    fn test_formula_cached_value() {
        let plain = CellValue::formula("=A1+B1");
        assert_eq!(plain.as_float(), None);
        assert_eq!(plain.formula_source(), Some("=A1+B1"));

        let cached = CellValue::formula_with_result("=A1+B1", CellValue::Float(7.0));
        assert_eq!(cached.as_float(), Some(7.0));
        assert!(!cached.is_null());
    }
}
