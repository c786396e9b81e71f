use crate::error::{Result, SheetError};
use std::fmt;

/// Zero-based cell position. Displays in A1 notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellAddr {
    pub row: u32,
    pub col: u16,
}

impl CellAddr {
    #[must_use]
    pub const fn new(row: u32, col: u16) -> Self {
        CellAddr { row, col }
    }

    /// Parse A1-style cell notation (e.g., "A1", "Z99", "AA1")
    pub fn parse(notation: &str) -> Result<Self> {
        let (row, col) = parse_a1(notation)?;
        let row = u32::try_from(row).map_err(|_| SheetError::InvalidCellNotation(notation.to_string()))?;
        let col = u16::try_from(col).map_err(|_| SheetError::InvalidCellNotation(notation.to_string()))?;
        Ok(CellAddr { row, col })
    }
}

impl fmt::Display for CellAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_index_to_letters(usize::from(self.col)), self.row + 1)
    }
}

/// Parse A1-style cell notation
/// Returns (row, column) as 0-based indices
pub fn parse_a1(notation: &str) -> Result<(usize, usize)> {
    let notation = notation.trim().to_uppercase();
    let split_pos = notation
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| SheetError::InvalidCellNotation(notation.clone()))?;

    let (col_part, row_part) = notation.split_at(split_pos);
    if col_part.is_empty() {
        return Err(SheetError::InvalidCellNotation(notation));
    }

    let col = parse_column_letters(col_part)
        .ok_or_else(|| SheetError::InvalidCellNotation(notation.clone()))?;
    let row = row_part
        .parse::<usize>()
        .map_err(|_| SheetError::InvalidCellNotation(notation.clone()))?;

    // A1 is 1-based
    if row == 0 {
        return Err(SheetError::InvalidCellNotation(notation));
    }

    Ok((row - 1, col))
}

/// Convert column letters to 0-based column index
/// A=0, B=1, ... Z=25, AA=26, AB=27, ...
fn parse_column_letters(col_str: &str) -> Option<usize> {
    let mut col = 0usize;
    for b in col_str.bytes() {
        if !b.is_ascii_uppercase() {
            return None;
        }
        col = col * 26 + usize::from(b - b'A') + 1;
    }
    col.checked_sub(1)
}

/// Convert 0-based column index to column letters
/// 0=A, 1=B, ... 25=Z, 26=AA, 27=AB, ...
pub fn column_index_to_letters(mut col: usize) -> String {
    let mut result = String::new();
    col += 1;

    while col > 0 {
        col -= 1;
        result.insert(0, ((col % 26) as u8 + b'A') as char);
        col /= 26;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_a1() {
        assert_eq!(parse_a1("A1").unwrap(), (0, 0));
        assert_eq!(parse_a1("K12").unwrap(), (11, 10));
        assert_eq!(parse_a1("AA1").unwrap(), (0, 26));
        assert_eq!(parse_a1("g7").unwrap(), (6, 6));
    }

    #[test]
    fn test_parse_a1_errors() {
        assert!(parse_a1("").is_err());
        assert!(parse_a1("A").is_err());
        assert!(parse_a1("1").is_err());
        assert!(parse_a1("A0").is_err());
        assert!(parse_a1("A1B").is_err());
    }

    #[test]
    fn test_column_index_to_letters() {
        assert_eq!(column_index_to_letters(0), "A");
        assert_eq!(column_index_to_letters(10), "K");
        assert_eq!(column_index_to_letters(25), "Z");
        assert_eq!(column_index_to_letters(26), "AA");
        assert_eq!(column_index_to_letters(701), "ZZ");
        assert_eq!(column_index_to_letters(702), "AAA");
    }

    #[test]
    fn test_cell_addr_display_and_parse() {
        let addr = CellAddr::new(6, 3);
        assert_eq!(addr.to_string(), "D7");
        assert_eq!(CellAddr::parse("D7").unwrap(), addr);
    }
}
