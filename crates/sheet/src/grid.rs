use crate::cell::CellValue;

/// Immutable 2-D grid of raw cell values read from one input file.
///
/// Positions are absolute: row 0 / column 0 is A1 even when the source sheet
/// starts further down. Rows are padded to a common width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

static NULL: CellValue = CellValue::Null;

impl Grid {
    /// Build a grid from row-major values; short rows are padded with nulls.
    #[must_use]
    pub fn from_rows<T: Into<CellValue>>(rows: Vec<Vec<T>>) -> Self {
        let mut rows: Vec<Vec<CellValue>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, CellValue::Null);
        }
        Grid { rows, width }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn col_count(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (row, col); out-of-range positions read as null.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&NULL)
    }

    /// Trimmed text at (row, col); empty when null or out of range.
    #[must_use]
    pub fn text(&self, row: usize, col: usize) -> String {
        self.get(row, col).as_text()
    }

    /// Row slice, if the row exists.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(Vec::as_slice)
    }
}
