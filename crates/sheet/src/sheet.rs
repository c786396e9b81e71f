use crate::a1_notation::CellAddr;
use crate::cell::CellValue;
use crate::error::Result;
use crate::style::CellStyle;
use std::collections::BTreeMap;

/// A written cell: value plus optional style.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyledCell {
    pub value: CellValue,
    pub style: Option<CellStyle>,
}

/// Inclusive rectangular range of merged cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedRange {
    pub first: CellAddr,
    pub last: CellAddr,
}

static NULL: CellValue = CellValue::Null;

/// A styled output sheet (sparse, row-major ordered storage)
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    cells: BTreeMap<CellAddr, StyledCell>,
    merges: Vec<MergedRange>,
    row_heights: BTreeMap<u32, f64>,
    column_widths: BTreeMap<u16, f64>,
    print_area: Option<MergedRange>,
    show_gridlines: bool,
}

impl Sheet {
    /// Create a new empty sheet
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Sheet1")
    }

    /// Create a new empty sheet with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            cells: BTreeMap::new(),
            merges: Vec::new(),
            row_heights: BTreeMap::new(),
            column_widths: BTreeMap::new(),
            print_area: None,
            show_gridlines: true,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set a value, keeping any style already attached to the cell.
    pub fn set<T: Into<CellValue>>(&mut self, addr: CellAddr, value: T) {
        self.cells.entry(addr).or_default().value = value.into();
    }

    /// Set a value together with its style.
    pub fn set_styled<T: Into<CellValue>>(&mut self, addr: CellAddr, value: T, style: CellStyle) {
        self.cells.insert(
            addr,
            StyledCell {
                value: value.into(),
                style: Some(style),
            },
        );
    }

    /// Attach a style, keeping the current value.
    pub fn set_style(&mut self, addr: CellAddr, style: CellStyle) {
        self.cells.entry(addr).or_default().style = Some(style);
    }

    /// Value at `addr`; unwritten cells read as null.
    #[must_use]
    pub fn get(&self, addr: CellAddr) -> &CellValue {
        self.cells.get(&addr).map_or(&NULL, |cell| &cell.value)
    }

    /// Value at an A1 reference.
    pub fn get_a1(&self, notation: &str) -> Result<&CellValue> {
        Ok(self.get(CellAddr::parse(notation)?))
    }

    #[must_use]
    pub fn style(&self, addr: CellAddr) -> Option<&CellStyle> {
        self.cells.get(&addr).and_then(|cell| cell.style.as_ref())
    }

    /// Written cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellAddr, &StyledCell)> {
        self.cells.iter().map(|(addr, cell)| (*addr, cell))
    }

    /// Index of the last row holding a written cell.
    #[must_use]
    pub fn last_row(&self) -> Option<u32> {
        self.cells.keys().next_back().map(|addr| addr.row)
    }

    pub fn merge(&mut self, first: CellAddr, last: CellAddr) {
        self.merges.push(MergedRange { first, last });
    }

    #[must_use]
    pub fn merges(&self) -> &[MergedRange] {
        &self.merges
    }

    pub fn set_row_height(&mut self, row: u32, height: f64) {
        self.row_heights.insert(row, height);
    }

    #[must_use]
    pub fn row_heights(&self) -> &BTreeMap<u32, f64> {
        &self.row_heights
    }

    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.column_widths.insert(col, width);
    }

    #[must_use]
    pub fn column_widths(&self) -> &BTreeMap<u16, f64> {
        &self.column_widths
    }

    pub fn set_print_area(&mut self, first: CellAddr, last: CellAddr) {
        self.print_area = Some(MergedRange { first, last });
    }

    #[must_use]
    pub fn print_area(&self) -> Option<MergedRange> {
        self.print_area
    }

    pub fn set_show_gridlines(&mut self, show: bool) {
        self.show_gridlines = show;
    }

    #[must_use]
    pub fn show_gridlines(&self) -> bool {
        self.show_gridlines
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Rgb;

    #[test]
    fn test_set_and_get() {
        let mut sheet = Sheet::with_name("Report");
        sheet.set(CellAddr::new(0, 0), "title");
        sheet.set(CellAddr::new(2, 3), 4.5);

        assert_eq!(sheet.name(), "Report");
        assert_eq!(sheet.get_a1("A1").unwrap().as_text(), "title");
        assert_eq!(sheet.get_a1("D3").unwrap().as_float(), Some(4.5));
        assert!(sheet.get_a1("B2").unwrap().is_null());
        assert_eq!(sheet.last_row(), Some(2));
    }

    #[test]
    fn test_style_and_value_are_independent() {
        let mut sheet = Sheet::new();
        let addr = CellAddr::new(1, 1);
        sheet.set_style(addr, CellStyle::new().fill(Rgb(0xF39C12)));
        assert!(sheet.get(addr).is_null());

        sheet.set(addr, "x");
        assert_eq!(sheet.style(addr).unwrap().fill, Some(Rgb(0xF39C12)));
        assert_eq!(sheet.get(addr).as_text(), "x");
    }
}
