//! Order summary extraction.
//!
//! Order summaries follow a loose template: vessel name at a fixed cell,
//! DATE / RFQ REF / QTN REF labels somewhere near the top, an item table
//! whose header row starts with `NO`, and a `TOTAL` row closing the table.
//! Each heuristic below is a pure function over a [`Grid`] so it can be
//! tested on its own; all scan bounds and label tokens are named constants.

use crate::currency::CurrencyCode;
use crate::error::ExtractError;
use ordermerge_sheet::{CellValue, Grid};
use serde::Serialize;
use std::path::Path;

/// Narrowest grid that can hold an order layout.
pub const MIN_COLUMNS: usize = 2;
/// Fixed (row, col) of the vessel name (cell B15).
pub const VESSEL_CELL: (usize, usize) = (14, 1);
/// Header metadata is searched in rows `0..HEADER_SCAN_ROWS`.
pub const HEADER_SCAN_ROWS: usize = 25;
/// Header metadata is searched in columns `0..HEADER_SCAN_COLS`.
pub const HEADER_SCAN_COLS: usize = 10;
pub const RFQ_LABEL: &str = "RFQ REF";
pub const QTN_LABEL: &str = "QTN REF";
pub const DATE_LABEL: &str = "DATE";
pub const LABEL_SEPARATOR: char = ':';
/// Rows under the DATE label that belong to the header-cell block.
pub const HEADER_BLOCK_EXTRA_ROWS: usize = 2;
pub const TOTAL_LABEL: &str = "TOTAL";
/// Cells to the right of a TOTAL label inspected for a currency symbol.
pub const CURRENCY_LOOKAHEAD: usize = 2;
/// Symbol to currency code, checked in this order.
pub const CURRENCY_SYMBOLS: [(&str, &str); 4] =
    [("€", "EUR"), ("$", "USD"), ("£", "GBP"), ("₺", "TRY")];
/// First-column text of the item table header row.
pub const ITEM_HEADER_LABEL: &str = "NO";
/// Column whose `TOTAL` text ends the item table.
pub const TERMINATOR_COL: usize = 5;
/// Number of raw fields kept per line item.
pub const LINE_ITEM_WIDTH: usize = 10;

/// Header metadata of one order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeaderInfo {
    pub vessel: String,
    pub currency: CurrencyCode,
    pub rfq_ref: Option<String>,
    pub qtn_ref: Option<String>,
    pub date: Option<String>,
}

/// One displayed metadata row, e.g. `("RFQ REF", "R-118")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    pub label: String,
    pub value: String,
}

impl HeaderCell {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        HeaderCell {
            label: label.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.label.is_empty() || !self.value.is_empty()
    }
}

/// Raw fields of one item row:
/// `[no, description, code, qty, unit, unit_price, total_price, remarks, stock_loc, cost]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    fields: [CellValue; LINE_ITEM_WIDTH],
}

impl LineItem {
    pub const NO: usize = 0;
    pub const DESCRIPTION: usize = 1;
    pub const CODE: usize = 2;
    pub const QTY: usize = 3;
    pub const UNIT: usize = 4;
    pub const UNIT_PRICE: usize = 5;
    pub const TOTAL_PRICE: usize = 6;
    pub const REMARKS: usize = 7;
    pub const STOCK_LOC: usize = 8;
    pub const COST: usize = 9;

    /// Take the first [`LINE_ITEM_WIDTH`] values of a row, padding with nulls.
    #[must_use]
    pub fn from_row(row: &[CellValue]) -> Self {
        let fields = std::array::from_fn(|i| row.get(i).cloned().unwrap_or_default());
        LineItem { fields }
    }

    #[must_use]
    pub fn field(&self, index: usize) -> &CellValue {
        &self.fields[index.min(LINE_ITEM_WIDTH - 1)]
    }

    /// Quantity coerced to a number; 0 when not numeric.
    #[must_use]
    pub fn qty(&self) -> f64 {
        self.fields[Self::QTY].as_float().unwrap_or(0.0)
    }

    /// Unit price coerced to a number; 0 when not numeric.
    #[must_use]
    pub fn unit_price(&self) -> f64 {
        self.fields[Self::UNIT_PRICE].as_float().unwrap_or(0.0)
    }

    /// The unparsed cost cell.
    #[must_use]
    pub fn cost(&self) -> &CellValue {
        &self.fields[Self::COST]
    }
}

/// A successfully parsed order summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDocument {
    pub file_name: String,
    pub header_info: HeaderInfo,
    pub header_cells: Vec<HeaderCell>,
    pub data_rows: Vec<LineItem>,
}

impl OrderDocument {
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.data_rows.len()
    }
}

fn value_right_of(grid: &Grid, row: usize, col: usize) -> Option<String> {
    let value = grid.get(row, col + 1);
    (!value.is_null()).then(|| value.as_text())
}

fn is_date_label(upper: &str) -> bool {
    upper.contains(LABEL_SEPARATOR)
        && upper
            .split_whitespace()
            .any(|token| token.starts_with(DATE_LABEL))
}

/// Vessel name from the fixed template cell; empty when absent.
#[must_use]
pub fn scan_vessel(grid: &Grid) -> String {
    grid.text(VESSEL_CELL.0, VESSEL_CELL.1)
}

/// Scan the header window for RFQ REF, QTN REF and DATE values.
///
/// The value is the cell right of the label. Later matches overwrite earlier
/// ones.
pub fn scan_header_refs(grid: &Grid, info: &mut HeaderInfo) {
    let rows = grid.row_count().min(HEADER_SCAN_ROWS);
    let cols = grid.col_count().min(HEADER_SCAN_COLS);

    for row in 0..rows {
        for col in 0..cols {
            let upper = grid.text(row, col).to_uppercase();
            let slot = if upper.contains(RFQ_LABEL) {
                &mut info.rfq_ref
            } else if upper.contains(QTN_LABEL) {
                &mut info.qtn_ref
            } else if is_date_label(&upper) {
                &mut info.date
            } else {
                continue;
            };
            if let Some(value) = value_right_of(grid, row, col) {
                *slot = Some(value);
            }
        }
    }
}

/// Build the displayed header-cell block.
///
/// The first cell starting with `DATE` and containing `:` yields
/// `("DATE", value)`; the two rows directly below it are taken as further
/// label/value pairs. The template is trusted: nothing checks that those
/// rows really are RFQ REF and QTN REF.
#[must_use]
pub fn scan_header_cells(grid: &Grid) -> Vec<HeaderCell> {
    let rows = grid.row_count().min(HEADER_SCAN_ROWS);
    let cols = grid.col_count().min(HEADER_SCAN_COLS);

    for row in 0..rows {
        for col in 0..cols {
            let upper = grid.text(row, col).to_uppercase();
            if !(upper.starts_with(DATE_LABEL) && upper.contains(LABEL_SEPARATOR)) {
                continue;
            }

            let mut cells = vec![HeaderCell::new(DATE_LABEL, grid.text(row, col + 1))];
            for offset in 1..=HEADER_BLOCK_EXTRA_ROWS {
                let r = row + offset;
                if r >= grid.row_count() {
                    break;
                }
                let label = grid.text(r, col);
                let label = label.trim_end_matches([' ', LABEL_SEPARATOR]).trim();
                cells.push(HeaderCell::new(label, grid.text(r, col + 1)));
            }
            return cells;
        }
    }
    Vec::new()
}

/// Detect the sale currency from the symbol next to a `TOTAL:` label.
#[must_use]
pub fn detect_currency(grid: &Grid) -> CurrencyCode {
    for (row, cells) in grid.rows().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let upper = cell.as_text().to_uppercase();
            if !(upper.contains(TOTAL_LABEL) && upper.contains(LABEL_SEPARATOR)) {
                continue;
            }
            let end = (col + 1 + CURRENCY_LOOKAHEAD).min(grid.col_count());
            for next in col + 1..end {
                let value = grid.get(row, next);
                if value.is_null() {
                    continue;
                }
                let text = value.to_string();
                if let Some((_, code)) = CURRENCY_SYMBOLS
                    .iter()
                    .find(|(symbol, _)| text.contains(symbol))
                {
                    tracing::debug!(row, col = next, currency = code, "sale currency detected");
                    return CurrencyCode::new(code);
                }
            }
        }
    }
    CurrencyCode::none()
}

/// Index of the item table header row (first-column text `NO`).
#[must_use]
pub fn find_item_header(grid: &Grid) -> Option<usize> {
    (0..grid.row_count()).find(|&row| grid.text(row, 0).eq_ignore_ascii_case(ITEM_HEADER_LABEL))
}

/// Collect line items below the header row.
///
/// A blank first cell ends the table when column F mentions `TOTAL` and is
/// skipped otherwise; rows whose first cell starts with a digit are items;
/// anything else is ignored.
#[must_use]
pub fn extract_items(grid: &Grid, header_row: usize) -> Vec<LineItem> {
    let mut items = Vec::new();
    for row in header_row + 1..grid.row_count() {
        let first = grid.text(row, 0);
        if first.is_empty() {
            if grid.text(row, TERMINATOR_COL).to_uppercase().contains(TOTAL_LABEL) {
                break;
            }
            continue;
        }
        if first.starts_with(|c: char| c.is_ascii_digit()) {
            if let Some(cells) = grid.row(row) {
                items.push(LineItem::from_row(cells));
            }
        }
    }
    items
}

/// Turn one raw grid into an order document.
pub fn extract(file_name: &str, grid: &Grid) -> Result<OrderDocument, ExtractError> {
    if grid.col_count() < MIN_COLUMNS {
        return Err(ExtractError::TooFewColumns {
            found: grid.col_count(),
            required: MIN_COLUMNS,
        });
    }

    let mut header_info = HeaderInfo {
        vessel: scan_vessel(grid),
        ..HeaderInfo::default()
    };
    scan_header_refs(grid, &mut header_info);
    let header_cells = scan_header_cells(grid);
    header_info.currency = detect_currency(grid);

    let header_row = find_item_header(grid).ok_or(ExtractError::MissingItemHeader)?;
    let data_rows = extract_items(grid, header_row);

    tracing::debug!(
        file = file_name,
        vessel = %header_info.vessel,
        currency = %header_info.currency,
        items = data_rows.len(),
        "order extracted"
    );

    Ok(OrderDocument {
        file_name: file_name.to_string(),
        header_info,
        header_cells,
        data_rows,
    })
}

/// Read a spreadsheet file and extract its order document.
pub fn extract_file(path: &Path) -> Result<OrderDocument, ExtractError> {
    let grid = Grid::from_workbook_path(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    extract(&file_name, &grid)
}
