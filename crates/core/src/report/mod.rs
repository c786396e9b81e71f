//! Merged report generation.
//!
//! [`ReportBuilder`] lays every order out on one styled [`Sheet`]: a banner,
//! one section per order (metadata, column header, line items, totals) and
//! a grand summary. Row bookkeeping lives in the builder's cursor; formula
//! text comes from [`FormulaExpr`] so no address strings are assembled here.

mod naming;
pub mod styles;

pub use naming::{output_file_name, FALLBACK_STEM};

use crate::cost::parse_cost;
use crate::currency::{convert, CurrencyCode, RateSource};
use crate::extract::{LineItem, OrderDocument};
use crate::formula::FormulaExpr;
use chrono::{Local, NaiveDateTime};
use indexmap::IndexSet;
use ordermerge_sheet::{CellAddr, CellStyle, CellValue, Sheet};
use std::ops::Range;
use styles::SummaryTone;

pub const SHEET_NAME: &str = "Merged Order Summary";
pub const REPORT_TITLE: &str = "MERGED ORDER SUMMARY";

pub const COLUMN_HEADERS: [&str; 11] = [
    "NO",
    "DESCRIPTION",
    "CODE",
    "QTTY",
    "UNIT",
    "U.PRICE",
    "T.PRICE",
    "REMARKS",
    "STOCK LOC.",
    "U.COST",
    "T.COST",
];

pub const COLUMN_WIDTHS: [f64; 11] = [6.0, 55.0, 15.0, 8.0, 8.0, 12.0, 14.0, 30.0, 18.0, 12.0, 14.0];

/// Row index of the first order section (row 6 in the workbook).
pub const FIRST_SECTION_ROW: u32 = 5;
/// Blank rows between a totals row and the next section.
pub const SECTION_GAP: u32 = 2;

const LAST_COL: u16 = 10;
const COL_NO: u16 = 0;
const COL_ORDER_LINE: u16 = 1;
const COL_QTY: u16 = 3;
const COL_UNIT_PRICE: u16 = 5;
const COL_TOTAL_PRICE: u16 = 6;
const COL_HEADER_LABEL: u16 = 7;
const COL_HEADER_VALUE: u16 = 8;
const COL_UNIT_COST: u16 = 9;
const COL_TOTAL_COST: u16 = 10;
const COL_SUMMARY_LABEL: u16 = 3;
const COL_SUMMARY_VALUE: u16 = 6;

/// Line item fields copied verbatim; their columns match their field index.
const VERBATIM_FIELDS: [usize; 6] = [
    LineItem::DESCRIPTION,
    LineItem::CODE,
    LineItem::QTY,
    LineItem::UNIT,
    LineItem::REMARKS,
    LineItem::STOCK_LOC,
];

const BANNER_HEIGHTS: [f64; 4] = [40.0, 30.0, 24.0, 4.0];

/// Presentation settings of one report.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Show the DATE / RFQ REF / QTN REF block next to each order line.
    pub show_header_info: bool,
    /// Timestamp printed in the banner.
    pub generated_at: NaiveDateTime,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            show_header_info: true,
            generated_at: Local::now().naive_local(),
        }
    }
}

/// Where one order landed on the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSection {
    pub file_name: String,
    /// Row indices of the line items.
    pub data_rows: Range<u32>,
    /// Row index of the TOTAL / COST TOTAL row.
    pub total_row: u32,
}

impl OrderSection {
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.data_rows.len()
    }

    #[must_use]
    pub fn sale_total(&self) -> CellAddr {
        CellAddr::new(self.total_row, COL_TOTAL_PRICE)
    }

    #[must_use]
    pub fn cost_total(&self) -> CellAddr {
        CellAddr::new(self.total_row, COL_TOTAL_COST)
    }
}

/// Cells of the grand summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryCells {
    pub total_sales: CellAddr,
    pub total_cost: CellAddr,
    pub discount: Option<CellAddr>,
    pub final_sales: CellAddr,
    pub profit: CellAddr,
}

/// Evaluated grand summary figures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryTotals {
    pub total_sales: f64,
    pub total_cost: f64,
    pub discount: f64,
    pub final_sales: f64,
    pub profit: f64,
}

/// A finished report sheet with its layout bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedReport {
    sheet: Sheet,
    sections: Vec<OrderSection>,
    summary: Option<SummaryCells>,
}

impl MergedReport {
    #[must_use]
    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    #[must_use]
    pub fn into_sheet(self) -> Sheet {
        self.sheet
    }

    #[must_use]
    pub fn sections(&self) -> &[OrderSection] {
        &self.sections
    }

    /// Grand summary cells; `None` when no order was written.
    #[must_use]
    pub fn summary(&self) -> Option<&SummaryCells> {
        self.summary.as_ref()
    }

    /// Numeric value of a cell, using the computed result of formulas.
    #[must_use]
    pub fn value(&self, addr: CellAddr) -> Option<f64> {
        self.sheet.get(addr).as_float()
    }

    /// Grand summary figures; `None` when no order was written.
    #[must_use]
    pub fn totals(&self) -> Option<SummaryTotals> {
        let cells = self.summary.as_ref()?;
        let read = |addr: CellAddr| self.value(addr).unwrap_or(0.0);
        Some(SummaryTotals {
            total_sales: read(cells.total_sales),
            total_cost: read(cells.total_cost),
            discount: cells.discount.map_or(0.0, read),
            final_sales: read(cells.final_sales),
            profit: read(cells.profit),
        })
    }
}

/// Unique non-empty vessel names in first-seen order.
#[must_use]
pub fn vessel_names(orders: &[OrderDocument]) -> Vec<String> {
    orders
        .iter()
        .map(|order| order.header_info.vessel.as_str())
        .filter(|vessel| !vessel.is_empty())
        .collect::<IndexSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Builds one report; owns the sheet and the row cursor for that call.
pub struct ReportBuilder<'a, R: RateSource> {
    sheet: Sheet,
    row: u32,
    discount_pct: f64,
    rates: &'a R,
    options: &'a ReportOptions,
    sections: Vec<OrderSection>,
}

impl<'a, R: RateSource> ReportBuilder<'a, R> {
    pub fn new(discount_pct: f64, rates: &'a R, options: &'a ReportOptions) -> Self {
        ReportBuilder {
            sheet: Sheet::with_name(SHEET_NAME),
            row: 0,
            discount_pct,
            rates,
            options,
            sections: Vec::new(),
        }
    }

    /// Lay out every order and return the finished report.
    #[must_use]
    pub fn build(mut self, orders: &[OrderDocument]) -> MergedReport {
        let vessels = vessel_names(orders);
        self.write_banner(orders.len(), &vessels);

        self.row = FIRST_SECTION_ROW;
        let mut last_currency = CurrencyCode::none();
        for order in orders {
            if !order.header_info.currency.is_empty() {
                last_currency.clone_from(&order.header_info.currency);
            }
            let section = self.write_section(order);
            self.sections.push(section);
        }

        let summary = if self.sections.is_empty() {
            None
        } else {
            Some(self.write_grand_summary(&styles::price_format(&last_currency)))
        };
        self.finish_layout();

        tracing::info!(
            sections = self.sections.len(),
            vessels = vessels.len(),
            "merged report built"
        );

        MergedReport {
            sheet: self.sheet,
            sections: self.sections,
            summary,
        }
    }

    fn addr(&self, col: u16) -> CellAddr {
        CellAddr::new(self.row, col)
    }

    fn style_columns(&mut self, row: u32, cols: Range<u16>, style: &CellStyle) {
        for col in cols {
            self.sheet.set_style(CellAddr::new(row, col), style.clone());
        }
    }

    fn banner_row(&mut self, row: u32, text: String, style: CellStyle) {
        self.style_columns(row, 1..LAST_COL + 1, &style);
        self.sheet.set_styled(CellAddr::new(row, 0), text, style);
        self.sheet
            .merge(CellAddr::new(row, 0), CellAddr::new(row, LAST_COL));
    }

    fn write_banner(&mut self, file_count: usize, vessels: &[String]) {
        let vessel_text = if vessels.is_empty() {
            "N/A".to_string()
        } else {
            vessels.join(" / ")
        };
        let discount_text = if self.discount_pct > 0.0 {
            format!("  |  Discount: %{}", self.discount_pct)
        } else {
            String::new()
        };

        self.banner_row(0, REPORT_TITLE.to_string(), styles::title_banner());
        self.banner_row(1, format!("VESSEL: {vessel_text}"), styles::vessel_banner());
        self.banner_row(
            2,
            format!(
                "Generated: {}  |  Files: {file_count}{discount_text}",
                self.options.generated_at.format("%d.%m.%Y %H:%M")
            ),
            styles::info_banner(),
        );
        self.style_columns(3, 0..LAST_COL + 1, &styles::gold_rule());

        for (row, height) in (0u32..).zip(BANNER_HEIGHTS) {
            self.sheet.set_row_height(row, height);
        }
    }

    fn write_section(&mut self, order: &OrderDocument) -> OrderSection {
        let sale_currency = &order.header_info.currency;
        let format = styles::price_format(sale_currency);

        self.write_order_metadata(order);
        self.write_column_header();
        let data_rows = self.write_items(&order.data_rows, sale_currency, &format);

        self.row += 1;
        let total_row = self.write_totals(&data_rows, &format);
        self.row += 1 + SECTION_GAP;

        tracing::debug!(
            file = %order.file_name,
            items = data_rows.len(),
            total_row = total_row + 1,
            "order section written"
        );

        OrderSection {
            file_name: order.file_name.clone(),
            data_rows,
            total_row,
        }
    }

    fn write_order_metadata(&mut self, order: &OrderDocument) {
        let order_line = format!("Order: {}", order.file_name);
        self.sheet
            .set_styled(self.addr(COL_ORDER_LINE), order_line, styles::order_line());

        let show_cells = self.options.show_header_info
            && order.header_cells.iter().any(|cell| cell.has_content());
        if !show_cells {
            self.row += 1;
            return;
        }

        for (row, cell) in (self.row..).zip(&order.header_cells) {
            if !cell.has_content() {
                continue;
            }
            let label = cell.label.trim_end_matches([' ', ':']);
            let label = if label.is_empty() {
                String::new()
            } else {
                format!("{label} : ")
            };
            self.sheet.set_styled(
                CellAddr::new(row, COL_HEADER_LABEL),
                label,
                styles::header_label(),
            );
            self.sheet.set_styled(
                CellAddr::new(row, COL_HEADER_VALUE),
                cell.value.as_str(),
                styles::header_value(),
            );
        }
        self.row += u32::try_from(order.header_cells.len()).unwrap_or(u32::MAX);
    }

    fn write_column_header(&mut self) {
        let style = styles::column_header();
        for (col, header) in (0u16..).zip(COLUMN_HEADERS) {
            self.sheet.set_styled(self.addr(col), header, style.clone());
        }
        self.row += 1;
    }

    fn write_items(
        &mut self,
        items: &[LineItem],
        sale_currency: &CurrencyCode,
        format: &str,
    ) -> Range<u32> {
        let start = self.row;
        for (number, item) in (1usize..).zip(items) {
            self.write_item(number, item, sale_currency, format);
            self.row += 1;
        }
        start..self.row
    }

    fn write_item(&mut self, number: usize, item: &LineItem, sale_currency: &CurrencyCode, format: &str) {
        let plain = styles::data_cell();
        let money = styles::money_cell(format);

        self.sheet.set_styled(self.addr(COL_NO), number, plain.clone());
        for field in VERBATIM_FIELDS {
            let col = u16::try_from(field).unwrap_or(LAST_COL);
            self.sheet
                .set_styled(self.addr(col), item.field(field).clone(), plain.clone());
        }

        let unit_price = item.field(LineItem::UNIT_PRICE).clone();
        let price_style = if unit_price.is_null() { plain } else { money.clone() };
        self.sheet
            .set_styled(self.addr(COL_UNIT_PRICE), unit_price, price_style);

        let (amount, cost_currency) = parse_cost(item.cost());
        let converted = if amount > 0.0 {
            convert(amount, cost_currency.as_str(), sale_currency.as_str(), self.rates)
        } else {
            0.0
        };
        let unit_cost = if converted > 0.0 {
            CellValue::Float(round2(converted))
        } else {
            CellValue::Null
        };
        self.sheet
            .set_styled(self.addr(COL_UNIT_COST), unit_cost, money.clone());

        let qty = FormulaExpr::cell(self.addr(COL_QTY));
        let line_total = qty.clone() * FormulaExpr::cell(self.addr(COL_UNIT_PRICE));
        let line_cost = qty * FormulaExpr::cell(self.addr(COL_UNIT_COST));
        let cell = line_total.to_cell(&self.sheet);
        self.sheet
            .set_styled(self.addr(COL_TOTAL_PRICE), cell, money.clone());
        let cell = line_cost.to_cell(&self.sheet);
        self.sheet.set_styled(self.addr(COL_TOTAL_COST), cell, money);
    }

    fn section_sum(&self, data_rows: &Range<u32>, col: u16) -> FormulaExpr {
        if data_rows.is_empty() {
            return FormulaExpr::Literal(0.0);
        }
        FormulaExpr::sum_range(
            CellAddr::new(data_rows.start, col),
            CellAddr::new(data_rows.end - 1, col),
        )
    }

    fn write_totals(&mut self, data_rows: &Range<u32>, format: &str) -> u32 {
        let value_style = styles::total_value(format);
        for (label_col, value_col, label) in [
            (COL_UNIT_PRICE, COL_TOTAL_PRICE, "TOTAL:"),
            (COL_UNIT_COST, COL_TOTAL_COST, "COST TOTAL:"),
        ] {
            self.sheet
                .set_styled(self.addr(label_col), label, styles::total_label());
            let cell = self.section_sum(data_rows, value_col).to_cell(&self.sheet);
            self.sheet
                .set_styled(self.addr(value_col), cell, value_style.clone());
        }
        self.row
    }

    fn write_grand_summary(&mut self, format: &str) -> SummaryCells {
        self.style_columns(self.row, 0..LAST_COL + 1, &styles::summary_separator());
        self.row += 1;

        let discount_text = if self.discount_pct > 0.0 {
            format!("  |  İNDİRİM: %{}", self.discount_pct)
        } else {
            String::new()
        };
        let title = format!(
            "GRAND SUMMARY  —  {} ORDERS{discount_text}",
            self.sections.len()
        );
        self.banner_row(self.row, title, styles::summary_title());
        self.row += 2;

        let sale_refs = FormulaExpr::sum_of(self.sections.iter().map(OrderSection::sale_total));
        let cost_refs = FormulaExpr::sum_of(self.sections.iter().map(OrderSection::cost_total));
        let total_sales = self.summary_row("TOPLAM SATIŞ :", &sale_refs, SummaryTone::Normal, format);
        let total_cost = self.summary_row("TOPLAM ALIŞ :", &cost_refs, SummaryTone::Normal, format);

        let (discount, final_sales) = if self.discount_pct > 0.0 {
            let rate = FormulaExpr::Literal(self.discount_pct / 100.0);
            let discount = self.summary_row(
                &format!("İNDİRİM ({}%) :", self.discount_pct),
                &(FormulaExpr::cell(total_sales) * rate),
                SummaryTone::Normal,
                format,
            );
            let final_sales = self.summary_row(
                "FİNAL SATIŞ TUTARI :",
                &(FormulaExpr::cell(total_sales) - FormulaExpr::cell(discount)),
                SummaryTone::Grand,
                format,
            );
            (Some(discount), final_sales)
        } else {
            (None, total_sales)
        };

        self.row += 1;
        let profit = self.summary_row(
            "KÂR / ZARAR :",
            &(FormulaExpr::cell(final_sales) - FormulaExpr::cell(total_cost)),
            SummaryTone::Profit,
            format,
        );
        self.row += 1;

        SummaryCells {
            total_sales,
            total_cost,
            discount,
            final_sales,
            profit,
        }
    }

    /// Label merged over D:F, value merged over G:H. Returns the value cell.
    fn summary_row(&mut self, label: &str, expr: &FormulaExpr, tone: SummaryTone, format: &str) -> CellAddr {
        let label_style = styles::summary_label(tone);
        let value_style = styles::summary_value(tone, format);
        let label_addr = self.addr(COL_SUMMARY_LABEL);
        let value_addr = self.addr(COL_SUMMARY_VALUE);

        self.style_columns(self.row, COL_SUMMARY_LABEL + 1..COL_SUMMARY_VALUE, &label_style);
        self.sheet.set_styled(label_addr, label, label_style);
        self.sheet.merge(label_addr, self.addr(COL_SUMMARY_VALUE - 1));

        let value = expr.to_cell(&self.sheet);
        self.style_columns(self.row, COL_SUMMARY_VALUE + 1..COL_SUMMARY_VALUE + 2, &value_style);
        self.sheet.set_styled(value_addr, value, value_style);
        self.sheet.merge(value_addr, self.addr(COL_SUMMARY_VALUE + 1));

        self.row += 1;
        value_addr
    }

    fn finish_layout(&mut self) {
        for (col, width) in (0u16..).zip(COLUMN_WIDTHS) {
            self.sheet.set_column_width(col, width);
        }
        let last_row = self.row.saturating_sub(1);
        self.sheet
            .set_print_area(CellAddr::new(0, 0), CellAddr::new(last_row, LAST_COL));
        self.sheet.set_show_gridlines(false);
    }
}

/// Build the merged report for `orders`.
///
/// Returns the report, the total number of line items and the unique vessel
/// names in first-seen order.
#[must_use]
pub fn build(
    orders: &[OrderDocument],
    discount_pct: f64,
    rates: &impl RateSource,
    options: &ReportOptions,
) -> (MergedReport, usize, Vec<String>) {
    let report = ReportBuilder::new(discount_pct, rates, options).build(orders);
    let total_items = orders.iter().map(OrderDocument::item_count).sum();
    (report, total_items, vessel_names(orders))
}
