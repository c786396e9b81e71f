use chrono::{NaiveDate, NaiveDateTime};
use ordermerge_core::{
    extract_file, merge, ExtractError, MergeOptions, RateTable,
};
use ordermerge_sheet::{CellAddr, CellValue, Grid, Sheet};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

struct Item {
    qty: f64,
    price: f64,
    cost: &'static str,
}

fn addr(a1: &str) -> CellAddr {
    CellAddr::parse(a1).unwrap()
}

/// Write an order summary laid out like the supplier template.
fn write_order(dir: &Path, name: &str, vessel: &str, items: &[Item], total_text: &str) -> PathBuf {
    let mut sheet = Sheet::with_name("Order");
    sheet.set(addr("B15"), vessel);
    sheet.set(addr("H18"), "DATE :");
    sheet.set(addr("I18"), "02.05.2024");
    sheet.set(addr("H19"), "RFQ REF :");
    sheet.set(addr("I19"), "RFQ-7");
    sheet.set(addr("H20"), "QTN REF :");
    sheet.set(addr("I20"), "QTN-7");

    let headers = ["NO", "DESCRIPTION", "CODE", "QTTY", "UNIT", "U.PRICE", "T.PRICE", "REMARKS", "STOCK LOC.", "COST"];
    for (col, header) in (0u16..).zip(headers) {
        sheet.set(CellAddr::new(21, col), header);
    }

    let mut row = 22;
    for (no, item) in (1i64..).zip(items) {
        sheet.set(CellAddr::new(row, 0), no);
        sheet.set(CellAddr::new(row, 1), format!("part {no}"));
        sheet.set(CellAddr::new(row, 3), item.qty);
        sheet.set(CellAddr::new(row, 4), "PCS");
        sheet.set(CellAddr::new(row, 5), item.price);
        sheet.set(CellAddr::new(row, 9), item.cost);
        row += 1;
    }
    sheet.set(CellAddr::new(row + 1, 5), "TOTAL :");
    sheet.set(CellAddr::new(row + 1, 6), total_text);
    // trailing rows after the terminator must be ignored
    sheet.set(CellAddr::new(row + 3, 0), "99");

    let path = dir.join(name);
    sheet.save_as_xlsx(&path).unwrap();
    path
}

fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 2)
        .unwrap()
        .and_hms_opt(9, 15, 0)
        .unwrap()
}

fn options() -> MergeOptions {
    MergeOptions {
        generated_at: Some(fixed_time()),
        ..MergeOptions::default()
    }
}

fn unit_rates() -> RateTable {
    RateTable::from_pairs([("EUR", 1.0), ("USD", 1.0)]).unwrap()
}

fn two_orders(dir: &Path) -> Vec<PathBuf> {
    let first = write_order(
        dir,
        "alpha.xlsx",
        "MV ALPHA",
        &[
            Item { qty: 1.0, price: 100.0, cost: "50 EUR" },
            Item { qty: 1.0, price: 100.0, cost: "50 EUR" },
            Item { qty: 1.0, price: 100.0, cost: "50 EUR" },
        ],
        "€ 300,00",
    );
    let second = write_order(
        dir,
        "beta.xlsx",
        "MV BETA",
        &[
            Item { qty: 2.0, price: 50.0, cost: "20 EUR" },
            Item { qty: 2.0, price: 50.0, cost: "20 EUR" },
        ],
        "€ 200,00",
    );
    vec![first, second]
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// ===== Extraction Tests =====

#[test]
fn test_extract_written_template() {
    let dir = tempdir().unwrap();
    let paths = two_orders(dir.path());

    let doc = extract_file(&paths[0]).unwrap();
    assert_eq!(doc.file_name, "alpha.xlsx");
    assert_eq!(doc.header_info.vessel, "MV ALPHA");
    assert_eq!(doc.header_info.currency.as_str(), "EUR");
    assert_eq!(doc.header_info.rfq_ref.as_deref(), Some("RFQ-7"));
    assert_eq!(doc.header_cells.len(), 3);
    assert_eq!(doc.item_count(), 3);
    assert_eq!(doc.data_rows[1].qty(), 1.0);
    assert_eq!(doc.data_rows[1].cost(), &CellValue::from("50 EUR"));
}

#[test]
fn test_extract_unreadable_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "not a spreadsheet").unwrap();
    assert!(matches!(extract_file(&path), Err(ExtractError::Read(_))));
}

// ===== Merge Tests =====

#[test]
fn test_end_to_end_grand_summary() {
    let dir = tempdir().unwrap();
    let paths = two_orders(dir.path());

    let result = merge(&paths, 10.0, &unit_rates(), &options());

    assert_eq!(result.total_items, 5);
    assert_eq!(result.documents, 2);
    assert_eq!(result.vessel_names, vec!["MV ALPHA", "MV BETA"]);

    let totals = result.report.totals().unwrap();
    assert!(approx(totals.total_sales, 500.0));
    assert!(approx(totals.total_cost, 230.0));
    assert!(approx(totals.discount, 50.0));
    assert!(approx(totals.final_sales, 450.0));
    assert!(approx(totals.profit, 220.0));
}

#[test]
fn test_unreadable_inputs_are_skipped() {
    let dir = tempdir().unwrap();
    let mut paths = two_orders(dir.path());
    paths.insert(1, dir.path().join("missing.xlsx"));

    let result = merge(&paths, 0.0, &unit_rates(), &options());

    assert_eq!(result.statuses.len(), 3);
    assert_eq!(result.statuses[0].item_count(), Some(3));
    assert!(!result.statuses[1].is_readable());
    assert_eq!(result.statuses[2].item_count(), Some(2));
    assert_eq!(result.documents, 2);
    assert_eq!(result.report.sections().len(), 2);
}

#[test]
fn test_merge_is_idempotent() {
    let dir = tempdir().unwrap();
    let paths = two_orders(dir.path());

    let first = merge(&paths, 10.0, &unit_rates(), &options());
    let second = merge(&paths, 10.0, &unit_rates(), &options());
    assert_eq!(first.report, second.report);
}

#[test]
fn test_parallel_matches_sequential() {
    let dir = tempdir().unwrap();
    let paths = two_orders(dir.path());

    let sequential = merge(&paths, 5.0, &unit_rates(), &options());
    let parallel = merge(
        &paths,
        5.0,
        &unit_rates(),
        &MergeOptions {
            parallel: true,
            ..options()
        },
    );
    assert_eq!(sequential.report, parallel.report);
    assert_eq!(sequential.vessel_names, parallel.vessel_names);
}

#[test]
fn test_costs_converted_into_sale_currency() {
    let dir = tempdir().unwrap();
    let path = write_order(
        dir.path(),
        "usd.xlsx",
        "MV GAMMA",
        &[Item { qty: 2.0, price: 150.0, cost: "3.850,00 TL" }],
        "$ 300.00",
    );
    let rates = RateTable::from_pairs([("EUR", 38.5), ("USD", 35.0)]).unwrap();

    let result = merge(&[path], 0.0, &rates, &options());
    let section = &result.report.sections()[0];
    let row = section.data_rows.start;
    // 3850 TRY / 35 per USD
    assert_eq!(result.report.value(CellAddr::new(row, 9)), Some(110.0));
    assert_eq!(result.report.value(CellAddr::new(row, 10)), Some(220.0));
    assert!(approx(result.report.totals().unwrap().profit, 80.0));
}

// ===== Output Tests =====

#[test]
fn test_written_report_reads_back() {
    let dir = tempdir().unwrap();
    let paths = two_orders(dir.path());
    let out = dir.path().join("out");
    std::fs::create_dir(&out).unwrap();

    let result = merge(&paths, 10.0, &unit_rates(), &options());
    let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
    let written = result.write_to_dir(&out, date).unwrap();
    assert_eq!(
        written.file_name().unwrap(),
        "MV ALPHA_MV BETA_02-05-2024.xlsx"
    );

    let grid = Grid::from_workbook_path(&written).unwrap();
    assert_eq!(grid.text(0, 0), "MERGED ORDER SUMMARY");
    assert_eq!(grid.text(1, 0), "VESSEL: MV ALPHA / MV BETA");

    let profit_row = (0..grid.row_count())
        .find(|&row| grid.text(row, 3) == "KÂR / ZARAR :")
        .unwrap();
    assert!(approx(grid.get(profit_row, 6).as_float().unwrap(), 220.0));
}
