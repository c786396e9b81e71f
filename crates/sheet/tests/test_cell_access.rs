use ordermerge_sheet::{CellAddr, CellStyle, CellValue, Grid, Result, Sheet, SheetError};
use tempfile::tempdir;

#[test]
fn test_a1_cell_access() -> Result<()> {
    let mut sheet = Sheet::with_name("Orders");
    sheet.set(CellAddr::parse("A1")?, "NO");
    sheet.set(CellAddr::parse("k12")?, 42.5);

    assert_eq!(sheet.get_a1("A1")?.as_text(), "NO");
    assert_eq!(sheet.get_a1("K12")?.as_float(), Some(42.5));
    // case insensitive, unwritten cells read as null
    assert_eq!(sheet.get_a1("a1")?.as_text(), "NO");
    assert!(sheet.get_a1("Z99")?.is_null());

    Ok(())
}

#[test]
fn test_invalid_notation() {
    let sheet = Sheet::new();
    assert!(matches!(
        sheet.get_a1("12A"),
        Err(SheetError::InvalidCellNotation(_))
    ));
    assert!(matches!(
        CellAddr::parse(""),
        Err(SheetError::InvalidCellNotation(_))
    ));
}

#[test]
fn test_formula_cached_value_survives_xlsx() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("formula.xlsx");

    let mut sheet = Sheet::new();
    sheet.set(CellAddr::parse("D2")?, 3);
    sheet.set(CellAddr::parse("F2")?, 2.5);
    sheet.set_styled(
        CellAddr::parse("G2")?,
        CellValue::formula_with_result("=D2*F2", CellValue::Float(7.5)),
        CellStyle::new().num_format("\"€\"#,##0.00"),
    );
    sheet.save_as_xlsx(&path)?;

    let grid = Grid::from_workbook_path(&path)?;
    assert_eq!(grid.get(1, 3).as_float(), Some(3.0));
    assert_eq!(grid.get(1, 6).as_float(), Some(7.5));
    assert_eq!(grid.text(0, 0), "");

    Ok(())
}

#[test]
fn test_grid_text_is_trimmed() {
    let grid = Grid::from_rows(vec![vec!["  DATE :  ", "02.05.2024 "]]);
    assert_eq!(grid.text(0, 0), "DATE :");
    assert_eq!(grid.text(0, 1), "02.05.2024");
    assert_eq!(grid.text(5, 5), "");
}
