//! Spreadsheet substrate for ordermerge
//!
//! Two sides of spreadsheet I/O live here:
//!
//! - [`Grid`]: an immutable 2-D array of raw cell values, loaded from the
//!   first worksheet of an input file with calamine.
//! - [`Sheet`]: a sparse, styled output sheet with merged ranges, row heights
//!   and column widths, written to xlsx with rust_xlsxwriter.
//!
//! # Examples
//!
//! ```
//! use ordermerge_sheet::{CellAddr, CellStyle, CellValue, Grid, Sheet};
//!
//! let grid = Grid::from_rows(vec![vec!["NO", "DESCRIPTION"], vec!["1", "Bolt"]]);
//! assert_eq!(grid.text(1, 1), "Bolt");
//!
//! let mut sheet = Sheet::with_name("Out");
//! sheet.set_styled(
//!     CellAddr::parse("G7").unwrap(),
//!     CellValue::formula("=D7*F7"),
//!     CellStyle::new().num_format("#,##0.00"),
//! );
//! assert_eq!(sheet.get_a1("G7").unwrap().formula_source(), Some("=D7*F7"));
//! ```

mod a1_notation;
mod cell;
mod error;
mod grid;
mod sheet;
pub mod style;
mod xlsx;

pub use a1_notation::{column_index_to_letters, parse_a1, CellAddr};
pub use cell::{CellValue, FormulaCell};
pub use error::{Result, SheetError};
pub use grid::Grid;
pub use sheet::{MergedRange, Sheet, StyledCell};
pub use style::{BorderStyle, CellStyle, FontStyle, HAlign, Rgb};
