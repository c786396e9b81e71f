//! # ordermerge-core
//!
//! Extraction and merge engine for spreadsheet order summaries.
//!
//! This crate provides:
//! - Cost cell parsing and currency conversion
//! - Heuristic extraction of order documents from raw grids
//! - A formula expression builder
//! - The merged report builder and the batch orchestrator
//!
//! # Examples
//!
//! ```
//! use ordermerge_core::{merge_grids, MergeOptions, RateTable};
//! use ordermerge_sheet::Grid;
//!
//! let grid = Grid::from_rows(vec![
//!     vec!["NO", "DESCRIPTION", "CODE", "QTTY", "UNIT", "U.PRICE"],
//!     vec!["1", "Bolt M12", "B-12", "4", "PCS", "2.5"],
//! ]);
//! let result = merge_grids(&[("order.xlsx", &grid)], 0.0, &RateTable::default(), &MergeOptions::default());
//! assert_eq!(result.total_items, 1);
//! assert_eq!(result.report.totals().unwrap().total_sales, 10.0);
//! ```

/// Merge configuration.
pub mod config;
/// Free-text cost parsing.
pub mod cost;
/// Currency codes, rate tables and conversion.
pub mod currency;
/// Error types.
pub mod error;
/// Order document extraction.
pub mod extract;
/// Formula expressions.
pub mod formula;
/// Batch orchestration.
pub mod merge;
/// Exchange-rate providers.
pub mod provider;
/// Merged report layout.
pub mod report;

pub use config::{parse_decimal, MergeConfig};
pub use cost::{parse_cost, try_parse_cost, ParsedCost};
pub use currency::{convert, try_convert, CurrencyCode, RateSource, RateTable, LOCAL_CURRENCY};
pub use error::{ConfigError, ConversionError, CostError, ExtractError, MergeError, RateError};
pub use extract::{extract, extract_file, HeaderCell, HeaderInfo, LineItem, OrderDocument};
pub use formula::FormulaExpr;
pub use merge::{ensure_writable, is_locked, merge, merge_grids, FileStatus, MergeOptions, MergeResult};
pub use provider::{JsonFileRateProvider, RateProvider};
pub use report::{output_file_name, MergedReport, ReportBuilder, ReportOptions, SummaryTotals};
