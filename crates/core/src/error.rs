//! Error types for ordermerge.
//!
//! Each failure kind of the engine has its own enum so callers and tests can
//! tell "file unreadable" from "cost unparsable" from "rate degenerate". The
//! batch-level entry points still degrade to defaults and keep going.

use ordermerge_sheet::SheetError;
use std::path::PathBuf;
use thiserror::Error;

/// A document that cannot be turned into an `OrderDocument`.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The grid is too narrow to hold an order layout.
    #[error("grid has {found} column(s), at least {required} required")]
    TooFewColumns { found: usize, required: usize },

    /// No row starts with the `NO` item-table header.
    #[error("item table header row not found")]
    MissingItemHeader,

    /// The file could not be read as a spreadsheet.
    #[error("failed to read spreadsheet: {0}")]
    Read(#[from] SheetError),
}

/// A cost cell that does not hold a usable amount.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CostError {
    /// Nothing to parse.
    #[error("cost cell is empty")]
    Empty,

    /// No parsable number; the currency token may still be known.
    #[error("cost amount is not numeric (currency {currency:?})")]
    Malformed { currency: String },
}

/// A conversion that cannot be carried out arithmetically.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// The target currency's rate is zero.
    #[error("rate for sale currency {currency} is zero")]
    DegenerateRate { currency: String },
}

/// Rate table updates and rate provider failures.
#[derive(Debug, Error)]
pub enum RateError {
    /// Rates must be finite and strictly positive.
    #[error("invalid rate for {currency}: {rate}")]
    InvalidRate { currency: String, rate: f64 },

    /// The provider could not be reached; prior rates stay in effect.
    #[error("rate provider unavailable: {0}")]
    Unavailable(String),

    /// The provider answered with something that is not a rate list.
    #[error("malformed rate response: {0}")]
    Malformed(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Out-of-range or inconsistent value.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML decoding error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors at the output boundary of a merge.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The destination directory does not accept new files.
    #[error("output directory is not writable: {}", path.display())]
    OutputNotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The destination file exists and is held open elsewhere.
    #[error("output file is locked: {}", path.display())]
    OutputLocked { path: PathBuf },

    /// Writing the workbook failed.
    #[error("failed to write report: {0}")]
    Write(#[from] SheetError),
}
