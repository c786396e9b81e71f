//! Batch orchestration: files in, one merged report out.

use crate::currency::RateSource;
use crate::error::{ExtractError, MergeError};
use crate::extract::{extract, extract_file, OrderDocument};
use crate::report::{self, output_file_name, MergedReport, ReportOptions};
use chrono::{Local, NaiveDate, NaiveDateTime};
use ordermerge_sheet::Grid;
use rayon::prelude::*;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Name of the scratch file used to test a directory for write access.
pub const WRITE_CHECK_NAME: &str = ".write_test_tmp";

/// Batch settings besides discount and rates.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub show_header_info: bool,
    /// Extract input files on the rayon thread pool.
    pub parallel: bool,
    /// Banner timestamp; `None` uses the current local time.
    pub generated_at: Option<NaiveDateTime>,
}

impl Default for MergeOptions {
    fn default() -> Self {
        MergeOptions {
            show_header_info: true,
            parallel: false,
            generated_at: None,
        }
    }
}

/// Outcome of one input file.
#[derive(Debug)]
pub struct FileStatus {
    pub path: PathBuf,
    /// Item count, or why the file was skipped.
    pub outcome: Result<usize, ExtractError>,
}

impl FileStatus {
    #[must_use]
    pub fn item_count(&self) -> Option<usize> {
        self.outcome.as_ref().ok().copied()
    }

    #[must_use]
    pub fn is_readable(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Result of a merge run.
#[derive(Debug)]
pub struct MergeResult {
    pub total_items: usize,
    pub vessel_names: Vec<String>,
    pub report: MergedReport,
    /// One entry per input, in input order.
    pub statuses: Vec<FileStatus>,
    /// Number of inputs that produced a document.
    pub documents: usize,
}

impl MergeResult {
    /// File name the report is saved under for `date`.
    #[must_use]
    pub fn file_name(&self, date: NaiveDate) -> String {
        output_file_name(&self.vessel_names, date)
    }

    /// Save the report into `dir` and return the written path.
    ///
    /// # Errors
    ///
    /// Fails when the directory is not writable, the target file is locked,
    /// or the workbook cannot be written.
    pub fn write_to_dir(&self, dir: &Path, date: NaiveDate) -> Result<PathBuf, MergeError> {
        ensure_writable(dir)?;
        let path = dir.join(self.file_name(date));
        if is_locked(&path) {
            return Err(MergeError::OutputLocked { path });
        }
        self.report.sheet().save_as_xlsx(&path)?;
        tracing::info!(path = %path.display(), items = self.total_items, "report written");
        Ok(path)
    }
}

/// Check that `dir` accepts new files by creating and removing a scratch file.
///
/// # Errors
///
/// Returns [`MergeError::OutputNotWritable`] with the underlying I/O error.
pub fn ensure_writable(dir: &Path) -> Result<(), MergeError> {
    let scratch = dir.join(WRITE_CHECK_NAME);
    fs::File::create(&scratch)
        .and_then(|_| fs::remove_file(&scratch))
        .map_err(|source| MergeError::OutputNotWritable {
            path: dir.to_path_buf(),
            source,
        })
}

/// An existing file that cannot be opened for writing counts as locked.
#[must_use]
pub fn is_locked(path: &Path) -> bool {
    path.exists()
        && OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .is_err()
}

type Extracted = (PathBuf, Result<OrderDocument, ExtractError>);

fn extract_paths<P: AsRef<Path> + Sync>(paths: &[P], parallel: bool) -> Vec<Extracted> {
    let run = |path: &P| {
        let path = path.as_ref();
        (path.to_path_buf(), extract_file(path))
    };
    if parallel {
        paths.par_iter().map(run).collect()
    } else {
        paths.iter().map(run).collect()
    }
}

fn assemble(
    extracted: Vec<Extracted>,
    discount_pct: f64,
    rates: &impl RateSource,
    options: &MergeOptions,
) -> MergeResult {
    let mut orders = Vec::new();
    let mut statuses = Vec::with_capacity(extracted.len());
    for (path, outcome) in extracted {
        let outcome = match outcome {
            Ok(order) => {
                let count = order.item_count();
                orders.push(order);
                Ok(count)
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "skipping unreadable order file");
                Err(err)
            }
        };
        statuses.push(FileStatus { path, outcome });
    }

    let report_options = ReportOptions {
        show_header_info: options.show_header_info,
        generated_at: options
            .generated_at
            .unwrap_or_else(|| Local::now().naive_local()),
    };
    let (report, total_items, vessel_names) =
        report::build(&orders, discount_pct, rates, &report_options);

    tracing::info!(
        inputs = statuses.len(),
        documents = orders.len(),
        items = total_items,
        "orders merged"
    );

    MergeResult {
        total_items,
        vessel_names,
        report,
        statuses,
        documents: orders.len(),
    }
}

/// Extract every file and build the merged report.
///
/// Unreadable files are recorded in [`MergeResult::statuses`] and skipped;
/// the merge itself never fails.
pub fn merge<P: AsRef<Path> + Sync>(
    paths: &[P],
    discount_pct: f64,
    rates: &impl RateSource,
    options: &MergeOptions,
) -> MergeResult {
    let extracted = extract_paths(paths, options.parallel);
    assemble(extracted, discount_pct, rates, options)
}

/// Merge grids that are already in memory, named by their file names.
pub fn merge_grids(
    inputs: &[(&str, &Grid)],
    discount_pct: f64,
    rates: &impl RateSource,
    options: &MergeOptions,
) -> MergeResult {
    let extracted = inputs
        .iter()
        .map(|(name, grid)| (PathBuf::from(*name), extract(name, grid)))
        .collect();
    assemble(extracted, discount_pct, rates, options)
}
