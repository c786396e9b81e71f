use thiserror::Error;

/// Errors that can occur while reading grids or writing sheets
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Invalid cell notation: {0}")]
    InvalidCellNotation(String),

    #[error("Workbook has no worksheets: {0}")]
    NoWorksheet(String),

    #[error("Failed to read workbook: {0}")]
    Read(String),

    #[error("Failed to write workbook: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<calamine::Error> for SheetError {
    fn from(err: calamine::Error) -> Self {
        SheetError::Read(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for SheetError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        SheetError::Write(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
