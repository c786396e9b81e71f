use crate::a1_notation::CellAddr;
use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::grid::Grid;
use crate::sheet::Sheet;
use crate::style::{BorderStyle, CellStyle, HAlign};
use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Formula, Workbook, Worksheet};
use std::path::Path;

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) if value.time() == chrono::NaiveTime::MIN => {
                CellValue::String(value.format("%Y-%m-%d").to_string())
            }
            Some(value) => CellValue::String(value.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

impl Grid {
    /// Load the first worksheet of a spreadsheet file (xlsx, xls, ods).
    ///
    /// Cell positions are kept absolute, so leading empty rows and columns
    /// of the source sheet are preserved as nulls.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened, has no worksheet, or the
    /// worksheet cannot be decoded.
    pub fn from_workbook_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut workbook = open_workbook_auto(path)?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| SheetError::NoWorksheet(path.display().to_string()))??;

        let Some((start_row, start_col)) = range.start() else {
            return Ok(Grid::default());
        };
        let (height, width) = range.get_size();
        let start_row = start_row as usize;
        let start_col = start_col as usize;

        let mut rows = vec![vec![CellValue::Null; start_col + width]; start_row + height];
        for (row, col, data) in range.cells() {
            rows[start_row + row][start_col + col] = data_to_cell_value(data);
        }

        tracing::debug!(
            path = %path.display(),
            rows = rows.len(),
            cols = start_col + width,
            "loaded worksheet grid"
        );
        Ok(Grid::from_rows(rows))
    }
}

fn to_color(rgb: crate::style::Rgb) -> Color {
    Color::RGB(rgb.0)
}

/// Translate a style descriptor into an xlsx format.
fn to_format(style: &CellStyle) -> Format {
    let mut format = Format::new();
    if let Some(fill) = style.fill {
        format = format.set_background_color(to_color(fill));
    }
    if style.font.bold {
        format = format.set_bold();
    }
    if style.font.italic {
        format = format.set_italic();
    }
    if let Some(size) = style.font.size {
        format = format.set_font_size(size);
    }
    if let Some(color) = style.font.color {
        format = format.set_font_color(to_color(color));
    }
    format = match style.h_align {
        HAlign::General => format,
        HAlign::Center => format.set_align(FormatAlign::Center),
        HAlign::Right => format.set_align(FormatAlign::Right),
    };
    if style.v_center {
        format = format.set_align(FormatAlign::VerticalCenter);
    }
    if style.wrap {
        format = format.set_text_wrap();
    }
    format = match style.border {
        BorderStyle::None => format,
        BorderStyle::Thin => format.set_border(FormatBorder::Thin),
        BorderStyle::Medium => format.set_border(FormatBorder::Medium),
    };
    if let Some(num_format) = &style.num_format {
        format = format.set_num_format(num_format);
    }
    format
}

fn cached_result(value: Option<&CellValue>) -> Option<String> {
    match value? {
        CellValue::Float(f) if f.is_finite() => Some(f.to_string()),
        CellValue::Int(i) => Some(i.to_string()),
        CellValue::String(s) => Some(s.clone()),
        CellValue::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        _ => None,
    }
}

fn write_cell(
    worksheet: &mut Worksheet,
    addr: CellAddr,
    value: &CellValue,
    format: &Format,
    styled: bool,
) -> Result<()> {
    let (row, col) = (addr.row, addr.col);
    match value {
        CellValue::Null => {
            if styled {
                worksheet.write_blank(row, col, format)?;
            }
        }
        CellValue::Bool(b) => {
            worksheet.write_boolean_with_format(row, col, *b, format)?;
        }
        CellValue::Int(i) => {
            // Excel stores all numbers as f64
            worksheet.write_number_with_format(row, col, *i as f64, format)?;
        }
        CellValue::Float(f) => {
            worksheet.write_number_with_format(row, col, *f, format)?;
        }
        CellValue::String(s) => {
            worksheet.write_string_with_format(row, col, s, format)?;
        }
        CellValue::Formula(formula) => {
            let mut xlsx_formula = Formula::new(&formula.source);
            if let Some(result) = cached_result(formula.cached.as_deref()) {
                xlsx_formula = xlsx_formula.set_result(result);
            }
            worksheet.write_formula_with_format(row, col, xlsx_formula, format)?;
        }
    }
    Ok(())
}

impl Sheet {
    /// Save the sheet as the only worksheet of a new xlsx file
    ///
    /// # Errors
    ///
    /// Returns error if the workbook cannot be assembled or written.
    pub fn save_as_xlsx<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut workbook = Workbook::new();
        self.write_to_worksheet(workbook.add_worksheet())?;
        workbook.save(path.as_ref())?;
        Ok(())
    }

    /// Serialize the sheet as an xlsx file in memory.
    ///
    /// # Errors
    ///
    /// Returns error if the workbook cannot be assembled.
    pub fn to_xlsx_buffer(&self) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        self.write_to_worksheet(workbook.add_worksheet())?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Write sheet data, styles and layout to a worksheet
    fn write_to_worksheet(&self, worksheet: &mut Worksheet) -> Result<()> {
        worksheet.set_name(self.name())?;

        // Merges first: the first cell is rewritten below with its real value.
        for merged in self.merges() {
            let format = self.style(merged.first).map(to_format).unwrap_or_default();
            worksheet.merge_range(
                merged.first.row,
                merged.first.col,
                merged.last.row,
                merged.last.col,
                "",
                &format,
            )?;
        }

        for (addr, cell) in self.cells() {
            let format = cell.style.as_ref().map(to_format).unwrap_or_default();
            write_cell(worksheet, addr, &cell.value, &format, cell.style.is_some())?;
        }

        for (&row, &height) in self.row_heights() {
            worksheet.set_row_height(row, height)?;
        }
        for (&col, &width) in self.column_widths() {
            worksheet.set_column_width(col, width)?;
        }
        if let Some(area) = self.print_area() {
            worksheet.set_print_area(area.first.row, area.first.col, area.last.row, area.last.col)?;
        }
        worksheet.set_screen_gridlines(self.show_gridlines());

        Ok(())
    }
}
