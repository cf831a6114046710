//! Excel workbook parser (xlsx, xls, ods); each worksheet is a sheet

use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{NaiveDate, NaiveTime, TimeDelta};

use crate::model::Sheet;

use super::SheetParser;

/// Parser for spreadsheet workbooks
pub struct ExcelParser;

impl SheetParser for ExcelParser {
    fn parse(&self, path: &Path) -> Result<Vec<Sheet>> {
        let mut workbook = open_workbook_auto(path)
            .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range: Range<Data> = workbook
                .worksheet_range(&name)
                .with_context(|| format!("Failed to read worksheet: {}", name))?;

            match parse_range(&name, &range) {
                Some(sheet) => {
                    tracing::debug!(
                        sheet = %sheet.name,
                        rows = sheet.row_count(),
                        workbook = %path.display(),
                        "loaded worksheet"
                    );
                    sheets.push(sheet);
                }
                None => tracing::debug!(sheet = %name, "skipping empty worksheet"),
            }
        }

        Ok(sheets)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "xlsx" | "xls" | "ods" | "xlsm")
    }
}

fn parse_range(name: &str, range: &Range<Data>) -> Option<Sheet> {
    let mut rows = range.rows();
    let header_row = rows.next()?;

    let columns: Vec<String> = header_row
        .iter()
        .map(|cell| cell_to_string(cell).trim().to_string())
        .collect();
    let mut sheet = Sheet::new(name, columns);

    for (line_num, row) in rows.enumerate() {
        let cells: Vec<String> = row.iter().map(cell_to_string).collect();
        if cells.iter().all(String::is_empty) {
            continue;
        }
        // +2 for 1-indexing and header
        sheet.add_row(cells, line_num + 2);
    }

    Some(sheet)
}

/// Render a cell the way it reads in the spreadsheet UI.
/// Integral floats lose their fractional part so `215.0` reads as `215`.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::DateTime(dt) => excel_date_to_string(dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

/// Dates as `YYYY-MM-DD`, with the time only when it is not midnight.
/// Serials outside chrono's date range keep their numeric form.
fn excel_date_to_string(serial: f64) -> String {
    let seconds = (serial * 86_400.0).round();
    if !seconds.is_finite() || seconds.abs() >= i64::MAX as f64 {
        return serial.to_string();
    }
    let datetime = NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .zip(TimeDelta::try_seconds(seconds as i64))
        .and_then(|(epoch, delta)| epoch.checked_add_signed(delta));
    let Some(datetime) = datetime else {
        return serial.to_string();
    };
    if datetime.time() == NaiveTime::MIN {
        datetime.format("%Y-%m-%d").to_string()
    } else {
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
