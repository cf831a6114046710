//! CSV and TSV sheet parser

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::Sheet;

use super::{detect_format, sheet_name_from_path, SheetParser};

/// Parser for delimited text files; one file holds one sheet
pub struct CsvParser;

impl SheetParser for CsvParser {
    fn parse(&self, path: &Path) -> Result<Vec<Sheet>> {
        let file =
            File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter_for(path))
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .with_context(|| format!("Failed to read headers of {}", path.display()))?
            .clone();

        let columns: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
        let mut sheet = Sheet::new(sheet_name_from_path(path), columns);

        for (line_num, result) in csv_reader.records().enumerate() {
            // +2 for 1-indexing and header
            let record = result.with_context(|| {
                format!("Failed to read row {} of {}", line_num + 2, path.display())
            })?;
            // Blank lines never reach here; delimiter-only lines are rows of empty cells
            let line = record
                .position()
                .map_or(line_num + 2, |pos| pos.line() as usize);
            let cells: Vec<String> = record.iter().map(str::to_string).collect();
            sheet.add_row(cells, line);
        }

        tracing::debug!(
            sheet = %sheet.name,
            rows = sheet.row_count(),
            columns = sheet.column_count(),
            "loaded sheet"
        );
        Ok(vec![sheet])
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "csv" | "tsv" | "txt")
    }
}

fn delimiter_for(path: &Path) -> u8 {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);
    let format = match ext.as_deref() {
        Some(ext) => ext,
        None => detect_format(path).unwrap_or("csv"),
    };
    if matches!(format, "tsv" | "txt") {
        b'\t'
    } else {
        b','
    }
}
